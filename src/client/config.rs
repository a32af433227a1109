//! Client configuration: where the cluster lives and how to talk to it.

use crate::error::{ClusterError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use http::HeaderValue;
use url::Url;

/// Base URL of a cluster REST API plus optional basic-auth credentials.
///
/// The `Authorization` header value is computed once here and reused for every
/// request. Nothing is read from the environment.
///
/// # Examples
///
/// ```
/// use cluster_http_client::ClusterEndpoint;
///
/// let endpoint = ClusterEndpoint::new("http://127.0.0.1:9094")
///     .unwrap()
///     .with_basic_auth("admin", "secret")
///     .unwrap();
/// assert_eq!(endpoint.base_url().as_str(), "http://127.0.0.1:9094/");
/// assert!(endpoint.has_credentials());
/// ```
#[derive(Debug, Clone)]
pub struct ClusterEndpoint {
    base_url: Url,
    authorization: Option<HeaderValue>,
}

impl ClusterEndpoint {
    /// Endpoint without credentials.
    ///
    /// A trailing `/` is added to the path if missing, so relative API paths
    /// resolve beneath it (`http://host/api` + `pins` → `http://host/api/pins`).
    pub fn new(base_url: &str) -> Result<Self> {
        let mut url = Url::parse(base_url)?;
        if url.cannot_be_a_base() {
            return Err(ClusterError::Config(format!(
                "{} cannot be used as a base URL",
                base_url
            )));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(ClusterEndpoint {
            base_url: url,
            authorization: None,
        })
    }

    /// Endpoint with credentials taken from optional parts. Basic auth is only
    /// configured when both a username and a password are given and non-empty.
    pub fn with_credentials(
        base_url: &str,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<Self> {
        let endpoint = Self::new(base_url)?;
        match (username, password) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => {
                endpoint.with_basic_auth(user, pass)
            }
            _ => Ok(endpoint),
        }
    }

    /// Add basic-auth credentials.
    pub fn with_basic_auth(mut self, username: &str, password: &str) -> Result<Self> {
        let encoded = STANDARD.encode(format!("{}:{}", username, password));
        let mut value = HeaderValue::from_str(&format!("Basic {}", encoded))
            .map_err(|e| ClusterError::Config(format!("invalid credentials: {}", e)))?;
        value.set_sensitive(true);
        self.authorization = Some(value);
        Ok(self)
    }

    /// API root, always ending in `/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Precomputed `Authorization` header value, if credentials are set.
    pub fn authorization(&self) -> Option<&HeaderValue> {
        self.authorization.as_ref()
    }

    /// Whether requests carry an `Authorization` header.
    pub fn has_credentials(&self) -> bool {
        self.authorization.is_some()
    }

    /// Resolve an API path against the base URL.
    pub fn url_for(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }
}

/// Transport and behavior settings for [`ClusterClient`](crate::ClusterClient).
///
/// # Examples
///
/// ```
/// use cluster_http_client::ClientConfig;
///
/// let config = ClientConfig {
///     request_timeout_ms: 5_000,
///     validate_options: true,
///     ..Default::default()
/// };
/// assert!(config.enable_logging);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Whole-request timeout. Uploads of large files may need more.
    pub request_timeout_ms: u64,
    /// TCP and TLS connect timeout.
    pub connect_timeout_ms: u64,
    /// Idle connections kept per host.
    pub pool_max_idle_per_host: usize,
    /// Proxy for all requests; empty for none.
    pub proxy_url: String,
    /// `User-Agent` header value.
    pub user_agent: String,
    /// Emit `tracing` events for requests and failures.
    pub enable_logging: bool,
    /// Reject invalid option values before sending.
    pub validate_options: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            request_timeout_ms: 60_000,
            connect_timeout_ms: 10_000,
            pool_max_idle_per_host: 16,
            proxy_url: String::new(),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
            enable_logging: true,
            validate_options: false,
        }
    }
}
