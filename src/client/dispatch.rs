//! Request dispatch: the single place a request meets the transport.
//!
//! [`Dispatcher::call`] turns a relative API path and a [`RequestSpec`] into an
//! [`HttpRequest`], attaches the endpoint's `Authorization` header, runs the
//! exchange under the call's [`CancelToken`], and classifies the outcome:
//!
//! | Outcome | Result |
//! |---------|--------|
//! | token fired before or during the exchange | [`ClusterError::Cancelled`] |
//! | transport returned `Err` | [`ClusterError::Transport`] |
//! | non-2xx status | [`ClusterError::Api`] |
//! | 2xx | decoded JSON (`Null` for an empty body) |
//!
//! Newline-delimited JSON bodies (the `add` endpoint with `stream-channels=true`)
//! decode to a `Value::Array` of the individual documents. A body holding
//! exactly one document decodes to that document.

use super::cancel::CancelToken;
use super::config::{ClientConfig, ClusterEndpoint};
use super::transport::{HttpRequest, HttpResponse, RequestBody, Transport};
use crate::error::{ClusterError, Result};
use crate::protocol::QueryParams;
use http::header::{ACCEPT, AUTHORIZATION};
use http::{HeaderMap, HeaderValue, Method};
use serde_json::Value;
use std::sync::Arc;

/// Everything about a request except its path.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    /// HTTP method.
    pub method: Method,
    /// Query parameters, in order.
    pub query: QueryParams,
    /// Request body.
    pub body: RequestBody,
    /// Extra headers. `Authorization` is always set from the endpoint.
    pub headers: HeaderMap,
}

impl Default for RequestSpec {
    fn default() -> Self {
        RequestSpec {
            method: Method::GET,
            query: QueryParams::new(),
            body: RequestBody::Empty,
            headers: HeaderMap::new(),
        }
    }
}

impl RequestSpec {
    /// A `GET` with no parameters.
    pub fn get() -> Self {
        Self::default()
    }

    /// A `POST` with no parameters or body.
    pub fn post() -> Self {
        Self::method(Method::POST)
    }

    /// A `DELETE` with no parameters.
    pub fn delete() -> Self {
        Self::method(Method::DELETE)
    }

    /// A request with an arbitrary method.
    pub fn method(method: Method) -> Self {
        RequestSpec {
            method,
            ..Default::default()
        }
    }

    /// Replace the query parameters.
    pub fn with_query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    /// Replace the body.
    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    /// Replace the extra headers.
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }
}

/// Issues requests against one endpoint through one transport.
#[derive(Clone)]
pub struct Dispatcher {
    endpoint: Arc<ClusterEndpoint>,
    config: Arc<ClientConfig>,
    transport: Arc<dyn Transport>,
}

impl Dispatcher {
    /// Dispatcher over shared endpoint, config and transport.
    pub fn new(
        endpoint: Arc<ClusterEndpoint>,
        config: Arc<ClientConfig>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Dispatcher {
            endpoint,
            config,
            transport,
        }
    }

    /// The target endpoint.
    pub fn endpoint(&self) -> &ClusterEndpoint {
        &self.endpoint
    }

    /// The client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build the final request for `path`.
    ///
    /// Caller headers are kept; the endpoint's `Authorization` replaces any
    /// caller-supplied one.
    pub fn build_request(&self, path: &str, spec: RequestSpec) -> Result<HttpRequest> {
        let url = self.endpoint.url_for(path)?;
        let mut headers = spec.headers;
        if !headers.contains_key(ACCEPT) {
            headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        }
        if let Some(auth) = self.endpoint.authorization() {
            headers.insert(AUTHORIZATION, auth.clone());
        }
        Ok(HttpRequest {
            method: spec.method,
            url,
            headers,
            query: spec.query,
            body: spec.body,
        })
    }

    /// Send a request and return the decoded JSON payload.
    pub async fn call(
        &self,
        path: &str,
        spec: RequestSpec,
        cancel: Option<&CancelToken>,
    ) -> Result<Value> {
        let request = self.build_request(path, spec)?;
        let method = request.method.clone();

        if self.config.enable_logging {
            tracing::debug!(method = %method, path, "dispatching cluster request");
        }

        if cancel.is_some_and(CancelToken::is_cancelled) {
            return Err(self.cancelled(&method, path));
        }

        let outcome = match cancel {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => return Err(self.cancelled(&method, path)),
                    outcome = self.transport.send(request) => outcome,
                }
            }
            None => self.transport.send(request).await,
        };

        let response = outcome.map_err(|e| {
            if self.config.enable_logging {
                tracing::warn!(method = %method, path, error = %e, "cluster request failed in transport");
            }
            ClusterError::transport(e)
        })?;

        self.handle_response(&method, path, response)
    }

    fn handle_response(&self, method: &Method, path: &str, response: HttpResponse) -> Result<Value> {
        if response.status.is_success() {
            return decode_body(&response.body);
        }

        let err = api_error(response);
        if self.config.enable_logging {
            if let ClusterError::Api {
                status, message, ..
            } = &err
            {
                tracing::warn!(method = %method, path, status, message = %message, "cluster API error");
            }
        }
        Err(err)
    }

    fn cancelled(&self, method: &Method, path: &str) -> ClusterError {
        if self.config.enable_logging {
            tracing::debug!(method = %method, path, "cluster request cancelled");
        }
        ClusterError::Cancelled
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("endpoint", &self.endpoint)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Decode a success body: empty → `Null`, one JSON document → that document,
/// several whitespace-separated documents → an array of them.
pub fn decode_body(body: &[u8]) -> Result<Value> {
    let mut values = serde_json::Deserializer::from_slice(body)
        .into_iter::<Value>()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| ClusterError::Decode(format!("invalid JSON response body: {}", e)))?;

    Ok(match values.len() {
        0 => Value::Null,
        1 => values.remove(0),
        _ => Value::Array(values),
    })
}

/// Build an [`ClusterError::Api`] from a non-2xx response.
fn api_error(response: HttpResponse) -> ClusterError {
    let status = response.status;
    let body: Option<Value> = serde_json::from_slice(&response.body).ok();
    let message = body
        .as_ref()
        .and_then(|b| b.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .or_else(|| {
            let text = String::from_utf8_lossy(&response.body).trim().to_string();
            (!text.is_empty()).then_some(text)
        })
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_default();

    ClusterError::Api {
        status: status.as_u16(),
        message,
        status_text: status.canonical_reason().map(str::to_string),
        body,
    }
}
