//! The HTTP transport boundary.
//!
//! The rest of the crate describes requests as plain [`HttpRequest`] values and
//! reads plain [`HttpResponse`] values. A [`Transport`] performs the exchange.
//! [`ReqwestTransport`] is the production implementation; tests plug in their own.

use super::config::ClientConfig;
use crate::error::{BoxError, ClusterError, Result};
use crate::protocol::{MultipartBody, QueryParams};
use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};
use std::time::Duration;
use url::Url;

/// Body of an outgoing request.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    /// No body.
    #[default]
    Empty,
    /// A `multipart/form-data` body.
    Multipart(MultipartBody),
}

/// An HTTP request described as data.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: Method,
    /// Full URL without the query string.
    pub url: Url,
    /// Request headers.
    pub headers: HeaderMap,
    /// Query parameters to append to `url`.
    pub query: QueryParams,
    /// Request body.
    pub body: RequestBody,
}

/// An HTTP response described as data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// The complete response body.
    pub body: Bytes,
}

/// Something that can execute an [`HttpRequest`].
///
/// An `Err` means no response was obtained at all. Non-2xx statuses are
/// successful exchanges and must be returned as `Ok`.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one exchange.
    async fn send(&self, request: HttpRequest) -> std::result::Result<HttpResponse, BoxError>;
}

/// [`Transport`] backed by a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build the underlying client from `config`.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .user_agent(config.user_agent.clone());

        if !config.proxy_url.is_empty() {
            let proxy = reqwest::Proxy::all(&config.proxy_url)
                .map_err(|e| ClusterError::Config(format!("invalid proxy URL: {}", e)))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| ClusterError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(ReqwestTransport { client })
    }

    /// Wrap an existing client.
    pub fn from_client(client: reqwest::Client) -> Self {
        ReqwestTransport { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> std::result::Result<HttpResponse, BoxError> {
        let mut url = request.url;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }

        let mut builder = self
            .client
            .request(request.method, url)
            .headers(request.headers);

        if let RequestBody::Multipart(body) = request.body {
            builder = builder.multipart(to_form(body)?);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn to_form(body: MultipartBody) -> std::result::Result<reqwest::multipart::Form, BoxError> {
    // File names carry directory paths and must reach the server verbatim.
    let mut form = reqwest::multipart::Form::new().percent_encode_noop();
    for part in body.into_parts() {
        let length = part.contents.len() as u64;
        let file_part = reqwest::multipart::Part::stream_with_length(part.contents, length)
            .file_name(part.file_name)
            .mime_str(&part.content_type)?;
        form = form.part(part.field, file_part);
    }
    Ok(form)
}
