//! The public cluster client.
//!
//! # Examples
//!
//! ## Adding a file and checking where it is pinned
//!
//! ```ignore
//! use cluster_http_client::{AddParams, ClusterClient, ClusterEndpoint, FileWithName, StatusOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let endpoint = ClusterEndpoint::new("http://127.0.0.1:9094")?;
//!     let client = ClusterClient::new(endpoint)?;
//!
//!     let added = client
//!         .add_file(FileWithName::new("hello.txt", "hello"), &AddParams::default())
//!         .await?;
//!     let status = client.status(&added.cid, &StatusOptions::default()).await?;
//!     for (peer, info) in &status.peer_map {
//!         println!("{} ({}): {}", peer, info.peer_name, info.status);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Cancelling a slow upload
//!
//! ```ignore
//! use cluster_http_client::{AddParams, CancelToken};
//!
//! let token = CancelToken::new();
//! let params = AddParams { cancel: Some(token.clone()), ..Default::default() };
//! let upload = client.add_car(car_file, &params);
//! token.cancel();
//! assert!(upload.await.unwrap_err().is_cancelled());
//! ```

use super::config::{ClientConfig, ClusterEndpoint};
use super::dispatch::{Dispatcher, RequestSpec};
use super::transport::{ReqwestTransport, RequestBody, Transport};
use super::utils::{cid_path, pin_path};
use crate::error::Result;
use crate::protocol::constants::paths;
use crate::protocol::normalize;
use crate::protocol::{
    encode_add_params, encode_pin_params, encode_pinls_params, encode_status_params,
    validate_add_params, validate_pin_options, MultipartBody,
};
use crate::types::{
    AddDirectoryResponse, AddFormat, AddParams, AddResponse, ClusterInfo, FileWithName, Metric,
    PinOptions, PinResponse, PinlsOptions, RequestOptions, StatusOptions, StatusResponse,
};
use bytes::Bytes;
use std::sync::Arc;

/// Client for one cluster REST API endpoint.
///
/// Cheap to clone; clones share the endpoint, configuration and connection
/// pool. Calls hold no shared mutable state and may run concurrently.
#[derive(Clone, Debug)]
pub struct ClusterClient {
    dispatcher: Dispatcher,
}

impl ClusterClient {
    /// Client with default configuration.
    pub fn new(endpoint: ClusterEndpoint) -> Result<Self> {
        Self::with_config(endpoint, ClientConfig::default())
    }

    /// Client with custom configuration, using [`ReqwestTransport`].
    pub fn with_config(endpoint: ClusterEndpoint, config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(endpoint, config, Arc::new(transport)))
    }

    /// Client over a caller-supplied transport.
    pub fn with_transport(
        endpoint: ClusterEndpoint,
        config: ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> Self {
        ClusterClient {
            dispatcher: Dispatcher::new(Arc::new(endpoint), Arc::new(config), transport),
        }
    }

    /// The endpoint this client talks to.
    pub fn endpoint(&self) -> &ClusterEndpoint {
        self.dispatcher.endpoint()
    }

    /// The configuration the client was built with.
    pub fn config(&self) -> &ClientConfig {
        self.dispatcher.config()
    }

    /// Cluster software version.
    pub async fn version(&self, options: &RequestOptions) -> Result<String> {
        let payload = self
            .dispatcher
            .call(paths::VERSION, RequestSpec::get(), options.cancel.as_ref())
            .await?;
        normalize::normalize_version(payload)
    }

    /// Identity of the contacted cluster peer.
    pub async fn info(&self, options: &RequestOptions) -> Result<ClusterInfo> {
        let payload = self
            .dispatcher
            .call(paths::ID, RequestSpec::get(), options.cancel.as_ref())
            .await?;
        normalize::normalize_info(payload)
    }

    /// Upload a prepared multipart body and return the first added item.
    pub async fn add_from_multipart(
        &self,
        body: MultipartBody,
        options: &AddParams,
    ) -> Result<AddResponse> {
        let payload = self.post_add(body, options).await?;
        normalize::normalize_add_first(payload)
    }

    /// Add a single file.
    pub async fn add_file(&self, file: FileWithName, options: &AddParams) -> Result<AddResponse> {
        self.add_from_multipart(MultipartBody::single(file), options)
            .await
    }

    /// Add a raw byte buffer as an unnamed file.
    ///
    /// With `stream_channels` set the server answers with one object per line;
    /// either way only the first item is returned.
    pub async fn add_data(
        &self,
        data: impl Into<Bytes>,
        options: &AddParams,
    ) -> Result<AddResponse> {
        let file = FileWithName::new("blob", data);
        self.add_from_multipart(MultipartBody::single(file), options)
            .await
    }

    /// Add a directory tree, one part per file.
    ///
    /// Always sent with `stream-channels=false` and `wrap-with-directory=true`.
    /// Returns every item the server reports, in order. The upload is a single
    /// request: it either succeeds as a whole or fails as a whole.
    pub async fn add_directory(
        &self,
        files: Vec<FileWithName>,
        options: &AddParams,
    ) -> Result<AddDirectoryResponse> {
        let options = AddParams {
            stream_channels: Some(false),
            wrap_with_directory: Some(true),
            ..options.clone()
        };
        let payload = self
            .post_add(MultipartBody::directory(files), &options)
            .await?;
        normalize::normalize_add_all(payload)
    }

    /// Import a CAR archive.
    pub async fn add_car(&self, car: FileWithName, options: &AddParams) -> Result<AddResponse> {
        let options = AddParams {
            format: Some(AddFormat::Car),
            ..options.clone()
        };
        self.add_from_multipart(MultipartBody::car(car), &options)
            .await
    }

    async fn post_add(&self, body: MultipartBody, options: &AddParams) -> Result<serde_json::Value> {
        if self.config().validate_options {
            validate_add_params(options)?;
        }
        let spec = RequestSpec::post()
            .with_query(encode_add_params(options))
            .with_body(RequestBody::Multipart(body));
        self.dispatcher
            .call(paths::ADD, spec, options.cancel.as_ref())
            .await
    }

    /// Pin a CID, or a rooted path such as `/ipfs/<cid>/sub`.
    pub async fn pin(&self, cid: &str, options: &PinOptions) -> Result<PinResponse> {
        if self.config().validate_options {
            validate_pin_options(options)?;
        }
        let path = pin_path(cid)?;
        let spec = RequestSpec::post().with_query(encode_pin_params(options));
        let payload = self
            .dispatcher
            .call(&path, spec, options.cancel.as_ref())
            .await?;
        normalize::normalize_pin(payload)
    }

    /// Unpin a CID or rooted path.
    pub async fn unpin(&self, cid: &str, options: &RequestOptions) -> Result<PinResponse> {
        let path = pin_path(cid)?;
        let payload = self
            .dispatcher
            .call(&path, RequestSpec::delete(), options.cancel.as_ref())
            .await?;
        normalize::normalize_pin(payload)
    }

    /// List the cluster's pin set.
    pub async fn pinls(&self, options: &PinlsOptions) -> Result<Vec<PinResponse>> {
        let spec = RequestSpec::get().with_query(encode_pinls_params(options));
        let payload = self
            .dispatcher
            .call(paths::ALLOCATIONS, spec, options.cancel.as_ref())
            .await?;
        normalize::normalize_pins(payload)
    }

    /// Pin status of `cid` on every peer.
    pub async fn status(&self, cid: &str, options: &StatusOptions) -> Result<StatusResponse> {
        let path = cid_path(paths::PINS, cid)?;
        let spec = RequestSpec::get().with_query(encode_status_params(options));
        let payload = self
            .dispatcher
            .call(&path, spec, options.cancel.as_ref())
            .await?;
        normalize::normalize_status(payload)
    }

    /// Pin record (allocations and settings) of `cid`.
    pub async fn allocation(&self, cid: &str, options: &RequestOptions) -> Result<PinResponse> {
        let path = cid_path(paths::ALLOCATIONS, cid)?;
        let payload = self
            .dispatcher
            .call(&path, RequestSpec::get(), options.cancel.as_ref())
            .await?;
        normalize::normalize_pin(payload)
    }

    /// Retry a failed pin or unpin of `cid` and return the new status.
    pub async fn recover(&self, cid: &str, options: &StatusOptions) -> Result<StatusResponse> {
        let path = format!("{}/{}", cid_path(paths::PINS, cid)?, paths::RECOVER);
        let spec = RequestSpec::post().with_query(encode_status_params(options));
        let payload = self
            .dispatcher
            .call(&path, spec, options.cancel.as_ref())
            .await?;
        normalize::normalize_status(payload)
    }

    /// Names of the metrics the cluster monitors.
    pub async fn metric_names(&self, options: &RequestOptions) -> Result<Vec<String>> {
        let payload = self
            .dispatcher
            .call(paths::METRICS, RequestSpec::get(), options.cancel.as_ref())
            .await?;
        normalize::normalize_metric_names(payload)
    }

    /// Latest values of metric `name` from every peer.
    pub async fn metrics(&self, name: &str, options: &RequestOptions) -> Result<Vec<Metric>> {
        let path = cid_path(paths::METRICS, name)?;
        let payload = self
            .dispatcher
            .call(&path, RequestSpec::get(), options.cancel.as_ref())
            .await?;
        normalize::normalize_metrics(payload)
    }
}
