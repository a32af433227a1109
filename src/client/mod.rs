//! HTTP client for the cluster REST API.
//!
//! This module turns typed calls into HTTP exchanges and back:
//!
//! - **Build requests** from option structs, CIDs and multipart bodies
//! - **Dispatch** them through a pluggable [`Transport`]
//! - **Cancel** in-flight calls with a [`CancelToken`]
//! - **Normalize** whatever the server returns into the crate's response types
//!
//! # Module Organization
//!
//! ```text
//! client/
//! ├── cluster   - ClusterClient, one method per endpoint
//! ├── dispatch  - Request building, sending and status handling
//! ├── transport - Transport trait and the reqwest implementation
//! ├── cancel    - Cancellation tokens
//! ├── config    - Endpoint and client configuration
//! └── utils     - Path helpers
//! ```
//!
//! # Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ClusterClient`] | Typed client, one method per endpoint |
//! | [`ClusterEndpoint`] | API base URL and optional Basic credentials |
//! | [`ClientConfig`] | Timeouts, pooling, logging and validation switches |
//! | [`Dispatcher`] | Low-level request/response plumbing |
//! | [`CancelToken`] | Cooperative cancellation for one or more calls |
//!
//! # Examples
//!
//! ## Creating a Client
//!
//! ```
//! use cluster_http_client::client::{ClientConfig, ClusterClient, ClusterEndpoint};
//!
//! let endpoint = ClusterEndpoint::new("http://127.0.0.1:9094")
//!     .unwrap()
//!     .with_basic_auth("admin", "secret")
//!     .unwrap();
//!
//! let config = ClientConfig {
//!     request_timeout_ms: 120_000,
//!     validate_options: true,
//!     ..Default::default()
//! };
//! let client = ClusterClient::with_config(endpoint, config).unwrap();
//! assert!(client.endpoint().has_credentials());
//! ```
//!
//! ## Path Helpers
//!
//! ```
//! use cluster_http_client::client::pin_path;
//!
//! assert_eq!(pin_path("/ipfs/bafyabc/docs").unwrap(), "pins/ipfs/bafyabc/docs");
//! ```

mod cancel;
mod cluster;
mod config;
mod dispatch;
mod transport;
mod utils;

pub use cancel::CancelToken;
pub use cluster::ClusterClient;
pub use config::{ClientConfig, ClusterEndpoint};
pub use dispatch::{decode_body, Dispatcher, RequestSpec};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, RequestBody, Transport};
pub use utils::*;
