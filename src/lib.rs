#![warn(missing_docs)]

//! # Cluster HTTP Client
//!
//! Typed async client for the IPFS Cluster REST API.
//!
//! An IPFS Cluster keeps a shared pin set across many IPFS peers. Its REST API lets
//! callers upload content, pin and unpin CIDs, and ask where each pin lives and in
//! what state. This crate wraps that API in a single [`ClusterClient`].
//!
//! ## Overview
//!
//! - **Uploads**: single files, raw bytes, directory trees and CAR archives
//! - **Pin management**: pin, unpin, list, allocation lookup and recovery
//! - **Status**: per-peer tracker state for any CID
//! - **Monitoring**: metric names and per-peer metric values
//!
//! Every call takes an options struct with an optional [`CancelToken`]. Firing the
//! token ends the call promptly with [`ClusterError::Cancelled`].
//!
//! ## Wire Shapes
//!
//! The API is not uniform about shapes. CIDs arrive as `{"/": "<cid>"}` link
//! objects, `add` answers with an array, a bare object or newline-delimited JSON
//! depending on its options, and optional fields come and go. All of this is
//! absorbed by [`protocol::normalize`]; callers only see the types in [`types`].
//!
//! ## Usage
//!
//! ```ignore
//! use cluster_http_client::{
//!     AddParams, ClusterClient, ClusterEndpoint, FileWithName, PinOptions, StatusOptions,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let endpoint = ClusterEndpoint::new("http://127.0.0.1:9094")?
//!         .with_basic_auth("admin", "secret")?;
//!     let client = ClusterClient::new(endpoint)?;
//!
//!     let added = client
//!         .add_file(FileWithName::new("notes.md", "# hi"), &AddParams::default())
//!         .await?;
//!
//!     let pin = client
//!         .pin(&added.cid, &PinOptions { name: Some("notes".into()), ..Default::default() })
//!         .await?;
//!     println!("pinned {} on {:?}", pin.cid, pin.allocations);
//!
//!     let status = client.status(&added.cid, &StatusOptions::default()).await?;
//!     for (peer, info) in status.peer_map {
//!         println!("{}: {}", peer, info.status);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - **[types]** - Request options and normalized response types
//! - **[error]** - Error types and result handling
//! - **[client]** - The client, dispatcher, transport and cancellation
//! - **[protocol]** - Query parameters, multipart bodies and wire decoding

pub mod client;
pub mod error;
pub mod protocol;
pub mod types;

pub use client::{CancelToken, ClientConfig, ClusterClient, ClusterEndpoint};
pub use error::{ClusterError, Result};
pub use types::{
    AddDirectoryResponse, AddFormat, AddParams, AddResponse, ClusterInfo, FileWithName,
    IpfsInfo, Metric, PinInfo, PinMode, PinOptions, PinResponse, PinType, PinlsOptions,
    RequestOptions, StatusOptions, StatusResponse, TrackerStatus,
};

#[cfg(test)]
mod tests;
