//! Request options and normalized response types.
//!
//! Options are plain structs with public fields and a `Default` impl, so callers
//! set only what they need:
//!
//! ```
//! use cluster_http_client::{AddParams, AddFormat};
//!
//! let params = AddParams {
//!     cid_version: Some(1),
//!     raw_leaves: Some(true),
//!     format: Some(AddFormat::Unixfs),
//!     ..Default::default()
//! };
//! assert_eq!(params.cid_version, Some(1));
//! ```
//!
//! Response types are built fresh from each wire payload by
//! [`protocol::normalize`](crate::protocol::normalize). Every content identifier in
//! them is a plain string, never the wire's `{"/": ...}` link object.

use crate::client::CancelToken;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;

/// Upload format for the `add` endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddFormat {
    /// Chunk and import the uploaded files as UnixFS.
    Unixfs,
    /// The upload is a CAR archive to import as-is.
    Car,
}

impl AddFormat {
    /// Wire value of the `format` parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            AddFormat::Unixfs => "unixfs",
            AddFormat::Car => "car",
        }
    }
}

/// Pinning mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinMode {
    /// Pin the whole DAG.
    Recursive,
    /// Pin only the root block.
    Direct,
}

impl PinMode {
    /// Wire value of the `mode` parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            PinMode::Recursive => "recursive",
            PinMode::Direct => "direct",
        }
    }

    pub(crate) fn from_wire(value: &str) -> Option<Self> {
        match value {
            "recursive" => Some(PinMode::Recursive),
            "direct" => Some(PinMode::Direct),
            _ => None,
        }
    }
}

/// Pin kinds accepted by the `allocations` filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinType {
    /// Regular data pins.
    Data,
    /// Metadata pins of sharded DAGs.
    Meta,
    /// Cluster DAG pins of sharded DAGs.
    ClusterDag,
    /// Shard pins.
    Shard,
    /// Every kind.
    All,
}

impl PinType {
    /// Wire value used in the `filter` parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            PinType::Data => "pin",
            PinType::Meta => "meta-pin",
            PinType::ClusterDag => "clusterdag-pin",
            PinType::Shard => "shard-pin",
            PinType::All => "all",
        }
    }
}

/// Options for the `add` family of operations.
///
/// Fields left as `None` are not sent.
#[derive(Debug, Clone, Default)]
pub struct AddParams {
    /// CID version of the produced DAG (0 or 1).
    pub cid_version: Option<u8>,
    /// Multihash function name, e.g. `sha2-256`.
    pub hash_function: Option<String>,
    /// Chunker spec, e.g. `size-262144`.
    pub chunker: Option<String>,
    /// Use raw leaf blocks.
    pub raw_leaves: Option<bool>,
    /// Upload format.
    pub format: Option<AddFormat>,
    /// Wrap the uploaded files in a directory.
    pub wrap_with_directory: Option<bool>,
    /// Ask the server for newline-delimited JSON output.
    pub stream_channels: Option<bool>,
    /// Minimum replication factor; `-1` means every peer.
    pub replication_factor_min: Option<i32>,
    /// Maximum replication factor; `-1` means every peer.
    pub replication_factor_max: Option<i32>,
    /// Human-readable pin name.
    pub name: Option<String>,
    /// Pinning mode.
    pub mode: Option<PinMode>,
    /// Shard size in bytes for sharded uploads.
    pub shard_size: Option<u64>,
    /// Peers that should hold the pin.
    pub user_allocations: Option<Vec<String>>,
    /// Pin metadata; each entry becomes a `meta-<key>` parameter.
    pub metadata: Option<BTreeMap<String, String>>,
    /// Import without pinning.
    pub no_pin: Option<bool>,
    /// Add only on the contacted peer.
    pub local: Option<bool>,
    /// Pin expiry as a Go duration string, e.g. `24h`.
    pub expire_in: Option<String>,
    /// Cancellation for this call.
    pub cancel: Option<CancelToken>,
}

/// Options for [`ClusterClient::pin`](crate::ClusterClient::pin).
#[derive(Debug, Clone, Default)]
pub struct PinOptions {
    /// Minimum replication factor; `-1` means every peer.
    pub replication_factor_min: Option<i32>,
    /// Maximum replication factor; `-1` means every peer.
    pub replication_factor_max: Option<i32>,
    /// Human-readable pin name.
    pub name: Option<String>,
    /// Pinning mode.
    pub mode: Option<PinMode>,
    /// Shard size in bytes.
    pub shard_size: Option<u64>,
    /// Peers that should hold the pin.
    pub user_allocations: Option<Vec<String>>,
    /// Pin metadata; each entry becomes a `meta-<key>` parameter.
    pub metadata: Option<BTreeMap<String, String>>,
    /// Time after which the cluster drops the pin.
    pub expire_at: Option<DateTime<Utc>>,
    /// CID of an existing pin to update from.
    pub pin_update: Option<String>,
    /// Cancellation for this call.
    pub cancel: Option<CancelToken>,
}

/// Options for `status` and `recover`.
#[derive(Debug, Clone, Default)]
pub struct StatusOptions {
    /// Only report the contacted peer.
    pub local: Option<bool>,
    /// Cancellation for this call.
    pub cancel: Option<CancelToken>,
}

/// Options for [`ClusterClient::pinls`](crate::ClusterClient::pinls).
#[derive(Debug, Clone, Default)]
pub struct PinlsOptions {
    /// Pin kinds to list. The server default is data pins only.
    pub filter: Option<Vec<PinType>>,
    /// Cancellation for this call.
    pub cancel: Option<CancelToken>,
}

/// Options for calls that take no parameters.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Cancellation for this call.
    pub cancel: Option<CancelToken>,
}

impl RequestOptions {
    /// Options carrying only a cancellation token.
    pub fn with_cancel(cancel: CancelToken) -> Self {
        RequestOptions {
            cancel: Some(cancel),
        }
    }
}

/// A named file to upload.
///
/// `name` may be a relative path (`dir/sub/file.txt`); for directory uploads the
/// server rebuilds the tree from these paths.
#[derive(Debug, Clone)]
pub struct FileWithName {
    /// File name or relative path.
    pub name: String,
    /// File contents.
    pub contents: Bytes,
    /// Explicit content type. Inferred from the extension when `None`.
    pub content_type: Option<String>,
}

impl FileWithName {
    /// A file with an inferred content type.
    pub fn new(name: impl Into<String>, contents: impl Into<Bytes>) -> Self {
        FileWithName {
            name: name.into(),
            contents: contents.into(),
            content_type: None,
        }
    }

    /// Set an explicit content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// One item added through the `add` endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddResponse {
    /// Name or path of the item.
    pub name: String,
    /// Content identifier.
    pub cid: String,
    /// Size in bytes as reported by the server.
    pub size: u64,
}

/// Items of a directory upload, in server order.
pub type AddDirectoryResponse = Vec<AddResponse>;

/// A normalized pin record.
#[derive(Debug, Clone, PartialEq)]
pub struct PinResponse {
    /// Pinned CID.
    pub cid: String,
    /// Pin name; empty when unset.
    pub name: String,
    /// Numeric pin type as reported by the cluster.
    pub pin_type: Option<i64>,
    /// Peers currently allocated to the pin.
    pub allocations: Vec<String>,
    /// Multiaddresses of content providers.
    pub origins: Vec<String>,
    /// DAG depth pinned; `-1` for recursive.
    pub max_depth: Option<i64>,
    /// Parent CID for shard and meta pins.
    pub reference: Option<String>,
    /// Minimum replication factor.
    pub replication_factor_min: Option<i32>,
    /// Maximum replication factor.
    pub replication_factor_max: Option<i32>,
    /// Pin mode; `None` when the wire value is missing or unrecognized.
    pub mode: Option<PinMode>,
    /// Shard size in bytes.
    pub shard_size: Option<u64>,
    /// Peers requested by the user.
    pub user_allocations: Vec<String>,
    /// `None` when the pin never expires.
    pub expire_at: Option<DateTime<Utc>>,
    /// Pin metadata.
    pub metadata: BTreeMap<String, String>,
    /// CID this pin was updated from.
    pub pin_update: Option<String>,
    /// Time the pin was submitted.
    pub timestamp: Option<DateTime<Utc>>,
}

/// Pin status of one CID across the cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusResponse {
    /// The CID queried.
    pub cid: String,
    /// Pin name; empty when unset.
    pub name: String,
    /// Status per peer ID. Empty when the server omits the map.
    pub peer_map: BTreeMap<String, PinInfo>,
}

/// Pin status on one peer.
#[derive(Debug, Clone, PartialEq)]
pub struct PinInfo {
    /// Cluster peer name.
    pub peer_name: String,
    /// ID of the peer's IPFS daemon.
    pub ipfs_peer_id: Option<String>,
    /// Tracker state.
    pub status: TrackerStatus,
    /// When the state was last updated.
    pub timestamp: DateTime<Utc>,
    /// Error text, verbatim; may be empty.
    pub error: Option<String>,
}

/// Pin tracker state reported for a peer.
///
/// Unknown values are kept in [`TrackerStatus::Other`] so nothing the server
/// says is lost.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TrackerStatus {
    /// State not known.
    Undefined,
    /// The cluster peer failed to answer.
    ClusterError,
    /// Pinning failed.
    PinError,
    /// Unpinning failed.
    UnpinError,
    /// Generic error state.
    Error,
    /// Pinned on this peer.
    Pinned,
    /// Pin in progress.
    Pinning,
    /// Unpin in progress.
    Unpinning,
    /// Not pinned on this peer.
    Unpinned,
    /// Allocated to other peers.
    Remote,
    /// Waiting to be pinned.
    PinQueued,
    /// Waiting to be unpinned.
    UnpinQueued,
    /// Waiting in a queue.
    Queued,
    /// Pinned as shards.
    Sharded,
    /// Should be pinned but is not.
    UnexpectedlyUnpinned,
    /// A value this crate does not know.
    Other(String),
}

impl TrackerStatus {
    /// The wire string for this status.
    pub fn as_str(&self) -> &str {
        match self {
            TrackerStatus::Undefined => "undefined",
            TrackerStatus::ClusterError => "cluster_error",
            TrackerStatus::PinError => "pin_error",
            TrackerStatus::UnpinError => "unpin_error",
            TrackerStatus::Error => "error",
            TrackerStatus::Pinned => "pinned",
            TrackerStatus::Pinning => "pinning",
            TrackerStatus::Unpinning => "unpinning",
            TrackerStatus::Unpinned => "unpinned",
            TrackerStatus::Remote => "remote",
            TrackerStatus::PinQueued => "pin_queued",
            TrackerStatus::UnpinQueued => "unpin_queued",
            TrackerStatus::Queued => "queued",
            TrackerStatus::Sharded => "sharded",
            TrackerStatus::UnexpectedlyUnpinned => "unexpectedly_unpinned",
            TrackerStatus::Other(other) => other,
        }
    }

    /// Whether the status is one of the error states.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            TrackerStatus::ClusterError
                | TrackerStatus::PinError
                | TrackerStatus::UnpinError
                | TrackerStatus::Error
                | TrackerStatus::UnexpectedlyUnpinned
        )
    }
}

impl From<String> for TrackerStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "undefined" => TrackerStatus::Undefined,
            "cluster_error" => TrackerStatus::ClusterError,
            "pin_error" => TrackerStatus::PinError,
            "unpin_error" => TrackerStatus::UnpinError,
            "error" => TrackerStatus::Error,
            "pinned" => TrackerStatus::Pinned,
            "pinning" => TrackerStatus::Pinning,
            "unpinning" => TrackerStatus::Unpinning,
            "unpinned" => TrackerStatus::Unpinned,
            "remote" => TrackerStatus::Remote,
            "pin_queued" => TrackerStatus::PinQueued,
            "unpin_queued" => TrackerStatus::UnpinQueued,
            "queued" => TrackerStatus::Queued,
            "sharded" => TrackerStatus::Sharded,
            "unexpectedly_unpinned" => TrackerStatus::UnexpectedlyUnpinned,
            _ => TrackerStatus::Other(value),
        }
    }
}

impl fmt::Display for TrackerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity and version of the contacted cluster peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterInfo {
    /// Cluster peer ID.
    pub id: String,
    /// Cluster peer name.
    pub peer_name: String,
    /// Software version.
    pub version: String,
    /// Build commit.
    pub commit: String,
    /// RPC protocol identifier.
    pub rpc_protocol_version: String,
    /// Listen multiaddresses.
    pub addresses: Vec<String>,
    /// IDs of all known cluster peers.
    pub cluster_peers: Vec<String>,
    /// Multiaddresses of the cluster peers.
    pub cluster_peers_addresses: Vec<String>,
    /// Error reported by the peer, if any.
    pub error: Option<String>,
    /// The attached IPFS daemon.
    pub ipfs: Option<IpfsInfo>,
}

/// The IPFS daemon attached to a cluster peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpfsInfo {
    /// IPFS peer ID.
    pub id: String,
    /// IPFS swarm addresses.
    pub addresses: Vec<String>,
    /// Error reported by the daemon, if any.
    pub error: Option<String>,
}

/// A monitoring metric published by a peer.
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    /// Metric name.
    pub name: String,
    /// Peer that published the metric.
    pub peer: String,
    /// Metric value, as text.
    pub value: String,
    /// Expiry of the metric; `None` when the wire value is out of range.
    pub expire: Option<DateTime<Utc>>,
    /// Whether the metric had not expired when read.
    pub valid: bool,
    /// Weight used by the allocator.
    pub weight: i64,
    /// Whether the allocator may split on this metric.
    pub partitionable: bool,
    /// When the metric was received.
    pub received_at: Option<DateTime<Utc>>,
}
