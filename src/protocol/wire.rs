//! Response shapes exactly as the cluster API sends them.
//!
//! These types only exist to be deserialized and handed to
//! [`normalize`](super::normalize); callers never see them.

use super::constants::LINK_KEY;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

/// A CID on the wire: normally the link object `{"/": "<cid>"}`, occasionally a bare string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireCid(pub String);

impl WireCid {
    pub fn into_string(self) -> String {
        self.0
    }
}

impl<'de> Deserialize<'de> for WireCid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Plain(String),
            Link(BTreeMap<String, String>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Plain(cid) => Ok(WireCid(cid)),
            Repr::Link(mut link) => link.remove(LINK_KEY).map(WireCid).ok_or_else(|| {
                serde::de::Error::custom(format!("CID link object without \"{}\" key", LINK_KEY))
            }),
        }
    }
}

/// Sizes arrive as numbers from current servers and as decimal strings from older ones.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireSize {
    Number(u64),
    Text(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireAddItem {
    #[serde(default)]
    pub name: String,
    pub cid: WireCid,
    #[serde(default)]
    pub size: Option<WireSize>,
}

/// The `add` endpoint answers with an array in non-streaming mode and with bare
/// objects (one per line) when streaming.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AddOutput {
    Many(Vec<WireAddItem>),
    Single(WireAddItem),
}

impl AddOutput {
    /// The canonical item sequence, whatever shape arrived.
    pub fn into_items(self) -> Vec<WireAddItem> {
        match self {
            AddOutput::Many(items) => items,
            AddOutput::Single(item) => vec![item],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WirePin {
    pub cid: WireCid,
    #[serde(rename = "type")]
    pub pin_type: Option<i64>,
    pub allocations: Option<Vec<String>>,
    pub origins: Option<Vec<String>>,
    pub max_depth: Option<i64>,
    pub reference: Option<WireCid>,
    pub replication_factor_min: Option<i32>,
    pub replication_factor_max: Option<i32>,
    pub name: Option<String>,
    pub mode: Option<String>,
    pub shard_size: Option<u64>,
    pub user_allocations: Option<Vec<String>>,
    pub expire_at: Option<String>,
    pub metadata: Option<BTreeMap<String, String>>,
    pub pin_update: Option<WireCid>,
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireStatus {
    pub cid: WireCid,
    pub name: Option<String>,
    pub peer_map: Option<BTreeMap<String, WirePinInfo>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WirePinInfo {
    #[serde(default)]
    pub peername: String,
    pub ipfs_peer_id: Option<String>,
    pub status: String,
    pub timestamp: String,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireVersion {
    pub version: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WireId {
    pub id: String,
    pub peername: String,
    pub version: String,
    pub commit: String,
    pub rpc_protocol_version: String,
    pub addresses: Option<Vec<String>>,
    pub cluster_peers: Option<Vec<String>>,
    pub cluster_peers_addresses: Option<Vec<String>>,
    pub error: Option<String>,
    pub ipfs: Option<WireIpfsId>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WireIpfsId {
    pub id: String,
    pub addresses: Option<Vec<String>>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireMetric {
    pub name: String,
    pub peer: String,
    #[serde(default)]
    pub value: String,
    /// Unix nanoseconds.
    #[serde(default)]
    pub expire: i64,
    #[serde(default)]
    pub valid: bool,
    #[serde(default)]
    pub weight: i64,
    #[serde(default)]
    pub partitionable: bool,
    /// Unix nanoseconds.
    #[serde(default)]
    pub received_at: i64,
}
