//! Wire payloads to stable response types.
//!
//! Each function takes the decoded JSON body of one endpoint and produces the
//! crate's response type:
//!
//! - CIDs are unwrapped from `{"/": "<cid>"}` to plain strings, everywhere they appear.
//! - `add` payloads are read as `AddOutput`, so an array and a bare object
//!   are the same sequence to everything downstream.
//! - Peer maps become `BTreeMap<peer id, PinInfo>`, with `peername` renamed to
//!   `peer_name` and `timestamp` parsed. A missing map is an empty one.
//!
//! # Examples
//!
//! ```
//! use cluster_http_client::protocol::normalize::normalize_status;
//! use cluster_http_client::TrackerStatus;
//! use serde_json::json;
//!
//! let status = normalize_status(json!({
//!     "cid": {"/": "bafyxyz"},
//!     "name": "photos",
//!     "peer_map": {
//!         "peerA": {"peername": "nodeA", "status": "pinned", "timestamp": "2024-01-01T00:00:00Z"}
//!     }
//! })).unwrap();
//!
//! assert_eq!(status.cid, "bafyxyz");
//! assert_eq!(status.peer_map["peerA"].peer_name, "nodeA");
//! assert_eq!(status.peer_map["peerA"].status, TrackerStatus::Pinned);
//! assert!(status.peer_map["peerA"].error.is_none());
//! ```

use super::constants::ZERO_TIME;
use super::wire::{
    AddOutput, WireAddItem, WireCid, WireId, WireMetric, WirePin, WirePinInfo, WireSize,
    WireStatus, WireVersion,
};
use crate::error::{ClusterError, Result};
use crate::types::{
    AddResponse, ClusterInfo, IpfsInfo, Metric, PinInfo, PinMode, PinResponse, StatusResponse,
};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::BTreeMap;

/// First item of an `add` response. Used by single-file uploads.
pub fn normalize_add_first(payload: Value) -> Result<AddResponse> {
    normalize_add_all(payload)?
        .into_iter()
        .next()
        .ok_or_else(|| ClusterError::Decode("add response contained no items".to_string()))
}

/// All items of an `add` response, in server order.
pub fn normalize_add_all(payload: Value) -> Result<Vec<AddResponse>> {
    let output: AddOutput = serde_json::from_value(payload)?;
    output.into_items().into_iter().map(add_item).collect()
}

fn add_item(item: WireAddItem) -> Result<AddResponse> {
    let size = match item.size {
        None => 0,
        Some(WireSize::Number(n)) => n,
        Some(WireSize::Text(text)) => text
            .parse()
            .map_err(|_| ClusterError::Decode(format!("invalid size {:?}", text)))?,
    };
    Ok(AddResponse {
        name: item.name,
        cid: item.cid.into_string(),
        size,
    })
}

/// A single pin record (`pin`, `unpin`, `allocation`).
pub fn normalize_pin(payload: Value) -> Result<PinResponse> {
    let pin: WirePin = serde_json::from_value(payload)?;
    pin_response(pin)
}

/// A list of pin records (`pinls`). A bare object counts as a list of one.
pub fn normalize_pins(payload: Value) -> Result<Vec<PinResponse>> {
    match payload {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items.into_iter().map(normalize_pin).collect(),
        single => Ok(vec![normalize_pin(single)?]),
    }
}

fn pin_response(pin: WirePin) -> Result<PinResponse> {
    Ok(PinResponse {
        cid: pin.cid.into_string(),
        name: pin.name.unwrap_or_default(),
        pin_type: pin.pin_type,
        allocations: pin.allocations.unwrap_or_default(),
        origins: pin.origins.unwrap_or_default(),
        max_depth: pin.max_depth,
        reference: pin.reference.map(WireCid::into_string),
        replication_factor_min: pin.replication_factor_min,
        replication_factor_max: pin.replication_factor_max,
        mode: pin.mode.as_deref().and_then(PinMode::from_wire),
        shard_size: pin.shard_size,
        user_allocations: pin.user_allocations.unwrap_or_default(),
        expire_at: optional_timestamp(pin.expire_at.as_deref())?,
        metadata: pin.metadata.unwrap_or_default(),
        pin_update: pin.pin_update.map(WireCid::into_string),
        timestamp: optional_timestamp(pin.timestamp.as_deref())?,
    })
}

/// Pin status across peers (`status`, `recover`).
pub fn normalize_status(payload: Value) -> Result<StatusResponse> {
    let status: WireStatus = serde_json::from_value(payload)?;
    let peer_map = status
        .peer_map
        .unwrap_or_default()
        .into_iter()
        .map(|(peer, info)| pin_info(info).map(|info| (peer, info)))
        .collect::<Result<BTreeMap<_, _>>>()?;

    Ok(StatusResponse {
        cid: status.cid.into_string(),
        name: status.name.unwrap_or_default(),
        peer_map,
    })
}

fn pin_info(info: WirePinInfo) -> Result<PinInfo> {
    Ok(PinInfo {
        peer_name: info.peername,
        ipfs_peer_id: info.ipfs_peer_id,
        status: info.status.into(),
        timestamp: parse_timestamp(&info.timestamp)?,
        error: info.error,
    })
}

/// Version string from `GET /version`.
pub fn normalize_version(payload: Value) -> Result<String> {
    let version: WireVersion = serde_json::from_value(payload)?;
    Ok(version.version)
}

/// Peer identity from `GET /id`.
pub fn normalize_info(payload: Value) -> Result<ClusterInfo> {
    let id: WireId = serde_json::from_value(payload)?;
    Ok(ClusterInfo {
        id: id.id,
        peer_name: id.peername,
        version: id.version,
        commit: id.commit,
        rpc_protocol_version: id.rpc_protocol_version,
        addresses: id.addresses.unwrap_or_default(),
        cluster_peers: id.cluster_peers.unwrap_or_default(),
        cluster_peers_addresses: id.cluster_peers_addresses.unwrap_or_default(),
        error: id.error,
        ipfs: id.ipfs.map(|ipfs| IpfsInfo {
            id: ipfs.id,
            addresses: ipfs.addresses.unwrap_or_default(),
            error: ipfs.error,
        }),
    })
}

/// Metric names from `GET /monitor/metrics`.
pub fn normalize_metric_names(payload: Value) -> Result<Vec<String>> {
    if payload.is_null() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_value(payload)?)
}

/// Metrics from `GET /monitor/metrics/{name}`.
pub fn normalize_metrics(payload: Value) -> Result<Vec<Metric>> {
    if payload.is_null() {
        return Ok(Vec::new());
    }
    let metrics: Vec<WireMetric> = serde_json::from_value(payload)?;
    Ok(metrics
        .into_iter()
        .map(|m| Metric {
            name: m.name,
            peer: m.peer,
            value: m.value,
            expire: from_unix_nanos(m.expire),
            valid: m.valid,
            weight: m.weight,
            partitionable: m.partitionable,
            received_at: from_unix_nanos(m.received_at),
        })
        .collect())
}

/// Parse an RFC 3339 timestamp into UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| ClusterError::Decode(format!("invalid timestamp {:?}: {}", value, e)))
}

/// Empty strings and Go's zero time mean "unset".
fn optional_timestamp(value: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    match value {
        None | Some("") | Some(ZERO_TIME) => Ok(None),
        Some(value) => parse_timestamp(value).map(Some),
    }
}

fn from_unix_nanos(nanos: i64) -> Option<DateTime<Utc>> {
    if nanos <= 0 {
        return None;
    }
    Some(DateTime::from_timestamp_nanos(nanos))
}
