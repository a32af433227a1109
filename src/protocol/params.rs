//! Query parameter encoding for add and pin options.
//!
//! The encoders are an allow-list: each known option maps to exactly one wire
//! name (metadata maps to one `meta-<key>` entry per key), and options left as
//! `None` produce nothing.
//!
//! | Option | Parameter | Encoding |
//! |--------|-----------|----------|
//! | `cid_version` | `cid-version` | decimal |
//! | `hash_function` | `hash` | verbatim |
//! | `raw_leaves`, `wrap_with_directory`, `stream_channels`, `no_pin`, `local` | kebab-case name | `"true"` / `"false"` |
//! | `format` | `format` | `unixfs` / `car` |
//! | `replication_factor_min` / `_max` | `replication-min` / `-max` | decimal |
//! | `user_allocations` | `user-allocations` | comma-joined |
//! | `metadata` | `meta-<key>` | one pair per entry |
//! | `expire_at` | `expire-at` | RFC 3339 |
//!
//! # Examples
//!
//! ```
//! use cluster_http_client::AddParams;
//! use cluster_http_client::protocol::encode_add_params;
//!
//! assert!(encode_add_params(&AddParams::default()).is_empty());
//!
//! let params = encode_add_params(&AddParams {
//!     raw_leaves: Some(false),
//!     user_allocations: Some(vec!["peerA".into(), "peerB".into()]),
//!     ..Default::default()
//! });
//! assert_eq!(params.get("raw-leaves"), Some("false"));
//! assert_eq!(params.get("user-allocations"), Some("peerA,peerB"));
//! ```

use super::constants::params as names;
use crate::error::{ClusterError, Result};
use crate::types::{AddParams, PinOptions, PinlsOptions, StatusOptions};
use chrono::SecondsFormat;
use std::collections::BTreeMap;

/// Ordered list of query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// An empty parameter list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((name.into(), value.into()));
    }

    /// Set a parameter, replacing any existing values of the same name.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.pairs.retain(|(n, _)| n != name);
        self.push(name, value);
    }

    /// First value of `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether `name` is present.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Whether no parameter is set.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Number of parameters, counting repeats.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Parameters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    fn opt_str(&mut self, name: &str, value: Option<&str>) {
        if let Some(value) = value {
            self.push(name, value);
        }
    }

    fn opt_bool(&mut self, name: &str, value: Option<bool>) {
        if let Some(value) = value {
            self.push(name, bool_str(value));
        }
    }

    fn opt_num<N: ToString>(&mut self, name: &str, value: Option<N>) {
        if let Some(value) = value {
            self.push(name, value.to_string());
        }
    }

    fn opt_list(&mut self, name: &str, values: Option<&[String]>) {
        if let Some(values) = values.filter(|v| !v.is_empty()) {
            self.push(name, values.join(","));
        }
    }

    fn metadata(&mut self, metadata: Option<&BTreeMap<String, String>>) {
        for (key, value) in metadata.into_iter().flatten() {
            self.push(format!("{}{}", names::META_PREFIX, key), value.as_str());
        }
    }
}

impl<'a> IntoIterator for &'a QueryParams {
    type Item = &'a (String, String);
    type IntoIter = std::slice::Iter<'a, (String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

#[inline]
fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// Encode options for the `add` endpoint.
pub fn encode_add_params(options: &AddParams) -> QueryParams {
    let mut params = QueryParams::new();
    params.opt_num(names::CID_VERSION, options.cid_version);
    params.opt_str(names::HASH, options.hash_function.as_deref());
    params.opt_str(names::CHUNKER, options.chunker.as_deref());
    params.opt_bool(names::RAW_LEAVES, options.raw_leaves);
    params.opt_str(names::FORMAT, options.format.map(|f| f.as_str()));
    params.opt_bool(names::WRAP_WITH_DIRECTORY, options.wrap_with_directory);
    params.opt_bool(names::STREAM_CHANNELS, options.stream_channels);
    params.opt_num(names::REPLICATION_MIN, options.replication_factor_min);
    params.opt_num(names::REPLICATION_MAX, options.replication_factor_max);
    params.opt_str(names::NAME, options.name.as_deref());
    params.opt_str(names::MODE, options.mode.map(|m| m.as_str()));
    params.opt_num(names::SHARD_SIZE, options.shard_size);
    params.opt_list(names::USER_ALLOCATIONS, options.user_allocations.as_deref());
    params.opt_bool(names::NO_PIN, options.no_pin);
    params.opt_bool(names::LOCAL, options.local);
    params.opt_str(names::EXPIRE_IN, options.expire_in.as_deref());
    params.metadata(options.metadata.as_ref());
    params
}

/// Encode options for `POST /pins/{cid}`.
pub fn encode_pin_params(options: &PinOptions) -> QueryParams {
    let mut params = QueryParams::new();
    params.opt_num(names::REPLICATION_MIN, options.replication_factor_min);
    params.opt_num(names::REPLICATION_MAX, options.replication_factor_max);
    params.opt_str(names::NAME, options.name.as_deref());
    params.opt_str(names::MODE, options.mode.map(|m| m.as_str()));
    params.opt_num(names::SHARD_SIZE, options.shard_size);
    params.opt_list(names::USER_ALLOCATIONS, options.user_allocations.as_deref());
    if let Some(expire_at) = options.expire_at {
        params.push(
            names::EXPIRE_AT,
            expire_at.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        );
    }
    params.opt_str(names::PIN_UPDATE, options.pin_update.as_deref());
    params.metadata(options.metadata.as_ref());
    params
}

/// Encode options for `status` and `recover`.
pub fn encode_status_params(options: &StatusOptions) -> QueryParams {
    let mut params = QueryParams::new();
    params.opt_bool(names::LOCAL, options.local);
    params
}

/// Encode options for `GET /allocations`.
pub fn encode_pinls_params(options: &PinlsOptions) -> QueryParams {
    let mut params = QueryParams::new();
    if let Some(filter) = options.filter.as_ref().filter(|f| !f.is_empty()) {
        let joined = filter
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(",");
        params.push(names::FILTER, joined);
    }
    params
}

/// Client-side checks for [`AddParams`].
pub fn validate_add_params(options: &AddParams) -> Result<()> {
    if let Some(version) = options.cid_version {
        if version > 1 {
            return Err(ClusterError::InvalidOption(format!(
                "cid_version must be 0 or 1, got {}",
                version
            )));
        }
    }
    validate_replication(options.replication_factor_min, options.replication_factor_max)?;
    validate_metadata(options.metadata.as_ref())
}

/// Client-side checks for [`PinOptions`].
pub fn validate_pin_options(options: &PinOptions) -> Result<()> {
    validate_replication(options.replication_factor_min, options.replication_factor_max)?;
    validate_metadata(options.metadata.as_ref())
}

fn validate_replication(min: Option<i32>, max: Option<i32>) -> Result<()> {
    for (label, factor) in [("replication_factor_min", min), ("replication_factor_max", max)] {
        if let Some(factor) = factor.filter(|f| *f < -1) {
            return Err(ClusterError::InvalidOption(format!(
                "{} must be -1 or greater, got {}",
                label, factor
            )));
        }
    }
    if let (Some(min), Some(max)) = (min, max) {
        if min > 0 && max > 0 && min > max {
            return Err(ClusterError::InvalidOption(format!(
                "replication_factor_min ({}) exceeds replication_factor_max ({})",
                min, max
            )));
        }
    }
    Ok(())
}

fn validate_metadata(metadata: Option<&BTreeMap<String, String>>) -> Result<()> {
    if metadata.into_iter().flatten().any(|(key, _)| key.is_empty()) {
        return Err(ClusterError::InvalidOption(
            "metadata keys must not be empty".to_string(),
        ));
    }
    Ok(())
}
