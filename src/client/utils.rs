//! Path building helpers for CID-bearing endpoints.
//!
//! Identifiers are rejected when they would resolve outside their endpoint:
//! empty values and `.`/`..` segments never reach the wire.
//!
//! # Examples
//!
//! ```
//! use cluster_http_client::client::{pin_path, cid_path};
//!
//! assert_eq!(pin_path("bafyxyz").unwrap(), "pins/bafyxyz");
//! assert_eq!(pin_path("/ipfs/bafyxyz").unwrap(), "pins/ipfs/bafyxyz");
//! assert_eq!(cid_path("allocations", "bafyxyz").unwrap(), "allocations/bafyxyz");
//! assert!(pin_path("/ipfs/../version").is_err());
//! ```

use crate::error::{ClusterError, Result};
use crate::protocol::constants::paths;

/// Percent-escape one path segment.
pub fn escape_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

fn checked_segment(segment: &str, original: &str) -> Result<String> {
    match segment {
        "" => Err(ClusterError::InvalidOption(format!(
            "empty path segment in {:?}",
            original
        ))),
        "." | ".." => Err(ClusterError::InvalidOption(format!(
            "relative path segment {:?} in {:?}",
            segment, original
        ))),
        _ => Ok(escape_segment(segment)),
    }
}

/// Path for pinning and unpinning.
///
/// A bare CID becomes `pins/<cid>`. A value starting with `/` is a rooted path
/// (e.g. `/ipfs/<cid>/sub`) and is appended beneath `pins` one segment at a time.
/// Empty segments from doubled or trailing slashes are skipped, but the path
/// must keep at least one segment.
pub fn pin_path(cid_or_path: &str) -> Result<String> {
    match cid_or_path.strip_prefix('/') {
        Some(rooted) => {
            let segments = rooted
                .split('/')
                .filter(|s| !s.is_empty())
                .map(|s| checked_segment(s, cid_or_path))
                .collect::<Result<Vec<_>>>()?;
            if segments.is_empty() {
                return Err(ClusterError::InvalidOption(format!(
                    "pin path {:?} names nothing",
                    cid_or_path
                )));
            }
            Ok(format!("{}/{}", paths::PINS, segments.join("/")))
        }
        None => cid_path(paths::PINS, cid_or_path),
    }
}

/// `<prefix>/<escaped cid>`.
pub fn cid_path(prefix: &str, cid: &str) -> Result<String> {
    Ok(format!("{}/{}", prefix, checked_segment(cid, cid)?))
}

/// Check whether a status code means access was denied.
pub fn is_access_denied_status(status: u16) -> bool {
    matches!(status, 401 | 403)
}
