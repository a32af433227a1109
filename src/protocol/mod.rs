//! Wire-level handling of the cluster REST API.
//!
//! Everything here is pure: no I/O, no shared state.
//!
//! - **[params]** - option structs to query parameters
//! - **[multipart]** - upload bodies for the `add` endpoint
//! - **wire** - raw response shapes as the server sends them
//! - **[normalize]** - wire shapes to the crate's response types

pub mod multipart;
pub mod normalize;
pub mod params;
pub(crate) mod wire;

pub use multipart::{MultipartBody, Part};
pub use params::{
    encode_add_params, encode_pin_params, encode_pinls_params, encode_status_params,
    validate_add_params, validate_pin_options, QueryParams,
};

/// Protocol constants.
pub mod constants {
    /// Key of the single-entry object the API wraps every CID in.
    pub const LINK_KEY: &str = "/";

    /// Multipart field name for uploaded files.
    pub const FILE_FIELD: &str = "file";

    /// Content type used when none can be inferred.
    pub const OCTET_STREAM: &str = "application/octet-stream";

    /// Content type of CAR uploads.
    pub const CAR_CONTENT_TYPE: &str = "application/vnd.ipld.car";

    /// Go's zero `time.Time`, sent for "never expires".
    pub const ZERO_TIME: &str = "0001-01-01T00:00:00Z";

    /// Endpoint paths, relative to the API root.
    pub mod paths {
        /// `POST` uploads.
        pub const ADD: &str = "add";
        /// Pin, unpin and status, suffixed with the CID.
        pub const PINS: &str = "pins";
        /// Pin set listing, or one pin record with a CID suffix.
        pub const ALLOCATIONS: &str = "allocations";
        /// Suffix appended to `pins/<cid>`.
        pub const RECOVER: &str = "recover";
        /// Metric names, or one metric with a name suffix.
        pub const METRICS: &str = "monitor/metrics";
        /// Cluster version.
        pub const VERSION: &str = "version";
        /// Peer identity.
        pub const ID: &str = "id";
    }

    /// Query parameter names.
    pub mod params {
        /// CID version of added content.
        pub const CID_VERSION: &str = "cid-version";
        /// Multihash function.
        pub const HASH: &str = "hash";
        /// Chunking algorithm.
        pub const CHUNKER: &str = "chunker";
        /// Raw leaf blocks.
        pub const RAW_LEAVES: &str = "raw-leaves";
        /// `unixfs` or `car`.
        pub const FORMAT: &str = "format";
        /// Wrap uploads in a directory.
        pub const WRAP_WITH_DIRECTORY: &str = "wrap-with-directory";
        /// Newline-delimited JSON output.
        pub const STREAM_CHANNELS: &str = "stream-channels";
        /// Minimum replication factor.
        pub const REPLICATION_MIN: &str = "replication-min";
        /// Maximum replication factor.
        pub const REPLICATION_MAX: &str = "replication-max";
        /// Pin name.
        pub const NAME: &str = "name";
        /// Pin mode.
        pub const MODE: &str = "mode";
        /// Shard size in bytes.
        pub const SHARD_SIZE: &str = "shard-size";
        /// Comma-separated peer IDs.
        pub const USER_ALLOCATIONS: &str = "user-allocations";
        /// Add without pinning.
        pub const NO_PIN: &str = "no-pin";
        /// Restrict to the contacted peer.
        pub const LOCAL: &str = "local";
        /// Relative expiry, as a Go duration.
        pub const EXPIRE_IN: &str = "expire-in";
        /// Absolute expiry, RFC 3339.
        pub const EXPIRE_AT: &str = "expire-at";
        /// CID of the pin being updated.
        pub const PIN_UPDATE: &str = "pin-update";
        /// Comma-separated pin types.
        pub const FILTER: &str = "filter";
        /// Prefix of metadata parameters.
        pub const META_PREFIX: &str = "meta-";
    }
}
