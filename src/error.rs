//! Error types for cluster API calls.
//!
//! Every failure a [`ClusterClient`](crate::ClusterClient) call can produce is a
//! [`ClusterError`]. The variants split along where the failure happened:
//!
//! | Variant | Meaning |
//! |---------|---------|
//! | [`ClusterError::Transport`] | No response came back (DNS, TLS, connection reset, timeout) |
//! | [`ClusterError::Api`] | The cluster answered with a non-2xx status |
//! | [`ClusterError::Cancelled`] | The caller fired the call's [`CancelToken`](crate::CancelToken) |
//! | [`ClusterError::InvalidOption`] | Client-side option validation rejected the request |
//! | [`ClusterError::Decode`] | A 2xx body did not have the expected shape |
//!
//! Nothing in this crate retries or substitutes defaults; errors always reach the caller.

use serde_json::Value;

/// Boxed error carried by [`ClusterError::Transport`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, ClusterError>;

/// Errors returned by the cluster client.
#[derive(Debug, thiserror::Error)]
pub enum ClusterError {
    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    /// The cluster responded with a non-success status code.
    #[error("cluster API error {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// The `message` field of the error body, or the raw body text.
        message: String,
        /// Canonical reason phrase for `status`, when one exists.
        status_text: Option<String>,
        /// Decoded JSON error body, when the body was JSON.
        body: Option<Value>,
    },

    /// The call was cancelled through its cancellation token.
    #[error("request cancelled")]
    Cancelled,

    /// An option failed client-side validation.
    #[error("invalid option: {0}")]
    InvalidOption(String),

    /// A success response could not be decoded into the expected shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// The endpoint URL or a request path could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The client could not be constructed from the given configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ClusterError {
    /// HTTP status code, for [`ClusterError::Api`] errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClusterError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the caller cancelled the call.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ClusterError::Cancelled)
    }

    /// Whether the cluster reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Whether the cluster rejected the credentials.
    pub fn is_access_denied(&self) -> bool {
        self.status()
            .is_some_and(crate::client::is_access_denied_status)
    }

    pub(crate) fn transport<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        ClusterError::Transport(err.into())
    }
}

impl From<serde_json::Error> for ClusterError {
    fn from(err: serde_json::Error) -> Self {
        ClusterError::Decode(err.to_string())
    }
}
