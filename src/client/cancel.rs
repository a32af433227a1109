//! Per-call cancellation.
//!
//! A [`CancelToken`] is handed to an operation through its options. Firing the
//! token while the request is in flight drops the underlying HTTP exchange and
//! makes the call fail with [`ClusterError::Cancelled`](crate::ClusterError::Cancelled).
//!
//! # Examples
//!
//! ```
//! use cluster_http_client::CancelToken;
//!
//! let token = CancelToken::new();
//! let shared = token.clone();
//! assert!(!shared.is_cancelled());
//!
//! token.cancel();
//! assert!(shared.is_cancelled());
//! ```

use std::sync::Arc;
use tokio::sync::watch;

/// Cooperative cancellation signal shared between a caller and one or more calls.
///
/// Clones observe the same state. Cancelling is idempotent and cannot be undone.
#[derive(Clone, Debug)]
pub struct CancelToken {
    sender: Arc<watch::Sender<bool>>,
}

impl CancelToken {
    /// Create a token that has not fired.
    pub fn new() -> Self {
        let (sender, _receiver) = watch::channel(false);
        CancelToken {
            sender: Arc::new(sender),
        }
    }

    /// Fire the token.
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    /// Whether the token has fired.
    pub fn is_cancelled(&self) -> bool {
        *self.sender.borrow()
    }

    /// Resolve once the token fires. Returns immediately if it already has.
    pub async fn cancelled(&self) {
        let mut receiver = self.sender.subscribe();
        // The sender lives as long as `self`, so `wait_for` only ends when the flag flips.
        let _ = receiver.wait_for(|fired| *fired).await;
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}
