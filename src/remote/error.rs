//! Remote store error types.

use thiserror::Error;

/// Errors produced by a remote store.
///
/// Messages are captured as strings so the error can be cloned into the
/// sync status and handed to every caller waiting on the same push.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// No endpoint URL or access key was supplied
    #[error("Remote store not configured. Set remote.url and remote.key in config.")]
    NotConfigured,
    #[error("Invalid remote URL '{0}'")]
    InvalidUrl(String),
    /// The request never produced a response
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Remote returned status {status}: {body}")]
    Status { status: u16, body: String },
    /// The response body was not the expected shape
    #[error("Failed to decode remote response: {0}")]
    Decode(String),
    /// The background sync task is gone
    #[error("Sync worker stopped before the request completed")]
    WorkerStopped,
}

impl RemoteError {
    /// True for failures that say nothing about the remote itself.
    pub fn is_configuration(&self) -> bool {
        matches!(self, RemoteError::NotConfigured | RemoteError::InvalidUrl(_))
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            RemoteError::Decode(e.to_string())
        } else {
            RemoteError::Transport(e.to_string())
        }
    }
}
