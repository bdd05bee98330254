//! Observable sync state and outcomes.

use std::fmt;

use crate::remote::RemoteError;

/// Message shown once when the startup read of the remote fails.
pub const HYDRATION_NOTICE: &str =
    "Could not reach the shared recipe table. Showing the recipes stored on this device for now.";

/// Snapshot of the coordinator's state.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncStatus {
    /// A remote store is configured
    pub enabled: bool,
    /// The startup read has finished (or was never needed)
    pub ready: bool,
    /// Most recent remote failure, cleared by the next successful push
    pub last_error: Option<RemoteError>,
}

impl SyncStatus {
    /// Informational line for local-only mode.
    pub fn banner(&self) -> Option<&'static str> {
        (!self.enabled).then_some("Local mode: recipes are stored on this device only.")
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = if self.enabled { "remote" } else { "local" };
        writeln!(f, "Mode: {}", mode)?;
        writeln!(f, "Ready: {}", if self.ready { "yes" } else { "no" })?;
        match &self.last_error {
            Some(e) => writeln!(f, "Last error: {}", e),
            None => writeln!(f, "Last error: none"),
        }
    }
}

/// What the startup read did to the local recipe collection.
#[derive(Debug, Clone, PartialEq)]
pub enum HydrationOutcome {
    /// No remote configured
    LocalOnly,
    /// The remote rows replaced the local collection
    Replaced(usize),
    /// The remote was empty; this many local recipes were queued for upload
    Seeded(usize),
    /// Both sides were empty
    Empty,
    /// The remote could not be read; local data is used as-is
    Failed(RemoteError),
    /// Hydration had already run on this coordinator
    AlreadyHydrated,
}

/// Result of pushing a local write to the remote.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteOutcome {
    /// No remote configured; the local write is all there is
    LocalOnly,
    Synced,
    Failed(RemoteError),
}

impl RemoteOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, RemoteOutcome::Failed(_))
    }
}

impl From<Result<(), RemoteError>> for RemoteOutcome {
    fn from(result: Result<(), RemoteError>) -> Self {
        match result {
            Ok(()) => RemoteOutcome::Synced,
            Err(e) => RemoteOutcome::Failed(e),
        }
    }
}

/// Broadcast to every subscriber as remote work completes.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    Hydrated(HydrationOutcome),
    Upserted { count: usize },
    UpsertFailed(RemoteError),
    Deleted { id: String },
    DeleteFailed { id: String, error: RemoteError },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_only_in_local_mode() {
        let mut status = SyncStatus {
            enabled: false,
            ready: true,
            last_error: None,
        };
        assert!(status.banner().is_some());

        status.enabled = true;
        assert!(status.banner().is_none());
    }

    #[test]
    fn test_status_display() {
        let status = SyncStatus {
            enabled: true,
            ready: true,
            last_error: Some(RemoteError::Transport("timed out".into())),
        };
        let output = status.to_string();
        assert!(output.contains("Mode: remote"));
        assert!(output.contains("Last error: Transport error: timed out"));
    }

    #[test]
    fn test_remote_outcome_from_result() {
        assert_eq!(RemoteOutcome::from(Ok(())), RemoteOutcome::Synced);
        let failed = RemoteOutcome::from(Err(RemoteError::NotConfigured));
        assert!(failed.is_failure());
    }
}
