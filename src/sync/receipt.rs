//! Handles returned from the write path.
//!
//! Dropping a receipt is fine: the remote work still happens, only the
//! outcome goes unobserved.

use tokio::sync::oneshot;

use super::state::RemoteOutcome;
use crate::remote::RemoteError;

#[derive(Debug)]
enum ReceiptState {
    Ready(RemoteOutcome),
    Pending(oneshot::Receiver<RemoteOutcome>),
}

/// Completion signal for one remote push.
#[derive(Debug)]
pub struct SyncReceipt {
    state: ReceiptState,
}

impl SyncReceipt {
    pub(crate) fn ready(outcome: RemoteOutcome) -> Self {
        Self {
            state: ReceiptState::Ready(outcome),
        }
    }

    pub(crate) fn pending(rx: oneshot::Receiver<RemoteOutcome>) -> Self {
        Self {
            state: ReceiptState::Pending(rx),
        }
    }

    /// Waits for the remote push carrying this write to finish.
    pub async fn outcome(self) -> RemoteOutcome {
        match self.state {
            ReceiptState::Ready(outcome) => outcome,
            ReceiptState::Pending(rx) => rx
                .await
                .unwrap_or(RemoteOutcome::Failed(RemoteError::WorkerStopped)),
        }
    }
}

/// Receipt for a delete: the local removal plus both remote effects.
#[derive(Debug)]
pub struct DeleteReceipt {
    /// The recipe was present locally
    pub removed: bool,
    /// Debounced push of the remaining collection
    pub upsert: SyncReceipt,
    /// Immediate remote delete of the row
    pub delete: SyncReceipt,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ready_receipt() {
        let receipt = SyncReceipt::ready(RemoteOutcome::LocalOnly);
        assert_eq!(receipt.outcome().await, RemoteOutcome::LocalOnly);
    }

    #[tokio::test]
    async fn test_pending_receipt_resolves() {
        let (tx, rx) = oneshot::channel();
        let receipt = SyncReceipt::pending(rx);
        tx.send(RemoteOutcome::Synced).unwrap();
        assert_eq!(receipt.outcome().await, RemoteOutcome::Synced);
    }

    #[tokio::test]
    async fn test_dropped_sender_reports_worker_stopped() {
        let (tx, rx) = oneshot::channel::<RemoteOutcome>();
        drop(tx);
        assert_eq!(
            SyncReceipt::pending(rx).outcome().await,
            RemoteOutcome::Failed(RemoteError::WorkerStopped)
        );
    }
}
