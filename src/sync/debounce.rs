//! Debounced push of the recipe collection.
//!
//! A single worker task owns the pending snapshot. Every queued snapshot
//! replaces the pending one and restarts the quiet period; when the period
//! elapses the latest snapshot is sent in one `upsert_many` call and every
//! write folded into it gets the same outcome. Writes queued while a push is
//! in flight start the next window.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

use super::coordinator::Shared;
use super::state::RemoteOutcome;
use crate::models::Recipe;
use crate::remote::RemoteStore;

/// One write waiting to be pushed.
pub(crate) struct PendingPush {
    pub recipes: Vec<Recipe>,
    pub reply: Option<oneshot::Sender<RemoteOutcome>>,
}

pub(crate) async fn run_worker(
    mut rx: mpsc::UnboundedReceiver<PendingPush>,
    remote: Arc<dyn RemoteStore>,
    shared: Arc<Shared>,
    delay: Duration,
) {
    while let Some(first) = rx.recv().await {
        let mut snapshot = first.recipes;
        let mut waiters: Vec<_> = first.reply.into_iter().collect();
        let mut coalesced = 0usize;

        loop {
            tokio::select! {
                _ = tokio::time::sleep(delay) => break,
                next = rx.recv() => match next {
                    Some(push) => {
                        snapshot = push.recipes;
                        waiters.extend(push.reply);
                        coalesced += 1;
                    }
                    // Queue closed: push what we have right away
                    None => break,
                },
            }
        }

        if coalesced > 0 {
            tracing::debug!("Coalesced {} write(s) into one push", coalesced + 1);
        }

        let outcome: RemoteOutcome = match remote.upsert_many(&snapshot).await {
            Ok(()) => {
                shared.record_upsert_success(snapshot.len());
                RemoteOutcome::Synced
            }
            Err(e) => {
                shared.record_upsert_failure(e.clone());
                RemoteOutcome::Failed(e)
            }
        };

        for waiter in waiters {
            let _ = waiter.send(outcome.clone());
        }
    }

    tracing::debug!("Sync worker stopped");
}
