//! In-process at-least-once delivery loop.
//!
//! Stands in for a broker consumer: events enter through `EventInbox` and a
//! handler error requeues the event after a short delay instead of dropping
//! it. Redelivery is unordered relative to newer events, matching the
//! assumed broker semantics; the reconciler's idempotence makes that safe.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{error, warn};

use stockpile_common::StoreError;

use crate::events::CatalogEvent;
use crate::reconcile::CatalogMirror;

/// Delay before a failed event is redelivered.
const REDELIVERY_DELAY: Duration = Duration::from_secs(1);

/// Handle for enqueueing catalog events into the consumer loop.
#[derive(Clone)]
pub struct EventInbox {
    tx: mpsc::UnboundedSender<CatalogEvent>,
}

impl EventInbox {
    /// Returns false if the consumer loop has shut down.
    pub fn publish(&self, event: CatalogEvent) -> bool {
        self.tx.send(event).is_ok()
    }
}

/// Build the inbox and its consumer loop; spawn the returned future.
pub fn consumer(mirror: Arc<CatalogMirror>) -> (EventInbox, impl Future<Output = ()>) {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let inbox = EventInbox { tx: tx.clone() };

    let run = async move {
        while let Some(event) = rx.recv().await {
            if let Err(err) = apply(&mirror, event.clone()).await {
                warn!(error = %err, "event handler failed, scheduling redelivery");
                let tx = tx.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(REDELIVERY_DELAY).await;
                    if tx.send(event).is_err() {
                        error!("inbox closed, redelivery lost");
                    }
                });
            }
        }
    };

    (inbox, run)
}

async fn apply(mirror: &CatalogMirror, event: CatalogEvent) -> Result<(), StoreError> {
    match event {
        CatalogEvent::CatalogItemCreated(created) => mirror.on_created(created).await,
        CatalogEvent::CatalogItemUpdated(updated) => mirror.on_updated(updated).await,
    }
}
