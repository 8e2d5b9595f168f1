//! Applies catalog lifecycle events to the local mirror.
//!
//! Both handlers are idempotent, so at-least-once redelivery is always safe.
//! Storage errors propagate uncaught: the transport must leave a failed
//! event unacknowledged and redeliver it, never drop it. Delivery order is
//! not guaranteed across event kinds; updates are last-write-wins with no
//! sequence check, so out-of-order delivery can leave stale metadata until
//! the next update lands. That is the accepted consistency model, not a bug.

use std::sync::Arc;

use tracing::{debug, info};

use stockpile_common::{Repository, StoreError};

use crate::entities::CatalogItem;
use crate::events::{CatalogItemCreated, CatalogItemUpdated};

pub struct CatalogMirror {
    repo: Arc<dyn Repository<CatalogItem>>,
}

impl CatalogMirror {
    pub fn new(repo: Arc<dyn Repository<CatalogItem>>) -> Self {
        Self { repo }
    }

    /// Create the mirror record, or no-op on a duplicate delivery.
    pub async fn on_created(&self, event: CatalogItemCreated) -> Result<(), StoreError> {
        if self.repo.get(&event.item_id).await?.is_some() {
            debug!(item_id = %event.item_id, "duplicate create delivery, skipping");
            return Ok(());
        }

        self.repo
            .create(CatalogItem {
                id: event.item_id,
                name: event.name,
                description: event.description,
            })
            .await?;
        info!(item_id = %event.item_id, "mirrored new catalog item");
        Ok(())
    }

    /// Overwrite name and description, or create the record if the create
    /// event was lost or hasn't arrived yet (self-heal).
    pub async fn on_updated(&self, event: CatalogItemUpdated) -> Result<(), StoreError> {
        match self.repo.get(&event.item_id).await? {
            Some(mut item) => {
                item.name = event.name;
                item.description = event.description;
                self.repo.update(item).await?;
                info!(item_id = %event.item_id, "mirror updated");
            }
            None => {
                self.repo
                    .create(CatalogItem {
                        id: event.item_id,
                        name: event.name,
                        description: event.description,
                    })
                    .await?;
                info!(item_id = %event.item_id, "mirror created from update event");
            }
        }
        Ok(())
    }
}
