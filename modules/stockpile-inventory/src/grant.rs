//! Quantity grants against a user's inventory.
//!
//! Display metadata resolves from the mirror first, falling back to the
//! resilient catalog client when the item isn't mirrored yet. Resolution
//! happens before the inventory write, so a failed cold-path fetch leaves
//! inventory untouched and the caller can retry without double-applying.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use catalog_client::{CatalogClient, CatalogError};
use stockpile_common::{Repository, StoreError};

use crate::dtos::InventoryItemView;
use crate::entities::{CatalogItem, InventoryItem};

/// What a repeat grant for the same (user, item) pair does to the stored
/// quantity. Accumulate is the default; overwrite exists because the
/// upstream contract doesn't pin the semantics down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GrantPolicy {
    #[default]
    Accumulate,
    Overwrite,
}

impl GrantPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "accumulate" => Some(GrantPolicy::Accumulate),
            "overwrite" => Some(GrantPolicy::Overwrite),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum GrantError {
    #[error("quantity must be greater than zero")]
    InvalidQuantity,

    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("catalog metadata unavailable: {0}")]
    Catalog(#[from] CatalogError),
}

impl GrantError {
    /// Whether the caller may retry the same request.
    pub fn is_transient(&self) -> bool {
        match self {
            GrantError::InvalidQuantity => false,
            GrantError::Store(_) => true,
            GrantError::Catalog(err) => err.is_transient(),
        }
    }
}

pub struct GrantService {
    inventory: Arc<dyn Repository<InventoryItem>>,
    mirror: Arc<dyn Repository<CatalogItem>>,
    catalog: CatalogClient,
    policy: GrantPolicy,
}

impl GrantService {
    pub fn new(
        inventory: Arc<dyn Repository<InventoryItem>>,
        mirror: Arc<dyn Repository<CatalogItem>>,
        catalog: CatalogClient,
        policy: GrantPolicy,
    ) -> Self {
        Self {
            inventory,
            mirror,
            catalog,
            policy,
        }
    }

    /// Grant `quantity` units of an item to a user, returning the resulting
    /// record enriched with resolved metadata. Never returns a view with
    /// unresolved metadata: if both the mirror and the fallback fail, the
    /// failure surfaces.
    pub async fn grant(
        &self,
        user_id: Uuid,
        catalog_item_id: Uuid,
        quantity: u32,
    ) -> Result<InventoryItemView, GrantError> {
        if quantity == 0 {
            return Err(GrantError::InvalidQuantity);
        }

        let (name, description) = self.resolve_metadata(catalog_item_id).await?;

        let key = (user_id, catalog_item_id);
        let item = match self.inventory.get(&key).await? {
            Some(mut item) => {
                item.quantity = match self.policy {
                    GrantPolicy::Accumulate => item.quantity.saturating_add(quantity),
                    GrantPolicy::Overwrite => quantity,
                };
                self.inventory.update(item.clone()).await?;
                item
            }
            None => {
                let item = InventoryItem {
                    user_id,
                    catalog_item_id,
                    quantity,
                    acquired_date: Utc::now(),
                };
                self.inventory.create(item.clone()).await?;
                item
            }
        };

        info!(
            %user_id,
            %catalog_item_id,
            granted = quantity,
            total = item.quantity,
            "granted items"
        );
        Ok(InventoryItemView::from_item(&item, name, description))
    }

    /// All items held by a user, enriched from the mirror. The read path
    /// tolerates mirror lag: unmirrored items render with empty metadata
    /// rather than fanning out catalog fetches per item.
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<InventoryItemView>, GrantError> {
        let mut views = Vec::new();
        for item in self.inventory.list().await? {
            if item.user_id != user_id {
                continue;
            }
            let (name, description) = match self.mirror.get(&item.catalog_item_id).await? {
                Some(meta) => (meta.name, meta.description),
                None => (String::new(), String::new()),
            };
            views.push(InventoryItemView::from_item(&item, name, description));
        }
        Ok(views)
    }

    /// Mirror first; cold path falls back to the catalog service. The mirror
    /// is never written here — that belongs to the reconciler.
    async fn resolve_metadata(&self, catalog_item_id: Uuid) -> Result<(String, String), GrantError> {
        if let Some(item) = self.mirror.get(&catalog_item_id).await? {
            return Ok((item.name, item.description));
        }

        warn!(%catalog_item_id, "item not mirrored yet, fetching from catalog service");
        let dto = self.catalog.fetch_item(catalog_item_id).await?;
        Ok((dto.name, dto.description))
    }
}
