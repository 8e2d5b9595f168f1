use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use stockpile_common::Entity;

/// Locally mirrored copy of externally-owned catalog metadata. Written only
/// by the reconciler; at most one record per id; never deleted here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogItem {
    pub id: Uuid,
    pub name: String,
    pub description: String,
}

impl Entity for CatalogItem {
    type Key = Uuid;

    fn key(&self) -> Uuid {
        self.id
    }
}

/// A user's holding of one catalog item. `catalog_item_id` references the
/// mirror by value only — the mirror may lag or be absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InventoryItem {
    pub user_id: Uuid,
    pub catalog_item_id: Uuid,
    pub quantity: u32,
    /// Timestamp of the first grant for this (user, item) pair.
    pub acquired_date: DateTime<Utc>,
}

impl Entity for InventoryItem {
    type Key = (Uuid, Uuid);

    fn key(&self) -> (Uuid, Uuid) {
        (self.user_id, self.catalog_item_id)
    }
}
