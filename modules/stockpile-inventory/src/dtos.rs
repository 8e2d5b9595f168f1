use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::InventoryItem;

/// Body of a grant request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantItemsRequest {
    pub user_id: Uuid,
    pub catalog_item_id: Uuid,
    pub quantity: u32,
}

/// Inventory record enriched with display metadata from the mirror.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItemView {
    pub catalog_item_id: Uuid,
    pub name: String,
    pub description: String,
    pub quantity: u32,
    pub acquired_date: DateTime<Utc>,
}

impl InventoryItemView {
    pub fn from_item(item: &InventoryItem, name: String, description: String) -> Self {
        Self {
            catalog_item_id: item.catalog_item_id,
            name,
            description,
            quantity: item.quantity,
            acquired_date: item.acquired_date,
        }
    }
}
