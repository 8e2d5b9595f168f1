//! Catalog lifecycle contracts, as published by the catalog service. All
//! fields required; field names match the wire format.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItemCreated {
    pub item_id: Uuid,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItemUpdated {
    pub item_id: Uuid,
    pub name: String,
    pub description: String,
}

/// Envelope accepted by the event intake. Tagged by event kind:
/// `{"type": "CatalogItemCreated", "itemId": ..., ...}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum CatalogEvent {
    CatalogItemCreated(CatalogItemCreated),
    CatalogItemUpdated(CatalogItemUpdated),
}
