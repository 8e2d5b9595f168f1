use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Catalog item metadata as served by the catalog service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItemDto {
    pub id: Uuid,
    pub name: String,
    pub description: String,
}
