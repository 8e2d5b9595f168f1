//! Per-user inventory over an eventually-consistent catalog mirror.
//!
//! The mirror is kept correct by idempotent consumers of catalog lifecycle
//! events (at-least-once, unordered delivery); grants enrich inventory
//! records with mirror metadata, falling back to the resilient catalog
//! client on cold starts.

pub mod dispatch;
pub mod dtos;
pub mod entities;
pub mod events;
pub mod grant;
pub mod reconcile;

pub use dispatch::EventInbox;
pub use dtos::{GrantItemsRequest, InventoryItemView};
pub use entities::{CatalogItem, InventoryItem};
pub use events::{CatalogEvent, CatalogItemCreated, CatalogItemUpdated};
pub use grant::{GrantError, GrantPolicy, GrantService};
pub use reconcile::CatalogMirror;
