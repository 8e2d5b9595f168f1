//! Generic keyed entity store. Domain-agnostic: consumers bring their own
//! entity types and key shapes.
//!
//! The trait is the seam a document store plugs into. `MemoryRepository` is
//! the bundled implementation, backing tests and single-node runs; it
//! serializes read-modify-write per call via a single `RwLock`, and `create`
//! rejecting duplicate keys is what resolves concurrent same-key races.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("entity already exists: {0}")]
    AlreadyExists(String),

    #[error("entity not found: {0}")]
    NotFound(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// A storable record with a stable key.
pub trait Entity: Clone + Send + Sync + 'static {
    type Key: Clone + Eq + Hash + Debug + Send + Sync;

    fn key(&self) -> Self::Key;
}

#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    async fn get(&self, key: &T::Key) -> Result<Option<T>>;

    /// Insert a new entity. Fails with `AlreadyExists` if the key is taken.
    async fn create(&self, entity: T) -> Result<()>;

    /// Replace an existing entity. Fails with `NotFound` if the key is absent.
    async fn update(&self, entity: T) -> Result<()>;

    /// Full scan. Callers filter in the service layer.
    async fn list(&self) -> Result<Vec<T>>;
}

pub struct MemoryRepository<T: Entity> {
    entries: RwLock<HashMap<T::Key, T>>,
}

impl<T: Entity> MemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<T: Entity> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for MemoryRepository<T> {
    async fn get(&self, key: &T::Key) -> Result<Option<T>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn create(&self, entity: T) -> Result<()> {
        let mut entries = self.entries.write().await;
        match entries.entry(entity.key()) {
            Entry::Occupied(occupied) => {
                Err(StoreError::AlreadyExists(format!("{:?}", occupied.key())))
            }
            Entry::Vacant(vacant) => {
                vacant.insert(entity);
                Ok(())
            }
        }
    }

    async fn update(&self, entity: T) -> Result<()> {
        let mut entries = self.entries.write().await;
        let key = entity.key();
        match entries.get_mut(&key) {
            Some(slot) => {
                *slot = entity;
                Ok(())
            }
            None => Err(StoreError::NotFound(format!("{key:?}"))),
        }
    }

    async fn list(&self) -> Result<Vec<T>> {
        Ok(self.entries.read().await.values().cloned().collect())
    }
}
