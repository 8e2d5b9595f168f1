pub mod config;
pub mod repository;

pub use config::Config;
pub use repository::{Entity, MemoryRepository, Repository, StoreError};
