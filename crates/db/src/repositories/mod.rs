use async_trait::async_trait;
use thiserror::Error;

use shopkeep_core::domain::item::{Item, ItemId, ItemPatch, NewItem};

pub mod item;
pub mod memory;

pub use item::SqlItemRepository;
pub use memory::InMemoryItemRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

/// Store operations behind the `/product` routes. Each call is one independent
/// read or write; there is no locking and the last write wins.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Item>, RepositoryError>;
    async fn find_by_id(&self, id: &ItemId) -> Result<Option<Item>, RepositoryError>;
    async fn create(&self, new_item: NewItem) -> Result<Item, RepositoryError>;
    /// Returns the updated record, or `None` when no record has `id`.
    async fn update(&self, id: &ItemId, patch: ItemPatch) -> Result<Option<Item>, RepositoryError>;
    /// Returns the removed record, or `None` when no record has `id`.
    async fn delete(&self, id: &ItemId) -> Result<Option<Item>, RepositoryError>;
}
