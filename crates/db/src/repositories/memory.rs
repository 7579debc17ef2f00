use tokio::sync::RwLock;

use shopkeep_core::domain::item::{Item, ItemId, ItemPatch, NewItem};

use super::{ItemRepository, RepositoryError};

/// Insertion-ordered item store for tests and store-less runs.
#[derive(Default)]
pub struct InMemoryItemRepository {
    items: RwLock<Vec<Item>>,
}

impl InMemoryItemRepository {
    pub fn with_items(items: Vec<Item>) -> Self {
        Self { items: RwLock::new(items) }
    }
}

#[async_trait::async_trait]
impl ItemRepository for InMemoryItemRepository {
    async fn list(&self) -> Result<Vec<Item>, RepositoryError> {
        Ok(self.items.read().await.clone())
    }

    async fn find_by_id(&self, id: &ItemId) -> Result<Option<Item>, RepositoryError> {
        let items = self.items.read().await;
        Ok(items.iter().find(|item| &item.id == id).cloned())
    }

    async fn create(&self, new_item: NewItem) -> Result<Item, RepositoryError> {
        let item = Item::from_new(ItemId::generate(), new_item);
        self.items.write().await.push(item.clone());
        Ok(item)
    }

    async fn update(&self, id: &ItemId, patch: ItemPatch) -> Result<Option<Item>, RepositoryError> {
        let mut items = self.items.write().await;
        Ok(items.iter_mut().find(|item| &item.id == id).map(|item| {
            item.apply(patch);
            item.clone()
        }))
    }

    async fn delete(&self, id: &ItemId) -> Result<Option<Item>, RepositoryError> {
        let mut items = self.items.write().await;
        let position = items.iter().position(|item| &item.id == id);
        Ok(position.map(|index| items.remove(index)))
    }
}
