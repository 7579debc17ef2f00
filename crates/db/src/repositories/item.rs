use std::str::FromStr;

use rust_decimal::Decimal;
use sqlx::Row;

use shopkeep_core::domain::item::{Item, ItemId, ItemPatch, NewItem};

use super::{ItemRepository, RepositoryError};
use crate::DbPool;

pub struct SqlItemRepository {
    pool: DbPool,
}

impl SqlItemRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_item(row: &sqlx::sqlite::SqliteRow) -> Result<Item, RepositoryError> {
    let id: String = row.try_get("id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let name: String = row.try_get("name").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let price_str: String =
        row.try_get("price").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let price = Decimal::from_str(&price_str)
        .map_err(|e| RepositoryError::Decode(format!("item `{id}` has invalid price: {e}")))?;

    Ok(Item { id: ItemId(id), name, price })
}

fn price_as_str(price: Decimal) -> String {
    price.normalize().to_string()
}

#[async_trait::async_trait]
impl ItemRepository for SqlItemRepository {
    async fn list(&self) -> Result<Vec<Item>, RepositoryError> {
        let rows = sqlx::query("SELECT id, name, price FROM item ORDER BY rowid")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_item).collect()
    }

    async fn find_by_id(&self, id: &ItemId) -> Result<Option<Item>, RepositoryError> {
        let row = sqlx::query("SELECT id, name, price FROM item WHERE id = ?")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_item).transpose()
    }

    async fn create(&self, new_item: NewItem) -> Result<Item, RepositoryError> {
        let item = Item::from_new(ItemId::generate(), new_item);

        sqlx::query("INSERT INTO item (id, name, price) VALUES (?, ?, ?)")
            .bind(item.id.as_str())
            .bind(&item.name)
            .bind(price_as_str(item.price))
            .execute(&self.pool)
            .await?;

        Ok(item)
    }

    async fn update(&self, id: &ItemId, patch: ItemPatch) -> Result<Option<Item>, RepositoryError> {
        let row = sqlx::query(
            "UPDATE item SET
                 name = COALESCE(?, name),
                 price = COALESCE(?, price)
             WHERE id = ?
             RETURNING id, name, price",
        )
        .bind(patch.name)
        .bind(patch.price.map(price_as_str))
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_item).transpose()
    }

    async fn delete(&self, id: &ItemId) -> Result<Option<Item>, RepositoryError> {
        let row = sqlx::query("DELETE FROM item WHERE id = ? RETURNING id, name, price")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_item).transpose()
    }
}
