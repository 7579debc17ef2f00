use tracing::info;

use crate::connection::DbPool;
use crate::repositories::RepositoryError;

/// Demo inventory loaded by `shopkeep seed`. Ids are fixed so reloading is a no-op.
const SEED_ITEMS: &[SeedItem] = &[
    SeedItem { id: "5e1d0c0a9b8f4a7e8c6d5b4a3f2e1d01", name: "Pen", price: "10" },
    SeedItem { id: "5e1d0c0a9b8f4a7e8c6d5b4a3f2e1d02", name: "Notebook", price: "45.5" },
    SeedItem { id: "5e1d0c0a9b8f4a7e8c6d5b4a3f2e1d03", name: "Stapler", price: "120" },
    SeedItem { id: "5e1d0c0a9b8f4a7e8c6d5b4a3f2e1d04", name: "Desk Lamp", price: "1499" },
];

struct SeedItem {
    id: &'static str,
    name: &'static str,
    price: &'static str,
}

pub struct SeedDataset;

impl SeedDataset {
    /// Inserts the demo items that are not already present.
    pub async fn load(pool: &DbPool) -> Result<SeedResult, RepositoryError> {
        let mut tx = pool.begin().await?;
        let mut inserted = 0;

        for item in SEED_ITEMS {
            let result = sqlx::query(
                "INSERT INTO item (id, name, price) VALUES (?1, ?2, ?3)
                 ON CONFLICT(id) DO NOTHING",
            )
            .bind(item.id)
            .bind(item.name)
            .bind(item.price)
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;
        info!(
            event_name = "db.seed.loaded",
            inserted,
            total = SEED_ITEMS.len(),
            "demo inventory loaded"
        );

        Ok(SeedResult {
            inserted,
            item_names: SEED_ITEMS.iter().map(|item| item.name).collect(),
        })
    }

    /// Checks that every demo item exists with its seeded name and price.
    pub async fn verify(pool: &DbPool) -> Result<VerificationResult, RepositoryError> {
        let mut checks = Vec::with_capacity(SEED_ITEMS.len());

        for item in SEED_ITEMS {
            let present: i64 = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM item WHERE id = ?1 AND name = ?2 AND price = ?3)",
            )
            .bind(item.id)
            .bind(item.name)
            .bind(item.price)
            .fetch_one(pool)
            .await?;
            checks.push((item.name, present == 1));
        }

        let all_present = checks.iter().all(|(_, passed)| *passed);
        Ok(VerificationResult { all_present, checks })
    }
}

#[derive(Debug)]
pub struct SeedResult {
    pub inserted: u64,
    pub item_names: Vec<&'static str>,
}

#[derive(Debug)]
pub struct VerificationResult {
    pub all_present: bool,
    pub checks: Vec<(&'static str, bool)>,
}
