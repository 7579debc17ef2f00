use sqlx::migrate::{MigrateError, Migrator};
use tracing::debug;

use crate::DbPool;

pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

pub async fn run_pending(pool: &DbPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await?;
    debug!(
        event_name = "db.migrations.applied",
        embedded = MIGRATOR.iter().count(),
        "pending migrations applied"
    );
    Ok(())
}

/// Applied and embedded migration counts. Nothing is applied until the history
/// table exists.
pub async fn status(pool: &DbPool) -> Result<MigrationStatus, sqlx::Error> {
    let expected = MIGRATOR.iter().count() as u64;
    let history_exists: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = '_sqlx_migrations'",
    )
    .fetch_one(pool)
    .await?;
    if history_exists == 0 {
        return Ok(MigrationStatus { applied: 0, expected });
    }

    let applied: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
            .fetch_one(pool)
            .await?;
    Ok(MigrationStatus { applied: applied.max(0) as u64, expected })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MigrationStatus {
    pub applied: u64,
    pub expected: u64,
}

impl MigrationStatus {
    pub fn is_current(&self) -> bool {
        self.applied >= self.expected
    }
}
