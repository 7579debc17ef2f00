use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqliteConnection;
use tokio::sync::OnceCell;
use tracing::info;

use crate::migrations::MIGRATOR;

pub type DbPool = sqlx::SqlitePool;

pub async fn connect(database_url: &str) -> Result<DbPool, sqlx::Error> {
    connect_with_settings(database_url, 5, 30).await
}

pub async fn connect_with_settings(
    database_url: &str,
    max_connections: u32,
    timeout_secs: u64,
) -> Result<DbPool, sqlx::Error> {
    pool_options(max_connections, timeout_secs)
        .after_connect(|conn, _meta| Box::pin(async move { apply_pragmas(conn).await }))
        .connect(database_url)
        .await
}

/// Builds a pool that opens connections on first use, so a store that is down at
/// startup only fails the requests that touch it.
///
/// The first connection that opens applies pending migrations before it is handed
/// out. A failed attempt leaves the schema unmarked and the next connection retries.
pub fn connect_lazy(
    database_url: &str,
    max_connections: u32,
    timeout_secs: u64,
) -> Result<DbPool, sqlx::Error> {
    let options = database_url.parse::<SqliteConnectOptions>()?;
    let schema_ready: Arc<OnceCell<()>> = Arc::new(OnceCell::new());

    let pool = pool_options(max_connections, timeout_secs)
        .after_connect(move |conn, _meta| {
            let schema_ready = Arc::clone(&schema_ready);
            Box::pin(async move {
                apply_pragmas(conn).await?;
                schema_ready
                    .get_or_try_init(|| async move {
                        MIGRATOR.run_direct(conn).await?;
                        info!(
                            event_name = "db.migrations.applied_on_reconnect",
                            "store reachable; pending migrations applied"
                        );
                        Ok::<(), sqlx::Error>(())
                    })
                    .await?;
                Ok(())
            })
        })
        .connect_lazy_with(options);
    Ok(pool)
}

fn pool_options(max_connections: u32, timeout_secs: u64) -> SqlitePoolOptions {
    SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .acquire_timeout(Duration::from_secs(timeout_secs.max(1)))
}

async fn apply_pragmas(conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    sqlx::query("PRAGMA journal_mode = WAL").execute(&mut *conn).await?;
    sqlx::query("PRAGMA busy_timeout = 5000").execute(&mut *conn).await?;
    Ok(())
}
