use std::sync::Arc;

use shopkeep_core::config::{AppConfig, ConfigError, LoadOptions};
use shopkeep_db::repositories::{ItemRepository, SqlItemRepository};
use shopkeep_db::{connect_lazy, connect_with_settings, migrations, DbPool};
use thiserror::Error;
use tracing::{error, info};

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub items: Arc<dyn ItemRepository>,
    /// False when the store was unreachable at startup and the pool is lazy.
    /// The lazy pool migrates on its first successful connection.
    pub store_ready: bool,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

/// Connects the store and applies migrations. A store that cannot be reached is
/// logged once; the service still starts on a lazy pool, store-backed requests
/// fail until it comes back, and the first connection that succeeds applies the
/// pending migrations.
pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let database = &config.database;
    let (db_pool, store_ready) =
        match connect_with_settings(&database.url, database.max_connections, database.timeout_secs)
            .await
        {
            Ok(pool) => {
                info!(
                    event_name = "system.bootstrap.database_connected",
                    correlation_id = "bootstrap",
                    "database connection established"
                );
                (pool, true)
            }
            Err(connect_error) => {
                error!(
                    event_name = "system.bootstrap.database_unavailable",
                    correlation_id = "bootstrap",
                    error = %connect_error,
                    "database connection failed; continuing without a live store"
                );
                let pool =
                    connect_lazy(&database.url, database.max_connections, database.timeout_secs)
                        .map_err(BootstrapError::DatabaseConnect)?;
                (pool, false)
            }
        };

    if store_ready {
        migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
        info!(
            event_name = "system.bootstrap.migrations_applied",
            correlation_id = "bootstrap",
            "database migrations applied"
        );
    }

    let items: Arc<dyn ItemRepository> = Arc::new(SqlItemRepository::new(db_pool.clone()));

    Ok(Application { config, db_pool, items, store_ready })
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use shopkeep_core::config::{ConfigOverrides, LoadOptions};
    use shopkeep_core::NewItem;

    use crate::bootstrap::bootstrap;

    fn options(database_url: &str) -> LoadOptions {
        LoadOptions {
            overrides: ConfigOverrides {
                database_url: Some(database_url.to_string()),
                database_max_connections: Some(1),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        }
    }

    #[tokio::test]
    async fn bootstrap_migrates_and_wires_the_item_store() {
        let app = bootstrap(options("sqlite::memory:")).await.expect("bootstrap should succeed");
        assert!(app.store_ready);

        let (table_count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'item'",
        )
        .fetch_one(&app.db_pool)
        .await
        .expect("item table should exist after bootstrap");
        assert_eq!(table_count, 1);

        let pen = app.items.create(NewItem::new("Pen", Decimal::from(10))).await.expect("create");
        assert_eq!(app.items.list().await.expect("list"), vec![pen]);

        app.db_pool.close().await;
    }

    #[tokio::test]
    async fn unreachable_store_falls_back_to_lazy_pool() {
        let app = bootstrap(options("sqlite:///shopkeep-missing-dir/nested/shopkeep.db"))
            .await
            .expect("bootstrap should survive an unreachable store");

        assert!(!app.store_ready);
        assert!(app.items.list().await.is_err(), "store-backed calls fail while the store is down");
    }

    #[tokio::test]
    async fn lazy_store_recovers_once_the_database_becomes_reachable() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store_dir = dir.path().join("not-yet-mounted");
        let url = format!("sqlite://{}?mode=rwc", store_dir.join("items.db").display());

        let app = bootstrap(options(&url)).await.expect("bootstrap should survive");
        assert!(!app.store_ready);
        assert!(app.items.list().await.is_err());

        std::fs::create_dir_all(&store_dir).expect("create store dir");
        let pen = app
            .items
            .create(NewItem::new("Pen", Decimal::from(10)))
            .await
            .expect("create succeeds once the store is reachable");
        assert_eq!(app.items.list().await.expect("list"), vec![pen]);

        app.db_pool.close().await;
    }

    #[tokio::test]
    async fn invalid_configuration_fails_bootstrap() {
        let result = bootstrap(options("postgres://localhost/shopkeep")).await;
        let message = result.err().expect("non-sqlite url must be rejected").to_string();
        assert!(message.contains("database.url"), "unexpected message: {message}");
    }
}
