//! Pooled SQLite connection handle.

use crate::error::{StoreError, StoreResult};
use crate::resource::Resource;
use crate::store::SqliteResourceStore;
use bookstore_kernel::settings::DatabaseSettings;
use bookstore_kernel::Migration;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

/// Shared database handle.
///
/// Cloning is cheap; every clone refers to the same pool. Connections are
/// checked out per statement and returned immediately afterwards.
#[derive(Clone, Debug)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open a pool according to the given settings, creating the database file if needed.
    pub async fn connect(settings: &DatabaseSettings) -> StoreResult<Self> {
        Self::open(settings, true).await
    }

    /// Open a pool on a database that must already exist.
    pub async fn connect_existing(settings: &DatabaseSettings) -> StoreResult<Self> {
        Self::open(settings, false).await
    }

    async fn open(settings: &DatabaseSettings, create_if_missing: bool) -> StoreResult<Self> {
        if settings.max_connections == 0 {
            return Err(StoreError::Config(
                "database.max_connections must be at least 1".to_string(),
            ));
        }

        let opts = SqliteConnectOptions::from_str(&settings.url)?
            .create_if_missing(create_if_missing)
            .foreign_keys(true)
            // Prevent transient "database is locked" errors under concurrent access.
            .busy_timeout(Duration::from_millis(settings.busy_timeout_ms));

        // Each connection to an in-memory database sees its own private
        // database, so the pool must hold exactly one that never expires.
        let in_memory = is_in_memory(&settings.url);
        let max_connections = if in_memory { 1 } else { settings.max_connections };

        let mut pool_opts = SqlitePoolOptions::new().max_connections(max_connections);
        if in_memory {
            pool_opts = pool_opts
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = pool_opts.connect_with(opts).await?;

        tracing::info!(
            url = %settings.url,
            max_connections,
            "database pool opened"
        );

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Check database connectivity.
    pub async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Run every module's schema statements in the given order.
    pub async fn apply_migrations(&self, migrations: &[(String, Migration)]) -> StoreResult<()> {
        for (module, migration) in migrations {
            tracing::info!(module = %module, migration = migration.id, "applying schema");
            sqlx::raw_sql(migration.up).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Build the store for a resource type on top of this pool.
    pub fn store<R: Resource>(&self) -> SqliteResourceStore<R> {
        SqliteResourceStore::new(self.pool.clone())
    }

    /// Close every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}
