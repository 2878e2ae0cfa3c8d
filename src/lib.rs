//! Bookstore application library
//!
//! Wires the author and book resource modules onto a shared database and
//! exposes the startup sequence used by both the `bookstore` binary and the CLI.

pub mod modules;

use anyhow::Context;
use axum::Router;
use bookstore_db::Database;
use bookstore_kernel::{settings::Settings, InitCtx, ModuleRegistry};

pub use modules::register_all;

/// A connected database plus every registered module, schema applied.
pub struct App {
    pub settings: Settings,
    pub db: Database,
    pub registry: ModuleRegistry,
}

impl App {
    /// Connect to the configured database, register all modules and apply their schema.
    pub async fn bootstrap(settings: Settings) -> anyhow::Result<Self> {
        let db = Database::connect(&settings.database)
            .await
            .with_context(|| format!("failed to open database {}", settings.database.url))?;

        let mut registry = ModuleRegistry::new();
        register_all(&mut registry, &db);

        let migrations = registry.collect_migrations();
        db.apply_migrations(&migrations)
            .await
            .context("failed to apply schema")?;

        tracing::info!(
            modules = registry.module_count(),
            migrations = migrations.len(),
            "bookstore schema ready"
        );

        Ok(Self {
            settings,
            db,
            registry,
        })
    }

    /// HTTP router for the registered modules.
    pub fn router(&self) -> Router {
        bookstore_http::build_router(&self.registry, &self.settings, &self.db)
    }

    /// Run the HTTP server until a shutdown signal, then stop modules and close the pool.
    pub async fn serve(self) -> anyhow::Result<()> {
        let ctx = InitCtx {
            settings: &self.settings,
        };
        self.registry.init_modules(&ctx).await?;
        self.registry.start_modules(&ctx).await?;

        let served = bookstore_http::start_server(&self.registry, &self.settings, &self.db).await;

        if let Err(e) = self.registry.stop_modules().await {
            tracing::warn!(error = %e, "module shutdown reported an error");
        }
        self.db.close().await;
        served
    }
}
