use async_trait::async_trait;
use axum::Router;
use bookstore_db::{Database, Lifecycle, Resource};
use bookstore_http::{openapi, resource_routes};
use bookstore_kernel::{InitCtx, Migration, Module};

/// Module exposing one soft-deletable resource under `/{table}`.
pub struct ResourceModule<R: Resource> {
    lifecycle: Lifecycle<R>,
    migrations: &'static [Migration],
}

impl<R: Resource> ResourceModule<R> {
    pub fn new(db: &Database, migrations: &'static [Migration]) -> Self {
        Self {
            lifecycle: Lifecycle::from_database(db),
            migrations,
        }
    }
}

#[async_trait]
impl<R: Resource> Module for ResourceModule<R> {
    fn name(&self) -> &'static str {
        R::TABLE
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "{} module initialized",
            self.name()
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        resource_routes(self.lifecycle.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi::resource_fragment::<R>())
    }

    fn migrations(&self) -> Vec<Migration> {
        self.migrations.to_vec()
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let counts = self.lifecycle.store().counts().await?;
        tracing::info!(
            module = self.name(),
            active = counts.active,
            deleted = counts.deleted,
            "{} module started",
            self.name()
        );
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "{} module stopped", self.name());
        Ok(())
    }
}
