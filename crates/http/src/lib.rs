//! HTTP server facade for the bookstore service with Axum, error handling,
//! generic resource routes, and OpenAPI support.

use anyhow::Context;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde_json::{json, Value};

use bookstore_db::Database;
use bookstore_kernel::{settings::Settings, ModuleRegistry};

pub mod error;
pub mod openapi;
pub mod resource;
pub mod router;

use error::ErrorBody;
use router::RouterBuilder;

pub use resource::resource_routes;

/// Start the HTTP server and run until Ctrl-C or SIGTERM
pub async fn start_server(
    registry: &ModuleRegistry,
    settings: &Settings,
    db: &Database,
) -> anyhow::Result<()> {
    let app = build_router(registry, settings, db);

    let address = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind to {}", address))?;

    tracing::info!("HTTP server listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

/// Build the main HTTP router with all module routes mounted
pub fn build_router(registry: &ModuleRegistry, settings: &Settings, db: &Database) -> Router {
    let mut router_builder = RouterBuilder::new()
        .route("/healthz", get(health_check))
        .route("/readyz", get(readiness_check).with_state(db.clone()));

    for module in registry.modules() {
        let module_name = module.name();
        tracing::info!(module = module_name, "mounting module routes under /{}", module_name);
        router_builder = router_builder.mount_module(module_name, module.routes());
    }

    // Layers only wrap routes registered before them.
    router_builder
        .with_openapi(registry)
        .with_fallbacks()
        .with_tracing()
        .with_cors()
        .with_request_id()
        .with_timeout(settings.server.request_timeout_ms)
        .build()
}

/// Liveness endpoint
async fn health_check() -> &'static str {
    "ok"
}

/// Readiness endpoint: the database answers a trivial query
async fn readiness_check(
    State(db): State<Database>,
) -> Result<Json<Value>, (StatusCode, Json<ErrorBody>)> {
    match db.ping().await {
        Ok(()) => Ok(Json(json!({ "status": "ok" }))),
        Err(e) => {
            tracing::error!(error = %e, "database connection failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: "Database connection failed".to_string(),
                }),
            ))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
