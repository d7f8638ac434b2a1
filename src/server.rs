//! # Server Configuration
//!
//! This module contains the router and server setup for the registry.

use std::sync::Arc;

use axum::{
    Router,
    extract::FromRef,
    middleware,
    routing::get,
};
use sea_orm::DatabaseConnection;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppConfig;
use crate::handlers;
use crate::telemetry::trace_middleware;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: DatabaseConnection,
}

impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

/// Creates and configures the Axum application router
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz))
        .route(
            "/company",
            get(handlers::company::index).post(handlers::company::store),
        )
        .route(
            "/company/{id}",
            get(handlers::company::show)
                .put(handlers::company::update)
                .delete(handlers::company::destroy),
        )
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_middleware))
}

/// Starts the server with the given configuration and serves until Ctrl-C
pub async fn run_server(config: AppConfig, db: DatabaseConnection) -> anyhow::Result<()> {
    let addr = config
        .bind_addr()
        .map_err(|e| anyhow::anyhow!("Invalid server address: {}", e))?;

    let profile = config.profile.clone();
    let state = AppState {
        config: Arc::new(config),
        db,
    };
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, %profile, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::healthz,
        crate::handlers::company::index,
        crate::handlers::company::store,
        crate::handlers::company::show,
        crate::handlers::company::update,
        crate::handlers::company::destroy,
    ),
    components(
        schemas(
            crate::models::ServiceInfo,
            crate::handlers::HealthStatus,
            crate::error::ApiError,
            crate::pages::Page,
            crate::pages::company::CompanyRow,
            crate::pages::company::CompanyDetail,
            crate::pages::company::MachineRow,
            crate::validation::CompanyForm,
            crate::validation::FieldErrors,
            crate::validation::OldInput,
        )
    ),
    tags(
        (name = "root", description = "Service information and health"),
        (name = "company", description = "Company grid, forms and detail page")
    ),
    info(
        title = "Registry API",
        description = "Companies, their machines and machine documents",
        version = env!("CARGO_PKG_VERSION"),
    )
)]
pub struct ApiDoc;
