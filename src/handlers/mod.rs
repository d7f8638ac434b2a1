//! # API Handlers
//!
//! This module contains all the HTTP endpoint handlers for the registry.

pub mod company;

use crate::db;
use crate::error::{ApiError, ErrorType};
use crate::models::ServiceInfo;
use crate::pages::{Page, PageContext, PageResponse};
use crate::server::AppState;
use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const WELCOME_COMPONENT: &str = "welcome";

/// Landing page; its props carry the service name and version
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Welcome page with service information props", body = Page)
    ),
    tag = "root"
)]
pub async fn root(page: PageContext) -> PageResponse {
    page.render(WELCOME_COMPONENT, ServiceInfo::default())
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthStatus {
    #[schema(example = "ok")]
    pub status: String,
    #[schema(example = "ok")]
    pub database: String,
}

/// Liveness plus database reachability
#[utoipa::path(
    get,
    path = "/healthz",
    responses(
        (status = 200, description = "Service and database are healthy", body = HealthStatus),
        (status = 503, description = "Database unreachable", body = ApiError)
    ),
    tag = "root"
)]
pub async fn healthz(State(state): State<AppState>) -> Result<Json<HealthStatus>, ApiError> {
    if let Err(err) = db::health_check(&state.db).await {
        tracing::warn!(error = %err, "Health check failed");
        return Err(ErrorType::ServiceUnavailable.into());
    }

    Ok(Json(HealthStatus {
        status: "ok".to_string(),
        database: "ok".to_string(),
    }))
}

#[cfg(test)]
mod tests;
