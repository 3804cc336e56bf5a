//! HTTP API handlers.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use k8s_openapi::api::apps::v1::Deployment;
use serde::Serialize;
use tracing::{error, info};

use crate::cluster::types::{CreateWorkerRequest, CreateWorkerResponse};
use crate::cluster::Workers;
use crate::error::ApiError;

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Worker Deployment operations.
    pub workers: Workers,
}

impl AppState {
    /// Create new app state.
    pub fn new(workers: Workers) -> Self {
        Self { workers }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
}

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// `POST /workers` - create the Deployment for a task, 201 with its name.
///
/// The body is decoded by hand so decode failures answer 400 with the
/// decoder's message, whatever the content type.
pub async fn create_worker(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<CreateWorkerResponse>), ApiError> {
    let req: CreateWorkerRequest = serde_json::from_slice(&body).map_err(|e| {
        error!("failed decode json: {}", e);
        ApiError::from(e)
    })?;

    let name = state.workers.create_worker(&req.task_number).await?;
    info!(%name, task = %req.task_number, "worker created");

    Ok((StatusCode::CREATED, Json(CreateWorkerResponse { name })))
}

/// `GET /workers/:name` - the Deployment as JSON.
pub async fn get_worker(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Deployment>, ApiError> {
    let deployment = state.workers.get_worker(&name).await?;
    Ok(Json(deployment))
}

/// `DELETE /workers/:name` - foreground delete, 204.
pub async fn delete_worker(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.workers.delete_worker(&name).await?;
    Ok(StatusCode::NO_CONTENT)
}
