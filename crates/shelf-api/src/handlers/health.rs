use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;
use shelf_storage::StorageBackend;
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    #[schema(value_type = String, example = "local")]
    pub storage_backend: StorageBackend,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        storage_backend: state.storage_backend,
    })
}
