//! Route configuration and setup

use crate::handlers;
use crate::state::AppState;
use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{delete, get, post},
    Json, Router,
};
use shelf_core::Config;
use shelf_storage::StorageBackend;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Setup all application routes
///
/// Locally stored images are served under `/uploads`; with the cloud backend the
/// bucket serves them and the route is not mounted.
pub async fn setup_routes(
    config: &Config,
    state: Arc<AppState>,
) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    let mut app = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/api/uploads", post(handlers::uploads::upload_image))
        .route("/api/uploads/{id}", delete(handlers::uploads::delete_image))
        .with_state(state.clone())
        .route(
            "/api/openapi.json",
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        );

    if state.storage_backend == StorageBackend::Local {
        tracing::info!(path = %config.local_upload_path, "Serving local uploads at /uploads");
        app = app.nest_service("/uploads", ServeDir::new(&config.local_upload_path));
    }

    let app = app
        // Raw uploads may exceed the stored-image limit; compression runs after the body is read.
        .layer(DefaultBodyLimit::max(config.max_request_body_bytes))
        .layer(RequestBodyLimitLayer::new(config.max_request_body_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(app)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::DELETE, Method::OPTIONS];

    let cors = if config.cors_origins.iter().any(|origin| origin == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .context("CORS_ORIGINS contains an invalid origin")?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}
