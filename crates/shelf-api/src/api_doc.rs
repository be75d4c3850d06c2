//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use shelf_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Shelf Review Image API",
        version = "0.1.0",
        description = "Upload and delete review images attached to anime, manga and light novel entries. Oversized images are recompressed before storage."
    ),
    paths(
        handlers::uploads::upload_image,
        handlers::uploads::delete_image,
        handlers::health::health_check,
    ),
    components(schemas(
        models::ReviewImage,
        models::Owner,
        models::MediaType,
        handlers::uploads::UploadImageForm,
        handlers::health::HealthResponse,
        error::ErrorResponse,
    )),
    tags(
        (name = "uploads", description = "Review image upload and deletion"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
