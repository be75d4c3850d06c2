use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use shelf_core::ReviewImage;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::extract_upload_form;

/// Multipart body of an upload request
#[allow(dead_code)]
#[derive(Deserialize, ToSchema)]
pub struct UploadImageForm {
    /// Image file (JPEG, PNG or WebP)
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
    /// Owner kind: ANIME, MANGA or LIGHT_NOVEL
    #[serde(rename = "type")]
    #[schema(example = "ANIME")]
    pub media_type: String,
    /// Id of the owning catalog entity
    #[serde(rename = "entityId")]
    pub entity_id: Uuid,
}

/// Upload a review image
///
/// The image is compressed until it fits the configured size limit, stored on the
/// active backend and recorded against the given catalog entity.
#[utoipa::path(
    post,
    path = "/api/uploads",
    tag = "uploads",
    request_body(content = UploadImageForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Image uploaded", body = ReviewImage),
        (status = 400, description = "Invalid media type, entity id or image", body = ErrorResponse),
        (status = 409, description = "URL already exists", body = ErrorResponse),
        (status = 413, description = "Image too large even after compression", body = ErrorResponse),
        (status = 500, description = "Storage or database failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_review_image"))]
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ReviewImage>), HttpAppError> {
    let form = extract_upload_form(multipart).await?;

    let image = state
        .upload_service
        .upload(form.file, &form.media_type, form.entity_id)
        .await?;

    Ok((StatusCode::CREATED, Json(image)))
}

/// Delete a review image
#[utoipa::path(
    delete,
    path = "/api/uploads/{id}",
    tag = "uploads",
    params(
        ("id" = Uuid, Path, description = "Review image ID")
    ),
    responses(
        (status = 204, description = "Image deleted"),
        (status = 404, description = "Image not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(image_id = %id, operation = "delete_review_image"))]
pub async fn delete_image(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, HttpAppError> {
    state.upload_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
