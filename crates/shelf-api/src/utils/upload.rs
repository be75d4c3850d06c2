//! Multipart parsing for review image uploads

use axum::extract::Multipart;
use shelf_core::AppError;
use shelf_services::ImageFile;
use uuid::Uuid;

use crate::error::HttpAppError;

pub const IMAGE_FIELD: &str = "image";
pub const MEDIA_TYPE_FIELD: &str = "type";
pub const ENTITY_ID_FIELD: &str = "entityId";

/// Fields of an upload request
#[derive(Debug)]
pub struct UploadForm {
    pub file: ImageFile,
    pub media_type: String,
    pub entity_id: Uuid,
}

/// Read the `image` file part and the `type` and `entityId` text fields.
///
/// Unknown fields are ignored. Missing fields, a repeated file part or a malformed
/// entity id are rejected as bad requests.
pub async fn extract_upload_form(mut multipart: Multipart) -> Result<UploadForm, HttpAppError> {
    let mut file: Option<ImageFile> = None;
    let mut media_type: Option<String> = None;
    let mut entity_id: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        match field_name.as_str() {
            IMAGE_FIELD => {
                if file.is_some() {
                    return Err(AppError::BadRequest(
                        "Multiple image fields are not allowed; send exactly one field named 'image'"
                            .to_string(),
                    )
                    .into());
                }
                let original_filename = field
                    .file_name()
                    .map(sanitize_filename)
                    .unwrap_or_else(|| "unknown".to_string());
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let data = field.bytes().await?;

                file = Some(ImageFile::new(data.to_vec(), original_filename, content_type));
            }
            MEDIA_TYPE_FIELD => media_type = Some(field.text().await?),
            ENTITY_ID_FIELD => entity_id = Some(field.text().await?),
            _ => {}
        }
    }

    let file = file.ok_or_else(|| AppError::BadRequest("No image provided".to_string()))?;
    if file.data.is_empty() {
        return Err(AppError::BadRequest("Image is empty".to_string()).into());
    }

    let media_type =
        media_type.ok_or_else(|| AppError::BadRequest("Missing media type".to_string()))?;

    let entity_id = entity_id
        .ok_or_else(|| AppError::BadRequest("Missing entityId".to_string()))?;
    let entity_id = Uuid::parse_str(entity_id.trim())
        .map_err(|e| AppError::BadRequest(format!("Invalid entityId: {}", e)))?;

    Ok(UploadForm {
        file,
        media_type,
        entity_id,
    })
}

/// Keep only the final path component of a client-supplied filename
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_control())
        .collect()
}
