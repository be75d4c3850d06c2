use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;

/// Catalog entity kind a review image can be attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaType {
    Anime,
    Manga,
    LightNovel,
}

impl MediaType {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaType::Anime => "ANIME",
            MediaType::Manga => "MANGA",
            MediaType::LightNovel => "LIGHT_NOVEL",
        }
    }
}

impl FromStr for MediaType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace('-', "_").as_str() {
            "ANIME" => Ok(MediaType::Anime),
            "MANGA" => Ok(MediaType::Manga),
            "LIGHT_NOVEL" => Ok(MediaType::LightNovel),
            _ => Err(AppError::BadRequest("Invalid media type!".to_string())),
        }
    }
}

impl Display for MediaType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// The single catalog entity owning a review image.
///
/// Exactly one owner per image; the variant carries the entity id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", content = "id", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Owner {
    Anime(Uuid),
    Manga(Uuid),
    LightNovel(Uuid),
}

impl Owner {
    pub fn new(media_type: MediaType, entity_id: Uuid) -> Self {
        match media_type {
            MediaType::Anime => Owner::Anime(entity_id),
            MediaType::Manga => Owner::Manga(entity_id),
            MediaType::LightNovel => Owner::LightNovel(entity_id),
        }
    }

    pub fn media_type(&self) -> MediaType {
        match self {
            Owner::Anime(_) => MediaType::Anime,
            Owner::Manga(_) => MediaType::Manga,
            Owner::LightNovel(_) => MediaType::LightNovel,
        }
    }

    pub fn entity_id(&self) -> Uuid {
        match *self {
            Owner::Anime(id) | Owner::Manga(id) | Owner::LightNovel(id) => id,
        }
    }

    /// Split into the three nullable foreign-key columns used by `review_images`.
    pub fn foreign_keys(&self) -> (Option<Uuid>, Option<Uuid>, Option<Uuid>) {
        match *self {
            Owner::Anime(id) => (Some(id), None, None),
            Owner::Manga(id) => (None, Some(id), None),
            Owner::LightNovel(id) => (None, None, Some(id)),
        }
    }

    /// Rebuild the owner from the foreign-key columns. Fails unless exactly one is set.
    pub fn from_foreign_keys(
        anime_id: Option<Uuid>,
        manga_id: Option<Uuid>,
        light_novel_id: Option<Uuid>,
    ) -> Result<Self, AppError> {
        match (anime_id, manga_id, light_novel_id) {
            (Some(id), None, None) => Ok(Owner::Anime(id)),
            (None, Some(id), None) => Ok(Owner::Manga(id)),
            (None, None, Some(id)) => Ok(Owner::LightNovel(id)),
            _ => Err(AppError::Internal(
                "Review image must reference exactly one owner".to_string(),
            )),
        }
    }
}

/// Persisted review image record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ReviewImage {
    pub id: Uuid,
    pub url: String,
    pub owner: Owner,
    pub created_at: DateTime<Utc>,
}

/// Values needed to insert a review image after its bytes are stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReviewImage {
    pub id: Uuid,
    pub url: String,
    pub owner: Owner,
}
