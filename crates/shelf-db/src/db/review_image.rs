//! Review image repository: CRUD for the review_images table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shelf_core::{AppError, NewReviewImage, Owner, ReviewImage};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Persistence seam for review image records
#[async_trait]
pub trait ReviewImageStore: Send + Sync {
    /// Insert a record. A duplicate URL is reported as [`AppError::Conflict`].
    async fn create(&self, image: NewReviewImage) -> Result<ReviewImage, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ReviewImage>, AppError>;

    /// Delete a record, returning false when no row matched
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;

    /// URLs of every stored record
    async fn list_urls(&self) -> Result<Vec<String>, AppError>;
}

/// Row type for review_images table (for FromRow).
#[derive(Debug, sqlx::FromRow)]
pub struct ReviewImageRow {
    pub id: Uuid,
    pub url: String,
    pub anime_id: Option<Uuid>,
    pub manga_id: Option<Uuid>,
    pub light_novel_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl ReviewImageRow {
    /// Fails when the row does not reference exactly one owner.
    pub fn into_review_image(self) -> Result<ReviewImage, AppError> {
        let owner = Owner::from_foreign_keys(self.anime_id, self.manga_id, self.light_novel_id)?;
        Ok(ReviewImage {
            id: self.id,
            url: self.url,
            owner,
            created_at: self.created_at,
        })
    }
}

/// Postgres repository for review_images table.
#[derive(Clone)]
pub struct ReviewImageRepository {
    pool: PgPool,
}

impl ReviewImageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_insert_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::Conflict("URL already exists!".to_string())
        }
        _ => AppError::Database(err),
    }
}

#[async_trait]
impl ReviewImageStore for ReviewImageRepository {
    #[tracing::instrument(skip(self, image), fields(db.table = "review_images", db.record_id = %image.id))]
    async fn create(&self, image: NewReviewImage) -> Result<ReviewImage, AppError> {
        let (anime_id, manga_id, light_novel_id) = image.owner.foreign_keys();

        let row: ReviewImageRow = sqlx::query_as::<Postgres, ReviewImageRow>(
            r#"
            INSERT INTO review_images (id, url, anime_id, manga_id, light_novel_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, url, anime_id, manga_id, light_novel_id, created_at
            "#,
        )
        .bind(image.id)
        .bind(&image.url)
        .bind(anime_id)
        .bind(manga_id)
        .bind(light_novel_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_error)?;

        row.into_review_image()
    }

    #[tracing::instrument(skip(self), fields(db.table = "review_images", db.record_id = %id))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ReviewImage>, AppError> {
        let row: Option<ReviewImageRow> = sqlx::query_as::<Postgres, ReviewImageRow>(
            r#"
            SELECT id, url, anime_id, manga_id, light_novel_id, created_at
            FROM review_images
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ReviewImageRow::into_review_image).transpose()
    }

    #[tracing::instrument(skip(self), fields(db.table = "review_images", db.record_id = %id))]
    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM review_images WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self), fields(db.table = "review_images"))]
    async fn list_urls(&self) -> Result<Vec<String>, AppError> {
        let urls: Vec<String> = sqlx::query_scalar("SELECT url FROM review_images ORDER BY created_at")
            .fetch_all(&self.pool)
            .await?;

        Ok(urls)
    }
}
