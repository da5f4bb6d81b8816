use async_trait::async_trait;
use sqlx::PgPool;
use tubely_core::models::Video;
use tubely_core::AppError;
use uuid::Uuid;

/// Data access for video records.
#[async_trait]
pub trait VideoRepository: Send + Sync {
    /// Fetch a video by id. Returns `None` when no record exists.
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError>;

    /// Persist the mutable fields of an existing video record.
    async fn update_video(&self, video: &Video) -> Result<(), AppError>;
}

/// Postgres-backed video repository
#[derive(Clone)]
pub struct PgVideoRepository {
    pool: PgPool,
}

impl PgVideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VideoRepository for PgVideoRepository {
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        let video = sqlx::query_as::<_, Video>(
            r#"
            SELECT id, created_at, updated_at, title, description,
                   thumbnail_url, video_url, user_id
            FROM videos
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(video)
    }

    async fn update_video(&self, video: &Video) -> Result<(), AppError> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE videos
            SET title = $1, description = $2, thumbnail_url = $3,
                video_url = $4, updated_at = $5
            WHERE id = $6
            "#,
        )
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.thumbnail_url)
        .bind(&video.video_url)
        .bind(video.updated_at)
        .bind(video.id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!("Video {} not found", video.id)));
        }

        tracing::debug!(video_id = %video.id, "Video record updated");

        Ok(())
    }
}
