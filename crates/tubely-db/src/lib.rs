//! Tubely database layer
//!
//! Repository implementations for data access. Handlers depend on the
//! [`VideoRepository`] trait rather than a concrete pool so tests can swap in
//! an in-memory fake.

pub mod video;

pub use video::{PgVideoRepository, VideoRepository};

/// Apply pending schema migrations.
pub async fn run_migrations(pool: &sqlx::PgPool) -> Result<(), anyhow::Error> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database migrations applied");
    Ok(())
}
