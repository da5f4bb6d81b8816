pub mod routes;
pub mod server;

use crate::state::AppState;
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tubely_core::Config;
use tubely_db::PgVideoRepository;
use tubely_storage::create_store;

/// Wire up the database pool, storage backends, and router.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, Router), anyhow::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    tubely_db::run_migrations(&pool).await?;

    let thumbnail_store = create_store(&config, config.thumbnail_backend).await?;
    let video_store = create_store(&config, config.video_backend).await?;

    tracing::info!(
        thumbnail_backend = %config.thumbnail_backend,
        video_backend = %config.video_backend,
        "Storage backends initialized"
    );

    let state = Arc::new(AppState {
        config,
        videos: Arc::new(PgVideoRepository::new(pool)),
        thumbnail_store,
        video_store,
    });

    let router = routes::setup_routes(state.clone());

    Ok((state, router))
}
