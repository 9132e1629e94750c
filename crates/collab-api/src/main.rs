//! Collab story server entry point.

use std::sync::Arc;

use collab_api::config::Settings;
use collab_api::error::AppError;
use collab_api::state::AppState;
use collab_api::telemetry;
use collab_core::clock::SystemClock;
use collab_store::{SqliteStoryRepository, initialize_schema};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let settings = Settings::from_env()?;

    // The log file lives in the data directory, so create it before tracing starts.
    let data_dir_result = settings.ensure_data_dir();
    telemetry::init_tracing(&settings);
    if let Err(err) = data_dir_result {
        warn!(
            path = %settings.data_dir.display(),
            error = %err,
            "unable to create data directory"
        );
    }

    info!(environment = ?settings.environment, "Starting Collab story server");

    let options = SqliteConnectOptions::new()
        .filename(&settings.database_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal);
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await
        .inspect_err(|e| {
            error!(
                path = %settings.database_path.display(),
                error = %e,
                "unable to open database"
            );
        })?;

    if let Err(err) = initialize_schema(&pool).await {
        error!(error = %err, "schema initialization failed");
        return Err(err.into());
    }

    let app_state = AppState::new(
        Arc::new(SystemClock),
        Arc::new(SqliteStoryRepository::new(pool)),
    );

    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app = collab_api::app(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = settings.listen_addr()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
