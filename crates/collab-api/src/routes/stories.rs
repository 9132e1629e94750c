//! Read-side routes: the story list and individual stories.

use axum::extract::{Path, Query, State};
use axum::{Json, Router, routing::get};
use tracing::{instrument, warn};

use collab_core::error::DomainError;
use collab_story::application::query_handlers::{self, StoryListView, StoryView};
use collab_story::domain::queries::RawListParams;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /stories
#[instrument(skip(state))]
async fn list_stories(
    State(state): State<AppState>,
    Query(params): Query<RawListParams>,
) -> Result<Json<StoryListView>, ApiError> {
    let query = params.validate().inspect_err(|invalid| {
        warn!(invalid = ?invalid.0, "stories requested with invalid parameter values");
    })?;

    let view = query_handlers::list_stories(&query, &*state.story_repository).await?;

    Ok(Json(view))
}

/// Parses a story id path segment. Negative and non-integer ids are rejected
/// with the id echoed back as received.
fn parse_story_id(raw: &str) -> Result<i64, ApiError> {
    match raw.parse::<i64>() {
        Ok(id) if id >= 0 => Ok(id),
        Ok(id) => Err(ApiError::InvalidId(id.into())),
        Err(_) => Err(ApiError::InvalidId(raw.into())),
    }
}

/// GET /stories/{id}
#[instrument(skip(state))]
async fn get_story(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<StoryView>, ApiError> {
    let story_id = parse_story_id(&raw_id).inspect_err(|_| warn!("story requested with invalid id"))?;

    match query_handlers::get_story_by_id(story_id, &*state.story_repository).await {
        Ok(view) => Ok(Json(view)),
        // Unknown ids are reported exactly like malformed ones.
        Err(DomainError::StoryNotFound(id)) => {
            warn!(story_id = id, "story id not found");
            Err(ApiError::InvalidId(id.into()))
        }
        Err(err) => Err(err.into()),
    }
}

/// Returns the router for the story read endpoints.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stories", get(list_stories))
        .route("/stories/{id}", get(get_story))
}
