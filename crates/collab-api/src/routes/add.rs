//! Route for submitting a word to the open story.

use axum::body::Bytes;
use axum::extract::{RawQuery, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::{Json, Router, routing::post};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use collab_story::application::command_handlers;
use collab_story::domain::commands::{AddWord, Word};

use crate::error::ApiError;
use crate::state::AppState;

/// JSON body accepted by POST /add.
#[derive(Debug, Deserialize)]
pub struct AddWordRequest {
    /// The word to append.
    pub word: Option<String>,
}

/// Response body returned after a word is placed.
#[derive(Debug, Serialize)]
pub struct AddWordResponse {
    /// The story the word landed in.
    pub id: i64,
    /// The story title.
    pub title: String,
    /// The last sentence of the last paragraph.
    pub current_sentence: String,
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(str::trim)
        .is_some_and(|mime| mime == "application/json" || mime.ends_with("+json"))
}

/// The first `word` value in the query string. An unreadable query string
/// counts as having none.
fn query_word(raw_query: Option<&str>) -> Option<String> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(raw_query?)
        .inspect_err(|e| debug!(error = %e, "unreadable query string"))
        .ok()?;
    pairs
        .into_iter()
        .find(|(key, _)| key == "word")
        .map(|(_, value)| value)
}

/// Picks the submitted text: the JSON `word` field for JSON requests,
/// otherwise the non-empty `word` query parameter.
fn submitted_text(headers: &HeaderMap, raw_query: Option<&str>, body: &[u8]) -> Option<String> {
    if is_json(headers) {
        serde_json::from_slice::<AddWordRequest>(body)
            .inspect_err(|e| debug!(error = %e, "unreadable JSON body"))
            .ok()
            .and_then(|request| request.word)
    } else {
        query_word(raw_query).filter(|word| !word.is_empty())
    }
}

/// POST /add
#[instrument(skip_all)]
async fn add_word(
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<AddWordResponse>), ApiError> {
    let text = submitted_text(&headers, raw_query.as_deref(), &body).ok_or(ApiError::NoWordsDetected)?;
    let word =
        Word::parse(&text).inspect_err(|e| debug!(error = %e, "rejected word submission"))?;

    let command = AddWord {
        correlation_id: Uuid::new_v4(),
        word,
    };

    info!(correlation_id = %command.correlation_id, word = %command.word, "handling add_word command");

    let outcome = command_handlers::handle_add_word(
        &command,
        state.clock.as_ref(),
        &*state.story_repository,
        &state.write_gate,
    )
    .await?;

    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((
        status,
        Json(AddWordResponse {
            id: outcome.story_id,
            title: outcome.title,
            current_sentence: outcome.current_sentence,
        }),
    ))
}

/// Returns the router for word submission.
pub fn router() -> Router<AppState> {
    Router::new().route("/add", post(add_word))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::Request;
    use chrono::{TimeZone, Utc};
    use collab_core::repository::StoryRepository;
    use collab_test_support::{FailingStoryRepository, FixedClock, InMemoryStoryRepository};
    use serde_json::Value;
    use tower::ServiceExt;

    fn app_state_with(story_repository: Arc<dyn StoryRepository>) -> AppState {
        let clock = Arc::new(FixedClock(
            Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
        ));
        AppState::new(clock, story_repository)
    }

    fn test_app_state() -> AppState {
        app_state_with(Arc::new(InMemoryStoryRepository::new()))
    }

    fn json_request(body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/add")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn test_first_word_returns_201_with_title() {
        // Arrange
        let app = router().with_state(test_app_state());

        // Act
        let (status, json) = send(app, json_request(&serde_json::json!({ "word": "Hello" }))).await;

        // Assert
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            json,
            serde_json::json!({ "id": 1, "title": "Hello", "current_sentence": "" })
        );
    }

    #[tokio::test]
    async fn test_second_word_returns_200_with_current_sentence() {
        // Arrange
        let state = test_app_state();
        let app = router().with_state(state.clone());
        send(app, json_request(&serde_json::json!({ "word": "Hello" }))).await;

        // Act
        let app = router().with_state(state);
        let (status, json) = send(app, json_request(&serde_json::json!({ "word": "world" }))).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["title"], "Hello");
        assert_eq!(json["current_sentence"], "world");
    }

    #[tokio::test]
    async fn test_word_can_be_sent_as_query_parameter() {
        let app = router().with_state(test_app_state());
        let request = Request::builder()
            .method("POST")
            .uri("/add?word=Hello")
            .body(Body::empty())
            .unwrap();

        let (status, json) = send(app, request).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["title"], "Hello");
    }

    #[tokio::test]
    async fn test_repeated_query_word_uses_the_first() {
        let app = router().with_state(test_app_state());
        let request = Request::builder()
            .method("POST")
            .uri("/add?word=Hello&word=world")
            .body(Body::empty())
            .unwrap();

        let (status, json) = send(app, request).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["title"], "Hello");
    }

    #[tokio::test]
    async fn test_json_request_ignores_repeated_query_words() {
        let app = router().with_state(test_app_state());
        let request = Request::builder()
            .method("POST")
            .uri("/add?word=a&word=b")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"word": "Hello"}"#))
            .unwrap();

        let (status, json) = send(app, request).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["title"], "Hello");
    }

    #[test]
    fn test_query_word_without_word_key_is_none() {
        assert_eq!(query_word(Some("text=hi")), None);
        assert_eq!(query_word(None), None);
        assert_eq!(query_word(Some("word=caf%C3%A9")), Some("café".to_owned()));
    }

    #[tokio::test]
    async fn test_missing_word_returns_400_no_words_detected() {
        let app = router().with_state(test_app_state());
        let request = Request::builder()
            .method("POST")
            .uri("/add")
            .body(Body::empty())
            .unwrap();

        let (status, json) = send(app, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "no words detected");
    }

    #[tokio::test]
    async fn test_json_without_word_field_returns_no_words_detected() {
        let app = router().with_state(test_app_state());

        let (status, json) = send(app, json_request(&serde_json::json!({ "text": "hi" }))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "no words detected");
    }

    #[tokio::test]
    async fn test_blank_word_returns_400_no_words_sent() {
        let app = router().with_state(test_app_state());

        let (status, json) = send(app, json_request(&serde_json::json!({ "word": "   " }))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "no words sent");
    }

    #[tokio::test]
    async fn test_multiple_words_return_400() {
        let app = router().with_state(test_app_state());

        let (status, json) =
            send(app, json_request(&serde_json::json!({ "word": "two words" }))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "multiple words sent");
    }

    #[tokio::test]
    async fn test_returns_500_with_empty_body_when_repository_fails() {
        let app = router().with_state(app_state_with(Arc::new(FailingStoryRepository)));

        let (status, json) = send(app, json_request(&serde_json::json!({ "word": "Hello" }))).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json, Value::Null);
    }
}
