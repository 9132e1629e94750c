//! Collab — API error types.

use std::collections::BTreeMap;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use collab_core::error::DomainError;
use collab_story::domain::commands::WordError;
use collab_story::domain::queries::InvalidParameters;
use serde::Serialize;
use thiserror::Error;

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Database connection, pool or schema error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for domain error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// Body of a rejected word submission.
#[derive(Debug, Serialize)]
pub struct WordErrorBody {
    /// `no words detected`, `no words sent` or `multiple words sent`.
    pub error: String,
}

/// Body of a rejected story-list request.
#[derive(Debug, Serialize)]
pub struct InvalidParametersBody {
    /// Offending parameter names mapped to the values received.
    #[serde(rename = "invalid parameters")]
    pub invalid_parameters: BTreeMap<&'static str, String>,
    /// Always `invalid parameter values`.
    pub error: &'static str,
}

/// Body of a rejected story lookup.
#[derive(Debug, Serialize)]
pub struct InvalidIdBody {
    /// The id as received: a number when it parsed, the raw text otherwise.
    pub id: serde_json::Value,
    /// Always `invalid id`.
    pub error: &'static str,
}

/// HTTP-layer error: request validation failures plus wrapped domain errors.
#[derive(Debug)]
pub enum ApiError {
    /// Neither a JSON `word` field nor a `word` query parameter was supplied.
    NoWordsDetected,
    /// The supplied word was blank or more than one token.
    Word(WordError),
    /// One or more story-list parameters were invalid.
    InvalidParameters(InvalidParameters),
    /// The story id was malformed, negative or unknown.
    InvalidId(serde_json::Value),
    /// A domain or persistence failure.
    Domain(DomainError),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<WordError> for ApiError {
    fn from(err: WordError) -> Self {
        Self::Word(err)
    }
}

impl From<InvalidParameters> for ApiError {
    fn from(err: InvalidParameters) -> Self {
        Self::InvalidParameters(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::NoWordsDetected => (
                StatusCode::BAD_REQUEST,
                Json(WordErrorBody {
                    error: "no words detected".to_owned(),
                }),
            )
                .into_response(),
            Self::Word(err) => (
                StatusCode::BAD_REQUEST,
                Json(WordErrorBody {
                    error: err.to_string(),
                }),
            )
                .into_response(),
            Self::InvalidParameters(InvalidParameters(invalid_parameters)) => (
                StatusCode::BAD_REQUEST,
                Json(InvalidParametersBody {
                    invalid_parameters,
                    error: "invalid parameter values",
                }),
            )
                .into_response(),
            Self::InvalidId(id) => (
                StatusCode::BAD_REQUEST,
                Json(InvalidIdBody {
                    id,
                    error: "invalid id",
                }),
            )
                .into_response(),
            Self::Domain(err) => {
                let (status, error_code) = match &err {
                    DomainError::StoryNotFound(_) => (StatusCode::NOT_FOUND, "story_not_found"),
                    DomainError::ConcurrencyConflict { .. } => {
                        (StatusCode::CONFLICT, "concurrency_conflict")
                    }
                    // Failure detail is logged by the store; the client gets no body.
                    DomainError::Infrastructure(_) => {
                        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
                    }
                };

                let body = ErrorBody {
                    error: error_code,
                    message: err.to_string(),
                };

                (status, Json(body)).into_response()
            }
        }
    }
}
