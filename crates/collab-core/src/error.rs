//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// No story exists with the requested id.
    #[error("story not found: {0}")]
    StoryNotFound(i64),

    /// Optimistic concurrency conflict on the open story.
    #[error("concurrency conflict on story {story_id}: expected version {expected}, found {actual}")]
    ConcurrencyConflict {
        /// The story that had the conflict (0 when a concurrent insert won).
        story_id: i64,
        /// The expected version.
        expected: i64,
        /// The actual version found.
        actual: i64,
    },

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
