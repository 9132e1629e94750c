//! Story repository abstraction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::story::{ListQuery, Story, StoryDraft, StorySummary};

/// Repository trait for the story table.
///
/// At most one story is open at a time. Writers read the open story, run the
/// placement engine, and write back with `apply_word` guarded by the version
/// they read; a lost race surfaces as `DomainError::ConcurrencyConflict`.
#[async_trait]
pub trait StoryRepository: Send + Sync {
    /// Returns the open story, if any.
    async fn find_open_story(&self) -> Result<Option<Story>, DomainError>;

    /// Inserts a new open story with `created_at = updated_at = now`.
    ///
    /// Fails with `ConcurrencyConflict` if another story is already open.
    async fn create_story(
        &self,
        draft: &StoryDraft,
        now: DateTime<Utc>,
    ) -> Result<Story, DomainError>;

    /// Writes `draft` over the story if its version still equals
    /// `expected_version`, bumps the version and `updated_at`, and returns the
    /// refreshed row.
    async fn apply_word(
        &self,
        story_id: i64,
        expected_version: i64,
        draft: &StoryDraft,
        now: DateTime<Utc>,
    ) -> Result<Story, DomainError>;

    /// Returns one page of story summaries.
    async fn list_stories(&self, query: &ListQuery) -> Result<Vec<StorySummary>, DomainError>;

    /// Returns the full story, or `StoryNotFound`.
    async fn get_story(&self, story_id: i64) -> Result<Story, DomainError>;
}
