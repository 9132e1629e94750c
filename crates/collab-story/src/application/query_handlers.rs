//! Query handlers for the story context.
//!
//! This module contains query handlers that read stories from the repository
//! and return read-only view DTOs.

use chrono::{DateTime, Utc};
use collab_core::error::DomainError;
use collab_core::repository::StoryRepository;
use collab_core::story::{ListQuery, Paragraph, Story, StorySummary};
use serde::Serialize;

/// Summary view of a story in a list.
#[derive(Debug, Serialize)]
pub struct StorySummaryView {
    /// The story identifier.
    pub id: i64,
    /// The story title.
    pub title: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last accepted word.
    pub updated_at: DateTime<Utc>,
}

impl From<StorySummary> for StorySummaryView {
    fn from(summary: StorySummary) -> Self {
        Self {
            id: summary.id,
            title: summary.title,
            created_at: summary.created_at,
            updated_at: summary.updated_at,
        }
    }
}

/// One page of the story list.
#[derive(Debug, Serialize)]
pub struct StoryListView {
    /// The page size requested.
    pub limit: u32,
    /// The page start requested.
    pub offset: u32,
    /// Number of stories in `results`.
    pub count: usize,
    /// The stories on this page.
    pub results: Vec<StorySummaryView>,
}

/// Full view of a single story.
#[derive(Debug, Serialize)]
pub struct StoryView {
    /// The story identifier.
    pub id: i64,
    /// The story title.
    pub title: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last accepted word.
    pub updated_at: DateTime<Utc>,
    /// The story body.
    pub paragraphs: Vec<Paragraph>,
}

impl From<Story> for StoryView {
    fn from(story: Story) -> Self {
        Self {
            id: story.id,
            title: story.title,
            created_at: story.created_at,
            updated_at: story.updated_at,
            paragraphs: story.paragraphs,
        }
    }
}

/// Retrieves one page of story summaries.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the repository fails.
pub async fn list_stories(
    query: &ListQuery,
    repo: &dyn StoryRepository,
) -> Result<StoryListView, DomainError> {
    let results: Vec<StorySummaryView> = repo
        .list_stories(query)
        .await?
        .into_iter()
        .map(StorySummaryView::from)
        .collect();

    Ok(StoryListView {
        limit: query.limit,
        offset: query.offset,
        count: results.len(),
        results,
    })
}

/// Retrieves a story by its id.
///
/// # Errors
///
/// Returns `DomainError::StoryNotFound` if no story has the id.
/// Returns `DomainError::Infrastructure` if the repository fails.
pub async fn get_story_by_id(
    story_id: i64,
    repo: &dyn StoryRepository,
) -> Result<StoryView, DomainError> {
    repo.get_story(story_id).await.map(StoryView::from)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use collab_core::error::DomainError;
    use collab_core::repository::StoryRepository;
    use collab_core::story::{ListQuery, SortField, SortOrder, StoryDraft};

    use crate::application::query_handlers::{get_story_by_id, list_stories};
    use crate::domain::placement;
    use collab_test_support::{FailingStoryRepository, InMemoryStoryRepository};

    async fn seed_closed(repo: &InMemoryStoryRepository, title: &str, hour: u32) {
        let mut draft = placement::advance(StoryDraft::fresh(), title);
        draft.open = false;
        let now = Utc.with_ymd_and_hms(2026, 1, 15, hour, 0, 0).unwrap();
        repo.create_story(&draft, now).await.unwrap();
    }

    #[tokio::test]
    async fn test_list_stories_returns_page_with_count() {
        // Arrange
        let repo = InMemoryStoryRepository::new();
        seed_closed(&repo, "Bravo", 9).await;
        seed_closed(&repo, "Alpha", 10).await;
        seed_closed(&repo, "Charlie", 11).await;
        let query = ListQuery {
            limit: 2,
            offset: 0,
            sort: SortField::Title,
            order: SortOrder::Asc,
        };

        // Act
        let view = list_stories(&query, &repo).await.unwrap();

        // Assert
        assert_eq!(view.limit, 2);
        assert_eq!(view.offset, 0);
        assert_eq!(view.count, 2);
        let titles: Vec<&str> = view.results.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Alpha", "Bravo"]);
    }

    #[tokio::test]
    async fn test_list_stories_respects_offset_and_descending_order() {
        // Arrange
        let repo = InMemoryStoryRepository::new();
        seed_closed(&repo, "first", 9).await;
        seed_closed(&repo, "second", 10).await;
        seed_closed(&repo, "third", 11).await;
        let query = ListQuery {
            limit: 10,
            offset: 1,
            sort: SortField::CreatedAt,
            order: SortOrder::Desc,
        };

        // Act
        let view = list_stories(&query, &repo).await.unwrap();

        // Assert
        assert_eq!(view.count, 2);
        assert_eq!(view.results[0].title, "second");
        assert_eq!(view.results[1].title, "first");
    }

    #[tokio::test]
    async fn test_get_story_by_id_returns_full_story() {
        // Arrange
        let repo = InMemoryStoryRepository::new();
        let draft = placement::advance(placement::advance(StoryDraft::fresh(), "Hello"), "world");
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();
        let created = repo.create_story(&draft, now).await.unwrap();

        // Act
        let view = get_story_by_id(created.id, &repo).await.unwrap();

        // Assert
        assert_eq!(view.id, created.id);
        assert_eq!(view.title, "Hello");
        assert_eq!(view.paragraphs[0].sentences, vec!["world".to_owned()]);
        assert_eq!(view.created_at, now);
    }

    #[tokio::test]
    async fn test_get_story_by_id_returns_not_found_for_unknown_id() {
        let repo = InMemoryStoryRepository::new();

        let result = get_story_by_id(42, &repo).await;

        match result {
            Err(DomainError::StoryNotFound(id)) => assert_eq!(id, 42),
            other => panic!("expected StoryNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_list_stories_propagates_repository_failure() {
        let result = list_stories(&ListQuery::default(), &FailingStoryRepository).await;

        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
    }

    #[tokio::test]
    async fn test_story_view_serializes_paragraphs_and_rfc3339_timestamps() {
        let repo = InMemoryStoryRepository::new();
        seed_closed(&repo, "Hello", 10).await;

        let view = get_story_by_id(1, &repo).await.unwrap();
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["created_at"], "2026-01-15T10:00:00Z");
        assert_eq!(json["paragraphs"], serde_json::json!([{ "sentences": [] }]));
    }
}
