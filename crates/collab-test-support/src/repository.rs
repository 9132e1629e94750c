//! Test repositories — mock `StoryRepository` implementations for tests.

use std::cmp::Ordering;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use collab_core::error::DomainError;
use collab_core::repository::StoryRepository;
use collab_core::story::{ListQuery, SortField, SortOrder, Story, StoryDraft, StorySummary};

#[derive(Debug, Default)]
struct State {
    stories: Vec<Story>,
    conflicts_remaining: usize,
}

/// A story repository held in memory with the same contract as the SQLite
/// store: sequential ids from 1, a single open story, and version-guarded
/// updates.
#[derive(Debug, Default)]
pub struct InMemoryStoryRepository {
    state: Mutex<State>,
}

impl InMemoryStoryRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `count` calls to `create_story` or `apply_word` fail
    /// with `ConcurrencyConflict` without writing anything.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn fail_next_writes_with_conflict(&self, count: usize) {
        self.state.lock().unwrap().conflicts_remaining = count;
    }
}

fn injected_conflict(state: &mut State, story_id: i64) -> Option<DomainError> {
    if state.conflicts_remaining == 0 {
        return None;
    }
    state.conflicts_remaining -= 1;
    Some(DomainError::ConcurrencyConflict {
        story_id,
        expected: 0,
        actual: 0,
    })
}

fn compare(a: &Story, b: &Story, sort: SortField) -> Ordering {
    match sort {
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        SortField::Title => a.title.cmp(&b.title),
    }
}

#[async_trait]
impl StoryRepository for InMemoryStoryRepository {
    async fn find_open_story(&self) -> Result<Option<Story>, DomainError> {
        let state = self.state.lock().unwrap();
        Ok(state.stories.iter().find(|s| s.open).cloned())
    }

    async fn create_story(
        &self,
        draft: &StoryDraft,
        now: DateTime<Utc>,
    ) -> Result<Story, DomainError> {
        let mut state = self.state.lock().unwrap();
        if let Some(conflict) = injected_conflict(&mut state, 0) {
            return Err(conflict);
        }
        if draft.open {
            if let Some(open) = state.stories.iter().find(|s| s.open) {
                return Err(DomainError::ConcurrencyConflict {
                    story_id: open.id,
                    expected: 0,
                    actual: open.version,
                });
            }
        }

        let story = Story {
            id: i64::try_from(state.stories.len()).unwrap() + 1,
            title: draft.title.clone(),
            cursor: draft.cursor,
            paragraphs: draft.paragraphs.clone(),
            open: draft.open,
            version: 1,
            created_at: now,
            updated_at: now,
        };
        state.stories.push(story.clone());
        Ok(story)
    }

    async fn apply_word(
        &self,
        story_id: i64,
        expected_version: i64,
        draft: &StoryDraft,
        now: DateTime<Utc>,
    ) -> Result<Story, DomainError> {
        let mut state = self.state.lock().unwrap();
        if let Some(conflict) = injected_conflict(&mut state, story_id) {
            return Err(conflict);
        }
        let story = state
            .stories
            .iter_mut()
            .find(|s| s.id == story_id)
            .ok_or(DomainError::StoryNotFound(story_id))?;
        if story.version != expected_version || !story.open {
            return Err(DomainError::ConcurrencyConflict {
                story_id,
                expected: expected_version,
                actual: story.version,
            });
        }

        story.title.clone_from(&draft.title);
        story.cursor = draft.cursor;
        story.paragraphs.clone_from(&draft.paragraphs);
        story.open = draft.open;
        story.version += 1;
        story.updated_at = now;
        Ok(story.clone())
    }

    async fn list_stories(&self, query: &ListQuery) -> Result<Vec<StorySummary>, DomainError> {
        let state = self.state.lock().unwrap();
        let mut stories: Vec<&Story> = state.stories.iter().collect();
        stories.sort_by(|a, b| {
            let ordering = compare(a, b, query.sort);
            let ordering = match query.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            };
            ordering.then(a.id.cmp(&b.id))
        });

        Ok(stories
            .into_iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .map(Story::summary)
            .collect())
    }

    async fn get_story(&self, story_id: i64) -> Result<Story, DomainError> {
        let state = self.state.lock().unwrap();
        state
            .stories
            .iter()
            .find(|s| s.id == story_id)
            .cloned()
            .ok_or(DomainError::StoryNotFound(story_id))
    }
}

/// A story repository that always returns an infrastructure error. Useful for
/// testing error-handling paths.
#[derive(Debug)]
pub struct FailingStoryRepository;

#[async_trait]
impl StoryRepository for FailingStoryRepository {
    async fn find_open_story(&self) -> Result<Option<Story>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn create_story(
        &self,
        _draft: &StoryDraft,
        _now: DateTime<Utc>,
    ) -> Result<Story, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn apply_word(
        &self,
        _story_id: i64,
        _expected_version: i64,
        _draft: &StoryDraft,
        _now: DateTime<Utc>,
    ) -> Result<Story, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn list_stories(&self, _query: &ListQuery) -> Result<Vec<StorySummary>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn get_story(&self, _story_id: i64) -> Result<Story, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}
