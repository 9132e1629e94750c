//! `SQLite` implementation of the `StoryRepository` trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::error;

use collab_core::error::DomainError;
use collab_core::repository::StoryRepository;
use collab_core::story::{Cursor, ListQuery, Paragraph, Story, StoryDraft, StorySummary};

/// SQLite-backed story repository.
#[derive(Debug, Clone)]
pub struct SqliteStoryRepository {
    pool: SqlitePool,
}

impl SqliteStoryRepository {
    /// Creates a new `SqliteStoryRepository`.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct StoryRow {
    id: i64,
    title: String,
    cursor: String,
    paragraphs: String,
    open: bool,
    version: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<StoryRow> for Story {
    type Error = DomainError;

    fn try_from(row: StoryRow) -> Result<Self, Self::Error> {
        let cursor: Cursor = row.cursor.parse().map_err(|e| {
            error!(story_id = row.id, error = %e, "stored cursor is unreadable");
            DomainError::Infrastructure(format!("story {}: {e}", row.id))
        })?;
        let paragraphs: Vec<Paragraph> = serde_json::from_str(&row.paragraphs).map_err(|e| {
            error!(story_id = row.id, error = %e, "stored paragraphs are unreadable");
            DomainError::Infrastructure(format!("story {}: paragraph decoding failed: {e}", row.id))
        })?;

        Ok(Self {
            id: row.id,
            title: row.title,
            cursor,
            paragraphs,
            open: row.open,
            version: row.version,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct SummaryRow {
    id: i64,
    title: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SummaryRow> for StorySummary {
    fn from(row: SummaryRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Logs a failed store operation in full and converts it to a domain error.
fn infrastructure(operation: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |err| {
        error!(operation, error = ?err, "story store operation failed");
        DomainError::Infrastructure(format!("{operation}: {err}"))
    }
}

fn encode_paragraphs(paragraphs: &[Paragraph]) -> Result<String, DomainError> {
    serde_json::to_string(paragraphs)
        .map_err(|e| DomainError::Infrastructure(format!("paragraph encoding failed: {e}")))
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[async_trait]
impl StoryRepository for SqliteStoryRepository {
    async fn find_open_story(&self) -> Result<Option<Story>, DomainError> {
        let row = sqlx::query_as::<_, StoryRow>(
            "SELECT id, title, cursor, paragraphs, open, version, created_at, updated_at \
             FROM stories WHERE open = 1",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(infrastructure("find_open_story"))?;

        row.map(Story::try_from).transpose()
    }

    async fn create_story(
        &self,
        draft: &StoryDraft,
        now: DateTime<Utc>,
    ) -> Result<Story, DomainError> {
        let paragraphs = encode_paragraphs(&draft.paragraphs)?;

        let row = sqlx::query_as::<_, StoryRow>(
            "INSERT INTO stories (title, cursor, paragraphs, open, version, created_at, updated_at) \
             VALUES (?, ?, ?, ?, 1, ?, ?) \
             RETURNING id, title, cursor, paragraphs, open, version, created_at, updated_at",
        )
        .bind(&draft.title)
        .bind(draft.cursor.to_string())
        .bind(paragraphs)
        .bind(draft.open)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                DomainError::ConcurrencyConflict {
                    story_id: 0,
                    expected: 0,
                    actual: 0,
                }
            } else {
                infrastructure("create_story")(err)
            }
        })?;

        row.try_into()
    }

    async fn apply_word(
        &self,
        story_id: i64,
        expected_version: i64,
        draft: &StoryDraft,
        now: DateTime<Utc>,
    ) -> Result<Story, DomainError> {
        let paragraphs = encode_paragraphs(&draft.paragraphs)?;
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(infrastructure("apply_word"))?;

        let row = sqlx::query_as::<_, StoryRow>(
            "UPDATE stories \
             SET title = ?, cursor = ?, paragraphs = ?, open = ?, \
                 version = version + 1, updated_at = ? \
             WHERE id = ? AND version = ? AND open = 1 \
             RETURNING id, title, cursor, paragraphs, open, version, created_at, updated_at",
        )
        .bind(&draft.title)
        .bind(draft.cursor.to_string())
        .bind(paragraphs)
        .bind(draft.open)
        .bind(now)
        .bind(story_id)
        .bind(expected_version)
        .fetch_optional(&mut *tx)
        .await
        .map_err(infrastructure("apply_word"))?;

        let Some(row) = row else {
            let actual: Option<i64> =
                sqlx::query_scalar("SELECT version FROM stories WHERE id = ?")
                    .bind(story_id)
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(infrastructure("apply_word"))?;
            return Err(match actual {
                None => DomainError::StoryNotFound(story_id),
                Some(actual) => DomainError::ConcurrencyConflict {
                    story_id,
                    expected: expected_version,
                    actual,
                },
            });
        };

        tx.commit().await.map_err(infrastructure("apply_word"))?;
        row.try_into()
    }

    async fn list_stories(&self, query: &ListQuery) -> Result<Vec<StorySummary>, DomainError> {
        // Column and direction come from closed enums, never from user text.
        let sql = format!(
            "SELECT id, title, created_at, updated_at FROM stories \
             ORDER BY {} {}, id ASC LIMIT ? OFFSET ?",
            query.sort.as_str(),
            query.order.as_str()
        );

        let rows = sqlx::query_as::<_, SummaryRow>(&sql)
            .bind(i64::from(query.limit))
            .bind(i64::from(query.offset))
            .fetch_all(&self.pool)
            .await
            .map_err(infrastructure("list_stories"))?;

        Ok(rows.into_iter().map(StorySummary::from).collect())
    }

    async fn get_story(&self, story_id: i64) -> Result<Story, DomainError> {
        let row = sqlx::query_as::<_, StoryRow>(
            "SELECT id, title, cursor, paragraphs, open, version, created_at, updated_at \
             FROM stories WHERE id = ?",
        )
        .bind(story_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(infrastructure("get_story"))?;

        row.ok_or(DomainError::StoryNotFound(story_id))?.try_into()
    }
}
