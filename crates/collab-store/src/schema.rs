//! Story store database schema.

use sqlx::SqlitePool;

/// SQL to create the stories table. Safe to run on every startup.
pub const CREATE_STORIES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS stories (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT NOT NULL DEFAULT '',
    cursor      TEXT NOT NULL DEFAULT '1|0|0',
    paragraphs  TEXT NOT NULL DEFAULT '[{"sentences": []}]',
    open        INTEGER NOT NULL DEFAULT 1,
    version     INTEGER NOT NULL DEFAULT 1,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_stories_single_open
    ON stories (open) WHERE open = 1;

CREATE INDEX IF NOT EXISTS idx_stories_created_at ON stories (created_at);
CREATE INDEX IF NOT EXISTS idx_stories_updated_at ON stories (updated_at);
CREATE INDEX IF NOT EXISTS idx_stories_title ON stories (title);
"#;

/// Creates the schema if it does not exist yet.
///
/// # Errors
///
/// Returns the underlying `sqlx::Error` if the script cannot be executed.
pub async fn initialize_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(CREATE_STORIES_TABLE).execute(pool).await?;
    tracing::debug!("story schema initialized");
    Ok(())
}
