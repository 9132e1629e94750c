//! Collab Store — SQLite persistence for stories.

pub mod schema;
pub mod sqlite_story_repository;

pub use schema::initialize_schema;
pub use sqlite_story_repository::SqliteStoryRepository;
