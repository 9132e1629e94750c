//! Concurrent word submissions against a file-backed store configured like
//! the server's.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use collab_core::repository::StoryRepository;
use collab_core::story::ListQuery;
use collab_store::{SqliteStoryRepository, initialize_schema};
use collab_story::application::command_handlers::{WriteGate, handle_add_word};
use collab_story::domain::commands::{AddWord, Word};
use collab_test_support::FixedClock;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use uuid::Uuid;

const SUBMISSIONS: usize = 200;

async fn file_backed_repository(dir: &tempfile::TempDir) -> SqliteStoryRepository {
    let options = SqliteConnectOptions::new()
        .filename(dir.path().join("collab.sqlite"))
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal);
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await
        .unwrap();
    initialize_schema(&pool).await.unwrap();
    SqliteStoryRepository::new(pool)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_submissions_are_all_placed_in_one_story() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let repo = Arc::new(file_backed_repository(&dir).await);
    let gate = Arc::new(WriteGate::new());
    let clock = Arc::new(FixedClock(
        Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
    ));

    // Act
    let handles: Vec<_> = (0..SUBMISSIONS)
        .map(|i| {
            let repo = Arc::clone(&repo);
            let gate = Arc::clone(&gate);
            let clock = Arc::clone(&clock);
            tokio::spawn(async move {
                let command = AddWord {
                    correlation_id: Uuid::new_v4(),
                    word: Word::parse(&format!("w{i}")).unwrap(),
                };
                handle_add_word(&command, &*clock, &*repo, &gate).await
            })
        })
        .collect();

    let mut created = 0;
    for handle in handles {
        let outcome = handle.await.unwrap().unwrap();
        if outcome.created {
            created += 1;
        }
    }

    // Assert
    assert_eq!(created, 1);
    let stories = repo.list_stories(&ListQuery::default()).await.unwrap();
    assert_eq!(stories.len(), 1);

    let story = repo.get_story(stories[0].id).await.unwrap();
    assert!(story.open);
    let body_words: usize = story
        .paragraphs
        .iter()
        .flat_map(|p| &p.sentences)
        .map(|s| s.split_whitespace().count())
        .sum();
    assert_eq!(body_words, SUBMISSIONS - 1);
    assert_eq!(story.version, i64::try_from(SUBMISSIONS).unwrap());
}
