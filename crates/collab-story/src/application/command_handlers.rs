//! Command handlers for the story context.
//!
//! This module contains application-level command handler functions that
//! orchestrate domain logic: load the open story, place the word, persist.

use collab_core::clock::Clock;
use collab_core::error::DomainError;
use collab_core::repository::StoryRepository;
use collab_core::story::{Story, StoryDraft};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::commands::AddWord;
use crate::domain::placement;

/// Number of read-place-write cycles attempted before a conflict is reported.
pub const MAX_ATTEMPTS: usize = 5;

/// Serializes the read-place-write cycle of concurrent `AddWord` commands.
///
/// One gate is shared by every submission in the process. The repository's
/// version check still guards writers outside this process.
#[derive(Debug, Default)]
pub struct WriteGate(Mutex<()>);

impl WriteGate {
    /// Creates an open gate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Result of a successfully placed word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddWordOutcome {
    /// The story the word landed in.
    pub story_id: i64,
    /// The story title after placement.
    pub title: String,
    /// The last sentence of the last paragraph after placement.
    pub current_sentence: String,
    /// Whether this command created the story.
    pub created: bool,
}

impl AddWordOutcome {
    fn from_story(story: &Story, created: bool) -> Self {
        Self {
            story_id: story.id,
            title: story.title.clone(),
            current_sentence: story.current_sentence().to_owned(),
            created,
        }
    }
}

/// Handles the `AddWord` command: places the word into the open story, or
/// into a new story when none is open, and persists the result.
///
/// The whole cycle runs while holding `gate`, so submissions in this process
/// never race each other. A version conflict from another writer re-reads
/// the open story and places the word again.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the repository fails, or
/// `DomainError::ConcurrencyConflict` if every attempt lost a race.
pub async fn handle_add_word(
    command: &AddWord,
    clock: &dyn Clock,
    repo: &dyn StoryRepository,
    gate: &WriteGate,
) -> Result<AddWordOutcome, DomainError> {
    let word = command.word.as_str();
    let _serialized = gate.0.lock().await;
    let mut last_conflict = None;

    for attempt in 1..=MAX_ATTEMPTS {
        let result = match repo.find_open_story().await? {
            None => {
                let draft = placement::advance(StoryDraft::fresh(), word);
                repo.create_story(&draft, clock.now())
                    .await
                    .map(|story| AddWordOutcome::from_story(&story, true))
            }
            Some(story) => {
                let draft = placement::advance(story.draft(), word);
                repo.apply_word(story.id, story.version, &draft, clock.now())
                    .await
                    .map(|updated| {
                        if !updated.open {
                            info!(story_id = updated.id, "story complete, closed for editing");
                        }
                        AddWordOutcome::from_story(&updated, false)
                    })
            }
        };

        match result {
            Ok(outcome) => {
                debug!(
                    correlation_id = %command.correlation_id,
                    story_id = outcome.story_id,
                    created = outcome.created,
                    "word placed"
                );
                return Ok(outcome);
            }
            Err(err @ DomainError::ConcurrencyConflict { .. }) => {
                warn!(
                    correlation_id = %command.correlation_id,
                    attempt,
                    error = %err,
                    "open story changed underneath, retrying"
                );
                last_conflict = Some(err);
            }
            Err(err) => return Err(err),
        }
    }

    Err(last_conflict.unwrap_or(DomainError::ConcurrencyConflict {
        story_id: 0,
        expected: 0,
        actual: 0,
    }))
}
