//! Shared application state.

use std::sync::Arc;

use collab_core::clock::Clock;
use collab_core::repository::StoryRepository;
use collab_story::application::command_handlers::WriteGate;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Source of timestamps for created/updated stories.
    pub clock: Arc<dyn Clock>,
    /// Story persistence.
    pub story_repository: Arc<dyn StoryRepository>,
    /// Serializes word submissions.
    pub write_gate: Arc<WriteGate>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, story_repository: Arc<dyn StoryRepository>) -> Self {
        Self {
            clock,
            story_repository,
            write_gate: Arc::new(WriteGate::new()),
        }
    }
}
