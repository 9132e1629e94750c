//! Shared test mocks and utilities for the Collab story service.

mod clock;
mod repository;

pub use clock::FixedClock;
pub use repository::{FailingStoryRepository, InMemoryStoryRepository};
