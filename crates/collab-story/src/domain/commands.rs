//! Commands for the story context.

use std::fmt;

use thiserror::Error;
use uuid::Uuid;

/// Why a submission could not be reduced to exactly one word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WordError {
    /// The submission was empty or only whitespace.
    #[error("no words sent")]
    NoWordsSent,
    /// The submission contained more than one token.
    #[error("multiple words sent")]
    MultipleWordsSent,
}

/// A single whitespace-free, non-empty token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word(String);

impl Word {
    /// Validates that `raw` holds exactly one whitespace-delimited token.
    ///
    /// # Errors
    ///
    /// Returns `WordError::NoWordsSent` for blank input and
    /// `WordError::MultipleWordsSent` for more than one token.
    pub fn parse(raw: &str) -> Result<Self, WordError> {
        let mut tokens = raw.split_whitespace();
        match (tokens.next(), tokens.next()) {
            (None, _) => Err(WordError::NoWordsSent),
            (Some(word), None) => Ok(Self(word.to_owned())),
            (Some(_), Some(_)) => Err(WordError::MultipleWordsSent),
        }
    }

    /// The token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Command to append one word to the open story, opening a new story if
/// none is open.
#[derive(Debug, Clone)]
pub struct AddWord {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The word to place.
    pub word: Word,
}
