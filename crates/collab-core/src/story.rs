//! Story data model shared by the engine, the store and the HTTP surface.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Write position of the next accepted word.
///
/// Persisted as `"<title-flag>|<paragraph>|<sentence>"`, e.g. `"1|0|0"` for a
/// story that still expects its title word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// The next word becomes (part of) the title.
    pub writing_title: bool,
    /// Index of the paragraph being written.
    pub paragraph: usize,
    /// Index of the sentence being written within that paragraph.
    pub sentence: usize,
}

impl Cursor {
    /// Cursor of a story that has not accepted any word yet.
    #[must_use]
    pub const fn fresh() -> Self {
        Self {
            writing_title: true,
            paragraph: 0,
            sentence: 0,
        }
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::fresh()
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}",
            u8::from(self.writing_title),
            self.paragraph,
            self.sentence
        )
    }
}

/// Error returned when a persisted cursor string is malformed.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("malformed cursor: {0:?}")]
pub struct CursorParseError(pub String);

impl FromStr for Cursor {
    type Err = CursorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || CursorParseError(s.to_owned());
        let mut parts = s.split('|');
        let (Some(flag), Some(paragraph), Some(sentence), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed());
        };

        let writing_title = match flag {
            "0" => false,
            "1" => true,
            _ => return Err(malformed()),
        };

        Ok(Self {
            writing_title,
            paragraph: paragraph.parse().map_err(|_| malformed())?,
            sentence: sentence.parse().map_err(|_| malformed())?,
        })
    }
}

/// An ordered run of sentences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Space-joined sentences in insertion order.
    pub sentences: Vec<String>,
}

/// The mutable part of a story: everything the placement engine produces and
/// the store writes back in one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryDraft {
    /// Story title.
    pub title: String,
    /// Where the next word lands.
    pub cursor: Cursor,
    /// Story body.
    pub paragraphs: Vec<Paragraph>,
    /// Whether the story still accepts words.
    pub open: bool,
}

impl StoryDraft {
    /// The state of a story before its first word.
    #[must_use]
    pub fn fresh() -> Self {
        Self {
            title: String::new(),
            cursor: Cursor::fresh(),
            paragraphs: vec![Paragraph::default()],
            open: true,
        }
    }

    /// The last sentence of the last paragraph, or `""` if there is none.
    #[must_use]
    pub fn current_sentence(&self) -> &str {
        last_sentence(&self.paragraphs)
    }
}

/// A persisted story.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Story {
    /// Identifier assigned by the store.
    pub id: i64,
    /// Story title.
    pub title: String,
    /// Where the next word lands.
    pub cursor: Cursor,
    /// Story body.
    pub paragraphs: Vec<Paragraph>,
    /// Whether this is the open story.
    pub open: bool,
    /// Number of accepted writes; guards concurrent updates.
    pub version: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last accepted word.
    pub updated_at: DateTime<Utc>,
}

impl Story {
    /// Copies the mutable part of the story for the placement engine.
    #[must_use]
    pub fn draft(&self) -> StoryDraft {
        StoryDraft {
            title: self.title.clone(),
            cursor: self.cursor,
            paragraphs: self.paragraphs.clone(),
            open: self.open,
        }
    }

    /// The last sentence of the last paragraph, or `""` if there is none.
    #[must_use]
    pub fn current_sentence(&self) -> &str {
        last_sentence(&self.paragraphs)
    }

    /// Summary used by list responses.
    #[must_use]
    pub fn summary(&self) -> StorySummary {
        StorySummary {
            id: self.id,
            title: self.title.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

fn last_sentence(paragraphs: &[Paragraph]) -> &str {
    paragraphs
        .last()
        .and_then(|p| p.sentences.last())
        .map_or("", String::as_str)
}

/// A story without its body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorySummary {
    /// Story identifier.
    pub id: i64,
    /// Story title.
    pub title: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last accepted word.
    pub updated_at: DateTime<Utc>,
}

/// Column a story list is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    /// Creation time.
    #[default]
    CreatedAt,
    /// Last update time.
    UpdatedAt,
    /// Title, lexicographically.
    Title,
}

impl SortField {
    /// The column name, also the accepted query parameter value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::Title => "title",
        }
    }
}

impl FromStr for SortField {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created_at" => Ok(Self::CreatedAt),
            "updated_at" => Ok(Self::UpdatedAt),
            "title" => Ok(Self::Title),
            _ => Err(()),
        }
    }
}

/// Direction a story list is ordered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Ascending.
    #[default]
    Asc,
    /// Descending.
    Desc,
}

impl SortOrder {
    /// The SQL keyword, also the accepted query parameter value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(()),
        }
    }
}

/// A validated page request over the story list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListQuery {
    /// Maximum number of stories returned; always positive.
    pub limit: u32,
    /// Number of stories skipped.
    pub offset: u32,
    /// Sort column.
    pub sort: SortField,
    /// Sort direction.
    pub order: SortOrder,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            limit: 100,
            offset: 0,
            sort: SortField::default(),
            order: SortOrder::default(),
        }
    }
}
