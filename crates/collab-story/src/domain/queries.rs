//! Validation of story-list query parameters.

use std::collections::BTreeMap;

use collab_core::story::{ListQuery, SortField, SortOrder};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Query parameters of a story-list request, exactly as received.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawListParams {
    /// Page size; must be a positive integer.
    pub limit: Option<String>,
    /// Page start; must be a non-negative integer.
    pub offset: Option<String>,
    /// One of `created_at`, `updated_at`, `title` (case-insensitive).
    pub sort: Option<String>,
    /// One of `asc`, `desc` (case-insensitive).
    pub order: Option<String>,
}

/// The offending parameters, keyed by name, with the values received.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid parameter values: {0:?}")]
pub struct InvalidParameters(pub BTreeMap<&'static str, String>);

impl RawListParams {
    /// Applies defaults and validates every parameter, collecting all
    /// violations rather than stopping at the first.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameters` naming each parameter that failed.
    pub fn validate(&self) -> Result<ListQuery, InvalidParameters> {
        let defaults = ListQuery::default();
        let mut invalid = BTreeMap::new();

        let limit = match &self.limit {
            None => defaults.limit,
            Some(raw) => match raw.parse::<u32>() {
                Ok(limit) if limit > 0 => limit,
                _ => {
                    invalid.insert("limit", raw.clone());
                    defaults.limit
                }
            },
        };

        let offset = match &self.offset {
            None => defaults.offset,
            Some(raw) => raw.parse::<u32>().unwrap_or_else(|_| {
                invalid.insert("offset", raw.clone());
                defaults.offset
            }),
        };

        let sort = match &self.sort {
            None => defaults.sort,
            Some(raw) => {
                let raw = raw.to_lowercase();
                raw.parse::<SortField>().unwrap_or_else(|()| {
                    invalid.insert("sort", raw);
                    defaults.sort
                })
            }
        };

        let order = match &self.order {
            None => defaults.order,
            Some(raw) => {
                let raw = raw.to_lowercase();
                raw.parse::<SortOrder>().unwrap_or_else(|()| {
                    invalid.insert("order", raw);
                    defaults.order
                })
            }
        };

        if invalid.is_empty() {
            Ok(ListQuery {
                limit,
                offset,
                sort,
                order,
            })
        } else {
            debug!(?invalid, "stories requested with invalid parameter values");
            Err(InvalidParameters(invalid))
        }
    }
}
