//! Collab Core — shared domain abstractions.
//!
//! This crate defines the story data model, the persistence trait and the
//! error type that the other crates depend on. It contains no
//! infrastructure code.

pub mod clock;
pub mod error;
pub mod repository;
pub mod story;
