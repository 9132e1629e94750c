//! Collab — story bounded context.
//!
//! Responsible for placing submitted words into the open story and for the
//! read-side views of the story list and individual stories.

pub mod application;
pub mod domain;
