//! Application layer: orchestration between the domain and the repository.

pub mod command_handlers;
pub mod query_handlers;
