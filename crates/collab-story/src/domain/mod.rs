//! Domain layer: the placement engine and validated command/query inputs.

pub mod commands;
pub mod placement;
pub mod queries;
