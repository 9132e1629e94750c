//! Route modules.

pub mod add;
pub mod health;
pub mod stories;
