//! Application services for quest runs.

pub mod assembly;
pub mod command_handlers;
pub mod decomposition;
pub mod query_handlers;
