// Library module for treehash
// Re-exports modules for use in integration tests and the binary

pub mod cli;
pub mod config;
pub mod hash;
pub mod logging;

pub use config::RunConfig;
pub use hash::{HashWalkError, RunCoordinator, RunOutcome, RunSummary};
