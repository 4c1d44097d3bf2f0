//! Application layer over `whoop_client`: multi-day collection, derived
//! statistics and the `whoop-garden` command line.

pub mod batch;
pub mod commands;
pub mod error;
pub mod summary;

pub use commands::{Cli, Commands};
pub use error::{AppError, AppResult};
