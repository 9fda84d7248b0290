//! Pipeline entry points for indexing operations.
//!
//! - `new_work_ids`: snapshot diff deciding which works get reported
//! - `run_indexer`: batch runner processing one author at a time

pub mod diff;
pub mod run;

pub use diff::new_work_ids;
pub use run::{RunOptions, RunStats, run_indexer};
