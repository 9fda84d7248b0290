//! Data structures shared across the indexer.

pub mod config;
pub mod work;

pub use config::{Config, FeedConfig, HttpConfig};
pub use work::{Snapshot, Work, TIMESTAMP_FORMAT};
