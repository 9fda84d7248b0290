//! Persistence for indexer state and report output.
//!
//! - `index`: per-author CSV files recording the last seen feed snapshot
//! - `report`: append-only text files accumulating reported works
//!
//! ## Directory Structure
//!
//! ```text
//! {output}/
//! ├── .index/                  # Last seen state, one file per author
//! │   └── index_{author}.csv
//! ├── {author}.txt             # Per-author reports (default)
//! └── updates.txt              # Combined reports (--single-file)
//! ```

pub mod index;
pub mod report;

pub use index::IndexStore;
pub use report::ReportWriter;
