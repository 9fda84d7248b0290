// src/storage/index.rs

//! Per-author index files.
//!
//! Each file records the feed snapshot as of the last successful run: two
//! CSV columns, work URL and timestamp, no header. The file is fully
//! replaced on every save: it models "latest observed state", never an
//! append log.

use std::path::PathBuf;

use chrono::NaiveDateTime;

use crate::error::{AppError, Result};
use crate::models::{Snapshot, TIMESTAMP_FORMAT};

/// Store for per-author index files under a single directory.
#[derive(Debug, Clone)]
pub struct IndexStore {
    dir: PathBuf,
}

impl IndexStore {
    /// Create a store rooted at the given directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Create the index directory if it does not exist yet.
    pub fn ensure_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    /// Path of the index file for one author.
    pub fn path_for(&self, author: &str) -> PathBuf {
        self.dir.join(format!("index_{author}.csv"))
    }

    /// Whether an index file exists for the author.
    pub fn exists(&self, author: &str) -> bool {
        self.path_for(author).exists()
    }

    /// Load the author's index file into a snapshot.
    ///
    /// Empty rows are skipped. A malformed timestamp or missing column is
    /// an [`AppError::Index`]: corrupt state files are fatal, not skipped.
    pub fn load(&self, author: &str) -> Result<Snapshot> {
        let path = self.path_for(author);
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&path)?;

        let mut snapshot = Snapshot::new();
        for record in reader.records() {
            // Structural corruption (bad quoting, invalid UTF-8) is the
            // same class of failure as a bad timestamp: fatal, and the
            // error must name the file.
            let record = record.map_err(|e| AppError::index(&path, e))?;
            if record.iter().all(|field| field.trim().is_empty()) {
                continue;
            }
            let url = record
                .get(0)
                .ok_or_else(|| AppError::index(&path, "missing URL column"))?;
            let raw = record
                .get(1)
                .ok_or_else(|| AppError::index(&path, format!("missing timestamp for {url}")))?;
            let timestamp = NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
                .map_err(|e| AppError::index(&path, format!("bad timestamp '{raw}': {e}")))?;
            snapshot.insert(url.to_string(), timestamp);
        }
        Ok(snapshot)
    }

    /// Overwrite the author's index file with the full snapshot.
    pub fn save(&self, author: &str, snapshot: &Snapshot) -> Result<()> {
        let path = self.path_for(author);
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&path)?;
        for (url, timestamp) in snapshot {
            writer.write_record([url, &timestamp.format(TIMESTAMP_FORMAT).to_string()])?;
        }
        writer.flush()?;
        Ok(())
    }
}
