// src/pipeline/run.rs

//! Batch indexing runner.
//!
//! Processes authors strictly one after another: fetch the author's feed
//! snapshot, diff it against the persisted index, report each new work,
//! then persist the fresh snapshot. A feed failure skips that author
//! without touching any of their files; every other error is fatal for
//! the batch.

use std::path::PathBuf;

use crate::error::{AppError, Result};
use crate::pipeline::new_work_ids;
use crate::services::WorkSource;
use crate::storage::{IndexStore, ReportWriter};

/// Directory under the output path holding per-author index files.
const INDEX_DIR: &str = ".index";

/// Options for one indexing run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Directory receiving report files (index files go to `.index/` below it)
    pub output_dir: PathBuf,

    /// Write all authors into one combined report file
    pub single_file: bool,

    /// Priming mode: persist the current snapshot without reporting anything
    pub mark_all_seen: bool,
}

/// Counters for one indexing run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Authors fully processed
    pub authors_indexed: usize,

    /// Authors skipped because their feed fetch failed
    pub authors_failed: usize,

    /// Works reported to output files
    pub works_emitted: usize,

    /// New works whose metadata could not be fetched
    pub works_skipped: usize,
}

/// Run the indexer for every author in order.
///
/// Returns the accumulated counters. Fails only on errors that indicate
/// broken local state (I/O, corrupt index files); feed failures are
/// logged per author and the batch continues.
pub async fn run_indexer(
    source: &dyn WorkSource,
    authors: &[String],
    options: &RunOptions,
) -> Result<RunStats> {
    let index = IndexStore::new(options.output_dir.join(INDEX_DIR));
    index.ensure_dir()?;
    let reports = ReportWriter::new(&options.output_dir, options.single_file);

    let mut stats = RunStats::default();
    for author in authors {
        log::info!("Indexing works for {}", author);
        match index_author(source, author, &index, &reports, options, &mut stats).await {
            Ok(()) => {
                stats.authors_indexed += 1;
                log::info!("Finished indexing for {}", author);
            }
            Err(AppError::Feed { .. }) => {
                stats.authors_failed += 1;
                log::warn!(
                    "Indexing for {} aborted by a feed error; it will be retried on the next run",
                    author
                );
            }
            Err(e) => return Err(e),
        }
    }

    log::info!(
        "Run complete: {} authors indexed, {} failed, {} works reported, {} skipped",
        stats.authors_indexed,
        stats.authors_failed,
        stats.works_emitted,
        stats.works_skipped
    );
    Ok(stats)
}

/// Process a single author: FETCH_FEED → DIFF → EMIT* → PERSIST.
async fn index_author(
    source: &dyn WorkSource,
    author: &str,
    index: &IndexStore,
    reports: &ReportWriter,
    options: &RunOptions,
    stats: &mut RunStats,
) -> Result<()> {
    let current = source.fetch_all(author).await?;

    // The diff only runs against an existing index and outside priming
    // mode; a first run just seeds the index below without reporting.
    if !options.mark_all_seen && index.exists(author) {
        let previous = index.load(author)?;
        for url in new_work_ids(&previous, &current) {
            log::info!("New work by {}: {}", author, url);
            match source.extract(&url).await {
                Some(work) => {
                    reports.append(author, &work).await?;
                    stats.works_emitted += 1;
                }
                None => {
                    log::warn!("Skipping work {} for {}: metadata unavailable", url, author);
                    stats.works_skipped += 1;
                }
            }
        }
    }

    // Unconditional: the index always converges to the latest feed state.
    index.save(author, &current)?;
    Ok(())
}
