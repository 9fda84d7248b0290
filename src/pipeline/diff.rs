// src/pipeline/diff.rs

//! Snapshot diff calculation.
//!
//! Decides which works from the current feed snapshot are new or updated
//! relative to the previously persisted index.

use crate::models::Snapshot;

/// Work URLs in `current` that should be reported.
///
/// A work is new unless the previous index already holds it with a
/// timestamp at least as recent: a tie means "already seen", only a
/// strictly newer timestamp re-reports a known work. Works present only
/// in `previous` are ignored; the subsequent index save drops them.
pub fn new_work_ids(previous: &Snapshot, current: &Snapshot) -> Vec<String> {
    current
        .iter()
        .filter(|(url, updated)| {
            previous
                .get(url.as_str())
                .is_none_or(|seen| seen < *updated)
        })
        .map(|(url, _)| url.clone())
        .collect()
}
