// src/storage/report.rs

//! Append-only report files.
//!
//! One block is appended per reported work. Files are never truncated or
//! deduplicated. Appends are not locked: the indexer runs strictly
//! sequentially in a single process, and concurrent invocations against
//! the same output path are out of scope.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::io::AsyncWriteExt;

use crate::error::Result;
use crate::models::{TIMESTAMP_FORMAT, Work};

/// Writer appending work reports under an output directory.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    output_dir: PathBuf,
    single_file: bool,
}

impl ReportWriter {
    /// File name used when all authors share one report file.
    pub const COMBINED_FILE: &'static str = "updates.txt";

    pub fn new(output_dir: impl Into<PathBuf>, single_file: bool) -> Self {
        Self {
            output_dir: output_dir.into(),
            single_file,
        }
    }

    /// Report file path for the given author.
    pub fn path_for(&self, author: &str) -> PathBuf {
        if self.single_file {
            self.output_dir.join(Self::COMBINED_FILE)
        } else {
            self.output_dir.join(format!("{author}.txt"))
        }
    }

    /// Append one work block to the author's report file.
    pub async fn append(&self, author: &str, work: &Work) -> Result<()> {
        let path = self.path_for(author);
        let block = render_block(author, &path, work);

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        file.write_all(block.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

/// Render one report block.
///
/// The attribution header is omitted when the file is dedicated to this
/// author, i.e. its base name matches the author name.
fn render_block(author: &str, path: &Path, work: &Work) -> String {
    let mut block = String::new();
    if path.file_stem().and_then(|s| s.to_str()) != Some(author) {
        block.push_str(&format!("New work by \"{author}\"\n"));
    }
    block.push_str(&format!(
        "Indexed at {}\n",
        Utc::now().format(TIMESTAMP_FORMAT)
    ));
    block.push_str("----------------\n");
    block.push_str(&work.render());
    block.push_str(&"-".repeat(20));
    block.push_str("\n\n\n");
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_work() -> Work {
        Work {
            title: Some("On the Indexing of Works".to_string()),
            authors: Some(vec!["A. Ivanov".to_string()]),
            ..Work::default()
        }
    }

    #[tokio::test]
    async fn test_per_author_file_omits_attribution() {
        let tmp = TempDir::new().unwrap();
        let writer = ReportWriter::new(tmp.path(), false);

        writer.append("A. Ivanov", &sample_work()).await.unwrap();

        let content = std::fs::read_to_string(tmp.path().join("A. Ivanov.txt")).unwrap();
        assert!(!content.contains("New work by"));
        assert!(content.contains("Indexed at "));
        assert!(content.contains("Title: On the Indexing of Works\n"));
        assert!(content.ends_with(&format!("{}\n\n\n", "-".repeat(20))));
    }

    #[tokio::test]
    async fn test_combined_file_carries_attribution() {
        let tmp = TempDir::new().unwrap();
        let writer = ReportWriter::new(tmp.path(), true);

        writer.append("A. Ivanov", &sample_work()).await.unwrap();

        let content = std::fs::read_to_string(tmp.path().join("updates.txt")).unwrap();
        assert!(content.starts_with("New work by \"A. Ivanov\"\n"));
    }

    #[tokio::test]
    async fn test_appends_accumulate() {
        let tmp = TempDir::new().unwrap();
        let writer = ReportWriter::new(tmp.path(), false);

        writer.append("A. Ivanov", &sample_work()).await.unwrap();
        writer.append("A. Ivanov", &sample_work()).await.unwrap();

        let content = std::fs::read_to_string(tmp.path().join("A. Ivanov.txt")).unwrap();
        assert_eq!(content.matches("Indexed at ").count(), 2);
    }
}
