//! works-indexer CLI
//!
//! Reads a list of author names, checks the repository's search feed for
//! works that are new or updated since the last run, and appends report
//! blocks to per-author (or combined) output files.

use std::path::{Path, PathBuf};

use clap::Parser;
use works_indexer::{
    error::Result,
    models::Config,
    pipeline::{self, RunOptions},
    services::RepoSource,
};

/// works-indexer - Repository Works Watcher
#[derive(Parser, Debug)]
#[command(
    name = "works-indexer",
    version,
    about = "Watches a digital repository for new and updated works by author"
)]
struct Cli {
    /// File with author names to index, one per line
    #[arg(short, long)]
    authors: PathBuf,

    /// Directory receiving report files and the index
    #[arg(short, long)]
    output: PathBuf,

    /// Optional configuration file (TOML); defaults are used otherwise
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Record all current works as already seen without reporting them
    /// (first-run priming)
    #[arg(long)]
    mark_all_seen: bool,

    /// Write all authors into one combined updates.txt instead of one
    /// file per author
    #[arg(long)]
    single_file: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Read author names from a newline-delimited file, trimming whitespace
/// and dropping blank lines.
fn read_authors(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    log::info!("works-indexer starting...");

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    config.validate()?;

    let authors = read_authors(&cli.authors)?;
    log::info!("Read {} authors from {}", authors.len(), cli.authors.display());

    let source = RepoSource::new(&config)?;
    let options = RunOptions {
        output_dir: cli.output,
        single_file: cli.single_file,
        mark_all_seen: cli.mark_all_seen,
    };

    let stats = pipeline::run_indexer(&source, &authors, &options).await?;
    if stats.authors_failed > 0 {
        log::warn!(
            "{} of {} authors could not be indexed this run",
            stats.authors_failed,
            authors.len()
        );
    }

    log::info!("Done!");

    Ok(())
}
