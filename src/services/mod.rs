//! Repository access services.
//!
//! - [`FeedClient`]: paginated open-search feed queries per author
//! - [`WorkExtractor`]: metadata extraction from work detail pages
//! - [`WorkSource`]: the seam the pipeline talks through

use async_trait::async_trait;

pub mod feed;
pub mod works;

pub use feed::FeedClient;
pub use works::WorkExtractor;

use crate::error::Result;
use crate::models::{Config, Snapshot, Work};
use crate::utils::http;

/// Source of feed snapshots and work metadata.
///
/// The pipeline only sees this trait, so the indexing state machine can be
/// exercised without a live repository.
#[async_trait]
pub trait WorkSource: Send + Sync {
    /// Fetch the current snapshot of works attributed to `author`.
    ///
    /// Fails with [`crate::error::AppError::Feed`] as a whole; no partial
    /// snapshots.
    async fn fetch_all(&self, author: &str) -> Result<Snapshot>;

    /// Fetch and extract metadata for one work, `None` when the page
    /// cannot be retrieved.
    async fn extract(&self, url: &str) -> Option<Work>;
}

/// Production [`WorkSource`] backed by the repository's HTTP endpoints.
pub struct RepoSource {
    feed: FeedClient,
    works: WorkExtractor,
}

impl RepoSource {
    /// Build the source from the application configuration, sharing one
    /// HTTP client between feed and work fetches.
    pub fn new(config: &Config) -> Result<Self> {
        let client = http::create_client(&config.http)?;
        Ok(Self {
            feed: FeedClient::new(config, client.clone())?,
            works: WorkExtractor::new(client),
        })
    }
}

#[async_trait]
impl WorkSource for RepoSource {
    async fn fetch_all(&self, author: &str) -> Result<Snapshot> {
        self.feed.fetch_all(author).await
    }

    async fn extract(&self, url: &str) -> Option<Work> {
        self.works.extract(url).await
    }
}
