// src/services/feed.rs

//! Open-search feed client.
//!
//! Pages through the repository's Atom search feed for one author and
//! produces a snapshot of work URL → last-modified timestamp. Pagination
//! metadata is server-authoritative: the values reported in each response
//! drive termination and the next page offset, not the requested ones.

use std::time::Duration;

use chrono::{DateTime, NaiveDateTime, Timelike, Utc};
use serde::Deserialize;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{Config, Snapshot};

/// Client for the repository's open-search endpoint.
pub struct FeedClient {
    client: reqwest::Client,
    base: Url,
    page_size: u64,
    request_delay: Duration,
}

/// One page of the Atom search feed.
///
/// quick-xml's deserializer strips namespace prefixes, so the open-search
/// pagination elements are matched by local name only.
#[derive(Debug, Deserialize)]
struct AtomFeed {
    #[serde(rename = "totalResults")]
    total_results: u64,

    #[serde(rename = "itemsPerPage")]
    items_per_page: u64,

    #[serde(rename = "startIndex")]
    start_index: u64,

    #[serde(rename = "entry", default)]
    entries: Vec<AtomEntry>,
}

impl AtomFeed {
    fn paging(&self) -> Paging {
        Paging {
            start_index: self.start_index,
            items_per_page: self.items_per_page,
            total_results: self.total_results,
        }
    }
}

/// One work entry within a feed page.
#[derive(Debug, Deserialize)]
struct AtomEntry {
    #[serde(rename = "link", default)]
    links: Vec<AtomLink>,

    updated: DateTime<Utc>,

    #[serde(rename = "author", default)]
    authors: Vec<AtomAuthor>,
}

impl AtomEntry {
    /// The entry's detail-page URL: the `alternate` link, or the first link
    /// when no relation is given.
    fn link(&self) -> Option<&str> {
        self.links
            .iter()
            .find(|l| l.rel.as_deref().is_none_or(|rel| rel == "alternate"))
            .or_else(|| self.links.first())
            .map(|l| l.href.as_str())
    }
}

#[derive(Debug, Deserialize)]
struct AtomLink {
    #[serde(rename = "@href")]
    href: String,

    #[serde(rename = "@rel")]
    rel: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AtomAuthor {
    name: String,
}

/// Server-reported pagination state for one page.
#[derive(Debug, Clone, Copy)]
struct Paging {
    start_index: u64,
    items_per_page: u64,
    total_results: u64,
}

impl Paging {
    /// Whether this page is the last one. Holds trivially when
    /// `total_results` is 0, so an empty result set never requests a
    /// second page.
    fn is_last(&self) -> bool {
        self.start_index + self.items_per_page >= self.total_results
    }

    /// Offset of the page after this one.
    fn next_start(&self) -> u64 {
        self.start_index + self.items_per_page
    }
}

impl FeedClient {
    /// Create a feed client from the application configuration.
    pub fn new(config: &Config, client: reqwest::Client) -> Result<Self> {
        Ok(Self {
            client,
            base: Url::parse(&config.feed.base_url)?,
            page_size: config.feed.page_size,
            request_delay: Duration::from_millis(config.http.request_delay_ms),
        })
    }

    /// Fetch the complete snapshot of works attributed to `author`.
    ///
    /// Issues paginated queries until the server-reported pagination is
    /// exhausted; at least one page is always requested. Any page failure
    /// (timeout, non-success status, unparsable feed) aborts the whole
    /// fetch with [`AppError::Feed`]; partial results are discarded and
    /// the caller must treat the operation as failed.
    pub async fn fetch_all(&self, author: &str) -> Result<Snapshot> {
        let mut snapshot = Snapshot::new();
        let mut start = 1;

        loop {
            let url = self.page_url(author, start);
            log::debug!("Requesting feed page: {}", url);

            let body = self
                .fetch_page(url)
                .await
                .map_err(|e| AppError::feed(author, e))?;
            let feed: AtomFeed =
                quick_xml::de::from_str(&body).map_err(|e| AppError::feed(author, e))?;

            let paging = feed.paging();
            log::debug!(
                "Feed page: start = {}, per page = {}, total = {}",
                paging.start_index,
                paging.items_per_page,
                paging.total_results
            );

            collect_entries(author, feed.entries, &mut snapshot);

            if paging.is_last() {
                break;
            }
            start = paging.next_start();

            if !self.request_delay.is_zero() {
                tokio::time::sleep(self.request_delay).await;
            }
        }
        Ok(snapshot)
    }

    /// Build the query URL for one feed page.
    fn page_url(&self, author: &str, start: u64) -> Url {
        let mut url = self.base.clone();
        url.query_pairs_mut()
            .append_pair("start", &start.to_string())
            .append_pair("rpp", &self.page_size.to_string())
            .append_pair("format", "atom")
            .append_pair("query", &format!("\"{author}\""));
        url
    }

    async fn fetch_page(&self, url: Url) -> std::result::Result<String, reqwest::Error> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        response.text().await
    }
}

/// Record the entries attributed to `author` into the snapshot.
///
/// Duplicate links overwrite (last write wins); entries without a link are
/// ignored.
fn collect_entries(author: &str, entries: Vec<AtomEntry>, snapshot: &mut Snapshot) {
    for entry in entries {
        if !matches_author(&entry.authors, author) {
            continue;
        }
        if let Some(link) = entry.link() {
            snapshot.insert(link.to_string(), to_index_timestamp(entry.updated));
        }
    }
}

/// Whether the entry's author list contains the queried name.
///
/// Exact string comparison. Name variants and transliteration are known to
/// slip through this; the check lives here so the comparison can be swapped
/// without touching pagination or diffing.
fn matches_author(entry_authors: &[AtomAuthor], author: &str) -> bool {
    entry_authors.iter().any(|a| a.name == author)
}

/// Truncate a feed timestamp to whole seconds, the precision the index
/// file format preserves.
fn to_index_timestamp(updated: DateTime<Utc>) -> NaiveDateTime {
    let naive = updated.naive_utc();
    naive.with_nanosecond(0).unwrap_or(naive)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED_PAGE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom"
      xmlns:opensearch="http://a9.com/-/spec/opensearch/1.1/">
  <title>Search results</title>
  <opensearch:totalResults>2</opensearch:totalResults>
  <opensearch:itemsPerPage>20</opensearch:itemsPerPage>
  <opensearch:startIndex>0</opensearch:startIndex>
  <entry>
    <title>First work</title>
    <link href="https://repo.example/handle/1"/>
    <updated>2024-01-01T00:00:00Z</updated>
    <author><name>A. Ivanov</name></author>
    <author><name>B. Petrov</name></author>
  </entry>
  <entry>
    <title>Second work</title>
    <link href="https://repo.example/handle/2"/>
    <updated>2024-02-01T12:30:45Z</updated>
    <author><name>B. Petrov</name></author>
  </entry>
</feed>"#;

    fn parse(xml: &str) -> AtomFeed {
        quick_xml::de::from_str(xml).unwrap()
    }

    #[test]
    fn test_parse_feed_page() {
        let feed = parse(FEED_PAGE);
        assert_eq!(feed.total_results, 2);
        assert_eq!(feed.items_per_page, 20);
        assert_eq!(feed.start_index, 0);
        assert_eq!(feed.entries.len(), 2);
        assert_eq!(
            feed.entries[0].link(),
            Some("https://repo.example/handle/1")
        );
    }

    #[test]
    fn test_pagination_elements_match_by_local_name() {
        // Prefixes are stripped during deserialization; a server binding
        // the open-search namespace to another prefix must parse the same.
        let xml = r#"<?xml version="1.0"?>
<feed xmlns="http://www.w3.org/2005/Atom"
      xmlns:os="http://a9.com/-/spec/opensearch/1.1/">
  <os:totalResults>7</os:totalResults>
  <os:itemsPerPage>5</os:itemsPerPage>
  <os:startIndex>0</os:startIndex>
</feed>"#;
        let feed = parse(xml);
        assert_eq!(feed.total_results, 7);
        assert_eq!(feed.items_per_page, 5);
        assert_eq!(feed.start_index, 0);
        assert!(feed.entries.is_empty());
    }

    #[test]
    fn test_collect_filters_by_author() {
        let feed = parse(FEED_PAGE);
        let mut snapshot = Snapshot::new();
        collect_entries("A. Ivanov", feed.entries, &mut snapshot);

        assert_eq!(snapshot.len(), 1);
        let ts = snapshot.get("https://repo.example/handle/1").unwrap();
        assert_eq!(ts.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-01-01 00:00:00");
    }

    #[test]
    fn test_collect_all_entries_for_shared_author() {
        let feed = parse(FEED_PAGE);
        let mut snapshot = Snapshot::new();
        collect_entries("B. Petrov", feed.entries, &mut snapshot);
        assert_eq!(snapshot.len(), 2);
    }

    #[test]
    fn test_matches_author_is_exact() {
        let authors = vec![AtomAuthor {
            name: "A. Ivanov".to_string(),
        }];
        assert!(matches_author(&authors, "A. Ivanov"));
        assert!(!matches_author(&authors, "A. Ivan"));
        assert!(!matches_author(&authors, "a. ivanov"));
        assert!(!matches_author(&authors, ""));
    }

    #[test]
    fn test_duplicate_link_last_write_wins() {
        let xml = r#"<?xml version="1.0"?>
<feed xmlns:opensearch="http://a9.com/-/spec/opensearch/1.1/">
  <opensearch:totalResults>2</opensearch:totalResults>
  <opensearch:itemsPerPage>20</opensearch:itemsPerPage>
  <opensearch:startIndex>0</opensearch:startIndex>
  <entry>
    <link href="https://repo.example/handle/1"/>
    <updated>2024-01-01T00:00:00Z</updated>
    <author><name>A. Ivanov</name></author>
  </entry>
  <entry>
    <link href="https://repo.example/handle/1"/>
    <updated>2024-03-01T00:00:00Z</updated>
    <author><name>A. Ivanov</name></author>
  </entry>
</feed>"#;
        let feed = parse(xml);
        let mut snapshot = Snapshot::new();
        collect_entries("A. Ivanov", feed.entries, &mut snapshot);

        assert_eq!(snapshot.len(), 1);
        let ts = snapshot.get("https://repo.example/handle/1").unwrap();
        assert_eq!(ts.format("%Y-%m-%d").to_string(), "2024-03-01");
    }

    /// Simulate the pagination loop against a server that reports a
    /// zero-based start index, counting the pages requested.
    fn pages_issued(total_results: u64, per_page: u64) -> u64 {
        let mut requests = 0;
        let mut start = 0;
        loop {
            requests += 1;
            let paging = Paging {
                start_index: start,
                items_per_page: per_page,
                total_results,
            };
            if paging.is_last() {
                break;
            }
            start = paging.next_start();
        }
        requests
    }

    #[test]
    fn test_pagination_issues_ceil_n_over_p_requests() {
        assert_eq!(pages_issued(0, 20), 1);
        assert_eq!(pages_issued(1, 20), 1);
        assert_eq!(pages_issued(20, 20), 1);
        assert_eq!(pages_issued(21, 20), 2);
        assert_eq!(pages_issued(40, 20), 2);
        assert_eq!(pages_issued(41, 20), 3);
        assert_eq!(pages_issued(100, 7), 15);
    }

    #[test]
    fn test_empty_feed_terminates_after_first_page() {
        let paging = Paging {
            start_index: 0,
            items_per_page: 20,
            total_results: 0,
        };
        assert!(paging.is_last());
    }
}
