// src/services/works.rs

//! Work metadata extraction.
//!
//! Fetches a work's detail page and pulls the bibliographic fields out of
//! the `<meta>` tags in the document head. Unlike the feed client this is
//! deliberately lenient: a fetch failure logs a warning and yields nothing,
//! so a single unreachable work never fails a run.

use scraper::{Html, Selector};

use crate::models::Work;

/// Keywords arrive as one semicolon-delimited meta tag.
const KEYWORD_SEPARATOR: &str = "; ";

/// Fetches and parses work detail pages.
pub struct WorkExtractor {
    client: reqwest::Client,
}

impl WorkExtractor {
    /// Create a new extractor sharing the application's HTTP client.
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Fetch the page at `url` and extract its metadata.
    ///
    /// Returns `None` on any fetch failure (timeout, non-success status)
    /// after logging a warning. Parse never fails: pages without metadata
    /// tags produce an empty record.
    pub async fn extract(&self, url: &str) -> Option<Work> {
        match self.fetch(url).await {
            Ok(html) => Some(work_from_html(&html)),
            Err(e) => {
                log::warn!("Failed to fetch work from {}: {}", url, e);
                None
            }
        }
    }

    async fn fetch(&self, url: &str) -> std::result::Result<String, reqwest::Error> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        response.text().await
    }
}

/// Extract a [`Work`] from detail-page HTML.
pub fn work_from_html(document: &str) -> Work {
    let doc = Html::parse_document(document);
    Work {
        title: meta_one(&doc, "DC.title"),
        citation: meta_one(&doc, "DCTERMS.bibliographicCitation"),
        summary: meta_one(&doc, "DCTERMS.abstract"),
        authors: meta_many(&doc, "DC.creator"),
        issued: meta_one(&doc, "DCTERMS.issued"),
        publisher: meta_one(&doc, "DC.publisher"),
        doi: meta_one(&doc, "citation_doi"),
        isbn: meta_one(&doc, "citation_isbn"),
        language: meta_one(&doc, "DC.language"),
        abstract_url: meta_one(&doc, "citation_abstract_html_url"),
        document_url: meta_one(&doc, "citation_pdf_url"),
        keywords: meta_one(&doc, "citation_keywords")
            .map(|k| k.split(KEYWORD_SEPARATOR).map(String::from).collect()),
        sources: meta_many(&doc, "citation_journal_title"),
    }
}

/// First `content` value of the named meta tag, or `None`.
fn meta_one(doc: &Html, name: &str) -> Option<String> {
    let selector = meta_selector(name)?;
    doc.select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(String::from)
}

/// All `content` values of the named meta tag in document order, or `None`
/// when the tag is absent.
fn meta_many(doc: &Html, name: &str) -> Option<Vec<String>> {
    let selector = meta_selector(name)?;
    let values: Vec<String> = doc
        .select(&selector)
        .filter_map(|el| el.value().attr("content"))
        .map(String::from)
        .collect();
    if values.is_empty() { None } else { Some(values) }
}

fn meta_selector(name: &str) -> Option<Selector> {
    Selector::parse(&format!("head meta[name=\"{name}\"]")).ok()
}
