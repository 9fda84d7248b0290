//! Work data structure and report rendering.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

/// Timestamp format used in index files and report headers.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Mapping from work URL to last-modified timestamp (second precision).
///
/// Used both for the transient per-author feed snapshot and for the loaded
/// index record. A `BTreeMap` keeps iteration deterministic.
pub type Snapshot = BTreeMap<String, NaiveDateTime>;

/// Bibliographic metadata extracted from one work's detail page.
///
/// Every field is optional: absent metadata tags are simply omitted from the
/// rendered report. Built once per fetch and never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Work {
    /// Work title
    pub title: Option<String>,

    /// Bibliographic citation
    pub citation: Option<String>,

    /// Abstract text
    pub summary: Option<String>,

    /// Author names, in document order
    pub authors: Option<Vec<String>>,

    /// Issue date
    pub issued: Option<String>,

    /// Publisher name
    pub publisher: Option<String>,

    /// DOI
    pub doi: Option<String>,

    /// ISBN
    pub isbn: Option<String>,

    /// Language code
    pub language: Option<String>,

    /// URL of the abstract page
    pub abstract_url: Option<String>,

    /// URL of the full-text document
    pub document_url: Option<String>,

    /// Keywords
    pub keywords: Option<Vec<String>>,

    /// Source publications (journal titles)
    pub sources: Option<Vec<String>>,
}

impl Work {
    /// Render the work as a field list, one `Label: value` line per present
    /// field. Multi-valued fields continue on new lines with a hanging
    /// indent aligned to the label width.
    pub fn render(&self) -> String {
        let mut out = String::new();
        field(&mut out, "Title", &self.title);
        field_many(&mut out, "Authors", &self.authors);
        field(&mut out, "Issued", &self.issued);
        field(&mut out, "Publisher", &self.publisher);
        field(&mut out, "Language", &self.language);
        field(&mut out, "Citation", &self.citation);
        field(&mut out, "Abstract", &self.summary);
        field(&mut out, "URL", &self.abstract_url);
        field(&mut out, "Document", &self.document_url);
        field(&mut out, "DOI", &self.doi);
        field(&mut out, "ISBN", &self.isbn);
        field_many(&mut out, "Keywords", &self.keywords);
        field_many(&mut out, "Sources", &self.sources);
        out
    }
}

fn field(out: &mut String, label: &str, value: &Option<String>) {
    if let Some(value) = value {
        out.push_str(label);
        out.push_str(": ");
        out.push_str(value);
        out.push('\n');
    }
}

fn field_many(out: &mut String, label: &str, values: &Option<Vec<String>>) {
    if let Some(values) = values {
        // Continuation lines line up under the first value.
        let separator = format!("\n{}", " ".repeat(label.len() + 2));
        out.push_str(label);
        out.push_str(": ");
        out.push_str(&values.join(&separator));
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_omits_absent_fields() {
        let work = Work {
            title: Some("On Testing".to_string()),
            ..Work::default()
        };
        assert_eq!(work.render(), "Title: On Testing\n");
    }

    #[test]
    fn test_render_multi_valued_hanging_indent() {
        let work = Work {
            authors: Some(vec!["A. Ivanov".to_string(), "B. Petrov".to_string()]),
            ..Work::default()
        };
        assert_eq!(work.render(), "Authors: A. Ivanov\n         B. Petrov\n");
    }

    #[test]
    fn test_render_field_order() {
        let work = Work {
            title: Some("T".to_string()),
            doi: Some("10.1000/x".to_string()),
            issued: Some("2024".to_string()),
            ..Work::default()
        };
        assert_eq!(work.render(), "Title: T\nIssued: 2024\nDOI: 10.1000/x\n");
    }

    #[test]
    fn test_render_empty_work() {
        assert_eq!(Work::default().render(), "");
    }
}
