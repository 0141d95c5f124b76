//! The Open Graph social-unfurl projection.
//!
//! Open Graph `og:*` property tags are what chat clients and social sites
//! read to render a link preview card. This module projects
//! [`TechnoteMetadata`] into that record and renders the tags.
//!
//! The description comes from the technote's abstract, which the host build
//! extracts from the document and passes in as plain text (see
//! [`crate::summary`]); the metadata record itself does not carry it.
//!
//! Resources on the tag set:
//!
//! - <https://ogp.me/>

use maud::{Markup, html};
use serde::Serialize;

use crate::metadata::{TechnoteMetadata, format_iso_datetime};

/// The Open Graph record projected from a technote.
///
/// Pure and side-effect-free; safe to build repeatedly from the same
/// metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenGraphMeta {
    /// The `og:title` value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// The `og:description` value: the plain-text abstract.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The `og:url` value (the canonical URL).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// The `og:type` value. Technotes are always `article`.
    #[serde(rename = "type")]
    pub og_type: String,
    /// The `og:article:author` values: plain-text author names, in input
    /// order.
    pub authors: Vec<String>,
    /// The `og:article:published_time` value, from the creation date when
    /// one is recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_time: Option<String>,
    /// The `og:article:modified_time` value, from the updated date.
    pub modified_time: String,
}

impl OpenGraphMeta {
    /// Project Open Graph metadata from the canonical record and an
    /// externally supplied plain-text abstract.
    pub fn new(metadata: &TechnoteMetadata, abstract_text: Option<&str>) -> Self {
        OpenGraphMeta {
            title: metadata.title.clone(),
            description: abstract_text.map(str::to_string),
            url: metadata.canonical_url.as_ref().map(|url| url.to_string()),
            og_type: "article".to_string(),
            authors: metadata
                .authors
                .iter()
                .map(|author| author.name.full_name())
                .collect(),
            published_time: metadata.date_created.map(format_iso_datetime),
            modified_time: format_iso_datetime(metadata.date_updated),
        }
    }

    /// Render the `og:*` property tags.
    pub fn to_html(&self) -> Markup {
        html! {
            @if let Some(title) = &self.title {
                meta property="og:title" content=(title);
            }
            @if let Some(description) = &self.description {
                meta property="og:description" content=(description);
            }
            @if let Some(url) = &self.url {
                meta property="og:url" content=(url);
            }
            meta property="og:type" content=(self.og_type);
            @for author in &self.authors {
                meta property="og:article:author" content=(author);
            }
            @if let Some(published) = &self.published_time {
                meta property="og:article:published_time" content=(published);
            }
            meta property="og:article:modified_time" content=(self.modified_time);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{Person, PersonName};
    use chrono::{TimeZone, Utc};
    use url::Url;

    fn base_metadata() -> TechnoteMetadata {
        TechnoteMetadata {
            id: Some("TEST-000".to_string()),
            series_id: None,
            organization: None,
            title: Some("Metadata test document".to_string()),
            date_created: Some(Utc.with_ymd_and_hms(2023, 9, 19, 0, 0, 0).unwrap()),
            date_updated: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
            version: None,
            doi: None,
            canonical_url: Some(Url::parse("https://test-000.example.com/").unwrap()),
            source_repository: None,
            authors: vec![Person {
                name: PersonName {
                    given: "Jonathan".to_string(),
                    family: "Sick".to_string(),
                },
                internal_id: None,
                email: None,
                orcid: None,
                affiliations: vec![],
            }],
            contributors: vec![],
            status: None,
            license: None,
        }
    }

    #[test]
    fn projects_document_fields() {
        let abstract_text = "First paragraph of abstract.\n\nSecond paragraph of abstract.";
        let opengraph = OpenGraphMeta::new(&base_metadata(), Some(abstract_text));
        assert_eq!(opengraph.title.as_deref(), Some("Metadata test document"));
        assert_eq!(opengraph.description.as_deref(), Some(abstract_text));
        assert_eq!(opengraph.url.as_deref(), Some("https://test-000.example.com/"));
        assert_eq!(opengraph.og_type, "article");
        assert_eq!(opengraph.authors, vec!["Jonathan Sick".to_string()]);
    }

    #[test]
    fn published_time_comes_from_date_created() {
        let opengraph = OpenGraphMeta::new(&base_metadata(), None);
        assert_eq!(
            opengraph.published_time.as_deref(),
            Some("2023-09-19T00:00:00Z")
        );
        assert_eq!(opengraph.modified_time, "2024-01-02T03:04:05Z");
    }

    #[test]
    fn no_published_time_without_date_created() {
        let mut metadata = base_metadata();
        metadata.date_created = None;
        let opengraph = OpenGraphMeta::new(&metadata, None);
        assert_eq!(opengraph.published_time, None);
        assert_eq!(opengraph.modified_time, "2024-01-02T03:04:05Z");
    }

    #[test]
    fn html_contains_expected_tags() {
        let rendered = OpenGraphMeta::new(&base_metadata(), Some("An abstract."))
            .to_html()
            .into_string();
        assert!(rendered.contains(r#"<meta property="og:title" content="Metadata test document">"#));
        assert!(rendered.contains(r#"<meta property="og:description" content="An abstract.">"#));
        assert!(rendered.contains(r#"<meta property="og:url" content="https://test-000.example.com/">"#));
        assert!(rendered.contains(r#"<meta property="og:type" content="article">"#));
        assert!(rendered.contains(r#"<meta property="og:article:author" content="Jonathan Sick">"#));
        assert!(rendered.contains(
            r#"<meta property="og:article:published_time" content="2023-09-19T00:00:00Z">"#
        ));
        assert!(rendered.contains(
            r#"<meta property="og:article:modified_time" content="2024-01-02T03:04:05Z">"#
        ));
    }

    #[test]
    fn absent_fields_emit_no_tags() {
        let mut metadata = base_metadata();
        metadata.title = None;
        metadata.canonical_url = None;
        metadata.date_created = None;
        let rendered = OpenGraphMeta::new(&metadata, None).to_html().into_string();
        assert!(!rendered.contains("og:title"));
        assert!(!rendered.contains("og:description"));
        assert!(!rendered.contains("og:url"));
        assert!(!rendered.contains("og:article:published_time"));
        // type and modified_time are always present
        assert!(rendered.contains("og:type"));
        assert!(rendered.contains("og:article:modified_time"));
    }

    #[test]
    fn serializes_type_under_the_wire_name() {
        let value = serde_json::to_value(OpenGraphMeta::new(&base_metadata(), None)).unwrap();
        assert_eq!(value["type"], "article");
    }
}
