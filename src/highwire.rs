//! The Highwire Press citation projection.
//!
//! Highwire `citation_*` meta tags are what Google Scholar and other
//! academic indexers read to build a citation record for the page. This
//! module projects [`TechnoteMetadata`] into that record and renders the
//! tags.
//!
//! Absent fields are omitted entirely; an empty `citation_doi` tag would
//! read as "this document's DOI is the empty string", not "no DOI".
//!
//! Resources on the tag set:
//!
//! - <https://scholar.google.com/intl/en/scholar/inclusion.html#indexing>

use maud::{Markup, html};
use serde::Serialize;

use crate::metadata::TechnoteMetadata;

/// The per-author slice of the citation record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CitationAuthor {
    /// The author's name in citation order, "family, given".
    pub name: String,
    /// The author's institution: the name of the first affiliation, when
    /// one is present and named.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    /// The author's contact email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// The author's ORCiD URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orcid: Option<String>,
}

/// The citation metadata record projected from a technote.
///
/// Pure and side-effect-free; safe to build repeatedly from the same
/// metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CitationMeta {
    /// The `citation_title` value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// One entry per author, in input order.
    pub authors: Vec<CitationAuthor>,
    /// The `citation_date` value, `YYYY/MM/DD`. Uses the date the technote
    /// was last updated.
    pub date: String,
    /// The `citation_doi` value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    /// The `citation_technical_report_number` value (the technote id).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technical_report_number: Option<String>,
    /// The `citation_fulltext_html_url` value (the canonical URL).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fulltext_html_url: Option<String>,
}

impl CitationMeta {
    /// Project citation metadata from the canonical record.
    pub fn new(metadata: &TechnoteMetadata) -> Self {
        let authors = metadata
            .authors
            .iter()
            .map(|author| CitationAuthor {
                name: author.name.citation_name(),
                institution: author
                    .affiliations
                    .first()
                    .and_then(|affiliation| affiliation.name.clone()),
                email: author.email.clone(),
                orcid: author.orcid.as_ref().map(|url| url.to_string()),
            })
            .collect();

        CitationMeta {
            title: metadata.title.clone(),
            authors,
            date: metadata.date_updated.format("%Y/%m/%d").to_string(),
            doi: metadata.doi.clone(),
            technical_report_number: metadata.id.clone(),
            fulltext_html_url: metadata.canonical_url.as_ref().map(|url| url.to_string()),
        }
    }

    /// Render the `citation_*` meta tags.
    ///
    /// Each tag carries `data-highwire="true"` so post-processing can find
    /// the tags this projection owns.
    pub fn to_html(&self) -> Markup {
        html! {
            @if let Some(title) = &self.title {
                meta name="citation_title" content=(title) data-highwire="true";
            }
            @for author in &self.authors {
                meta name="citation_author" content=(author.name) data-highwire="true";
                @if let Some(institution) = &author.institution {
                    meta name="citation_author_institution" content=(institution) data-highwire="true";
                }
                @if let Some(email) = &author.email {
                    meta name="citation_author_email" content=(email) data-highwire="true";
                }
                @if let Some(orcid) = &author.orcid {
                    meta name="citation_author_orcid" content=(orcid) data-highwire="true";
                }
            }
            meta name="citation_date" content=(self.date) data-highwire="true";
            @if let Some(doi) = &self.doi {
                meta name="citation_doi" content=(doi) data-highwire="true";
            }
            @if let Some(number) = &self.technical_report_number {
                meta name="citation_technical_report_number" content=(number) data-highwire="true";
            }
            @if let Some(url) = &self.fulltext_html_url {
                meta name="citation_fulltext_html_url" content=(url) data-highwire="true";
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{Organization, Person, PersonName};
    use chrono::{TimeZone, Utc};
    use url::Url;

    fn base_metadata() -> TechnoteMetadata {
        TechnoteMetadata {
            id: Some("TEST-000".to_string()),
            series_id: Some("TEST".to_string()),
            organization: None,
            title: Some("Metadata test document".to_string()),
            date_created: None,
            date_updated: Utc.with_ymd_and_hms(2023, 9, 19, 0, 0, 0).unwrap(),
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
                email: Some("jsick@example.com".to_string()),
                orcid: Some(Url::parse("https://orcid.org/0000-0003-3001-676X").unwrap()),
                affiliations: vec![Organization {
                    name: Some("Rubin Observatory".to_string()),
                    internal_id: None,
                    ror: None,
                    address: None,
                    url: None,
                }],
            }],
            contributors: vec![],
            status: None,
            license: None,
        }
    }

    #[test]
    fn projects_document_fields() {
        let citation = CitationMeta::new(&base_metadata());
        assert_eq!(citation.title.as_deref(), Some("Metadata test document"));
        assert_eq!(citation.date, "2023/09/19");
        assert_eq!(citation.technical_report_number.as_deref(), Some("TEST-000"));
        assert_eq!(
            citation.fulltext_html_url.as_deref(),
            Some("https://test-000.example.com/")
        );
        assert_eq!(citation.doi, None);
    }

    #[test]
    fn author_name_is_family_comma_given() {
        let citation = CitationMeta::new(&base_metadata());
        assert_eq!(citation.authors[0].name, "Sick, Jonathan");
    }

    #[test]
    fn institution_is_first_affiliation_name() {
        let mut metadata = base_metadata();
        metadata.authors[0].affiliations.push(Organization {
            name: Some("Second Institute".to_string()),
            ..Organization::default()
        });
        let citation = CitationMeta::new(&metadata);
        assert_eq!(
            citation.authors[0].institution.as_deref(),
            Some("Rubin Observatory")
        );
    }

    #[test]
    fn unnamed_first_affiliation_yields_no_institution() {
        let mut metadata = base_metadata();
        metadata.authors[0].affiliations[0].name = None;
        let citation = CitationMeta::new(&metadata);
        assert_eq!(citation.authors[0].institution, None);
    }

    #[test]
    fn html_contains_expected_tags() {
        let rendered = CitationMeta::new(&base_metadata()).to_html().into_string();
        assert!(rendered
            .contains(r#"<meta name="citation_title" content="Metadata test document" data-highwire="true">"#));
        assert!(rendered
            .contains(r#"<meta name="citation_author" content="Sick, Jonathan" data-highwire="true">"#));
        assert!(rendered.contains(
            r#"<meta name="citation_author_institution" content="Rubin Observatory" data-highwire="true">"#
        ));
        assert!(rendered.contains(
            r#"<meta name="citation_author_orcid" content="https://orcid.org/0000-0003-3001-676X" data-highwire="true">"#
        ));
        assert!(rendered
            .contains(r#"<meta name="citation_date" content="2023/09/19" data-highwire="true">"#));
        assert!(rendered.contains(
            r#"<meta name="citation_technical_report_number" content="TEST-000" data-highwire="true">"#
        ));
    }

    #[test]
    fn absent_fields_emit_no_tags() {
        let mut metadata = base_metadata();
        metadata.title = None;
        metadata.canonical_url = None;
        metadata.authors[0].email = None;
        let rendered = CitationMeta::new(&metadata).to_html().into_string();
        assert!(!rendered.contains("citation_title"));
        assert!(!rendered.contains("citation_fulltext_html_url"));
        assert!(!rendered.contains("citation_author_email"));
        assert!(!rendered.contains("citation_doi"));
    }

    #[test]
    fn authors_render_in_input_order() {
        let mut metadata = base_metadata();
        metadata.authors.push(Person {
            name: PersonName {
                given: "Vera".to_string(),
                family: "Rubin".to_string(),
            },
            internal_id: None,
            email: None,
            orcid: None,
            affiliations: vec![],
        });
        let rendered = CitationMeta::new(&metadata).to_html().into_string();
        let first = rendered.find("Sick, Jonathan").unwrap();
        let second = rendered.find("Rubin, Vera").unwrap();
        assert!(first < second);
    }
}
