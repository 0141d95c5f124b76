//! End-to-end tests for the resolution pipeline: settings document in,
//! metadata, projections, and template context out.

use std::fs;
use tempfile::TempDir;

use technote_meta::highwire::CitationMeta;
use technote_meta::opengraph::OpenGraphMeta;
use technote_meta::{TemplateContext, resolve, resolve_at};

const SAMPLE_TOML: &str = r#"
[technote]
id = "SQR-000"
title = "The Technote Publishing Platform"
date_updated = 2015-11-23
canonical_url = "https://sqr-000.example.com/"
source_url = "https://github.com/lsst-sqre/sqr-000"
version = "1.0.0"
license = { id = "CC-BY-4.0" }

[[technote.authors]]
name = { given = "Jonathan", family = "Sick" }
orcid = "https://orcid.org/0000-0003-3001-676X"
affiliations = [
    { name = "Rubin Observatory", ror = "https://ror.org/048g3cy84" }
]
"#;

#[test]
fn sample_document_resolves() {
    let resolution = resolve(SAMPLE_TOML).unwrap();
    let metadata = &resolution.metadata;

    assert_eq!(metadata.id.as_deref(), Some("SQR-000"));
    assert_eq!(metadata.version.as_deref(), Some("1.0.0"));
    assert_eq!(metadata.license.as_ref().unwrap().id, "CC-BY-4.0");
    assert_eq!(
        metadata.canonical_url.as_ref().unwrap().as_str(),
        "https://sqr-000.example.com/"
    );
    assert_eq!(technote_meta::metadata::format_iso_datetime(metadata.date_updated), "2015-11-23T00:00:00Z");

    let repository = metadata.source_repository.as_ref().unwrap();
    assert_eq!(repository.url.as_str(), "https://github.com/lsst-sqre/sqr-000");
    assert_eq!(repository.branch, "main");

    let author = &metadata.authors[0];
    assert_eq!(author.name.full_name(), "Jonathan Sick");
    assert_eq!(
        author.orcid.as_ref().unwrap().as_str(),
        "https://orcid.org/0000-0003-3001-676X"
    );
    assert_eq!(
        author.affiliations[0].name.as_deref(),
        Some("Rubin Observatory")
    );

    assert!(resolution.warnings.is_empty());
}

#[test]
fn resolve_at_reads_the_settings_file() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("technote.toml"), SAMPLE_TOML).unwrap();

    let resolution = resolve_at(tmp.path()).unwrap();
    assert_eq!(resolution.metadata.id.as_deref(), Some("SQR-000"));
}

#[test]
fn citation_tags_for_sample_document() {
    let resolution = resolve(SAMPLE_TOML).unwrap();
    let rendered = CitationMeta::new(&resolution.metadata).to_html().into_string();

    assert!(rendered.contains(
        r#"<meta name="citation_title" content="The Technote Publishing Platform" data-highwire="true">"#
    ));
    assert!(rendered
        .contains(r#"<meta name="citation_author" content="Sick, Jonathan" data-highwire="true">"#));
    assert!(rendered.contains(
        r#"<meta name="citation_author_institution" content="Rubin Observatory" data-highwire="true">"#
    ));
    assert!(rendered.contains(
        r#"<meta name="citation_author_orcid" content="https://orcid.org/0000-0003-3001-676X" data-highwire="true">"#
    ));
    assert!(rendered
        .contains(r#"<meta name="citation_date" content="2015/11/23" data-highwire="true">"#));
    assert!(rendered.contains(
        r#"<meta name="citation_technical_report_number" content="SQR-000" data-highwire="true">"#
    ));
    assert!(rendered.contains(
        r#"<meta name="citation_fulltext_html_url" content="https://sqr-000.example.com/" data-highwire="true">"#
    ));
}

#[test]
fn opengraph_tags_for_sample_document() {
    let resolution = resolve(SAMPLE_TOML).unwrap();
    let abstract_text =
        technote_meta::summary::plain_text_summary("A *platform* for publishing technotes.");
    let rendered = OpenGraphMeta::new(&resolution.metadata, Some(&abstract_text))
        .to_html()
        .into_string();

    assert!(rendered
        .contains(r#"<meta property="og:title" content="The Technote Publishing Platform">"#));
    assert!(rendered.contains(
        r#"<meta property="og:description" content="A platform for publishing technotes.">"#
    ));
    assert!(rendered.contains(r#"<meta property="og:type" content="article">"#));
    assert!(rendered.contains(r#"<meta property="og:article:author" content="Jonathan Sick">"#));
    assert!(rendered.contains(
        r#"<meta property="og:article:modified_time" content="2015-11-23T00:00:00Z">"#
    ));
}

#[test]
fn citation_html_round_trips_author_names_in_order() {
    let source = r#"
[technote]

[[technote.authors]]
name = { given = "Vera", family = "Rubin" }

[[technote.authors]]
name = { given = "Kent", family = "Ford" }
"#;
    let resolution = resolve(source).unwrap();
    let rendered = CitationMeta::new(&resolution.metadata).to_html().into_string();

    // A conformant consumer reads citation_author contents in document
    // order; recover them the same way.
    let recovered: Vec<&str> = rendered
        .split(r#"<meta name="citation_author" content=""#)
        .skip(1)
        .filter_map(|chunk| chunk.split('"').next())
        .collect();
    assert_eq!(recovered, vec!["Rubin, Vera", "Ford, Kent"]);
}

#[test]
fn template_context_exposes_the_stable_contract() {
    let resolution = resolve(SAMPLE_TOML).unwrap();
    let context = TemplateContext::new(&resolution.metadata, Some("An abstract."));

    for key in TemplateContext::KEYS {
        assert!(context.get(key).is_some(), "missing key: {key}");
    }
    assert_eq!(context.get("id").unwrap(), "SQR-000");
    assert_eq!(context.get("source_repo_slug").unwrap(), "lsst-sqre/sqr-000");
    assert_eq!(
        context.get("source_edit_url").unwrap(),
        "https://github.com/lsst-sqre/sqr-000/blob/main/index.md"
    );
    assert_eq!(context.get("date_updated_iso").unwrap(), "2015-11-23");
    assert_eq!(context.get("byline").unwrap(), "Jonathan Sick");
}

#[test]
fn unknown_license_resolves_with_a_warning() {
    let source = r#"
[technote]
license = { id = "NOT-A-REAL-LICENSE" }
"#;
    let resolution = resolve(source).unwrap();
    assert_eq!(
        resolution.metadata.license.as_ref().unwrap().id,
        "NOT-A-REAL-LICENSE"
    );
    assert_eq!(resolution.warnings.len(), 1);
    assert_eq!(resolution.warnings[0].path, "technote.license.id");
}

#[test]
fn retired_status_state_fails_the_pipeline() {
    let source = r#"
[technote]

[technote.status]
state = "active"
"#;
    let error = match resolve(source) {
        Err(technote_meta::TechnoteError::Validation(error)) => error,
        other => panic!("expected a validation error, got {other:?}"),
    };
    assert_eq!(error.violations[0].path, "technote.status.state");
    assert!(error.violations[0]
        .message
        .contains("draft, stable, deprecated, other"));
}
