//! The template-context projection.
//!
//! The host document compiler hands its template renderer a flat mapping of
//! values. This module builds that mapping from the canonical metadata plus
//! the citation, Open Graph, and microformat projections. It is the only
//! projection that depends on the others, and the dependency is pure
//! composition; nothing is re-validated here.
//!
//! ## A closed record
//!
//! The key set is fixed ([`TemplateContext::KEYS`]) and every key is always
//! present, with `null` standing in for absent values. Templates that look
//! up a misspelled key fail fast instead of silently rendering nothing, and
//! the key list doubles as the stable contract external templates are
//! written against.
//!
//! The context is built per render call and passed explicitly. There is no
//! process-wide "current technote" accessor, so several technotes can be
//! resolved in one process without interfering.

use maud::{Markup, html};
use serde_json::{Map, Value};
use url::Url;

use crate::highwire::CitationMeta;
use crate::metadata::{
    SourceRepository, TechnoteMetadata, format_iso_date, format_iso_datetime,
};
use crate::microformats;
use crate::opengraph::OpenGraphMeta;

/// The root document filename assumed when none is given.
pub const DEFAULT_ROOT_FILENAME: &str = "index.md";

/// The flat mapping handed to the template renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateContext {
    map: Map<String, Value>,
}

impl TemplateContext {
    /// Every key the context exposes. Field names and nesting are a stable
    /// contract that external templates depend on.
    pub const KEYS: &'static [&'static str] = &[
        "id",
        "series_id",
        "title",
        "version",
        "doi",
        "canonical_url",
        "organization",
        "authors",
        "contributors",
        "status",
        "license",
        "abstract",
        "byline",
        "date_created_iso",
        "date_updated_iso",
        "datetime_created_iso",
        "datetime_updated_iso",
        "source_url",
        "source_branch",
        "source_repo_slug",
        "source_edit_url",
        "citation",
        "opengraph",
        "microformats",
        "citation_tags_html",
        "opengraph_tags_html",
        "generator_tag_html",
    ];

    /// Build the context with the default root filename.
    pub fn new(metadata: &TechnoteMetadata, abstract_text: Option<&str>) -> Self {
        Self::with_root_file(metadata, abstract_text, DEFAULT_ROOT_FILENAME)
    }

    /// Build the context, naming the root content document (used for the
    /// repository edit URL).
    pub fn with_root_file(
        metadata: &TechnoteMetadata,
        abstract_text: Option<&str>,
        root_filename: &str,
    ) -> Self {
        let citation = CitationMeta::new(metadata);
        let opengraph = OpenGraphMeta::new(metadata, abstract_text);
        let repository = metadata.source_repository.as_ref();

        let mut map = Map::new();
        let mut put = |key: &str, value: Value| {
            map.insert(key.to_string(), value);
        };

        put("id", opt_str(metadata.id.as_deref()));
        put("series_id", opt_str(metadata.series_id.as_deref()));
        put("title", opt_str(metadata.title.as_deref()));
        put("version", opt_str(metadata.version.as_deref()));
        put("doi", opt_str(metadata.doi.as_deref()));
        put(
            "canonical_url",
            opt_str(metadata.canonical_url.as_ref().map(Url::as_str)),
        );
        put("organization", to_json(&metadata.organization));
        put("authors", to_json(&metadata.authors));
        put("contributors", to_json(&metadata.contributors));
        put("status", to_json(&metadata.status));
        put("license", to_json(&metadata.license));
        put("abstract", opt_str(abstract_text));
        put("byline", opt_str(metadata.byline().as_deref()));
        put(
            "date_created_iso",
            opt_str(metadata.date_created.map(format_iso_date).as_deref()),
        );
        put(
            "date_updated_iso",
            Value::String(format_iso_date(metadata.date_updated)),
        );
        put(
            "datetime_created_iso",
            opt_str(metadata.date_created.map(format_iso_datetime).as_deref()),
        );
        put(
            "datetime_updated_iso",
            Value::String(format_iso_datetime(metadata.date_updated)),
        );
        put(
            "source_url",
            opt_str(repository.map(|repo| repo.url.as_str())),
        );
        put(
            "source_branch",
            opt_str(repository.map(|repo| repo.branch.as_str())),
        );
        put(
            "source_repo_slug",
            opt_str(repository.and_then(|repo| repo_slug(&repo.url)).as_deref()),
        );
        put(
            "source_edit_url",
            opt_str(
                repository
                    .map(|repo| edit_url(repo, root_filename))
                    .as_deref(),
            ),
        );
        put("citation", to_json(&citation));
        put("opengraph", to_json(&opengraph));
        put("microformats", to_json(&microformats::class_map()));
        put(
            "citation_tags_html",
            Value::String(citation.to_html().into_string()),
        );
        put(
            "opengraph_tags_html",
            Value::String(opengraph.to_html().into_string()),
        );
        put(
            "generator_tag_html",
            Value::String(generator_tag().into_string()),
        );

        TemplateContext { map }
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.map.get(key)
    }

    /// The context as a JSON object mapping.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.map
    }

    /// Consume the context, yielding the mapping for the renderer.
    pub fn into_map(self) -> Map<String, Value> {
        self.map
    }
}

fn opt_str(value: Option<&str>) -> Value {
    match value {
        Some(text) => Value::String(text.to_string()),
        None => Value::Null,
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).expect("metadata must serialize to JSON")
}

/// The `owner/name` slug of a GitHub repository URL, or `None` for other
/// hosts.
fn repo_slug(url: &Url) -> Option<String> {
    if !url
        .host_str()
        .is_some_and(|host| host.eq_ignore_ascii_case("github.com"))
    {
        return None;
    }
    let mut segments = url.path_segments()?.filter(|segment| !segment.is_empty());
    let owner = segments.next()?;
    let name = segments.next()?;
    let name = name.strip_suffix(".git").unwrap_or(name);
    Some(format!("{owner}/{name}"))
}

/// The URL for editing the root document in its repository.
///
/// Points at `/blob/` rather than `/edit/` so the viewer can pick between
/// editing on the web and opening the repository IDE.
fn edit_url(repository: &SourceRepository, root_filename: &str) -> String {
    let base = repository.url.as_str().trim_end_matches('/');
    let base = base.strip_suffix(".git").unwrap_or(base);
    format!("{base}/blob/{}/{root_filename}", repository.branch)
}

/// A `meta name="generator"` tag identifying the metadata layer's version.
fn generator_tag() -> Markup {
    html! {
        meta name="generator" content=(concat!("technote-meta ", env!("CARGO_PKG_VERSION")));
    }
}
