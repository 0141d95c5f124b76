//! # Technote Meta
//!
//! The metadata model and configuration resolution pipeline for technote
//! technical reports. A technote directory carries a `technote.toml` file;
//! this crate turns it into a canonical, strongly-typed metadata record and
//! derives the standards-compliant projections that the host document
//! compiler injects into its templates.
//!
//! # Architecture: Three-Stage Pipeline
//!
//! Resolution runs as a strictly sequential pipeline, once per build:
//!
//! ```text
//! 1. Load       technote.toml  →  RawSettings        (text → typed value tree)
//! 2. Normalize  RawSettings    →  TechnoteMetadata   (validate + apply defaults)
//! 3. Project    TechnoteMetadata → citation / social / microformat / context
//! ```
//!
//! Each stage is a pure function of the previous stage's output. No stage
//! keeps state across builds, and the projections read an immutable record,
//! so a host that builds many technotes in one process can evaluate them
//! concurrently without coordination.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`settings`] | Stage 1: parses `technote.toml` into the raw settings tree |
//! | [`normalize`] | Stage 2: validates and builds the canonical metadata record |
//! | [`metadata`] | The canonical model: authors, status, license, repository |
//! | [`identifiers`] | Offline ORCiD/ROR pattern and checksum validation |
//! | [`spdx`] | Bundled SPDX license id table |
//! | [`highwire`] | Stage 3: Highwire Press `citation_*` tag projection |
//! | [`opengraph`] | Stage 3: Open Graph `og:*` tag projection |
//! | [`microformats`] | Stage 3: microformats2 class-annotation table |
//! | [`context`] | Stage 3: the flat template context handed to the renderer |
//! | [`summary`] | Markdown abstract to plain text, for summary surfaces |
//!
//! # Design Decisions
//!
//! ## Aggregated Validation
//!
//! `technote.toml` is written by hand, so the normalizer collects every
//! violation in a document into one [`ValidationError`] instead of stopping
//! at the first. A document either normalizes completely or not at all;
//! projections never see a partially valid record, which keeps missing
//! bibliographic data out of published pages.
//!
//! ## Rejected, Not Coerced, Identifiers
//!
//! ORCiD and ROR values must be supplied as canonical absolute URLs.
//! Reformatting a bare identifier on the author's behalf risks publishing
//! an identifier they never wrote; the checksum catches typos either way.
//!
//! ## Warnings Where the World Outruns Us
//!
//! The SPDX license list is maintained externally and grows faster than the
//! bundled table, so an unknown license id is a warning, not an error. The
//! same courtesy applies to unknown keys in `[technote]` tables, which may
//! belong to a newer tool sharing the file. Everything else fails the
//! build.
//!
//! # Example
//!
//! ```
//! let source = r#"
//! [technote]
//! id = "EX-001"
//!
//! [[technote.authors]]
//! name = { given = "Vera", family = "Rubin" }
//! "#;
//!
//! let resolution = technote_meta::resolve(source).unwrap();
//! assert_eq!(resolution.metadata.id.as_deref(), Some("EX-001"));
//! assert_eq!(resolution.metadata.authors[0].name.full_name(), "Vera Rubin");
//!
//! let context = technote_meta::TemplateContext::new(&resolution.metadata, None);
//! assert_eq!(context.get("id").unwrap(), "EX-001");
//! ```

use chrono::Utc;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod context;
pub mod highwire;
pub mod identifiers;
pub mod metadata;
pub mod microformats;
pub mod normalize;
pub mod opengraph;
pub mod settings;
pub mod spdx;
pub mod summary;

pub use context::TemplateContext;
pub use highwire::CitationMeta;
pub use metadata::TechnoteMetadata;
pub use normalize::{Resolution, ValidationError, Violation, Warning};
pub use opengraph::OpenGraphMeta;
pub use settings::{ParseError, RawSettings};

/// Any failure of the resolution pipeline.
///
/// The build driver decides whether to abort or report and continue; the
/// pipeline itself never recovers internally.
#[derive(Error, Debug)]
pub enum TechnoteError {
    #[error("cannot find a technote.toml file at {}", .0.display())]
    MissingSettings(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Resolve a settings document into canonical technote metadata.
///
/// Runs the loader and normalizer with the current time as the build
/// timestamp (the `date_updated` default). The projections are built on
/// demand from the returned [`Resolution`].
pub fn resolve(source: &str) -> Result<Resolution, TechnoteError> {
    let settings = RawSettings::parse(source)?;
    Ok(normalize::normalize(&settings, Utc::now())?)
}

/// Resolve the `technote.toml` in a technote directory.
pub fn resolve_at(dir: &Path) -> Result<Resolution, TechnoteError> {
    let settings = RawSettings::load(dir)?;
    Ok(normalize::normalize(&settings, Utc::now())?)
}
