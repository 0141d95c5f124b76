//! Settings loading for `technote.toml`.
//!
//! A technote directory carries a single `technote.toml` file that holds both
//! document metadata and configuration for downstream tooling. This module is
//! stage 1 of the resolution pipeline: it reads that file (or an in-memory
//! source) and parses it into a [`RawSettings`] tree without interpreting any
//! of the values.
//!
//! ## The raw tree
//!
//! The parse result is kept as the `toml` crate's tagged value tree (string,
//! integer, float, boolean, datetime, array, table) rather than deserialized
//! straight into typed structs. The normalizer pattern-matches the tree shape
//! by shape, which lets it report every violation in a document in one pass
//! instead of stopping at the first bad field.
//!
//! Native TOML date and datetime scalars are preserved as datetime values,
//! distinct from strings, so both of these work unquoted:
//!
//! ```toml
//! [technote]
//! date_created = 2023-09-19
//! date_updated = 2023-09-19T10:00:00-04:00
//! ```
//!
//! ## Foreign tables
//!
//! Only the `[technote]` table belongs to this crate. Other root-level tables
//! are permitted and ignored so that build tooling can keep its own
//! configuration in the same file.

use std::fs;
use std::path::Path;
use thiserror::Error;
use toml::{Table, Value};

use crate::TechnoteError;

/// The settings file name expected in a technote directory.
pub const SETTINGS_FILENAME: &str = "technote.toml";

/// A malformed settings document. Always fatal to the build.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("TOML parse error at line {line}, column {column}: {message}")]
pub struct ParseError {
    /// 1-based line of the offending syntax.
    pub line: usize,
    /// 1-based column (in bytes) of the offending syntax.
    pub column: usize,
    /// The parser's description of what went wrong.
    pub message: String,
}

impl ParseError {
    fn from_toml(error: toml::de::Error, source: &str) -> Self {
        let (line, column) = match error.span() {
            Some(span) => line_column(source, span.start),
            None => (1, 1),
        };
        ParseError {
            line,
            column,
            message: error.message().to_string(),
        }
    }
}

/// Compute a 1-based (line, column) pair for a byte offset into `source`.
fn line_column(source: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut column = 1;
    for (index, byte) in source.bytes().enumerate() {
        if index >= offset {
            break;
        }
        if byte == b'\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}

/// The unvalidated settings tree parsed from `technote.toml`.
///
/// Transient: handed to [`crate::normalize::normalize`] and discarded once the
/// canonical [`crate::metadata::TechnoteMetadata`] has been built.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSettings {
    root: Table,
}

impl RawSettings {
    /// Parse a settings document from text.
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        let root: Table =
            toml::from_str(source).map_err(|error| ParseError::from_toml(error, source))?;
        Ok(RawSettings { root })
    }

    /// Load `technote.toml` from a technote directory.
    ///
    /// This is the single read the pipeline performs; everything after it is
    /// pure computation over the in-memory tree.
    pub fn load(dir: &Path) -> Result<Self, TechnoteError> {
        let path = dir.join(SETTINGS_FILENAME);
        if !path.is_file() {
            return Err(TechnoteError::MissingSettings(path));
        }
        let content = fs::read_to_string(&path)?;
        Ok(Self::parse(&content)?)
    }

    /// The document root table, including any foreign tables.
    pub fn root(&self) -> &Table {
        &self.root
    }

    /// The `[technote]` entry, if present. The normalizer reports a
    /// structural violation when this is absent or not a table.
    pub fn technote(&self) -> Option<&Value> {
        self.root.get("technote")
    }
}
