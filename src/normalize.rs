//! Normalization of raw settings into canonical technote metadata.
//!
//! Stage 2 of the resolution pipeline. The normalizer walks the
//! [`RawSettings`] tree shape by shape and builds a [`TechnoteMetadata`],
//! applying the model's defaults and validating as it goes.
//!
//! ## Error aggregation
//!
//! A settings file is edited by hand, so stopping at the first bad field
//! would force the author through a fix-rebuild loop one field at a time.
//! Validation therefore never short-circuits: every violation found in the
//! document is collected into a single [`ValidationError`], each entry
//! carrying a dotted field path (`technote.authors[1].name.given`) and a
//! reason. If any violation is recorded, no metadata record is produced at
//! all; projections never see partial bibliographic data.
//!
//! ## Warnings
//!
//! Two conditions are deliberately non-fatal and surface as [`Warning`]s
//! (also emitted through `tracing`):
//!
//! - an unknown SPDX license id, because the SPDX list is maintained
//!   externally and grows faster than the bundled table;
//! - an unknown key inside a `[technote]` table, which is usually a typo
//!   but must not break builds sharing the file with other tooling.
//!
//! ## Validation rules
//!
//! In order (later rules consume outputs of earlier ones):
//!
//! 1. The `[technote]` table must exist; `state` is required whenever a
//!    `[technote.status]` table is present.
//! 2. Every person needs a structured name with both `given` and `family`;
//!    a single free-form name string is rejected.
//! 3. `orcid` and `ror` must be canonical absolute URLs and pass their
//!    registry checksums. Bare identifiers are rejected, not coerced.
//! 4. `status.state` and contributor `role` values must come from their
//!    fixed vocabularies; errors list the accepted values.
//! 5. A missing `date_updated` defaults to the build timestamp (UTC).
//! 6. `license.id` is checked against the bundled SPDX table (warning
//!    only).
//! 7. A repository URL without a configured branch gets branch `"main"`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use std::fmt;
use thiserror::Error;
use toml::{Table, Value};

use crate::identifiers;
use crate::metadata::{
    Contributor, ContributorRole, License, Organization, Person, PersonName, SourceRepository,
    Status, SupersessionLink, TechnoteMetadata, TechnoteState,
};
use crate::settings::RawSettings;
use crate::spdx;

/// The branch assumed when a source repository is configured without one.
pub const DEFAULT_BRANCH: &str = "main";

const KNOWN_TECHNOTE_KEYS: &[&str] = &[
    "id",
    "series_id",
    "organization",
    "title",
    "date_created",
    "date_updated",
    "version",
    "doi",
    "canonical_url",
    "source_url",
    "default_branch",
    "authors",
    "contributors",
    "status",
    "license",
];
const KNOWN_PERSON_KEYS: &[&str] = &["name", "internal_id", "email", "orcid", "affiliations"];
const KNOWN_CONTRIBUTOR_KEYS: &[&str] = &[
    "name",
    "internal_id",
    "email",
    "orcid",
    "affiliations",
    "role",
    "note",
];
const KNOWN_ORGANIZATION_KEYS: &[&str] = &["name", "internal_id", "ror", "address", "url"];
const KNOWN_STATUS_KEYS: &[&str] = &["state", "note", "superseding_urls"];
const KNOWN_LINK_KEYS: &[&str] = &["url", "title"];
const KNOWN_LICENSE_KEYS: &[&str] = &["id"];

/// A single field-level violation: where, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Dotted path into the settings document, e.g.
    /// `technote.authors[0].orcid`.
    pub path: String,
    /// Human-readable reason.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// One or more semantic violations in the settings document. Always fatal;
/// no metadata record is constructed when this is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{} validation error(s) in technote settings:\n{}", .violations.len(), list_violations(.violations))]
pub struct ValidationError {
    /// Every violation found, in document walk order.
    pub violations: Vec<Violation>,
}

fn list_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|violation| format!("  - {violation}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A non-fatal condition noticed during normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    /// Dotted path into the settings document.
    pub path: String,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// The normalizer's output: the canonical record plus any warnings.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// The canonical metadata record.
    pub metadata: TechnoteMetadata,
    /// Non-fatal conditions, in document walk order.
    pub warnings: Vec<Warning>,
}

/// Normalize a raw settings tree into canonical technote metadata.
///
/// `build_time` supplies the `date_updated` default; callers that are not
/// tests pass `Utc::now()` (the [`crate::resolve`] facade does).
pub fn normalize(
    settings: &RawSettings,
    build_time: DateTime<Utc>,
) -> Result<Resolution, ValidationError> {
    let mut n = Normalizer::default();

    let technote = match settings.technote() {
        Some(Value::Table(table)) => table,
        Some(other) => {
            n.violation(
                "technote",
                format!("expected a table, found {}", type_name(other)),
            );
            return Err(n.into_error());
        }
        None => {
            n.violation("technote", "the [technote] table is required");
            return Err(n.into_error());
        }
    };

    n.check_known_keys(technote, "technote", KNOWN_TECHNOTE_KEYS);

    let id = n.string(technote, "technote", "id");
    let series_id = n.string(technote, "technote", "series_id");
    let title = n.string(technote, "technote", "title");
    let version = n.string(technote, "technote", "version");
    let doi = n.string(technote, "technote", "doi");
    let canonical_url = n.url(technote, "technote", "canonical_url");
    let date_created = n.datetime(technote, "technote", "date_created");
    let date_updated = n
        .datetime(technote, "technote", "date_updated")
        .unwrap_or(build_time);

    let organization = technote
        .get("organization")
        .and_then(|value| n.organization(value, "technote.organization"));

    let source_url = n.url(technote, "technote", "source_url");
    let branch = n.string(technote, "technote", "default_branch");
    let source_repository = match source_url {
        Some(url) => Some(SourceRepository {
            url,
            branch: branch.unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
        }),
        None => {
            if branch.is_some() {
                n.warn(
                    "technote.default_branch",
                    "default_branch has no effect without source_url",
                );
            }
            None
        }
    };

    let authors = n.person_list(technote, "technote", "authors");
    let contributors = n.contributor_list(technote, "technote", "contributors");

    let status = technote
        .get("status")
        .and_then(|value| n.status(value, "technote.status"));
    let license = technote
        .get("license")
        .and_then(|value| n.license(value, "technote.license"));

    if !n.violations.is_empty() {
        return Err(n.into_error());
    }

    Ok(Resolution {
        metadata: TechnoteMetadata {
            id,
            series_id,
            organization,
            title,
            date_created,
            date_updated,
            version,
            doi,
            canonical_url,
            source_repository,
            authors,
            contributors,
            status,
            license,
        },
        warnings: n.warnings,
    })
}

/// Replace any whitespace run with a single space and trim the ends.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::String(_) => "a string",
        Value::Integer(_) => "an integer",
        Value::Float(_) => "a float",
        Value::Boolean(_) => "a boolean",
        Value::Datetime(_) => "a datetime",
        Value::Array(_) => "an array",
        Value::Table(_) => "a table",
    }
}

#[derive(Default)]
struct Normalizer {
    violations: Vec<Violation>,
    warnings: Vec<Warning>,
}

impl Normalizer {
    fn violation(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.violations.push(Violation {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        let warning = Warning {
            path: path.into(),
            message: message.into(),
        };
        tracing::warn!(path = %warning.path, "{}", warning.message);
        self.warnings.push(warning);
    }

    fn into_error(self) -> ValidationError {
        ValidationError {
            violations: self.violations,
        }
    }

    fn check_known_keys(&mut self, table: &Table, path: &str, known: &[&str]) {
        for key in table.keys() {
            if !known.contains(&key.as_str()) {
                self.warn(format!("{path}.{key}"), "unknown key (ignored)");
            }
        }
    }

    fn expect_table<'a>(&mut self, value: &'a Value, path: &str) -> Option<&'a Table> {
        match value {
            Value::Table(table) => Some(table),
            other => {
                self.violation(path, format!("expected a table, found {}", type_name(other)));
                None
            }
        }
    }

    fn string(&mut self, table: &Table, path: &str, key: &str) -> Option<String> {
        match table.get(key) {
            None => None,
            Some(Value::String(value)) => Some(value.clone()),
            Some(other) => {
                self.violation(
                    format!("{path}.{key}"),
                    format!("expected a string, found {}", type_name(other)),
                );
                None
            }
        }
    }

    fn required_string(&mut self, table: &Table, path: &str, key: &str) -> Option<String> {
        if !table.contains_key(key) {
            self.violation(format!("{path}.{key}"), format!("`{key}` is required"));
            return None;
        }
        self.string(table, path, key)
    }

    fn datetime(&mut self, table: &Table, path: &str, key: &str) -> Option<DateTime<Utc>> {
        let field = format!("{path}.{key}");
        match table.get(key) {
            None => None,
            Some(Value::Datetime(value)) => match toml_datetime_to_utc(value) {
                Some(datetime) => Some(datetime),
                None => {
                    self.violation(field, "not a valid calendar date or date-time");
                    None
                }
            },
            Some(Value::String(value)) => match parse_datetime_string(value) {
                Some(datetime) => Some(datetime),
                None => {
                    self.violation(
                        field,
                        format!("expected an RFC 3339 date or date-time, received \"{value}\""),
                    );
                    None
                }
            },
            Some(other) => {
                self.violation(
                    field,
                    format!("expected a date or date-time, found {}", type_name(other)),
                );
                None
            }
        }
    }

    fn url(&mut self, table: &Table, path: &str, key: &str) -> Option<url::Url> {
        match table.get(key) {
            None => None,
            Some(Value::String(value)) => self.parse_url(value, &format!("{path}.{key}")),
            Some(other) => {
                self.violation(
                    format!("{path}.{key}"),
                    format!("expected a URL string, found {}", type_name(other)),
                );
                None
            }
        }
    }

    fn parse_url(&mut self, raw: &str, path: &str) -> Option<url::Url> {
        match url::Url::parse(raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Some(url),
            _ => {
                self.violation(
                    path,
                    format!("expected an absolute http(s) URL, received \"{raw}\""),
                );
                None
            }
        }
    }

    fn email(&mut self, table: &Table, path: &str) -> Option<String> {
        let value = self.string(table, path, "email")?;
        if is_plausible_email(&value) {
            Some(value)
        } else {
            self.violation(
                format!("{path}.email"),
                format!("\"{value}\" is not a valid email address"),
            );
            None
        }
    }

    fn orcid(&mut self, table: &Table, path: &str) -> Option<url::Url> {
        let url = self.url(table, path, "orcid")?;
        match identifiers::validate_orcid_url(&url) {
            Ok(()) => Some(url),
            Err(error) => {
                self.violation(format!("{path}.orcid"), error.to_string());
                None
            }
        }
    }

    fn ror(&mut self, table: &Table, path: &str) -> Option<url::Url> {
        let url = self.url(table, path, "ror")?;
        match identifiers::validate_ror_url(&url) {
            Ok(()) => Some(url),
            Err(error) => {
                self.violation(format!("{path}.ror"), error.to_string());
                None
            }
        }
    }

    fn person_name(&mut self, table: &Table, path: &str) -> Option<PersonName> {
        let name_path = format!("{path}.name");
        let name_table = match table.get("name") {
            Some(Value::Table(name_table)) => name_table,
            Some(Value::String(_)) => {
                self.violation(
                    name_path,
                    "expected a table with `given` and `family` parts; \
                     a single name string is not accepted",
                );
                return None;
            }
            Some(other) => {
                self.violation(
                    name_path,
                    format!("expected a table, found {}", type_name(other)),
                );
                return None;
            }
            None => {
                self.violation(
                    name_path,
                    "a structured name with `given` and `family` parts is required",
                );
                return None;
            }
        };
        self.check_known_keys(name_table, &name_path, &["given", "family"]);
        let given = self.name_part(name_table, &name_path, "given");
        let family = self.name_part(name_table, &name_path, "family");
        Some(PersonName {
            given: given?,
            family: family?,
        })
    }

    fn name_part(&mut self, table: &Table, path: &str, key: &str) -> Option<String> {
        match table.get(key) {
            None => {
                self.violation(format!("{path}.{key}"), format!("`{key}` is required"));
                None
            }
            Some(Value::String(value)) if !value.trim().is_empty() => {
                Some(collapse_whitespace(value))
            }
            Some(Value::String(_)) => {
                self.violation(format!("{path}.{key}"), "must not be empty");
                None
            }
            Some(other) => {
                self.violation(
                    format!("{path}.{key}"),
                    format!("expected a string, found {}", type_name(other)),
                );
                None
            }
        }
    }

    /// Shared fields of authors and contributors. Walks every field before
    /// deciding whether the person is constructible, so a broken name does
    /// not hide a broken ORCiD in the same table.
    fn person_fields(&mut self, table: &Table, path: &str) -> Option<Person> {
        let name = self.person_name(table, path);
        let internal_id = self.string(table, path, "internal_id");
        let email = self.email(table, path);
        let orcid = self.orcid(table, path);
        let affiliations = self.organization_list(table, path);
        Some(Person {
            name: name?,
            internal_id,
            email,
            orcid,
            affiliations,
        })
    }

    fn person(&mut self, value: &Value, path: &str) -> Option<Person> {
        let table = self.expect_table(value, path)?;
        self.check_known_keys(table, path, KNOWN_PERSON_KEYS);
        self.person_fields(table, path)
    }

    fn person_list(&mut self, table: &Table, path: &str, key: &str) -> Vec<Person> {
        match table.get(key) {
            None => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .filter_map(|(index, item)| self.person(item, &format!("{path}.{key}[{index}]")))
                .collect(),
            Some(other) => {
                self.violation(
                    format!("{path}.{key}"),
                    format!("expected an array of tables, found {}", type_name(other)),
                );
                Vec::new()
            }
        }
    }

    fn contributor(&mut self, value: &Value, path: &str) -> Option<Contributor> {
        let table = self.expect_table(value, path)?;
        self.check_known_keys(table, path, KNOWN_CONTRIBUTOR_KEYS);
        let person = self.person_fields(table, path);
        let role = match table.get("role") {
            None => None,
            Some(Value::String(value)) => match ContributorRole::parse(value) {
                Some(role) => Some(role),
                None => {
                    self.violation(
                        format!("{path}.role"),
                        format!(
                            "unknown role \"{value}\" (accepted values: {})",
                            ContributorRole::vocabulary().join(", ")
                        ),
                    );
                    None
                }
            },
            Some(other) => {
                self.violation(
                    format!("{path}.role"),
                    format!("expected a string, found {}", type_name(other)),
                );
                None
            }
        };
        let note = self.string(table, path, "note");
        Some(Contributor {
            person: person?,
            role,
            note,
        })
    }

    fn contributor_list(&mut self, table: &Table, path: &str, key: &str) -> Vec<Contributor> {
        match table.get(key) {
            None => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .filter_map(|(index, item)| {
                    self.contributor(item, &format!("{path}.{key}[{index}]"))
                })
                .collect(),
            Some(other) => {
                self.violation(
                    format!("{path}.{key}"),
                    format!("expected an array of tables, found {}", type_name(other)),
                );
                Vec::new()
            }
        }
    }

    fn organization(&mut self, value: &Value, path: &str) -> Option<Organization> {
        let table = self.expect_table(value, path)?;
        self.check_known_keys(table, path, KNOWN_ORGANIZATION_KEYS);
        let name = self
            .string(table, path, "name")
            .map(|value| collapse_whitespace(&value));
        let internal_id = self.string(table, path, "internal_id");
        let address = self.string(table, path, "address");
        let url = self.url(table, path, "url");
        let ror = self.ror(table, path);
        if name.is_none() && ror.is_none() && internal_id.is_none() {
            self.violation(path, "an organization must have a name, ror, or internal_id");
            return None;
        }
        Some(Organization {
            name,
            internal_id,
            ror,
            address,
            url,
        })
    }

    fn organization_list(&mut self, table: &Table, path: &str) -> Vec<Organization> {
        match table.get("affiliations") {
            None => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .filter_map(|(index, item)| {
                    self.organization(item, &format!("{path}.affiliations[{index}]"))
                })
                .collect(),
            Some(other) => {
                self.violation(
                    format!("{path}.affiliations"),
                    format!("expected an array of tables, found {}", type_name(other)),
                );
                Vec::new()
            }
        }
    }

    fn status(&mut self, value: &Value, path: &str) -> Option<Status> {
        let table = self.expect_table(value, path)?;
        self.check_known_keys(table, path, KNOWN_STATUS_KEYS);
        let state = match table.get("state") {
            None => {
                self.violation(
                    format!("{path}.state"),
                    "`state` is required when a status table is present",
                );
                None
            }
            Some(Value::String(value)) => match TechnoteState::parse(value) {
                Some(state) => Some(state),
                None => {
                    self.violation(
                        format!("{path}.state"),
                        format!(
                            "unknown state \"{value}\" (accepted values: {})",
                            TechnoteState::vocabulary().join(", ")
                        ),
                    );
                    None
                }
            },
            Some(other) => {
                self.violation(
                    format!("{path}.state"),
                    format!("expected a string, found {}", type_name(other)),
                );
                None
            }
        };
        let note = self.string(table, path, "note");
        if matches!(state, Some(TechnoteState::Other)) && note.is_none() {
            self.warn(
                format!("{path}.note"),
                "a note is recommended when state is \"other\"",
            );
        }
        let superseding_links = self.link_list(table, path);
        Some(Status {
            state: state?,
            note,
            superseding_links,
        })
    }

    fn link_list(&mut self, table: &Table, path: &str) -> Vec<SupersessionLink> {
        match table.get("superseding_urls") {
            None => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .filter_map(|(index, item)| {
                    self.link(item, &format!("{path}.superseding_urls[{index}]"))
                })
                .collect(),
            Some(other) => {
                self.violation(
                    format!("{path}.superseding_urls"),
                    format!("expected an array of tables, found {}", type_name(other)),
                );
                Vec::new()
            }
        }
    }

    fn link(&mut self, value: &Value, path: &str) -> Option<SupersessionLink> {
        let table = self.expect_table(value, path)?;
        self.check_known_keys(table, path, KNOWN_LINK_KEYS);
        let url = match self.required_string(table, path, "url") {
            Some(raw) => self.parse_url(&raw, &format!("{path}.url")),
            None => None,
        };
        let title = self.string(table, path, "title");
        Some(SupersessionLink { url: url?, title })
    }

    fn license(&mut self, value: &Value, path: &str) -> Option<License> {
        let table = self.expect_table(value, path)?;
        self.check_known_keys(table, path, KNOWN_LICENSE_KEYS);
        let id = self.required_string(table, path, "id")?;
        if !spdx::is_known_license(&id) {
            self.warn(
                format!("{path}.id"),
                format!("unknown SPDX license identifier \"{id}\""),
            );
        }
        Some(License { id })
    }
}

/// Convert a TOML datetime scalar to a UTC datetime.
///
/// A bare date becomes midnight UTC; a local (offset-free) date-time is
/// taken as UTC; an offset date-time is converted. Time-only scalars have
/// no calendar date and are rejected.
fn toml_datetime_to_utc(value: &toml::value::Datetime) -> Option<DateTime<Utc>> {
    let date = value.date?;
    let naive_date = NaiveDate::from_ymd_opt(
        i32::from(date.year),
        u32::from(date.month),
        u32::from(date.day),
    )?;
    let naive_time = match value.time {
        Some(time) => NaiveTime::from_hms_nano_opt(
            u32::from(time.hour),
            u32::from(time.minute),
            u32::from(time.second),
            time.nanosecond,
        )?,
        None => NaiveTime::MIN,
    };
    let naive = naive_date.and_time(naive_time);
    let utc_naive = match value.offset {
        Some(toml::value::Offset::Custom { minutes }) => {
            naive - chrono::Duration::minutes(i64::from(minutes))
        }
        _ => naive,
    };
    Some(utc_naive.and_utc())
}

/// Parse a quoted date or date-time string, mirroring what the TOML grammar
/// accepts unquoted.
fn parse_datetime_string(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Some(datetime.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN).and_utc());
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Some(datetime.and_utc());
    }
    None
}

fn is_plausible_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}
