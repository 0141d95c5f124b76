//! The canonical metadata model for a technote.
//!
//! [`TechnoteMetadata`] is the root record the normalizer produces from a
//! settings document. It is constructed once per build, never mutated
//! afterwards, and consumed by the projection builders
//! ([`crate::highwire`], [`crate::opengraph`], [`crate::context`]).
//!
//! All types serialize with serde so the template context can embed them
//! directly. Datetimes are normalized to UTC before they reach this model;
//! identifier URLs (`orcid`, `ror`) are stored in their canonical absolute
//! form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// A person's structured name.
///
/// Both parts are required. A free-form single-string name is not accepted
/// anywhere in the model: citation metadata consumers need the family/given
/// split, and guessing it from a display name publishes wrong data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonName {
    /// The person's given name (first name in western culture).
    pub given: String,
    /// The person's family name (last name in western culture).
    pub family: String,
}

impl PersonName {
    /// The name in plain text: "given family".
    pub fn full_name(&self) -> String {
        format!("{} {}", self.given, self.family)
    }

    /// The name in citation order: "family, given".
    pub fn citation_name(&self) -> String {
        format!("{}, {}", self.family, self.given)
    }
}

/// An organization, used both as a person's affiliation and as the
/// publishing entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    /// The display name of the institution.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// A user-specific identifier for the organization.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal_id: Option<String>,
    /// The ROR (ror.org) identifier of the institution, as an absolute URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ror: Option<Url>,
    /// The address of the institution.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// The homepage of the institution.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<Url>,
}

/// A person related to the technote (an author, or the person half of a
/// [`Contributor`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    /// The person's structured name.
    pub name: PersonName,
    /// An internal/institutional identifier for the person.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal_id: Option<String>,
    /// Contact email associated with the person.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// The ORCiD of the person, as an absolute URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orcid: Option<Url>,
    /// The person's affiliations, in input order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub affiliations: Vec<Organization>,
}

/// The fixed vocabulary of non-authorship contributor roles.
///
/// This is the Zenodo/DataCite contributor vocabulary. Values outside this
/// list fail normalization; there is no free-form role string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContributorRole {
    ContactPerson,
    DataCollector,
    DataCurator,
    DataManager,
    Distributor,
    Editor,
    Funder,
    HostingInstitution,
    Producer,
    ProjectLeader,
    ProjectManager,
    ProjectMember,
    RegistrationAgency,
    RegistrationAuthority,
    RelatedPerson,
    Researcher,
    ResearchGroup,
    RightsHolder,
    Supervisor,
    Sponsor,
    WorkPackageLeader,
    Other,
}

impl ContributorRole {
    /// Every accepted role, in vocabulary order.
    pub const ALL: [ContributorRole; 22] = [
        ContributorRole::ContactPerson,
        ContributorRole::DataCollector,
        ContributorRole::DataCurator,
        ContributorRole::DataManager,
        ContributorRole::Distributor,
        ContributorRole::Editor,
        ContributorRole::Funder,
        ContributorRole::HostingInstitution,
        ContributorRole::Producer,
        ContributorRole::ProjectLeader,
        ContributorRole::ProjectManager,
        ContributorRole::ProjectMember,
        ContributorRole::RegistrationAgency,
        ContributorRole::RegistrationAuthority,
        ContributorRole::RelatedPerson,
        ContributorRole::Researcher,
        ContributorRole::ResearchGroup,
        ContributorRole::RightsHolder,
        ContributorRole::Supervisor,
        ContributorRole::Sponsor,
        ContributorRole::WorkPackageLeader,
        ContributorRole::Other,
    ];

    /// The role's canonical string form.
    pub fn as_str(self) -> &'static str {
        match self {
            ContributorRole::ContactPerson => "ContactPerson",
            ContributorRole::DataCollector => "DataCollector",
            ContributorRole::DataCurator => "DataCurator",
            ContributorRole::DataManager => "DataManager",
            ContributorRole::Distributor => "Distributor",
            ContributorRole::Editor => "Editor",
            ContributorRole::Funder => "Funder",
            ContributorRole::HostingInstitution => "HostingInstitution",
            ContributorRole::Producer => "Producer",
            ContributorRole::ProjectLeader => "ProjectLeader",
            ContributorRole::ProjectManager => "ProjectManager",
            ContributorRole::ProjectMember => "ProjectMember",
            ContributorRole::RegistrationAgency => "RegistrationAgency",
            ContributorRole::RegistrationAuthority => "RegistrationAuthority",
            ContributorRole::RelatedPerson => "RelatedPerson",
            ContributorRole::Researcher => "Researcher",
            ContributorRole::ResearchGroup => "ResearchGroup",
            ContributorRole::RightsHolder => "RightsHolder",
            ContributorRole::Supervisor => "Supervisor",
            ContributorRole::Sponsor => "Sponsor",
            ContributorRole::WorkPackageLeader => "WorkPackageLeader",
            ContributorRole::Other => "Other",
        }
    }

    /// Parse a role from its canonical string form.
    pub fn parse(value: &str) -> Option<ContributorRole> {
        Self::ALL.into_iter().find(|role| role.as_str() == value)
    }

    /// The accepted string forms, for error messages.
    pub fn vocabulary() -> Vec<&'static str> {
        Self::ALL.iter().map(|role| role.as_str()).collect()
    }
}

/// A contributor: a person plus a role from the fixed vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contributor {
    /// The person details.
    #[serde(flatten)]
    pub person: Person,
    /// The contributor's role.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<ContributorRole>,
    /// A note describing the contribution.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Standardized lifecycle states for a technote.
///
/// Coarse by design. Fine-grained workflow status (in review, ticketed work)
/// belongs to the issue tracker, not the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TechnoteState {
    /// Actively drafted and updated. May not be complete.
    Draft,
    /// Considered stable, complete, and accurate.
    Stable,
    /// No longer relevant or accurate, possibly replaced by other documents.
    Deprecated,
    /// Not described by the controlled vocabulary; explained by the
    /// status note.
    Other,
}

impl TechnoteState {
    /// Every accepted state.
    pub const ALL: [TechnoteState; 4] = [
        TechnoteState::Draft,
        TechnoteState::Stable,
        TechnoteState::Deprecated,
        TechnoteState::Other,
    ];

    /// The state's canonical string form.
    pub fn as_str(self) -> &'static str {
        match self {
            TechnoteState::Draft => "draft",
            TechnoteState::Stable => "stable",
            TechnoteState::Deprecated => "deprecated",
            TechnoteState::Other => "other",
        }
    }

    /// Parse a state from its canonical string form.
    pub fn parse(value: &str) -> Option<TechnoteState> {
        Self::ALL.into_iter().find(|state| state.as_str() == value)
    }

    /// The accepted string forms, for error messages.
    pub fn vocabulary() -> Vec<&'static str> {
        Self::ALL.iter().map(|state| state.as_str()).collect()
    }
}

/// A link to a document or webpage that supersedes this technote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupersessionLink {
    /// The URL of the superseding document.
    pub url: Url,
    /// The title of the superseding document, if available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// The technote's content status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Status {
    /// The lifecycle state.
    pub state: TechnoteState,
    /// An explanation of the state. Expected (but not required) when the
    /// state is [`TechnoteState::Other`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Links to superseding documents, in input order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub superseding_links: Vec<SupersessionLink>,
}

/// The content license, identified by SPDX id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    /// The SPDX license identifier, e.g. `CC-BY-4.0`. Kept verbatim even
    /// when the id is not in the bundled SPDX table.
    pub id: String,
}

/// The technote's source code repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRepository {
    /// The repository URL.
    pub url: Url,
    /// The default branch, `"main"` unless configured otherwise.
    pub branch: String,
}

/// The canonical metadata record for a technote.
///
/// Built once per build invocation by [`crate::normalize::normalize`] and
/// immutable afterwards. The projection builders read it; nothing writes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnoteMetadata {
    /// The institutional identifier for the technote, e.g. `SQR-000`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// The identifier of the series the technote belongs to, e.g. `SQR`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series_id: Option<String>,
    /// The organization that publishes the technote series.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<Organization>,
    /// The technote's title. Usually derived from the document's top-level
    /// heading by the host build; set here only to override that.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// When the technote was created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_created: Option<DateTime<Utc>>,
    /// When the technote was last updated. Defaults to the build timestamp:
    /// a technote is considered updated at minimum whenever it is rebuilt.
    pub date_updated: DateTime<Utc>,
    /// The current version of the technote.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// The most relevant DOI for the technote. May be pre-registered so the
    /// DOI can appear in the released source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    /// The URL where the technote is published.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical_url: Option<Url>,
    /// The source code repository hosting the technote.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_repository: Option<SourceRepository>,
    /// The authors, in input order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<Person>,
    /// Additional contributors, in input order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contributors: Vec<Contributor>,
    /// The content status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    /// The content license.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
}

impl TechnoteMetadata {
    /// A plaintext byline: author names joined with ", ", or `None` when
    /// there are no authors.
    pub fn byline(&self) -> Option<String> {
        if self.authors.is_empty() {
            return None;
        }
        Some(
            self.authors
                .iter()
                .map(|author| author.name.full_name())
                .collect::<Vec<_>>()
                .join(", "),
        )
    }
}

/// Format a UTC datetime as an ISO 8601 date, `YYYY-MM-DD`.
pub fn format_iso_date(datetime: DateTime<Utc>) -> String {
    datetime.format("%Y-%m-%d").to_string()
}

/// Format a UTC datetime as an ISO 8601 datetime, `YYYY-MM-DDTHH:MM:SSZ`.
pub fn format_iso_datetime(datetime: DateTime<Utc>) -> String {
    datetime.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
