//! Microformats2 class annotations for technote templates.
//!
//! Templates mark up the rendered page with microformats2 classes so feed
//! readers and indexers can recover the entry structure (the page is an
//! `h-entry`). The mapping from a template's semantic role to the class
//! token is a fixed table; nothing here is computed from the document.

use serde::Serialize;
use std::collections::BTreeMap;

/// A semantic role a template element can play in the rendered technote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SemanticRole {
    /// The element wrapping the whole technote entry.
    EntryContainer,
    /// The element wrapping the document body.
    ContentContainer,
    /// The abstract/summary element.
    Summary,
    /// An author byline element.
    Author,
    /// The date-updated element.
    DateUpdated,
    /// The date-published element.
    DatePublished,
}

impl SemanticRole {
    /// Every role the templates annotate.
    pub const ALL: [SemanticRole; 6] = [
        SemanticRole::EntryContainer,
        SemanticRole::ContentContainer,
        SemanticRole::Summary,
        SemanticRole::Author,
        SemanticRole::DateUpdated,
        SemanticRole::DatePublished,
    ];

    /// The role's name as templates refer to it.
    pub fn as_str(self) -> &'static str {
        match self {
            SemanticRole::EntryContainer => "entry-container",
            SemanticRole::ContentContainer => "content-container",
            SemanticRole::Summary => "summary",
            SemanticRole::Author => "author",
            SemanticRole::DateUpdated => "date-updated",
            SemanticRole::DatePublished => "date-published",
        }
    }

    /// The microformats2 class token attached to elements in this role.
    pub fn class_token(self) -> &'static str {
        match self {
            SemanticRole::EntryContainer => "h-entry",
            SemanticRole::ContentContainer => "e-content",
            SemanticRole::Summary => "p-summary",
            SemanticRole::Author => "p-author",
            SemanticRole::DateUpdated => "dt-updated",
            SemanticRole::DatePublished => "dt-published",
        }
    }
}

/// The full role-to-token mapping, for embedding in the template context.
pub fn class_map() -> BTreeMap<&'static str, &'static str> {
    SemanticRole::ALL
        .iter()
        .map(|role| (role.as_str(), role.class_token()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_container_is_h_entry() {
        assert_eq!(SemanticRole::EntryContainer.class_token(), "h-entry");
    }

    #[test]
    fn date_roles_use_dt_prefix() {
        assert_eq!(SemanticRole::DateUpdated.class_token(), "dt-updated");
        assert_eq!(SemanticRole::DatePublished.class_token(), "dt-published");
    }

    #[test]
    fn class_map_covers_every_role() {
        let map = class_map();
        assert_eq!(map.len(), SemanticRole::ALL.len());
        assert_eq!(map.get("summary"), Some(&"p-summary"));
        assert_eq!(map.get("author"), Some(&"p-author"));
        assert_eq!(map.get("content-container"), Some(&"e-content"));
    }

    #[test]
    fn role_serializes_kebab_case() {
        let value = serde_json::to_value(SemanticRole::EntryContainer).unwrap();
        assert_eq!(value, serde_json::json!("entry-container"));
    }
}
