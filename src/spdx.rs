//! A bundled table of SPDX license identifiers.
//!
//! The SPDX license list is maintained externally and grows faster than any
//! vendored copy of it, so membership here is advisory: the normalizer
//! downgrades an unknown id to a warning instead of failing the build, and
//! the configured id is always kept verbatim. The table below mirrors the
//! identifiers that appear in practice on published technotes plus the
//! common software and documentation licenses.
//!
//! See <https://spdx.org/licenses/> for the canonical list.

/// Known SPDX license identifiers, matched exactly (SPDX ids are
/// case-sensitive).
pub const KNOWN_LICENSE_IDS: &[&str] = &[
    "0BSD",
    "AFL-3.0",
    "AGPL-3.0-only",
    "AGPL-3.0-or-later",
    "Apache-1.1",
    "Apache-2.0",
    "Artistic-2.0",
    "BSD-2-Clause",
    "BSD-3-Clause",
    "BSD-3-Clause-Clear",
    "BSD-4-Clause",
    "BSL-1.0",
    "CC-BY-1.0",
    "CC-BY-2.0",
    "CC-BY-2.5",
    "CC-BY-3.0",
    "CC-BY-4.0",
    "CC-BY-NC-4.0",
    "CC-BY-NC-ND-4.0",
    "CC-BY-NC-SA-4.0",
    "CC-BY-ND-4.0",
    "CC-BY-SA-3.0",
    "CC-BY-SA-4.0",
    "CC-PDDC",
    "CC0-1.0",
    "CDDL-1.0",
    "CDDL-1.1",
    "CECILL-2.1",
    "ECL-2.0",
    "EPL-1.0",
    "EPL-2.0",
    "EUPL-1.1",
    "EUPL-1.2",
    "GFDL-1.2-only",
    "GFDL-1.2-or-later",
    "GFDL-1.3-only",
    "GFDL-1.3-or-later",
    "GPL-2.0-only",
    "GPL-2.0-or-later",
    "GPL-3.0-only",
    "GPL-3.0-or-later",
    "ISC",
    "LGPL-2.1-only",
    "LGPL-2.1-or-later",
    "LGPL-3.0-only",
    "LGPL-3.0-or-later",
    "LPPL-1.3c",
    "MIT",
    "MIT-0",
    "MPL-1.1",
    "MPL-2.0",
    "MS-PL",
    "MS-RL",
    "NCSA",
    "ODbL-1.0",
    "OFL-1.1",
    "OSL-3.0",
    "PDDL-1.0",
    "PostgreSQL",
    "Python-2.0",
    "Unlicense",
    "UPL-1.0",
    "Vim",
    "WTFPL",
    "Zlib",
];

/// Whether an SPDX id is in the bundled table.
pub fn is_known_license(id: &str) -> bool {
    KNOWN_LICENSE_IDS.contains(&id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_ids_are_known() {
        assert!(is_known_license("CC-BY-4.0"));
        assert!(is_known_license("CC-BY-SA-4.0"));
        assert!(is_known_license("MIT"));
        assert!(is_known_license("Apache-2.0"));
    }

    #[test]
    fn unknown_ids_are_not_known() {
        assert!(!is_known_license("NOT-A-REAL-LICENSE"));
        assert!(!is_known_license(""));
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert!(!is_known_license("mit"));
        assert!(!is_known_license("cc-by-4.0"));
    }

    #[test]
    fn deprecated_bare_gpl_ids_are_not_known() {
        // SPDX retired "GPL-3.0" in favor of the -only/-or-later forms.
        assert!(!is_known_license("GPL-3.0"));
        assert!(is_known_license("GPL-3.0-only"));
    }
}
