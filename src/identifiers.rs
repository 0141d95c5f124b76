//! Syntactic validation of ORCiD and ROR identifier URLs.
//!
//! Both registries encode a checksum in the identifier, so a surprising
//! number of typos are catchable entirely offline. Validation here is
//! pattern plus checksum only; the pipeline never calls out to either
//! registry (resolution is a Non-goal of the metadata layer).
//!
//! Identifiers must already be in canonical absolute URL form
//! (`https://orcid.org/...`, `https://ror.org/...`). Bare identifiers are
//! rejected rather than coerced: citation metadata consumers require URLs,
//! and silently reformatting a value risks publishing an identifier the
//! author never wrote.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;
use url::Url;

/// An identifier URL that failed syntactic validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("expected an ORCiD URL like https://orcid.org/0000-0002-1825-0097, received: {0}")]
    NotOrcid(String),
    #[error("ORCiD identifier checksum failed: {0}")]
    OrcidChecksum(String),
    #[error("expected a ROR URL like https://ror.org/048g3cy84, received: {0}")]
    NotRor(String),
    #[error("ROR identifier checksum failed: {0}")]
    RorChecksum(String),
}

/// Path of an ORCiD URL: four dash-separated groups of four, where only the
/// final character may be the `X` check digit.
///
/// See <https://support.orcid.org/hc/en-us/articles/360006897674>.
static ORCID_PATH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/([0-9]{4}-[0-9]{4}-[0-9]{4}-[0-9]{3}[0-9X])/?$").unwrap()
});

/// Path of a ROR URL: a leading zero, six Crockford base32 characters, and a
/// two-digit checksum.
static ROR_PATH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^/(0[0-9a-hjkmnp-tv-z]{6}[0-9]{2})/?$").unwrap()
});

/// Crockford base32, as used by the ROR registry (no i, l, o, or u).
const CROCKFORD_ALPHABET: &[u8] = b"0123456789abcdefghjkmnpqrstvwxyz";

/// Check an ORCiD URL for validity (host, pattern, checksum).
pub fn validate_orcid_url(url: &Url) -> Result<(), IdentifierError> {
    let host_ok = url
        .host_str()
        .is_some_and(|host| matches!(host.to_ascii_lowercase().as_str(), "orcid.org" | "www.orcid.org"));
    if !matches!(url.scheme(), "http" | "https") || !host_ok {
        return Err(IdentifierError::NotOrcid(url.to_string()));
    }
    let Some(captures) = ORCID_PATH_PATTERN.captures(url.path()) else {
        return Err(IdentifierError::NotOrcid(url.to_string()));
    };
    if !verify_orcid_checksum(&captures[1]) {
        return Err(IdentifierError::OrcidChecksum(url.to_string()));
    }
    Ok(())
}

/// Check a ROR URL for validity (host, pattern, checksum).
pub fn validate_ror_url(url: &Url) -> Result<(), IdentifierError> {
    let host_ok = url
        .host_str()
        .is_some_and(|host| host.eq_ignore_ascii_case("ror.org"));
    if !matches!(url.scheme(), "http" | "https") || !host_ok {
        return Err(IdentifierError::NotRor(url.to_string()));
    }
    let Some(captures) = ROR_PATH_PATTERN.captures(url.path()) else {
        return Err(IdentifierError::NotRor(url.to_string()));
    };
    if !verify_ror_checksum(&captures[1].to_ascii_lowercase()) {
        return Err(IdentifierError::RorChecksum(url.to_string()));
    }
    Ok(())
}

/// Verify the checksum of a bare ORCiD identifier (the URL path component)
/// using the ISO 7064 11,2 algorithm. Dashes are skipped; `X` stands for 10
/// as the check digit.
pub fn verify_orcid_checksum(identifier: &str) -> bool {
    let mut total: u32 = 0;
    for character in identifier.chars() {
        let digit = match character {
            'X' => 10,
            c if c.is_ascii_digit() => c as u32 - '0' as u32,
            _ => continue,
        };
        total = (total + digit) * 2;
    }
    (12 - total % 11) % 11 == 10
}

/// Verify the checksum of a bare ROR identifier: the trailing two decimal
/// digits are an ISO 7064 97-10 check over the base32-decoded payload.
pub fn verify_ror_checksum(identifier: &str) -> bool {
    if identifier.len() < 3 {
        return false;
    }
    let (payload, check) = identifier.split_at(identifier.len() - 2);
    let Some(value) = decode_crockford(payload) else {
        return false;
    };
    let Ok(check) = check.parse::<u64>() else {
        return false;
    };
    (value * 100 + check) % 97 == 1
}

fn decode_crockford(payload: &str) -> Option<u64> {
    payload.bytes().try_fold(0u64, |accumulator, byte| {
        let position = CROCKFORD_ALPHABET
            .iter()
            .position(|&candidate| candidate == byte.to_ascii_lowercase())?;
        Some(accumulator * 32 + position as u64)
    })
}
