// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Parser for the `x-ms-clitelem` diagnostic response header.
//!
//! Version 1 of the header is a comma-separated list:
//!
//! ```text
//! 1,<error_code>,<sub_error_code>,<token_age>,<spe_ring>
//! ```
//!
//! Only the final `spe_ring` field may contain literal commas. The whole header is
//! checked against a single grammar before it is split, so a header either yields
//! all five fields or none of them.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::HeaderError;

/// Name of the response header carrying the diagnostic payload.
pub const HEADER_NAME: &str = "x-ms-clitelem";

const DELIMITER: char = ',';

/// Number of comma-separated parts in a version 1 header.
const V1_PART_COUNT: usize = 5;

static VERSION_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+(\.[0-9]+)*$").expect("version token pattern is valid"));

static V1_GRAMMAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^[1-9][0-9]*(\.[0-9]+)*,[0-9.]*,[0-9.]*,[^,]*,.*$")
        .expect("v1 header pattern is valid")
});

/// Fields extracted from a recognized header.
///
/// Values are passed through untrimmed; the caller decides which ones to record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderDescriptor {
    pub version: String,
    pub error_code: Option<String>,
    pub sub_error_code: Option<String>,
    pub token_age: Option<String>,
    pub spe_ring: Option<String>,
}

/// Parse a raw header value.
///
/// Returns `Ok(None)` for an absent (blank) header. Unknown versions and
/// grammar mismatches are reported as errors and nothing is extracted.
pub fn parse(raw: &str) -> Result<Option<HeaderDescriptor>, HeaderError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }

    let version = raw.split(DELIMITER).next().unwrap_or_default();
    if version.is_empty() {
        return Err(HeaderError::VersionUnrecognized(String::new()));
    }
    if !VERSION_TOKEN.is_match(version) {
        return Err(HeaderError::Malformed(raw.to_string()));
    }

    match version {
        "1" => parse_v1(raw).map(Some),
        other => Err(HeaderError::VersionUnrecognized(other.to_string())),
    }
}

fn parse_v1(raw: &str) -> Result<HeaderDescriptor, HeaderError> {
    if !V1_GRAMMAR.is_match(raw) {
        return Err(HeaderError::Malformed(raw.to_string()));
    }

    let mut parts = raw.splitn(V1_PART_COUNT, DELIMITER).map(str::to_string);
    // The grammar guarantees five parts.
    let version = parts.next().unwrap_or_default();
    Ok(HeaderDescriptor {
        version,
        error_code: parts.next(),
        sub_error_code: parts.next(),
        token_age: parts.next(),
        spe_ring: parts.next(),
    })
}
