// ── Device MAC validation ──
//
// Operator input and `devices.txt` lines arrive as free text. Every entry
// is normalized to 12 lowercase hex digits with separators removed, and
// the resulting list is deduplicated in first-seen order.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// MAC address in canonical form: 12 lowercase hex digits, no separators.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MacAddress(String);

impl MacAddress {
    /// Normalize and validate a single entry.
    ///
    /// Strips whitespace and `:` characters and lowercases the rest; the
    /// result must be exactly 12 hex digits. An empty entry is its own
    /// error so a blank line reads differently from a typo.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        if raw.is_empty() {
            return Err(CoreError::EmptyMac);
        }

        let normalized: String = raw
            .chars()
            .filter(|c| !c.is_whitespace() && *c != ':')
            .flat_map(char::to_lowercase)
            .collect();

        let valid = normalized.len() == 12
            && normalized
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));

        if valid {
            Ok(Self(normalized))
        } else {
            Err(CoreError::InvalidMac { raw: raw.to_owned() })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for MacAddress {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for MacAddress {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<MacAddress> for String {
    fn from(mac: MacAddress) -> Self {
        mac.0
    }
}

impl AsRef<str> for MacAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validate, normalize and deduplicate a raw MAC list.
///
/// Fails on the first empty or malformed entry. Duplicates (after
/// normalization) keep their first position.
pub fn validate_macs<S: AsRef<str>>(raw: &[S]) -> Result<Vec<MacAddress>, CoreError> {
    let mut seen = HashSet::with_capacity(raw.len());
    let mut macs = Vec::with_capacity(raw.len());

    for entry in raw {
        let mac = MacAddress::parse(entry.as_ref())?;
        if seen.insert(mac.clone()) {
            macs.push(mac);
        }
    }

    Ok(macs)
}

/// Split the comma-separated list typed at the device prompt.
///
/// Segments are returned as typed; an empty segment (e.g. from a trailing
/// comma) stays in the list and fails validation.
pub fn split_operator_input(input: &str) -> Vec<String> {
    input
        .trim_end_matches(['\r', '\n'])
        .split(',')
        .map(str::to_owned)
        .collect()
}
