//! Parser for the monitor's Detail column.
//!
//! The column packs several named fields into one string:
//!
//! ```text
//! Desired Access: Generic Read, Synchronize: Disposition: Open
//! ```
//!
//! # Grammar
//!
//! - A field name runs up to the next colon (trimmed).
//! - Its value region runs from after that colon up to the following colon,
//!   or to the end of the input.
//! - The value region is split on commas; each value is trimmed.
//! - The sentinels `n/a` and `None` and empty values are dropped, so a field
//!   whose values are all sentinels maps to an empty list.
//! - Scanning stops when no colon remains; trailing text without a colon is
//!   ignored. Fields with a blank name are dropped.
//! - A repeated field name keeps its last occurrence.
//!
//! The upstream format is undocumented, so the parser never fails: malformed
//! input yields fewer fields, not an error.

use std::collections::BTreeMap;

/// Values that mean "absent" rather than an actual value.
const SENTINELS: &[&str] = &["n/a", "None"];

/// Field name → ordered values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailMap {
    fields: BTreeMap<String, Vec<String>>,
}

impl DetailMap {
    /// Values of a field, or `None` if the field is missing.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    /// Values of a field, empty if the field is missing.
    pub fn values(&self, field: &str) -> &[String] {
        self.get(field).unwrap_or(&[])
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn into_inner(self) -> BTreeMap<String, Vec<String>> {
        self.fields
    }
}

/// Parse a Detail string into its named fields.
pub fn parse_details(details: &str) -> DetailMap {
    let mut map = DetailMap::default();
    let mut rest = details;

    while let Some(colon) = rest.find(':') {
        let name = rest[..colon].trim();
        rest = &rest[colon + 1..];

        let region = match rest.find(':') {
            Some(end) => {
                let region = &rest[..end];
                rest = &rest[end + 1..];
                region
            }
            None => std::mem::take(&mut rest),
        };

        if name.is_empty() {
            continue;
        }
        map.fields.insert(name.to_string(), split_values(region));
    }

    map
}

fn split_values(region: &str) -> Vec<String> {
    region
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty() && !SENTINELS.contains(v))
        .map(str::to_string)
        .collect()
}
