//! Canonical contract key normalization
//!
//! Externally-authored spreadsheets reference contracts with a compact key
//! (`group/yearShort-number/suffix`, e.g. `787010/25-71/00`) while the cache
//! stores `number/yearFull` plus a separate group code, sometimes under a
//! legacy short group code. This module folds both spellings into one
//! canonical join key so external rows can be matched to cached records.

use std::collections::HashMap;

use chrono::NaiveDate;
use thiserror::Error;

use crate::core::cache::{CacheError, ContractCache};

/// Legacy short group codes and their canonical long forms
const GROUP_ALIASES: &[(&str, &str)] = &[
    ("87000", "787000"),
    ("87010", "787010"),
    ("87020", "787020"),
    ("87030", "787030"),
];

/// Width the numeric sequence is padded to
const NUMBER_WIDTH: usize = 5;

/// Records whose validity ended more than this many days ago are not
/// candidates for external matching
pub const MATCH_GRACE_DAYS: i64 = 40;

/// Errors from parsing a compact external key
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyParseError {
    #[error("malformed compact key '{0}' (expected group/year-number/suffix)")]
    Malformed(String),
}

/// A compact external key, split into its parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompactKey {
    pub group_code: String,
    pub year: String,
    pub number: String,
    pub suffix: String,
}

impl CompactKey {
    /// Parse `787010/25-71/00` style keys
    pub fn parse(raw: &str) -> Result<Self, KeyParseError> {
        let malformed = || KeyParseError::Malformed(raw.to_string());

        let mut slash = raw.trim().splitn(3, '/');
        let group_code = slash.next().filter(|s| !s.is_empty()).ok_or_else(malformed)?;
        let middle = slash.next().ok_or_else(malformed)?;
        let suffix = slash.next().unwrap_or("");

        let (year, number) = middle.split_once('-').ok_or_else(malformed)?;
        if year.is_empty() || number.is_empty() {
            return Err(malformed());
        }

        Ok(Self {
            group_code: group_code.to_string(),
            year: year.to_string(),
            number: number.to_string(),
            suffix: suffix.to_string(),
        })
    }

    /// Canonical form of this key
    pub fn canonicalize(&self) -> (String, String) {
        canonicalize(&self.group_code, &self.year, &self.number)
    }
}

/// Fold a group code to its canonical long form
pub fn canonical_group(group_code: &str) -> &str {
    GROUP_ALIASES
        .iter()
        .find(|(short, _)| *short == group_code)
        .map(|(_, long)| *long)
        .unwrap_or(group_code)
}

/// Normalize `(group, year, number)` into the canonical join key.
///
/// Two-digit years expand to `20xx`; numbers are zero-padded to a fixed
/// width; the group code goes through the alias table. The second element is
/// the `00071/2025` style number key the cache stores.
pub fn canonicalize(group_code: &str, year: &str, number: &str) -> (String, String) {
    let group = canonical_group(group_code).to_string();

    let full_year = if year.len() == 2 {
        format!("20{year}")
    } else {
        year.to_string()
    };

    let padded = match number.trim().parse::<u64>() {
        Ok(n) => format!("{n:0width$}", width = NUMBER_WIDTH),
        Err(_) => number.trim().to_string(),
    };

    (group, format!("{padded}/{full_year}"))
}

/// Index from canonical key to cached contract id, built once per import run
pub struct KeyIndex {
    index: HashMap<(String, String), String>,
}

impl KeyIndex {
    /// Build the index over all cached records.
    ///
    /// Records whose `valid_to` ended more than [`MATCH_GRACE_DAYS`] before
    /// `today` are excluded; recently-expired ones stay matchable because
    /// external sheets usually lag the catalog by a few weeks.
    pub fn build(cache: &ContractCache, today: NaiveDate) -> Result<Self, CacheError> {
        let cutoff = today - chrono::Duration::days(MATCH_GRACE_DAYS);
        let mut index = HashMap::new();

        for contract in cache.list_contracts(None)? {
            if let Some(valid_to) = contract.valid_to {
                if valid_to < cutoff {
                    continue;
                }
            }
            let Some(number) = contract.number.as_deref() else {
                continue;
            };
            let Some((seq, year)) = number.split_once('/') else {
                continue;
            };

            let key = canonicalize(&contract.group_code, year, seq);
            index.insert(key, contract.id);
        }

        Ok(Self { index })
    }

    /// Resolve a compact external key to a cached contract id
    pub fn lookup(&self, compact: &CompactKey) -> Option<&str> {
        self.index.get(&compact.canonicalize()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

/// Outcome of one external matching pass; unmatched keys are reported,
/// never silently dropped
#[derive(Debug, Clone, Default)]
pub struct MatchSummary {
    pub matched: usize,
    pub unmatched: Vec<String>,
}
