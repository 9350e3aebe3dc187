//! Name and identifier search.
//!
//! Name matching is approximate: a query matches when it appears in the
//! name, or when some window of the name is close enough to it by
//! normalised Levenshtein similarity. How close is "close enough" comes from
//! a single precision value in `0.0..=1.0`; higher precision means fewer,
//! tighter matches.

use std::fmt;
use std::str::FromStr;

use nx_content_core::{ContentRecord, ContentRole};

/// Matching parameters derived from a precision value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOptions {
    /// Highest score (0 = exact) that still counts as a match.
    pub threshold: f64,
    /// Queries shorter than this never match.
    pub min_match_char_length: usize,
}

impl SearchOptions {
    pub fn from_precision(precision: f64) -> Self {
        let precision = precision.clamp(0.0, 1.0);
        let looseness = 1.0 - precision;
        Self {
            threshold: looseness,
            min_match_char_length: ((4.0 * looseness).floor() as usize).max(2),
        }
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self::from_precision(0.7)
    }
}

/// Which roles a listing shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RoleFilter {
    #[default]
    All,
    Only(ContentRole),
}

impl RoleFilter {
    pub fn matches(&self, role: ContentRole) -> bool {
        match self {
            Self::All => true,
            Self::Only(r) => *r == role,
        }
    }
}

impl FromStr for RoleFilter {
    type Err = nx_content_core::CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

impl fmt::Display for RoleFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(role) => f.write_str(role.short_name()),
        }
    }
}

/// Active search criteria. Empty strings are inactive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    pub name: String,
    pub title_id: String,
    pub role: RoleFilter,
    pub options: SearchOptions,
}

/// Score `query` against `name`: 0.0 is a perfect match, 1.0 no
/// resemblance. Both are compared case-insensitively.
pub fn name_score(query: &str, name: &str) -> f64 {
    let query = query.trim().to_lowercase();
    let name = name.to_lowercase();
    if query.is_empty() || name.contains(&query) {
        return 0.0;
    }

    let name_chars: Vec<char> = name.chars().collect();
    let q_len = query.chars().count();
    let mut best = 0.0f64;

    let window_lens = [q_len.saturating_sub(1), q_len, q_len + 1];
    for &len in &window_lens {
        if len == 0 {
            continue;
        }
        if len >= name_chars.len() {
            best = best.max(strsim::normalized_levenshtein(&query, &name));
            continue;
        }
        for window in name_chars.windows(len) {
            let candidate: String = window.iter().collect();
            best = best.max(strsim::normalized_levenshtein(&query, &candidate));
        }
    }
    1.0 - best
}

/// Whether a record's name matches `query` under `options`.
pub fn name_matches(query: &str, name: Option<&str>, options: &SearchOptions) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return true;
    }
    let Some(name) = name else {
        return false;
    };
    if query.chars().count() < options.min_match_char_length {
        return false;
    }
    name_score(query, name) <= options.threshold
}

/// Case-insensitive substring match on the identifier.
pub fn title_id_matches(query: &str, id: &str) -> bool {
    let query = query.trim();
    query.is_empty() || id.to_ascii_uppercase().contains(&query.to_ascii_uppercase())
}

impl SearchQuery {
    pub fn is_empty(&self) -> bool {
        self.name.trim().is_empty()
            && self.title_id.trim().is_empty()
            && self.role == RoleFilter::All
    }

    /// Every active criterion must hold.
    pub fn matches(&self, record: &ContentRecord) -> bool {
        self.role.matches(record.role())
            && title_id_matches(&self.title_id, record.identifier.as_str())
            && name_matches(&self.name, record.display_name.as_deref(), &self.options)
    }
}

/// Records matching `query`, in input order.
pub fn search<'a>(records: &'a [ContentRecord], query: &SearchQuery) -> Vec<&'a ContentRecord> {
    records.iter().filter(|r| query.matches(r)).collect()
}

#[cfg(test)]
#[path = "tests/search_tests.rs"]
mod tests;
