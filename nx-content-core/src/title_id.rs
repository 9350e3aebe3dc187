//! Title identifiers, content roles and base-identifier canonicalization.
//!
//! A title ID is 16 hex digits. The last three digits encode the role of the
//! content: `000` for a base title, `800` for its update, anything else for
//! an add-on. Add-ons additionally carry their base title in the 13th digit,
//! offset by one (`0100000000011001` belongs to `0100000000010000`). That
//! relationship is a community convention rather than a platform guarantee,
//! so canonicalization returns `None` whenever it can't be applied.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Number of hex digits in a title ID.
pub const TITLE_ID_LEN: usize = 16;

const BASE_SUFFIX: &str = "000";
const UPDATE_SUFFIX: &str = "800";

/// A validated, upper-case title identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TitleId(String);

impl TitleId {
    /// Parse and normalise a title ID. Surrounding whitespace is ignored.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        if trimmed.len() != TITLE_ID_LEN || !trimmed.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(CoreError::invalid_title_id(trimmed));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Role of this content, derived from the suffix alone.
    pub fn role(&self) -> ContentRole {
        ContentRole::from_suffix(&self.0)
    }

    /// The first 12 digits, shared by a base title, its update and (usually)
    /// its add-ons.
    pub fn prefix(&self) -> &str {
        &self.0[..12]
    }

    /// The update identifier belonging to this ID's base title, if known.
    pub fn update_id(&self) -> Option<TitleId> {
        let base = base_title_id(self)?;
        Some(Self(format!("{}{UPDATE_SUFFIX}", &base.0[..13])))
    }

    fn with_suffix(&self, thirteenth: char, suffix: &str) -> Self {
        Self(format!("{}{thirteenth}{suffix}", &self.0[..12]))
    }

    fn thirteenth_digit(&self) -> char {
        // Validated as ASCII hex on construction.
        self.0.as_bytes()[12] as char
    }
}

impl fmt::Display for TitleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TitleId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TitleId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TitleId> for String {
    fn from(id: TitleId) -> Self {
        id.0
    }
}

impl AsRef<str> for TitleId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// What a piece of content is, relative to its base title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentRole {
    Base,
    Update,
    #[serde(rename = "dlc", alias = "addon")]
    Addon,
}

/// All roles in display order.
pub const ALL_ROLES: &[ContentRole] = &[ContentRole::Base, ContentRole::Update, ContentRole::Addon];

impl ContentRole {
    /// Classify any identifier-shaped string by its last three characters.
    pub fn from_suffix(id: &str) -> Self {
        if id.ends_with(BASE_SUFFIX) {
            Self::Base
        } else if id.ends_with(UPDATE_SUFFIX) {
            Self::Update
        } else {
            Self::Addon
        }
    }

    /// Short name used on the command line and in query strings.
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Update => "update",
            Self::Addon => "dlc",
        }
    }

    /// Plural heading for listings.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Base => "Base Games",
            Self::Update => "Updates",
            Self::Addon => "DLC",
        }
    }

    pub fn all() -> &'static [ContentRole] {
        ALL_ROLES
    }
}

impl fmt::Display for ContentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for ContentRole {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "base" | "game" | "games" => Ok(Self::Base),
            "update" | "updates" => Ok(Self::Update),
            "dlc" | "addon" | "add-on" | "addons" => Ok(Self::Addon),
            other => Err(CoreError::UnknownRole(other.to_string())),
        }
    }
}

/// Resolve the base-title identifier for any title ID.
///
/// - base titles map to themselves
/// - updates swap the `800` suffix for `000`
/// - add-ons decrement the 13th digit and use the `000` suffix
///
/// Returns `None` when the add-on's 13th digit is `0` and can't be
/// decremented.
pub fn base_title_id(id: &TitleId) -> Option<TitleId> {
    match id.role() {
        ContentRole::Base => Some(id.clone()),
        ContentRole::Update => Some(id.with_suffix(id.thirteenth_digit(), BASE_SUFFIX)),
        ContentRole::Addon => {
            let prev = prev_hex_digit(id.thirteenth_digit())?;
            Some(id.with_suffix(prev, BASE_SUFFIX))
        }
    }
}

/// Like [`base_title_id`], for unvalidated input. Malformed identifiers
/// yield `None`.
pub fn base_title_id_str(raw: &str) -> Option<TitleId> {
    TitleId::parse(raw).ok().as_ref().and_then(base_title_id)
}

fn prev_hex_digit(c: char) -> Option<char> {
    let value = c.to_digit(16)?;
    if value == 0 {
        return None;
    }
    std::char::from_digit(value - 1, 16).map(|d| d.to_ascii_uppercase())
}

#[cfg(test)]
#[path = "tests/title_id_tests.rs"]
mod tests;
