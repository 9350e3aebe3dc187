use serde::{Deserialize, Serialize};

use crate::dates;
use crate::title_id::{ContentRole, TitleId, base_title_id};
use crate::version::{EncodedVersion, encode_version};

/// Display name used for records no source could name.
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// One row of the merged catalog.
///
/// A base title and each of its update versions are separate records; the
/// `instance_key` tells them apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRecord {
    pub identifier: TitleId,
    /// `"{identifier}_{version}"`, or `"{identifier}_0"` when unversioned.
    pub instance_key: String,
    pub version: Option<String>,
    pub display_name: Option<String>,
    pub size_bytes: Option<u64>,
    pub release_date: Option<String>,
    /// Created from version history alone, with no manifest row.
    #[serde(default)]
    pub synthesized: bool,
}

impl ContentRecord {
    /// A bare record with only its identity filled in.
    pub fn new(identifier: TitleId, version: Option<String>) -> Self {
        let instance_key = instance_key(&identifier, version.as_deref());
        Self {
            identifier,
            instance_key,
            version,
            display_name: None,
            size_bytes: None,
            release_date: None,
            synthesized: false,
        }
    }

    pub fn role(&self) -> ContentRole {
        self.identifier.role()
    }

    /// Base title this record belongs to, if it can be determined.
    pub fn base_id(&self) -> Option<TitleId> {
        base_title_id(&self.identifier)
    }

    /// Name for display, falling back to [`UNKNOWN_TITLE`].
    pub fn name_or_unknown(&self) -> &str {
        self.display_name.as_deref().unwrap_or(UNKNOWN_TITLE)
    }

    pub fn encoded_version(&self) -> Option<EncodedVersion> {
        self.version.as_deref().and_then(|v| encode_version(v).ok())
    }

    pub fn has_valid_release_date(&self) -> bool {
        dates::is_valid_release_date(self.release_date.as_deref())
    }

    pub fn release_timestamp(&self) -> Option<i64> {
        dates::release_timestamp(self.release_date.as_deref())
    }

    /// Size, with `0` treated as unknown.
    pub fn known_size(&self) -> Option<u64> {
        self.size_bytes.filter(|&s| s > 0)
    }
}

/// Build the unique key for an identifier/version pair.
pub fn instance_key(identifier: &TitleId, version: Option<&str>) -> String {
    match version {
        Some(v) if !v.is_empty() => format!("{identifier}_{v}"),
        _ => format!("{identifier}_0"),
    }
}
