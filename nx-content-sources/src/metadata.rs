//! Parser for the JSON metadata map (`id → {"Game Name", "Version", "Size"}`).
//!
//! The map is produced by hand-maintained scripts, so field types drift:
//! versions and sizes appear both as strings and as numbers. Every field is
//! read leniently and anything unusable becomes `None`.

use std::collections::HashMap;

use serde_json::Value;

use nx_content_core::TitleId;

use crate::error::SourceError;

/// Metadata for one identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataEntry {
    pub name: Option<String>,
    pub version: Option<String>,
    pub size: Option<u64>,
    /// Integer update version, present on some update entries.
    pub update_version: Option<u64>,
}

pub type MetadataMap = HashMap<TitleId, MetadataEntry>;

fn as_string(value: Option<&Value>) -> Option<String> {
    let s = match value? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!s.is_empty()).then_some(s)
}

fn as_u64(value: Option<&Value>) -> Option<u64> {
    match value? {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Parse the metadata JSON document.
///
/// A document that isn't a JSON object is an error; individual entries with
/// bad identifiers or non-object values are skipped.
pub fn parse_metadata(content: &str) -> Result<MetadataMap, SourceError> {
    let root: Value = serde_json::from_str(content)?;
    let Value::Object(map) = root else {
        return Err(SourceError::invalid_data("metadata map is not a JSON object"));
    };

    let mut out = HashMap::with_capacity(map.len());
    for (key, value) in &map {
        let id = match TitleId::parse(key) {
            Ok(id) => id,
            Err(e) => {
                log::warn!("Skipping metadata entry: {e}");
                continue;
            }
        };
        let Value::Object(fields) = value else {
            log::warn!("Skipping metadata entry {id}: not an object");
            continue;
        };

        let entry = MetadataEntry {
            name: as_string(fields.get("Game Name")),
            version: as_string(fields.get("Version")),
            size: as_u64(fields.get("Size")).filter(|&s| s > 0),
            update_version: as_u64(fields.get("Update Version")),
        };
        out.entry(id).or_insert(entry);
    }

    log::debug!("Parsed {} metadata entries", out.len());
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tid(s: &str) -> TitleId {
        TitleId::parse(s).unwrap()
    }

    #[test]
    fn test_parse_entries() {
        let json = r#"{
            "0100000000010000": {"Game Name": "Example Game", "Version": "1.2.0", "Size": 4000000000},
            "0100000000010800": {"Game Name": "Example Game", "Version": 65536, "Size": "12345", "Update Version": 65536}
        }"#;
        let map = parse_metadata(json).unwrap();
        assert_eq!(map.len(), 2);

        let base = &map[&tid("0100000000010000")];
        assert_eq!(base.name.as_deref(), Some("Example Game"));
        assert_eq!(base.version.as_deref(), Some("1.2.0"));
        assert_eq!(base.size, Some(4_000_000_000));

        let update = &map[&tid("0100000000010800")];
        assert_eq!(update.version.as_deref(), Some("65536"));
        assert_eq!(update.size, Some(12345));
        assert_eq!(update.update_version, Some(65536));
    }

    #[test]
    fn test_skips_bad_entries() {
        let json = r#"{"nope": {}, "0100000000010000": 5, "0100000000020000": {"Game Name": ""}}"#;
        let map = parse_metadata(json).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map[&tid("0100000000020000")].name, None);
    }

    #[test]
    fn test_rejects_non_object() {
        assert!(parse_metadata("[1, 2]").is_err());
        assert!(parse_metadata("not json").is_err());
    }
}
