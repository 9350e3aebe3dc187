//! Parser for the availability manifest: one `id|version` pair per line.

use nx_content_core::TitleId;

/// A single manifest row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub id: TitleId,
    /// Row version; `None` when the column is missing or empty.
    pub version: Option<String>,
}

/// Parse manifest text.
///
/// Blank lines are skipped. Rows whose identifier doesn't parse are skipped
/// with a warning; they can't be classified or merged.
pub fn parse_manifest(content: &str) -> Vec<ManifestEntry> {
    let mut entries = Vec::new();

    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut fields = line.split('|');
        let raw_id = fields.next().unwrap_or("");
        let id = match TitleId::parse(raw_id) {
            Ok(id) => id,
            Err(e) => {
                log::warn!("Skipping manifest line {}: {e}", line_no + 1);
                continue;
            }
        };

        let version = fields
            .next()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        entries.push(ManifestEntry { id, version });
    }

    log::debug!("Parsed {} manifest rows", entries.len());
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rows() {
        let entries = parse_manifest(
            "0100000000010000|1.2.0\n0100000000010800|65536\n0100000000011001\n",
        );
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].id.as_str(), "0100000000010000");
        assert_eq!(entries[0].version.as_deref(), Some("1.2.0"));
        assert_eq!(entries[1].version.as_deref(), Some("65536"));
        assert_eq!(entries[2].version, None);
    }

    #[test]
    fn test_skips_blank_and_malformed() {
        let entries = parse_manifest("\n  \nbogus|1\n0100000000010000|\r\n");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].version, None);
    }

    #[test]
    fn test_keeps_duplicates_in_order() {
        let entries = parse_manifest("0100000000010800|1\n0100000000010800|1\n");
        assert_eq!(entries.len(), 2);
    }
}
