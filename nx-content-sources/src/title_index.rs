//! Parser and lookup for the dated title index: `id|date|name|size` lines.

use std::collections::HashMap;

use nx_content_core::TitleId;

/// One title-index row. Every column after the identifier is optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleIndexEntry {
    pub id: TitleId,
    pub date: Option<String>,
    pub name: Option<String>,
    pub size: Option<u64>,
}

/// Title index keyed by identifier.
#[derive(Debug, Clone, Default)]
pub struct TitleIndex {
    by_id: HashMap<TitleId, TitleIndexEntry>,
}

impl TitleIndex {
    /// Build an index from parsed rows.
    ///
    /// Duplicate identifiers keep the first row; later ones are ignored.
    pub fn from_entries(entries: Vec<TitleIndexEntry>) -> Self {
        let mut by_id = HashMap::with_capacity(entries.len());
        for entry in entries {
            by_id.entry(entry.id.clone()).or_insert(entry);
        }
        Self { by_id }
    }

    pub fn parse(content: &str) -> Self {
        Self::from_entries(parse_title_index(content))
    }

    pub fn get(&self, id: &TitleId) -> Option<&TitleIndexEntry> {
        self.by_id.get(id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

fn non_empty(field: Option<&str>) -> Option<String> {
    field
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Parse title-index text into rows, skipping blank and malformed lines.
pub fn parse_title_index(content: &str) -> Vec<TitleIndexEntry> {
    let mut entries = Vec::new();

    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut fields = line.split('|');
        let id = match TitleId::parse(fields.next().unwrap_or("")) {
            Ok(id) => id,
            Err(e) => {
                log::warn!("Skipping title index line {}: {e}", line_no + 1);
                continue;
            }
        };

        let date = non_empty(fields.next());
        let name = non_empty(fields.next());
        let size = fields
            .next()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|&s| s > 0);

        entries.push(TitleIndexEntry {
            id,
            date,
            name,
            size,
        });
    }

    log::debug!("Parsed {} title index rows", entries.len());
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tid(s: &str) -> TitleId {
        TitleId::parse(s).unwrap()
    }

    #[test]
    fn test_parse_full_row() {
        let index = TitleIndex::parse("0100000000010000|2023-05-01|Example Game|4000000000\n");
        let entry = index.get(&tid("0100000000010000")).unwrap();
        assert_eq!(entry.date.as_deref(), Some("2023-05-01"));
        assert_eq!(entry.name.as_deref(), Some("Example Game"));
        assert_eq!(entry.size, Some(4_000_000_000));
    }

    #[test]
    fn test_missing_and_bad_columns() {
        let index = TitleIndex::parse("0100000000020000||Other|n/a\n0100000000030000\n");
        let a = index.get(&tid("0100000000020000")).unwrap();
        assert_eq!(a.date, None);
        assert_eq!(a.name.as_deref(), Some("Other"));
        assert_eq!(a.size, None);
        let b = index.get(&tid("0100000000030000")).unwrap();
        assert_eq!(b.name, None);
    }

    #[test]
    fn test_duplicate_keeps_first() {
        let index = TitleIndex::parse(
            "0100000000010000|2020-01-01|First|1\n0100000000010000|2021-01-01|Second|2\n",
        );
        assert_eq!(index.len(), 1);
        assert_eq!(
            index.get(&tid("0100000000010000")).unwrap().name.as_deref(),
            Some("First")
        );
    }

    #[test]
    fn test_lowercase_ids_normalised() {
        let index = TitleIndex::parse("0100abc000010000|2020-01-01|Lower|5\n");
        assert!(index.get(&tid("0100ABC000010000")).is_some());
    }
}
