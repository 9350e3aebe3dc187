//! Reconciliation of the parsed sources into one record set.
//!
//! Manifest rows drive the merge: every row becomes at most one record,
//! keyed by its instance key (built from the row's own version, not the
//! resolved one), with name, size and date filled in from the
//! other sources by fixed precedence. The first row for a key wins.

use std::collections::HashSet;

use indexmap::IndexMap;

use nx_content_core::record::instance_key;
use nx_content_core::{
    ContentRecord, ContentRole, TitleId, UNKNOWN_TITLE, base_title_id, encode_version,
};
use nx_content_sources::{ParsedSources, TitleIndexEntry};

/// Knobs for [`merge`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOptions {
    /// Add update records straight from version history for catalogued base
    /// titles whose update has no manifest row.
    pub synthesize_history: bool,
}

/// Counters describing one merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub rows_read: usize,
    pub duplicates_dropped: usize,
    pub synthesized: usize,
    pub unnamed: usize,
}

/// Merged records, in first-insertion order, plus the report.
#[derive(Debug, Clone, Default)]
pub struct MergeOutput {
    pub records: Vec<ContentRecord>,
    pub report: MergeReport,
}

/// A source string that actually names something.
fn usable_name(name: Option<&str>) -> Option<String> {
    let name = name?.trim();
    (!name.is_empty() && name != UNKNOWN_TITLE).then(|| name.to_string())
}

struct Resolver<'a> {
    sources: &'a ParsedSources,
}

impl<'a> Resolver<'a> {
    fn title(&self, id: &TitleId) -> Option<&'a TitleIndexEntry> {
        self.sources.title_index.get(id)
    }

    /// Metadata name, then title-index name.
    fn name(&self, id: &TitleId) -> Option<String> {
        let meta = self.sources.metadata.get(id);
        usable_name(meta.and_then(|m| m.name.as_deref()))
            .or_else(|| usable_name(self.title(id).and_then(|t| t.name.as_deref())))
    }

    /// Title-index size, then metadata size. Zero counts as unknown.
    fn size(&self, id: &TitleId) -> Option<u64> {
        self.title(id)
            .and_then(|t| t.size)
            .filter(|&s| s > 0)
            .or_else(|| {
                self.sources
                    .metadata
                    .get(id)
                    .and_then(|m| m.size)
                    .filter(|&s| s > 0)
            })
    }

    fn version(&self, id: &TitleId, row_version: Option<&str>) -> Option<String> {
        row_version
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .or_else(|| {
                self.sources
                    .metadata
                    .get(id)
                    .and_then(|m| m.version.clone())
            })
    }

    fn title_date(&self, id: &TitleId) -> Option<String> {
        self.title(id).and_then(|t| t.date.clone())
    }

    fn history_date(&self, id: &TitleId, version: Option<&str>) -> Option<String> {
        let encoded = encode_version(version?).ok()?;
        let base = base_title_id(id)?;
        self.sources
            .version_history
            .lookup(&base, encoded)
            .map(str::to_string)
    }

    fn release_date(&self, id: &TitleId, version: Option<&str>) -> Option<String> {
        match id.role() {
            ContentRole::Base | ContentRole::Addon => self.title_date(id),
            ContentRole::Update => self
                .history_date(id, version)
                .or_else(|| self.title_date(id)),
        }
    }
}

/// Merge parsed sources into the catalog's record set.
pub fn merge(sources: &ParsedSources, options: MergeOptions) -> MergeOutput {
    let resolver = Resolver { sources };
    let mut records: IndexMap<String, ContentRecord> =
        IndexMap::with_capacity(sources.manifest.len());
    let mut report = MergeReport::default();

    for row in &sources.manifest {
        report.rows_read += 1;
        let key = instance_key(&row.id, row.version.as_deref());
        if records.contains_key(&key) {
            report.duplicates_dropped += 1;
            continue;
        }
        let version = resolver.version(&row.id, row.version.as_deref());
        let mut record = ContentRecord::new(row.id.clone(), version);
        record.instance_key = key;

        record.display_name = resolver.name(&row.id);
        record.size_bytes = resolver.size(&row.id);
        record.release_date = resolver.release_date(&row.id, record.version.as_deref());
        records.insert(record.instance_key.clone(), record);
    }

    if options.synthesize_history {
        report.synthesized = synthesize_updates(&resolver, &mut records);
    }

    report.unnamed = records
        .values()
        .filter(|r| r.display_name.is_none())
        .count();

    log::debug!(
        "Merged {} rows into {} records ({} duplicates, {} synthesized)",
        report.rows_read,
        records.len(),
        report.duplicates_dropped,
        report.synthesized
    );

    MergeOutput {
        records: records.into_values().collect(),
        report,
    }
}

fn synthesize_updates(
    resolver: &Resolver<'_>,
    records: &mut IndexMap<String, ContentRecord>,
) -> usize {
    let manifest_ids: HashSet<&TitleId> = resolver.sources.manifest.iter().map(|r| &r.id).collect();
    let history = &resolver.sources.version_history;
    let mut added = 0;

    for base in history.bases() {
        let Some(update_id) = base.update_id() else {
            continue;
        };
        if manifest_ids.contains(&update_id) {
            continue;
        }
        let Some(versions) = history.versions(base) else {
            continue;
        };

        let name = resolver.name(&update_id);
        for (version, date) in versions {
            let mut record = ContentRecord::new(update_id.clone(), Some(version.to_string()));
            if records.contains_key(&record.instance_key) {
                continue;
            }
            record.display_name = name.clone();
            record.release_date = Some(date.clone()).filter(|d| !d.is_empty());
            record.synthesized = true;
            records.insert(record.instance_key.clone(), record);
            added += 1;
        }
    }
    added
}

#[cfg(test)]
#[path = "tests/merge_tests.rs"]
mod tests;
