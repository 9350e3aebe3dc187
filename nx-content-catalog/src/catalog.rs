use nx_content_core::{ContentRecord, TitleId};
use nx_content_sources::ParsedSources;

use crate::merge::{self, MergeOptions, MergeReport};
use crate::related::{self, RelatedContent};
use crate::search::{self, SearchQuery};
use crate::sort::{self, SortSpec};
use crate::stats::CatalogStats;

/// The merged, read-only record set.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<ContentRecord>,
    report: MergeReport,
}

impl Catalog {
    /// Merge parsed sources into a catalog.
    pub fn build(sources: &ParsedSources, options: MergeOptions) -> Self {
        let out = merge::merge(sources, options);
        Self {
            records: out.records,
            report: out.report,
        }
    }

    /// Wrap already-merged records.
    pub fn from_records(records: Vec<ContentRecord>) -> Self {
        Self {
            records,
            report: MergeReport::default(),
        }
    }

    pub fn records(&self) -> &[ContentRecord] {
        &self.records
    }

    pub fn report(&self) -> &MergeReport {
        &self.report
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records for an identifier, in merge order.
    pub fn by_id<'a>(&'a self, id: &'a TitleId) -> impl Iterator<Item = &'a ContentRecord> + 'a {
        self.records.iter().filter(move |r| &r.identifier == id)
    }

    /// The first record for an identifier.
    pub fn get(&self, id: &TitleId) -> Option<&ContentRecord> {
        self.records.iter().find(|r| &r.identifier == id)
    }

    pub fn by_instance_key(&self, key: &str) -> Option<&ContentRecord> {
        self.records.iter().find(|r| r.instance_key == key)
    }

    /// Search, then sort.
    pub fn list(&self, query: &SearchQuery, spec: SortSpec) -> Vec<&ContentRecord> {
        let mut hits = search::search(&self.records, query);
        sort::sort_records(&mut hits, spec);
        hits
    }

    pub fn related(&self, id: &TitleId) -> RelatedContent<'_> {
        related::related(&self.records, id)
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats::from_records(&self.records)
    }
}
