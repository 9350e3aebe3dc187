//! Catalog-wide counters and random title selection.

use rand::Rng;
use rand::seq::IteratorRandom;

use nx_content_core::{ContentRecord, ContentRole};

/// Summary counts over a record set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogStats {
    pub total: usize,
    pub base: usize,
    pub updates: usize,
    pub addons: usize,
    pub with_date: usize,
    pub without_date: usize,
    pub synthesized: usize,
    /// Sum of every known size.
    pub total_size: u64,
}

impl CatalogStats {
    pub fn from_records(records: &[ContentRecord]) -> Self {
        let mut stats = Self::default();
        for record in records {
            stats.total += 1;
            match record.role() {
                ContentRole::Base => stats.base += 1,
                ContentRole::Update => stats.updates += 1,
                ContentRole::Addon => stats.addons += 1,
            }
            if record.has_valid_release_date() {
                stats.with_date += 1;
            } else {
                stats.without_date += 1;
            }
            if record.synthesized {
                stats.synthesized += 1;
            }
            stats.total_size += record.known_size().unwrap_or(0);
        }
        stats
    }

    pub fn count_for(&self, role: ContentRole) -> usize {
        match role {
            ContentRole::Base => self.base,
            ContentRole::Update => self.updates,
            ContentRole::Addon => self.addons,
        }
    }
}

/// Pick a base title uniformly at random.
pub fn random_base_title<'a, R: Rng + ?Sized>(
    records: &'a [ContentRecord],
    rng: &mut R,
) -> Option<&'a ContentRecord> {
    records
        .iter()
        .filter(|r| r.role() == ContentRole::Base)
        .choose(rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nx_content_core::TitleId;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn record(id: &str, date: Option<&str>, size: Option<u64>) -> ContentRecord {
        let mut r = ContentRecord::new(TitleId::parse(id).unwrap(), None);
        r.release_date = date.map(str::to_string);
        r.size_bytes = size;
        r
    }

    #[test]
    fn test_counts() {
        let mut synth = record("0100000000010800", Some("2023-01-01"), None);
        synth.synthesized = true;
        let records = vec![
            record("0100000000010000", Some("2020-01-01"), Some(100)),
            synth,
            record("0100000000011001", None, Some(0)),
            record("0100000000020000", Some("1990-01-01"), Some(50)),
        ];
        let stats = CatalogStats::from_records(&records);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.base, 2);
        assert_eq!(stats.count_for(ContentRole::Update), 1);
        assert_eq!(stats.addons, 1);
        assert_eq!(stats.with_date, 2);
        assert_eq!(stats.without_date, 2);
        assert_eq!(stats.synthesized, 1);
        assert_eq!(stats.total_size, 150);
    }

    #[test]
    fn test_random_base_only() {
        let records = vec![
            record("0100000000010800", None, None),
            record("0100000000020000", None, None),
            record("0100000000011001", None, None),
        ];
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10 {
            let pick = random_base_title(&records, &mut rng).unwrap();
            assert_eq!(pick.identifier.as_str(), "0100000000020000");
        }
        assert!(random_base_title(&records[..1], &mut rng).is_none());
    }
}
