//! Version-history map: base identifier → {encoded version → release date}.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

use nx_content_core::{EncodedVersion, TitleId, base_title_id};

use crate::error::SourceError;

/// Release dates of every known update version, grouped by base title.
#[derive(Debug, Clone, Default)]
pub struct VersionHistory {
    by_base: HashMap<TitleId, BTreeMap<EncodedVersion, String>>,
}

impl VersionHistory {
    /// Parse the version-history JSON document.
    ///
    /// Keys are canonicalised to base identifiers. Version keys that aren't
    /// decimal integers and dates that aren't strings are skipped.
    pub fn parse(content: &str) -> Result<Self, SourceError> {
        let root: Value = serde_json::from_str(content)?;
        let Value::Object(map) = root else {
            return Err(SourceError::invalid_data(
                "version history is not a JSON object",
            ));
        };

        let mut history = Self::default();
        for (key, versions) in &map {
            let Some(base) = TitleId::parse(key).ok().as_ref().and_then(base_title_id) else {
                log::warn!("Skipping version history for unrecognised id '{key}'");
                continue;
            };
            let Value::Object(versions) = versions else {
                continue;
            };
            for (version, date) in versions {
                let (Ok(encoded), Value::String(date)) =
                    (version.trim().parse::<EncodedVersion>(), date)
                else {
                    continue;
                };
                history.insert(base.clone(), encoded, date.trim().to_string());
            }
        }

        log::debug!("Parsed version history for {} titles", history.len());
        Ok(history)
    }

    /// Record a version date. An existing entry is kept.
    pub fn insert(&mut self, base: TitleId, version: EncodedVersion, date: String) {
        self.by_base
            .entry(base)
            .or_default()
            .entry(version)
            .or_insert(date);
    }

    /// Release date of `version` for the given base title.
    pub fn lookup(&self, base: &TitleId, version: EncodedVersion) -> Option<&str> {
        self.by_base.get(base)?.get(&version).map(String::as_str)
    }

    /// All known versions of a base title, oldest first.
    pub fn versions(&self, base: &TitleId) -> Option<&BTreeMap<EncodedVersion, String>> {
        self.by_base.get(base)
    }

    /// Base titles with history, in identifier order.
    pub fn bases(&self) -> Vec<&TitleId> {
        let mut bases: Vec<&TitleId> = self.by_base.keys().collect();
        bases.sort();
        bases
    }

    pub fn len(&self) -> usize {
        self.by_base.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_base.is_empty()
    }
}
