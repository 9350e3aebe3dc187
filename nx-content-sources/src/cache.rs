use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use nx_content_core::TitleId;

use crate::details::TitleDetails;
use crate::error::SourceError;

/// Cache format version. Entries written with a different version are
/// treated as missing.
const CACHE_VERSION: u32 = 1;

/// How long a cached lookup stays fresh.
pub const DEFAULT_TTL_HOURS: i64 = 24;

#[derive(Debug, Serialize, Deserialize)]
struct StoredDetails {
    #[serde(default)]
    version: u32,
    fetched_at: DateTime<Utc>,
    details: TitleDetails,
}

/// Information about a cached lookup for display purposes.
#[derive(Debug, Clone)]
pub struct DetailsCacheEntry {
    pub title_id: String,
    pub name: Option<String>,
    pub file_size: u64,
    pub fetched_at: DateTime<Utc>,
    pub expired: bool,
}

/// On-disk cache of title details, one JSON file per identifier.
#[derive(Debug, Clone)]
pub struct DetailsCache {
    dir: PathBuf,
    ttl: TimeDelta,
}

/// Get the default cache directory for title details.
pub fn cache_dir() -> Result<PathBuf, SourceError> {
    let base =
        dirs::cache_dir().ok_or_else(|| SourceError::cache("Could not determine cache directory"))?;
    Ok(base.join("nx-content").join("details"))
}

impl DetailsCache {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            ttl: TimeDelta::hours(DEFAULT_TTL_HOURS),
        }
    }

    /// Cache in the user's standard cache directory.
    pub fn open_default() -> Result<Self, SourceError> {
        Ok(Self::new(cache_dir()?))
    }

    pub fn with_ttl(mut self, ttl: TimeDelta) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, id: &TitleId) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    fn read(path: &Path) -> Result<StoredDetails, SourceError> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Fresh cached details for `id`, if any.
    pub fn get(&self, id: &TitleId) -> Option<TitleDetails> {
        self.get_at(id, Utc::now())
    }

    /// Like [`get`](Self::get), judging freshness against `now`.
    pub fn get_at(&self, id: &TitleId, now: DateTime<Utc>) -> Option<TitleDetails> {
        let path = self.entry_path(id);
        if !path.exists() {
            return None;
        }
        let stored = match Self::read(&path) {
            Ok(stored) => stored,
            Err(e) => {
                log::debug!("Ignoring unreadable cache entry {}: {e}", path.display());
                return None;
            }
        };
        if stored.version != CACHE_VERSION || now - stored.fetched_at > self.ttl {
            return None;
        }
        Some(stored.details)
    }

    /// Store details for `id`, stamped with the current time.
    pub fn put(&self, id: &TitleId, details: &TitleDetails) -> Result<(), SourceError> {
        self.put_at(id, details, Utc::now())
    }

    pub fn put_at(
        &self,
        id: &TitleId,
        details: &TitleDetails,
        fetched_at: DateTime<Utc>,
    ) -> Result<(), SourceError> {
        fs::create_dir_all(&self.dir)?;
        let stored = StoredDetails {
            version: CACHE_VERSION,
            fetched_at,
            details: details.clone(),
        };
        fs::write(self.entry_path(id), serde_json::to_string_pretty(&stored)?)?;
        Ok(())
    }

    /// List all cached lookups, sorted by identifier. Unreadable files are
    /// skipped.
    pub fn list(&self) -> Result<Vec<DetailsCacheEntry>, SourceError> {
        let mut entries = Vec::new();
        if !self.dir.exists() {
            return Ok(entries);
        }

        let now = Utc::now();
        for entry in fs::read_dir(&self.dir)?.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Ok(stored) = Self::read(&path) else {
                continue;
            };
            let file_size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            entries.push(DetailsCacheEntry {
                title_id: stored.details.id.clone(),
                name: stored.details.name.clone(),
                file_size,
                fetched_at: stored.fetched_at,
                expired: stored.version != CACHE_VERSION || now - stored.fetched_at > self.ttl,
            });
        }

        entries.sort_by(|a, b| a.title_id.cmp(&b.title_id));
        Ok(entries)
    }

    /// Delete every cached file. Returns the number of bytes freed.
    pub fn clear(&self) -> Result<u64, SourceError> {
        let mut total_size = 0u64;
        if !self.dir.exists() {
            return Ok(0);
        }

        for entry in fs::read_dir(&self.dir)?.flatten() {
            let path = entry.path();
            if path.is_file() {
                if let Ok(meta) = fs::metadata(&path) {
                    total_size += meta.len();
                }
                fs::remove_file(&path)?;
            }
        }
        Ok(total_size)
    }
}
