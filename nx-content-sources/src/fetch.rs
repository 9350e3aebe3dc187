//! Retrieval of the raw snapshots the catalog is built from.
//!
//! Every configured source is fetched concurrently and the results are only
//! handed back once all of them have arrived. A single failure fails the
//! whole load; there is no partial result and no retry.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::SourceError;
use crate::manifest::{self, ManifestEntry};
use crate::metadata::{self, MetadataMap};
use crate::rss::{self, RecentItem};
use crate::title_index::TitleIndex;
use crate::version_history::VersionHistory;

pub const DEFAULT_MANIFEST_URL: &str =
    "https://raw.githubusercontent.com/ghost-land/NX-Missing/refs/heads/main/data/working.txt";
pub const DEFAULT_TITLE_INDEX_URL: &str =
    "https://raw.githubusercontent.com/ghost-land/NX-Missing/refs/heads/main/data/titles_db.txt";
pub const DEFAULT_METADATA_URL: &str =
    "https://raw.githubusercontent.com/ghost-land/NX-Missing/refs/heads/main/data/working.json";
pub const DEFAULT_VERSION_HISTORY_URL: &str =
    "https://raw.githubusercontent.com/blawar/titledb/master/versions.json";

/// File names used when every source is read from one local directory.
pub const OFFLINE_MANIFEST_FILE: &str = "working.txt";
pub const OFFLINE_TITLE_INDEX_FILE: &str = "titles_db.txt";
pub const OFFLINE_METADATA_FILE: &str = "working.json";
pub const OFFLINE_VERSION_HISTORY_FILE: &str = "versions.json";

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Where a snapshot comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    Url(String),
    Path(PathBuf),
}

impl SourceLocation {
    /// `http://` and `https://` strings are URLs, anything else is a path.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Self::Url(raw.to_string())
        } else {
            Self::Path(PathBuf::from(raw))
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => f.write_str(url),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// The set of snapshots that make up one catalog load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSources {
    pub manifest: SourceLocation,
    pub title_index: SourceLocation,
    pub metadata: Option<SourceLocation>,
    pub version_history: Option<SourceLocation>,
}

impl Default for DataSources {
    fn default() -> Self {
        Self {
            manifest: SourceLocation::Url(DEFAULT_MANIFEST_URL.to_string()),
            title_index: SourceLocation::Url(DEFAULT_TITLE_INDEX_URL.to_string()),
            metadata: Some(SourceLocation::Url(DEFAULT_METADATA_URL.to_string())),
            version_history: Some(SourceLocation::Url(DEFAULT_VERSION_HISTORY_URL.to_string())),
        }
    }
}

impl DataSources {
    /// Read every source from `dir`. The manifest and title index are
    /// required; the JSON maps are used only if present.
    pub fn from_dir(dir: &Path) -> Self {
        let optional = |name: &str| {
            let path = dir.join(name);
            path.is_file().then_some(SourceLocation::Path(path))
        };
        Self {
            manifest: SourceLocation::Path(dir.join(OFFLINE_MANIFEST_FILE)),
            title_index: SourceLocation::Path(dir.join(OFFLINE_TITLE_INDEX_FILE)),
            metadata: optional(OFFLINE_METADATA_FILE),
            version_history: optional(OFFLINE_VERSION_HISTORY_FILE),
        }
    }
}

/// Unparsed snapshot contents, as fetched.
#[derive(Debug, Clone, Default)]
pub struct RawSnapshots {
    pub manifest: String,
    pub title_index: String,
    pub metadata: Option<String>,
    pub version_history: Option<String>,
}

/// Every source parsed into its lookup structure.
#[derive(Debug, Clone, Default)]
pub struct ParsedSources {
    pub manifest: Vec<ManifestEntry>,
    pub title_index: TitleIndex,
    pub metadata: MetadataMap,
    pub version_history: VersionHistory,
}

impl RawSnapshots {
    /// Parse all snapshots. Malformed lines are skipped, but a JSON map that
    /// doesn't parse at all is an error.
    pub fn parse(&self) -> Result<ParsedSources, SourceError> {
        let metadata = match &self.metadata {
            Some(text) => metadata::parse_metadata(text)?,
            None => MetadataMap::new(),
        };
        let version_history = match &self.version_history {
            Some(text) => VersionHistory::parse(text)?,
            None => VersionHistory::default(),
        };
        Ok(ParsedSources {
            manifest: manifest::parse_manifest(&self.manifest),
            title_index: TitleIndex::parse(&self.title_index),
            metadata,
            version_history,
        })
    }
}

/// Fetches snapshots over HTTP or from the local filesystem.
#[derive(Debug, Clone)]
pub struct SourceFetcher {
    http: reqwest::Client,
}

impl SourceFetcher {
    pub fn new() -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(concat!("nx-content/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http })
    }

    /// Wrap an existing client, sharing its connection pool.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.http
    }

    /// Fetch one snapshot as text.
    pub async fn fetch_text(&self, location: &SourceLocation) -> Result<String, SourceError> {
        log::debug!("Fetching {location}");
        match location {
            SourceLocation::Path(path) => Ok(tokio::fs::read_to_string(path).await?),
            SourceLocation::Url(url) => {
                let resp = self.http.get(url).send().await?;
                let status = resp.status();
                if !status.is_success() {
                    return Err(SourceError::Status {
                        url: url.clone(),
                        status: status.as_u16(),
                    });
                }
                Ok(resp.text().await?)
            }
        }
    }

    async fn fetch_optional(
        &self,
        location: Option<&SourceLocation>,
    ) -> Result<Option<String>, SourceError> {
        match location {
            Some(loc) => self.fetch_text(loc).await.map(Some),
            None => Ok(None),
        }
    }

    /// Fetch every configured source concurrently.
    pub async fn fetch_all(&self, sources: &DataSources) -> Result<RawSnapshots, SourceError> {
        let (manifest, title_index, metadata, version_history) = tokio::try_join!(
            self.fetch_text(&sources.manifest),
            self.fetch_text(&sources.title_index),
            self.fetch_optional(sources.metadata.as_ref()),
            self.fetch_optional(sources.version_history.as_ref()),
        )?;
        log::debug!(
            "Fetched snapshots: manifest {} bytes, title index {} bytes",
            manifest.len(),
            title_index.len()
        );
        Ok(RawSnapshots {
            manifest,
            title_index,
            metadata,
            version_history,
        })
    }

    /// Fetch and parse one RSS feed. Failures are logged and produce an
    /// empty list.
    pub async fn fetch_feed(&self, location: &SourceLocation) -> Vec<RecentItem> {
        let text = match self.fetch_text(location).await {
            Ok(text) => text,
            Err(e) => {
                log::warn!("Failed to fetch feed {location}: {e}");
                return Vec::new();
            }
        };
        match rss::parse_feed(&text) {
            Ok(items) => items,
            Err(e) => {
                log::warn!("Failed to parse feed {location}: {e}");
                Vec::new()
            }
        }
    }
}
