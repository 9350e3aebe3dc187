//! Extended per-title metadata from the public title API.
//!
//! Several mirrors serve the same API. Each is tried in order, a few times
//! with a fixed pause between attempts, and the first good answer is cached
//! on disk. A title that can't be looked up only affects its own detail
//! view: the caller gets [`SourceError::DetailsUnavailable`].

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use nx_content_core::TitleId;

use crate::cache::DetailsCache;
use crate::error::SourceError;

pub const DEFAULT_API_BASE_URLS: &[&str] = &[
    "https://api.nlib.cc",
    "https://api-nlib.vercel.app",
    "https://nlib-api.vercel.app",
];
pub const DEFAULT_STATS_URL: &str = "https://stats.ghostland.at";

/// Normalised title details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TitleDetails {
    pub id: String,
    pub name: Option<String>,
    pub publisher: Option<String>,
    pub description: Option<String>,
    pub size: Option<u64>,
    pub version: Option<String>,
    pub release_date: Option<String>,
    pub rating: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub screenshots: Vec<String>,
}

impl TitleDetails {
    /// Build details from an API response, tolerating missing or oddly typed
    /// fields.
    pub fn from_json(id: &TitleId, raw: &Value) -> Self {
        let text = |key: &str| -> Option<String> {
            match raw.get(key)? {
                Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            }
        };
        let list = |key: &str| -> Vec<String> {
            match raw.get(key) {
                Some(Value::Array(items)) => items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect(),
                _ => Vec::new(),
            }
        };

        Self {
            id: id.to_string(),
            name: text("name"),
            publisher: text("publisher"),
            description: text("description"),
            size: raw.get("size").and_then(Value::as_u64),
            version: text("version"),
            release_date: text("release_date").or_else(|| text("releaseDate")),
            rating: text("rating"),
            categories: list("categories"),
            languages: list("languages"),
            screenshots: list("screenshots"),
        }
    }
}

/// Endpoints and retry policy for the details client.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailsConfig {
    pub base_urls: Vec<String>,
    pub stats_url: String,
    pub timeout: Duration,
    pub retry_delay: Duration,
    /// Extra attempts per base URL after the first.
    pub max_retries: u32,
}

impl Default for DetailsConfig {
    fn default() -> Self {
        Self {
            base_urls: DEFAULT_API_BASE_URLS.iter().map(|s| s.to_string()).collect(),
            stats_url: DEFAULT_STATS_URL.to_string(),
            timeout: Duration::from_secs(5),
            retry_delay: Duration::from_secs(1),
            max_retries: 2,
        }
    }
}

#[derive(Deserialize)]
struct StatsResponse {
    total_downloads: u64,
}

/// HTTP client for title details and download statistics.
pub struct DetailsClient {
    http: reqwest::Client,
    config: DetailsConfig,
    cache: Option<DetailsCache>,
}

impl DetailsClient {
    pub fn new(config: DetailsConfig) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            http,
            config,
            cache: None,
        })
    }

    /// Serve and store results through an on-disk cache.
    pub fn with_cache(mut self, cache: DetailsCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn config(&self) -> &DetailsConfig {
        &self.config
    }

    /// Look up details for one title.
    pub async fn fetch_details(&self, id: &TitleId) -> Result<TitleDetails, SourceError> {
        if let Some(details) = self.cache.as_ref().and_then(|c| c.get(id)) {
            log::debug!("Details cache hit for {id}");
            return Ok(details);
        }

        log::debug!("Fetching details for {id}");
        for base in &self.config.base_urls {
            let url = format!("{}/nx/{id}", base.trim_end_matches('/'));
            for attempt in 0..=self.config.max_retries {
                if attempt > 0 {
                    tokio::time::sleep(self.config.retry_delay).await;
                }
                match self.get_json(&url).await {
                    Ok(raw) => {
                        let details = TitleDetails::from_json(id, &raw);
                        self.store(id, &details);
                        return Ok(details);
                    }
                    Err(e) => {
                        log::warn!("Attempt {} failed for {base}: {e}", attempt + 1);
                    }
                }
            }
        }

        log::error!("All detail endpoints failed for {id}");
        Err(SourceError::DetailsUnavailable(id.to_string()))
    }

    /// Total download count for a title, or `None` on any failure.
    pub async fn download_count(&self, id: &TitleId) -> Option<u64> {
        let url = format!("{}/{id}/json", self.config.stats_url.trim_end_matches('/'));
        let raw = match self.get_json(&url).await {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("Failed to fetch download stats for {id}: {e}");
                return None;
            }
        };
        serde_json::from_value::<StatsResponse>(raw)
            .map(|s| s.total_downloads)
            .ok()
    }

    async fn get_json(&self, url: &str) -> Result<Value, SourceError> {
        let resp = self
            .http
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(resp.json().await?)
    }

    fn store(&self, id: &TitleId, details: &TitleDetails) {
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.put(id, details) {
                log::warn!("Failed to cache details for {id}: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tid(s: &str) -> TitleId {
        TitleId::parse(s).unwrap()
    }

    #[test]
    fn test_from_json_normalises() {
        let raw = serde_json::json!({
            "name": "Example Game",
            "publisher": "",
            "description": "A game.",
            "size": 4000000000u64,
            "version": 131072,
            "releaseDate": "2023-05-01",
            "rating": 12,
            "categories": ["Action", 5],
            "languages": "en",
            "screenshots": ["a.jpg", "b.jpg"]
        });
        let details = TitleDetails::from_json(&tid("0100000000010000"), &raw);
        assert_eq!(details.id, "0100000000010000");
        assert_eq!(details.name.as_deref(), Some("Example Game"));
        assert_eq!(details.publisher, None);
        assert_eq!(details.size, Some(4_000_000_000));
        assert_eq!(details.version.as_deref(), Some("131072"));
        assert_eq!(details.release_date.as_deref(), Some("2023-05-01"));
        assert_eq!(details.rating.as_deref(), Some("12"));
        assert_eq!(details.categories, vec!["Action"]);
        assert!(details.languages.is_empty());
        assert_eq!(details.screenshots.len(), 2);
    }

    #[tokio::test]
    async fn test_no_endpoints_is_unavailable() {
        let config = DetailsConfig {
            base_urls: Vec::new(),
            ..Default::default()
        };
        let client = DetailsClient::new(config).unwrap();
        let err = client
            .fetch_details(&tid("0100000000010000"))
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::DetailsUnavailable(ref id) if id == "0100000000010000"));
    }

    #[tokio::test]
    async fn test_cache_hit_skips_network() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DetailsCache::new(dir.path().to_path_buf());
        let id = tid("0100000000010000");
        let stored = TitleDetails {
            id: id.to_string(),
            name: Some("Cached".into()),
            ..Default::default()
        };
        cache.put(&id, &stored).unwrap();

        let config = DetailsConfig {
            base_urls: Vec::new(),
            ..Default::default()
        };
        let client = DetailsClient::new(config).unwrap().with_cache(cache);
        let details = client.fetch_details(&id).await.unwrap();
        assert_eq!(details.name.as_deref(), Some("Cached"));
    }
}
