//! Artwork URLs and the ordered fallback chain used to fetch them.
//!
//! All artwork is published under the base title, so updates and add-ons
//! resolve to their base identifier first.

use std::future::Future;

use nx_content_core::{TitleId, base_title_id};

use crate::error::SourceError;

pub const ARTWORK_BASE_URL: &str = "https://api.nlib.cc/nx";
pub const SCREENSHOT_COUNT: usize = 6;
/// Default cap on how many candidates a chain will try.
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;

/// Every artwork URL for one title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtworkUrls {
    /// Identifier the URLs were built from.
    pub asset_id: TitleId,
    pub banner: String,
    pub icon_large: String,
    pub icon_small: String,
    pub screenshots: Vec<String>,
}

impl ArtworkUrls {
    /// URLs for `id`, using its base title when that can be determined.
    pub fn for_title(id: &TitleId) -> Self {
        let asset_id = base_title_id(id).unwrap_or_else(|| id.clone());
        let root = format!("{ARTWORK_BASE_URL}/{asset_id}");
        Self {
            banner: format!("{root}/banner/720p"),
            icon_large: format!("{root}/icon/256/256"),
            icon_small: format!("{root}/icon/128/128"),
            screenshots: (1..=SCREENSHOT_COUNT)
                .map(|i| format!("{root}/screen/{i}"))
                .collect(),
            asset_id,
        }
    }

    /// Banner, falling back to the large then the small icon.
    pub fn banner_chain(&self) -> FallbackChain {
        FallbackChain::new(vec![
            self.banner.clone(),
            self.icon_large.clone(),
            self.icon_small.clone(),
        ])
    }

    /// Large icon, falling back to the small one.
    pub fn icon_chain(&self) -> FallbackChain {
        FallbackChain::new(vec![self.icon_large.clone(), self.icon_small.clone()])
    }
}

/// Ordered candidate URLs, tried until one succeeds or the attempt cap is
/// reached. An exhausted chain means "show a placeholder".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackChain {
    candidates: Vec<String>,
    max_attempts: usize,
}

impl FallbackChain {
    pub fn new(candidates: Vec<String>) -> Self {
        Self {
            candidates,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Try candidates in order with `attempt`, returning the first URL that
    /// succeeded along with its result.
    pub async fn resolve<T, F, Fut>(&self, mut attempt: F) -> Option<(String, T)>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<T, SourceError>>,
    {
        for url in self.candidates.iter().take(self.max_attempts) {
            match attempt(url.clone()).await {
                Ok(value) => return Some((url.clone(), value)),
                Err(e) => log::debug!("Artwork candidate {url} failed: {e}"),
            }
        }
        log::debug!("Artwork fallback chain exhausted");
        None
    }

    /// Download the first candidate that answers with a non-empty body.
    pub async fn fetch_first(&self, http: &reqwest::Client) -> Option<(String, Vec<u8>)> {
        self.resolve(|url| async move {
            let resp = http.get(&url).send().await?;
            let status = resp.status();
            if !status.is_success() {
                return Err(SourceError::Status {
                    url,
                    status: status.as_u16(),
                });
            }
            let bytes = resp.bytes().await?;
            if bytes.is_empty() {
                return Err(SourceError::invalid_data(format!("empty response from {url}")));
            }
            Ok(bytes.to_vec())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tid(s: &str) -> TitleId {
        TitleId::parse(s).unwrap()
    }

    #[test]
    fn test_urls_use_base_id() {
        let urls = ArtworkUrls::for_title(&tid("0100000000010800"));
        assert_eq!(urls.asset_id.as_str(), "0100000000010000");
        assert_eq!(
            urls.banner,
            "https://api.nlib.cc/nx/0100000000010000/banner/720p"
        );
        assert_eq!(
            urls.icon_small,
            "https://api.nlib.cc/nx/0100000000010000/icon/128/128"
        );
        assert_eq!(urls.screenshots.len(), SCREENSHOT_COUNT);
        assert!(urls.screenshots[5].ends_with("/screen/6"));
    }

    #[test]
    fn test_unknown_base_uses_own_id() {
        let urls = ArtworkUrls::for_title(&tid("0100000000000001"));
        assert_eq!(urls.asset_id.as_str(), "0100000000000001");
    }

    #[tokio::test]
    async fn test_resolve_first_success() {
        let chain = FallbackChain::new(vec!["a".into(), "b".into(), "c".into()]);
        let result = chain
            .resolve(|url| async move {
                if url == "b" {
                    Ok(42)
                } else {
                    Err(SourceError::invalid_data("nope"))
                }
            })
            .await;
        assert_eq!(result, Some(("b".to_string(), 42)));
    }

    #[tokio::test]
    async fn test_resolve_respects_cap() {
        let chain = FallbackChain::new(vec!["a".into(), "b".into(), "c".into()]).with_max_attempts(2);
        let mut tried = Vec::new();
        let result: Option<(String, ())> = chain
            .resolve(|url| {
                tried.push(url);
                async { Err(SourceError::invalid_data("nope")) }
            })
            .await;
        assert!(result.is_none());
        assert_eq!(tried, vec!["a", "b"]);
    }

    #[test]
    fn test_chains() {
        let urls = ArtworkUrls::for_title(&tid("0100000000010000"));
        assert_eq!(urls.banner_chain().candidates().len(), 3);
        assert_eq!(urls.icon_chain().candidates()[0], urls.icon_large);
    }
}
