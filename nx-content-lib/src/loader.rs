//! Catalog loading: fetch every source, parse, merge.

use nx_content_catalog::{Catalog, MergeOptions};
use nx_content_core::ContentRole;
use nx_content_sources::{DataSources, RecentItem, SourceFetcher};

use crate::error::LoadError;
use crate::settings::Preferences;

/// Fetch, parse and merge all configured sources into a fresh catalog.
///
/// Any source failing aborts the load; there are no partial catalogs.
pub async fn load_catalog(
    fetcher: &SourceFetcher,
    sources: &DataSources,
    options: MergeOptions,
) -> Result<Catalog, LoadError> {
    let raw = fetcher.fetch_all(sources).await?;
    let parsed = raw.parse()?;
    log::debug!(
        "Parsed {} manifest rows, {} indexed titles, {} metadata entries, {} history bases",
        parsed.manifest.len(),
        parsed.title_index.len(),
        parsed.metadata.len(),
        parsed.version_history.len()
    );

    let catalog = Catalog::build(&parsed, options);
    if catalog.is_empty() {
        return Err(LoadError::Empty(sources.manifest.to_string()));
    }

    let report = catalog.report();
    log::info!(
        "Loaded {} records ({} duplicates dropped, {} from version history)",
        catalog.len(),
        report.duplicates_dropped,
        report.synthesized
    );
    if report.unnamed > 0 {
        log::debug!("{} records have no display name", report.unnamed);
    }
    Ok(catalog)
}

/// Load using the data sources and merge options from `prefs`.
pub async fn load_with_preferences(
    fetcher: &SourceFetcher,
    prefs: &Preferences,
) -> Result<Catalog, LoadError> {
    load_catalog(fetcher, &prefs.data_sources(), prefs.merge_options()).await
}

/// Recently added content, one list per feed.
#[derive(Debug, Clone, Default)]
pub struct RecentContent {
    pub base: Vec<RecentItem>,
    pub updates: Vec<RecentItem>,
    pub addons: Vec<RecentItem>,
}

impl RecentContent {
    pub fn for_role(&self, role: ContentRole) -> &[RecentItem] {
        match role {
            ContentRole::Base => &self.base,
            ContentRole::Update => &self.updates,
            ContentRole::Addon => &self.addons,
        }
    }

    /// All feeds together, newest first.
    pub fn merged(&self) -> Vec<&RecentItem> {
        let mut all: Vec<&RecentItem> = self
            .base
            .iter()
            .chain(&self.updates)
            .chain(&self.addons)
            .collect();
        // Undated items last
        all.sort_by(|a, b| match (a.published, b.published) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        all
    }
}

async fn fetch_role(
    fetcher: &SourceFetcher,
    prefs: &Preferences,
    role: ContentRole,
) -> Vec<RecentItem> {
    match prefs.feed_location(role) {
        Some(location) => fetcher.fetch_feed(&location).await,
        None => Vec::new(),
    }
}

/// Fetch the configured feeds concurrently. A feed that fails or is
/// disabled comes back empty.
pub async fn fetch_recent(fetcher: &SourceFetcher, prefs: &Preferences) -> RecentContent {
    let (base, updates, addons) = tokio::join!(
        fetch_role(fetcher, prefs, ContentRole::Base),
        fetch_role(fetcher, prefs, ContentRole::Update),
        fetch_role(fetcher, prefs, ContentRole::Addon),
    );
    log::debug!(
        "Feeds: {} base, {} updates, {} add-ons",
        base.len(),
        updates.len(),
        addons.len()
    );
    RecentContent {
        base,
        updates,
        addons,
    }
}
