pub(crate) mod artwork;
pub(crate) mod cache;
pub(crate) mod config;
pub(crate) mod list;
pub(crate) mod recent;
pub(crate) mod show;
pub(crate) mod stats;

use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use nx_content_catalog::Catalog;
use nx_content_core::dates::format_date;
use nx_content_core::util::format_size;
use nx_content_core::{ContentRecord, ContentRole};
use nx_content_lib::Preferences;
use nx_content_sources::{DataSources, SourceFetcher};

use crate::error::CliError;
use crate::spinner::Spinner;

/// Feed files looked for in `--offline-dir`.
const OFFLINE_FEEDS: [(ContentRole, &str); 3] = [
    (ContentRole::Base, "rss_feed_base.xml"),
    (ContentRole::Update, "rss_feed_updates.xml"),
    (ContentRole::Addon, "rss_feed_dlc.xml"),
];

/// Settings every command runs with.
pub(crate) struct AppContext {
    pub prefs: Preferences,
    pub offline_dir: Option<PathBuf>,
    pub quiet: bool,
}

impl AppContext {
    pub(crate) fn new(prefs: Preferences, offline_dir: Option<PathBuf>, quiet: bool) -> Self {
        Self {
            prefs,
            offline_dir,
            quiet,
        }
    }

    pub(crate) fn data_sources(&self) -> DataSources {
        match &self.offline_dir {
            Some(dir) => DataSources::from_dir(dir),
            None => self.prefs.data_sources(),
        }
    }

    /// Preferences with feeds pointed at the offline directory, if any.
    pub(crate) fn feed_preferences(&self) -> Preferences {
        let mut prefs = self.prefs.clone();
        if let Some(dir) = &self.offline_dir {
            for (role, file) in OFFLINE_FEEDS {
                let path = dir.join(file);
                let value = if path.exists() {
                    path.display().to_string()
                } else {
                    String::new()
                };
                match role {
                    ContentRole::Base => prefs.feeds.base = value,
                    ContentRole::Update => prefs.feeds.update = value,
                    ContentRole::Addon => prefs.feeds.dlc = value,
                }
            }
        }
        prefs
    }

    pub(crate) fn fetcher(&self) -> Result<SourceFetcher, CliError> {
        Ok(SourceFetcher::new()?)
    }

    /// Fetch and merge every source behind a spinner.
    pub(crate) async fn load_catalog(&self) -> Result<Catalog, CliError> {
        let fetcher = self.fetcher()?;
        let sources = self.data_sources();
        log::debug!("Manifest: {}", sources.manifest);
        log::debug!("Title index: {}", sources.title_index);

        let spinner = Spinner::start("Loading content data...", self.quiet);
        let result =
            nx_content_lib::load_catalog(&fetcher, &sources, self.prefs.merge_options()).await;
        spinner.finish();
        Ok(result?)
    }
}

pub(crate) fn role_label(role: ContentRole) -> &'static str {
    match role {
        ContentRole::Base => "Base",
        ContentRole::Update => "Update",
        ContentRole::Addon => "DLC",
    }
}

fn version_label(record: &ContentRecord) -> String {
    match record.version.as_deref() {
        Some(v) if !v.is_empty() => format!("v{v}"),
        _ => "-".to_string(),
    }
}

/// One compact line per record.
pub(crate) fn print_record_line(record: &ContentRecord) {
    log::info!(
        "  {} {:<6} {:<40} {:>10} {:>12} {}{}",
        record.identifier.if_supports_color(Stdout, |t| t.cyan()),
        role_label(record.role()),
        record.name_or_unknown(),
        version_label(record),
        format_size(record.known_size()),
        format_date(record.release_date.as_deref()),
        if record.synthesized {
            format!(" {}", "(history)".if_supports_color(Stdout, |t| t.dimmed()))
        } else {
            String::new()
        },
    );
}

/// A multi-line block per record.
pub(crate) fn print_record_banner(record: &ContentRecord) {
    log::info!(
        "{}",
        record
            .name_or_unknown()
            .if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!(
        "  {} [{}] {}",
        record.identifier.if_supports_color(Stdout, |t| t.cyan()),
        role_label(record.role()),
        version_label(record),
    );
    log::info!(
        "  Size: {}, Released: {}",
        format_size(record.known_size()),
        format_date(record.release_date.as_deref()),
    );
    log::info!("");
}
