//! User preferences (`~/.config/nx-content/preferences.toml`).
//!
//! The file carries a `schema_version`. Older files are brought up to date
//! by running each migration in turn over the raw TOML table before it is
//! deserialized, so fields added later pick up their intended values rather
//! than whatever `Default` says.
//!
//! Data-source URLs can also come from the environment. Priority is
//! environment > preferences file > built-in default; environment values are
//! applied on top of the loaded preferences and never written back.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use toml::{Table, Value};

use nx_content_catalog::{DisplayMode, MergeOptions, SearchOptions};
use nx_content_core::ContentRole;
use nx_content_sources::details::{DEFAULT_API_BASE_URLS, DEFAULT_STATS_URL};
use nx_content_sources::fetch::{
    DEFAULT_MANIFEST_URL, DEFAULT_METADATA_URL, DEFAULT_TITLE_INDEX_URL,
    DEFAULT_VERSION_HISTORY_URL,
};
use nx_content_sources::rss::{DEFAULT_BASE_FEED_URL, DEFAULT_DLC_FEED_URL, DEFAULT_UPDATE_FEED_URL};
use nx_content_sources::{DataSources, DetailsConfig, SourceLocation};

use crate::error::SettingsError;

/// Current preferences schema.
pub const SCHEMA_VERSION: u32 = 4;

pub const ENV_MANIFEST_URL: &str = "NX_CONTENT_MANIFEST_URL";
pub const ENV_TITLES_URL: &str = "NX_CONTENT_TITLES_URL";
pub const ENV_METADATA_URL: &str = "NX_CONTENT_METADATA_URL";
pub const ENV_VERSIONS_URL: &str = "NX_CONTENT_VERSIONS_URL";

const DEFAULT_NAME_PRECISION: f64 = 0.7;
const DEFAULT_TID_PRECISION: f64 = 0.1;
const DEFAULT_DISPLAY_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default = "current_schema")]
    pub schema_version: u32,
    #[serde(default = "default_items_per_page")]
    pub items_per_page: usize,
    #[serde(default = "default_tab")]
    pub last_active_tab: ContentRole,
    #[serde(default = "default_name_precision")]
    pub name_precision: f64,
    #[serde(default = "default_tid_precision")]
    pub tid_precision: f64,
    #[serde(default = "default_true")]
    pub show_logs: bool,
    /// Also list update versions known only from version history.
    #[serde(default = "default_true")]
    pub show_version_history: bool,
    #[serde(default = "default_display_limit")]
    pub max_dlc_display: usize,
    #[serde(default = "default_display_limit")]
    pub max_update_display: usize,
    #[serde(default)]
    pub view_mode: DisplayMode,
    #[serde(default)]
    pub data_sources: DataSourceSettings,
    #[serde(default)]
    pub feeds: FeedSettings,
    #[serde(default)]
    pub api: ApiSettings,
}

/// Snapshot locations. An empty optional source is disabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSourceSettings {
    pub manifest: String,
    pub title_index: String,
    pub metadata: String,
    pub version_history: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedSettings {
    pub base: String,
    pub update: String,
    pub dlc: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_urls: Vec<String>,
    pub stats_url: String,
}

fn current_schema() -> u32 {
    SCHEMA_VERSION
}

fn default_items_per_page() -> usize {
    25
}

fn default_tab() -> ContentRole {
    ContentRole::Base
}

fn default_name_precision() -> f64 {
    DEFAULT_NAME_PRECISION
}

fn default_tid_precision() -> f64 {
    DEFAULT_TID_PRECISION
}

fn default_true() -> bool {
    true
}

fn default_display_limit() -> usize {
    DEFAULT_DISPLAY_LIMIT
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            items_per_page: default_items_per_page(),
            last_active_tab: default_tab(),
            name_precision: DEFAULT_NAME_PRECISION,
            tid_precision: DEFAULT_TID_PRECISION,
            show_logs: true,
            show_version_history: true,
            max_dlc_display: DEFAULT_DISPLAY_LIMIT,
            max_update_display: DEFAULT_DISPLAY_LIMIT,
            view_mode: DisplayMode::default(),
            data_sources: DataSourceSettings::default(),
            feeds: FeedSettings::default(),
            api: ApiSettings::default(),
        }
    }
}

impl Default for DataSourceSettings {
    fn default() -> Self {
        Self {
            manifest: DEFAULT_MANIFEST_URL.to_string(),
            title_index: DEFAULT_TITLE_INDEX_URL.to_string(),
            metadata: DEFAULT_METADATA_URL.to_string(),
            version_history: DEFAULT_VERSION_HISTORY_URL.to_string(),
        }
    }
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            base: DEFAULT_BASE_FEED_URL.to_string(),
            update: DEFAULT_UPDATE_FEED_URL.to_string(),
            dlc: DEFAULT_DLC_FEED_URL.to_string(),
        }
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_urls: DEFAULT_API_BASE_URLS.iter().map(|s| s.to_string()).collect(),
            stats_url: DEFAULT_STATS_URL.to_string(),
        }
    }
}

/// Where an effective setting came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    EnvVar(&'static str),
    ConfigFile,
    Default,
}

impl fmt::Display for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnvVar(var) => write!(f, "env ${var}"),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

fn optional_location(raw: &str) -> Option<SourceLocation> {
    let raw = raw.trim();
    (!raw.is_empty()).then(|| SourceLocation::parse(raw))
}

impl Preferences {
    /// Reject values no part of the application can work with.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.items_per_page == 0 {
            return Err(SettingsError::invalid_value(
                "items_per_page",
                "must be at least 1",
            ));
        }
        for (key, value) in [
            ("name_precision", self.name_precision),
            ("tid_precision", self.tid_precision),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SettingsError::invalid_value(key, "must be between 0 and 1"));
            }
        }
        if self.data_sources.manifest.trim().is_empty() {
            return Err(SettingsError::invalid_value(
                "data_sources.manifest",
                "must not be empty",
            ));
        }
        if self.data_sources.title_index.trim().is_empty() {
            return Err(SettingsError::invalid_value(
                "data_sources.title_index",
                "must not be empty",
            ));
        }
        Ok(())
    }

    /// Apply data-source overrides from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|var| std::env::var(var).ok())
    }

    /// Apply data-source overrides from `lookup`. Empty values are ignored.
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        for (var, slot) in [
            (ENV_MANIFEST_URL, &mut self.data_sources.manifest),
            (ENV_TITLES_URL, &mut self.data_sources.title_index),
            (ENV_METADATA_URL, &mut self.data_sources.metadata),
            (ENV_VERSIONS_URL, &mut self.data_sources.version_history),
        ] {
            if let Some(value) = lookup(var).filter(|v| !v.trim().is_empty()) {
                log::debug!("Using ${var} for data source");
                *slot = value.trim().to_string();
            }
        }
        self
    }

    /// Effective data-source values and where each came from. `self` is
    /// the file-backed preferences, before overrides.
    pub fn data_source_origins(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Vec<(&'static str, String, ValueSource)> {
        let defaults = DataSourceSettings::default();
        let current = &self.data_sources;
        [
            ("manifest", ENV_MANIFEST_URL, &current.manifest, &defaults.manifest),
            ("title_index", ENV_TITLES_URL, &current.title_index, &defaults.title_index),
            ("metadata", ENV_METADATA_URL, &current.metadata, &defaults.metadata),
            (
                "version_history",
                ENV_VERSIONS_URL,
                &current.version_history,
                &defaults.version_history,
            ),
        ]
        .into_iter()
        .map(|(key, var, value, default)| {
            match lookup(var).filter(|v| !v.trim().is_empty()) {
                Some(env) => (key, env.trim().to_string(), ValueSource::EnvVar(var)),
                None if value == default => (key, value.clone(), ValueSource::Default),
                None => (key, value.clone(), ValueSource::ConfigFile),
            }
        })
        .collect()
    }

    pub fn data_sources(&self) -> DataSources {
        DataSources {
            manifest: SourceLocation::parse(&self.data_sources.manifest),
            title_index: SourceLocation::parse(&self.data_sources.title_index),
            metadata: optional_location(&self.data_sources.metadata),
            version_history: optional_location(&self.data_sources.version_history),
        }
    }

    pub fn feed_location(&self, role: ContentRole) -> Option<SourceLocation> {
        let raw = match role {
            ContentRole::Base => &self.feeds.base,
            ContentRole::Update => &self.feeds.update,
            ContentRole::Addon => &self.feeds.dlc,
        };
        optional_location(raw)
    }

    pub fn details_config(&self) -> DetailsConfig {
        DetailsConfig {
            base_urls: self.api.base_urls.clone(),
            stats_url: self.api.stats_url.clone(),
            ..Default::default()
        }
    }

    pub fn name_search_options(&self) -> SearchOptions {
        SearchOptions::from_precision(self.name_precision)
    }

    pub fn merge_options(&self) -> MergeOptions {
        MergeOptions {
            synthesize_history: self.show_version_history,
        }
    }

    /// Set one preference from its textual form. `key` uses dotted paths
    /// for nested tables (`data_sources.manifest`); list values are comma
    /// separated.
    pub fn set_value(&self, key: &str, raw: &str) -> Result<Self, SettingsError> {
        if key == "schema_version" {
            return Err(SettingsError::invalid_value(key, "is managed automatically"));
        }

        let mut doc = Value::try_from(self)?;
        let mut segments: Vec<&str> = key.split('.').collect();
        let leaf = segments.pop().unwrap_or_default();

        let mut table = doc
            .as_table_mut()
            .ok_or_else(|| SettingsError::UnknownKey(key.to_string()))?;
        for segment in segments {
            table = table
                .get_mut(segment)
                .and_then(Value::as_table_mut)
                .ok_or_else(|| SettingsError::UnknownKey(key.to_string()))?;
        }

        let existing = table
            .get(leaf)
            .ok_or_else(|| SettingsError::UnknownKey(key.to_string()))?;
        let value = parse_like(existing, key, raw.trim())?;
        table.insert(leaf.to_string(), value);

        let updated: Self = doc
            .try_into()
            .map_err(|e: toml::de::Error| SettingsError::invalid_value(key, e.message()))?;
        updated.validate()?;
        Ok(updated)
    }
}

/// Parse `raw` into the same TOML type as `existing`.
fn parse_like(existing: &Value, key: &str, raw: &str) -> Result<Value, SettingsError> {
    let invalid =
        |what: &str| SettingsError::invalid_value(key, format!("expected {what}, got '{raw}'"));
    Ok(match existing {
        Value::Boolean(_) => match raw.to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Value::Boolean(true),
            "false" | "no" | "off" | "0" => Value::Boolean(false),
            _ => return Err(invalid("a boolean")),
        },
        Value::Integer(_) => Value::Integer(
            raw.parse::<u32>()
                .map_err(|_| invalid("a non-negative integer"))?
                .into(),
        ),
        Value::Float(_) => Value::Float(raw.parse().map_err(|_| invalid("a number"))?),
        Value::String(_) => Value::String(raw.to_string()),
        Value::Array(_) => Value::Array(
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| Value::String(s.to_string()))
                .collect(),
        ),
        _ => return Err(SettingsError::UnknownKey(key.to_string())),
    })
}

// -- Migrations --------------------------------------------------------------

type Migration = fn(&mut Table);

/// `(from_version, migration)`; each step upgrades `from_version` by one.
const MIGRATIONS: &[(u32, Migration)] = &[
    (1, migrate_v1_to_v2),
    (2, migrate_v2_to_v3),
    (3, migrate_v3_to_v4),
];

/// v2 introduced configurable data sources. Early files used the names
/// `working_content` and `titles_db`.
fn migrate_v1_to_v2(doc: &mut Table) {
    if !doc.get("data_sources").is_some_and(Value::is_table) {
        doc.insert("data_sources".to_string(), Value::Table(Table::new()));
    }
    let Some(sources) = doc.get_mut("data_sources").and_then(Value::as_table_mut) else {
        return;
    };
    for (old, new) in [("working_content", "manifest"), ("titles_db", "title_index")] {
        if let Some(value) = sources.remove(old) {
            sources.entry(new).or_insert(value);
        }
    }
    sources
        .entry("manifest")
        .or_insert_with(|| Value::String(DEFAULT_MANIFEST_URL.to_string()));
    sources
        .entry("title_index")
        .or_insert_with(|| Value::String(DEFAULT_TITLE_INDEX_URL.to_string()));
}

/// v3 added limits on how many add-ons and updates a detail view lists.
fn migrate_v2_to_v3(doc: &mut Table) {
    for key in ["max_dlc_display", "max_update_display"] {
        doc.entry(key)
            .or_insert(Value::Integer(DEFAULT_DISPLAY_LIMIT as i64));
    }
}

/// v4 retuned both search precisions and turned logs back on.
fn migrate_v3_to_v4(doc: &mut Table) {
    doc.insert("tid_precision".to_string(), Value::Float(DEFAULT_TID_PRECISION));
    doc.insert("name_precision".to_string(), Value::Float(DEFAULT_NAME_PRECISION));
    doc.insert("show_logs".to_string(), Value::Boolean(true));
}

fn schema_version_of(doc: &Table) -> u32 {
    doc.get("schema_version")
        .and_then(Value::as_integer)
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(1)
}

/// Bring a raw preferences table up to [`SCHEMA_VERSION`]. Returns the
/// version the table started at.
pub fn migrate(doc: &mut Table) -> u32 {
    let from = schema_version_of(doc);
    if from > SCHEMA_VERSION {
        log::warn!(
            "Preferences schema {from} is newer than supported ({SCHEMA_VERSION}); reading as-is"
        );
        return from;
    }
    for &(version, migration) in MIGRATIONS {
        if version >= from {
            log::debug!("Migrating preferences from schema {version} to {}", version + 1);
            migration(doc);
        }
    }
    doc.insert(
        "schema_version".to_string(),
        Value::Integer(SCHEMA_VERSION.into()),
    );
    from
}

// -- Storage -----------------------------------------------------------------

/// Canonical path: `~/.config/nx-content/preferences.toml`.
pub fn preferences_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("nx-content").join("preferences.toml")
}

/// Parse preferences text, migrating older schemas.
pub fn parse_preferences(contents: &str) -> Result<Preferences, SettingsError> {
    let mut doc: Table = toml::from_str(contents)?;
    migrate(&mut doc);
    let prefs: Preferences = Value::Table(doc).try_into()?;
    prefs.validate()?;
    Ok(prefs)
}

/// Load preferences from `path`, returning defaults if missing or corrupt.
pub fn load_preferences_from(path: &Path) -> Preferences {
    match std::fs::read_to_string(path) {
        Ok(contents) => parse_preferences(&contents).unwrap_or_else(|e| {
            log::warn!("Failed to read preferences at {}: {e}", path.display());
            Preferences::default()
        }),
        Err(_) => Preferences::default(),
    }
}

pub fn load_preferences() -> Preferences {
    load_preferences_from(&preferences_path())
}

/// Save preferences atomically (write to temp, then rename).
pub fn save_preferences_to(path: &Path, prefs: &Preferences) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let contents = toml::to_string_pretty(prefs)?;
    let tmp = path.with_extension("toml.tmp");
    std::fs::write(&tmp, contents)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

pub fn save_preferences(prefs: &Preferences) -> Result<(), SettingsError> {
    save_preferences_to(&preferences_path(), prefs)
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
