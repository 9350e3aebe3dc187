//! Application layer shared by nx-content front ends: preferences,
//! the in-memory diagnostic log, and catalog loading.

pub mod diagnostics;
pub mod error;
pub mod loader;
pub mod settings;

pub use diagnostics::{DiagnosticEntry, DiagnosticLevel, DiagnosticLog};
pub use error::{LoadError, SettingsError};
pub use loader::{RecentContent, fetch_recent, load_catalog, load_with_preferences};
pub use settings::{Preferences, ValueSource, load_preferences, preferences_path, save_preferences};
