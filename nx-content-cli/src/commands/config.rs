use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use nx_content_lib::settings::{load_preferences, preferences_path, save_preferences};
use nx_content_lib::{Preferences, ValueSource};

use crate::error::CliError;

/// Show stored preferences and where each data source comes from.
pub(crate) fn run_config_show() -> Result<(), CliError> {
    let path = preferences_path();
    let prefs = load_preferences();

    log::info!(
        "{}",
        "nx-content Preferences".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("");
    if path.exists() {
        log::info!(
            "  Preferences file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Preferences file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found, using defaults)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    log::info!("");

    let text = toml::to_string_pretty(&prefs).map_err(nx_content_lib::SettingsError::from)?;
    for line in text.lines() {
        log::info!("  {line}");
    }

    log::info!("");
    log::info!(
        "{}",
        "Effective data sources".if_supports_color(Stdout, |t| t.bold()),
    );
    let origins = prefs.data_source_origins(|var| std::env::var(var).ok());
    for (key, value, source) in origins {
        let shown = if value.is_empty() {
            "(disabled)".to_string()
        } else {
            value
        };
        let source_str = format!("({source})");
        let source_str = if matches!(source, ValueSource::EnvVar(_)) {
            source_str
                .if_supports_color(Stdout, |t| t.yellow())
                .to_string()
        } else {
            source_str
                .if_supports_color(Stdout, |t| t.dimmed())
                .to_string()
        };
        log::info!("  {key:<16} {shown} {source_str}");
    }
    Ok(())
}

/// Print the preferences file path.
pub(crate) fn run_config_path() {
    log::info!("{}", preferences_path().display());
}

/// Change one stored preference.
pub(crate) fn run_config_set(key: &str, value: &str) -> Result<(), CliError> {
    let prefs = load_preferences().set_value(key, value)?;
    save_preferences(&prefs)?;
    log::info!(
        "{} {} = {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        key.if_supports_color(Stdout, |t| t.bold()),
        value,
    );
    Ok(())
}

/// Overwrite stored preferences with the defaults.
pub(crate) fn run_config_reset() -> Result<(), CliError> {
    save_preferences(&Preferences::default())?;
    log::info!(
        "{} Preferences reset to defaults ({})",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        preferences_path().display(),
    );
    Ok(())
}
