use super::*;

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn test_defaults_are_valid() {
    let prefs = Preferences::default();
    assert!(prefs.validate().is_ok());
    assert_eq!(prefs.schema_version, SCHEMA_VERSION);
    assert_eq!(prefs.items_per_page, 25);
    assert_eq!(prefs.view_mode, DisplayMode::Grid);
    assert!(prefs.data_sources().metadata.is_some());
}

#[test]
fn test_empty_file_gives_defaults() {
    let prefs = parse_preferences("").unwrap();
    assert_eq!(prefs, Preferences::default());
}

#[test]
fn test_roundtrip_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("preferences.toml");

    let mut prefs = Preferences::default();
    prefs.items_per_page = 50;
    prefs.view_mode = DisplayMode::Banner;
    prefs.last_active_tab = ContentRole::Addon;
    save_preferences_to(&path, &prefs).unwrap();

    assert!(!path.with_extension("toml.tmp").exists());
    assert_eq!(load_preferences_from(&path), prefs);
}

#[test]
fn test_missing_or_corrupt_file_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preferences.toml");
    assert_eq!(load_preferences_from(&path), Preferences::default());

    std::fs::write(&path, "items_per_page = [not toml").unwrap();
    assert_eq!(load_preferences_from(&path), Preferences::default());

    std::fs::write(&path, "items_per_page = 0").unwrap();
    assert_eq!(load_preferences_from(&path), Preferences::default());
}

#[test]
fn test_migrates_v1_legacy_source_names() {
    let text = r#"
items_per_page = 40
name_precision = 0.2

[data_sources]
working_content = "/srv/nx/working.txt"
"#;
    let prefs = parse_preferences(text).unwrap();
    assert_eq!(prefs.schema_version, SCHEMA_VERSION);
    assert_eq!(prefs.items_per_page, 40);
    assert_eq!(prefs.data_sources.manifest, "/srv/nx/working.txt");
    assert_eq!(prefs.data_sources.title_index, DEFAULT_TITLE_INDEX_URL);
    // v4 resets precision
    assert_eq!(prefs.name_precision, 0.7);
    assert_eq!(prefs.max_dlc_display, 5);
}

#[test]
fn test_migrate_v3_resets_precision_and_logs() {
    let mut doc: Table = toml::from_str(
        "schema_version = 3\nshow_logs = false\ntid_precision = 0.9\nmax_dlc_display = 12\n",
    )
    .unwrap();
    assert_eq!(migrate(&mut doc), 3);
    let prefs: Preferences = Value::Table(doc).try_into().unwrap();
    assert!(prefs.show_logs);
    assert_eq!(prefs.tid_precision, 0.1);
    // Settings outside the v4 migration survive
    assert_eq!(prefs.max_dlc_display, 12);
}

#[test]
fn test_current_schema_is_untouched() {
    let text = "schema_version = 4\nshow_logs = false\nname_precision = 0.9\n";
    let prefs = parse_preferences(text).unwrap();
    assert!(!prefs.show_logs);
    assert_eq!(prefs.name_precision, 0.9);
}

#[test]
fn test_set_value_by_type() {
    let prefs = Preferences::default();

    let p = prefs.set_value("items_per_page", "100").unwrap();
    assert_eq!(p.items_per_page, 100);

    let p = prefs.set_value("show_logs", "off").unwrap();
    assert!(!p.show_logs);

    let p = prefs.set_value("name_precision", "0.85").unwrap();
    assert_eq!(p.name_precision, 0.85);

    let p = prefs.set_value("view_mode", "banner").unwrap();
    assert_eq!(p.view_mode, DisplayMode::Banner);

    let p = prefs.set_value("data_sources.metadata", "").unwrap();
    assert!(p.data_sources().metadata.is_none());

    let p = prefs
        .set_value("api.base_urls", "https://a.example, https://b.example")
        .unwrap();
    assert_eq!(p.api.base_urls, vec!["https://a.example", "https://b.example"]);
}

#[test]
fn test_set_value_rejects_bad_input() {
    let prefs = Preferences::default();
    assert!(matches!(
        prefs.set_value("no_such_key", "1"),
        Err(SettingsError::UnknownKey(_))
    ));
    assert!(matches!(
        prefs.set_value("data_sources.nope", "x"),
        Err(SettingsError::UnknownKey(_))
    ));
    assert!(matches!(
        prefs.set_value("items_per_page", "many"),
        Err(SettingsError::InvalidValue { .. })
    ));
    assert!(matches!(
        prefs.set_value("items_per_page", "0"),
        Err(SettingsError::InvalidValue { .. })
    ));
    assert!(matches!(
        prefs.set_value("name_precision", "1.5"),
        Err(SettingsError::InvalidValue { .. })
    ));
    assert!(prefs.set_value("view_mode", "list").is_err());
    assert!(prefs.set_value("schema_version", "9").is_err());
}

#[test]
fn test_env_overrides_take_priority() {
    let mut prefs = Preferences::default();
    prefs.data_sources.title_index = "/srv/nx/titles_db.txt".into();

    let lookup = |var: &str| match var {
        ENV_MANIFEST_URL => Some("/tmp/working.txt".to_string()),
        ENV_METADATA_URL => Some("   ".to_string()),
        _ => None,
    };

    let origins = prefs.data_source_origins(lookup);
    assert_eq!(origins[0].2, ValueSource::EnvVar(ENV_MANIFEST_URL));
    assert_eq!(origins[1].2, ValueSource::ConfigFile);
    assert_eq!(origins[2].2, ValueSource::Default);
    assert_eq!(origins[0].2.to_string(), "env $NX_CONTENT_MANIFEST_URL");

    let effective = prefs.with_overrides_from(lookup);
    assert_eq!(effective.data_sources.manifest, "/tmp/working.txt");
    assert_eq!(effective.data_sources.title_index, "/srv/nx/titles_db.txt");
    assert_eq!(effective.data_sources.metadata, DEFAULT_METADATA_URL);
}

#[test]
fn test_no_env_leaves_preferences_alone() {
    let prefs = Preferences::default();
    assert_eq!(prefs.clone().with_overrides_from(no_env), prefs);
}

#[test]
fn test_conversions() {
    let mut prefs = Preferences::default();
    prefs.feeds.dlc = String::new();
    prefs.show_version_history = false;

    assert!(prefs.feed_location(ContentRole::Base).is_some());
    assert!(prefs.feed_location(ContentRole::Addon).is_none());
    assert!(!prefs.merge_options().synthesize_history);
    assert_eq!(prefs.details_config().stats_url, DEFAULT_STATS_URL);
    assert_eq!(
        prefs.name_search_options(),
        SearchOptions::from_precision(0.7)
    );
}
