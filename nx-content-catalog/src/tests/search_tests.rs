use super::*;
use nx_content_core::TitleId;

fn record(id: &str, name: Option<&str>) -> ContentRecord {
    let mut r = ContentRecord::new(TitleId::parse(id).unwrap(), None);
    r.display_name = name.map(str::to_string);
    r
}

fn catalog() -> Vec<ContentRecord> {
    vec![
        record("0100000000010000", Some("Super Example Odyssey")),
        record("0100000000010800", Some("Super Example Odyssey")),
        record("0100000000011001", Some("Super Example Odyssey - Costume Pack")),
        record("01000000000AB000", Some("Kart Racer Deluxe")),
        record("0100000000020000", None),
    ]
}

#[test]
fn test_options_from_precision() {
    let opts = SearchOptions::from_precision(0.7);
    assert!((opts.threshold - 0.3).abs() < 1e-9);
    assert_eq!(opts.min_match_char_length, 2);

    let loose = SearchOptions::from_precision(0.0);
    assert!((loose.threshold - 1.0).abs() < 1e-9);
    assert_eq!(loose.min_match_char_length, 4);

    let clamped = SearchOptions::from_precision(7.0);
    assert_eq!(clamped.threshold, 0.0);
}

#[test]
fn test_name_score() {
    assert_eq!(name_score("odyssey", "Super Example Odyssey"), 0.0);
    assert_eq!(name_score("ODYSSEY", "super example odyssey"), 0.0);
    // One typo in a seven-letter word
    let typo = name_score("odysey", "Super Example Odyssey");
    assert!(typo > 0.0 && typo < 0.3, "score {typo}");
    assert!(name_score("zzzzzz", "Super Example Odyssey") > 0.8);
}

#[test]
fn test_fuzzy_name_search() {
    let records = catalog();
    let query = SearchQuery {
        name: "odysey".into(),
        ..Default::default()
    };
    let hits = search(&records, &query);
    assert_eq!(hits.len(), 3);
}

#[test]
fn test_higher_precision_is_stricter() {
    let records = catalog();
    let loose = SearchQuery {
        name: "kart racr".into(),
        options: SearchOptions::from_precision(0.6),
        ..Default::default()
    };
    let strict = SearchQuery {
        options: SearchOptions::from_precision(1.0),
        ..loose.clone()
    };
    assert_eq!(search(&records, &loose).len(), 1);
    assert!(search(&records, &strict).is_empty());
}

#[test]
fn test_short_query_never_matches() {
    let records = catalog();
    let query = SearchQuery {
        name: "s".into(),
        ..Default::default()
    };
    assert!(search(&records, &query).is_empty());
}

#[test]
fn test_unnamed_records_never_match_name_query() {
    let records = catalog();
    let query = SearchQuery {
        name: "unknown".into(),
        options: SearchOptions::from_precision(0.0),
        ..Default::default()
    };
    assert!(
        search(&records, &query)
            .iter()
            .all(|r| r.display_name.is_some())
    );
}

#[test]
fn test_title_id_substring() {
    let records = catalog();
    let query = SearchQuery {
        title_id: "0ab".into(),
        ..Default::default()
    };
    let hits = search(&records, &query);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].identifier.as_str(), "01000000000AB000");
}

#[test]
fn test_criteria_combine_with_and() {
    let records = catalog();
    let query = SearchQuery {
        name: "odyssey".into(),
        title_id: "800".into(),
        ..Default::default()
    };
    let hits = search(&records, &query);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].role(), ContentRole::Update);

    let query = SearchQuery {
        name: "odyssey".into(),
        role: RoleFilter::Only(ContentRole::Addon),
        ..Default::default()
    };
    assert_eq!(search(&records, &query).len(), 1);
}

#[test]
fn test_empty_query_matches_all_in_order() {
    let records = catalog();
    let query = SearchQuery::default();
    assert!(query.is_empty());
    let hits = search(&records, &query);
    assert_eq!(hits.len(), records.len());
    assert_eq!(hits[3].identifier.as_str(), "01000000000AB000");
}

#[test]
fn test_role_filter_parse() {
    assert_eq!("all".parse::<RoleFilter>().unwrap(), RoleFilter::All);
    assert_eq!(
        "dlc".parse::<RoleFilter>().unwrap(),
        RoleFilter::Only(ContentRole::Addon)
    );
    assert!("movies".parse::<RoleFilter>().is_err());
    assert_eq!(RoleFilter::Only(ContentRole::Update).to_string(), "update");
}
