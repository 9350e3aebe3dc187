use std::collections::HashSet;

use nx_content_catalog::{
    Catalog, MergeOptions, RoleFilter, SearchQuery, SortDirection, SortField, SortSpec, ViewState,
    paginate,
};
use nx_content_core::{ContentRole, TitleId, base_title_id};
use nx_content_sources::RawSnapshots;

const MANIFEST: &str = "\
0100000000010000|1.2.0
0100000000010800|65536
0100000000010800|131072
0100000000011001|
0100000000011002|
0100000000020000|
0100000000030000|
0100000000030000|
010000000004A000|1.0.0
bogus|1
";

const TITLES: &str = "\
0100000000010000|2023-05-01|Example Game|4000000000
0100000000011001|2023-07-01|Example Game - Extra Pack|20000000
0100000000020000|2020-01-01|Kart Racer Deluxe|7000000000
0100000000030000||Puzzle Quest|
";

const METADATA: &str = r#"{
    "0100000000020000": {"Game Name": "Kart Racer Deluxe", "Version": "2.0.0", "Size": 1},
    "010000000004A000": {"Game Name": "Unknown Title"}
}"#;

const HISTORY: &str = r#"{
    "0100000000010000": {"65536": "2023-06-01", "131072": "2023-09-15"},
    "0100000000020000": {"65536": "2021-03-01"}
}"#;

fn build(synthesize: bool) -> Catalog {
    let parsed = RawSnapshots {
        manifest: MANIFEST.into(),
        title_index: TITLES.into(),
        metadata: Some(METADATA.into()),
        version_history: Some(HISTORY.into()),
    }
    .parse()
    .unwrap();
    Catalog::build(
        &parsed,
        MergeOptions {
            synthesize_history: synthesize,
        },
    )
}

#[test]
fn instance_keys_are_unique() {
    for synthesize in [false, true] {
        let catalog = build(synthesize);
        let keys: HashSet<&str> = catalog
            .records()
            .iter()
            .map(|r| r.instance_key.as_str())
            .collect();
        assert_eq!(keys.len(), catalog.len());
    }
}

#[test]
fn role_is_a_function_of_the_suffix() {
    let catalog = build(true);
    for record in catalog.records() {
        let expected = match &record.identifier.as_str()[13..] {
            "000" => ContentRole::Base,
            "800" => ContentRole::Update,
            _ => ContentRole::Addon,
        };
        assert_eq!(record.role(), expected, "{}", record.identifier);
    }
}

#[test]
fn canonicalization_is_idempotent() {
    let catalog = build(true);
    for record in catalog.records() {
        if let Some(base) = base_title_id(&record.identifier) {
            assert_eq!(base_title_id(&base), Some(base.clone()));
        }
    }
    let update = TitleId::parse("0100000000010800").unwrap();
    assert_eq!(
        base_title_id(&update).unwrap().as_str(),
        "0100000000010000"
    );
}

#[test]
fn merge_example_record() {
    let catalog = build(false);
    let id = TitleId::parse("0100000000010000").unwrap();
    let record = catalog.get(&id).unwrap();
    assert_eq!(record.display_name.as_deref(), Some("Example Game"));
    assert_eq!(record.size_bytes, Some(4_000_000_000));
    assert_eq!(record.release_date.as_deref(), Some("2023-05-01"));
    assert_eq!(catalog.by_id(&id).count(), 1);
}

#[test]
fn merge_report_counts() {
    let catalog = build(false);
    let report = catalog.report();
    assert_eq!(report.rows_read, 9);
    assert_eq!(report.duplicates_dropped, 1);
    assert_eq!(report.synthesized, 0);
    assert_eq!(catalog.len(), 8);
    // Both update rows, one add-on, and the title whose only name is the
    // literal "Unknown Title"
    assert_eq!(report.unnamed, 4);

    let synthesized = build(true);
    // Only the second title gains a history update; the first already has
    // manifest update rows.
    assert_eq!(synthesized.report().synthesized, 1);
    let key = synthesized
        .by_instance_key("0100000000020800_65536")
        .unwrap();
    assert!(key.synthesized);
    assert_eq!(key.release_date.as_deref(), Some("2021-03-01"));
}

#[test]
fn update_dates_come_from_history() {
    let catalog = build(false);
    let newer = catalog.by_instance_key("0100000000010800_131072").unwrap();
    assert_eq!(newer.release_date.as_deref(), Some("2023-09-15"));
}

#[test]
fn sort_reversal_keeps_missing_last() {
    let catalog = build(true);
    let query = SearchQuery::default();
    for &field in SortField::ALL {
        let asc = catalog.list(&query, SortSpec::new(field, SortDirection::Asc));
        let desc = catalog.list(&query, SortSpec::new(field, SortDirection::Desc));
        let has = |r: &&nx_content_core::ContentRecord| match field {
            SortField::Id => true,
            SortField::Name => r.display_name.is_some(),
            SortField::Size => r.known_size().is_some(),
            SortField::Date => r.release_timestamp().is_some(),
        };

        let n = asc.iter().filter(|r| has(r)).count();
        let mut head: Vec<&str> = asc[..n].iter().map(|r| r.instance_key.as_str()).collect();
        head.reverse();
        let desc_head: Vec<&str> = desc[..n].iter().map(|r| r.instance_key.as_str()).collect();
        assert_eq!(head, desc_head, "field {field}");
        assert!(asc[n..].iter().all(|r| !has(r)));
        assert!(desc[n..].iter().all(|r| !has(r)));
    }
}

#[test]
fn undated_sorts_after_2020() {
    let catalog = build(false);
    let query = SearchQuery {
        role: RoleFilter::Only(ContentRole::Base),
        ..Default::default()
    };
    for direction in [SortDirection::Asc, SortDirection::Desc] {
        let list = catalog.list(&query, SortSpec::new(SortField::Date, direction));
        let dated = list
            .iter()
            .position(|r| r.release_date.as_deref() == Some("2020-01-01"))
            .unwrap();
        let undated = list
            .iter()
            .position(|r| r.identifier.as_str() == "0100000000030000")
            .unwrap();
        assert!(dated < undated, "{direction}");
    }
}

#[test]
fn view_state_drives_listing() {
    let catalog = build(false);
    let state = ViewState::from_query("type=update&sort=date&order=asc");
    let list = catalog.list(
        &state.search_query(Default::default()),
        state.sort_spec(),
    );
    let keys: Vec<&str> = list.iter().map(|r| r.instance_key.as_str()).collect();
    assert_eq!(
        keys,
        vec!["0100000000010800_65536", "0100000000010800_131072"]
    );

    let page = paginate(&list, 2, 1);
    assert_eq!(page.items[0].instance_key, "0100000000010800_131072");
}

#[test]
fn related_content_for_detail_view() {
    let catalog = build(false);
    let rel = catalog.related(&TitleId::parse("0100000000011002").unwrap());
    assert_eq!(rel.base.unwrap().identifier.as_str(), "0100000000010000");
    assert_eq!(rel.updates.len(), 2);
    assert_eq!(rel.addons.len(), 2);
}

#[test]
fn stats_by_role() {
    let stats = build(false).stats();
    assert_eq!(stats.base, 4);
    assert_eq!(stats.updates, 2);
    assert_eq!(stats.addons, 2);
}
