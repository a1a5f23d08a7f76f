mod common;

use common::{champion_list, realm, source, url, MockTransport};
use pretty_assertions::assert_eq;
use serde_json::json;
use staticdata_core::query::keys;
use staticdata_core::{AppError, EntityKind, Platform, Query};

#[test]
fn test_many_ids_isolates_missing_elements() {
    let transport = MockTransport::new();
    transport.route(url("na1", "champions"), champion_list());
    let source = source(&transport, true);

    let records = source
        .resolve_many(
            EntityKind::Champion,
            &Query::new()
                .with(keys::IDS, vec![1_i64, 999_999, 17])
                .with(keys::PLATFORM, "NA1"),
        )
        .unwrap();
    assert_eq!(transport.call_count(), 0);

    let results: Vec<_> = records.collect();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().unwrap().name(), Some("Annie"));
    match &results[1] {
        Err(AppError::NotFound(msg)) => assert_eq!(msg, "No champion exists with id \"999999\""),
        other => panic!("expected NotFound, got {:?}", other),
    }
    assert_eq!(results[2].as_ref().unwrap().id(), Some(17));
    assert_eq!(transport.call_count(), 1);
}

#[test]
fn test_many_ids_stamps_elements() {
    let transport = MockTransport::new();
    transport.route(url("kr", "champions"), champion_list());
    let source = source(&transport, true);

    let teemo = source
        .resolve_many(
            EntityKind::Champion,
            &Query::new()
                .with(keys::IDS, vec![17_i64])
                .with(keys::PLATFORM, Platform::Kr),
        )
        .unwrap()
        .next()
        .unwrap()
        .unwrap();

    assert_eq!(teemo.region(), Some("KR"));
    assert_eq!(teemo.locale(), Some("ko_KR"));
    assert_eq!(teemo.version(), Some("7.24.1"));
    assert_eq!(teemo.kind(), EntityKind::Champion);
}

#[test]
fn test_many_ids_list_failure_surfaces_once() {
    let transport = MockTransport::new();
    let source = source(&transport, true);

    let results: Vec<_> = source
        .resolve_many(
            EntityKind::Item,
            &Query::new()
                .with(keys::IDS, vec![1001_i64, 1004])
                .with(keys::PLATFORM, "NA1"),
        )
        .unwrap()
        .collect();

    assert_eq!(results.len(), 1);
    assert!(results[0].as_ref().unwrap_err().is_not_found());
    assert_eq!(transport.call_count(), 1);
}

#[test]
fn test_many_ids_validation_is_eager() {
    let transport = MockTransport::new();
    let source = source(&transport, true);

    let err = source
        .resolve_many(
            EntityKind::Champion,
            &Query::new().with(keys::IDS, vec![1_i64, 2]),
        )
        .err()
        .unwrap();
    assert!(err.is_invalid_query());
}

#[test]
fn test_many_platforms_isolates_failures_in_order() {
    let transport = MockTransport::new();
    transport.route(url("na1", "realms"), realm("7.24.1"));
    transport.route(url("euw1", "realms"), realm("7.23.1"));
    let source = source(&transport, true);

    let records = source
        .resolve_many(
            EntityKind::Realm,
            &Query::new().with(keys::PLATFORMS, vec!["NA1", "KR", "EUW1"]),
        )
        .unwrap();
    assert_eq!(records.kind(), EntityKind::Realm);

    let results: Vec<_> = records.collect();
    assert_eq!(results[0].as_ref().unwrap().region(), Some("NA"));
    assert!(results[1].as_ref().unwrap_err().is_not_found());
    let euw = results[2].as_ref().unwrap();
    assert_eq!(euw.region(), Some("EUW"));
    assert_eq!(euw.get("v"), Some(&json!("7.23.1")));
    assert_eq!(transport.call_count(), 3);
}

#[test]
fn test_many_platforms_is_lazy() {
    let transport = MockTransport::new();
    transport.route(url("na1", "realms"), realm("7.24.1"));
    let source = source(&transport, true);

    let mut records = source
        .resolve_many(
            EntityKind::Realm,
            &Query::new().with(keys::PLATFORMS, vec![Platform::Na1, Platform::Kr]),
        )
        .unwrap();
    assert_eq!(transport.call_count(), 0);
    assert!(records.next().unwrap().is_ok());
    assert_eq!(transport.call_count(), 1);
}

#[test]
fn test_many_lists_go_through_the_cache() {
    let transport = MockTransport::new();
    transport.route(url("na1", "champions"), champion_list());
    transport.route(url("kr", "champions"), champion_list());
    let source = source(&transport, true);

    let lists: Vec<_> = source
        .resolve_many(
            EntityKind::ChampionList,
            &Query::new().with(keys::PLATFORMS, vec!["NA1", "KR"]),
        )
        .unwrap()
        .map(|r| r.unwrap())
        .collect();
    assert_eq!(lists[0].locale(), Some("en_US"));
    assert_eq!(lists[1].locale(), Some("ko_KR"));
    assert_eq!(lists[1].region(), Some("KR"));
    assert_eq!(source.cache().len_of(EntityKind::ChampionList), 2);

    source
        .resolve(EntityKind::ChampionList, &Query::new().with(keys::PLATFORM, "KR"))
        .unwrap();
    assert_eq!(transport.call_count(), 2);
}

#[test]
fn test_versions_and_languages_are_wrapped() {
    let transport = MockTransport::new();
    transport.route(url("na1", "versions"), json!(["7.24.1", "7.23.1"]));
    transport.route(url("na1", "languages"), json!(["en_US", "ko_KR"]));
    let source = source(&transport, true);
    let na = Query::new().with(keys::PLATFORM, "NA1");

    let versions = source.resolve(EntityKind::Versions, &na).unwrap();
    assert_eq!(
        serde_json::to_value(&versions).unwrap(),
        json!({"versions": ["7.24.1", "7.23.1"], "region": "NA"})
    );

    let languages = source.resolve(EntityKind::Languages, &na).unwrap();
    assert_eq!(languages.get("languages"), Some(&json!(["en_US", "ko_KR"])));
    assert_eq!(languages.locale(), None);
}

#[test]
fn test_localized_platform_resources() {
    let transport = MockTransport::new();
    transport.route(
        url("tr1", "language-strings"),
        json!({"type": "language", "version": "7.24.1", "data": {"Boots": "Botlar"}}),
    );
    let source = source(&transport, true);

    let strings = source
        .resolve(
            EntityKind::LanguageStrings,
            &Query::new()
                .with(keys::PLATFORM, "TR1")
                .with(keys::VERSION, "7.24.1"),
        )
        .unwrap();
    assert_eq!(strings.locale(), Some("tr_TR"));
    assert_eq!(strings.region(), Some("TR"));

    let (_, params) = &transport.calls()[0];
    assert_eq!(common::param(params, "locale"), Some("tr_TR"));
    assert_eq!(common::param(params, "version"), Some("7.24.1"));
}
