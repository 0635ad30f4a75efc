mod common;

use common::sqlite_store;
use serde_json::{Map, Value, json};
use squadhaus::models::Squad;
use std::collections::BTreeSet;
use std::sync::Arc;
use store_object::{FindOptions, GenericStore, OrderBy, Predicate, StoreError};

async fn seeded() -> GenericStore<Squad> {
    let squads: GenericStore<Squad> = GenericStore::new(Arc::new(sqlite_store().await), None);
    for (name, product, tool, members) in [
        ("Alpha", "X", "Jira", 5),
        ("Bravo", "Y", "Jira", 3),
        ("Charlie", "X", "Trello", 8),
        ("Delta", "Z", "Asana", 2),
    ] {
        let mut squad = Squad::new(name, product, tool, members);
        squads.save(&mut squad).await.unwrap();
    }

    let mut toolless = Squad {
        name: Some("Echo".to_string()),
        product: Some("X".to_string()),
        member_count: Some(1),
        ..Squad::default()
    };
    squads.save(&mut toolless).await.unwrap();
    squads
}

fn names(squads: &[Squad]) -> BTreeSet<String> {
    squads
        .iter()
        .filter_map(|squad| squad.name.clone())
        .collect()
}

#[tokio::test]
async fn equality_and_raw_predicates_agree() {
    let squads = seeded().await;

    let structured = squads
        .find_many(FindOptions::new().filter(Predicate::eq("product", "X")))
        .await
        .unwrap();
    let raw = squads
        .find_many(FindOptions::new().filter(Predicate::raw("product = ?", vec![json!("X")])))
        .await
        .unwrap();

    assert_eq!(names(&structured), names(&raw));
    assert_eq!(
        names(&structured),
        BTreeSet::from(["Alpha".to_string(), "Charlie".to_string(), "Echo".to_string()])
    );
}

#[tokio::test]
async fn equality_mapping_is_a_conjunction() {
    let squads = seeded().await;

    let mut mapping = Map::new();
    mapping.insert("product".to_string(), json!("X"));
    mapping.insert("tool".to_string(), json!("Jira"));

    let found = squads
        .find_many(FindOptions::new().filter(mapping))
        .await
        .unwrap();
    assert_eq!(names(&found), BTreeSet::from(["Alpha".to_string()]));
}

#[tokio::test]
async fn null_equality_matches_missing_values() {
    let squads = seeded().await;

    let found = squads
        .find_many(FindOptions::new().filter(Predicate::eq("tool", Value::Null)))
        .await
        .unwrap();
    assert_eq!(names(&found), BTreeSet::from(["Echo".to_string()]));
}

#[tokio::test]
async fn named_parameters_bind_by_name() {
    let squads = seeded().await;

    let mut params = Map::new();
    params.insert("product".to_string(), json!("X"));
    params.insert("minimum".to_string(), json!(4));

    let found = squads
        .find_many(FindOptions::new().filter(Predicate::raw_named(
            "\"product\" = :product AND \"memberCount\" >= :minimum",
            params,
        )))
        .await
        .unwrap();
    assert_eq!(
        names(&found),
        BTreeSet::from(["Alpha".to_string(), "Charlie".to_string()])
    );
}

#[tokio::test]
async fn mismatched_parameters_fail_before_querying() {
    let squads = seeded().await;

    let error = squads
        .find_many(FindOptions::new().filter(Predicate::raw("product = ? AND tool = ?", vec![json!("X")])))
        .await
        .unwrap_err();
    assert!(matches!(error, StoreError::InvalidPredicate(_)));
}

#[tokio::test]
async fn find_all_and_find_one() {
    let squads = seeded().await;

    assert_eq!(squads.find_all().await.unwrap().len(), 5);

    let largest = squads
        .find_one(FindOptions::new().order_by(OrderBy::desc("memberCount")))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(largest.name.as_deref(), Some("Charlie"));

    let missing = squads
        .find_one(FindOptions::new().filter(Predicate::eq("name", "Zulu")))
        .await
        .unwrap();
    assert!(missing.is_none());
    assert!(squads.find_by_id(999).await.unwrap().is_none());
}
