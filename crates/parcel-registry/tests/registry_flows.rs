//! # Registry Flow Tests
//!
//! Drive the registry through the invocation surface, the way a transport
//! would.

use parcel_registry::prelude::*;
use serde_json::Value;
use std::sync::Arc;

type Handler = RegistryHandler<ParcelRegistryService<InMemoryLedger>>;

// =============================================================================
// TEST HELPERS
// =============================================================================

fn make_handler() -> Handler {
    let ledger = Arc::new(InMemoryLedger::new());
    let service = ParcelRegistryService::new(ledger, RegistryConfig::default());
    RegistryHandler::new(service)
}

fn call(handler: &Handler, function: &str, args: &[&str]) -> Response {
    handler.handle(&Invocation::new(function, args.iter().copied()))
}

fn ok_json(handler: &Handler, function: &str, args: &[&str]) -> Value {
    let response = call(handler, function, args);
    let payload = response
        .payload()
        .unwrap_or_else(|| panic!("{function} failed: {:?}", response.message()));
    serde_json::from_slice(payload).unwrap()
}

fn query(handler: &Handler, key: &str) -> Parcel {
    let response = call(handler, "queryLand", &[key]);
    Parcel::from_bytes(response.payload().unwrap()).unwrap()
}

// =============================================================================
// SCENARIOS
// =============================================================================

#[test]
fn test_create_query_fork_scenario() {
    let handler = make_handler();

    assert!(call(&handler, "createLand", &["P1", "Colombo", "50", "nil", "Tomoko"]).is_success());

    let p1 = query(&handler, "P1");
    assert_eq!(p1.extent, 50);
    assert_eq!(p1.owner, "Tomoko");

    let fork = call(
        &handler,
        "forkLand",
        &["P1", "P1a", "Alice", "20", "P1b", "Bob", "20", "v", "5", "0"],
    );
    assert!(fork.is_success(), "{:?}", fork.message());

    let retired = call(&handler, "queryLand", &["P1"]);
    assert!(!retired.is_success());
    assert!(retired.message().unwrap().contains("deleted"));

    let p1a = query(&handler, "P1a");
    assert_eq!(p1a.extent, 20);
    assert_eq!(p1a.owner, "Alice");
    assert_eq!(p1a.parent_id, "P1");
    assert_eq!(p1a.registry_name, "Colombo");

    let p1b = query(&handler, "P1b");
    assert_eq!(p1b.owner, "Bob");
    assert_eq!(p1b.boundaries.top_left(), Point::new(5, 0));
}

#[test]
fn test_history_after_create_transfer_delete() {
    let handler = make_handler();
    call(&handler, "createLand", &["K", "Galle", "30", "nil", "Adriana"]);
    call(&handler, "changeLandOwner", &["K", "Alice"]);
    assert!(call(&handler, "delete", &["K"]).is_success());

    let history = ok_json(&handler, "getHistoryForLand", &["K"]);
    let entries = history.as_array().unwrap();
    assert_eq!(entries.len(), 3);

    assert_eq!(entries[0]["Value"]["owner"], "Adriana");
    assert_eq!(entries[0]["IsDelete"], false);
    assert_eq!(entries[1]["Value"]["owner"], "Alice");
    assert_eq!(entries[2]["IsDelete"], true);
    assert!(entries[2]["Value"].is_null());

    let tx_ids: Vec<&str> = entries.iter().map(|e| e["TxId"].as_str().unwrap()).collect();
    assert_ne!(tx_ids[0], tx_ids[1]);
    assert_ne!(tx_ids[1], tx_ids[2]);
    assert!(entries.iter().all(|e| e["Timestamp"].as_str().unwrap().ends_with('Z')));
}

#[test]
fn test_history_of_unknown_key_is_empty() {
    let handler = make_handler();
    assert_eq!(ok_json(&handler, "getHistoryForLand", &["ghost"]), Value::Array(vec![]));
}

#[test]
fn test_transfer_twice_is_idempotent() {
    let handler = make_handler();
    call(&handler, "initLedger", &[]);
    let before = query(&handler, "LAND4");

    assert!(call(&handler, "changeLandOwner", &["LAND4", "Alice"]).is_success());
    assert!(call(&handler, "changeLandOwner", &["LAND4", "Alice"]).is_success());

    let after = query(&handler, "LAND4");
    assert_eq!(after.owner, "Alice");
    assert_eq!(after.extent, before.extent);
    assert_eq!(after.boundaries, before.boundaries);
    assert_eq!(after.parent_id, before.parent_id);
}

#[test]
fn test_transfer_on_retired_key_writes_nothing() {
    let handler = make_handler();
    call(&handler, "initLedger", &[]);
    call(&handler, "delete", &["LAND6"]);

    let response = call(&handler, "changeLandOwner", &["LAND6", "Mallory"]);
    assert!(!response.is_success());
    assert_eq!(handler.api().ledger().history_of("LAND6").unwrap().len(), 2);
}

#[test]
fn test_query_all_lands_after_seed() {
    let handler = make_handler();
    assert!(call(&handler, "initLedger", &[]).is_success());
    call(&handler, "createLand", &["P9", "Galle", "3", "nil", "Zed"]);

    let all = ok_json(&handler, "queryAllLands", &[]);
    let rows = all.as_array().unwrap();
    assert_eq!(rows.len(), 10);
    assert_eq!(rows[0]["Key"], "LAND0");
    assert_eq!(rows[0]["Record"]["owner"], "Tomoko");
    assert_eq!(rows[9]["Key"], "LAND9");
    assert_eq!(rows[9]["Record"]["extent"], 60);
    assert_eq!(
        rows[2]["Record"]["boundaries"],
        serde_json::json!([[0, 20], [10, 20], [10, 0], [0, 0]])
    );
}

#[test]
fn test_query_all_lands_omits_deleted_and_is_repeatable() {
    let handler = make_handler();
    call(&handler, "initLedger", &[]);
    call(&handler, "delete", &["LAND3"]);

    let first = ok_json(&handler, "queryAllLands", &[]);
    let second = ok_json(&handler, "queryAllLands", &[]);
    assert_eq!(first, second);
    assert_eq!(first.as_array().unwrap().len(), 9);
    assert!(first
        .as_array()
        .unwrap()
        .iter()
        .all(|row| row["Key"] != "LAND3"));
}

#[test]
fn test_query_of_never_created_key_is_empty_payload() {
    let handler = make_handler();
    let response = call(&handler, "queryLand", &["nothing-here"]);
    assert_eq!(response.payload(), Some(&[][..]));
}

#[test]
fn test_unknown_function_is_rejected() {
    let handler = make_handler();
    let response = call(&handler, "mintLand", &[]);
    assert!(response.message().unwrap().contains("mintLand"));
}

#[test]
fn test_unknown_axis_writes_nothing() {
    let handler = make_handler();
    call(&handler, "initLedger", &[]);

    let response = call(
        &handler,
        "forkLand",
        &["LAND0", "A", "Alice", "10", "B", "Bob", "10", "diagonal", "5", "5"],
    );
    assert!(!response.is_success());

    assert_eq!(query(&handler, "LAND0").owner, "Tomoko");
    assert_eq!(call(&handler, "queryLand", &["A"]).payload(), Some(&[][..]));
}

#[test]
fn test_fork_of_missing_parent() {
    let handler = make_handler();
    let response = call(
        &handler,
        "forkLand",
        &["nope", "A", "Alice", "1", "B", "Bob", "1", "h", "0", "0"],
    );
    assert!(response.message().unwrap().contains("does not exist"));
}

#[test]
fn test_reseed_restores_seed_records() {
    // Seeding writes unconditionally.
    let handler = make_handler();
    call(&handler, "initLedger", &[]);
    call(&handler, "changeLandOwner", &["LAND1", "Alice"]);
    assert!(call(&handler, "initLedger", &[]).is_success());
    assert_eq!(query(&handler, "LAND1").owner, "Brad");
}
