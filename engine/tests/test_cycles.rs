//! FILENAME: tests/test_cycles.rs
//! Integration tests for circular reference rejection and rollback.

mod common;

use common::{pos, TestHarness};
use sheet_engine::SheetError;

fn cycle_path(err: SheetError) -> Vec<String> {
    match err {
        SheetError::CircularDependency(cycle) => {
            cycle.cycle_path.iter().map(|p| p.to_string()).collect()
        }
        other => panic!("expected a cycle, got {:?}", other),
    }
}

#[test]
fn test_self_reference_on_new_cell() {
    let mut h = TestHarness::new();
    let err = h.try_set("A1", "=A1").unwrap_err();
    assert_eq!(cycle_path(err), vec!["A1", "A1"]);
    assert!(!h.exists("A1"));
    assert!(h.sheet.is_empty());
}

#[test]
fn test_self_reference_keeps_existing_cell() {
    let mut h = TestHarness::new();
    h.set("A1", "7");
    assert!(h.try_set("A1", "=A1+1").is_err());
    assert_eq!(h.text("A1"), "7");
}

#[test]
fn test_mutual_cycle_rejected() {
    let mut h = TestHarness::new();
    h.set("A1", "=B1");

    let err = h.try_set("B1", "=A1").unwrap_err();
    assert_eq!(cycle_path(err), vec!["B1", "A1", "B1"]);

    assert_eq!(h.text("A1"), "=B1");
    // B1 is the placeholder A1 created; it stays empty
    assert_eq!(h.text("B1"), "");
    assert!(h.precedents("B1").is_empty());
    assert_eq!(h.dependents("B1"), vec![pos("A1")]);
}

#[test]
fn test_failed_call_removes_every_record_it_created() {
    let mut h = TestHarness::new();
    assert!(h.try_set("C1", "=D1+C1").is_err());
    assert!(!h.exists("C1"));
    assert!(!h.exists("D1"));
    assert!(h.sheet.is_empty());
}

#[test]
fn test_transitive_cycle_rejected() {
    let mut h = TestHarness::new();
    h.set("A1", "=A2");
    h.set("A2", "=A3");
    let err = h.try_set("A3", "=E5+A1").unwrap_err();
    assert_eq!(cycle_path(err), vec!["A3", "A1", "A2", "A3"]);

    assert_eq!(h.text("A3"), "");
    assert!(!h.exists("E5"));
    assert_eq!(h.sheet.len(), 3);
}

#[test]
fn test_rejected_edit_keeps_old_formula_and_value() {
    let mut h = TestHarness::new();
    h.set("A1", "1");
    h.set("B1", "=A1+1");
    h.set("C1", "=B1+1");
    h.set("A1", "=Z1");
    assert_eq!(h.value("C1"), common::num(2.0));

    assert!(h.try_set("A1", "=C1").is_err());
    assert_eq!(h.text("A1"), "=Z1");
    assert_eq!(h.precedents("A1"), vec![pos("Z1")]);
    assert_eq!(h.dependents("C1"), Vec::new());
    assert_eq!(h.value("C1"), common::num(2.0));
    assert!(h.is_cached("C1"));
}

#[test]
fn test_shared_upstream_is_not_a_cycle() {
    let mut h = TestHarness::new();
    h.set("A1", "1");
    h.set("B1", "=A1");
    h.set("B2", "=A1");
    h.set("C1", "=B1+B2+A1");
    assert_eq!(h.value("C1"), common::num(3.0));
}

#[test]
fn test_cycle_error_message() {
    let mut h = TestHarness::new();
    h.set("A1", "=B1");
    let err = h.try_set("B1", "=A1").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Circular reference detected at B1: B1 -> A1 -> B1"
    );
}
