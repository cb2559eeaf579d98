//! FILENAME: tests/test_config.rs
//! Integration tests for sheet limits and JSON round trips.

mod common;

use common::{num, pos, TestHarness};
use sheet_engine::{CellValue, FormulaError, Position, SheetConfig, SheetError, Size};

#[test]
fn test_limits_reject_positions() {
    let mut h = TestHarness::with_limits(10, 3);
    h.set("C10", "ok");
    assert_eq!(
        h.sheet.set_cell(pos("D1"), "x"),
        Err(SheetError::InvalidPosition(pos("D1")))
    );
    assert_eq!(
        h.sheet.set_cell(pos("A11"), "x"),
        Err(SheetError::InvalidPosition(pos("A11")))
    );
}

#[test]
fn test_reference_beyond_limits_is_ref_error() {
    let mut h = TestHarness::with_limits(10, 3);
    h.set("A1", "=D1+1");
    h.set("A2", "=C10+1");
    assert_eq!(h.value("A1"), CellValue::Error(FormulaError::Ref));
    assert_eq!(h.value("A2"), num(1.0));
    assert!(h.precedents("A1").is_empty());
    assert_eq!(h.sheet.len(), 3);
}

#[test]
fn test_config_is_clamped() {
    let config = SheetConfig::new(0, Position::MAX_COLS + 10);
    assert_eq!(config.max_rows, 1);
    assert_eq!(config.max_cols, Position::MAX_COLS);
}

#[test]
fn test_config_from_json() {
    let config = SheetConfig::from_json(r#"{"max_rows": 100}"#).unwrap();
    assert_eq!(config.max_rows, 100);
    assert_eq!(config.max_cols, Position::MAX_COLS);

    assert!(SheetConfig::from_json("not json").is_err());
}

#[test]
fn test_values_serialize_to_json() {
    let values = vec![
        CellValue::Number(1.5),
        CellValue::Text("hi".to_string()),
        CellValue::Error(FormulaError::Div0),
    ];
    let json = serde_json::to_string(&values).unwrap();
    let back: Vec<CellValue> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, values);

    let size: Size = serde_json::from_str(r#"{"rows": 2, "cols": 3}"#).unwrap();
    assert_eq!(size, Size { rows: 2, cols: 3 });
    assert_eq!(serde_json::to_string(&pos("B3")).unwrap(), r#"{"row":2,"col":1}"#);
}
