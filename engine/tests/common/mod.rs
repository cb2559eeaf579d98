//! FILENAME: tests/common/mod.rs
//! Test harness and fixtures for sheet engine integration tests.

#![allow(dead_code)]

use sheet_engine::{CellValue, Position, Sheet, SheetConfig, SheetResult};

/// Parses an A1 reference, panicking on malformed test input.
pub fn pos(a1: &str) -> Position {
    let p = Position::from_a1(a1);
    assert!(p.is_valid(), "bad test reference {:?}", a1);
    p
}

pub fn num(n: f64) -> CellValue {
    CellValue::Number(n)
}

pub fn text(s: &str) -> CellValue {
    CellValue::Text(s.to_string())
}

/// Test harness wrapping a sheet with A1-addressed helpers.
pub struct TestHarness {
    pub sheet: Sheet,
}

impl TestHarness {
    /// Create a new test harness with an empty sheet.
    pub fn new() -> Self {
        TestHarness {
            sheet: Sheet::new(),
        }
    }

    /// Create a harness on a sheet limited to `rows` x `cols`.
    pub fn with_limits(rows: i32, cols: i32) -> Self {
        TestHarness {
            sheet: Sheet::with_config(SheetConfig::new(rows, cols)),
        }
    }

    /// Create a harness with a small chain: A1 = 1, A2 = A1+1, A3 = A2+1.
    pub fn with_chain() -> Self {
        let mut harness = Self::new();
        harness.set("A1", "1");
        harness.set("A2", "=A1+1");
        harness.set("A3", "=A2+1");
        harness
    }

    /// Create a harness with a diamond: A1 feeds B1 and B2, both feed C1.
    pub fn with_diamond() -> Self {
        let mut harness = Self::new();
        harness.set("A1", "2");
        harness.set("B1", "=A1*10");
        harness.set("B2", "=A1+1");
        harness.set("C1", "=B1+B2");
        harness
    }

    /// Sets a cell, panicking if the sheet rejects it.
    pub fn set(&mut self, a1: &str, input: &str) {
        if let Err(err) = self.sheet.set_cell(pos(a1), input) {
            panic!("set {} to {:?} failed: {}", a1, input, err);
        }
    }

    pub fn try_set(&mut self, a1: &str, input: &str) -> SheetResult<()> {
        self.sheet.set_cell(pos(a1), input)
    }

    pub fn clear(&mut self, a1: &str) {
        self.sheet.clear_cell(pos(a1)).expect("clear failed");
    }

    pub fn exists(&self, a1: &str) -> bool {
        self.sheet.get_cell(pos(a1)).expect("valid position").is_some()
    }

    /// Text of a cell; panics if no record exists.
    pub fn text(&self, a1: &str) -> String {
        self.sheet
            .get_cell(pos(a1))
            .expect("valid position")
            .unwrap_or_else(|| panic!("no cell at {}", a1))
            .text()
    }

    /// Value of a cell; panics if no record exists.
    pub fn value(&self, a1: &str) -> CellValue {
        self.sheet
            .get_cell(pos(a1))
            .expect("valid position")
            .unwrap_or_else(|| panic!("no cell at {}", a1))
            .value()
    }

    pub fn is_cached(&self, a1: &str) -> bool {
        self.sheet
            .get_cell(pos(a1))
            .expect("valid position")
            .is_some_and(|cell| cell.is_cached())
    }

    pub fn dependents(&self, a1: &str) -> Vec<Position> {
        self.sheet
            .get_cell(pos(a1))
            .expect("valid position")
            .map(|cell| cell.dependents())
            .unwrap_or_default()
    }

    pub fn precedents(&self, a1: &str) -> Vec<Position> {
        self.sheet
            .get_cell(pos(a1))
            .expect("valid position")
            .map(|cell| cell.precedents())
            .unwrap_or_default()
    }
}
