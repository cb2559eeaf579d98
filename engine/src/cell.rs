//! FILENAME: engine/src/cell.rs
//! PURPOSE: Defines the data structures for a single spreadsheet cell.
//! CONTEXT: This file contains the `Cell` record, its `CellContent` and the
//! `CellValue` results. A cell separates what the user typed (its content,
//! which may hold a memoized formula result) from its place in the
//! dependency graph (precedent and dependent handles into the grid arena).

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use sheet_parser::ParseError;
use std::fmt;

use crate::config::SheetConfig;
use crate::formula::Formula;
use crate::position::Position;

/// Leading character that turns the rest of the text into a formula.
pub const FORMULA_SIGN: char = '=';
/// Leading character that forces the rest of the text to be read as text.
pub const ESCAPE_SIGN: char = '\'';

/// Represents the errors a formula can evaluate to (e.g., #DIV/0!).
/// These are values, not failures: they flow through arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormulaError {
    Ref,   // Reference outside the grid
    Value, // Operand is not a number
    Div0,  // Division by zero or overflow
}

impl FormulaError {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormulaError::Ref => "#REF!",
            FormulaError::Value => "#VALUE!",
            FormulaError::Div0 => "#DIV/0!",
        }
    }
}

impl fmt::Display for FormulaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents the calculated result of a cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Error(FormulaError),
}

impl CellValue {
    pub fn empty() -> Self {
        CellValue::Text(String::new())
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Error(e) => write!(f, "{}", e),
        }
    }
}

/// Handle of a cell record inside the grid arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(pub(crate) usize);

/// What a cell holds.
#[derive(Debug, Default)]
pub enum CellContent {
    #[default]
    Empty,
    /// Raw text as typed, escape sign included.
    Text(String),
    Formula(Formula),
}

impl CellContent {
    /// Builds content from user input. Only a malformed formula fails.
    ///
    /// - "" is Empty
    /// - "=" followed by at least one character is a Formula
    /// - anything else (including a lone "=") is Text
    pub fn from_text(text: &str, limits: &SheetConfig) -> Result<CellContent, ParseError> {
        if text.is_empty() {
            return Ok(CellContent::Empty);
        }
        match text.strip_prefix(FORMULA_SIGN) {
            Some(body) if !body.is_empty() => {
                Ok(CellContent::Formula(Formula::parse_within(body, limits)?))
            }
            _ => Ok(CellContent::Text(text.to_string())),
        }
    }

    /// Current value. Formulas read other cells through `lookup`.
    pub fn value(&self, lookup: &dyn Fn(Position) -> CellValue) -> CellValue {
        match self {
            CellContent::Empty => CellValue::empty(),
            CellContent::Text(raw) => {
                let shown = raw.strip_prefix(ESCAPE_SIGN).unwrap_or(raw);
                CellValue::Text(shown.to_string())
            }
            CellContent::Formula(formula) => formula.evaluate(lookup).into(),
        }
    }

    /// Canonical text form: what the user would have to type to get this content.
    pub fn text(&self) -> String {
        match self {
            CellContent::Empty => String::new(),
            CellContent::Text(raw) => raw.clone(),
            CellContent::Formula(formula) => format!("{}{}", FORMULA_SIGN, formula.expression()),
        }
    }

    /// Positions this content reads, deduplicated and sorted.
    pub fn referenced_cells(&self) -> &[Position] {
        match self {
            CellContent::Formula(formula) => formula.referenced_cells(),
            CellContent::Empty | CellContent::Text(_) => &[],
        }
    }

    /// Drops a memoized result. Returns true only if there was one to drop.
    pub fn invalidate_cache(&mut self) -> bool {
        match self {
            CellContent::Formula(formula) => formula.invalidate_cache(),
            CellContent::Empty | CellContent::Text(_) => false,
        }
    }

    pub fn has_cache(&self) -> bool {
        matches!(self, CellContent::Formula(formula) if formula.has_cache())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellContent::Empty)
    }
}

/// The atomic unit of the spreadsheet.
/// Precedents are the cells this one reads, dependents the cells reading it.
/// Both sets are relations between records owned by the grid, never ownership.
#[derive(Debug)]
pub struct Cell {
    pub(crate) position: Position,
    pub(crate) content: CellContent,
    pub(crate) precedents: FxHashSet<CellId>,
    pub(crate) dependents: FxHashSet<CellId>,
}

impl Cell {
    pub fn new(position: Position) -> Self {
        Cell {
            position,
            content: CellContent::Empty,
            precedents: FxHashSet::default(),
            dependents: FxHashSet::default(),
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn content(&self) -> &CellContent {
        &self.content
    }

    pub fn precedents(&self) -> &FxHashSet<CellId> {
        &self.precedents
    }

    pub fn dependents(&self) -> &FxHashSet<CellId> {
        &self.dependents
    }

    pub fn is_referenced(&self) -> bool {
        !self.dependents.is_empty()
    }

    /// Whether the cell counts towards the printable area.
    pub fn is_populated(&self) -> bool {
        !self.content.is_empty() || self.is_referenced()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(text: &str) -> CellContent {
        CellContent::from_text(text, &SheetConfig::default()).unwrap()
    }

    fn no_cells(_: Position) -> CellValue {
        CellValue::empty()
    }

    #[test]
    fn empty_text_is_empty_content() {
        let c = content("");
        assert!(c.is_empty());
        assert_eq!(c.text(), "");
        assert_eq!(c.value(&no_cells), CellValue::Text(String::new()));
        assert!(c.referenced_cells().is_empty());
    }

    #[test]
    fn plain_text_keeps_value_and_text() {
        let c = content("hello");
        assert_eq!(c.text(), "hello");
        assert_eq!(c.value(&no_cells), CellValue::Text("hello".to_string()));
    }

    #[test]
    fn escape_sign_is_hidden_from_value() {
        let c = content("'=1+2");
        assert_eq!(c.text(), "'=1+2");
        assert_eq!(c.value(&no_cells), CellValue::Text("=1+2".to_string()));
    }

    #[test]
    fn lone_formula_sign_is_text() {
        let c = content("=");
        assert!(matches!(c, CellContent::Text(_)));
        assert_eq!(c.value(&no_cells), CellValue::Text("=".to_string()));
    }

    #[test]
    fn formula_text_is_canonical() {
        let c = content("=(1 + 2)");
        assert_eq!(c.text(), "=1+2");
        assert_eq!(c.value(&no_cells), CellValue::Number(3.0));
    }

    #[test]
    fn malformed_formula_fails() {
        assert!(CellContent::from_text("=1+", &SheetConfig::default()).is_err());
    }

    #[test]
    fn text_never_has_cache_to_clear() {
        let mut c = content("abc");
        assert!(!c.invalidate_cache());
        let mut empty = CellContent::Empty;
        assert!(!empty.invalidate_cache());
    }

    #[test]
    fn formula_cache_clears_once() {
        let mut c = content("=2*3");
        assert!(!c.invalidate_cache());
        c.value(&no_cells);
        assert!(c.has_cache());
        assert!(c.invalidate_cache());
        assert!(!c.invalidate_cache());
    }

    #[test]
    fn error_display_codes() {
        assert_eq!(FormulaError::Ref.to_string(), "#REF!");
        assert_eq!(FormulaError::Value.to_string(), "#VALUE!");
        assert_eq!(FormulaError::Div0.to_string(), "#DIV/0!");
    }

    #[test]
    fn value_display() {
        assert_eq!(CellValue::Number(3.0).to_string(), "3");
        assert_eq!(CellValue::Number(0.5).to_string(), "0.5");
        assert_eq!(CellValue::Error(FormulaError::Div0).to_string(), "#DIV/0!");
    }
}
