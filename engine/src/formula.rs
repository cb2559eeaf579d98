//! FILENAME: engine/src/formula.rs
//! PURPOSE: A parsed formula together with its memoized result.
//! CONTEXT: This is the bridge between the parser crate and the cell graph.
//! A `Formula` knows its canonical text, the positions it reads and how to
//! evaluate itself through a lookup callback. The first evaluation is
//! memoized; the sheet clears the memo whenever a precedent changes.

use once_cell::unsync::OnceCell;
use sheet_parser::{Expression, ParseError};

use crate::cell::{CellValue, FormulaError};
use crate::config::SheetConfig;
use crate::evaluator::Evaluator;
use crate::position::Position;

/// Result of evaluating a formula: a number or a formula error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormulaValue {
    Number(f64),
    Error(FormulaError),
}

impl From<FormulaValue> for CellValue {
    fn from(value: FormulaValue) -> Self {
        match value {
            FormulaValue::Number(n) => CellValue::Number(n),
            FormulaValue::Error(e) => CellValue::Error(e),
        }
    }
}

impl From<Result<f64, FormulaError>> for FormulaValue {
    fn from(result: Result<f64, FormulaError>) -> Self {
        match result {
            Ok(n) => FormulaValue::Number(n),
            Err(e) => FormulaValue::Error(e),
        }
    }
}

#[derive(Debug)]
pub struct Formula {
    ast: Expression,
    references: Vec<Position>,
    cache: OnceCell<FormulaValue>,
}

impl Formula {
    /// Parses a formula body (the text after '=') against the full grid.
    pub fn parse(source: &str) -> Result<Formula, ParseError> {
        Formula::parse_within(source, &SheetConfig::default())
    }

    /// Parses a formula body. References outside `limits` stay in the text
    /// but are not reported as referenced cells.
    pub fn parse_within(source: &str, limits: &SheetConfig) -> Result<Formula, ParseError> {
        let ast = sheet_parser::parse(source)?;

        let mut references: Vec<Position> = ast
            .cell_refs()
            .into_iter()
            .map(|(col, row)| Position::from_parts(col, i64::from(row)))
            .filter(|pos| limits.contains(*pos))
            .collect();
        references.sort_unstable();
        references.dedup();

        Ok(Formula {
            ast,
            references,
            cache: OnceCell::new(),
        })
    }

    /// Evaluates the formula, or returns the memoized result.
    pub fn evaluate(&self, lookup: &dyn Fn(Position) -> CellValue) -> FormulaValue {
        if let Some(cached) = self.cache.get() {
            return *cached;
        }
        let value = Evaluator::new(lookup).evaluate(&self.ast);
        // Evaluation never re-enters this formula (the graph is acyclic),
        // so the cell is still unset here.
        let _ = self.cache.set(value);
        value
    }

    /// Canonical expression text, without the leading '='.
    pub fn expression(&self) -> String {
        self.ast.to_string()
    }

    pub fn referenced_cells(&self) -> &[Position] {
        &self.references
    }

    /// Drops the memoized result. Returns true if one existed.
    pub fn invalidate_cache(&mut self) -> bool {
        self.cache.take().is_some()
    }

    pub fn has_cache(&self) -> bool {
        self.cache.get().is_some()
    }
}
