//! FILENAME: engine/src/evaluator.rs
//! PURPOSE: Evaluates formula ASTs to numbers.
//! CONTEXT: After a formula is parsed into an AST, this module traverses
//! the tree and computes the result. Cell values are obtained through a
//! lookup callback so the evaluator never touches sheet storage directly.
//!
//! COERCION RULES for a referenced cell:
//! - Number: used as is
//! - Empty text: 0
//! - Text that is a number literal, optionally after leading whitespace:
//!   that number. Trailing characters of any kind give #VALUE!
//! - Any other text: #VALUE!
//! - Error: propagated unchanged
//!
//! Any error operand makes the whole expression an error. Division by zero
//! and non-finite results are #DIV/0!.

use sheet_parser::{BinaryOperator, Expression, UnaryOperator};

use crate::cell::{CellValue, FormulaError};
use crate::formula::FormulaValue;
use crate::position::Position;

/// The formula evaluator.
/// Holds the callback used to read referenced cells.
pub struct Evaluator<'a> {
    lookup: &'a dyn Fn(Position) -> CellValue,
}

impl<'a> Evaluator<'a> {
    pub fn new(lookup: &'a dyn Fn(Position) -> CellValue) -> Self {
        Evaluator { lookup }
    }

    /// Evaluates an AST expression and returns the result.
    pub fn evaluate(&self, expr: &Expression) -> FormulaValue {
        self.eval(expr).into()
    }

    fn eval(&self, expr: &Expression) -> Result<f64, FormulaError> {
        match expr {
            Expression::Number(n) => Ok(*n),
            Expression::CellRef { col, row } => self.eval_cell_ref(col, *row),
            Expression::BinaryOp { left, op, right } => self.eval_binary_op(left, *op, right),
            Expression::UnaryOp { op, operand } => self.eval_unary_op(*op, operand),
        }
    }

    /// Evaluates a cell reference by asking the lookup for its value.
    fn eval_cell_ref(&self, col: &str, row: u32) -> Result<f64, FormulaError> {
        let pos = Position::from_parts(col, i64::from(row));
        if !pos.is_valid() {
            return Err(FormulaError::Ref);
        }
        cell_value_to_number((self.lookup)(pos))
    }

    fn eval_binary_op(
        &self,
        left: &Expression,
        op: BinaryOperator,
        right: &Expression,
    ) -> Result<f64, FormulaError> {
        let l = self.eval(left)?;
        let r = self.eval(right)?;

        let result = match op {
            BinaryOperator::Add => l + r,
            BinaryOperator::Subtract => l - r,
            BinaryOperator::Multiply => l * r,
            BinaryOperator::Divide => {
                if r == 0.0 {
                    return Err(FormulaError::Div0);
                }
                l / r
            }
        };

        if result.is_finite() {
            Ok(result)
        } else {
            Err(FormulaError::Div0)
        }
    }

    fn eval_unary_op(&self, op: UnaryOperator, operand: &Expression) -> Result<f64, FormulaError> {
        let value = self.eval(operand)?;
        match op {
            UnaryOperator::Plus => Ok(value),
            UnaryOperator::Negate => Ok(-value),
        }
    }
}

/// Converts a referenced cell's value to a number.
fn cell_value_to_number(value: CellValue) -> Result<f64, FormulaError> {
    match value {
        CellValue::Number(n) => Ok(n),
        CellValue::Error(e) => Err(e),
        CellValue::Text(s) if s.is_empty() => Ok(0.0),
        CellValue::Text(s) => match s.trim_start().parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(n),
            _ => Err(FormulaError::Value),
        },
    }
}
