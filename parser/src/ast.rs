//! FILENAME: parser/src/ast.rs
//! PURPOSE: Defines the Abstract Syntax Tree (AST) for formula expressions.
//! CONTEXT: After the Lexer tokenizes a formula string, the Parser converts
//! those tokens into this tree structure. The engine traverses the tree to
//! compute results and to collect the cells a formula reads.
//!
//! The `Display` impl prints the canonical form of an expression: no
//! whitespace and only the parentheses needed to reproduce the same tree.

use std::fmt;

/// Represents a parsed formula expression.
#[derive(Debug, PartialEq, Clone)]
pub enum Expression {
    /// A numeric literal.
    Number(f64),

    /// A single cell reference like A1 or AA100.
    /// The column is stored as letters (e.g., "A", "AA") and the row as the
    /// 1-based number written in the formula. Whether the reference points
    /// inside the grid is decided by the engine, not here.
    CellRef { col: String, row: u32 },

    /// A binary operation: left op right (e.g., A1 + 3).
    BinaryOp {
        left: Box<Expression>,
        op: BinaryOperator,
        right: Box<Expression>,
    },

    /// A unary operation: op operand (e.g., -5).
    UnaryOp {
        op: UnaryOperator,
        operand: Box<Expression>,
    },
}

/// Binary operators for expressions.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BinaryOperator {
    Add,      // +
    Subtract, // -
    Multiply, // *
    Divide,   // /
}

/// Unary operators.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum UnaryOperator {
    Plus,   // +
    Negate, // -
}

impl BinaryOperator {
    /// Binding strength; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOperator::Add | BinaryOperator::Subtract => 1,
            BinaryOperator::Multiply | BinaryOperator::Divide => 2,
        }
    }

    /// True when `a op (b op' c)` differs from `a op b op' c` for operators
    /// of equal precedence.
    fn is_right_sensitive(self) -> bool {
        matches!(self, BinaryOperator::Subtract | BinaryOperator::Divide)
    }
}

impl Expression {
    /// Iterates over every cell reference in the expression, left to right.
    pub fn cell_refs(&self) -> Vec<(&str, u32)> {
        let mut refs = Vec::new();
        self.collect_cell_refs(&mut refs);
        refs
    }

    fn collect_cell_refs<'a>(&'a self, out: &mut Vec<(&'a str, u32)>) {
        match self {
            Expression::Number(_) => {}
            Expression::CellRef { col, row } => out.push((col.as_str(), *row)),
            Expression::BinaryOp { left, right, .. } => {
                left.collect_cell_refs(out);
                right.collect_cell_refs(out);
            }
            Expression::UnaryOp { operand, .. } => operand.collect_cell_refs(out),
        }
    }

    fn binary_precedence(&self) -> Option<u8> {
        match self {
            Expression::BinaryOp { op, .. } => Some(op.precedence()),
            _ => None,
        }
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, expr: &Expression, parens: bool) -> fmt::Result {
    if parens {
        write!(f, "({})", expr)
    } else {
        write!(f, "{}", expr)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Number(n) => write!(f, "{}", n),
            Expression::CellRef { col, row } => write!(f, "{}{}", col, row),
            Expression::BinaryOp { left, op, right } => {
                let prec = op.precedence();
                let left_parens = left.binary_precedence().is_some_and(|p| p < prec);
                let right_parens = right.binary_precedence().is_some_and(|p| {
                    p < prec || (p == prec && op.is_right_sensitive())
                });
                write_operand(f, left, left_parens)?;
                write!(f, "{}", op)?;
                write_operand(f, right, right_parens)
            }
            Expression::UnaryOp { op, operand } => {
                write!(f, "{}", op)?;
                write_operand(f, operand, operand.binary_precedence().is_some())
            }
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinaryOperator::Add => write!(f, "+"),
            BinaryOperator::Subtract => write!(f, "-"),
            BinaryOperator::Multiply => write!(f, "*"),
            BinaryOperator::Divide => write!(f, "/"),
        }
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOperator::Plus => write!(f, "+"),
            UnaryOperator::Negate => write!(f, "-"),
        }
    }
}
