//! FILENAME: parser/src/lib.rs
//! PURPOSE: Library root for the cell formula parser.
//! CONTEXT: This crate turns the source of a formula (the text after the
//! leading '=') into an expression tree, and prints that tree back in its
//! canonical form. It knows nothing about sheets or cell storage.
//!
//! PIPELINE: Formula String --> Lexer --> Tokens --> Parser --> AST
//!
//! SUPPORTED FEATURES:
//! - Arithmetic: +, -, *, /
//! - Unary plus and minus: -A1, +5
//! - Number literals: 1, 2.5, .5, 1e10, 3.2E-4
//! - Cell references: A1, AA100
//! - Parentheses for grouping

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod token;


pub use ast::{BinaryOperator, Expression, UnaryOperator};
pub use lexer::Lexer;
pub use parser::{parse, ParseError, ParseResult, Parser, MAX_DEPTH};
pub use token::Token;
