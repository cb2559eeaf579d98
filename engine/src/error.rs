//! FILENAME: engine/src/error.rs

use sheet_parser::ParseError;
use thiserror::Error;

use crate::dependency_graph::CycleError;
use crate::position::Position;

/// Failures of a sheet operation. Each one leaves the sheet exactly as it
/// was before the call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SheetError {
    #[error("Invalid position: (row {}, col {})", .0.row, .0.col)]
    InvalidPosition(Position),

    #[error("Formula syntax error: {0}")]
    FormulaSyntax(#[from] ParseError),

    #[error("{0}")]
    CircularDependency(#[from] CycleError),
}

pub type SheetResult<T> = Result<T, SheetError>;
