//! FILENAME: engine/src/lib.rs
//! PURPOSE: Main library entry point for the reactive sheet engine.
//! CONTEXT: Re-exports public types and modules for use by other crates.

pub mod cell;
pub mod config;
pub mod dependency_graph;
pub mod error;
pub mod evaluator;
pub mod formula;
pub mod grid;
pub mod invalidation;
pub mod position;
pub mod sheet;
pub mod transaction;

// Re-export commonly used types at the crate root
pub use cell::{Cell, CellContent, CellId, CellValue, FormulaError, ESCAPE_SIGN, FORMULA_SIGN};
pub use config::SheetConfig;
pub use dependency_graph::{CycleError, CycleValidator};
pub use error::{SheetError, SheetResult};
pub use evaluator::Evaluator;
pub use formula::{Formula, FormulaValue};
pub use grid::Grid;
pub use position::{col_to_index, index_to_col, Position, Size};
pub use sheet::{CellMut, CellView, Sheet};
pub use transaction::Transaction;
