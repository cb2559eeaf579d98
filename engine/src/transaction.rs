//! FILENAME: engine/src/transaction.rs
//! PURPOSE: Per-call log of cell records created during one edit.
//! CONTEXT: A single `set_cell` may create the edited record itself and
//! placeholder records for positions its formula references. All of them
//! are logged in one transaction scoped to the top-level call, so a
//! rejected edit can delete exactly what it created and nothing else.

use log::debug;

use crate::cell::CellId;
use crate::grid::Grid;
use crate::position::Position;

#[derive(Debug)]
pub struct Transaction {
    /// Human-readable description (e.g., "set B2")
    description: String,
    /// Records created by this call, in creation order
    created: Vec<(CellId, Position)>,
}

impl Transaction {
    pub fn new(description: impl Into<String>) -> Self {
        Transaction {
            description: description.into(),
            created: Vec::new(),
        }
    }

    pub(crate) fn record_created(&mut self, id: CellId, pos: Position) {
        self.created.push((id, pos));
    }

    pub fn created_count(&self) -> usize {
        self.created.len()
    }

    pub fn is_empty(&self) -> bool {
        self.created.is_empty()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Deletes every record this transaction created. Edges among the
    /// created records are dropped first so no handle dangles mid-way.
    pub(crate) fn rollback(self, grid: &mut Grid) {
        for &(id, _) in &self.created {
            grid.unlink_precedents(id);
        }
        for &(id, pos) in self.created.iter().rev() {
            debug_assert!(
                !grid[id].is_referenced(),
                "rolled back record {} still has dependents",
                pos
            );
            grid.remove(id);
        }
        debug!(
            "rolled back '{}': removed {} record(s)",
            self.description,
            self.created.len()
        );
    }
}
