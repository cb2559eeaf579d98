//! FILENAME: engine/src/dependency_graph.rs
//! PURPOSE: Maintains precedent/dependent edges and rejects cyclic edits.
//! CONTEXT: Edges live on the cell records themselves as `CellId` sets.
//! This module keeps the two directions symmetric and checks, before an
//! edit is committed, that the new edges cannot close a cycle.
//!
//! TERMINOLOGY:
//! - Precedents: Cells that a formula cell references (its inputs).
//!   If A3 = A1 + A2, then A1 and A2 are precedents of A3.
//! - Dependents: Cells that reference a given cell (reverse lookup).
//!   If A3 = A1 + A2, then A3 is a dependent of A1 and A2.
//!
//! USAGE:
//! 1. Build a `CycleValidator` for the edited position and call `validate()`
//!    with the candidate's referenced positions. It only reads the grid.
//! 2. On success, `unlink_precedents()` the edited cell and `link()` it to
//!    each new precedent.

use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt;

use crate::cell::CellId;
use crate::grid::Grid;
use crate::position::Position;

/// Error type for cycle detection.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleError {
    /// The cell whose edit was rejected.
    pub origin: Position,
    /// The cycle that the edit would close, starting and ending at `origin`.
    pub cycle_path: Vec<Position>,
}

impl fmt::Display for CycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Circular reference detected at {}: ", self.origin)?;
        for (i, pos) in self.cycle_path.iter().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{}", pos)?;
        }
        Ok(())
    }
}

impl std::error::Error for CycleError {}

/// Read-only walk over existing precedent edges.
/// One visited set is shared by every target of a single edit, so a
/// subgraph already proven not to reach the origin is never walked twice.
pub struct CycleValidator<'g> {
    grid: &'g Grid,
    origin: Position,
    visited: FxHashSet<Position>,
}

impl<'g> CycleValidator<'g> {
    pub fn new(grid: &'g Grid, origin: Position) -> Self {
        CycleValidator {
            grid,
            origin,
            visited: FxHashSet::default(),
        }
    }

    /// Checks that making `origin` read every position in `targets`
    /// keeps the graph acyclic.
    pub fn validate(&mut self, targets: &[Position]) -> Result<(), CycleError> {
        for &target in targets {
            self.walk(target)?;
        }
        Ok(())
    }

    /// Depth-first search from `start` along precedent edges.
    /// Positions without a record have no precedents.
    fn walk(&mut self, start: Position) -> Result<(), CycleError> {
        if !self.visited.insert(start) {
            return Ok(());
        }

        let mut parent: FxHashMap<Position, Position> = FxHashMap::default();
        let mut stack = vec![start];

        while let Some(current) = stack.pop() {
            if current == self.origin {
                return Err(self.cycle_error(&parent, current));
            }

            let Some(cell) = self.grid.cell_at(current) else {
                continue;
            };
            for &prec_id in cell.precedents() {
                let prec = self.grid[prec_id].position();
                if self.visited.insert(prec) {
                    parent.insert(prec, current);
                    stack.push(prec);
                }
            }
        }

        Ok(())
    }

    /// Rebuilds origin -> start -> ... -> origin from the DFS parents.
    fn cycle_error(&self, parent: &FxHashMap<Position, Position>, end: Position) -> CycleError {
        let mut chain = vec![end];
        let mut current = end;
        while let Some(&prev) = parent.get(&current) {
            chain.push(prev);
            current = prev;
        }
        chain.push(self.origin);
        chain.reverse();

        CycleError {
            origin: self.origin,
            cycle_path: chain,
        }
    }
}

impl Grid {
    /// Records that `dependent` reads `precedent`, in both directions.
    pub(crate) fn link(&mut self, dependent: CellId, precedent: CellId) {
        self[dependent].precedents.insert(precedent);
        self[precedent].dependents.insert(dependent);
    }

    /// Drops every outgoing edge of `cell` and the matching back-references.
    pub(crate) fn unlink_precedents(&mut self, cell: CellId) {
        let precedents = std::mem::take(&mut self[cell].precedents);
        for prec in precedents {
            self[prec].dependents.remove(&cell);
        }
    }

    /// Positions of the cells `cell` reads, sorted.
    pub fn precedent_positions(&self, cell: CellId) -> Vec<Position> {
        let mut positions: Vec<Position> = self[cell]
            .precedents()
            .iter()
            .map(|&id| self[id].position())
            .collect();
        positions.sort_unstable();
        positions
    }

    /// Positions of the cells reading `cell`, sorted.
    pub fn dependent_positions(&self, cell: CellId) -> Vec<Position> {
        let mut positions: Vec<Position> = self[cell]
            .dependents()
            .iter()
            .map(|&id| self[id].position())
            .collect();
        positions.sort_unstable();
        positions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::Transaction;

    fn coord(row: i32, col: i32) -> Position {
        Position::new(row, col)
    }

    /// Makes `cell` read every position in `precedents`, creating records as needed.
    fn set_dependencies(grid: &mut Grid, cell: Position, precedents: &[Position]) {
        let mut tx = Transaction::new("test");
        let id = grid.resolve_or_create(cell, &mut tx);
        grid.unlink_precedents(id);
        for &prec in precedents {
            let prec_id = grid.resolve_or_create(prec, &mut tx);
            grid.link(id, prec_id);
        }
    }

    fn would_create_cycle(grid: &Grid, cell: Position, precedents: &[Position]) -> bool {
        CycleValidator::new(grid, cell).validate(precedents).is_err()
    }

    #[test]
    fn test_link_is_symmetric() {
        let mut grid = Grid::new();
        let (a1, a2, a3) = (coord(0, 0), coord(1, 0), coord(2, 0));

        // A3 = A1 + A2
        set_dependencies(&mut grid, a3, &[a1, a2]);

        let a3_id = grid.id_at(a3).unwrap();
        let a1_id = grid.id_at(a1).unwrap();
        assert_eq!(grid.precedent_positions(a3_id), vec![a1, a2]);
        assert_eq!(grid.dependent_positions(a1_id), vec![a3]);
    }

    #[test]
    fn test_relink_drops_old_edges() {
        let mut grid = Grid::new();
        let (a1, a2, a3, b1) = (coord(0, 0), coord(1, 0), coord(2, 0), coord(0, 1));

        set_dependencies(&mut grid, a3, &[a1, a2]);
        set_dependencies(&mut grid, a3, &[b1]);

        let a3_id = grid.id_at(a3).unwrap();
        assert_eq!(grid.precedent_positions(a3_id), vec![b1]);
        assert!(!grid.cell_at(a1).unwrap().is_referenced());
        assert!(!grid.cell_at(a2).unwrap().is_referenced());
        assert_eq!(grid.dependent_positions(grid.id_at(b1).unwrap()), vec![a3]);
    }

    #[test]
    fn test_cycle_detection_self_reference() {
        let grid = Grid::new();
        let a1 = coord(0, 0);

        let err = CycleValidator::new(&grid, a1).validate(&[a1]).unwrap_err();
        assert_eq!(err.cycle_path, vec![a1, a1]);
    }

    #[test]
    fn test_cycle_detection_simple() {
        let mut grid = Grid::new();
        let (a1, a2) = (coord(0, 0), coord(1, 0));

        // A2 = A1
        set_dependencies(&mut grid, a2, &[a1]);

        // Now if A1 = A2, that's a cycle
        assert!(would_create_cycle(&grid, a1, &[a2]));
    }

    #[test]
    fn test_cycle_detection_transitive() {
        let mut grid = Grid::new();
        let (a1, a2, a3) = (coord(0, 0), coord(1, 0), coord(2, 0));

        set_dependencies(&mut grid, a2, &[a1]);
        set_dependencies(&mut grid, a3, &[a2]);

        // If A1 = A3, that creates A1 -> A3 -> A2 -> A1
        let err = CycleValidator::new(&grid, a1).validate(&[a3]).unwrap_err();
        assert_eq!(err.cycle_path, vec![a1, a3, a2, a1]);
        assert_eq!(err.to_string(), "Circular reference detected at A1: A1 -> A3 -> A2 -> A1");
    }

    #[test]
    fn test_no_false_positive_cycle() {
        let mut grid = Grid::new();
        let (a1, a2, b1) = (coord(0, 0), coord(1, 0), coord(0, 1));

        set_dependencies(&mut grid, a2, &[a1]);

        assert!(!would_create_cycle(&grid, b1, &[a1]));
        assert!(!would_create_cycle(&grid, b1, &[a2]));
        assert!(!would_create_cycle(&grid, b1, &[a1, a2]));
    }

    #[test]
    fn test_shared_subgraph_is_walked_once() {
        let mut grid = Grid::new();
        let (a1, a2, a3, b1) = (coord(0, 0), coord(1, 0), coord(2, 0), coord(0, 1));

        // A3 = A2, A2 = A1. Both targets share the A2 -> A1 chain.
        set_dependencies(&mut grid, a2, &[a1]);
        set_dependencies(&mut grid, a3, &[a2]);

        let mut validator = CycleValidator::new(&grid, b1);
        assert!(validator.validate(&[a3, a2]).is_ok());
        assert_eq!(validator.visited.len(), 3);
    }

    #[test]
    fn test_validation_does_not_touch_grid() {
        let mut grid = Grid::new();
        let (a1, b1) = (coord(0, 0), coord(0, 1));
        set_dependencies(&mut grid, a1, &[b1]);
        let before = grid.len();

        assert!(would_create_cycle(&grid, b1, &[a1, coord(9, 9)]));
        assert_eq!(grid.len(), before);
        assert!(grid.cell_at(coord(9, 9)).is_none());
    }
}
