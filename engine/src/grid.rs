//! FILENAME: engine/src/grid.rs
//! PURPOSE: Storage for the cell records of one sheet.
//! CONTEXT: Cells live in an arena addressed by `CellId`, so dependency
//! edges stay valid no matter how the position index is reorganized.
//! A sparse row -> column -> id index maps coordinates to records.
//! The grid also tracks the printable bounding rectangle.

use std::collections::BTreeMap;
use std::ops::{Index, IndexMut};

use crate::cell::{Cell, CellId};
use crate::position::{Position, Size};
use crate::transaction::Transaction;

#[derive(Debug, Default)]
pub struct Grid {
    /// Arena slots; `None` marks a freed slot waiting in `free`.
    cells: Vec<Option<Cell>>,
    free: Vec<usize>,

    /// Sparse storage: row -> column -> record.
    index: BTreeMap<i32, BTreeMap<i32, CellId>>,

    /// Printable extent, refreshed by `recalculate_bounds`.
    size: Size,
}

impl Grid {
    /// Creates a new, empty Grid.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id_at(&self, pos: Position) -> Option<CellId> {
        self.index.get(&pos.row)?.get(&pos.col).copied()
    }

    pub fn get(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(id.0)?.as_ref()
    }

    /// Retrieves the record at the specified coordinates.
    /// Returns None if no record exists there.
    pub fn cell_at(&self, pos: Position) -> Option<&Cell> {
        self.id_at(pos).and_then(|id| self.get(id))
    }

    /// Number of cell records, placeholders included.
    pub fn len(&self) -> usize {
        self.cells.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Returns the record at `pos`, creating an Empty one if needed.
    /// Every creation is recorded in `tx` so a failed call can undo it.
    pub(crate) fn resolve_or_create(&mut self, pos: Position, tx: &mut Transaction) -> CellId {
        if let Some(id) = self.id_at(pos) {
            return id;
        }

        let cell = Cell::new(pos);
        let id = match self.free.pop() {
            Some(slot) => {
                self.cells[slot] = Some(cell);
                CellId(slot)
            }
            None => {
                self.cells.push(Some(cell));
                CellId(self.cells.len() - 1)
            }
        };
        self.index.entry(pos.row).or_default().insert(pos.col, id);
        tx.record_created(id, pos);
        id
    }

    /// Removes a record. The caller must have detached it from the graph.
    pub(crate) fn remove(&mut self, id: CellId) -> Option<Cell> {
        let cell = self.cells.get_mut(id.0)?.take()?;
        self.free.push(id.0);

        let pos = cell.position;
        if let Some(row) = self.index.get_mut(&pos.row) {
            row.remove(&pos.col);
            if row.is_empty() {
                self.index.remove(&pos.row);
            }
        }
        Some(cell)
    }

    /// Recalculates the printable size by scanning all records.
    /// Only non-empty or referenced records count.
    pub fn recalculate_bounds(&mut self) {
        let mut size = Size::default();

        for (&row, cols) in &self.index {
            for (&col, &id) in cols {
                if self[id].is_populated() {
                    size.rows = size.rows.max(row + 1);
                    size.cols = size.cols.max(col + 1);
                }
            }
        }

        self.size = size;
    }

    /// Iterates over records in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Cell)> + '_ {
        self.index.iter().flat_map(move |(&row, cols)| {
            cols.iter()
                .map(move |(&col, &id)| (Position::new(row, col), &self[id]))
        })
    }
}

impl Index<CellId> for Grid {
    type Output = Cell;

    fn index(&self, id: CellId) -> &Cell {
        match self.cells.get(id.0) {
            Some(Some(cell)) => cell,
            _ => panic!("dangling cell handle {:?}", id),
        }
    }
}

impl IndexMut<CellId> for Grid {
    fn index_mut(&mut self, id: CellId) -> &mut Cell {
        match self.cells.get_mut(id.0) {
            Some(Some(cell)) => cell,
            _ => panic!("dangling cell handle {:?}", id),
        }
    }
}
