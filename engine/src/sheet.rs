//! FILENAME: engine/src/sheet.rs
//! PURPOSE: The public face of the engine: a sheet of reactive cells.
//! CONTEXT: `Sheet` exclusively owns every cell record (through its `Grid`)
//! and is the only place records are created or destroyed. An edit runs in
//! this order:
//!   1. reject positions outside the configured grid
//!   2. build the candidate content (a malformed formula stops here)
//!   3. locate or create the record, logging creations in a transaction
//!   4. validate the candidate's references against the current graph
//!   5. on a cycle, roll back the transaction and report the error
//!   6. otherwise invalidate memoized results downstream, swap the content
//!      in and relink edges, creating placeholders for unseen references
//!   7. recompute the printable area

use log::{debug, trace, warn};
use rustc_hash::FxHashSet;
use std::io::{self, Write};

use crate::cell::{Cell, CellContent, CellId, CellValue, FormulaError};
use crate::config::SheetConfig;
use crate::dependency_graph::{CycleError, CycleValidator};
use crate::error::{SheetError, SheetResult};
use crate::grid::Grid;
use crate::position::{Position, Size};
use crate::transaction::Transaction;

#[derive(Debug, Default)]
pub struct Sheet {
    config: SheetConfig,
    grid: Grid,
}

impl Sheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SheetConfig) -> Self {
        Sheet {
            config: config.normalized(),
            grid: Grid::new(),
        }
    }

    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    /// Sets the text of the cell at `pos`.
    ///
    /// Fails without changing anything when the position is outside the
    /// sheet, the formula is malformed, or the formula would make the cell
    /// depend on itself.
    pub fn set_cell(&mut self, pos: Position, text: &str) -> SheetResult<()> {
        self.check_position(pos)?;
        let content = CellContent::from_text(text, &self.config)?;

        let mut tx = Transaction::new(format!("set {}", pos));
        let id = self.grid.resolve_or_create(pos, &mut tx);
        let result = self.assign(id, content, &mut tx);

        match &result {
            Ok(()) => debug!("set {} to {:?} ({} record(s) created)", pos, text, tx.created_count()),
            Err(err) => {
                warn!("rejected {:?} at {}: {}", text, pos, err);
                tx.rollback(&mut self.grid);
            }
        }

        self.grid.recalculate_bounds();
        result.map_err(SheetError::from)
    }

    /// Returns the cell at `pos`, if a record exists. Never creates one.
    pub fn get_cell(&self, pos: Position) -> SheetResult<Option<CellView<'_>>> {
        self.check_position(pos)?;
        Ok(self.grid.id_at(pos).map(|id| CellView { sheet: self, id }))
    }

    /// Mutable variant of `get_cell`. Never creates a record.
    pub fn get_cell_mut(&mut self, pos: Position) -> SheetResult<Option<CellMut<'_>>> {
        self.check_position(pos)?;
        Ok(self.grid.id_at(pos).map(|id| CellMut { sheet: self, id }))
    }

    /// Clears the cell at `pos`. A cell other cells still read keeps its
    /// record with empty content; any other cell is removed entirely.
    pub fn clear_cell(&mut self, pos: Position) -> SheetResult<()> {
        self.check_position(pos)?;

        if let Some(id) = self.grid.id_at(pos) {
            let mut tx = Transaction::new(format!("clear {}", pos));
            // Empty content has no references, so this cannot close a cycle.
            self.assign(id, CellContent::Empty, &mut tx)?;

            if self.grid[id].is_referenced() {
                debug!("cleared {} (kept, still referenced)", pos);
            } else {
                self.grid.remove(id);
                debug!("cleared {} (removed)", pos);
            }
        }

        self.grid.recalculate_bounds();
        Ok(())
    }

    /// Rows and columns covered by non-empty or referenced cells.
    pub fn printable_size(&self) -> Size {
        self.grid.size()
    }

    /// Number of cell records, placeholders included.
    pub fn len(&self) -> usize {
        self.grid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }

    /// Writes every value of the printable area: tab-separated fields,
    /// newline-terminated rows, absent cells as empty fields.
    pub fn print_values<W: Write>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(self.values_to_string().as_bytes())
    }

    /// Same layout as `print_values`, showing the text of each cell.
    pub fn print_texts<W: Write>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(self.texts_to_string().as_bytes())
    }

    pub fn values_to_string(&self) -> String {
        self.render(|cell| self.value_of(cell).to_string())
    }

    pub fn texts_to_string(&self) -> String {
        self.render(|cell| cell.content().text())
    }

    fn render(&self, field: impl Fn(&Cell) -> String) -> String {
        let size = self.grid.size();
        let mut out = String::new();
        for row in 0..size.rows {
            for col in 0..size.cols {
                if col > 0 {
                    out.push('\t');
                }
                if let Some(cell) = self.grid.cell_at(Position::new(row, col)) {
                    out.push_str(&field(cell));
                }
            }
            out.push('\n');
        }
        out
    }

    fn check_position(&self, pos: Position) -> SheetResult<()> {
        if self.config.contains(pos) {
            Ok(())
        } else {
            Err(SheetError::InvalidPosition(pos))
        }
    }

    /// Validates and installs `content` into the record `id`.
    /// On error nothing about `id` or its edges has changed.
    fn assign(
        &mut self,
        id: CellId,
        content: CellContent,
        tx: &mut Transaction,
    ) -> Result<(), CycleError> {
        let origin = self.grid[id].position();
        CycleValidator::new(&self.grid, origin).validate(content.referenced_cells())?;

        // The value changes whatever the new content is
        self.grid.invalidate_from(id);
        self.grid.unlink_precedents(id);

        let references = content.referenced_cells().to_vec();
        self.grid[id].content = content;

        for pos in references {
            let before = tx.created_count();
            let target = self.grid.resolve_or_create(pos, tx);
            if tx.created_count() > before {
                trace!("created placeholder {} for {}", pos, origin);
            }
            self.grid.link(id, target);
        }
        Ok(())
    }

    /// Value of the cell at `pos` as seen by a formula.
    fn value_at(&self, pos: Position) -> CellValue {
        if !self.config.contains(pos) {
            return CellValue::Error(FormulaError::Ref);
        }
        match self.grid.cell_at(pos) {
            Some(cell) => self.value_of(cell),
            None => CellValue::empty(),
        }
    }

    fn value_of(&self, cell: &Cell) -> CellValue {
        if awaits_evaluation(cell) {
            self.evaluate_precedents(cell);
        }
        cell.content().value(&|pos| self.value_at(pos))
    }

    /// Fills the memo of every unevaluated formula upstream of `root`,
    /// deepest first, with an explicit stack. Each formula then finds its
    /// precedents memoized, so evaluation nests one level regardless of
    /// how long the reference chain is.
    fn evaluate_precedents(&self, root: &Cell) {
        let mut visited: FxHashSet<CellId> = FxHashSet::default();
        let mut stack: Vec<(CellId, bool)> =
            root.precedents().iter().map(|&id| (id, false)).collect();

        while let Some((id, expanded)) = stack.pop() {
            let cell = &self.grid[id];
            if expanded {
                cell.content().value(&|pos| self.value_at(pos));
                continue;
            }
            if !awaits_evaluation(cell) || !visited.insert(id) {
                continue;
            }

            stack.push((id, true));
            for &prec in cell.precedents() {
                if awaits_evaluation(&self.grid[prec]) {
                    stack.push((prec, false));
                }
            }
        }
    }
}

/// A formula whose result is not memoized yet.
fn awaits_evaluation(cell: &Cell) -> bool {
    matches!(cell.content(), CellContent::Formula(formula) if !formula.has_cache())
}

/// Read-only view of one cell record.
#[derive(Clone, Copy)]
pub struct CellView<'a> {
    sheet: &'a Sheet,
    id: CellId,
}

impl<'a> CellView<'a> {
    fn cell(&self) -> &'a Cell {
        &self.sheet.grid[self.id]
    }

    pub fn position(&self) -> Position {
        self.cell().position()
    }

    /// Evaluates the cell, using and filling memoized formula results.
    pub fn value(&self) -> CellValue {
        self.sheet.value_of(self.cell())
    }

    pub fn text(&self) -> String {
        self.cell().content().text()
    }

    pub fn content(&self) -> &'a CellContent {
        self.cell().content()
    }

    /// Positions the cell's formula reads, sorted and deduplicated.
    pub fn referenced_cells(&self) -> &'a [Position] {
        self.cell().content().referenced_cells()
    }

    pub fn is_referenced(&self) -> bool {
        self.cell().is_referenced()
    }

    /// Positions of cells this one reads, as recorded in the graph.
    pub fn precedents(&self) -> Vec<Position> {
        self.sheet.grid.precedent_positions(self.id)
    }

    /// Positions of cells reading this one.
    pub fn dependents(&self) -> Vec<Position> {
        self.sheet.grid.dependent_positions(self.id)
    }

    /// Whether a formula result is currently memoized.
    pub fn is_cached(&self) -> bool {
        self.cell().content().has_cache()
    }
}

impl std::fmt::Debug for CellView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CellView")
            .field("position", &self.position())
            .field("text", &self.text())
            .finish()
    }
}

/// Mutable handle on one existing cell record. Editing through the handle
/// never removes the record, so the handle stays valid across edits.
pub struct CellMut<'a> {
    sheet: &'a mut Sheet,
    id: CellId,
}

impl CellMut<'_> {
    /// Replaces the content, with the same checks as `Sheet::set_cell`.
    pub fn set(&mut self, text: &str) -> SheetResult<()> {
        let pos = self.position();
        self.sheet.set_cell(pos, text)
    }

    /// Resets the content to empty. The record itself survives.
    pub fn clear(&mut self) -> SheetResult<()> {
        self.set("")
    }

    pub fn view(&self) -> CellView<'_> {
        CellView {
            sheet: self.sheet,
            id: self.id,
        }
    }

    pub fn position(&self) -> Position {
        self.sheet.grid[self.id].position()
    }

    pub fn value(&self) -> CellValue {
        self.view().value()
    }

    pub fn text(&self) -> String {
        self.view().text()
    }
}
