//! FILENAME: engine/src/invalidation.rs
//! PURPOSE: Clears memoized formula results downstream of a change.
//! CONTEXT: Formula results are computed lazily and memoized. When a cell
//! changes, every memo that may depend on it must be dropped before the
//! next read. Propagation stops at any cell that had nothing memoized:
//! a formula is only memoized after its precedents were evaluated, so
//! nothing below an un-memoized cell can hold a memo derived through it.
//! A cell cleared earlier in the same pass reports nothing to clear, which
//! bounds the work on diamond-shaped graphs without a visited set.

use log::trace;

use crate::cell::CellId;
use crate::grid::Grid;

impl Grid {
    /// Invalidates the edited cell and, unconditionally, everything reading it.
    /// Returns the number of memoized results dropped.
    pub(crate) fn invalidate_from(&mut self, edited: CellId) -> usize {
        let mut cleared = usize::from(self[edited].content.invalidate_cache());
        let direct: Vec<CellId> = self[edited].dependents().iter().copied().collect();
        for dependent in direct {
            cleared += self.invalidate_cache(dependent);
        }
        trace!(
            "invalidated {} memoized result(s) from {}",
            cleared,
            self[edited].position()
        );
        cleared
    }

    /// Invalidates `start`; recurses into dependents only when a memo was
    /// actually dropped. Returns the number of memoized results dropped.
    pub(crate) fn invalidate_cache(&mut self, start: CellId) -> usize {
        let mut cleared = 0;
        let mut stack = vec![start];

        while let Some(id) = stack.pop() {
            if self[id].content.invalidate_cache() {
                cleared += 1;
                stack.extend(self[id].dependents().iter().copied());
            }
        }

        cleared
    }
}
