//! Client-side cell marks.
//!
//! Marks are a visual annotation only. The remote service decides wins from
//! its own draw history, so nothing here is ever sent over the wire.

use alloc::collections::BTreeSet;

use super::common::SessionError;
use super::config::{is_free_cell, GRID_SIZE};

/// Identifies one cell on one held card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId {
    pub card: usize,
    pub row: usize,
    pub col: usize,
}

impl CellId {
    pub fn new(card: usize, row: usize, col: usize) -> Self {
        Self { card, row, col }
    }

    pub fn is_free(&self) -> bool {
        is_free_cell(self.row, self.col)
    }

    fn check(&self) -> Result<(), SessionError> {
        if self.row >= GRID_SIZE || self.col >= GRID_SIZE {
            return Err(SessionError::CellOutOfRange);
        }
        if self.is_free() {
            return Err(SessionError::FreeCell);
        }
        Ok(())
    }
}

/// Set of marked cells across every card of a game.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkedCells {
    cells: BTreeSet<CellId>,
}

impl MarkedCells {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a cell. Marking an already marked cell is a no-op.
    pub fn mark(&mut self, cell: CellId) -> Result<(), SessionError> {
        cell.check()?;
        self.cells.insert(cell);
        Ok(())
    }

    /// Unmark a cell. Unmarking an unmarked cell is a no-op.
    pub fn unmark(&mut self, cell: CellId) -> Result<(), SessionError> {
        cell.check()?;
        self.cells.remove(&cell);
        Ok(())
    }

    /// Flip a cell and return whether it is now marked.
    pub fn toggle(&mut self, cell: CellId) -> Result<bool, SessionError> {
        cell.check()?;
        if self.cells.remove(&cell) {
            Ok(false)
        } else {
            self.cells.insert(cell);
            Ok(true)
        }
    }

    /// The free cell always reads as marked.
    pub fn is_marked(&self, cell: CellId) -> bool {
        cell.is_free() || self.cells.contains(&cell)
    }

    /// Number of explicitly marked cells (the free cells are not counted).
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CellId> {
        self.cells.iter()
    }
}
