//! Game codes, card tokens and card grids.

use alloc::string::{String, ToString};

use super::common::SessionError;
use super::config::{is_free_cell, GRID_SIZE};

/// Opaque identifier of a hosted game, issued by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GameCode(String);

impl GameCode {
    /// Build a code from user input. Surrounding whitespace is trimmed, case
    /// is preserved.
    pub fn new(input: &str) -> Result<Self, SessionError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(SessionError::EmptyCode);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for GameCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque identifier of one dealt card. Unique within a game.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardToken(String);

impl CardToken {
    pub fn new(token: &str) -> Result<Self, SessionError> {
        if token.is_empty() {
            return Err(SessionError::EmptyToken);
        }
        Ok(Self(token.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for CardToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Row-major 5x5 grid of card numbers. The value stored at the free cell is
/// kept as received but never read as a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid([[u32; GRID_SIZE]; GRID_SIZE]);

impl Grid {
    pub fn from_rows(rows: [[u32; GRID_SIZE]; GRID_SIZE]) -> Self {
        Self(rows)
    }

    /// Transpose five parallel columns (B, I, N, G, O order) into rows, so
    /// that `grid[r][c] == columns[c][r]`.
    ///
    /// Every column must carry at least five numbers; extra entries are
    /// ignored.
    pub fn from_columns(columns: [&[u32]; GRID_SIZE]) -> Result<Self, SessionError> {
        if columns.iter().any(|col| col.len() < GRID_SIZE) {
            return Err(SessionError::MalformedCard);
        }
        let mut rows = [[0u32; GRID_SIZE]; GRID_SIZE];
        for (r, row) in rows.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = columns[c][r];
            }
        }
        Ok(Self::from_rows(rows))
    }

    pub fn rows(&self) -> &[[u32; GRID_SIZE]; GRID_SIZE] {
        &self.0
    }

    /// Number at `(row, col)`. `None` for the free cell or an out-of-range
    /// position.
    pub fn number(&self, row: usize, col: usize) -> Option<u32> {
        if is_free_cell(row, col) {
            return None;
        }
        self.0.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Whether `n` appears anywhere on the grid (the free cell never matches).
    pub fn contains(&self, n: u32) -> bool {
        (0..GRID_SIZE).any(|r| (0..GRID_SIZE).any(|c| self.number(r, c) == Some(n)))
    }
}

/// A card held by the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    token: CardToken,
    grid: Grid,
}

impl Card {
    pub fn new(token: CardToken, grid: Grid) -> Self {
        Self { token, grid }
    }

    pub fn token(&self) -> &CardToken {
        &self.token
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }
}
