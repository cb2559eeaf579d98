//! FILENAME: engine/src/position.rs
//! PURPOSE: Cell coordinates and conversion to and from A1 notation.
//! CONTEXT: A `Position` is a 0-based (row, col) pair. Column "A" = 0,
//! "B" = 1, ..., "Z" = 25, "AA" = 26, etc. Row 1 in A1 notation = row 0
//! internally. Positions outside the grid limits can exist (a formula may
//! name one) but are never valid keys for a cell.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A cell coordinate as (row, col) with 0-based indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

/// Printable extent of a sheet: the number of rows and columns to dump.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub rows: i32,
    pub cols: i32,
}

const MAX_COLUMN_LETTERS: usize = 3;

impl Position {
    pub const MAX_ROWS: i32 = 16384;
    pub const MAX_COLS: i32 = 16384;

    /// The position every malformed or out-of-range A1 string maps to.
    pub const NONE: Position = Position { row: -1, col: -1 };

    pub const fn new(row: i32, col: i32) -> Self {
        Position { row, col }
    }

    pub fn is_valid(&self) -> bool {
        self.row >= 0 && self.col >= 0 && self.row < Self::MAX_ROWS && self.col < Self::MAX_COLS
    }

    /// Parses an A1-style reference. Returns `Position::NONE` when the text
    /// is not a reference or points outside the grid.
    pub fn from_a1(text: &str) -> Position {
        let split = text
            .find(|ch: char| !ch.is_ascii_uppercase())
            .unwrap_or(text.len());
        let (col_str, row_str) = text.split_at(split);

        if col_str.is_empty() || col_str.len() > MAX_COLUMN_LETTERS {
            return Position::NONE;
        }
        if row_str.is_empty() || !row_str.chars().all(|ch| ch.is_ascii_digit()) {
            return Position::NONE;
        }

        match row_str.parse::<i64>() {
            Ok(row) => Position::from_parts(col_str, row),
            Err(_) => Position::NONE,
        }
    }

    /// Builds a position from column letters and a 1-based row number, as
    /// they appear in a formula. Out-of-range parts give `Position::NONE`.
    pub fn from_parts(col_str: &str, row_num: i64) -> Position {
        if col_str.is_empty()
            || col_str.len() > MAX_COLUMN_LETTERS
            || !col_str.chars().all(|ch| ch.is_ascii_alphabetic())
        {
            return Position::NONE;
        }
        let col = col_to_index(col_str);
        let row = row_num - 1; // Convert 1-based to 0-based

        let pos = match (i32::try_from(row), i32::try_from(col)) {
            (Ok(row), Ok(col)) => Position { row, col },
            _ => return Position::NONE,
        };
        if pos.is_valid() {
            pos
        } else {
            Position::NONE
        }
    }
}

impl fmt::Display for Position {
    /// (0, 0) -> "A1", (1, 1) -> "B2", (99, 26) -> "AA100". Invalid
    /// positions print as an empty string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return Ok(());
        }
        write!(f, "{}{}", index_to_col(self.col as u32), self.row + 1)
    }
}

/// Converts a column string (e.g., "A", "AA", "ABC") to a 0-based column index.
/// "A" -> 0, "B" -> 1, ..., "Z" -> 25, "AA" -> 26, "AB" -> 27, etc.
/// The caller guarantees the string is non-empty and alphabetic.
pub fn col_to_index(col_str: &str) -> i64 {
    let mut result: i64 = 0;
    for c in col_str.chars() {
        let digit = (c.to_ascii_uppercase() as i64) - ('A' as i64) + 1;
        result = result * 26 + digit;
    }
    result - 1 // Convert to 0-based
}

/// Converts a 0-based column index to a column string.
/// 0 -> "A", 1 -> "B", ..., 25 -> "Z", 26 -> "AA", 27 -> "AB", etc.
pub fn index_to_col(mut col_index: u32) -> String {
    let mut result = String::new();
    loop {
        let remainder = col_index % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        if col_index < 26 {
            break;
        }
        col_index = col_index / 26 - 1;
    }
    result
}
