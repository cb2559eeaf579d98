//! FILENAME: engine/src/config.rs
//! PURPOSE: Sheet configuration.
//! CONTEXT: Limits the addressable area of a sheet. Positions outside the
//! configured area are rejected by the sheet, and formula references to
//! them evaluate to #REF!. The limits can never exceed the absolute grid
//! size of `Position::MAX_ROWS` x `Position::MAX_COLS`.

use serde::{Deserialize, Serialize};

use crate::position::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    pub max_rows: i32,
    pub max_cols: i32,
}

impl Default for SheetConfig {
    fn default() -> Self {
        SheetConfig {
            max_rows: Position::MAX_ROWS,
            max_cols: Position::MAX_COLS,
        }
    }
}

impl SheetConfig {
    pub fn new(max_rows: i32, max_cols: i32) -> Self {
        SheetConfig { max_rows, max_cols }.normalized()
    }

    /// Reads a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: SheetConfig = serde_json::from_str(json)?;
        Ok(config.normalized())
    }

    /// Clamps both limits into 1..=the absolute grid size.
    pub fn normalized(self) -> Self {
        SheetConfig {
            max_rows: self.max_rows.clamp(1, Position::MAX_ROWS),
            max_cols: self.max_cols.clamp(1, Position::MAX_COLS),
        }
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.is_valid() && pos.row < self.max_rows && pos.col < self.max_cols
    }
}
