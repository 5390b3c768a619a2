use std::fmt;
use serde::{Deserialize, Serialize};

use crate::*;

/// A unit of currency: the cell that minted it plus a serial unique within that cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coin {
    pub row: Coord,
    pub col: Coord,
    pub serial: u32,
}

impl Coin {
    pub const fn new(row: Coord, col: Coord, serial: u32) -> Self {
        Self { row, col, serial }
    }

    pub const fn minted_in(cell: Cell, serial: u32) -> Self {
        Self::new(cell.row, cell.col, serial)
    }

    /// Cell that minted this coin.
    pub const fn origin(&self) -> Cell {
        Cell::new(self.row, self.col)
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}#{}", self.row, self.col, self.serial)
    }
}
