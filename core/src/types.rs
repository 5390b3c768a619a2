use std::fmt;
use serde::{Deserialize, Serialize};

/// Integer grid coordinate along one axis.
pub type Coord = i64;

/// Largest row or column magnitude a position may fall into. Every coordinate up
/// to it is exact as `f64`, and a neighborhood around it cannot overflow.
pub const COORD_LIMIT: Coord = 1 << 53;

/// Continuous position on the plane, in the same units as the tile width.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
}

impl Position {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Position shifted by one tile in `direction`.
    pub fn step(self, direction: Direction, tile_width: f64) -> Self {
        let (d_lat, d_lng) = direction.delta();
        Self {
            lat: self.lat + f64::from(d_lat) * tile_width,
            lng: self.lng + f64::from(d_lng) * tile_width,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

/// A discrete grid square. Two cells with equal row and column are the same cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub row: Coord,
    pub col: Coord,
}

impl Cell {
    pub const fn new(row: Coord, col: Coord) -> Self {
        Self { row, col }
    }

    /// Key used for the cache directory and the oracle, e.g. `"369894,-1220628"`.
    pub fn key(&self) -> String {
        format!("{},{}", self.row, self.col)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Stable handle to a canonical [`Cell`] registered in a [`crate::CellIndex`].
///
/// Handles compare equal exactly when they refer to the same canonical cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(u32);

impl CellId {
    pub(crate) const fn new(index: u32) -> Self {
        Self(index)
    }

    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Axis-aligned region covered by a cell, anchored at its south-west corner.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south_west: Position,
    pub north_east: Position,
}

impl Bounds {
    pub fn contains(&self, position: Position) -> bool {
        position.lat >= self.south_west.lat
            && position.lat < self.north_east.lat
            && position.lng >= self.south_west.lng
            && position.lng < self.north_east.lng
    }
}

/// Manual movement directions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Row and column offsets of a single step.
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Self::North => (1, 0),
            Self::South => (-1, 0),
            Self::East => (0, 1),
            Self::West => (0, -1),
        }
    }
}
