use hashbrown::HashMap;

use crate::*;

/// Flyweight factory for grid cells.
///
/// Every `(row, col)` pair is registered at most once and handed out as the same
/// [`CellId`] for the lifetime of the index. The registry only grows.
#[derive(Clone, Debug)]
pub struct CellIndex {
    tile_width: f64,
    cells: Vec<Cell>,
    known: HashMap<Cell, CellId>,
}

impl CellIndex {
    pub fn new(tile_width: f64) -> Self {
        Self {
            tile_width,
            cells: Vec::new(),
            known: HashMap::new(),
        }
    }

    pub fn tile_width(&self) -> f64 {
        self.tile_width
    }

    /// Number of canonical cells registered so far.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns the unique handle for `(row, col)`, registering it on first request.
    pub fn canonicalize(&mut self, row: Coord, col: Coord) -> CellId {
        let cell = Cell::new(row, col);
        if let Some(&id) = self.known.get(&cell) {
            return id;
        }

        let id = CellId::new(
            self.cells
                .len()
                .try_into()
                .expect("cell registry exceeded u32::MAX entries"),
        );
        self.cells.push(cell);
        self.known.insert(cell, id);
        id
    }

    /// Handle of an already registered cell, without registering it.
    pub fn lookup(&self, row: Coord, col: Coord) -> Option<CellId> {
        self.known.get(&Cell::new(row, col)).copied()
    }

    pub fn cell(&self, id: CellId) -> Cell {
        self.cells[id.index()]
    }

    /// Whether `position` falls into a cell within [`COORD_LIMIT`] on both axes.
    pub fn covers(&self, position: Position) -> bool {
        let limit = COORD_LIMIT as f64;
        [position.lat, position.lng]
            .into_iter()
            .all(|v| (v / self.tile_width).floor().abs() <= limit)
    }

    /// Cell containing `position`. Positions the index does not [cover](Self::covers)
    /// are clamped to the outermost cells.
    pub fn cell_for_position(&mut self, position: Position) -> CellId {
        // floor, not truncation: -0.5 tiles belongs to row -1, not row 0
        let axis = |v: f64| {
            ((v / self.tile_width).floor() as Coord).clamp(-COORD_LIMIT, COORD_LIMIT)
        };
        let (row, col) = (axis(position.lat), axis(position.lng));
        self.canonicalize(row, col)
    }

    /// South-west and north-east corners of `id`.
    pub fn bounds_of(&self, id: CellId) -> Bounds {
        let Cell { row, col } = self.cell(id);
        let (row, col) = (row as f64, col as f64);
        let width = self.tile_width;
        Bounds {
            south_west: Position::new(row * width, col * width),
            north_east: Position::new((row + 1.0) * width, (col + 1.0) * width),
        }
    }

    /// All cells in the square neighborhood of side `2 * radius + 1` around the cell
    /// containing `center`, in row-major order.
    pub fn cells_within(&mut self, center: Position, radius: u32) -> Vec<CellId> {
        let origin = self.cell_for_position(center);
        let origin = self.cell(origin);
        let radius = Coord::from(radius);
        let side = 2 * radius as usize + 1;
        let mut result = Vec::with_capacity(side.saturating_mul(side));

        for d_row in -radius..=radius {
            for d_col in -radius..=radius {
                result.push(self.canonicalize(origin.row + d_row, origin.col + d_col));
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn canonicalize_returns_same_handle() {
        let mut index = CellIndex::new(1e-4);

        let first = index.canonicalize(-7, 12);
        let second = index.canonicalize(-7, 12);

        assert_eq!(first, second);
        assert_eq!(index.len(), 1);
        assert_eq!(index.cell(first), Cell::new(-7, 12));
    }

    #[test]
    fn cell_for_position_floors_negative_coordinates() {
        let mut index = CellIndex::new(1.0);

        let negative = index.cell_for_position(Position::new(-0.5, -0.5));
        let positive = index.cell_for_position(Position::new(0.5, 0.5));

        assert_eq!(index.cell(negative), Cell::new(-1, -1));
        assert_eq!(index.cell(positive), Cell::new(0, 0));
        assert_ne!(negative, positive);
    }

    #[test]
    fn cell_for_origin_position() {
        let mut index = CellIndex::new(1e-4);

        let id = index.cell_for_position(Position::new(36.98949379578401, -122.06277128548504));

        assert_eq!(index.cell(id), Cell::new(369894, -1220628));
    }

    #[test]
    fn bounds_anchor_on_south_west_corner() {
        let mut index = CellIndex::new(0.5);
        let id = index.canonicalize(2, -3);

        let bounds = index.bounds_of(id);

        assert_eq!(bounds.south_west, Position::new(1.0, -1.5));
        assert_eq!(bounds.north_east, Position::new(1.5, -1.0));
    }

    #[test]
    fn zero_radius_is_center_only() {
        let mut index = CellIndex::new(1.0);

        let cells = index.cells_within(Position::new(4.2, -3.7), 0);

        assert_eq!(cells.len(), 1);
        assert_eq!(index.cell(cells[0]), Cell::new(4, -4));
    }

    #[test]
    fn far_positions_keep_distinct_cells() {
        let mut index = CellIndex::new(0.25);

        let near = index.cell_for_position(Position::new(6e8, 0.0));
        let far = index.cell_for_position(Position::new(8e8, 0.0));

        assert_ne!(near, far);
        assert_eq!(index.cell(near), Cell::new(2_400_000_000, 0));
        assert_eq!(index.cell(far), Cell::new(3_200_000_000, 0));
    }

    #[test]
    fn far_neighborhood_has_no_repeats() {
        let mut index = CellIndex::new(0.25);

        let mut cells = index.cells_within(Position::new(8e8, -8e8), 2);

        assert_eq!(cells.len(), 25);
        cells.sort();
        cells.dedup();
        assert_eq!(cells.len(), 25);
    }

    #[test]
    fn covers_stops_at_coordinate_limit() {
        let mut index = CellIndex::new(1.0);
        let edge = COORD_LIMIT as f64;

        assert!(index.covers(Position::new(edge, -edge)));
        assert!(!index.covers(Position::new(edge * 2.0, 0.0)));
        assert!(!index.covers(Position::new(0.0, f64::MAX)));

        let clamped = index.cell_for_position(Position::new(f64::MAX, 0.5));
        assert_eq!(index.cell(clamped), Cell::new(COORD_LIMIT, 0));
    }

    proptest! {
        #[test]
        fn prop_canonical_identity(row in any::<i64>(), col in any::<i64>()) {
            let mut index = CellIndex::new(1e-4);
            let first = index.canonicalize(row, col);
            let _ = index.canonicalize(col, row);
            prop_assert_eq!(first, index.canonicalize(row, col));
            prop_assert_eq!(index.lookup(row, col), Some(first));
        }

        #[test]
        fn prop_neighborhood_is_symmetric_square(
            lat in -90.0f64..90.0,
            lng in -180.0f64..180.0,
            radius in 0u32..12,
        ) {
            let mut index = CellIndex::new(1e-4);
            let center = index.cell_for_position(Position::new(lat, lng));
            let center = index.cell(center);

            let cells = index.cells_within(Position::new(lat, lng), radius);

            let side = 2 * radius as usize + 1;
            prop_assert_eq!(cells.len(), side * side);
            let r = radius as i64;
            for id in &cells {
                let cell = index.cell(*id);
                prop_assert!((cell.row - center.row).abs() <= r);
                prop_assert!((cell.col - center.col).abs() <= r);
            }
            let mut unique = cells.clone();
            unique.sort();
            unique.dedup();
            prop_assert_eq!(unique.len(), cells.len());
        }

        #[test]
        fn prop_position_lies_within_its_cell_bounds(lat in -90.0f64..90.0, lng in -180.0f64..180.0) {
            let mut index = CellIndex::new(0.25);
            let id = index.cell_for_position(Position::new(lat, lng));
            prop_assert!(index.bounds_of(id).contains(Position::new(lat, lng)));
        }
    }
}
