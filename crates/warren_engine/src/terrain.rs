//! The room terrain height field.
//!
//! Cell heights are integers in half-units: a cell of height `h` has its
//! walkable surface at `h / 2` grid units, which is what
//! [`TerrainGrid::ground_height`] reports.

use warren_foundation::RoomData;

/// An immutable `width x height` field of integer cell heights.
///
/// Dimensions are fixed at construction. All sampling is clamped: a
/// position outside the grid reads the nearest valid cell and never
/// errors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TerrainGrid {
    width: u32,
    height: u32,
    // Column-major: cells[x * height + y].
    cells: Vec<i32>,
}

impl TerrainGrid {
    /// A zero-extent grid; every sample reports ground height 0.
    pub const EMPTY: Self = Self {
        width: 0,
        height: 0,
        cells: Vec::new(),
    };

    /// Builds the grid from a validated room record.
    #[must_use]
    pub fn from_data(data: &RoomData) -> Self {
        let mut cells = Vec::with_capacity((data.width * data.height) as usize);
        for column in &data.terrain {
            cells.extend_from_slice(column);
        }
        Self {
            width: data.width,
            height: data.height,
            cells,
        }
    }

    /// Grid width in cells.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in cells.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the grid has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Reads a cell height, clamping the coordinates into the grid.
    /// Returns 0 on an empty grid.
    #[must_use]
    pub fn cell(&self, x: i64, y: i64) -> i32 {
        if self.is_empty() {
            return 0;
        }
        let cx = x.clamp(0, i64::from(self.width) - 1) as usize;
        let cy = y.clamp(0, i64::from(self.height) - 1) as usize;
        self.cells[cx * self.height as usize + cy]
    }

    /// Samples the walkable ground height at a real-valued position.
    ///
    /// The position is floored to its cell, the cell is clamped into the
    /// grid, and the result is the maximum over the 2x2 neighborhood
    /// `(x, y), (x+1, y), (x, y+1), (x+1, y+1)` (each neighbor clamped
    /// back into the grid), divided by 2. This is the one sampling rule
    /// used by every feature.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn ground_height(&self, x: f64, y: f64) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let cx = x.floor() as i64;
        let cy = y.floor() as i64;
        let peak = self
            .cell(cx, cy)
            .max(self.cell(cx + 1, cy))
            .max(self.cell(cx, cy + 1))
            .max(self.cell(cx + 1, cy + 1));
        f64::from(peak) / 2.0
    }
}
