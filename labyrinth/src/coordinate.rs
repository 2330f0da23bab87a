use std::cmp::Ordering;

use crate::Direction;

/// A position on (or next to) the board.
///
/// Rows and columns may be negative during intermediate computations, but
/// only non-negative coordinates address a tile. The derived ordering is
/// row-major: by row first, then by column.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coordinate {
    pub row: i32,
    pub column: i32,
}

impl Coordinate {
    pub const ORIGIN: Coordinate = Coordinate { row: 0, column: 0 };

    pub const fn new(row: i32, column: i32) -> Self {
        Self { row, column }
    }

    pub fn squared_euclidean_distance(self, other: Coordinate) -> i64 {
        let row_diff = i64::from(self.row) - i64::from(other.row);
        let col_diff = i64::from(self.column) - i64::from(other.column);
        row_diff * row_diff + col_diff * col_diff
    }

    /// Orders two coordinates by their distance to `goal`, closest first.
    /// Equally distant coordinates are ordered row-major.
    pub fn cmp_by_distance_to(goal: Coordinate, a: &Coordinate, b: &Coordinate) -> Ordering {
        a.squared_euclidean_distance(goal)
            .cmp(&b.squared_euclidean_distance(goal))
            .then_with(|| a.cmp(b))
    }

    /// The neighboring coordinate one step in `direction`, which may be off the board.
    pub fn step(self, direction: Direction) -> Coordinate {
        let (row_diff, col_diff) = direction.offset();
        Coordinate::new(self.row + row_diff, self.column + col_diff)
    }

    /// The row and column as indices, if both are non-negative.
    pub fn to_indices(self) -> Option<(usize, usize)> {
        let row = usize::try_from(self.row).ok()?;
        let column = usize::try_from(self.column).ok()?;
        Some((row, column))
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// The extent of a rectangular grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GridSize {
    pub rows: usize,
    pub columns: usize,
}

impl GridSize {
    pub const fn new(rows: usize, columns: usize) -> Self {
        Self { rows, columns }
    }

    pub fn contains(&self, c: Coordinate) -> bool {
        match c.to_indices() {
            Some((row, column)) => row < self.rows && column < self.columns,
            None => false,
        }
    }

    pub fn area(&self) -> usize {
        self.rows * self.columns
    }

    /// All coordinates of the grid, in row-major order.
    pub fn coordinates(&self) -> impl Iterator<Item = Coordinate> + '_ {
        (0..self.rows).flat_map(move |row| {
            (0..self.columns).map(move |column| Coordinate::new(row as i32, column as i32))
        })
    }
}

impl std::fmt::Display for GridSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.rows, self.columns)
    }
}
