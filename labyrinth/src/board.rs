use std::collections::{BTreeSet, HashSet, VecDeque};

use crate::{BoardError, Connector, Coordinate, Direction, GemPair, GridSize, SlideAction, Tile};

/// A rectangular grid of tiles.
///
/// Every even row and every even column is a lane that can be slid. The
/// shape of the grid never changes after construction, only the tiles move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    size: GridSize,
    /// Row-major.
    tiles: Vec<Tile>,
}

impl Board {
    /// Creates a board from rows of tiles.
    ///
    /// The grid must be non-empty and rectangular, and no two tiles may
    /// carry the same treasure.
    pub fn new(rows: Vec<Vec<Tile>>) -> Result<Self, BoardError> {
        let num_columns = rows.first().map_or(0, Vec::len);
        if num_columns == 0 || rows.iter().any(|row| row.len() != num_columns) {
            return Err(BoardError::IrregularDimensions);
        }

        let mut treasures = HashSet::new();
        for tile in rows.iter().flatten() {
            if !treasures.insert(tile.treasure) {
                return Err(BoardError::TreasuresNotUnique {
                    treasure: tile.treasure,
                });
            }
        }

        Ok(Self {
            size: GridSize::new(rows.len(), num_columns),
            tiles: rows.into_iter().flatten().collect(),
        })
    }

    /// Creates a board from rows of connector symbols such as `"┌─┐"`.
    ///
    /// Treasures are assigned in catalogue order, so they are always unique.
    pub fn from_connector_rows(rows: &[&str]) -> Result<Self, BoardError> {
        let mut treasures = GemPair::all();
        let mut grid = Vec::with_capacity(rows.len());
        for row in rows {
            let mut tiles = Vec::new();
            for symbol in row.chars() {
                let connector = Connector::try_from(symbol)
                    .map_err(|_| BoardError::InvalidSymbol { symbol })?;
                let treasure = treasures.next().ok_or_else(|| BoardError::NotEnoughTreasures {
                    tiles: rows.iter().map(|row| row.chars().count()).sum(),
                })?;
                tiles.push(Tile::new(connector, treasure));
            }
            grid.push(tiles);
        }
        Board::new(grid)
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    /// The tile at the given coordinate.
    pub fn tile(&self, coordinate: Coordinate) -> Result<Tile, BoardError> {
        if !self.size.contains(coordinate) {
            return Err(BoardError::InvalidCoordinate { coordinate });
        }
        Ok(self.tiles[self.offset(coordinate)])
    }

    /// Iterates over the rows of the board, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.tiles.chunks(self.size.columns)
    }

    pub fn is_row_moveable(&self, index: usize) -> bool {
        index < self.size.rows && index % 2 == 0
    }

    pub fn is_column_moveable(&self, index: usize) -> bool {
        index < self.size.columns && index % 2 == 0
    }

    /// Whether the tile at this coordinate lies on a moveable row or column.
    pub fn is_coordinate_moveable(&self, coordinate: Coordinate) -> bool {
        match coordinate.to_indices() {
            Some((row, column)) => self.is_row_moveable(row) || self.is_column_moveable(column),
            None => false,
        }
    }

    /// Whether the slide addresses a moveable lane of this board.
    pub fn is_slide_moveable(&self, slide: SlideAction) -> bool {
        if slide.direction.is_horizontal() {
            self.is_row_moveable(slide.index)
        } else {
            self.is_column_moveable(slide.index)
        }
    }

    /// Shifts a lane by one tile, inserting `new_tile` into the vacated slot.
    ///
    /// Returns the tile that was pushed off the board, i.e. the new spare tile.
    pub fn slide_and_insert(&mut self, slide: SlideAction, new_tile: Tile) -> Result<Tile, BoardError> {
        let lane_len = if slide.direction.is_horizontal() {
            self.size.rows
        } else {
            self.size.columns
        };
        if slide.index >= lane_len {
            return Err(BoardError::OutOfRange { slide });
        }
        if !self.is_slide_moveable(slide) {
            return Err(BoardError::InvalidSelection { slide });
        }

        let columns = self.size.columns;
        let displaced = match slide.direction {
            Direction::Left => {
                let lane = &mut self.tiles[slide.index * columns..(slide.index + 1) * columns];
                let displaced = lane[0];
                lane.rotate_left(1);
                lane[columns - 1] = new_tile;
                displaced
            }
            Direction::Right => {
                let lane = &mut self.tiles[slide.index * columns..(slide.index + 1) * columns];
                let displaced = lane[columns - 1];
                lane.rotate_right(1);
                lane[0] = new_tile;
                displaced
            }
            Direction::Up => {
                let rows = self.size.rows;
                let displaced = self.tiles[slide.index];
                for row in 1..rows {
                    self.tiles[(row - 1) * columns + slide.index] = self.tiles[row * columns + slide.index];
                }
                self.tiles[(rows - 1) * columns + slide.index] = new_tile;
                displaced
            }
            Direction::Down => {
                let rows = self.size.rows;
                let displaced = self.tiles[(rows - 1) * columns + slide.index];
                for row in (1..rows).rev() {
                    self.tiles[row * columns + slide.index] = self.tiles[(row - 1) * columns + slide.index];
                }
                self.tiles[slide.index] = new_tile;
                displaced
            }
        };
        Ok(displaced)
    }

    /// Where a coordinate ends up after the given slide.
    ///
    /// Coordinates on the slid lane move one step in the slide direction,
    /// wrapping around to the opposite edge. All others stay put.
    pub fn slide_coordinate(&self, slide: SlideAction, coordinate: Coordinate) -> Coordinate {
        let on_lane = if slide.direction.is_horizontal() {
            i64::from(coordinate.row) == slide.index as i64
        } else {
            i64::from(coordinate.column) == slide.index as i64
        };
        if !on_lane {
            return coordinate;
        }
        let moved = coordinate.step(slide.direction);
        Coordinate::new(
            moved.row.rem_euclid(self.size.rows as i32),
            moved.column.rem_euclid(self.size.columns as i32),
        )
    }

    /// All coordinates connected to `source` by paths, including `source` itself.
    pub fn reachable_from(&self, source: Coordinate) -> Result<BTreeSet<Coordinate>, BoardError> {
        if !self.size.contains(source) {
            return Err(BoardError::InvalidCoordinate { coordinate: source });
        }
        Ok(self.explore(source, None))
    }

    /// Whether a path leads from `source` to `destination`.
    pub fn can_reach(&self, source: Coordinate, destination: Coordinate) -> Result<bool, BoardError> {
        if !self.size.contains(source) {
            return Err(BoardError::InvalidCoordinate { coordinate: source });
        }
        Ok(self.explore(source, Some(destination)).contains(&destination))
    }

    // Breadth-first search over connected tiles. Stops early once `target` is found.
    fn explore(&self, source: Coordinate, target: Option<Coordinate>) -> BTreeSet<Coordinate> {
        let mut seen = BTreeSet::from([source]);
        let mut queue = VecDeque::from([source]);
        while let Some(current) = queue.pop_front() {
            if target.is_some_and(|t| seen.contains(&t)) {
                break;
            }
            let tile = self.tiles[self.offset(current)];
            for direction in Direction::ALL {
                let neighbor = current.step(direction);
                if !self.size.contains(neighbor) || seen.contains(&neighbor) {
                    continue;
                }
                if tile.connects_to(&self.tiles[self.offset(neighbor)], direction) {
                    seen.insert(neighbor);
                    queue.push_back(neighbor);
                }
            }
        }
        seen
    }

    // Callers must check that the coordinate is on the board.
    fn offset(&self, coordinate: Coordinate) -> usize {
        coordinate.row as usize * self.size.columns + coordinate.column as usize
    }
}

/// Shorthand for creating boards from rows of connector symbols.
///
/// This macro is just calling [`Board::from_connector_rows`].
/// ```
/// # use labyrinth::{board, Coordinate};
/// let board = board!["┌─┐", "│─│"];
/// # assert!(board.can_reach(Coordinate::new(0, 0), Coordinate::new(0, 2)).unwrap());
/// ```
#[macro_export]
macro_rules! board {
    ($($row:literal),+ $(,)?) => {
        $crate::Board::from_connector_rows(&[$($row),+])
            .expect("Invalid rows given to board! macro")
    };
}
