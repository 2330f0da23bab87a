use serde::{Deserialize, Serialize};

/// The direction in which a lane of tiles is slid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// All directions, in canonical order.
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];
    /// The directions that slide a row.
    pub const HORIZONTAL: [Direction; 2] = [Direction::Left, Direction::Right];
    /// The directions that slide a column.
    pub const VERTICAL: [Direction; 2] = [Direction::Up, Direction::Down];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// The (row, column) offset of one step in this direction.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Direction::Left => "LEFT",
            Direction::Right => "RIGHT",
            Direction::Up => "UP",
            Direction::Down => "DOWN",
        };
        write!(f, "{}", s)
    }
}

/// Slides the row (for horizontal directions) or column (for vertical
/// directions) at `index` by one tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SlideAction {
    pub direction: Direction,
    pub index: usize,
}

impl SlideAction {
    pub const fn new(direction: Direction, index: usize) -> Self {
        Self { direction, index }
    }

    /// The slide that puts every tile of the lane back where it was.
    pub fn inverse(self) -> SlideAction {
        SlideAction {
            direction: self.direction.opposite(),
            index: self.index,
        }
    }

    /// Whether the two slides undo one another.
    pub fn is_opposite_of(self, other: SlideAction) -> bool {
        self.index == other.index && self.direction.opposite() == other.direction
    }

    pub fn with_rotations(self, rotations: u8) -> SlideActionWithRotation {
        SlideActionWithRotation {
            slide: self,
            rotations,
        }
    }
}

impl std::fmt::Display for SlideAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let lane = if self.direction.is_horizontal() {
            "row"
        } else {
            "column"
        };
        write!(f, "{} {} {}", lane, self.index, self.direction)
    }
}

/// A slide together with the number of 90° counter-clockwise rotations
/// applied to the spare tile before it is inserted.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SlideActionWithRotation {
    pub slide: SlideAction,
    pub rotations: u8,
}

impl SlideActionWithRotation {
    pub const fn new(direction: Direction, index: usize, rotations: u8) -> Self {
        Self {
            slide: SlideAction { direction, index },
            rotations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposites() {
        let left = SlideAction::new(Direction::Left, 2);
        assert!(left.is_opposite_of(SlideAction::new(Direction::Right, 2)));
        assert!(!left.is_opposite_of(SlideAction::new(Direction::Right, 0)));
        assert!(!left.is_opposite_of(left));
        assert!(left.is_opposite_of(left.inverse()));
        assert_eq!(left.inverse().inverse(), left);
    }

    #[test]
    fn direction_tokens() {
        assert_eq!(serde_json::to_string(&Direction::Up).unwrap(), "\"UP\"");
        assert_eq!(
            serde_json::from_str::<Direction>("\"RIGHT\"").unwrap(),
            Direction::Right
        );
        assert!(serde_json::from_str::<Direction>("\"right\"").is_err());
    }
}
