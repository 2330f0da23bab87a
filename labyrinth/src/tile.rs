use serde::{Deserialize, Serialize};

use crate::{Direction, GemPair};

/// The shape of the paths on a tile, i.e. which of its four edges are open.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Connector {
    #[serde(rename = "│")]
    Vertical,
    #[serde(rename = "─")]
    Horizontal,
    #[serde(rename = "┐")]
    LeftBottom,
    #[serde(rename = "└")]
    TopRight,
    #[serde(rename = "┌")]
    RightBottom,
    #[serde(rename = "┘")]
    LeftTop,
    #[serde(rename = "┬")]
    TeeDown,
    #[serde(rename = "├")]
    TeeRight,
    #[serde(rename = "┴")]
    TeeUp,
    #[serde(rename = "┤")]
    TeeLeft,
    #[serde(rename = "┼")]
    Cross,
}

/// Open edges of a tile, in the order left, top, right, bottom.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Openings([bool; 4]);

impl Openings {
    const LEFT: usize = 0;
    const TOP: usize = 1;
    const RIGHT: usize = 2;
    const BOTTOM: usize = 3;

    fn rotate(self, rotations: u8) -> Openings {
        let n = usize::from(rotations % 4);
        let mut rotated = [false; 4];
        for (i, &open) in self.0.iter().enumerate() {
            rotated[(i + 4 - n) % 4] = open;
        }
        Openings(rotated)
    }
}

impl Connector {
    pub const ALL: [Connector; 11] = [
        Connector::Vertical,
        Connector::Horizontal,
        Connector::LeftBottom,
        Connector::TopRight,
        Connector::RightBottom,
        Connector::LeftTop,
        Connector::TeeDown,
        Connector::TeeRight,
        Connector::TeeUp,
        Connector::TeeLeft,
        Connector::Cross,
    ];

    fn openings(self) -> Openings {
        //                   left   top    right  bottom
        let edges = match self {
            Connector::Vertical => [false, true, false, true],
            Connector::Horizontal => [true, false, true, false],
            Connector::LeftBottom => [true, false, false, true],
            Connector::TopRight => [false, true, true, false],
            Connector::RightBottom => [false, false, true, true],
            Connector::LeftTop => [true, true, false, false],
            Connector::TeeDown => [true, false, true, true],
            Connector::TeeRight => [false, true, true, true],
            Connector::TeeUp => [true, true, true, false],
            Connector::TeeLeft => [true, true, false, true],
            Connector::Cross => [true, true, true, true],
        };
        Openings(edges)
    }

    fn from_openings(openings: Openings) -> Connector {
        // Every shape with at least two open edges has a connector, and
        // rotation preserves the number of open edges.
        Connector::ALL
            .into_iter()
            .find(|c| c.openings() == openings)
            .unwrap_or(Connector::Cross)
    }

    /// Rotates the shape by `rotations` quarter-turns counter-clockwise.
    pub fn rotate(self, rotations: u8) -> Connector {
        Connector::from_openings(self.openings().rotate(rotations))
    }

    /// Whether a path leaves this shape through the edge facing `direction`.
    pub fn is_open(self, direction: Direction) -> bool {
        let edge = match direction {
            Direction::Left => Openings::LEFT,
            Direction::Up => Openings::TOP,
            Direction::Right => Openings::RIGHT,
            Direction::Down => Openings::BOTTOM,
        };
        self.openings().0[edge]
    }

    pub fn as_char(self) -> char {
        match self {
            Connector::Vertical => '│',
            Connector::Horizontal => '─',
            Connector::LeftBottom => '┐',
            Connector::TopRight => '└',
            Connector::RightBottom => '┌',
            Connector::LeftTop => '┘',
            Connector::TeeDown => '┬',
            Connector::TeeRight => '├',
            Connector::TeeUp => '┴',
            Connector::TeeLeft => '┤',
            Connector::Cross => '┼',
        }
    }
}

/// The error type for the [`TryFrom<char>`] instance of [`Connector`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvalidConnector(pub char);

impl std::error::Error for InvalidConnector {}

impl std::fmt::Display for InvalidConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}' is not a connector symbol", self.0)
    }
}

impl TryFrom<char> for Connector {
    type Error = InvalidConnector;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        Connector::ALL
            .into_iter()
            .find(|connector| connector.as_char() == c)
            .ok_or(InvalidConnector(c))
    }
}

impl std::fmt::Display for Connector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A tile of the board. Tiles are values: rotating one yields a new tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Tile {
    pub connector: Connector,
    pub treasure: GemPair,
}

impl Tile {
    pub fn new(connector: Connector, treasure: GemPair) -> Self {
        Self {
            connector,
            treasure,
        }
    }

    pub fn rotate(self, rotations: u8) -> Tile {
        Tile {
            connector: self.connector.rotate(rotations),
            treasure: self.treasure,
        }
    }

    /// Whether a path leads from this tile into `other`, placed next to it in `direction`.
    pub fn connects_to(&self, other: &Tile, direction: Direction) -> bool {
        self.connector.is_open(direction) && other.connector.is_open(direction.opposite())
    }
}
