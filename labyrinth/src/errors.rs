use crate::{Color, Coordinate, GemPair, SlideAction};

/// The error type for constructing and manipulating a [`Board`](crate::Board).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    IrregularDimensions,
    InvalidSymbol { symbol: char },
    TreasuresNotUnique { treasure: GemPair },
    InvalidCoordinate { coordinate: Coordinate },
    InvalidSelection { slide: SlideAction },
    OutOfRange { slide: SlideAction },
    NotEnoughTreasures { tiles: usize },
}

impl std::error::Error for BoardError {}

impl std::fmt::Display for BoardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoardError::IrregularDimensions =>
                write!(f, "The grid of tiles is empty or not rectangular"),
            BoardError::InvalidSymbol { symbol } =>
                write!(f, "'{}' is not a connector symbol", symbol),
            BoardError::TreasuresNotUnique { treasure } =>
                write!(f, "The treasure {} appears on more than one tile", treasure),
            BoardError::InvalidCoordinate { coordinate } =>
                write!(f, "The coordinate {} is not on the board", coordinate),
            BoardError::InvalidSelection { slide } =>
                write!(f, "Cannot slide {}: the lane is not moveable", slide),
            BoardError::OutOfRange { slide } =>
                write!(f, "Cannot slide {}: the index is outside of the board", slide),
            BoardError::NotEnoughTreasures { tiles } =>
                write!(f, "There are not enough distinct treasures for {} tiles", tiles),
        }
    }
}

/// The error type for executing an [`Action`](crate::Action).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IllegalMove {
    UndoesPreviousMove { slide: SlideAction },
    SamePosition { position: Coordinate },
    Unreachable { from: Coordinate, to: Coordinate },
    Board(BoardError),
}

impl std::error::Error for IllegalMove {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IllegalMove::Board(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for IllegalMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IllegalMove::UndoesPreviousMove { slide } =>
                write!(f, "Sliding {} undoes the previous slide", slide),
            IllegalMove::SamePosition { position } =>
                write!(f, "The avatar would stay on {} without having been moved", position),
            IllegalMove::Unreachable { from, to } =>
                write!(f, "There is no path from {} to {}", from, to),
            IllegalMove::Board(_) => write!(f, "The board rejected the slide"),
        }
    }
}

impl From<BoardError> for IllegalMove {
    fn from(err: BoardError) -> Self {
        IllegalMove::Board(err)
    }
}

/// The error type for constructing and querying game states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    NoPlayers,
    UnknownPlayer { color: Color },
    PlayerOutOfBounds { color: Color },
    ColorsNotUnique,
    HomesNotUnique,
    HomeOnMoveableTile { color: Color },
    GoalOutOfBounds { goal: Coordinate },
    GoalOnMoveableTile { goal: Coordinate },
    PlayerInfoMismatch { color: Color },
    TooManyPlayers { requested: usize, available: usize },
    IllegalMove(IllegalMove),
}

impl std::error::Error for StateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StateError::IllegalMove(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for StateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateError::NoPlayers => write!(f, "There are no players left in the game"),
            StateError::UnknownPlayer { color } =>
                write!(f, "No player with color {} is in the game", color),
            StateError::PlayerOutOfBounds { color } =>
                write!(f, "The position or home of player {} is not on the board", color),
            StateError::ColorsNotUnique => write!(f, "Player colors must be unique"),
            StateError::HomesNotUnique => write!(f, "Player homes must be unique"),
            StateError::HomeOnMoveableTile { color } =>
                write!(f, "The home of player {} is on a moveable tile", color),
            StateError::GoalOutOfBounds { goal } =>
                write!(f, "The goal {} is not on the board", goal),
            StateError::GoalOnMoveableTile { goal } =>
                write!(f, "The goal {} is on a moveable tile", goal),
            StateError::PlayerInfoMismatch { color } =>
                write!(f, "Public and private information disagree about player {}", color),
            StateError::TooManyPlayers { requested, available } =>
                write!(f, "Cannot place {} players on {} immovable tiles", requested, available),
            StateError::IllegalMove(_) => write!(f, "Illegal move"),
        }
    }
}

impl From<IllegalMove> for StateError {
    fn from(err: IllegalMove) -> Self {
        StateError::IllegalMove(err)
    }
}

impl From<BoardError> for StateError {
    fn from(err: BoardError) -> Self {
        StateError::IllegalMove(IllegalMove::Board(err))
    }
}
