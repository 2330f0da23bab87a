use crate::{Color, Coordinate};

/// The publicly known state of a single player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerState {
    pub color: Color,
    /// Where the avatar currently is.
    pub position: Coordinate,
    pub home: Coordinate,
}

impl PlayerState {
    pub fn new(color: Color, position: Coordinate, home: Coordinate) -> Self {
        Self {
            color,
            position,
            home,
        }
    }

    pub fn is_home(&self) -> bool {
        self.position == self.home
    }
}

/// What only the referee knows about a player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrivatePlayerInfo {
    /// The current target, either a treasure or the home.
    pub goal: Coordinate,
    /// Once set, the player is on its way home.
    pub has_reached_all_goals: bool,
    pub treasures_collected: u32,
    pub has_returned_home: bool,
}

impl PrivatePlayerInfo {
    pub fn new(goal: Coordinate) -> Self {
        Self {
            goal,
            has_reached_all_goals: false,
            treasures_collected: 0,
            has_returned_home: false,
        }
    }
}
