mod game;
mod public;

pub use game::*;
pub use public::*;

/// Optional invariants checked when constructing game states.
///
/// Older game descriptions violate some of these, so they can be switched
/// off individually.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StateConfig {
    /// No two players may share a home.
    pub enforce_unique_homes: bool,
    /// Homes must be on tiles that no slide can move.
    pub enforce_immovable_homes: bool,
    /// Goals must be on tiles that no slide can move.
    pub enforce_immovable_goals: bool,
}

impl StateConfig {
    /// Checks only the invariants that cannot be switched off.
    pub const fn relaxed() -> Self {
        Self {
            enforce_unique_homes: false,
            enforce_immovable_homes: false,
            enforce_immovable_goals: false,
        }
    }
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            enforce_unique_homes: true,
            enforce_immovable_homes: true,
            enforce_immovable_goals: true,
        }
    }
}
