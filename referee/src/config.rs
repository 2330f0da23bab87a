use std::time::Duration;

use labyrinth::{GridSize, StateConfig};

/// The most players a game can have.
pub const MAX_PLAYERS: usize = 6;

#[derive(Clone, Debug)]
pub struct RefereeConfig {
    /// The size of generated boards, and the minimum size of given ones.
    pub board_size: GridSize,
    /// How long a player may take for any single call.
    pub timeout: Duration,
    pub max_rounds: usize,
    /// Checks applied to generated game states.
    pub state_config: StateConfig,
    /// Seed for generating game states. Random if not set.
    pub seed: Option<u64>,
}

impl Default for RefereeConfig {
    fn default() -> Self {
        Self {
            board_size: GridSize::new(7, 7),
            timeout: Duration::from_secs(4),
            max_rounds: 1000,
            state_config: StateConfig::default(),
            seed: None,
        }
    }
}
