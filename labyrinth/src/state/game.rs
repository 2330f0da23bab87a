use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::ops::Deref;

use crate::{Action, Color, Coordinate, PrivatePlayerInfo, PublicGameState, StateConfig, StateError};

/// The complete state of a game, as only the referee knows it.
///
/// Dereferences to the [`PublicGameState`], which is what players get to see.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    public: PublicGameState,
    private: BTreeMap<Color, PrivatePlayerInfo>,
    /// Goals handed out one after the other before players are sent home.
    goal_sequence: VecDeque<Coordinate>,
}

impl GameState {
    pub fn new(
        public: PublicGameState,
        private: BTreeMap<Color, PrivatePlayerInfo>,
        goal_sequence: Vec<Coordinate>,
        config: &StateConfig,
    ) -> Result<Self, StateError> {
        let public_colors: BTreeSet<&Color> = public.players().iter().map(|p| &p.color).collect();
        let private_colors: BTreeSet<&Color> = private.keys().collect();
        if let Some(color) = public_colors.symmetric_difference(&private_colors).next() {
            return Err(StateError::PlayerInfoMismatch {
                color: (*color).clone(),
            });
        }

        let board = public.board();
        let goals = private.values().map(|info| info.goal).chain(goal_sequence.iter().copied());
        for goal in goals {
            if !board.size().contains(goal) {
                return Err(StateError::GoalOutOfBounds { goal });
            }
            if config.enforce_immovable_goals && board.is_coordinate_moveable(goal) {
                return Err(StateError::GoalOnMoveableTile { goal });
            }
        }

        Ok(Self {
            public,
            private,
            goal_sequence: goal_sequence.into(),
        })
    }

    pub fn public(&self) -> &PublicGameState {
        &self.public
    }

    /// Mutable access to the public part. Players cannot be removed through it.
    pub fn public_mut(&mut self) -> &mut PublicGameState {
        &mut self.public
    }

    pub fn private_info(&self, color: &Color) -> Result<&PrivatePlayerInfo, StateError> {
        self.private.get(color).ok_or_else(|| StateError::UnknownPlayer {
            color: color.clone(),
        })
    }

    fn private_info_mut(&mut self, color: &Color) -> Result<&mut PrivatePlayerInfo, StateError> {
        self.private.get_mut(color).ok_or_else(|| StateError::UnknownPlayer {
            color: color.clone(),
        })
    }

    pub fn goal(&self, color: &Color) -> Result<Coordinate, StateError> {
        Ok(self.private_info(color)?.goal)
    }

    pub fn set_goal(&mut self, color: &Color, goal: Coordinate) -> Result<(), StateError> {
        self.private_info_mut(color)?.goal = goal;
        Ok(())
    }

    pub fn is_active_player_on_goal(&self) -> Result<bool, StateError> {
        let player = self.public.active_player()?;
        Ok(player.position == self.goal(&player.color)?)
    }

    pub fn has_reached_all_goals(&self, color: &Color) -> Result<bool, StateError> {
        Ok(self.private_info(color)?.has_reached_all_goals)
    }

    pub fn set_has_reached_all_goals(&mut self, color: &Color, value: bool) -> Result<(), StateError> {
        self.private_info_mut(color)?.has_reached_all_goals = value;
        Ok(())
    }

    pub fn has_returned_home(&self, color: &Color) -> Result<bool, StateError> {
        Ok(self.private_info(color)?.has_returned_home)
    }

    pub fn set_has_returned_home(&mut self, color: &Color, value: bool) -> Result<(), StateError> {
        self.private_info_mut(color)?.has_returned_home = value;
        Ok(())
    }

    pub fn treasures_collected(&self, color: &Color) -> Result<u32, StateError> {
        Ok(self.private_info(color)?.treasures_collected)
    }

    pub fn increment_treasures_collected(&mut self, color: &Color) -> Result<(), StateError> {
        self.private_info_mut(color)?.treasures_collected += 1;
        Ok(())
    }

    /// The goals that have not been handed out yet.
    pub fn goal_sequence(&self) -> &VecDeque<Coordinate> {
        &self.goal_sequence
    }

    /// Takes the next goal out of the sequence, if any are left.
    pub fn pop_next_goal(&mut self) -> Option<Coordinate> {
        self.goal_sequence.pop_front()
    }

    pub fn execute_action(&mut self, action: Action) -> Result<(), StateError> {
        self.public.execute_action(action)
    }

    pub fn set_next_active_player(&mut self) -> Result<(), StateError> {
        self.public.set_next_active_player()
    }

    /// Removes a player together with its private information.
    pub fn kick_player(&mut self, color: &Color) -> Result<(), StateError> {
        self.public.kick_player(color)?;
        self.private.remove(color);
        Ok(())
    }
}

impl Deref for GameState {
    type Target = PublicGameState;

    fn deref(&self) -> &Self::Target {
        &self.public
    }
}
