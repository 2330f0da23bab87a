use std::sync::Arc;

use anyhow::{anyhow, Context};
use labyrinth::{Action, Coordinate, PublicGameState, Strategy, StrategyDesignation};
use tracing::debug;

use crate::Player;

/// A player that picks its actions with a [`Strategy`], in-process.
pub struct StrategyPlayer {
    name: String,
    strategy: Arc<dyn Strategy + Send + Sync>,
    goal: Option<Coordinate>,
}

impl StrategyPlayer {
    pub fn new(name: impl Into<String>, designation: StrategyDesignation) -> Self {
        Self::with_strategy(name, Arc::from(designation.strategy()))
    }

    pub fn with_strategy(name: impl Into<String>, strategy: Arc<dyn Strategy + Send + Sync>) -> Self {
        Self {
            name: name.into(),
            strategy,
            goal: None,
        }
    }

    /// The goal given in the most recent `setup` call.
    pub fn goal(&self) -> Option<Coordinate> {
        self.goal
    }
}

#[async_trait::async_trait]
impl Player for StrategyPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    async fn setup(&mut self, _state: Option<PublicGameState>, goal: Coordinate) -> anyhow::Result<()> {
        debug!(name: "New goal", player = self.name, row = goal.row, column = goal.column);
        self.goal = Some(goal);
        Ok(())
    }

    async fn take_turn(&mut self, state: PublicGameState) -> anyhow::Result<Action> {
        let goal = self
            .goal
            .ok_or_else(|| anyhow!("Player {} was asked to take a turn before setup", self.name))?;
        let strategy = Arc::clone(&self.strategy);
        // The search can take a while on large boards, keep it off the
        // async workers so that the caller's timeout can still fire.
        tokio::task::spawn_blocking(move || strategy.compute_action(&state, goal))
            .await
            .context("Strategy computation failed")
    }

    async fn win(&mut self, won: bool) -> anyhow::Result<()> {
        debug!(name: "Game over", player = self.name, won);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use labyrinth::{board, Color, Connector, Direction, Gem, GemPair, PlayerState, SlideActionWithRotation, StateConfig, Tile};

    use super::*;

    fn corridor_state() -> PublicGameState {
        let red = PlayerState::new(
            Color::new("red").unwrap(),
            Coordinate::new(1, 1),
            Coordinate::new(1, 1),
        );
        let spare = Tile::new(Connector::Horizontal, GemPair::new(Gem::Zircon, Gem::Zoisite));
        PublicGameState::new(
            board!["──│", "─│─", "───"],
            spare,
            vec![red],
            None,
            &StateConfig::relaxed(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn requires_setup() {
        let mut player = StrategyPlayer::new("jill", StrategyDesignation::Riemann);
        assert!(player.take_turn(corridor_state()).await.is_err());
    }

    #[tokio::test]
    async fn takes_turns_with_its_strategy() {
        let mut player = StrategyPlayer::new("jill", StrategyDesignation::Euclid);
        player.setup(None, Coordinate::new(0, 0)).await.unwrap();
        assert_eq!(player.goal(), Some(Coordinate::new(0, 0)));
        let action = player.take_turn(corridor_state()).await.unwrap();
        assert_eq!(
            action,
            Action::Move {
                slide: SlideActionWithRotation::new(Direction::Left, 0, 0),
                destination: Coordinate::new(0, 1),
            }
        );
        player.win(true).await.unwrap();
    }

    #[tokio::test]
    async fn setup_replaces_goal() {
        let mut player = StrategyPlayer::new("jill", StrategyDesignation::Riemann);
        player.setup(None, Coordinate::new(0, 0)).await.unwrap();
        player.setup(Some(corridor_state()), Coordinate::new(2, 2)).await.unwrap();
        assert_eq!(player.goal(), Some(Coordinate::new(2, 2)));
    }
}
