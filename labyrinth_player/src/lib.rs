mod client;
mod faulty;
mod strategy_player;
pub use client::*;
pub use faulty::*;
pub use strategy_player::*;

use labyrinth::{Action, Coordinate, PublicGameState};

/// What the referee can ask of a player.
///
/// The referee does not know whether a player computes its actions locally
/// or forwards the calls to a remote process. Any error, as well as taking
/// too long, gets the player removed from the game.
#[async_trait::async_trait]
pub trait Player: Send {
    fn name(&self) -> &str;

    /// Tells the player its next goal.
    ///
    /// The state is omitted in the first call, before the game has started.
    async fn setup(&mut self, state: Option<PublicGameState>, goal: Coordinate) -> anyhow::Result<()>;

    async fn take_turn(&mut self, state: PublicGameState) -> anyhow::Result<Action>;

    /// Tells the player whether it won, once the game is over.
    async fn win(&mut self, won: bool) -> anyhow::Result<()>;
}

#[async_trait::async_trait]
impl<P: Player + ?Sized> Player for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn setup(&mut self, state: Option<PublicGameState>, goal: Coordinate) -> anyhow::Result<()> {
        (**self).setup(state, goal).await
    }

    async fn take_turn(&mut self, state: PublicGameState) -> anyhow::Result<Action> {
        (**self).take_turn(state).await
    }

    async fn win(&mut self, won: bool) -> anyhow::Result<()> {
        (**self).win(won).await
    }
}

/// Player names consist of 1 to 20 ASCII letters and digits.
pub fn is_valid_name(name: &str) -> bool {
    (1..=20).contains(&name.len()) && name.chars().all(|c| c.is_ascii_alphanumeric())
}
