use std::collections::BTreeMap;

use labyrinth::{
    board, Action, Board, Color, Connector, Coordinate, Direction, GameState, Gem, GemPair, PlayerState,
    PrivatePlayerInfo, PublicGameState, SlideActionWithRotation, StateConfig, Tile,
};
use labyrinth_player::Player;

pub fn red() -> Color {
    Color::new("red").unwrap()
}

pub fn blue() -> Color {
    Color::new("blue").unwrap()
}

/// A 5x5 board of crossings, on which every tile is always reachable.
///
/// Red moves first, starting at home on (1, 1) with its goal at (1, 3).
/// Blue starts at home on (3, 3) with its goal at (3, 1).
pub fn cross_board_state(goal_sequence: Vec<Coordinate>) -> GameState {
    let board = board!["┼┼┼┼┼", "┼┼┼┼┼", "┼┼┼┼┼", "┼┼┼┼┼", "┼┼┼┼┼"];
    two_player_state(board, goal_sequence)
}

/// Like [`cross_board_state`], but blue sits on a horizontal tile between
/// two columns of vertical ones. No single slide lets blue leave (3, 3).
pub fn walled_in_state() -> GameState {
    let board = board!["┼┼┼┼┼", "┼┼┼┼┼", "┼┼│┼│", "┼┼│─│", "┼┼│┼│"];
    two_player_state(board, Vec::new())
}

fn two_player_state(board: Board, goal_sequence: Vec<Coordinate>) -> GameState {
    let spare = Tile::new(Connector::Cross, GemPair::new(Gem::Zircon, Gem::Zoisite));
    let red_home = Coordinate::new(1, 1);
    let blue_home = Coordinate::new(3, 3);
    let players = vec![
        PlayerState::new(red(), red_home, red_home),
        PlayerState::new(blue(), blue_home, blue_home),
    ];
    let private = BTreeMap::from([
        (red(), PrivatePlayerInfo::new(Coordinate::new(1, 3))),
        (blue(), PrivatePlayerInfo::new(Coordinate::new(3, 1))),
    ]);
    let config = StateConfig::default();
    let public = PublicGameState::new(board, spare, players, None, &config).unwrap();
    GameState::new(public, private, goal_sequence, &config).unwrap()
}

/// Only red, on the same board as [`cross_board_state`].
pub fn single_player_state(goal_sequence: Vec<Coordinate>) -> GameState {
    let mut state = cross_board_state(goal_sequence);
    state.kick_player(&blue()).unwrap();
    state
}

/// Always passes.
pub struct Passer(pub &'static str);

#[async_trait::async_trait]
impl Player for Passer {
    fn name(&self) -> &str {
        self.0
    }

    async fn setup(&mut self, _state: Option<PublicGameState>, _goal: Coordinate) -> anyhow::Result<()> {
        Ok(())
    }

    async fn take_turn(&mut self, _state: PublicGameState) -> anyhow::Result<Action> {
        Ok(Action::Pass)
    }

    async fn win(&mut self, _won: bool) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Tries to slide row 1, which is fixed.
pub struct Cheater;

#[async_trait::async_trait]
impl Player for Cheater {
    fn name(&self) -> &str {
        "cheater"
    }

    async fn setup(&mut self, _state: Option<PublicGameState>, _goal: Coordinate) -> anyhow::Result<()> {
        Ok(())
    }

    async fn take_turn(&mut self, _state: PublicGameState) -> anyhow::Result<Action> {
        Ok(Action::Move {
            slide: SlideActionWithRotation::new(Direction::Left, 1, 0),
            destination: Coordinate::new(1, 1),
        })
    }

    async fn win(&mut self, _won: bool) -> anyhow::Result<()> {
        Ok(())
    }
}
