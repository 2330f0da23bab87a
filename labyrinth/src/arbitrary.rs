use quickcheck::{Arbitrary, Gen};
use rand::rngs::StdRng;
use rand::SeedableRng;
use strum::IntoEnumIterator;

use crate::{
    random_game_state, Action, Board, Connector, Direction, GameState, Gem, GemPair, GridSize,
    SlideAction, SlideActionWithRotation, StateConfig, Tile,
};

/// A board of 1x1 up to 6x6 random connectors.
#[derive(Clone, Debug)]
pub struct ArbitraryBoard(pub Board);

/// A board with a slide that it accepts, and a spare tile to insert.
#[derive(Clone, Debug)]
pub struct BoardWithSlide {
    pub board: Board,
    pub slide: SlideAction,
    pub spare: Tile,
}

/// Any slide with up to three rotations, not necessarily legal.
#[derive(Clone, Debug)]
pub struct ArbitrarySlide(pub SlideActionWithRotation);

/// A random game in progress, with at least one player.
#[derive(Clone, Debug)]
pub struct ArbitraryState(pub GameState);

fn small(g: &mut Gen, min: usize, max: usize) -> usize {
    min + usize::arbitrary(g) % (max - min + 1)
}

// Also returns the treasures that were not used.
fn board_and_leftovers(g: &mut Gen) -> (Board, impl Iterator<Item = GemPair>) {
    let rows = small(g, 1, 6);
    let columns = small(g, 1, 6);
    let mut treasures = GemPair::all();
    let grid = (0..rows)
        .map(|_| {
            (0..columns)
                .map(|_| Tile::new(Connector::arbitrary(g), treasures.next().unwrap()))
                .collect()
        })
        .collect();
    (Board::new(grid).unwrap(), treasures)
}

impl Arbitrary for ArbitraryBoard {
    fn arbitrary(g: &mut Gen) -> Self {
        ArbitraryBoard(board_and_leftovers(g).0)
    }
}

impl Arbitrary for BoardWithSlide {
    fn arbitrary(g: &mut Gen) -> Self {
        let (board, mut treasures) = board_and_leftovers(g);
        let direction = Direction::arbitrary(g);
        let lane_len = if direction.is_horizontal() {
            board.size().rows
        } else {
            board.size().columns
        };
        // Only even lanes can be slid
        let index = 2 * (usize::arbitrary(g) % ((lane_len + 1) / 2));
        let spare = Tile::new(Connector::arbitrary(g), treasures.next().unwrap());
        BoardWithSlide {
            board,
            slide: SlideAction::new(direction, index),
            spare,
        }
    }
}

impl Arbitrary for ArbitrarySlide {
    fn arbitrary(g: &mut Gen) -> Self {
        let direction = Direction::arbitrary(g);
        let index = usize::arbitrary(g) % 8;
        let rotations = u8::arbitrary(g) % 4;
        ArbitrarySlide(SlideActionWithRotation::new(direction, index, rotations))
    }
}

impl Arbitrary for ArbitraryState {
    fn arbitrary(g: &mut Gen) -> Self {
        let size = GridSize::new(small(g, 2, 8), small(g, 2, 8));
        let homes = (size.rows / 2) * (size.columns / 2);
        let num_players = small(g, 1, homes.min(4));
        let mut rng = StdRng::seed_from_u64(u64::arbitrary(g));
        let mut state = random_game_state(&mut rng, size, num_players, &StateConfig::default()).unwrap();

        // Make a move, so that there is a previous slide.
        let slide = ArbitrarySlide::arbitrary(g).0;
        if let Ok(reachable) = state.public_mut().reachable_after(slide) {
            for destination in reachable {
                if state.execute_action(Action::Move { slide, destination }).is_ok() {
                    break;
                }
            }
        }
        for _ in 0..usize::arbitrary(g) % num_players {
            state.set_next_active_player().unwrap();
        }
        ArbitraryState(state)
    }
}

impl Arbitrary for Direction {
    fn arbitrary(g: &mut Gen) -> Self {
        *g.choose(&Direction::ALL).unwrap()
    }
}

impl Arbitrary for Connector {
    fn arbitrary(g: &mut Gen) -> Self {
        *g.choose(&Connector::ALL).unwrap()
    }
}

impl Arbitrary for Gem {
    fn arbitrary(g: &mut Gen) -> Self {
        let gems: Vec<Gem> = Gem::iter().collect();
        *g.choose(&gems).unwrap()
    }
}
