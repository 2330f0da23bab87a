use std::collections::{BTreeMap, BTreeSet};

use rand::seq::{IteratorRandom, SliceRandom};
use rand::Rng;

use crate::{
    Board, BoardError, Color, Connector, GameState, GemPair, GridSize, PlayerState,
    PrivatePlayerInfo, PublicGameState, StateConfig, StateError, Tile,
};

pub fn random_connector<R: Rng + ?Sized>(rng: &mut R) -> Connector {
    Connector::ALL[rng.gen_range(0..Connector::ALL.len())]
}

/// A board of random tiles, plus a spare tile.
///
/// All treasures, including the spare's, are distinct.
pub fn random_board<R: Rng + ?Sized>(rng: &mut R, size: GridSize) -> Result<(Board, Tile), BoardError> {
    if size.rows == 0 || size.columns == 0 {
        return Err(BoardError::IrregularDimensions);
    }
    let tiles = size.area() + 1;
    let mut treasures = GemPair::all().choose_multiple(rng, tiles);
    if treasures.len() < tiles {
        return Err(BoardError::NotEnoughTreasures { tiles });
    }
    treasures.shuffle(rng);

    let mut tiles = treasures
        .into_iter()
        .map(|treasure| Tile::new(random_connector(rng), treasure))
        .collect::<Vec<_>>();
    let Some(spare) = tiles.pop() else {
        return Err(BoardError::IrregularDimensions);
    };
    let rows = tiles.chunks(size.columns).map(<[Tile]>::to_vec).collect();
    Ok((Board::new(rows)?, spare))
}

/// A fresh game on a random board.
///
/// Every player starts at its home. Homes are distinct and immovable, and so
/// are the goals. Colors are random hex codes.
pub fn random_game_state<R: Rng + ?Sized>(
    rng: &mut R,
    size: GridSize,
    num_players: usize,
    config: &StateConfig,
) -> Result<GameState, StateError> {
    let (board, spare) = random_board(rng, size)?;
    let immovable: Vec<_> = size
        .coordinates()
        .filter(|&c| !board.is_coordinate_moveable(c))
        .collect();
    if immovable.len() < num_players {
        return Err(StateError::TooManyPlayers {
            requested: num_players,
            available: immovable.len(),
        });
    }

    let mut colors = BTreeSet::new();
    while colors.len() < num_players {
        colors.insert(Color::random(rng));
    }
    let homes: Vec<_> = immovable.choose_multiple(rng, num_players).copied().collect();

    let mut players = Vec::with_capacity(num_players);
    let mut private = BTreeMap::new();
    for (color, home) in colors.into_iter().zip(homes) {
        let goal = immovable.choose(rng).copied().unwrap_or(home);
        private.insert(color.clone(), PrivatePlayerInfo::new(goal));
        players.push(PlayerState::new(color, home, home));
    }
    players.shuffle(rng);

    let public = PublicGameState::new(board, spare, players, None, config)?;
    GameState::new(public, private, Vec::new(), config)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn random_states_are_valid() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let size = GridSize::new(3 + seed as usize % 5, 3 + seed as usize % 3);
            let state = random_game_state(&mut rng, size, 1, &StateConfig::default()).unwrap();
            assert_eq!(state.board().size(), size);
            assert_eq!(state.players().len(), 1);
            let player = state.active_player().unwrap();
            assert!(player.is_home());
            assert!(!state.board().is_coordinate_moveable(state.goal(&player.color).unwrap()));

            let mut treasures: HashSet<GemPair> =
                state.board().rows().flatten().map(|tile| tile.treasure).collect();
            assert_eq!(treasures.len(), size.area());
            assert!(treasures.insert(state.spare().treasure));
        }
    }

    #[test]
    fn homes_are_distinct() {
        let mut rng = StdRng::seed_from_u64(3);
        let state = random_game_state(&mut rng, GridSize::new(7, 7), 6, &StateConfig::default()).unwrap();
        let homes: HashSet<_> = state.players().iter().map(|p| p.home).collect();
        assert_eq!(homes.len(), 6);
    }

    #[test]
    fn same_seed_same_game() {
        let size = GridSize::new(5, 5);
        let a = random_game_state(&mut StdRng::seed_from_u64(42), size, 2, &StateConfig::default());
        let b = random_game_state(&mut StdRng::seed_from_u64(42), size, 2, &StateConfig::default());
        assert_eq!(a, b);
    }

    #[test]
    fn not_enough_homes() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            random_game_state(&mut rng, GridSize::new(3, 3), 2, &StateConfig::default()),
            Err(StateError::TooManyPlayers {
                requested: 2,
                available: 1
            })
        );
        assert_eq!(
            random_board(&mut rng, GridSize::new(0, 3)).map(|_| ()),
            Err(BoardError::IrregularDimensions)
        );
    }
}
