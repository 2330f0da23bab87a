use std::collections::{BTreeSet, HashSet};

use crate::{
    Action, Board, BoardError, Color, Coordinate, IllegalMove, PlayerState, SlideAction,
    SlideActionWithRotation, StateConfig, StateError, Tile,
};

/// Everything about a game that all players may know.
///
/// The first player in [`players()`](Self::players) is the active one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicGameState {
    board: Board,
    spare: Tile,
    players: Vec<PlayerState>,
    last_slide: Option<SlideAction>,
}

impl PublicGameState {
    pub fn new(
        board: Board,
        spare: Tile,
        players: Vec<PlayerState>,
        last_slide: Option<SlideAction>,
        config: &StateConfig,
    ) -> Result<Self, StateError> {
        let size = board.size();
        for player in &players {
            if !size.contains(player.position) || !size.contains(player.home) {
                return Err(StateError::PlayerOutOfBounds {
                    color: player.color.clone(),
                });
            }
        }

        let colors: HashSet<&Color> = players.iter().map(|p| &p.color).collect();
        if colors.len() != players.len() {
            return Err(StateError::ColorsNotUnique);
        }

        if config.enforce_unique_homes {
            let homes: HashSet<Coordinate> = players.iter().map(|p| p.home).collect();
            if homes.len() != players.len() {
                return Err(StateError::HomesNotUnique);
            }
        }

        if config.enforce_immovable_homes {
            if let Some(player) = players.iter().find(|p| board.is_coordinate_moveable(p.home)) {
                return Err(StateError::HomeOnMoveableTile {
                    color: player.color.clone(),
                });
            }
        }

        Ok(Self {
            board,
            spare,
            players,
            last_slide,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn spare(&self) -> Tile {
        self.spare
    }

    /// All players in turn order, starting with the active one.
    pub fn players(&self) -> &[PlayerState] {
        &self.players
    }

    pub fn last_slide(&self) -> Option<SlideAction> {
        self.last_slide
    }

    pub fn active_player(&self) -> Result<&PlayerState, StateError> {
        self.players.first().ok_or(StateError::NoPlayers)
    }

    pub fn player(&self, color: &Color) -> Result<&PlayerState, StateError> {
        self.players
            .iter()
            .find(|p| &p.color == color)
            .ok_or_else(|| StateError::UnknownPlayer {
                color: color.clone(),
            })
    }

    /// Moves the active player to the back of the turn order.
    pub fn set_next_active_player(&mut self) -> Result<(), StateError> {
        if self.players.is_empty() {
            return Err(StateError::NoPlayers);
        }
        self.players.rotate_left(1);
        Ok(())
    }

    /// Performs an action for the active player.
    ///
    /// A move rotates the spare tile, slides it in, and then moves the
    /// active player. If any part of it is illegal, the state is left as it
    /// was. The active player stays the same.
    pub fn execute_action(&mut self, action: Action) -> Result<(), StateError> {
        let before = self.active_player()?.position;
        let Action::Move { slide, destination } = action else {
            return Ok(());
        };

        let mut speculation = Speculation::new(self);
        let state = speculation.state();
        state.apply_slide(slide)?;
        let after = state.players[0].position;
        if destination == after {
            if after == before {
                return Err(IllegalMove::SamePosition { position: after }.into());
            }
        } else {
            if !state.board.size().contains(destination) {
                return Err(BoardError::InvalidCoordinate {
                    coordinate: destination,
                }
                .into());
            }
            if !state.board.can_reach(after, destination)? {
                return Err(IllegalMove::Unreachable {
                    from: after,
                    to: destination,
                }
                .into());
            }
        }
        state.players[0].position = destination;
        speculation.commit();
        Ok(())
    }

    /// Runs `f` on the state as it would be after the given slide, then
    /// restores the state exactly as it was.
    ///
    /// The state is restored even if `f` panics, and `f` may speculate further.
    pub fn try_slide_and_undo<T>(
        &mut self,
        slide: SlideActionWithRotation,
        f: impl FnOnce(&mut PublicGameState) -> T,
    ) -> Result<T, StateError> {
        if self.players.is_empty() {
            return Err(StateError::NoPlayers);
        }
        let mut speculation = Speculation::new(self);
        speculation.state().apply_slide(slide)?;
        Ok(f(speculation.state()))
    }

    /// All coordinates the active player could move to after the given slide,
    /// including the position the slide leaves it on.
    pub fn reachable_after(
        &mut self,
        slide: SlideActionWithRotation,
    ) -> Result<BTreeSet<Coordinate>, StateError> {
        let reachable = self.try_slide_and_undo(slide, |state| {
            let position = state.players[0].position;
            state.board.reachable_from(position)
        })?;
        Ok(reachable?)
    }

    /// Removes a player. If it was active, the next player becomes active.
    pub(crate) fn kick_player(&mut self, color: &Color) -> Result<(), StateError> {
        let index = self
            .players
            .iter()
            .position(|p| &p.color == color)
            .ok_or_else(|| StateError::UnknownPlayer {
                color: color.clone(),
            })?;
        self.players.remove(index);
        Ok(())
    }

    fn apply_slide(&mut self, slide: SlideActionWithRotation) -> Result<(), IllegalMove> {
        let SlideActionWithRotation { slide, rotations } = slide;
        if self.last_slide.is_some_and(|last| last.is_opposite_of(slide)) {
            return Err(IllegalMove::UndoesPreviousMove { slide });
        }
        self.spare = self.board.slide_and_insert(slide, self.spare.rotate(rotations))?;
        for player in &mut self.players {
            player.position = self.board.slide_coordinate(slide, player.position);
        }
        self.last_slide = Some(slide);
        Ok(())
    }
}

/// Restores a snapshot of the state when dropped, unless committed.
struct Speculation<'a> {
    state: &'a mut PublicGameState,
    saved: Option<PublicGameState>,
}

impl<'a> Speculation<'a> {
    fn new(state: &'a mut PublicGameState) -> Self {
        let saved = Some(state.clone());
        Self { state, saved }
    }

    fn state(&mut self) -> &mut PublicGameState {
        &mut *self.state
    }

    fn commit(mut self) {
        self.saved = None;
    }
}

impl Drop for Speculation<'_> {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            *self.state = saved;
        }
    }
}
