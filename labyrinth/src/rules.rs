//! Legality checks for actions, without side effects.
//!
//! The checks speculate on a mutable state, but always leave it unchanged.

use crate::{
    Action, BoardError, IllegalMove, PublicGameState, SlideAction, StateError,
};

/// Whether the slide addresses a moveable lane and does not undo the previous slide.
pub fn is_slide_legal(state: &PublicGameState, slide: SlideAction) -> bool {
    check_slide(state, slide).is_ok()
}

/// Like [`is_slide_legal`], but explains why a slide is illegal.
pub fn check_slide(state: &PublicGameState, slide: SlideAction) -> Result<(), IllegalMove> {
    if state.last_slide().is_some_and(|last| last.is_opposite_of(slide)) {
        return Err(IllegalMove::UndoesPreviousMove { slide });
    }
    let board = state.board();
    let lane_len = if slide.direction.is_horizontal() {
        board.size().rows
    } else {
        board.size().columns
    };
    if slide.index >= lane_len {
        return Err(BoardError::OutOfRange { slide }.into());
    }
    if !board.is_slide_moveable(slide) {
        return Err(BoardError::InvalidSelection { slide }.into());
    }
    Ok(())
}

/// Whether the active player may perform the action.
pub fn is_action_legal(state: &mut PublicGameState, action: Action) -> bool {
    check_action(state, action).is_ok()
}

/// Like [`is_action_legal`], but explains why an action is illegal.
///
/// A move is legal if its slide is legal and the destination can be reached
/// from where the slide leaves the active player. Staying on that spot only
/// counts as a move if the slide moved the player there.
pub fn check_action(state: &mut PublicGameState, action: Action) -> Result<(), StateError> {
    let before = state.active_player()?.position;
    let Action::Move { slide, destination } = action else {
        return Ok(());
    };
    check_slide(state, slide.slide)?;

    state.try_slide_and_undo(slide, |state| -> Result<(), StateError> {
        let after = state.active_player()?.position;
        if destination == after {
            return if after == before {
                Err(IllegalMove::SamePosition { position: after }.into())
            } else {
                Ok(())
            };
        }
        if !state.board().size().contains(destination) {
            return Err(BoardError::InvalidCoordinate {
                coordinate: destination,
            }
            .into());
        }
        if state.board().can_reach(after, destination)? {
            Ok(())
        } else {
            Err(IllegalMove::Unreachable {
                from: after,
                to: destination,
            }
            .into())
        }
    })?
}
