use crate::{Coordinate, SlideActionWithRotation};

/// What a player does in its turn.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Rotate the spare tile, slide it into a lane, then move the avatar.
    Move {
        slide: SlideActionWithRotation,
        destination: Coordinate,
    },
    Pass,
}

impl Action {
    pub fn is_pass(&self) -> bool {
        matches!(self, Action::Pass)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Move { slide, destination } => write!(
                f,
                "slide {} with {} rotation(s), then move to {}",
                slide.slide, slide.rotations, destination
            ),
            Action::Pass => write!(f, "pass"),
        }
    }
}
