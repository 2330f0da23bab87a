use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Action, Coordinate, Direction, PublicGameState, SlideAction, SlideActionWithRotation};

/// Picks actions for the active player.
///
/// Every strategy searches all slides and rotations of the spare tile for
/// the coordinates the active player could reach. If the goal is among them,
/// the player moves there. Otherwise, [`compare`](Self::compare) decides which
/// reachable coordinate is best.
pub trait Strategy {
    /// Orders two candidate destinations, the preferred one first.
    fn compare(&self, goal: Coordinate, a: &Coordinate, b: &Coordinate) -> Ordering;

    fn compute_action(&self, state: &PublicGameState, goal: Coordinate) -> Action {
        let candidates = reachable_destinations(state, Some(goal));
        let destination = if candidates.contains_key(&goal) {
            Some(goal)
        } else {
            candidates.keys().copied().min_by(|a, b| self.compare(goal, a, b))
        };
        match destination.and_then(|d| candidates.get(&d).map(|&slide| (slide, d))) {
            Some((slide, destination)) => Action::Move { slide, destination },
            None => Action::Pass,
        }
    }
}

/// Prefers the destination that comes first in row-major order.
#[derive(Copy, Clone, Debug, Default)]
pub struct Riemann;

impl Strategy for Riemann {
    fn compare(&self, _goal: Coordinate, a: &Coordinate, b: &Coordinate) -> Ordering {
        a.cmp(b)
    }
}

/// Prefers the destination closest to the goal.
#[derive(Copy, Clone, Debug, Default)]
pub struct Euclid;

impl Strategy for Euclid {
    fn compare(&self, goal: Coordinate, a: &Coordinate, b: &Coordinate) -> Ordering {
        Coordinate::cmp_by_distance_to(goal, a, b)
    }
}

/// Names a strategy, e.g. in game descriptions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyDesignation {
    Riemann,
    Euclid,
}

impl StrategyDesignation {
    pub fn strategy(self) -> Box<dyn Strategy + Send + Sync> {
        match self {
            StrategyDesignation::Riemann => Box::new(Riemann),
            StrategyDesignation::Euclid => Box::new(Euclid),
        }
    }
}

impl FromStr for StrategyDesignation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Riemann" => Ok(StrategyDesignation::Riemann),
            "Euclid" => Ok(StrategyDesignation::Euclid),
            other => Err(format!("Unknown strategy '{}'", other)),
        }
    }
}

impl std::fmt::Display for StrategyDesignation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Maps every coordinate the active player can move to onto the first
/// slide (with rotation) that makes it reachable.
///
/// Slides are tried rows first, then columns, each by ascending index, then
/// in [`Direction`] order, then with zero to three rotations. The search stops
/// early once `stop_at` has been found or every coordinate is covered.
pub fn reachable_destinations(
    state: &PublicGameState,
    stop_at: Option<Coordinate>,
) -> BTreeMap<Coordinate, SlideActionWithRotation> {
    let mut found = BTreeMap::new();
    let Ok(before) = state.active_player().map(|p| p.position) else {
        return found;
    };
    let mut state = state.clone();
    let area = state.board().size().area();

    for slide in candidate_slides(&state) {
        for rotations in 0..4 {
            let done = found.len() == area || stop_at.is_some_and(|c| found.contains_key(&c));
            if done {
                return found;
            }
            let slide = slide.with_rotations(rotations);
            let reachable = state.try_slide_and_undo(slide, |inner| {
                let after = inner.active_player().map(|p| p.position);
                let reachable = after.map(|a| (a, inner.board().reachable_from(a)));
                match reachable {
                    Ok((after, Ok(coordinates))) => Some((after, coordinates)),
                    _ => None,
                }
            });
            let Ok(Some((after, coordinates))) = reachable else {
                continue;
            };
            for coordinate in coordinates {
                if coordinate == after && after == before {
                    continue;
                }
                found.entry(coordinate).or_insert(slide);
            }
        }
    }
    found
}

// Legal slides in search order.
fn candidate_slides(state: &PublicGameState) -> Vec<SlideAction> {
    let board = state.board();
    let size = board.size();
    let rows = (0..size.rows)
        .filter(|&i| board.is_row_moveable(i))
        .flat_map(|i| Direction::HORIZONTAL.map(|d| SlideAction::new(d, i)));
    let columns = (0..size.columns)
        .filter(|&i| board.is_column_moveable(i))
        .flat_map(|i| Direction::VERTICAL.map(|d| SlideAction::new(d, i)));
    rows.chain(columns)
        .filter(|&slide| crate::rules::is_slide_legal(state, slide))
        .collect()
}
