use labyrinth::GameState;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::warn;

use crate::GameResult;

/// Watches a game without taking part in it.
///
/// Events are delivered in order, but on a separate thread, so a slow
/// observer never holds up the game. An observer that is still busy shortly
/// after the game ended is detached from the referee.
pub trait Observer: Send {
    /// Called with a snapshot after setup and after every turn, along with
    /// the number of players that passed so far in the current round.
    fn on_state_update(&mut self, state: &GameState, passes: usize);

    fn on_game_over(&mut self, result: &GameResult);
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObserverId(pub(crate) usize);

enum Event {
    StateUpdate(Box<GameState>, usize),
    GameOver(GameResult),
}

/// The delivery of events to one observer during a game.
pub(crate) struct ObserverFeed {
    id: ObserverId,
    sender: mpsc::UnboundedSender<Event>,
    task: JoinHandle<Box<dyn Observer>>,
}

impl ObserverFeed {
    pub(crate) fn start(id: ObserverId, mut observer: Box<dyn Observer>) -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel();
        let task = tokio::task::spawn_blocking(move || {
            while let Some(event) = receiver.blocking_recv() {
                match event {
                    Event::StateUpdate(state, passes) => observer.on_state_update(&state, passes),
                    Event::GameOver(result) => observer.on_game_over(&result),
                }
            }
            observer
        });
        Self { id, sender, task }
    }

    pub(crate) fn state_update(&self, state: &GameState, passes: usize) {
        // Fails only if the observer panicked, which is reported in finish()
        let _ = self.sender.send(Event::StateUpdate(Box::new(state.clone()), passes));
    }

    pub(crate) fn game_over(&self, result: &GameResult) {
        let _ = self.sender.send(Event::GameOver(result.clone()));
    }

    /// Waits until `deadline` for all events to be delivered and hands back
    /// the observer.
    ///
    /// Observers that panicked or are still busy at the deadline are dropped.
    pub(crate) async fn finish(self, deadline: Instant) -> Option<(ObserverId, Box<dyn Observer>)> {
        let Self { id, sender, task } = self;
        drop(sender);
        match tokio::time::timeout_at(deadline, task).await {
            Ok(Ok(observer)) => Some((id, observer)),
            Ok(Err(err)) => {
                warn!(name: "Observer failed", observer = id.0, error = %err);
                None
            }
            Err(_) => {
                warn!(name: "Observer too slow, detaching it", observer = id.0);
                None
            }
        }
    }
}
