use std::collections::{BTreeMap, BTreeSet};
use std::future::Future;
use std::time::Duration;

use anyhow::{anyhow, bail};
use labyrinth::{random_game_state, rules, visualize_state, Action, Color, GameState, PlayerState};
use labyrinth_player::Player;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{debug, info};

use crate::observer::ObserverFeed;
use crate::{AgentFault, Observer, ObserverId, RefereeConfig, MAX_PLAYERS};

/// The outcome of a game. Players are identified by their position in the
/// list given to [`Referee::run_game`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GameResult {
    pub winners: BTreeSet<usize>,
    /// Players that were kicked for misbehaving. None of them is a winner.
    pub removed: BTreeSet<usize>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Setup,
    TurnLoop,
    Scoring,
    Finished,
}

/// Runs games to completion.
///
/// Players that fail, time out or break the rules are removed from the game,
/// which then continues without them.
pub struct Referee {
    config: RefereeConfig,
    rng: StdRng,
    phase: Phase,
    observers: Vec<(ObserverId, Box<dyn Observer>)>,
    next_observer_id: usize,
}

impl Referee {
    pub fn new(config: RefereeConfig) -> anyhow::Result<Self> {
        if config.board_size.rows < 2 || config.board_size.columns < 2 {
            bail!("Board size should be at least 2x2");
        }
        let seed = config.seed.unwrap_or_else(rand::random);
        info!(seed);
        Ok(Self {
            config,
            rng: StdRng::seed_from_u64(seed),
            phase: Phase::NotStarted,
            observers: Vec::new(),
            next_observer_id: 0,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn attach_observer(&mut self, observer: impl Observer + 'static) -> ObserverId {
        let id = ObserverId(self.next_observer_id);
        self.next_observer_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn remove_observer(&mut self, id: ObserverId) -> Option<Box<dyn Observer>> {
        let idx = self.observers.iter().position(|(other, _)| *other == id)?;
        Some(self.observers.remove(idx).1)
    }

    /// Plays a game with the given players, on a random board unless a state
    /// is given to resume.
    ///
    /// The players must be listed in the order of the avatars in the state.
    /// Returns an error only if the game cannot be set up, never because a
    /// player misbehaved.
    pub async fn run_game<P: Player>(
        &mut self,
        players: &mut [P],
        state: Option<GameState>,
    ) -> anyhow::Result<GameResult> {
        if players.len() > MAX_PLAYERS {
            bail!("At most {} players can take part in a game", MAX_PLAYERS);
        }
        if players.is_empty() {
            return Ok(GameResult::default());
        }
        let state = match state {
            Some(state) => state,
            None => random_game_state(
                &mut self.rng,
                self.config.board_size,
                players.len(),
                &self.config.state_config,
            )?,
        };
        let size = state.board().size();
        if size.rows < self.config.board_size.rows || size.columns < self.config.board_size.columns {
            bail!(
                "The board is {}x{}, but the referee requires at least {}x{}",
                size.rows,
                size.columns,
                self.config.board_size.rows,
                self.config.board_size.columns
            );
        }
        if state.players().len() != players.len() {
            bail!(
                "There are {} players, but {} avatars",
                players.len(),
                state.players().len()
            );
        }
        let seats = state
            .players()
            .iter()
            .enumerate()
            .map(|(seat, p)| (p.color.clone(), seat))
            .collect();

        let feeds: Vec<ObserverFeed> = std::mem::take(&mut self.observers)
            .into_iter()
            .map(|(id, observer)| ObserverFeed::start(id, observer))
            .collect();
        let mut game = Game {
            timeout: self.config.timeout,
            max_rounds: self.config.max_rounds,
            players,
            seats,
            removed: BTreeSet::new(),
            state,
            feeds: &feeds,
            phase: &mut self.phase,
            game_over: false,
        };
        let result = game.run().await;

        let deadline = tokio::time::Instant::now() + self.config.timeout;
        for feed in feeds {
            if let Some(observer) = feed.finish(deadline).await {
                self.observers.push(observer);
            }
        }
        result
    }
}

/// Awaits a call to a player for at most `limit`.
///
/// A call that takes too long is dropped, so it cannot have any effect later.
async fn call_with_timeout<T>(
    limit: Duration,
    call: impl Future<Output = anyhow::Result<T>>,
) -> Result<T, AgentFault> {
    match tokio::time::timeout(limit, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(AgentFault::Failed(err)),
        Err(_) => Err(AgentFault::Timeout),
    }
}

/// A single game in progress.
struct Game<'a, P> {
    timeout: Duration,
    max_rounds: usize,
    players: &'a mut [P],
    /// The players that are still in the game.
    seats: BTreeMap<Color, usize>,
    removed: BTreeSet<usize>,
    state: GameState,
    feeds: &'a [ObserverFeed],
    phase: &'a mut Phase,
    game_over: bool,
}

impl<P: Player> Game<'_, P> {
    async fn run(&mut self) -> anyhow::Result<GameResult> {
        info!(name: "Game started", players = self.players.len());
        *self.phase = Phase::Setup;
        self.setup_players().await?;
        self.notify_state(0);

        *self.phase = Phase::TurnLoop;
        self.play_rounds().await?;

        *self.phase = Phase::Scoring;
        let winners = self.calculate_winners()?;
        let result = self.notify_results(winners).await?;
        for feed in self.feeds {
            feed.game_over(&result);
        }
        *self.phase = Phase::Finished;
        info!(name: "Game over", winners = ?result.winners, removed = ?result.removed);
        Ok(result)
    }

    async fn setup_players(&mut self) -> anyhow::Result<()> {
        for (color, seat) in self.seats_in_order() {
            let goal = self.state.goal(&color)?;
            let outcome = call_with_timeout(self.timeout, self.players[seat].setup(None, goal)).await;
            if let Err(fault) = outcome {
                self.kick(&color, fault)?;
            }
        }
        Ok(())
    }

    async fn play_rounds(&mut self) -> anyhow::Result<()> {
        for round in 0..self.max_rounds {
            self.ensure_players_match()?;
            debug!(round);
            self.play_round().await?;
            if self.game_over || self.seats.is_empty() {
                break;
            }
        }
        Ok(())
    }

    async fn play_round(&mut self) -> anyhow::Result<()> {
        let mut passes = 0;
        for _ in 0..self.seats.len() {
            let color = self.state.active_player()?.color.clone();
            let action = self.play_turn(&color).await?;
            if matches!(action, Some(Action::Pass)) {
                passes += 1;
            }
            self.notify_state(passes);

            if passes == self.seats.len() {
                debug!(name: "Everybody passed", passes);
                self.game_over = true;
            }
            if self.game_over {
                return Ok(());
            }
            // A kicked player is already replaced by the next one
            if self.state.active_player()?.color == color {
                self.state.set_next_active_player()?;
            }
        }
        Ok(())
    }

    /// Returns the action that was taken, if the player wasn't kicked.
    async fn play_turn(&mut self, color: &Color) -> anyhow::Result<Option<Action>> {
        let seat = self.seat(color)?;
        let public = self.state.public().clone();
        let proposed = call_with_timeout(self.timeout, self.players[seat].take_turn(public)).await;
        let action = match proposed {
            Ok(action) => action,
            Err(fault) => {
                self.kick(color, fault)?;
                return Ok(None);
            }
        };
        if let Err(err) = rules::check_action(self.state.public_mut(), action) {
            self.kick(color, AgentFault::IllegalAction(err))?;
            return Ok(None);
        }

        self.state.execute_action(action)?;
        debug!(name: "Turn", player = self.players[seat].name(), %action);
        debug!("\n{}", visualize_state(self.state.public()));
        if !action.is_pass() && self.state.is_active_player_on_goal()? {
            self.assign_next_goal(color).await?;
        }
        Ok(Some(action))
    }

    /// Called when the active player reached its goal.
    async fn assign_next_goal(&mut self, color: &Color) -> anyhow::Result<()> {
        let seat = self.seat(color)?;
        let name = self.players[seat].name().to_owned();
        if self.state.has_reached_all_goals(color)? {
            info!(name: "Returned home", player = name);
            self.state.set_has_returned_home(color, true)?;
            self.game_over = true;
            return Ok(());
        }

        let home = self.state.active_player()?.home;
        let goal = self.state.pop_next_goal().unwrap_or(home);
        self.state.set_goal(color, goal)?;
        self.state.increment_treasures_collected(color)?;
        // Once sent home, there are no more treasures to collect
        if self.state.goal_sequence().is_empty() && goal == home {
            self.state.set_has_reached_all_goals(color, true)?;
        }
        debug!(name: "New goal", player = name, row = goal.row, column = goal.column);

        let public = self.state.public().clone();
        let outcome = call_with_timeout(self.timeout, self.players[seat].setup(Some(public), goal)).await;
        if let Err(fault) = outcome {
            self.kick(color, fault)?;
        }
        Ok(())
    }

    fn calculate_winners(&self) -> anyhow::Result<BTreeSet<usize>> {
        self.ensure_players_match()?;
        if self.seats.is_empty() {
            return Ok(BTreeSet::new());
        }

        let players = self.state.players();
        let treasures = players
            .iter()
            .map(|p| self.state.treasures_collected(&p.color))
            .collect::<Result<Vec<u32>, _>>()?;
        let most_treasures = treasures.iter().copied().max().unwrap_or(0);
        let candidates: Vec<&PlayerState> = players
            .iter()
            .zip(&treasures)
            .filter(|(_, n)| **n == most_treasures)
            .map(|(p, _)| p)
            .collect();

        // The player who ended the game by returning home wins outright
        let last = self.state.active_player()?;
        if candidates.iter().any(|p| p.color == last.color) && self.state.has_returned_home(&last.color)? {
            return Ok(BTreeSet::from([self.seat(&last.color)?]));
        }

        let distances = candidates
            .iter()
            .map(|p| -> anyhow::Result<i64> {
                Ok(p.position.squared_euclidean_distance(self.state.goal(&p.color)?))
            })
            .collect::<anyhow::Result<Vec<i64>>>()?;
        let closest = distances.iter().copied().min().unwrap_or(0);
        candidates
            .iter()
            .zip(&distances)
            .filter(|(_, d)| **d == closest)
            .map(|(p, _)| self.seat(&p.color))
            .collect()
    }

    async fn notify_results(&mut self, mut winners: BTreeSet<usize>) -> anyhow::Result<GameResult> {
        for (color, seat) in self.seats_in_order() {
            let won = winners.contains(&seat);
            let outcome = call_with_timeout(self.timeout, self.players[seat].win(won)).await;
            if let Err(fault) = outcome {
                self.kick(&color, fault)?;
                winners.remove(&seat);
            }
        }
        Ok(GameResult {
            winners,
            removed: self.removed.clone(),
        })
    }

    fn kick(&mut self, color: &Color, fault: AgentFault) -> anyhow::Result<()> {
        let seat = self
            .seats
            .remove(color)
            .ok_or_else(|| anyhow!("No player with color {}", color))?;
        info!(name: "Kicked", player = self.players[seat].name(), phase = ?self.phase, reason = %fault);
        self.removed.insert(seat);
        self.state.kick_player(color)?;
        Ok(())
    }

    fn seat(&self, color: &Color) -> anyhow::Result<usize> {
        self.seats
            .get(color)
            .copied()
            .ok_or_else(|| anyhow!("No player with color {}", color))
    }

    fn seats_in_order(&self) -> Vec<(Color, usize)> {
        let mut seats: Vec<(Color, usize)> = self.seats.iter().map(|(c, &s)| (c.clone(), s)).collect();
        seats.sort_by_key(|&(_, seat)| seat);
        seats
    }

    fn ensure_players_match(&self) -> anyhow::Result<()> {
        let avatars = self.state.players();
        let matches = avatars.len() == self.seats.len()
            && avatars.iter().all(|avatar| self.seats.contains_key(&avatar.color));
        if !matches {
            bail!("Mismatch between the players and the avatars in the game state");
        }
        Ok(())
    }

    fn notify_state(&self, passes: usize) {
        for feed in self.feeds {
            feed.state_update(&self.state, passes);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use labyrinth::{Coordinate, GridSize, StrategyDesignation};
    use labyrinth_player::{Fault, FaultyPlayer, Method, StrategyPlayer};
    use tokio::io::{duplex, split, AsyncBufReadExt, AsyncWriteExt, BufReader};

    use super::*;
    use crate::scenarios::{blue, cross_board_state, red, single_player_state, walled_in_state, Cheater, Passer};
    use crate::RemotePlayer;

    fn test_config() -> RefereeConfig {
        RefereeConfig {
            board_size: GridSize::new(2, 2),
            timeout: Duration::from_millis(500),
            seed: Some(7),
            ..Default::default()
        }
    }

    fn bot(name: &str) -> StrategyPlayer {
        StrategyPlayer::new(name, StrategyDesignation::Riemann)
    }

    fn faulty(name: &str, method: Method, fault: Fault) -> Box<dyn Player> {
        Box::new(FaultyPlayer::new(bot(name), method, fault))
    }

    #[tokio::test]
    async fn first_player_home_wins() {
        let mut referee = Referee::new(test_config()).unwrap();
        assert_eq!(referee.phase(), Phase::NotStarted);
        let mut players = vec![bot("alice"), bot("bob")];
        let result = referee
            .run_game(&mut players, Some(cross_board_state(Vec::new())))
            .await
            .unwrap();
        assert_eq!(result.winners, BTreeSet::from([0]));
        assert!(result.removed.is_empty());
        assert_eq!(referee.phase(), Phase::Finished);
    }

    #[tokio::test]
    async fn slow_players_are_kicked() {
        let config = RefereeConfig {
            timeout: Duration::from_millis(100),
            ..test_config()
        };
        let mut referee = Referee::new(config).unwrap();
        let mut players: Vec<Box<dyn Player>> = vec![
            faulty("alice", Method::TakeTurn, Fault::Hang(1)),
            Box::new(bot("bob")),
        ];
        let result = referee
            .run_game(&mut players, Some(cross_board_state(Vec::new())))
            .await
            .unwrap();
        assert_eq!(result.winners, BTreeSet::from([1]));
        assert_eq!(result.removed, BTreeSet::from([0]));
    }

    #[tokio::test]
    async fn failing_setup_is_kicked_before_the_game() {
        let mut referee = Referee::new(test_config()).unwrap();
        let mut players: Vec<Box<dyn Player>> = vec![
            faulty("alice", Method::Setup, Fault::Fail),
            Box::new(bot("bob")),
        ];
        let result = referee
            .run_game(&mut players, Some(cross_board_state(Vec::new())))
            .await
            .unwrap();
        assert_eq!(result.winners, BTreeSet::from([1]));
        assert_eq!(result.removed, BTreeSet::from([0]));
    }

    #[tokio::test]
    async fn failing_win_call_forfeits_the_win() {
        let mut referee = Referee::new(test_config()).unwrap();
        let mut players: Vec<Box<dyn Player>> = vec![
            faulty("alice", Method::Win, Fault::Fail),
            Box::new(bot("bob")),
        ];
        let result = referee
            .run_game(&mut players, Some(cross_board_state(Vec::new())))
            .await
            .unwrap();
        assert!(result.winners.is_empty());
        assert_eq!(result.removed, BTreeSet::from([0]));
    }

    #[tokio::test]
    async fn illegal_actions_are_kicked() {
        let mut referee = Referee::new(test_config()).unwrap();
        let mut players: Vec<Box<dyn Player>> = vec![Box::new(Cheater), Box::new(bot("bob"))];
        let result = referee
            .run_game(&mut players, Some(cross_board_state(Vec::new())))
            .await
            .unwrap();
        assert_eq!(result.winners, BTreeSet::from([1]));
        assert_eq!(result.removed, BTreeSet::from([0]));
    }

    #[tokio::test]
    async fn malformed_responses_are_kicked() {
        let (referee_side, player_side) = duplex(64 * 1024);
        tokio::spawn(async move {
            let (reader, mut writer) = split(player_side);
            let mut lines = BufReader::new(reader).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                let response = if line.starts_with("[\"take-turn\"") {
                    "[0, \"LEFT\", 0]\n"
                } else {
                    "\"void\"\n"
                };
                if writer.write_all(response.as_bytes()).await.is_err() {
                    break;
                }
            }
        });
        let (reader, writer) = split(referee_side);
        let remote = RemotePlayer::new("alice", BufReader::new(reader), writer);

        let mut referee = Referee::new(test_config()).unwrap();
        let mut players: Vec<Box<dyn Player>> = vec![Box::new(remote), Box::new(bot("bob"))];
        let result = referee
            .run_game(&mut players, Some(cross_board_state(Vec::new())))
            .await
            .unwrap();
        assert_eq!(result.winners, BTreeSet::from([1]));
        assert_eq!(result.removed, BTreeSet::from([0]));
    }

    #[tokio::test]
    async fn game_ends_when_everybody_passes() {
        let mut referee = Referee::new(test_config()).unwrap();
        let mut players = vec![Passer("alice"), Passer("bob")];
        let result = referee
            .run_game(&mut players, Some(cross_board_state(Vec::new())))
            .await
            .unwrap();
        // Nobody collected anything and both are equally far from their goals
        assert_eq!(result.winners, BTreeSet::from([0, 1]));
        assert!(result.removed.is_empty());
    }

    #[tokio::test]
    async fn ties_go_to_the_player_closest_to_its_goal() {
        let mut referee = Referee::new(test_config()).unwrap();
        let mut players = vec![Passer("alice"), Passer("bob")];
        let mut state = cross_board_state(Vec::new());
        state.set_goal(&blue(), Coordinate::new(3, 2)).unwrap();
        let result = referee.run_game(&mut players, Some(state)).await.unwrap();
        assert_eq!(result.winners, BTreeSet::from([1]));
        assert!(result.removed.is_empty());
    }

    #[tokio::test]
    async fn game_ends_after_max_rounds() {
        let config = RefereeConfig {
            max_rounds: 1,
            ..test_config()
        };
        let mut referee = Referee::new(config).unwrap();
        let mut players = vec![bot("alice"), bot("bob")];
        let result = referee
            .run_game(&mut players, Some(cross_board_state(Vec::new())))
            .await
            .unwrap();
        // Both collected their treasure, and are equally far from home
        assert_eq!(result.winners, BTreeSet::from([0, 1]));
    }

    #[derive(Default)]
    struct Events {
        states: Vec<(GameState, usize)>,
        results: Vec<GameResult>,
    }

    struct Collector(Arc<Mutex<Events>>);

    impl Observer for Collector {
        fn on_state_update(&mut self, state: &GameState, passes: usize) {
            self.0.lock().unwrap().states.push((state.clone(), passes));
        }

        fn on_game_over(&mut self, result: &GameResult) {
            self.0.lock().unwrap().results.push(result.clone());
        }
    }

    #[tokio::test]
    async fn observers_see_every_turn() {
        let events = Arc::new(Mutex::new(Events::default()));
        let mut referee = Referee::new(test_config()).unwrap();
        let id = referee.attach_observer(Collector(Arc::clone(&events)));

        let state = single_player_state(vec![Coordinate::new(3, 3)]);
        let mut players = vec![bot("alice")];
        let result = referee.run_game(&mut players, Some(state)).await.unwrap();
        assert_eq!(result.winners, BTreeSet::from([0]));

        {
            let events = events.lock().unwrap();
            // After setup, then on the way to (1, 3), (3, 3) and home
            assert_eq!(events.states.len(), 4);
            assert!(events.states.iter().all(|(_, passes)| *passes == 0));
            let (last, _) = events.states.last().unwrap();
            assert_eq!(last.treasures_collected(&red()).unwrap(), 2);
            assert!(last.has_returned_home(&red()).unwrap());
            assert_eq!(events.results, vec![result]);
        }
        assert!(referee.remove_observer(id).is_some());
        assert!(referee.remove_observer(id).is_none());
    }

    #[tokio::test]
    async fn walled_in_player_loses_without_being_kicked() {
        let events = Arc::new(Mutex::new(Events::default()));
        let mut referee = Referee::new(test_config()).unwrap();
        referee.attach_observer(Collector(Arc::clone(&events)));
        let mut players = vec![bot("alice"), bot("bob")];
        let result = referee.run_game(&mut players, Some(walled_in_state())).await.unwrap();
        assert_eq!(result.winners, BTreeSet::from([0]));
        assert!(result.removed.is_empty());

        let events = events.lock().unwrap();
        // Red reaches its goal and returns home, while blue can only pass
        let passes: Vec<usize> = events.states.iter().map(|(_, passes)| *passes).collect();
        assert_eq!(passes, vec![0, 0, 1, 0]);
        for (state, _) in &events.states {
            assert_eq!(state.player(&blue()).unwrap().position, Coordinate::new(3, 3));
            assert_eq!(state.treasures_collected(&blue()).unwrap(), 0);
        }
    }

    struct Sleeper(Duration);

    impl Observer for Sleeper {
        fn on_state_update(&mut self, _state: &GameState, _passes: usize) {}

        fn on_game_over(&mut self, _result: &GameResult) {
            std::thread::sleep(self.0);
        }
    }

    #[tokio::test]
    async fn slow_observers_do_not_hold_up_the_result() {
        let config = RefereeConfig {
            timeout: Duration::from_millis(100),
            ..test_config()
        };
        let mut referee = Referee::new(config).unwrap();
        let id = referee.attach_observer(Sleeper(Duration::from_secs(2)));
        let mut players = vec![bot("alice")];
        let state = single_player_state(vec![Coordinate::new(3, 3)]);
        let result = tokio::time::timeout(Duration::from_secs(1), referee.run_game(&mut players, Some(state)))
            .await
            .expect("the result should not wait for the observer")
            .unwrap();
        assert_eq!(result.winners, BTreeSet::from([0]));
        // Detached once it missed the deadline
        assert!(referee.remove_observer(id).is_none());
    }

    #[tokio::test]
    async fn random_games_run_to_completion() {
        let config = RefereeConfig {
            max_rounds: 50,
            seed: Some(42),
            ..Default::default()
        };
        let mut referee = Referee::new(config).unwrap();
        let mut players = vec![
            StrategyPlayer::new("alice", StrategyDesignation::Riemann),
            StrategyPlayer::new("bob", StrategyDesignation::Euclid),
            StrategyPlayer::new("carol", StrategyDesignation::Euclid),
        ];
        let result = referee.run_game(&mut players, None).await.unwrap();
        assert!(result.removed.is_empty());
        assert!(!result.winners.is_empty());
        assert!(result.winners.iter().all(|&seat| seat < 3));
    }

    #[tokio::test]
    async fn misconfigured_games() {
        let small = RefereeConfig {
            board_size: GridSize::new(1, 5),
            ..test_config()
        };
        assert!(Referee::new(small).is_err());

        let mut referee = Referee::new(test_config()).unwrap();
        let mut crowd: Vec<StrategyPlayer> = (0..7).map(|i| bot(&format!("bot{}", i))).collect();
        assert!(referee.run_game(&mut crowd, None).await.is_err());

        let mut trio = vec![bot("a"), bot("b"), bot("c")];
        let state = cross_board_state(Vec::new());
        assert!(referee.run_game(&mut trio, Some(state)).await.is_err());

        let mut nobody: Vec<StrategyPlayer> = Vec::new();
        assert_eq!(referee.run_game(&mut nobody, None).await.unwrap(), GameResult::default());

        // The default referee wants at least a 7x7 board
        let mut referee = Referee::new(RefereeConfig::default()).unwrap();
        let mut duo = vec![bot("a"), bot("b")];
        let state = cross_board_state(Vec::new());
        assert!(referee.run_game(&mut duo, Some(state)).await.is_err());
    }
}
