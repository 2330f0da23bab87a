use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use labyrinth::{JsonRefereeState, StateConfig, StrategyDesignation};
use labyrinth_player::{is_valid_name, Fault, FaultyPlayer, Method, Player, StrategyPlayer};
use referee::{Recorder, Referee, RefereeConfig};
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Runs one game of Labyrinth and prints the names of the winners and of the
/// players that were kicked.
#[derive(Parser)]
struct Args {
    /// Path to a JSON file containing `[[player specs...], referee state]`.
    /// Read from stdin if omitted
    game: Option<PathBuf>,

    /// How long a player may take for each call, in milliseconds
    #[arg(short, long, default_value_t = 4000)]
    timeout_ms: u64,

    /// The maximum number of rounds to play
    #[arg(short, long, default_value_t = 1000)]
    max_rounds: usize,

    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Record the game as JSON files into this directory
    #[arg(short, long)]
    record_games_to_directory: Option<PathBuf>,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "info")]
    log_level: LevelFilter,

    /// Allow players to share a home
    #[arg(long)]
    no_unique_homes: bool,

    /// Allow homes on moveable tiles
    #[arg(long)]
    no_immovable_homes: bool,

    /// Allow goals on moveable tiles
    #[arg(long)]
    no_immovable_goals: bool,
}

/// `[name, strategy]`, optionally followed by a method that fails, and
/// optionally by the call of that method that hangs instead.
#[derive(Deserialize)]
#[serde(untagged)]
enum PlayerSpec {
    Plain(String, StrategyDesignation),
    Failing(String, StrategyDesignation, String),
    Hanging(String, StrategyDesignation, String, usize),
}

#[derive(Deserialize)]
struct GameDescription(Vec<PlayerSpec>, JsonRefereeState);

fn build_player(spec: PlayerSpec) -> anyhow::Result<Box<dyn Player>> {
    let (name, designation, sabotage) = match spec {
        PlayerSpec::Plain(name, designation) => (name, designation, None),
        PlayerSpec::Failing(name, designation, method) => (name, designation, Some((method, Fault::Fail))),
        PlayerSpec::Hanging(name, designation, method, count) => {
            if !(1..=7).contains(&count) {
                bail!("Hang count must be between 1 and 7, but is {}", count);
            }
            (name, designation, Some((method, Fault::Hang(count))))
        }
    };
    if !is_valid_name(&name) {
        bail!("Invalid player name '{}'", name);
    }
    let player = StrategyPlayer::new(name, designation);
    Ok(match sabotage {
        Some((method, fault)) => {
            let method = method.parse::<Method>().map_err(anyhow::Error::msg)?;
            Box::new(FaultyPlayer::new(player, method, fault))
        }
        None => Box::new(player),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    initialize_logging(args.log_level);

    let input = match &args.game {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Could not read '{}'", path.display()))?,
        None => std::io::read_to_string(std::io::stdin())?,
    };
    let GameDescription(specs, state) = serde_json::from_str(&input).context("Malformed game description")?;

    let state_config = StateConfig {
        enforce_unique_homes: !args.no_unique_homes,
        enforce_immovable_homes: !args.no_immovable_homes,
        enforce_immovable_goals: !args.no_immovable_goals,
    };
    let state = state.into_game_state(&state_config)?;
    let mut players = specs
        .into_iter()
        .map(build_player)
        .collect::<anyhow::Result<Vec<Box<dyn Player>>>>()?;

    let config = RefereeConfig {
        board_size: state.board().size(),
        timeout: Duration::from_millis(args.timeout_ms),
        max_rounds: args.max_rounds,
        state_config,
        seed: args.seed,
    };
    let mut referee = Referee::new(config)?;
    if let Some(dir_path) = args.record_games_to_directory {
        referee.attach_observer(Recorder::new(dir_path)?);
    }

    let result = referee.run_game(&mut players, Some(state)).await?;

    let mut winners: Vec<&str> = result.winners.iter().map(|&seat| players[seat].name()).collect();
    let mut removed: Vec<&str> = result.removed.iter().map(|&seat| players[seat].name()).collect();
    winners.sort_unstable();
    removed.sort_unstable();
    info!(?winners, ?removed);
    println!("{}", serde_json::to_string(&(winners, removed))?);

    Ok(())
}

fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    // Stdout carries the result
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
