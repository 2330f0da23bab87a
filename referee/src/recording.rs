use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use labyrinth::{GameState, JsonRefereeState};
use serde::Serialize;
use tracing::{debug, error};

use crate::{GameResult, Observer};

/// Writes every game it observes to a JSON file in a directory.
///
/// Files are named `game_000001.json`, `game_000002.json` and so on.
pub struct Recorder {
    num: usize,
    directory: PathBuf,
    states: Vec<RecordedState>,
}

#[derive(Serialize)]
struct RecordedState {
    passes: usize,
    state: JsonRefereeState,
}

#[derive(Serialize)]
struct GameRecording<'a> {
    states: &'a [RecordedState],
    result: &'a GameResult,
}

impl Recorder {
    pub fn new(directory: PathBuf) -> anyhow::Result<Self> {
        if !directory.is_dir() {
            anyhow::bail!("Directory '{}' does not exist", directory.display());
        }
        Ok(Self {
            num: 1,
            directory,
            states: Vec::new(),
        })
    }

    fn write_game_recording(&mut self, result: &GameResult) -> anyhow::Result<PathBuf> {
        let filepath = self.directory.join(format!("game_{:0>6}.json", self.num));
        let mut writer = BufWriter::new(File::create(&filepath)?);
        let recording = GameRecording {
            states: &self.states,
            result,
        };
        serde_json::to_writer_pretty(&mut writer, &recording)?;
        writeln!(writer)?;
        writer.flush()?;
        self.states.clear();
        self.num += 1;
        Ok(filepath)
    }
}

impl Observer for Recorder {
    fn on_state_update(&mut self, state: &GameState, passes: usize) {
        self.states.push(RecordedState {
            passes,
            state: state.into(),
        });
    }

    fn on_game_over(&mut self, result: &GameResult) {
        match self.write_game_recording(result) {
            Ok(path) => debug!(name: "Recorded game", path = %path.display()),
            Err(err) => error!(name: "Could not record game", error = %err),
        }
    }
}
