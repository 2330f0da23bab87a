use std::time::Duration;

use anyhow::{anyhow, bail, Context};
use labyrinth::{parse_choice, parse_void, Action, Call, Coordinate, PublicGameState};
use labyrinth_player::{is_valid_name, Player};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tracing::trace;

/// Stands in for a player in another process, forwarding every call over a
/// byte stream as one line of JSON and reading one line in response.
pub struct RemotePlayer<R, W> {
    name: String,
    reader: R,
    writer: W,
    // A re-usable buffer for IO.
    // Should always be empty before and after perform_call().
    buf: String,
}

pub type TcpPlayer = RemotePlayer<BufReader<OwnedReadHalf>, OwnedWriteHalf>;

impl<R, W> RemotePlayer<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(name: impl Into<String>, reader: R, writer: W) -> Self {
        Self {
            name: name.into(),
            reader,
            writer,
            buf: String::new(),
        }
    }

    async fn perform_call(&mut self, call: &Call) -> anyhow::Result<String> {
        let mut call_json = serde_json::to_string(call)?;
        trace!(name: "Sending call", player = &self.name, call = %call_json);
        call_json.push('\n');
        self.writer.write_all(call_json.as_bytes()).await?;
        self.writer.flush().await?;
        self.buf.clear();
        let num_bytes_read = self.reader.read_line(&mut self.buf).await?;
        if num_bytes_read == 0 {
            bail!("{} closed the connection", self.name);
        }
        let response = self.buf.trim_end().to_owned();
        self.buf.clear();
        trace!(name: "Received response", player = &self.name, response = %response);
        Ok(response)
    }
}

impl TcpPlayer {
    /// Reads the name a newly connected player signs up with.
    ///
    /// The name must arrive as a JSON string within `timeout`.
    pub async fn sign_up(stream: TcpStream, timeout: Duration) -> anyhow::Result<Self> {
        let (reader, writer) = stream.into_split();
        let mut reader = BufReader::new(reader);
        let mut line = String::new();
        tokio::time::timeout(timeout, reader.read_line(&mut line))
            .await
            .map_err(|_| anyhow!("No name received in time"))??;
        let name: String = serde_json::from_str(line.trim_end()).context("Malformed name")?;
        if !is_valid_name(&name) {
            bail!("Invalid name '{}'", name);
        }
        Ok(Self::new(name, reader, writer))
    }
}

#[async_trait::async_trait]
impl<R, W> Player for RemotePlayer<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn setup(&mut self, state: Option<PublicGameState>, goal: Coordinate) -> anyhow::Result<()> {
        let response = self.perform_call(&Call::Setup { state, goal }).await?;
        Ok(parse_void(&response)?)
    }

    async fn take_turn(&mut self, state: PublicGameState) -> anyhow::Result<Action> {
        let response = self.perform_call(&Call::TakeTurn { state }).await?;
        Ok(parse_choice(&response)?)
    }

    async fn win(&mut self, won: bool) -> anyhow::Result<()> {
        let response = self.perform_call(&Call::Win { won }).await?;
        Ok(parse_void(&response)?)
    }
}
