use anyhow::Context;
use labyrinth::{Call, JsonChoice, StateConfig, Void};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::{TcpStream, ToSocketAddrs};
use tracing::{debug, trace};

use crate::Player;

/// Answers calls from a referee until it closes the connection.
///
/// Each line read from `reader` is one call, and each answer is written to
/// `writer` as one line.
pub async fn serve<P, R, W>(player: &mut P, mut reader: R, mut writer: W) -> anyhow::Result<()>
where
    P: Player + ?Sized,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    // The referee is trusted to send states it considers valid, whatever
    // rules it enforces.
    let config = StateConfig::relaxed();
    let mut buf = String::new();

    loop {
        buf.clear();
        let num_bytes_read = reader.read_line(&mut buf).await?;
        if num_bytes_read == 0 {
            // EOF: the referee is done with us.
            debug!(name: "Connection closed", player = player.name());
            break Ok(());
        }
        trace!(name: "Received call", player = player.name(), call = %buf.trim_end());

        let value = serde_json::from_str(buf.trim_end())?;
        let call = Call::from_json(value, &config)?;
        let response = match call {
            Call::Setup { state, goal } => {
                player.setup(state, goal).await?;
                serde_json::to_string(&Void::Void)?
            }
            Call::TakeTurn { state } => {
                let action = player.take_turn(state).await?;
                serde_json::to_string(&JsonChoice::from(action))?
            }
            Call::Win { won } => {
                player.win(won).await?;
                serde_json::to_string(&Void::Void)?
            }
        };
        trace!(name: "Sending response", player = player.name(), response = %response);
        writer.write_all(response.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }
}

/// Signs up with the referee at `address` and plays until the game is over.
///
/// The first line sent is the player's name as a JSON string.
pub async fn connect<P, A>(address: A, player: &mut P) -> anyhow::Result<()>
where
    P: Player + ?Sized,
    A: ToSocketAddrs,
{
    let stream = TcpStream::connect(address)
        .await
        .context("Could not connect to referee")?;
    let (reader, mut writer) = stream.into_split();
    let name = serde_json::to_string(player.name())?;
    writer.write_all(name.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    serve(player, BufReader::new(reader), writer).await
}
