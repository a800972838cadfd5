//! Line-oriented command input

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use crate::control::{Input, TimerHandle};

/// Why the input task stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEnd {
    /// The user asked to quit
    Quit,
    /// End of input was reached
    Closed,
}

/// Read commands line by line and forward them to the timer task.
/// Returns on end of input or `quit`; `status` replies are written to `out`
/// as one JSON line.
pub async fn input_task<R, W>(reader: R, mut out: W, handle: TimerHandle) -> Result<InputEnd>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    info!("Reading commands from input");

    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines.next_line().await? {
        let input = match line.parse::<Input>() {
            Ok(input) => input,
            Err(e) => {
                warn!("Ignoring input {:?}: {}", line, e);
                continue;
            }
        };

        debug!(?input, "input received");

        match input {
            Input::Command(command) => handle.send(command).await?,
            Input::Status => {
                let state = handle.snapshot().await?;
                let mut json = serde_json::to_string(&state)?;
                json.push('\n');
                out.write_all(json.as_bytes()).await?;
                out.flush().await?;
            }
            Input::Quit => {
                info!("Quit requested");
                return Ok(InputEnd::Quit);
            }
        }
    }

    info!("Input closed");
    Ok(InputEnd::Closed)
}
