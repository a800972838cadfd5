//! Display sink task

use tokio::{
    io::{AsyncWrite, AsyncWriteExt},
    sync::broadcast,
};
use tracing::{info, warn};

use crate::{
    display::{DisplayFrame, Renderer},
    state::Phase,
};

/// Render every published frame until the timer task goes away.
/// Gives the writer back once the channel closes.
pub async fn display_task<W>(
    mut frames: broadcast::Receiver<DisplayFrame>,
    renderer: Renderer,
    mut out: W,
) -> W
where
    W: AsyncWrite + Unpin,
{
    info!(?renderer, "Starting display task");

    loop {
        match frames.recv().await {
            Ok(frame) => {
                let mut line = renderer.render(&frame);
                line.push('\n');
                let written = async {
                    out.write_all(line.as_bytes()).await?;
                    out.flush().await
                };
                if let Err(e) = written.await {
                    warn!("Failed to write display frame: {}", e);
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "display lagged behind timer");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }

    info!("Display task stopped");
    out
}

/// Wait until a frame in the given phase is published. Returns false if the
/// timer task goes away first.
pub async fn wait_for_phase(mut frames: broadcast::Receiver<DisplayFrame>, phase: Phase) -> bool {
    loop {
        match frames.recv().await {
            Ok(frame) if frame.phase == phase => return true,
            Ok(_) => {}
            Err(broadcast::error::RecvError::Lagged(_)) => {}
            Err(broadcast::error::RecvError::Closed) => return false,
        }
    }
}
