//! Interactive session: input first, then optionally the rest of the workout

use std::time::Duration;

use anyhow::Result;
use tokio::{
    io::{AsyncRead, AsyncWrite},
    sync::broadcast,
};
use tracing::info;

use super::{display::wait_for_phase, input::InputEnd, input_task};
use crate::{control::TimerHandle, display::DisplayFrame, state::Phase};

/// Time left for the delayed end bells after the workout finishes
pub const FINAL_BELL_GRACE: Duration = Duration::from_secs(1);

/// Serve input until `quit` or end of input. When input closes and
/// `run_to_completion` is set, keep the timer going until the workout is
/// done instead of returning straight away.
pub async fn session<R, W>(
    reader: R,
    out: W,
    handle: TimerHandle,
    frames: broadcast::Receiver<DisplayFrame>,
    run_to_completion: bool,
) -> Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    match input_task(reader, out, handle.clone()).await? {
        InputEnd::Quit => Ok(()),
        InputEnd::Closed if run_to_completion => {
            info!("Input closed, running until the workout is done");
            if wait_for_phase(frames, Phase::Done).await {
                tokio::time::sleep(FINAL_BELL_GRACE).await;
            }
            Ok(())
        }
        InputEnd::Closed => Ok(()),
    }
}
