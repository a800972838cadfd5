//! Audio cue playback
//!
//! Playback is fire-and-forget: failures are logged and never reach the
//! timer.

use std::{io::Write, path::PathBuf};

use tokio::process::Command;
use tracing::{debug, warn};

use crate::events::Cue;

/// Something that can play a cue without blocking the caller
pub trait CuePlayer: Send + Sync {
    fn play(&self, cue: Cue);
}

/// Available playback backends
#[derive(Debug, Clone)]
pub enum AudioBackend {
    /// Run an external player with the cue's sound file as its argument
    Command { program: String, sounds_dir: PathBuf },
    /// Ring the terminal bell
    Bell,
    /// Log only
    Silent,
}

impl AudioBackend {
    /// Full path of the sound file for a cue, if this backend uses files
    pub fn sound_path(&self, cue: Cue) -> Option<PathBuf> {
        match self {
            AudioBackend::Command { sounds_dir, .. } => Some(sounds_dir.join(cue.file_name())),
            AudioBackend::Bell | AudioBackend::Silent => None,
        }
    }
}

impl CuePlayer for AudioBackend {
    fn play(&self, cue: Cue) {
        match self {
            AudioBackend::Command { program, .. } => {
                let Some(path) = self.sound_path(cue) else {
                    return;
                };
                spawn_player(program.clone(), path, cue);
            }
            AudioBackend::Bell => {
                debug!(%cue, "ringing terminal bell");
                let mut stderr = std::io::stderr();
                if let Err(e) = stderr.write_all(b"\x07").and_then(|_| stderr.flush()) {
                    warn!("Audio play failed for {}: {}", cue, e);
                }
            }
            AudioBackend::Silent => {
                debug!(%cue, "cue (silent)");
            }
        }
    }
}

/// Start the player process in a detached task. Each cue gets a fresh
/// process so it always plays from the beginning.
fn spawn_player(program: String, path: PathBuf, cue: Cue) {
    let Ok(runtime) = tokio::runtime::Handle::try_current() else {
        warn!("Audio play failed for {}: no async runtime", cue);
        return;
    };

    runtime.spawn(async move {
        debug!(%cue, program = %program, path = %path.display(), "playing cue");

        let output = match Command::new(&program).arg(&path).output().await {
            Ok(output) => output,
            Err(e) => {
                warn!("Audio play failed for {}: failed to execute {}: {}", cue, program, e);
                return;
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(
                "Audio play failed for {}: {} exited with {}: {}",
                cue,
                program,
                output.status,
                stderr.trim()
            );
        }
    });
}
