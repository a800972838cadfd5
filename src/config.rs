//! Configuration and CLI argument handling

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::{
    display::Renderer,
    services::AudioBackend,
    state::Settings,
};

/// How cues are played
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AudioMode {
    /// Run the external player on the cue's sound file
    Command,
    /// Ring the terminal bell
    Bell,
    /// Don't play anything
    Silent,
}

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "round-timer")]
#[command(about = "A terminal interval timer for round-based workouts")]
#[command(version)]
pub struct Config {
    /// Prep countdown in seconds (0-60, 0 skips prep)
    #[arg(long, default_value = "10", allow_negative_numbers = true)]
    pub prep: i64,

    /// Round length in seconds (10-600)
    #[arg(short, long, default_value = "180", allow_negative_numbers = true)]
    pub round: i64,

    /// Rest between rounds in seconds (0-300, 0 skips rest)
    #[arg(long, default_value = "60", allow_negative_numbers = true)]
    pub rest: i64,

    /// Number of rounds (1-50)
    #[arg(short = 'n', long, default_value = "8", allow_negative_numbers = true)]
    pub rounds: i64,

    /// Start with sound disabled
    #[arg(short, long)]
    pub mute: bool,

    /// Cue playback backend
    #[arg(long, value_enum, default_value = "bell")]
    pub audio: AudioMode,

    /// Player program used by the command backend
    #[arg(long, default_value = "paplay")]
    pub player: String,

    /// Directory holding ding.mp3, end_bell.mp3 and beep.mp3
    #[arg(long, default_value = "sounds")]
    pub sounds_dir: PathBuf,

    /// Print display frames as JSON lines
    #[arg(long)]
    pub json: bool,

    /// Start the workout immediately
    #[arg(long)]
    pub autostart: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Initial workout settings, clamped into their bounds
    pub fn settings(&self) -> Settings {
        Settings::clamped(self.prep, self.round, self.rest, self.rounds, !self.mute)
    }

    pub fn audio_backend(&self) -> AudioBackend {
        match self.audio {
            AudioMode::Command => AudioBackend::Command {
                program: self.player.clone(),
                sounds_dir: self.sounds_dir.clone(),
            },
            AudioMode::Bell => AudioBackend::Bell,
            AudioMode::Silent => AudioBackend::Silent,
        }
    }

    pub fn renderer(&self) -> Renderer {
        if self.json {
            Renderer::Json
        } else {
            Renderer::Text
        }
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
