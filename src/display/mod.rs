//! Display frames and terminal rendering

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{Phase, TimerState};

/// Everything the display layer needs to draw one update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayFrame {
    pub minutes: String,
    pub seconds: String,
    pub current_round: u32,
    pub total_rounds: u32,
    pub phase: Phase,
    pub label: String,
    pub sub_status: String,
    /// Elapsed share of the current phase, 0-100
    pub progress: f64,
    pub progress_percent: u8,
    pub running: bool,
    pub sound_enabled: bool,
    pub timestamp: DateTime<Utc>,
}

impl DisplayFrame {
    /// Snapshot the given state
    pub fn from_state(state: &TimerState) -> Self {
        let (minutes, seconds) = format_clock(state.time_left);
        let progress = progress(state);

        Self {
            minutes,
            seconds,
            current_round: state.current_round,
            total_rounds: state.total_rounds,
            phase: state.phase,
            label: state.phase.label().to_string(),
            sub_status: sub_status(state),
            progress,
            progress_percent: progress.round() as u8,
            running: state.is_running,
            sound_enabled: state.sound_enabled,
            timestamp: Utc::now(),
        }
    }

    /// One-line human readable rendering
    pub fn to_line(&self) -> String {
        format!(
            "[{}] {}:{}  ROUND {}/{}  {}  {}%",
            self.label,
            self.minutes,
            self.seconds,
            self.current_round,
            self.total_rounds,
            self.sub_status,
            self.progress_percent,
        )
    }
}

/// Percentage of the current phase already elapsed
pub fn progress(state: &TimerState) -> f64 {
    match state.phase {
        Phase::Ready => 0.0,
        Phase::Done => 100.0,
        Phase::Prep | Phase::Round | Phase::Rest => {
            let total = state.phase_total();
            if total == 0 {
                return 0.0;
            }
            let elapsed = total.saturating_sub(state.time_left) as f64;
            (elapsed / total as f64 * 100.0).clamp(0.0, 100.0)
        }
    }
}

fn sub_status(state: &TimerState) -> String {
    match state.phase {
        Phase::Ready => "Press Play to Start".to_string(),
        Phase::Prep => "Next: Round 1".to_string(),
        Phase::Round => format!("Next: Rest ({})", format_duration(state.rest_duration)),
        Phase::Rest => format!("Next: Round {}", state.current_round + 1),
        Phase::Done => "Great Workout!".to_string(),
    }
}

/// Split seconds into zero-padded minutes and seconds
pub fn format_clock(secs: u32) -> (String, String) {
    (format!("{:02}", secs / 60), format!("{:02}", secs % 60))
}

/// Format seconds as `M:SS`
pub fn format_duration(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// How frames are written to the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Renderer {
    Text,
    Json,
}

impl Renderer {
    pub fn render(&self, frame: &DisplayFrame) -> String {
        match self {
            Renderer::Text => frame.to_line(),
            Renderer::Json => serde_json::to_string(frame).unwrap_or_else(|e| {
                tracing::warn!("Failed to serialize display frame: {}", e);
                frame.to_line()
            }),
        }
    }
}
