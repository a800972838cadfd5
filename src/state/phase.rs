//! Workout phases

use serde::{Deserialize, Serialize};

/// The stage of the workout the timer is in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Phase {
    /// Waiting for the first start
    #[default]
    Ready,
    /// Countdown before round 1
    Prep,
    /// A work round is in progress
    Round,
    /// Rest between rounds
    Rest,
    /// All rounds completed
    Done,
}

impl Phase {
    /// Headline shown by the display
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Ready => "Ready",
            Phase::Prep => "Get Ready",
            Phase::Round => "Training",
            Phase::Rest => "Rest",
            Phase::Done => "Finished",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Ready => write!(f, "READY"),
            Phase::Prep => write!(f, "PREP"),
            Phase::Round => write!(f, "ROUND"),
            Phase::Rest => write!(f, "REST"),
            Phase::Done => write!(f, "DONE"),
        }
    }
}
