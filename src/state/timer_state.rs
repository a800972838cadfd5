//! Timer state structure and setting bounds

use serde::{Deserialize, Serialize};

use super::Phase;

/// Inclusive range a setting is clamped into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min: u32,
    pub max: u32,
}

impl Bounds {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Clamp a raw (possibly negative) input into the range
    pub fn clamp(&self, value: i64) -> u32 {
        value.clamp(self.min as i64, self.max as i64) as u32
    }

    /// Apply a signed delta to a current value and clamp the result
    pub fn offset(&self, current: u32, delta: i64) -> u32 {
        self.clamp((current as i64).saturating_add(delta))
    }
}

/// Prep countdown bounds in seconds
pub const PREP_BOUNDS: Bounds = Bounds::new(0, 60);
/// Round duration bounds in seconds
pub const ROUND_BOUNDS: Bounds = Bounds::new(10, 600);
/// Rest duration bounds in seconds
pub const REST_BOUNDS: Bounds = Bounds::new(0, 300);
/// Total rounds bounds
pub const ROUNDS_BOUNDS: Bounds = Bounds::new(1, 50);

/// Workout settings supplied at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub prep_duration: u32,
    pub round_duration: u32,
    pub rest_duration: u32,
    pub total_rounds: u32,
    pub sound_enabled: bool,
}

impl Settings {
    /// Build settings from raw values, clamping each one into its bounds
    pub fn clamped(prep: i64, round: i64, rest: i64, rounds: i64, sound_enabled: bool) -> Self {
        Self {
            prep_duration: PREP_BOUNDS.clamp(prep),
            round_duration: ROUND_BOUNDS.clamp(round),
            rest_duration: REST_BOUNDS.clamp(rest),
            total_rounds: ROUNDS_BOUNDS.clamp(rounds),
            sound_enabled,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            prep_duration: 10,
            round_duration: 180,
            rest_duration: 60,
            total_rounds: 8,
            sound_enabled: true,
        }
    }
}

/// The single mutable record driven by the phase timer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub prep_duration: u32,
    pub round_duration: u32,
    pub rest_duration: u32,
    pub total_rounds: u32,
    pub current_round: u32,
    /// Seconds remaining in the current phase
    pub time_left: u32,
    pub phase: Phase,
    pub is_running: bool,
    pub sound_enabled: bool,
}

impl TimerState {
    /// Create a ready, paused state from the given settings
    pub fn new(settings: Settings) -> Self {
        Self {
            prep_duration: settings.prep_duration,
            round_duration: settings.round_duration,
            rest_duration: settings.rest_duration,
            total_rounds: settings.total_rounds,
            current_round: 1,
            time_left: settings.round_duration,
            phase: Phase::Ready,
            is_running: false,
            sound_enabled: settings.sound_enabled,
        }
    }

    /// Full length of the current phase in seconds
    pub fn phase_total(&self) -> u32 {
        match self.phase {
            Phase::Prep => self.prep_duration,
            Phase::Rest => self.rest_duration,
            Phase::Ready | Phase::Round | Phase::Done => self.round_duration,
        }
    }

    pub fn is_last_round(&self) -> bool {
        self.current_round >= self.total_rounds
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}
