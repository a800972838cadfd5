//! State management module
//!
//! This module contains the timer state record, the workout phases and the
//! phase timer state machine that mutates them.

pub mod machine;
pub mod phase;
pub mod timer_state;

// Re-export main types
pub use machine::PhaseTimer;
pub use phase::Phase;
pub use timer_state::{Bounds, Settings, TimerState};
