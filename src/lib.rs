//! Round Timer - an interval timer for round-based workouts
//!
//! The core is [`state::PhaseTimer`], a synchronous state machine that walks
//! READY -> PREP -> ROUND -> (REST -> ROUND)* -> DONE and reports every side
//! effect as a [`events::TimerEvent`]. The async tasks in [`tasks`] drive it
//! once per second and route its events to the display and audio player.

pub mod config;
pub mod control;
pub mod display;
pub mod events;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use control::{Command, TimerHandle};
pub use events::{Cue, TimerEvent};
pub use state::{Phase, PhaseTimer, Settings, TimerState};
pub use utils::signals::shutdown_signal;
