//! Background tasks module
//!
//! The timer task owns the state machine; the input and display tasks sit
//! on either side of it, and the session ties input to the workout's end.

pub mod display;
pub mod input;
pub mod phase_timer;
pub mod session;

// Re-export main functions
pub use display::{display_task, wait_for_phase};
pub use input::{input_task, InputEnd};
pub use phase_timer::timer_task;
pub use session::session;
