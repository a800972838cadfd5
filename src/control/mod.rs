//! Control surface module
//!
//! Commands, their text grammar, and the handle used to send them to the
//! timer task.

pub mod command;
pub mod handle;

// Re-export main types
pub use command::{Command, CommandError, Input};
pub use handle::{ControlError, Message, TimerHandle};
