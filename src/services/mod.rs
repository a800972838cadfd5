//! External service integrations
//!
//! Currently just audio cue playback through an external player process.

pub mod audio;

// Re-export main types
pub use audio::{AudioBackend, CuePlayer};
