//! Events emitted by the phase timer
//!
//! Every timer operation returns the ordered list of events it produced.
//! The driver executes them: cues go to the audio player, frames go to the
//! display sink.

use std::time::Duration;

use crate::display::DisplayFrame;

/// Named sound cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    /// A round starts
    Ding,
    /// A round ends, or the workout is finished
    EndBell,
    /// Final-seconds warning
    Beep,
}

impl Cue {
    /// Sound file name for this cue
    pub fn file_name(&self) -> &'static str {
        match self {
            Cue::Ding => "ding.mp3",
            Cue::EndBell => "end_bell.mp3",
            Cue::Beep => "beep.mp3",
        }
    }
}

impl std::fmt::Display for Cue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cue::Ding => write!(f, "ding"),
            Cue::EndBell => write!(f, "endBell"),
            Cue::Beep => write!(f, "beep"),
        }
    }
}

/// Side effects produced by a state mutation, in emission order
#[derive(Debug, Clone, PartialEq)]
pub enum TimerEvent {
    /// Play a cue now
    Cue { cue: Cue },

    /// Play a cue once `delay` has elapsed
    DelayedCue { cue: Cue, delay: Duration },

    /// Drop every delayed cue that has not played yet
    CancelPendingCues,

    /// Snapshot for the display sink
    Display { frame: DisplayFrame },
}

impl TimerEvent {
    pub fn cue(&self) -> Option<Cue> {
        match self {
            TimerEvent::Cue { cue } => Some(*cue),
            _ => None,
        }
    }

    pub fn frame(&self) -> Option<&DisplayFrame> {
        match self {
            TimerEvent::Display { frame } => Some(frame),
            _ => None,
        }
    }
}
