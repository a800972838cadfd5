//! Timer commands and the line grammar used to type them

use std::str::FromStr;

use thiserror::Error;

use crate::events::TimerEvent;
use crate::state::PhaseTimer;

/// An operation on the phase timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    Toggle,
    Reset,
    AdjustPrep(i64),
    AdjustRound(i64),
    SetRound(i64),
    AdjustRest(i64),
    SetRest(i64),
    AdjustRounds(i64),
    SetRounds(i64),
    ToggleSound,
    SetSound(bool),
}

impl Command {
    /// Apply the command to a timer, returning the events it produced
    pub fn apply(self, timer: &mut PhaseTimer) -> Vec<TimerEvent> {
        match self {
            Command::Start => timer.start(),
            Command::Pause => timer.pause(),
            Command::Toggle => timer.toggle(),
            Command::Reset => timer.reset(),
            Command::AdjustPrep(delta) => timer.adjust_prep_duration(delta),
            Command::AdjustRound(delta) => timer.adjust_round_duration(delta),
            Command::SetRound(secs) => timer.set_round_duration(secs),
            Command::AdjustRest(delta) => timer.adjust_rest_duration(delta),
            Command::SetRest(secs) => timer.set_rest_duration(secs),
            Command::AdjustRounds(delta) => timer.adjust_rounds(delta),
            Command::SetRounds(rounds) => timer.set_total_rounds(rounds),
            Command::ToggleSound => timer.toggle_sound(),
            Command::SetSound(enabled) => timer.set_sound_enabled(enabled),
        }
    }
}

/// One line of user input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Command(Command),
    Status,
    Quit,
}

/// Errors from parsing a line of input
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command: {0}")]
    Unknown(String),

    #[error("{0} expects a number")]
    MissingValue(&'static str),

    #[error("invalid number for {setting}: {value}")]
    InvalidNumber { setting: &'static str, value: String },

    #[error("{0} only supports relative changes like +5 or -5")]
    AdjustOnly(&'static str),

    #[error("sound expects on or off, got {0}")]
    InvalidSound(String),

    #[error("unexpected argument: {0}")]
    UnexpectedArgument(String),
}

/// A numeric argument: signed means relative, unsigned means absolute
enum Amount {
    Delta(i64),
    Absolute(i64),
}

fn parse_amount(setting: &'static str, value: Option<&str>) -> Result<Amount, CommandError> {
    let value = value.ok_or(CommandError::MissingValue(setting))?;
    let invalid = || CommandError::InvalidNumber {
        setting,
        value: value.to_string(),
    };

    if let Some(rest) = value.strip_prefix('+') {
        rest.parse().map(Amount::Delta).map_err(|_| invalid())
    } else if value.starts_with('-') {
        value.parse().map(Amount::Delta).map_err(|_| invalid())
    } else {
        value.parse().map(Amount::Absolute).map_err(|_| invalid())
    }
}

impl FromStr for Input {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim().to_lowercase();
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(Input::Command(Command::Toggle));
        };
        let arg = words.next();
        if let Some(extra) = words.next() {
            return Err(CommandError::UnexpectedArgument(extra.to_string()));
        }

        let no_arg = |input: Input| match arg {
            Some(extra) => Err(CommandError::UnexpectedArgument(extra.to_string())),
            None => Ok(input),
        };

        match name {
            "start" => no_arg(Input::Command(Command::Start)),
            "pause" => no_arg(Input::Command(Command::Pause)),
            "toggle" | "p" => no_arg(Input::Command(Command::Toggle)),
            "reset" => no_arg(Input::Command(Command::Reset)),
            "status" => no_arg(Input::Status),
            "quit" | "exit" => no_arg(Input::Quit),
            "sound" => match arg {
                None => Ok(Input::Command(Command::ToggleSound)),
                Some("on") => Ok(Input::Command(Command::SetSound(true))),
                Some("off") => Ok(Input::Command(Command::SetSound(false))),
                Some(other) => Err(CommandError::InvalidSound(other.to_string())),
            },
            "prep" => match parse_amount("prep", arg)? {
                Amount::Delta(d) => Ok(Input::Command(Command::AdjustPrep(d))),
                Amount::Absolute(_) => Err(CommandError::AdjustOnly("prep")),
            },
            "round" => Ok(Input::Command(match parse_amount("round", arg)? {
                Amount::Delta(d) => Command::AdjustRound(d),
                Amount::Absolute(v) => Command::SetRound(v),
            })),
            "rest" => Ok(Input::Command(match parse_amount("rest", arg)? {
                Amount::Delta(d) => Command::AdjustRest(d),
                Amount::Absolute(v) => Command::SetRest(v),
            })),
            "rounds" => Ok(Input::Command(match parse_amount("rounds", arg)? {
                Amount::Delta(d) => Command::AdjustRounds(d),
                Amount::Absolute(v) => Command::SetRounds(v),
            })),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}
