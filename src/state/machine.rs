//! Phase timer state machine
//!
//! Drives READY -> PREP -> ROUND -> (REST -> ROUND)* -> DONE. Each operation
//! mutates the owned `TimerState` and returns the events it produced, in
//! order. Scheduling ticks and playing sounds is left to the caller.

use std::time::Duration;

use tracing::{debug, info};

use super::timer_state::{PREP_BOUNDS, REST_BOUNDS, ROUNDS_BOUNDS, ROUND_BOUNDS};
use super::{Phase, Settings, TimerState};
use crate::display::DisplayFrame;
use crate::events::{Cue, TimerEvent};

/// Warning window for beeps at the end of a round
const ROUND_WARNING_SECS: u32 = 10;
/// Warning window for beeps at the end of the prep countdown
const PREP_WARNING_SECS: u32 = 3;
/// Offsets of the repeated end-of-workout bells
const FINAL_BELL_DELAYS_MS: [u64; 2] = [400, 800];

/// The state machine behind the workout timer
#[derive(Debug, Clone)]
pub struct PhaseTimer {
    state: TimerState,
}

impl PhaseTimer {
    pub fn new(settings: Settings) -> Self {
        Self {
            state: TimerState::new(settings),
        }
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running
    }

    /// Start or resume the workout
    pub fn start(&mut self) -> Vec<TimerEvent> {
        let mut events = Vec::new();

        if self.state.phase == Phase::Done {
            events.extend(self.reset());
        }

        self.state.is_running = true;

        if self.state.phase == Phase::Ready {
            if self.state.prep_duration > 0 {
                self.state.phase = Phase::Prep;
                self.state.time_left = self.state.prep_duration;
            } else {
                self.state.phase = Phase::Round;
                self.state.time_left = self.state.round_duration;
                events.push(TimerEvent::Cue { cue: Cue::Ding });
            }
        }

        info!(
            phase = %self.state.phase,
            round = self.state.current_round,
            time_left = self.state.time_left,
            "timer started"
        );

        events.push(self.display());
        events
    }

    /// Stop ticking; calling it again changes nothing
    pub fn pause(&mut self) -> Vec<TimerEvent> {
        if self.state.is_running {
            info!(phase = %self.state.phase, time_left = self.state.time_left, "timer paused");
        }
        self.state.is_running = false;
        vec![self.display()]
    }

    /// Pause when running, start otherwise
    pub fn toggle(&mut self) -> Vec<TimerEvent> {
        if self.state.is_running {
            self.pause()
        } else {
            self.start()
        }
    }

    /// Back to READY at round 1, dropping any pending end bells
    pub fn reset(&mut self) -> Vec<TimerEvent> {
        self.state.is_running = false;
        self.state.phase = Phase::Ready;
        self.state.current_round = 1;
        self.state.time_left = self.state.round_duration;

        info!("timer reset");

        vec![TimerEvent::CancelPendingCues, self.display()]
    }

    /// Advance one second. Ignored unless running.
    pub fn tick(&mut self) -> Vec<TimerEvent> {
        if !self.state.is_running {
            return Vec::new();
        }

        let mut events = Vec::new();
        self.state.time_left = self.state.time_left.saturating_sub(1);

        let left = self.state.time_left;
        let warn = match self.state.phase {
            Phase::Round => left > 0 && left <= ROUND_WARNING_SECS,
            Phase::Prep => left > 0 && left <= PREP_WARNING_SECS,
            _ => false,
        };
        if warn {
            events.push(TimerEvent::Cue { cue: Cue::Beep });
        }

        events.push(self.display());

        if self.state.time_left == 0 {
            events.extend(self.transition());
            events.push(self.display());
        }

        events
    }

    fn transition(&mut self) -> Vec<TimerEvent> {
        let from = self.state.phase;
        let mut events = Vec::new();

        match from {
            Phase::Prep => self.begin_round(&mut events),
            Phase::Round if !self.state.is_last_round() => {
                if self.state.rest_duration > 0 {
                    self.state.phase = Phase::Rest;
                    self.state.time_left = self.state.rest_duration;
                    events.push(TimerEvent::Cue { cue: Cue::EndBell });
                } else {
                    self.state.current_round += 1;
                    self.begin_round(&mut events);
                }
            }
            Phase::Round => {
                self.state.phase = Phase::Done;
                self.state.time_left = 0;
                self.state.is_running = false;
                events.push(TimerEvent::Cue { cue: Cue::EndBell });
                for ms in FINAL_BELL_DELAYS_MS {
                    events.push(TimerEvent::DelayedCue {
                        cue: Cue::EndBell,
                        delay: Duration::from_millis(ms),
                    });
                }
            }
            Phase::Rest => {
                self.state.current_round += 1;
                self.begin_round(&mut events);
            }
            Phase::Ready | Phase::Done => {}
        }

        info!(
            from = %from,
            to = %self.state.phase,
            round = self.state.current_round,
            total = self.state.total_rounds,
            "phase transition"
        );

        events
    }

    fn begin_round(&mut self, events: &mut Vec<TimerEvent>) {
        self.state.phase = Phase::Round;
        self.state.time_left = self.state.round_duration;
        events.push(TimerEvent::Cue { cue: Cue::Ding });
    }

    pub fn adjust_prep_duration(&mut self, delta: i64) -> Vec<TimerEvent> {
        self.configure("prep_duration", |state| {
            state.prep_duration = PREP_BOUNDS.offset(state.prep_duration, delta);
        })
    }

    pub fn adjust_round_duration(&mut self, delta: i64) -> Vec<TimerEvent> {
        self.configure("round_duration", |state| {
            state.round_duration = ROUND_BOUNDS.offset(state.round_duration, delta);
            sync_round_time(state);
        })
    }

    pub fn set_round_duration(&mut self, seconds: i64) -> Vec<TimerEvent> {
        self.configure("round_duration", |state| {
            state.round_duration = ROUND_BOUNDS.clamp(seconds);
            sync_round_time(state);
        })
    }

    pub fn adjust_rest_duration(&mut self, delta: i64) -> Vec<TimerEvent> {
        self.configure("rest_duration", |state| {
            state.rest_duration = REST_BOUNDS.offset(state.rest_duration, delta);
        })
    }

    pub fn set_rest_duration(&mut self, seconds: i64) -> Vec<TimerEvent> {
        self.configure("rest_duration", |state| {
            state.rest_duration = REST_BOUNDS.clamp(seconds);
        })
    }

    pub fn adjust_rounds(&mut self, delta: i64) -> Vec<TimerEvent> {
        self.configure("total_rounds", |state| {
            state.total_rounds = ROUNDS_BOUNDS.offset(state.total_rounds, delta);
            fit_rounds(state);
        })
    }

    pub fn set_total_rounds(&mut self, rounds: i64) -> Vec<TimerEvent> {
        self.configure("total_rounds", |state| {
            state.total_rounds = ROUNDS_BOUNDS.clamp(rounds);
            fit_rounds(state);
        })
    }

    pub fn toggle_sound(&mut self) -> Vec<TimerEvent> {
        self.set_sound_enabled(!self.state.sound_enabled)
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) -> Vec<TimerEvent> {
        self.state.sound_enabled = enabled;
        info!(enabled, "sound setting changed");
        vec![self.display()]
    }

    /// Apply a settings change unless the timer is running
    fn configure<F>(&mut self, setting: &str, update: F) -> Vec<TimerEvent>
    where
        F: FnOnce(&mut TimerState),
    {
        if self.state.is_running {
            debug!(setting, "ignoring settings change while running");
            return Vec::new();
        }

        update(&mut self.state);
        debug!(setting, state = ?self.state, "settings changed");
        vec![self.display()]
    }

    fn display(&self) -> TimerEvent {
        TimerEvent::Display {
            frame: DisplayFrame::from_state(&self.state),
        }
    }
}

impl Default for PhaseTimer {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

/// Bring the round counter back inside a lowered round count. Rest always
/// leads into another round, so resting with no round left ends the workout.
fn fit_rounds(state: &mut TimerState) {
    state.current_round = state.current_round.min(state.total_rounds);
    if state.phase == Phase::Rest && state.is_last_round() {
        state.phase = Phase::Done;
        state.time_left = 0;
    }
}

/// A new round length restarts the countdown when a round is current or next
fn sync_round_time(state: &mut TimerState) {
    if matches!(state.phase, Phase::Ready | Phase::Round) {
        state.time_left = state.round_duration;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timer(prep: i64, round: i64, rest: i64, rounds: i64) -> PhaseTimer {
        PhaseTimer::new(Settings::clamped(prep, round, rest, rounds, true))
    }

    fn cues(events: &[TimerEvent]) -> Vec<Cue> {
        events.iter().filter_map(TimerEvent::cue).collect()
    }

    fn tick_n(timer: &mut PhaseTimer, n: u32) -> Vec<TimerEvent> {
        (0..n).flat_map(|_| timer.tick()).collect()
    }

    #[test]
    fn test_start_enters_prep() {
        let mut t = timer(3, 60, 30, 2);
        let events = t.start();
        assert_eq!(t.state().phase, Phase::Prep);
        assert_eq!(t.state().time_left, 3);
        assert!(t.is_running());
        assert!(cues(&events).is_empty());
    }

    #[test]
    fn test_prep_counts_into_round() {
        let mut t = timer(3, 60, 30, 2);
        t.start();

        let events = tick_n(&mut t, 3);
        assert_eq!(t.state().phase, Phase::Round);
        assert_eq!(t.state().time_left, 60);
        // beeps at 2 and 1, then the ding on entering the round
        assert_eq!(cues(&events), vec![Cue::Beep, Cue::Beep, Cue::Ding]);
    }

    #[test]
    fn test_start_without_prep_dings() {
        let mut t = timer(0, 30, 10, 3);
        let events = t.start();
        assert_eq!(t.state().phase, Phase::Round);
        assert_eq!(t.state().time_left, 30);
        assert_eq!(cues(&events), vec![Cue::Ding]);
    }

    #[test]
    fn test_back_to_back_rounds_without_rest() {
        let mut t = timer(0, 10, 0, 2);
        assert_eq!(cues(&t.start()), vec![Cue::Ding]);

        let events = tick_n(&mut t, 10);
        assert_eq!(t.state().phase, Phase::Round);
        assert_eq!(t.state().current_round, 2);
        assert_eq!(t.state().time_left, 10);
        assert_eq!(cues(&events).last(), Some(&Cue::Ding));

        let events = tick_n(&mut t, 10);
        assert_eq!(t.state().phase, Phase::Done);
        assert_eq!(t.state().time_left, 0);
        assert!(!t.is_running());

        let bells: Vec<&TimerEvent> = events
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    TimerEvent::Cue { cue: Cue::EndBell }
                        | TimerEvent::DelayedCue { cue: Cue::EndBell, .. }
                )
            })
            .collect();
        assert_eq!(
            bells,
            vec![
                &TimerEvent::Cue { cue: Cue::EndBell },
                &TimerEvent::DelayedCue {
                    cue: Cue::EndBell,
                    delay: Duration::from_millis(400)
                },
                &TimerEvent::DelayedCue {
                    cue: Cue::EndBell,
                    delay: Duration::from_millis(800)
                },
            ]
        );
    }

    #[test]
    fn test_round_into_rest_and_back() {
        let mut t = timer(0, 10, 5, 3);
        t.start();

        let events = tick_n(&mut t, 10);
        assert_eq!(t.state().phase, Phase::Rest);
        assert_eq!(t.state().time_left, 5);
        assert_eq!(t.state().current_round, 1);
        assert_eq!(cues(&events).last(), Some(&Cue::EndBell));

        let events = tick_n(&mut t, 5);
        assert_eq!(t.state().phase, Phase::Round);
        assert_eq!(t.state().current_round, 2);
        assert_eq!(t.state().time_left, 10);
        // no warning beeps during rest
        assert_eq!(cues(&events), vec![Cue::Ding]);
    }

    #[test]
    fn test_beep_window() {
        let mut t = timer(0, 15, 5, 2);
        t.start();

        for _ in 0..15 {
            let events = t.tick();
            let left = t.state().time_left;
            let beeps = cues(&events).iter().filter(|c| **c == Cue::Beep).count();
            if t.state().phase == Phase::Round && (1..=10).contains(&left) {
                assert_eq!(beeps, 1, "expected beep at {left}");
            } else {
                assert_eq!(beeps, 0, "unexpected beep at {left}");
            }
        }
        assert_eq!(t.state().phase, Phase::Rest);
    }

    #[test]
    fn test_prep_beeps_only_in_last_three_seconds() {
        let mut t = timer(10, 60, 0, 1);
        t.start();
        let per_tick: Vec<usize> = (0..10)
            .map(|_| cues(&t.tick()).iter().filter(|c| **c == Cue::Beep).count())
            .collect();
        assert_eq!(per_tick, vec![0, 0, 0, 0, 0, 0, 1, 1, 1, 0]);
    }

    #[test]
    fn test_tick_emits_frame_at_zero_before_transition() {
        let mut t = timer(1, 60, 0, 1);
        t.start();
        let events = t.tick();
        let frames: Vec<&DisplayFrame> = events.iter().filter_map(TimerEvent::frame).collect();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].phase, Phase::Prep);
        assert_eq!(frames[0].seconds, "00");
        assert_eq!(frames[1].phase, Phase::Round);
        assert_eq!(frames[1].minutes, "01");
    }

    #[test]
    fn test_full_sequence_counts_rounds() {
        let cases = [(0, 10, 0, 1), (5, 10, 3, 4), (60, 600, 300, 3), (2, 12, 0, 50)];
        for (prep, round, rest, rounds) in cases {
            let mut t = timer(prep, round, rest, rounds);
            t.start();

            let mut phases = vec![t.state().phase];
            let mut increments = 0;
            let mut last_round = t.state().current_round;
            while t.state().phase != Phase::Done {
                t.tick();
                if *phases.last().unwrap() != t.state().phase {
                    phases.push(t.state().phase);
                }
                if t.state().current_round != last_round {
                    assert_eq!(t.state().current_round, last_round + 1);
                    increments += 1;
                    last_round = t.state().current_round;
                }
            }

            assert_eq!(increments, rounds as u32 - 1);
            assert_eq!(t.state().current_round, rounds as u32);
            assert_eq!(phases.first(), Some(if prep > 0 { &Phase::Prep } else { &Phase::Round }));
            assert_eq!(phases.last(), Some(&Phase::Done));
            let rests = phases.iter().filter(|p| **p == Phase::Rest).count();
            assert_eq!(rests, if rest > 0 { rounds as usize - 1 } else { 0 });
        }
    }

    #[test]
    fn test_pause_is_idempotent() {
        let mut t = timer(3, 60, 30, 2);
        t.start();
        t.tick();
        t.pause();
        let once = t.state().clone();
        t.pause();
        assert_eq!(t.state(), &once);
        assert!(!t.is_running());
    }

    #[test]
    fn test_tick_while_paused_is_ignored() {
        let mut t = timer(3, 60, 30, 2);
        t.start();
        t.pause();
        let before = t.state().clone();
        assert!(t.tick().is_empty());
        assert_eq!(t.state(), &before);
    }

    #[test]
    fn test_reset_on_ready_is_unchanged() {
        let mut t = PhaseTimer::default();
        let before = t.state().clone();
        let events = t.reset();
        assert_eq!(t.state(), &before);
        assert_eq!(events.first(), Some(&TimerEvent::CancelPendingCues));
    }

    #[test]
    fn test_reset_mid_workout() {
        let mut t = timer(0, 10, 0, 3);
        t.start();
        tick_n(&mut t, 14);
        assert_eq!(t.state().current_round, 2);

        t.reset();
        assert_eq!(t.state().phase, Phase::Ready);
        assert_eq!(t.state().current_round, 1);
        assert_eq!(t.state().time_left, 10);
        assert!(!t.is_running());
    }

    #[test]
    fn test_start_after_done_resets_first() {
        let mut t = timer(2, 10, 0, 1);
        t.start();
        tick_n(&mut t, 12);
        assert_eq!(t.state().phase, Phase::Done);

        let events = t.start();
        assert_eq!(events.first(), Some(&TimerEvent::CancelPendingCues));
        assert_eq!(t.state().phase, Phase::Prep);
        assert_eq!(t.state().time_left, 2);
        assert_eq!(t.state().current_round, 1);
        assert!(t.is_running());
    }

    #[test]
    fn test_resume_keeps_phase() {
        let mut t = timer(0, 30, 0, 2);
        t.start();
        tick_n(&mut t, 5);
        t.pause();
        let events = t.start();
        assert_eq!(t.state().phase, Phase::Round);
        assert_eq!(t.state().time_left, 25);
        assert!(cues(&events).is_empty());
    }

    #[test]
    fn test_toggle() {
        let mut t = PhaseTimer::default();
        t.toggle();
        assert!(t.is_running());
        t.toggle();
        assert!(!t.is_running());
    }

    #[test]
    fn test_adjustments_ignored_while_running() {
        let mut t = PhaseTimer::default();
        t.start();
        let before = t.state().clone();

        assert!(t.adjust_prep_duration(5).is_empty());
        assert!(t.adjust_round_duration(30).is_empty());
        assert!(t.set_round_duration(60).is_empty());
        assert!(t.adjust_rest_duration(-10).is_empty());
        assert!(t.set_rest_duration(0).is_empty());
        assert!(t.adjust_rounds(2).is_empty());
        assert!(t.set_total_rounds(3).is_empty());
        assert_eq!(t.state(), &before);
    }

    #[test]
    fn test_adjustments_clamp() {
        let mut t = PhaseTimer::default();

        t.adjust_prep_duration(100);
        assert_eq!(t.state().prep_duration, 60);
        t.adjust_prep_duration(-100);
        assert_eq!(t.state().prep_duration, 0);

        t.adjust_round_duration(-1000);
        assert_eq!(t.state().round_duration, 10);
        t.set_round_duration(9999);
        assert_eq!(t.state().round_duration, 600);

        t.adjust_rest_duration(1000);
        assert_eq!(t.state().rest_duration, 300);
        t.set_rest_duration(-3);
        assert_eq!(t.state().rest_duration, 0);

        t.adjust_rounds(-20);
        assert_eq!(t.state().total_rounds, 1);
        t.set_total_rounds(77);
        assert_eq!(t.state().total_rounds, 50);
    }

    #[test]
    fn test_round_duration_syncs_time_left() {
        let mut t = PhaseTimer::default();
        t.set_round_duration(120);
        assert_eq!(t.state().time_left, 120);

        // paused during prep: prep countdown is untouched
        t.start();
        t.pause();
        assert_eq!(t.state().phase, Phase::Prep);
        t.adjust_round_duration(30);
        assert_eq!(t.state().round_duration, 150);
        assert_eq!(t.state().time_left, 10);

        // paused mid round: countdown restarts at the new length
        let mut t = timer(0, 60, 0, 2);
        t.start();
        tick_n(&mut t, 5);
        t.pause();
        t.adjust_round_duration(-20);
        assert_eq!(t.state().time_left, 40);
    }

    #[test]
    fn test_rest_duration_leaves_time_left() {
        let mut t = PhaseTimer::default();
        t.set_rest_duration(90);
        assert_eq!(t.state().rest_duration, 90);
        assert_eq!(t.state().time_left, 180);
    }

    #[test]
    fn test_shrinking_rounds_clamps_current_round() {
        let mut t = timer(0, 10, 0, 5);
        t.start();
        tick_n(&mut t, 35);
        assert_eq!(t.state().current_round, 4);
        t.pause();

        t.set_total_rounds(2);
        assert_eq!(t.state().current_round, 2);
        assert_eq!(t.state().total_rounds, 2);
    }

    #[test]
    fn test_lowering_rounds_during_rest_finishes() {
        let mut t = timer(0, 10, 5, 3);
        t.start();
        tick_n(&mut t, 10);
        assert_eq!(t.state().phase, Phase::Rest);
        t.pause();

        t.set_total_rounds(1);
        assert_eq!(t.state().phase, Phase::Done);
        assert_eq!(t.state().current_round, 1);
        assert_eq!(t.state().time_left, 0);

        // starting again begins a fresh one-round workout
        t.start();
        tick_n(&mut t, 10);
        assert_eq!(t.state().phase, Phase::Done);
        assert!(t.state().current_round <= t.state().total_rounds);
    }

    #[test]
    fn test_lowering_rounds_during_rest_keeps_next_round() {
        let mut t = timer(0, 10, 5, 4);
        t.start();
        tick_n(&mut t, 10);
        t.pause();

        t.adjust_rounds(-2);
        assert_eq!(t.state().total_rounds, 2);
        assert_eq!(t.state().phase, Phase::Rest);

        t.start();
        tick_n(&mut t, 5);
        assert_eq!(t.state().phase, Phase::Round);
        assert_eq!(t.state().current_round, 2);
        assert_eq!(t.state().total_rounds, 2);
    }

    #[test]
    fn test_toggle_sound_while_running() {
        let mut t = PhaseTimer::default();
        t.start();
        t.toggle_sound();
        assert!(!t.state().sound_enabled);
        t.set_sound_enabled(true);
        assert!(t.state().sound_enabled);
    }
}
