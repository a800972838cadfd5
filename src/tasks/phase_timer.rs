//! Timer background task
//!
//! Owns the phase timer and is the only place it is mutated. Commands,
//! one-second ticks and delayed cues are serialized through a single
//! `select!` loop, so ticks never overlap and nothing fires after a
//! pause or reset has been processed.

use std::{collections::VecDeque, sync::Arc, time::Duration};

use tokio::{
    sync::{broadcast, mpsc},
    time::{interval_at, sleep_until, Instant, Interval, MissedTickBehavior},
};
use tracing::{debug, info};

use crate::{
    control::{Command, Message},
    display::DisplayFrame,
    events::{Cue, TimerEvent},
    services::CuePlayer,
    state::PhaseTimer,
};

/// Period between ticks while running
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

struct TimerDriver {
    timer: PhaseTimer,
    ticker: Option<Interval>,
    /// Delayed cues ordered by deadline
    pending: VecDeque<(Instant, Cue)>,
    display_tx: broadcast::Sender<DisplayFrame>,
    player: Arc<dyn CuePlayer>,
}

/// Background task that runs the phase timer until every command sender is gone
pub async fn timer_task(
    timer: PhaseTimer,
    mut commands: mpsc::Receiver<Message>,
    display_tx: broadcast::Sender<DisplayFrame>,
    player: Arc<dyn CuePlayer>,
) {
    info!("Starting timer task");

    let mut driver = TimerDriver {
        timer,
        ticker: None,
        pending: VecDeque::new(),
        display_tx,
        player,
    };

    // Initial frame so the display has something to draw
    let frame = DisplayFrame::from_state(driver.timer.state());
    driver.publish(frame);

    loop {
        let next_cue_at = driver.pending.front().map(|(at, _)| *at);

        tokio::select! {
            message = commands.recv() => match message {
                Some(Message::Apply(command)) => driver.apply(command),
                Some(Message::Snapshot(reply)) => {
                    let _ = reply.send(driver.timer.state().clone());
                }
                None => {
                    info!("Command channel closed, stopping timer task");
                    break;
                }
            },

            _ = next_tick(&mut driver.ticker) => {
                let events = driver.timer.tick();
                driver.dispatch(events);
                driver.sync_ticker(false);
            }

            _ = sleep_until(next_cue_at.unwrap_or_else(Instant::now)), if next_cue_at.is_some() => {
                driver.fire_due_cues();
            }
        }
    }
}

/// Resolve on the next tick, or never when no tick schedule exists
async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

impl TimerDriver {
    fn apply(&mut self, command: Command) {
        debug!(?command, "applying command");
        let was_running = self.timer.is_running();
        let events = command.apply(&mut self.timer);
        self.dispatch(events);

        let restart = !was_running || matches!(command, Command::Start);
        self.sync_ticker(restart);
    }

    /// Keep the tick schedule in line with the running flag. A restart
    /// drops the old schedule before creating the new one.
    fn sync_ticker(&mut self, restart: bool) {
        if !self.timer.is_running() {
            if self.ticker.take().is_some() {
                debug!("tick schedule cancelled");
            }
            return;
        }

        if restart || self.ticker.is_none() {
            self.ticker = None;
            let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            self.ticker = Some(interval);
            debug!("tick schedule started");
        }
    }

    fn dispatch(&mut self, events: Vec<TimerEvent>) {
        for event in events {
            match event {
                TimerEvent::Cue { cue } => self.play(cue),
                TimerEvent::DelayedCue { cue, delay } => {
                    let at = Instant::now() + delay;
                    let index = self.pending.partition_point(|(due, _)| *due <= at);
                    self.pending.insert(index, (at, cue));
                }
                TimerEvent::CancelPendingCues => {
                    if !self.pending.is_empty() {
                        debug!(count = self.pending.len(), "cancelling pending cues");
                        self.pending.clear();
                    }
                }
                TimerEvent::Display { frame } => self.publish(frame),
            }
        }
    }

    fn fire_due_cues(&mut self) {
        let now = Instant::now();
        while let Some((at, cue)) = self.pending.front().copied() {
            if at > now {
                break;
            }
            self.pending.pop_front();
            self.play(cue);
        }
    }

    /// Sound is checked at play time so muting also silences delayed cues
    fn play(&self, cue: Cue) {
        if self.timer.state().sound_enabled {
            self.player.play(cue);
        } else {
            debug!(%cue, "sound disabled, skipping cue");
        }
    }

    fn publish(&self, frame: DisplayFrame) {
        if self.display_tx.send(frame).is_err() {
            debug!("no display subscribers");
        }
    }
}
