//! Handle for sending commands to the timer task

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

use super::Command;
use crate::state::TimerState;

/// Messages accepted by the timer task
#[derive(Debug)]
pub enum Message {
    Apply(Command),
    Snapshot(oneshot::Sender<TimerState>),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ControlError {
    #[error("timer task has stopped")]
    TimerStopped,
}

/// Cloneable sender side of the timer task's command channel
#[derive(Debug, Clone)]
pub struct TimerHandle {
    tx: mpsc::Sender<Message>,
}

impl TimerHandle {
    pub fn new(tx: mpsc::Sender<Message>) -> Self {
        Self { tx }
    }

    /// Create a handle together with the receiver the timer task consumes
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<Message>) {
        let (tx, rx) = mpsc::channel(buffer);
        (Self::new(tx), rx)
    }

    pub async fn send(&self, command: Command) -> Result<(), ControlError> {
        self.tx
            .send(Message::Apply(command))
            .await
            .map_err(|_| ControlError::TimerStopped)
    }

    /// Current state as seen by the timer task
    pub async fn snapshot(&self) -> Result<TimerState, ControlError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(Message::Snapshot(reply_tx))
            .await
            .map_err(|_| ControlError::TimerStopped)?;
        reply_rx.await.map_err(|_| ControlError::TimerStopped)
    }

    pub async fn start(&self) -> Result<(), ControlError> {
        self.send(Command::Start).await
    }

    pub async fn pause(&self) -> Result<(), ControlError> {
        self.send(Command::Pause).await
    }

    pub async fn toggle(&self) -> Result<(), ControlError> {
        self.send(Command::Toggle).await
    }

    pub async fn reset(&self) -> Result<(), ControlError> {
        self.send(Command::Reset).await
    }

    pub async fn toggle_sound(&self) -> Result<(), ControlError> {
        self.send(Command::ToggleSound).await
    }
}
