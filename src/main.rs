//! Round Timer - terminal interval timer for round-based workouts
//!
//! This is the main entry point for the round-timer application.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{error, info};

use round_timer::{
    config::Config,
    control::TimerHandle,
    services::CuePlayer,
    state::PhaseTimer,
    tasks::{display_task, session, timer_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Logs go to stderr so stdout only carries display frames
    tracing_subscriber::fmt()
        .with_env_filter(format!("round_timer={}", config.log_level()))
        .with_writer(std::io::stderr)
        .init();

    let settings = config.settings();
    info!("Starting round-timer v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Workout: prep={}s, round={}s, rest={}s, rounds={}, sound={}",
        settings.prep_duration,
        settings.round_duration,
        settings.rest_duration,
        settings.total_rounds,
        settings.sound_enabled
    );

    let player: Arc<dyn CuePlayer> = Arc::new(config.audio_backend());
    let (handle, commands) = TimerHandle::channel(32);
    let (display_tx, display_rx) = broadcast::channel(64);

    // Display first so it catches the initial frame
    let display = tokio::spawn(display_task(display_rx, config.renderer(), tokio::io::stdout()));
    let finished_rx = display_tx.subscribe();
    let timer = tokio::spawn(timer_task(PhaseTimer::new(settings), commands, display_tx, player));

    if config.autostart {
        handle.start().await?;
    }

    info!("Commands: start | pause | p (toggle) | reset | status | sound [on|off]");
    info!("          prep ±N | round [±]N | rest [±]N | rounds [±]N | quit");

    let exit_code = tokio::select! {
        result = session(
            tokio::io::stdin(),
            tokio::io::stdout(),
            handle,
            finished_rx,
            config.autostart,
        ) => match result {
            Ok(()) => 0,
            Err(e) => {
                error!("Input error: {}", e);
                1
            }
        },
        _ = async {
            if let Err(e) = shutdown_signal().await {
                error!("Failed to install signal handlers: {}", e);
                std::future::pending::<()>().await;
            }
        } => {
            info!("Shutdown signal received");
            0
        }
    };

    // Stopping the timer task drops the display sender, which ends the display task
    timer.abort();
    let _ = timer.await;
    let _ = display.await;

    info!("round-timer stopped");

    // A pending stdin read would keep the runtime from shutting down
    std::process::exit(exit_code);
}
