//! Game loop thread: runs the simulation engine at the tick rate and
//! publishes each tick's events.
//!
//! The engine is created inside the thread and never leaves it. Commands
//! arrive via `mpsc` channel. Inbound and outbound events go through an
//! `EventBus`, and the latest report is stored in shared state for polling.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use starbelt_core::config::SimConfig;
use starbelt_core::constants::TICK_RATE;
use starbelt_core::events::{EventBus, EventKind, GameEvent};
use starbelt_core::state::TickReport;
use starbelt_sim::SimulationEngine;

use crate::state::{GameLoopCommand, Scoreboard};

/// Nominal duration of one tick at 1x speed.
pub const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Spawns the game loop in a new thread.
///
/// Returns the command sender and the thread handle.
pub fn spawn_game_loop(
    config: SimConfig,
    latest_report: Arc<Mutex<Option<TickReport>>>,
    bus: EventBus,
) -> std::io::Result<(mpsc::Sender<GameLoopCommand>, JoinHandle<()>)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("starbelt-game-loop".into())
        .spawn(move || {
            run_game_loop(config, cmd_rx, &latest_report, bus);
        })?;

    Ok((cmd_tx, handle))
}

/// The game loop. Runs until Shutdown, channel disconnect, or a close request.
fn run_game_loop(
    config: SimConfig,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_report: &Mutex<Option<TickReport>>,
    mut bus: EventBus,
) {
    let mut engine = SimulationEngine::new(config);
    let mut next_tick_time = Instant::now();
    log::info!("game loop started at {TICK_RATE} Hz");

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::Input(input)) => engine.set_input(input),
                Ok(GameLoopCommand::Event(event)) => {
                    // Inbound events reach subscribers too
                    bus.broadcast(&event);
                    engine.queue_event(event);
                }
                Ok(GameLoopCommand::SetTimeScale(scale)) => engine.set_time_scale(scale),
                Ok(GameLoopCommand::Shutdown) => {
                    log::info!("game loop shut down at tick {}", engine.time().tick);
                    return;
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return,
            }
        }

        // 2. Advance one tick
        let report = engine.tick();

        // 3. Publish this tick's events
        bus.broadcast_all(&report.events);

        // 4. Store latest report for polling
        let close = report.close_requested;
        if let Ok(mut lock) = latest_report.lock() {
            *lock = Some(report);
        }
        if close {
            log::info!("close requested at tick {}", engine.time().tick);
            return;
        }

        // 5. Sleep until next tick, adjusting for time_scale
        let time_scale = engine.time_scale();
        let effective_tick_duration = if time_scale > 0.001 {
            TICK_DURATION.div_f64(time_scale)
        } else {
            TICK_DURATION
        };

        next_tick_time += effective_tick_duration;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > effective_tick_duration * 2 {
            // Too far behind: reset to avoid a catch-up spiral
            next_tick_time = now;
        }
    }
}

/// An event bus that logs every event and keeps `scoreboard` current.
pub fn scoreboard_bus(scoreboard: Arc<Mutex<Scoreboard>>) -> EventBus {
    let mut bus = EventBus::new();

    let board = scoreboard.clone();
    bus.subscribe(EventKind::GameStart, move |event| {
        log::info!("{event:?}");
        if let Ok(mut board) = board.lock() {
            board.games_started += 1;
        }
    });

    let board = scoreboard.clone();
    bus.subscribe(EventKind::ScoreIncrease, move |event| {
        if let GameEvent::ScoreIncrease { amount } = event {
            if let Ok(mut board) = board.lock() {
                board.score += i64::from(*amount);
                log::debug!("score +{amount} = {}", board.score);
            }
        }
    });

    let board = scoreboard.clone();
    bus.subscribe(EventKind::HealthDisplay, move |event| {
        if let GameEvent::HealthDisplay { percentage } = event {
            log::debug!("health {:.0}%", percentage * 100.0);
            if let Ok(mut board) = board.lock() {
                board.health = *percentage;
            }
        }
    });

    bus.subscribe(EventKind::GameEnd, move |event| {
        log::info!("{event:?}");
        if let GameEvent::GameEnd { state: Some(true) } = event {
            if let Ok(mut board) = scoreboard.lock() {
                board.games_lost += 1;
            }
        }
    });

    bus
}
