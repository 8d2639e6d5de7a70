//! Application state shared between the driver and the game loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::JoinHandle;

use serde::{Deserialize, Serialize};

use starbelt_core::commands::InputSample;
use starbelt_core::config::{ConfigError, SimConfig};
use starbelt_core::events::GameEvent;
use starbelt_core::state::TickReport;

use crate::game_loop;

/// Commands sent from the driver to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// Input sample for the next tick; key-down fields are latched until ticked.
    Input(InputSample),
    /// Queue an inbound game event.
    Event(GameEvent),
    SetTimeScale(f64),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to spawn game loop thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("simulation already running")]
    AlreadyRunning,

    #[error("simulation not started")]
    NotRunning,

    #[error("game loop has stopped")]
    LoopStopped,

    #[error("shared state lock poisoned")]
    Poisoned,
}

/// Running totals kept from the outbound event stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub score: i64,
    /// Last reported player health fraction.
    pub health: f32,
    pub games_started: u32,
    pub games_lost: u32,
}

/// Shared application state.
///
/// - `mpsc::Sender` sits in a `Mutex` so the state can be shared by reference
/// - `Arc<Mutex<...>>` for what the game loop thread writes after each tick
pub struct AppState {
    /// `None` before `start` is called.
    pub command_tx: Mutex<Option<mpsc::Sender<GameLoopCommand>>>,
    /// Updated by the game loop thread after each tick.
    pub latest_report: Arc<Mutex<Option<TickReport>>>,
    pub scoreboard: Arc<Mutex<Scoreboard>>,
    loop_handle: Mutex<Option<JoinHandle<()>>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            command_tx: Mutex::new(None),
            latest_report: Arc::new(Mutex::new(None)),
            scoreboard: Arc::new(Mutex::new(Scoreboard {
                health: 1.0,
                ..Default::default()
            })),
            loop_handle: Mutex::new(None),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn the game loop thread for `config`.
    pub fn start(&self, config: SimConfig) -> Result<(), AppError> {
        let mut tx_lock = lock(&self.command_tx)?;
        if tx_lock.is_some() {
            return Err(AppError::AlreadyRunning);
        }

        let bus = game_loop::scoreboard_bus(self.scoreboard.clone());
        let (cmd_tx, handle) = game_loop::spawn_game_loop(config, self.latest_report.clone(), bus)?;

        *tx_lock = Some(cmd_tx);
        *lock(&self.loop_handle)? = Some(handle);
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        lock(&self.loop_handle)
            .map(|handle| handle.as_ref().is_some_and(|h| !h.is_finished()))
            .unwrap_or(false)
    }

    /// Forward a command to the game loop.
    pub fn send(&self, command: GameLoopCommand) -> Result<(), AppError> {
        let tx_lock = lock(&self.command_tx)?;
        match tx_lock.as_ref() {
            Some(tx) => tx.send(command).map_err(|_| AppError::LoopStopped),
            None => Err(AppError::NotRunning),
        }
    }

    /// Block until the game loop thread exits.
    pub fn wait(&self) -> Result<(), AppError> {
        let handle = lock(&self.loop_handle)?.take();
        if let Some(handle) = handle {
            handle.join().map_err(|_| AppError::LoopStopped)?;
        }
        lock(&self.command_tx)?.take();
        Ok(())
    }

    pub fn latest_report(&self) -> Result<Option<TickReport>, AppError> {
        Ok(lock(&self.latest_report)?.clone())
    }

    pub fn scoreboard(&self) -> Result<Scoreboard, AppError> {
        Ok(*lock(&self.scoreboard)?)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, AppError> {
    mutex.lock().map_err(|_| AppError::Poisoned)
}
