use std::thread;

use starbelt_app::demo;
use starbelt_app::game_loop::TICK_DURATION;
use starbelt_app::state::{AppError, AppState, GameLoopCommand};
use starbelt_core::config::SimConfig;
use starbelt_core::events::GameEvent;

/// Length of the scripted flight at 1x speed (30 s).
const DEMO_FRAMES: u64 = 1800;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("loading config from {path}");
            SimConfig::load(&path)?
        }
        None => SimConfig::default(),
    };
    let start = GameEvent::GameStart {
        asteroids: Some(config.start.asteroids),
        enemies: Some(config.start.enemies),
    };

    let state = AppState::new();
    state.start(config)?;
    state.send(GameLoopCommand::Event(start))?;

    for frame in 0..DEMO_FRAMES {
        if !state.is_running() {
            break;
        }
        state.send(GameLoopCommand::Input(demo::demo_input(frame)))?;
        thread::sleep(TICK_DURATION);
    }

    if state.is_running() {
        state.send(GameLoopCommand::Input(demo::close_input()))?;
    }
    state.wait()?;

    if let Some(report) = state.latest_report()? {
        log::info!(
            "stopped at tick {}: {} asteroids, {} boids, {} projectiles",
            report.time.tick,
            report.population.asteroids,
            report.population.boids,
            report.population.projectiles
        );
    }
    let board = state.scoreboard()?;
    log::info!(
        "score {} over {} game(s), {} lost",
        board.score,
        board.games_started,
        board.games_lost
    );
    Ok(())
}
