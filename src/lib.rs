pub mod run;
pub mod screen;
pub mod terminal;

use crate::terminal::Terminal;
use physics::{Physics, MOON_DISTANCE, PLANET_DISTANCE};
use std::{
    io::{self, IsTerminal},
    process::ExitCode,
    time::Duration,
};

/// World distance kept visible around the star: the whole moon orbit.
const VIEW_RADIUS: f64 = PLANET_DISTANCE + MOON_DISTANCE + 4.0;
const FRAME_TIME: Duration = Duration::from_nanos(1_000_000_000 / 60);

pub fn start() -> anyhow::Result<()> {
    // Log lines on the same terminal would tear the picture.
    let default_filter = if io::stderr().is_terminal() {
        "warn"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    log::info!("Setting up");
    let mut physics = Physics::initial();
    let mut screen = Terminal::new(VIEW_RADIUS)?;

    log::info!("Starting simulation loop");
    let stats = run::run(
        &mut physics,
        &mut screen,
        |_| !terminal::interrupt_requested(),
        Some(FRAME_TIME),
    )?;
    drop(screen);

    log::info!(
        "Interrupted after {} frames ({}s), {} degenerate pulls",
        stats.frame_number,
        stats.elapsed().as_secs(),
        stats.degenerate_pulls,
    );
    Ok(())
}

/// Logs a failed run, which by then has already given the terminal back.
pub fn exit_code(result: anyhow::Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
