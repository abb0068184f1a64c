use crate::screen::{plot, Screen};
use instant::Instant;
use physics::Physics;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Stats {
    pub frame_number: u64,
    pub tick_number: u64,
    pub degenerate_pulls: u64,
    instant_start: Instant,
    pub time_spent_in_physics: Duration,
    pub time_spent_in_graphics: Duration,
}

impl Stats {
    fn new() -> Self {
        Self {
            frame_number: 0,
            tick_number: 0,
            degenerate_pulls: 0,
            instant_start: Instant::now(),
            time_spent_in_physics: Duration::ZERO,
            time_spent_in_graphics: Duration::ZERO,
        }
    }
    pub fn elapsed(&self) -> Duration {
        Instant::now().duration_since(self.instant_start)
    }
}

/// Steps frames for as long as `keep_running` allows. Every frame ticks the
/// physics once and draws all bodies around the primary one.
///
/// With a `frame_time` the loop sleeps out the rest of each frame; the
/// simulated time step stays the same either way.
pub fn run<const N: usize>(
    physics: &mut Physics<N>,
    screen: &mut (impl Screen + ?Sized),
    mut keep_running: impl FnMut(&Stats) -> bool,
    frame_time: Option<Duration>,
) -> anyhow::Result<Stats> {
    let mut stats = Stats::new();
    while keep_running(&stats) {
        let instant_pre_physics = Instant::now();
        screen.clear();
        let result = physics.tick();
        stats.time_spent_in_physics += Instant::now().duration_since(instant_pre_physics);
        stats.tick_number += 1;
        stats.degenerate_pulls += u64::from(result.degenerate_pulls);

        let instant_pre_graphics = Instant::now();
        let primary = physics.primary();
        screen.set_viewport_center(primary.pos.x, primary.pos.y);
        for body in physics.bodies() {
            plot(body, &mut *screen);
        }
        screen.present()?;
        stats.time_spent_in_graphics += Instant::now().duration_since(instant_pre_graphics);
        stats.frame_number += 1;

        if stats.frame_number.is_power_of_two() || stats.frame_number % 1024 == 0 {
            let momentum = physics.total_momentum();
            log::info!(
                "Elapsed {}s total, {}ms physics ({} ticks), {}ms graphics ({} frames), \
                 {} degenerate pulls, energy {:.3}, momentum ({:.3e}, {:.3e})",
                stats.elapsed().as_secs(),
                stats.time_spent_in_physics.as_millis(),
                stats.tick_number,
                stats.time_spent_in_graphics.as_millis(),
                stats.frame_number,
                stats.degenerate_pulls,
                physics.total_energy(),
                momentum.x,
                momentum.y,
            );
        }

        if let Some(frame_time) = frame_time {
            let spent = Instant::now().duration_since(instant_pre_physics);
            if let Some(rest) = frame_time.checked_sub(spent) {
                std::thread::sleep(rest);
            }
        }
    }
    Ok(stats)
}
