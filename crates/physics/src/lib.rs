use cgmath::{prelude::*, Vector2};
use instant::Instant;
use std::time::Duration;

mod body;
pub use body::{Body, GRAVITY_CONSTANT, MIN_SEPARATION};

pub const PHYSICS_DELTA_TIME: f64 = 1.0 / 100.0;
pub const BODIES: usize = 3;

/// Distance of the planet from the star.
pub const PLANET_DISTANCE: f64 = 30.0;
/// Distance of the moon from the planet.
pub const MOON_DISTANCE: f64 = 5.5;

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum PhysicsError {
    #[error("bodies {distance} apart are treated as coincident, pull suppressed")]
    DegenerateConfiguration { distance: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Physics<const N: usize = BODIES> {
    bodies: [Body; N],
    dt: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickResult {
    pub degenerate_pulls: u32,
}

#[derive(Clone, Copy, Debug)]
pub struct PhysicsResult {
    pub elapsed_real: Duration,
    pub elapsed_physics_ticks: u64,
    pub degenerate_pulls: u64,
}

impl Physics {
    /// Star at the origin, a planet on a circular orbit around it and a moon
    /// circling the planet while sharing its orbital motion.
    pub fn initial() -> Self {
        let star = Body::with_mass_and_radius(10_000.0, 7.0);

        let planet_speed = (star.mass() / PLANET_DISTANCE).sqrt();
        let planet = Body::with_mass_and_radius(1_000.0, 2.0)
            .at(PLANET_DISTANCE, 0.0)
            .with_vel(0.0, planet_speed);

        let moon_speed = (planet.mass() / MOON_DISTANCE).sqrt();
        let moon = Body::with_mass_and_radius(1.0, 1.2)
            .at(PLANET_DISTANCE, MOON_DISTANCE)
            .with_vel(moon_speed, planet.vel.y);

        Self::from_bodies([star, planet, moon])
    }
}

impl<const N: usize> Physics<N> {
    /// # Panics
    /// If `bodies` is empty: there would be no primary body to follow.
    pub fn from_bodies(bodies: [Body; N]) -> Self {
        assert!(N > 0, "a simulation needs at least one body");
        Self {
            bodies,
            dt: PHYSICS_DELTA_TIME,
        }
    }
    /// Replaces the fixed time step. Only used to run finer simulations.
    pub fn with_delta_time(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }
    pub fn delta_time(&self) -> f64 {
        self.dt
    }
    /// The first body is the one the view follows.
    pub fn primary(&self) -> &Body {
        &self.bodies[0]
    }
    pub fn bodies(&self) -> &[Body; N] {
        &self.bodies
    }

    /// Accumulates every pairwise pull, then integrates every body.
    pub fn tick(&mut self) -> TickResult {
        let mut result = TickResult::default();
        for i in 0..N {
            for j in 0..N {
                if i == j {
                    continue;
                }
                let other = self.bodies[j];
                if let Err(err) = self.bodies[i].pulled_by(&other) {
                    log::debug!("Body {i} pulled by body {j}: {err}");
                    result.degenerate_pulls += 1;
                }
            }
        }
        for body in &mut self.bodies {
            body.update(self.dt);
        }
        result
    }

    pub fn advance(&mut self, ticks: u64) -> PhysicsResult {
        let before = Instant::now();
        let mut degenerate_pulls = 0;
        for _ in 0..ticks {
            degenerate_pulls += u64::from(self.tick().degenerate_pulls);
        }
        PhysicsResult {
            elapsed_real: Instant::now() - before,
            elapsed_physics_ticks: ticks,
            degenerate_pulls,
        }
    }

    pub fn total_mass(&self) -> f64 {
        self.bodies.iter().map(Body::mass).sum()
    }
    pub fn total_momentum(&self) -> Vector2<f64> {
        self.bodies.iter().map(Body::momentum).sum()
    }
    pub fn center_of_mass(&self) -> Vector2<f64> {
        let weighted: Vector2<f64> = self.bodies.iter().map(|b| b.mass() * b.pos).sum();
        weighted / self.total_mass()
    }
    /// Kinetic plus pairwise potential energy. Coincident pairs are skipped.
    pub fn total_energy(&self) -> f64 {
        let kinetic: f64 = self.bodies.iter().map(Body::kinetic_energy).sum();
        let mut potential = 0.0;
        for (i, a) in self.bodies.iter().enumerate() {
            for b in &self.bodies[i + 1..] {
                let distance = (a.pos - b.pos).magnitude();
                if distance >= MIN_SEPARATION {
                    potential -= GRAVITY_CONSTANT * a.mass() * b.mass() / distance;
                }
            }
        }
        kinetic + potential
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn initial_scenario() {
        let physics = Physics::initial();
        let [star, planet, moon] = physics.bodies();
        assert_eq!((star.mass(), star.radius()), (10_000.0, 7.0));
        assert_eq!((planet.mass(), planet.radius()), (1_000.0, 2.0));
        assert_eq!((moon.mass(), moon.radius()), (1.0, 1.2));

        assert_eq!(star.pos, Vector2::zero());
        assert_eq!(star.vel, Vector2::zero());
        assert_eq!(planet.pos, Vector2::new(30.0, 0.0));
        assert_relative_eq!(planet.vel.y, (10_000.0f64 / 30.0).sqrt());
        assert_eq!(planet.vel.x, 0.0);
        assert_eq!(moon.pos, Vector2::new(30.0, 5.5));
        assert_relative_eq!(moon.vel.x, (1_000.0f64 / 5.5).sqrt());
        assert_eq!(moon.vel.y, planet.vel.y);
        assert_eq!(physics.delta_time(), 0.01);
    }

    #[test]
    fn tick_clears_every_acceleration() {
        let mut physics = Physics::initial();
        let result = physics.tick();
        assert_eq!(result.degenerate_pulls, 0);
        for body in physics.bodies() {
            assert_eq!(body.acc(), Vector2::zero());
        }
    }

    #[test]
    fn tick_matches_hand_rolled_step() {
        let mut physics = Physics::initial();
        let mut bodies = *physics.bodies();
        let snapshot = bodies;
        for (i, body) in bodies.iter_mut().enumerate() {
            for (j, other) in snapshot.iter().enumerate() {
                if i != j {
                    body.pulled_by(other).unwrap();
                }
            }
        }
        bodies.iter_mut().for_each(|b| b.update(PHYSICS_DELTA_TIME));
        physics.tick();
        assert_eq!(physics.bodies(), &bodies);
    }

    #[test]
    fn momentum_is_conserved() {
        let mut physics = Physics::initial();
        let before = physics.total_momentum();
        let scale: f64 = physics.bodies().iter().map(|b| b.momentum().magnitude()).sum();
        let result = physics.advance(1000);
        assert_eq!(result.elapsed_physics_ticks, 1000);
        assert_eq!(result.degenerate_pulls, 0);
        let drift = (physics.total_momentum() - before).magnitude();
        assert!(drift / scale < 1e-3, "relative momentum drift {}", drift / scale);
    }

    #[test]
    fn energy_stays_bounded() {
        let mut physics = Physics::initial();
        let before = physics.total_energy();
        physics.advance(1000);
        let after = physics.total_energy();
        assert!(
            ((after - before) / before).abs() < 0.05,
            "energy went from {before} to {after}"
        );
    }

    #[test]
    fn circular_orbit_returns_after_one_period() {
        let star_mass = 10_000.0;
        let radius = 30.0;
        let star = Body::with_mass(star_mass);
        let satellite = Body::with_mass(1e-6)
            .at(radius, 0.0)
            .with_vel(0.0, (star_mass / radius).sqrt());
        let dt = 1e-3;
        let mut physics = Physics::from_bodies([star, satellite]).with_delta_time(dt);

        let period = 2.0 * PI * (radius.powi(3) / star_mass).sqrt();
        physics.advance((period / dt).round() as u64);

        let [_, satellite] = physics.bodies();
        let miss = (satellite.pos - Vector2::new(radius, 0.0)).magnitude();
        assert!(miss < 0.01 * radius, "missed starting point by {miss}");
    }

    #[test]
    fn runs_are_deterministic() {
        let mut a = Physics::initial();
        let mut b = Physics::initial();
        a.advance(500);
        b.advance(500);
        assert_eq!(a, b);
    }

    #[test]
    fn coincident_bodies_stay_finite() {
        let mut physics = Physics::from_bodies([
            Body::with_mass(100.0).at(1.0, 1.0),
            Body::with_mass(10.0).at(1.0, 1.0),
            Body::with_mass(1.0).at(5.0, 1.0),
        ]);
        let result = physics.tick();
        assert_eq!(result.degenerate_pulls, 2);
        for body in physics.bodies() {
            assert!(body.pos.x.is_finite() && body.pos.y.is_finite());
            assert!(body.vel.x.is_finite() && body.vel.y.is_finite());
        }
        assert!(physics.total_energy().is_finite());
    }

    #[test]
    #[should_panic(expected = "at least one body")]
    fn empty_simulation_is_rejected() {
        Physics::<0>::from_bodies([]);
    }

    #[test]
    fn single_body_drifts_freely() {
        let mut physics = Physics::from_bodies([Body::with_mass(5.0).with_vel(1.0, 0.0)]);
        physics.advance(100);
        assert_eq!(physics.primary().vel, Vector2::new(1.0, 0.0));
        assert_relative_eq!(physics.center_of_mass().x, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn center_of_mass_is_mass_weighted() {
        let physics = Physics::from_bodies([
            Body::with_mass(3.0).at(0.0, 0.0),
            Body::with_mass(1.0).at(4.0, 8.0),
        ]);
        assert_eq!(physics.center_of_mass(), Vector2::new(1.0, 2.0));
        assert_eq!(physics.total_mass(), 4.0);
    }
}
