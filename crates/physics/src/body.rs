use crate::PhysicsError;
use cgmath::{prelude::*, Vector2};

pub const GRAVITY_CONSTANT: f64 = 1.0;
/// Separations below this are treated as coincident bodies.
pub const MIN_SEPARATION: f64 = 1e-9;

const DEFAULT_MASS: f64 = 1.0;
const RADIUS_PER_CBRT_MASS: f64 = 0.2;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Body {
    mass: f64,
    radius: f64,
    pub pos: Vector2<f64>,
    pub vel: Vector2<f64>,
    acc: Vector2<f64>,
}

impl Default for Body {
    fn default() -> Self {
        Self::with_mass_and_radius(DEFAULT_MASS, RADIUS_PER_CBRT_MASS)
    }
}

impl Body {
    /// A body whose radius grows with the cube root of its mass.
    ///
    /// # Panics
    /// If `mass` is not a positive finite number.
    pub fn with_mass(mass: f64) -> Self {
        Self::with_mass_and_radius(mass, RADIUS_PER_CBRT_MASS * mass.cbrt())
    }

    /// # Panics
    /// If `mass` or `radius` is not a positive finite number.
    pub fn with_mass_and_radius(mass: f64, radius: f64) -> Self {
        assert!(
            mass.is_finite() && mass > 0.0,
            "body mass must be positive, got {mass}"
        );
        assert!(
            radius.is_finite() && radius > 0.0,
            "body radius must be positive, got {radius}"
        );
        Self {
            mass,
            radius,
            pos: Vector2::zero(),
            vel: Vector2::zero(),
            acc: Vector2::zero(),
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.set_pos(x, y);
        self
    }
    pub fn with_vel(mut self, x: f64, y: f64) -> Self {
        self.vel = Vector2::new(x, y);
        self
    }
    pub fn set_pos(&mut self, x: f64, y: f64) {
        self.pos = Vector2::new(x, y);
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }
    pub fn radius(&self) -> f64 {
        self.radius
    }
    /// Acceleration accumulated so far in the current tick.
    pub fn acc(&self) -> Vector2<f64> {
        self.acc
    }

    /// Adds the gravitational pull of `other` to this body's acceleration.
    ///
    /// Coincident bodies contribute nothing; the acceleration is left as it
    /// was and the degenerate separation is reported to the caller.
    pub fn pulled_by(&mut self, other: &Body) -> Result<(), PhysicsError> {
        let rel_pos = other.pos - self.pos;
        let distance = rel_pos.magnitude();
        // Also rejects NaN separations.
        if !(distance >= MIN_SEPARATION) {
            return Err(PhysicsError::DegenerateConfiguration { distance });
        }
        self.acc += GRAVITY_CONSTANT * other.mass * rel_pos / distance.powi(3);
        Ok(())
    }

    /// Semi-implicit Euler: the position moves with the already updated
    /// velocity. Consumes the accumulated acceleration.
    pub fn update(&mut self, dt: f64) {
        self.vel += dt * self.acc;
        self.pos += dt * self.vel;
        self.acc = Vector2::zero();
    }

    pub fn momentum(&self) -> Vector2<f64> {
        self.mass * self.vel
    }
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.vel.magnitude2()
    }
}
