//! Spring physics animation
//!
//! RK4-integrated spring physics for smooth, natural animations.
//! A [`Spring`] can be stepped directly or sampled by elapsed time through
//! the [`Generator`] trait, which is how the playback loop drives it.

use crate::animate::{Generator, GeneratorState};
use glide_core::Value;
use serde::{Deserialize, Serialize};

/// Largest integration step, in milliseconds
const MAX_STEP_MS: f64 = 1000.0 / 120.0;

/// Configuration for a spring animation
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpringConfig {
    pub stiffness: f64,
    pub damping: f64,
    pub mass: f64,
    /// Distance from the target below which the spring may rest
    pub rest_delta: f64,
    /// Speed (units per second) below which the spring may rest
    pub rest_speed: f64,
}

impl SpringConfig {
    /// Create a new spring configuration with default rest thresholds
    pub fn new(stiffness: f64, damping: f64, mass: f64) -> Self {
        Self {
            stiffness,
            damping,
            mass,
            ..Self::default()
        }
    }

    pub fn with_rest(mut self, rest_delta: f64, rest_speed: f64) -> Self {
        self.rest_delta = rest_delta;
        self.rest_speed = rest_speed;
        self
    }

    /// Slow and soft
    pub fn gentle() -> Self {
        Self::new(120.0, 14.0, 1.0)
    }

    /// Visible overshoot
    pub fn wobbly() -> Self {
        Self::new(180.0, 12.0, 1.0)
    }

    /// Snappy, little overshoot
    pub fn stiff() -> Self {
        Self::new(400.0, 30.0, 1.0)
    }

    /// Damping at which the spring stops oscillating
    pub fn critical_damping(&self) -> f64 {
        2.0 * (self.stiffness * self.mass).sqrt()
    }

    pub fn is_underdamped(&self) -> bool {
        self.damping < self.critical_damping()
    }

    pub fn is_overdamped(&self) -> bool {
        self.damping > self.critical_damping()
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            stiffness: 100.0,
            damping: 10.0,
            mass: 1.0,
            rest_delta: 0.01,
            rest_speed: 10.0,
        }
    }
}

/// A spring-based animator
#[derive(Clone, Copy, Debug)]
pub struct Spring {
    config: SpringConfig,
    value: f64,
    velocity: f64,
    target: f64,
    /// Where sampling by time starts from
    origin: f64,
    initial_velocity: f64,
    elapsed_ms: f64,
}

impl Spring {
    pub fn new(config: SpringConfig, initial: f64) -> Self {
        Self::from_to(config, initial, initial, 0.0)
    }

    /// A spring from `from` towards `to`, launched with `velocity` units/s
    pub fn from_to(config: SpringConfig, from: f64, to: f64, velocity: f64) -> Self {
        Self {
            config,
            value: from,
            velocity,
            target: to,
            origin: from,
            initial_velocity: velocity,
            elapsed_ms: 0.0,
        }
    }

    pub fn config(&self) -> &SpringConfig {
        &self.config
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn set_target(&mut self, target: f64) {
        self.target = target;
    }

    /// Within both rest thresholds of the target
    pub fn is_settled(&self) -> bool {
        (self.value - self.target).abs() <= self.config.rest_delta
            && self.velocity.abs() <= self.config.rest_speed
    }

    /// Advance by `dt` seconds (fourth-order Runge-Kutta)
    pub fn step(&mut self, dt: f64) {
        if self.is_settled() {
            self.value = self.target;
            self.velocity = 0.0;
            return;
        }

        let (x, v) = (self.value, self.velocity);
        let half = dt / 2.0;
        let (a_dx, a_dv) = self.derivative(x, v);
        let (b_dx, b_dv) = self.derivative(x + a_dx * half, v + a_dv * half);
        let (c_dx, c_dv) = self.derivative(x + b_dx * half, v + b_dv * half);
        let (d_dx, d_dv) = self.derivative(x + c_dx * dt, v + c_dv * dt);

        self.value = x + (a_dx + 2.0 * (b_dx + c_dx) + d_dx) * dt / 6.0;
        self.velocity = v + (a_dv + 2.0 * (b_dv + c_dv) + d_dv) * dt / 6.0;
    }

    /// Rates of change of (position, velocity) at a state
    fn derivative(&self, x: f64, v: f64) -> (f64, f64) {
        let force = -self.config.stiffness * (x - self.target) - self.config.damping * v;
        (v, force / self.config.mass)
    }

    /// Advance the simulation to `t` ms after launch
    pub fn sample(&mut self, t: f64) -> f64 {
        if t < self.elapsed_ms {
            self.value = self.origin;
            self.velocity = self.initial_velocity;
            self.elapsed_ms = 0.0;
        }
        while self.elapsed_ms < t {
            let dt = (t - self.elapsed_ms).min(MAX_STEP_MS);
            self.step(dt / 1000.0);
            self.elapsed_ms += dt;
        }
        self.value
    }
}

impl Generator for Spring {
    fn next(&mut self, t: f64) -> GeneratorState {
        let value = self.sample(t);
        let done = self.is_settled();
        GeneratorState {
            value: Value::Number(if done { self.target } else { value }),
            done,
        }
    }

    fn flip_target(&mut self) {
        let (from, to) = (self.target, self.origin);
        *self = Spring::from_to(self.config, from, to, 0.0);
    }
}
