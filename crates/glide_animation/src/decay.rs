//! Velocity-driven deceleration
//!
//! [`Decay`] glides from a starting value along an exponential curve whose
//! distance is proportional to the launch velocity. [`Inertia`] adds
//! optional `min`/`max` boundaries: crossing one hands over to a spring that
//! settles on the boundary, carrying the decay's velocity at that moment.

use crate::animate::{Generator, GeneratorState};
use crate::spring::{Spring, SpringConfig};
use glide_core::Value;
use std::fmt;
use std::rc::Rc;

pub type ModifyTarget = Rc<dyn Fn(f64) -> f64>;

#[derive(Clone)]
pub struct DecayConfig {
    pub power: f64,
    /// Milliseconds
    pub time_constant: f64,
    pub rest_delta: f64,
    /// Snap the computed resting point, e.g. to a grid
    pub modify_target: Option<ModifyTarget>,
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            power: 0.8,
            time_constant: 350.0,
            rest_delta: 0.5,
            modify_target: None,
        }
    }
}

impl fmt::Debug for DecayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecayConfig")
            .field("power", &self.power)
            .field("time_constant", &self.time_constant)
            .field("rest_delta", &self.rest_delta)
            .field("modify_target", &self.modify_target.is_some())
            .finish()
    }
}

#[derive(Clone, Debug)]
pub struct Decay {
    amplitude: f64,
    target: f64,
    time_constant: f64,
    rest_delta: f64,
}

impl Decay {
    /// `velocity` is in units per second
    pub fn new(config: &DecayConfig, from: f64, velocity: f64) -> Self {
        let mut amplitude = config.power * velocity;
        let ideal = from + amplitude;
        let target = match &config.modify_target {
            Some(modify) => modify(ideal),
            None => ideal,
        };
        if target != ideal {
            amplitude = target - from;
        }
        Self {
            amplitude,
            target,
            time_constant: config.time_constant,
            rest_delta: config.rest_delta,
        }
    }

    /// Where the decay comes to rest
    pub fn target(&self) -> f64 {
        self.target
    }

    fn delta(&self, t: f64) -> f64 {
        -self.amplitude * (-t / self.time_constant).exp()
    }

    /// Value at `t` ms
    pub fn value_at(&self, t: f64) -> f64 {
        self.target + self.delta(t)
    }

    /// Velocity at `t` ms, in units per second
    pub fn velocity_at(&self, t: f64) -> f64 {
        -self.delta(t) / self.time_constant * 1000.0
    }

    fn is_done(&self, t: f64) -> bool {
        self.delta(t).abs() <= self.rest_delta
    }
}

impl Generator for Decay {
    fn next(&mut self, t: f64) -> GeneratorState {
        let done = self.is_done(t);
        let value = if done { self.target } else { self.value_at(t) };
        GeneratorState {
            value: Value::Number(value),
            done,
        }
    }

    fn flip_target(&mut self) {}
}

#[derive(Clone, Debug)]
pub struct InertiaConfig {
    pub decay: DecayConfig,
    pub bounce_stiffness: f64,
    pub bounce_damping: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Default for InertiaConfig {
    fn default() -> Self {
        Self {
            decay: DecayConfig {
                time_constant: 750.0,
                rest_delta: 1.0,
                ..DecayConfig::default()
            },
            bounce_stiffness: 500.0,
            bounce_damping: 10.0,
            min: None,
            max: None,
        }
    }
}

impl InertiaConfig {
    fn is_out_of_bounds(&self, v: f64) -> bool {
        self.min.is_some_and(|min| v < min) || self.max.is_some_and(|max| v > max)
    }

    fn nearest_boundary(&self, v: f64) -> f64 {
        match (self.min, self.max) {
            (Some(min), Some(max)) => {
                if (min - v).abs() < (max - v).abs() {
                    min
                } else {
                    max
                }
            }
            (Some(min), None) => min,
            (None, Some(max)) => max,
            (None, None) => v,
        }
    }

    fn bounce_spring(&self, from: f64, to: f64, velocity: f64) -> Spring {
        let config = SpringConfig::new(self.bounce_stiffness, self.bounce_damping, 1.0)
            .with_rest(self.decay.rest_delta, 10.0);
        Spring::from_to(config, from, to, velocity)
    }
}

#[derive(Clone, Debug)]
enum InertiaPhase {
    Decaying(Decay),
    /// Spring to a boundary, started `offset` ms into the animation
    Bouncing { spring: Spring, offset: f64 },
}

/// Decay with spring-back boundaries
#[derive(Clone, Debug)]
pub struct Inertia {
    config: InertiaConfig,
    phase: InertiaPhase,
}

impl Inertia {
    pub fn new(config: InertiaConfig, from: f64, velocity: f64) -> Self {
        let phase = if config.is_out_of_bounds(from) {
            InertiaPhase::Bouncing {
                spring: config.bounce_spring(from, config.nearest_boundary(from), velocity),
                offset: 0.0,
            }
        } else {
            let mut decay_config = config.decay.clone();
            // Resting outside the bounds would just bounce back; aim at the boundary
            let user_modify = decay_config.modify_target.take();
            let bounds = config.clone();
            decay_config.modify_target = Some(Rc::new(move |ideal| {
                let target = match &user_modify {
                    Some(modify) => modify(ideal),
                    None => ideal,
                };
                if bounds.is_out_of_bounds(target) {
                    bounds.nearest_boundary(target)
                } else {
                    target
                }
            }));
            InertiaPhase::Decaying(Decay::new(&decay_config, from, velocity))
        };
        Self { config, phase }
    }
}

impl Generator for Inertia {
    fn next(&mut self, t: f64) -> GeneratorState {
        if let InertiaPhase::Decaying(decay) = &self.phase {
            let value = decay.value_at(t);
            if self.config.is_out_of_bounds(value) {
                let boundary = self.config.nearest_boundary(value);
                let spring = self
                    .config
                    .bounce_spring(value, boundary, decay.velocity_at(t));
                self.phase = InertiaPhase::Bouncing { spring, offset: t };
            }
        }

        match &mut self.phase {
            InertiaPhase::Decaying(decay) => decay.next(t),
            InertiaPhase::Bouncing { spring, offset } => spring.next((t - *offset).max(0.0)),
        }
    }

    fn flip_target(&mut self) {}
}
