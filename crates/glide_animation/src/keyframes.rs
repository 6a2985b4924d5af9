//! Keyframe (tween) generator
//!
//! Plays a sequence of values over a fixed duration. Each value sits at an
//! offset in 0..1 (evenly spaced unless given) and each segment between two
//! values has its own easing curve.

use crate::animate::{Generator, GeneratorState};
use crate::easing::Easing;
use crate::interpolate::Interpolator;
use glide_core::Value;

/// Easing for a keyframe sequence
#[derive(Clone, Debug, PartialEq)]
pub enum KeyframeEase {
    /// Same curve on every segment
    All(Easing),
    /// One curve per segment, wrapping if shorter
    PerSegment(Vec<Easing>),
}

impl Default for KeyframeEase {
    fn default() -> Self {
        KeyframeEase::All(Easing::EaseInOut)
    }
}

impl From<Easing> for KeyframeEase {
    fn from(easing: Easing) -> Self {
        KeyframeEase::All(easing)
    }
}

impl KeyframeEase {
    fn per_segment(&self, segments: usize) -> Vec<Easing> {
        match self {
            KeyframeEase::All(easing) => vec![easing.clone(); segments.max(1)],
            KeyframeEase::PerSegment(list) if list.is_empty() => {
                vec![Easing::EaseInOut; segments.max(1)]
            }
            KeyframeEase::PerSegment(list) => list.clone(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct KeyframesConfig {
    pub values: Vec<Value>,
    /// Offsets in 0..1, one per value
    pub times: Option<Vec<f64>>,
    /// Milliseconds
    pub duration: f64,
    pub ease: KeyframeEase,
}

impl Default for KeyframesConfig {
    fn default() -> Self {
        Self {
            values: Vec::new(),
            times: None,
            duration: 300.0,
            ease: KeyframeEase::default(),
        }
    }
}

impl KeyframesConfig {
    pub fn new(values: Vec<Value>, duration: f64) -> Self {
        Self {
            values,
            duration,
            ..Self::default()
        }
    }

    pub fn with_ease(mut self, ease: impl Into<KeyframeEase>) -> Self {
        self.ease = ease.into();
        self
    }

    pub fn with_times(mut self, times: Vec<f64>) -> Self {
        self.times = Some(times);
        self
    }
}

/// Evenly spaced offsets for `count` keyframes
pub fn default_offsets(count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![0.0],
        n => (0..n).map(|i| i as f64 / (n - 1) as f64).collect(),
    }
}

#[derive(Clone, Debug)]
pub struct Keyframes {
    config: KeyframesConfig,
    interpolator: Interpolator,
}

impl Keyframes {
    pub fn new(config: KeyframesConfig) -> Self {
        let interpolator = Self::build(&config);
        Self {
            config,
            interpolator,
        }
    }

    /// Two-value tween
    pub fn tween(from: Value, to: Value, duration: f64, ease: Easing) -> Self {
        Self::new(KeyframesConfig::new(vec![from, to], duration).with_ease(ease))
    }

    pub fn duration(&self) -> f64 {
        self.config.duration
    }

    fn build(config: &KeyframesConfig) -> Interpolator {
        let count = config.values.len();
        let offsets = match &config.times {
            Some(times) if times.len() == count => times.clone(),
            _ => default_offsets(count),
        };
        let input: Vec<f64> = offsets.iter().map(|o| o * config.duration).collect();
        Interpolator::new(&input, &config.values)
            .with_ease(config.ease.per_segment(count.saturating_sub(1)))
    }
}

impl Generator for Keyframes {
    fn next(&mut self, t: f64) -> GeneratorState {
        let done = t >= self.config.duration;
        let value = match (done, self.config.values.last()) {
            (true, Some(last)) => last.clone(),
            _ => self.interpolator.at(t),
        };
        GeneratorState { value, done }
    }

    fn flip_target(&mut self) {
        self.config.values.reverse();
        self.interpolator = Self::build(&self.config);
    }
}
