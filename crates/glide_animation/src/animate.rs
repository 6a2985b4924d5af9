//! Playback loop
//!
//! [`animate`] drives a [`Generator`] from the frame scheduler, tracking
//! elapsed time (negative while a delay runs), repeats with loop, reverse
//! and mirror semantics, and the gap between repeats.

use crate::decay::{Decay, DecayConfig, Inertia, InertiaConfig};
use crate::interpolate::Interpolator;
use crate::keyframes::{KeyframeEase, Keyframes, KeyframesConfig};
use crate::scheduler::SchedulerHandle;
use crate::spring::{Spring, SpringConfig};
use glide_core::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sample of a generator at a point in time
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratorState {
    pub value: Value,
    pub done: bool,
}

/// A value over time, sampled by elapsed milliseconds
pub trait Generator {
    fn next(&mut self, t: f64) -> GeneratorState;

    /// Swap origin and destination (used by mirror repeats)
    fn flip_target(&mut self);
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RepeatType {
    #[default]
    Loop,
    Reverse,
    Mirror,
}

/// Which generator drives the animation
#[derive(Clone, Debug)]
pub enum AnimationKind {
    Spring(SpringConfig),
    Keyframes {
        /// Milliseconds
        duration: f64,
        ease: KeyframeEase,
        /// Offsets in 0..1, one per keyframe
        times: Option<Vec<f64>>,
    },
    Decay(DecayConfig),
    Inertia(InertiaConfig),
}

impl Default for AnimationKind {
    fn default() -> Self {
        AnimationKind::Spring(SpringConfig::default())
    }
}

pub type UpdateFn = Box<dyn FnMut(&Value)>;
pub type DoneFn = Box<dyn FnOnce()>;

pub struct AnimateOptions {
    pub from: Value,
    /// Destination; more than one entry is a keyframe sequence
    pub to: Vec<Value>,
    /// Units per second
    pub velocity: f64,
    pub kind: AnimationKind,
    /// Starting elapsed time in ms; negative values delay the start
    pub elapsed: f64,
    /// Number of repeats after the first play; may be infinite
    pub repeat: f64,
    pub repeat_type: RepeatType,
    /// Milliseconds between repeats
    pub repeat_delay: f64,
    pub on_update: Option<UpdateFn>,
    pub on_complete: Option<DoneFn>,
}

impl AnimateOptions {
    pub fn new(from: impl Into<Value>, to: impl Into<Value>, kind: AnimationKind) -> Self {
        Self {
            from: from.into(),
            to: vec![to.into()],
            velocity: 0.0,
            kind,
            elapsed: 0.0,
            repeat: 0.0,
            repeat_type: RepeatType::Loop,
            repeat_delay: 0.0,
            on_update: None,
            on_complete: None,
        }
    }

    pub fn keyframes(values: Vec<Value>, kind: AnimationKind) -> Self {
        let from = values.first().cloned().unwrap_or(Value::Number(0.0));
        Self {
            to: values,
            ..Self::new(from, 0.0, kind)
        }
    }

    pub fn with_delay(mut self, delay: f64) -> Self {
        self.elapsed = -delay;
        self
    }

    pub fn with_velocity(mut self, velocity: f64) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_repeat(mut self, repeat: f64, repeat_type: RepeatType, repeat_delay: f64) -> Self {
        self.repeat = repeat;
        self.repeat_type = repeat_type;
        self.repeat_delay = repeat_delay;
        self
    }

    pub fn on_update(mut self, f: impl FnMut(&Value) + 'static) -> Self {
        self.on_update = Some(Box::new(f));
        self
    }

    pub fn on_complete(mut self, f: impl FnOnce() + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }

    fn target(&self) -> Value {
        self.to.last().cloned().unwrap_or_else(|| self.from.clone())
    }
}

impl fmt::Debug for AnimateOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimateOptions")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("velocity", &self.velocity)
            .field("kind", &self.kind)
            .field("elapsed", &self.elapsed)
            .field("repeat", &self.repeat)
            .field("repeat_type", &self.repeat_type)
            .field("repeat_delay", &self.repeat_delay)
            .finish()
    }
}

/// Stops a running animation
///
/// Stopping never fires the animation's completion callback.
#[must_use = "dropping Controls leaves no way to stop the animation"]
pub struct Controls {
    stop: Option<Box<dyn FnOnce()>>,
}

impl Controls {
    pub fn new(stop: impl FnOnce() + 'static) -> Self {
        Self {
            stop: Some(Box::new(stop)),
        }
    }

    /// Controls for work that already finished
    pub fn noop() -> Self {
        Self { stop: None }
    }

    pub fn stop(mut self) {
        if let Some(stop) = self.stop.take() {
            stop();
        }
    }
}

impl fmt::Debug for Controls {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controls")
            .field("active", &self.stop.is_some())
            .finish()
    }
}

fn loop_elapsed(elapsed: f64, duration: f64, delay: f64) -> f64 {
    elapsed - duration - delay
}

fn reverse_elapsed(elapsed: f64, duration: f64, delay: f64, is_forward: bool) -> f64 {
    if is_forward {
        loop_elapsed(duration - elapsed, duration, delay)
    } else {
        duration - (elapsed - duration) + delay
    }
}

fn has_repeat_delay_elapsed(elapsed: f64, duration: f64, delay: f64, is_forward: bool) -> bool {
    if is_forward {
        elapsed >= duration + delay
    } else {
        elapsed <= -delay
    }
}

/// Build the generator; springs between non-numeric values run over 0..100
/// and are mapped back through an interpolator.
fn build_generator(options: &AnimateOptions) -> (Box<dyn Generator>, Option<Interpolator>) {
    let from_number = options.from.as_number().unwrap_or(0.0);

    match &options.kind {
        AnimationKind::Keyframes {
            duration,
            ease,
            times,
        } => {
            let values = if options.to.len() > 1 {
                options.to.clone()
            } else {
                vec![options.from.clone(), options.target()]
            };
            let mut config = KeyframesConfig::new(values, *duration).with_ease(ease.clone());
            config.times = times.clone();
            (Box::new(Keyframes::new(config)), None)
        }
        AnimationKind::Spring(config) => {
            let to = options.target();
            match (&options.from, &to) {
                (Value::Number(from), Value::Number(to)) => (
                    Box::new(Spring::from_to(*config, *from, *to, options.velocity)),
                    None,
                ),
                _ => {
                    let mapping = Interpolator::new(&[0.0, 100.0], &[options.from.clone(), to])
                        .with_clamp(false);
                    (
                        Box::new(Spring::from_to(*config, 0.0, 100.0, options.velocity)),
                        Some(mapping),
                    )
                }
            }
        }
        AnimationKind::Decay(config) => (
            Box::new(Decay::new(config, from_number, options.velocity)),
            None,
        ),
        AnimationKind::Inertia(config) => (
            Box::new(Inertia::new(config.clone(), from_number, options.velocity)),
            None,
        ),
    }
}

struct Playback {
    generator: Box<dyn Generator>,
    mapping: Option<Interpolator>,
    elapsed: f64,
    repeat: f64,
    repeat_count: f64,
    repeat_type: RepeatType,
    repeat_delay: f64,
    /// Length of one play, known once the first play completes
    computed_duration: Option<f64>,
    is_forward: bool,
    is_complete: bool,
    latest: Value,
    on_update: Option<UpdateFn>,
}

impl Playback {
    fn repeat(&mut self, duration: f64) {
        self.repeat_count += 1.0;
        if self.repeat_type == RepeatType::Reverse {
            self.is_forward = self.repeat_count % 2.0 == 0.0;
            self.elapsed =
                reverse_elapsed(self.elapsed, duration, self.repeat_delay, self.is_forward);
        } else {
            self.elapsed = loop_elapsed(self.elapsed, duration, self.repeat_delay);
            if self.repeat_type == RepeatType::Mirror {
                self.generator.flip_target();
            }
        }
        self.is_complete = false;
    }

    /// Step by `delta` ms; returns true once every repeat has played
    fn update(&mut self, delta: f64) -> bool {
        self.elapsed += if self.is_forward { delta } else { -delta };

        if !self.is_complete {
            let state = self.generator.next(self.elapsed.max(0.0));
            self.latest = match &self.mapping {
                Some(mapping) => match state.value.as_number() {
                    Some(progress) => mapping.at(progress),
                    None => state.value,
                },
                None => state.value,
            };
            self.is_complete = if self.is_forward {
                state.done
            } else {
                self.elapsed <= 0.0
            };
        }

        if let Some(on_update) = self.on_update.as_mut() {
            on_update(&self.latest);
        }

        if !self.is_complete {
            return false;
        }

        let duration = *self.computed_duration.get_or_insert(self.elapsed);
        if self.repeat_count < self.repeat {
            if has_repeat_delay_elapsed(self.elapsed, duration, self.repeat_delay, self.is_forward) {
                self.repeat(duration);
            }
            false
        } else {
            true
        }
    }
}

/// Start an animation on the scheduler's update phase
///
/// The first step happens on the next frame. `on_complete` fires once the
/// last repeat finishes; stopping through the returned [`Controls`] never
/// fires it.
pub fn animate(scheduler: &SchedulerHandle, mut options: AnimateOptions) -> Controls {
    let (generator, mapping) = build_generator(&options);
    tracing::trace!(?options, "animate");

    let mut playback = Playback {
        generator,
        mapping,
        elapsed: options.elapsed,
        repeat: options.repeat,
        repeat_count: 0.0,
        repeat_type: options.repeat_type,
        repeat_delay: options.repeat_delay,
        computed_duration: None,
        is_forward: true,
        is_complete: false,
        latest: options.from.clone(),
        on_update: options.on_update.take(),
    };
    let mut on_complete = options.on_complete.take();

    let driver = scheduler.start_driver(move |frame| {
        if playback.update(frame.delta) {
            if let Some(done) = on_complete.take() {
                done();
            }
            return false;
        }
        true
    });

    let Some(id) = driver else {
        return Controls::noop();
    };

    let handle = scheduler.clone();
    Controls::new(move || handle.cancel_driver(id))
}
