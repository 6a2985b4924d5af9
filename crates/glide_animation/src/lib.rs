//! glide Animation System
//!
//! The math and timing layer under glide's motion API.
//!
//! # Features
//!
//! - **Spring Physics**: RK4-integrated springs with stiffness, damping, mass and rest thresholds
//! - **Keyframes**: Timed sequences with per-segment easing and offsets
//! - **Decay / Inertia**: Velocity-driven deceleration with optional spring-back boundaries
//! - **Interpolation**: Numbers, colors and complex strings (`"10px 20px #fff"`)
//! - **Playback**: Elapsed-time loop with delay, repeat, reverse and mirror
//! - **Frame Scheduler**: Host-driven update → render → post-render phases
//! - **MotionValue**: Per-property value with velocity tracking and one in-flight animation

pub mod animate;
pub mod color;
pub mod complex;
pub mod decay;
pub mod easing;
pub mod interpolate;
pub mod keyframes;
pub mod motion_value;
pub mod scheduler;
pub mod spring;

pub use animate::{
    animate, AnimateOptions, AnimationKind, Controls, Generator, GeneratorState, RepeatType,
};
pub use color::Rgba;
pub use complex::{animatable_none, is_complex, ComplexValue};
pub use decay::{Decay, DecayConfig, Inertia, InertiaConfig};
pub use easing::Easing;
pub use interpolate::{Interpolate, Interpolator, Mixer};
pub use keyframes::{KeyframeEase, Keyframes, KeyframesConfig};
pub use motion_value::{CompleteFn, MotionValue};
pub use scheduler::{DriverId, FrameData, FrameScheduler, SchedulerHandle};
pub use spring::{Spring, SpringConfig};
