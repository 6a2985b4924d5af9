//! Attaching motion to a subject
//!
//! [`use_motion`] wires the pieces for one subject: property bag, motion
//! values, controls, element binding and lifecycle driver.
//!
//! # Example
//!
//! ```rust
//! use glide_animation::FrameScheduler;
//! use glide_motion::{use_motion, MotionOptions, Variant, Variants};
//!
//! let scheduler = FrameScheduler::new();
//! let mut variants = Variants::new();
//! variants.insert("initial".into(), Variant::new().with("opacity", 0.0));
//! variants.insert("enter".into(), Variant::new().with("opacity", 1.0));
//!
//! let motion = use_motion(&scheduler.handle(), None, variants, MotionOptions::default());
//! motion.driver().mount(None);
//!
//! let mut t = 0.0;
//! while scheduler.frame(t) {
//!     t += 16.0;
//! }
//! assert_eq!(motion.properties().get("opacity"), Some(1.0.into()));
//! ```

use crate::binding::{ElementBinding, ElementSink};
use crate::controls::MotionControls;
use crate::lifecycle::LifecycleDriver;
use crate::properties::MotionProperties;
use crate::registry::MotionValues;
use crate::transitions::MotionTransitions;
use crate::variant::{VariantRef, Variants};
use glide_animation::SchedulerHandle;
use glide_core::{Completion, Observable, Result};
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// Which behaviours [`use_motion`] wires up
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MotionOptions {
    /// Set `initial` and play `enter` on mount, `leave` on unmount
    pub life_cycle_hooks: bool,
    /// Apply the selected variant whenever the selector changes
    pub sync_variants: bool,
    /// Follow the visibility signal with `visible`/`visibleOnce`
    pub visibility_hooks: bool,
    /// Overlay `hovered`/`tapped`/`focused` on interaction
    pub event_listeners: bool,
    /// Fold translations into `translate3d()`
    pub hardware_acceleration: bool,
}

impl Default for MotionOptions {
    fn default() -> Self {
        Self {
            life_cycle_hooks: true,
            sync_variants: true,
            visibility_hooks: true,
            event_listeners: true,
            hardware_acceleration: true,
        }
    }
}

/// A subject with motion attached
#[derive(Clone, Debug)]
pub struct MotionInstance {
    variant: Observable<String>,
    controls: MotionControls,
    binding: ElementBinding,
    driver: LifecycleDriver,
}

/// Attach motion to a subject
///
/// With an element, the driver mounts right away; otherwise call
/// [`LifecycleDriver::mount`] once the element exists.
pub fn use_motion(
    scheduler: &SchedulerHandle,
    element: Option<Box<dyn ElementSink>>,
    variants: Variants,
    options: MotionOptions,
) -> MotionInstance {
    let properties = MotionProperties::new();
    let values = MotionValues::new(scheduler.clone());
    let controls = MotionControls::new(
        MotionTransitions::new(values, properties.clone()),
        Rc::new(variants),
    );
    let binding = ElementBinding::new(properties, scheduler.clone(), options.hardware_acceleration);
    let variant = Observable::new(String::new());
    let driver = LifecycleDriver::new(controls.clone(), binding.clone(), variant.clone(), options);

    if element.is_some() {
        driver.mount(element);
    }

    MotionInstance {
        variant,
        controls,
        binding,
        driver,
    }
}

impl MotionInstance {
    /// The selected variant name
    pub fn variant(&self) -> &Observable<String> {
        &self.variant
    }

    pub fn is_animating(&self) -> Observable<bool> {
        self.controls.is_animating()
    }

    pub fn apply(&self, variant: impl Into<VariantRef>) -> Result<Completion> {
        self.controls.apply(variant)
    }

    pub fn apply_with(
        &self,
        variant: impl Into<VariantRef>,
        on_complete: impl FnOnce() + 'static,
    ) -> Result<Completion> {
        self.controls.apply_with(variant, on_complete)
    }

    pub fn set(&self, variant: impl Into<VariantRef>) -> Result<Completion> {
        self.controls.set(variant)
    }

    pub fn stop<'a>(&self, keys: impl IntoIterator<Item = &'a str>) {
        self.controls.stop(keys);
    }

    pub fn stop_all(&self) {
        self.controls.stop_all();
    }

    pub fn leave(&self, done: impl FnOnce() + 'static) {
        self.controls.leave(done);
    }

    pub fn controls(&self) -> &MotionControls {
        &self.controls
    }

    pub fn driver(&self) -> &LifecycleDriver {
        &self.driver
    }

    pub fn binding(&self) -> &ElementBinding {
        &self.binding
    }

    pub fn properties(&self) -> &MotionProperties {
        self.binding.properties()
    }

    pub fn values(&self) -> &MotionValues {
        self.controls.transitions().values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::Variant;
    use glide_animation::FrameScheduler;
    use glide_core::Value;

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: MotionOptions = serde_json::from_str(r#"{"eventListeners": false}"#).unwrap();
        assert!(!options.event_listeners);
        assert!(options.life_cycle_hooks && options.sync_variants && options.visibility_hooks);
    }

    #[test]
    fn test_selector_applies_variant() {
        let scheduler = FrameScheduler::new();
        let mut variants = Variants::new();
        variants.insert("open".into(), Variant::new().with("zIndex", 10.0));
        let motion = use_motion(&scheduler.handle(), None, variants, MotionOptions::default());

        motion.variant().set("open".to_string());
        assert_eq!(motion.properties().get("zIndex"), Some(Value::Number(10.0)));
    }

    #[test]
    fn test_selector_without_sync_does_nothing() {
        let scheduler = FrameScheduler::new();
        let mut variants = Variants::new();
        variants.insert("open".into(), Variant::new().with("zIndex", 10.0));
        let options = MotionOptions {
            sync_variants: false,
            ..MotionOptions::default()
        };
        let motion = use_motion(&scheduler.handle(), None, variants, options);

        motion.variant().set("open".to_string());
        assert!(motion.properties().is_empty());
        motion.apply("open").unwrap();
        assert_eq!(motion.properties().get("zIndex"), Some(Value::Number(10.0)));
    }
}
