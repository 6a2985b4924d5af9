//! Per-property transition fan-out

use crate::engine::get_animation;
use crate::properties::MotionProperties;
use crate::registry::MotionValues;
use crate::transition::Transition;
use glide_animation::CompleteFn;
use glide_core::{Completion, Target};

/// Starts transitions on the motion values of one subject
#[derive(Clone, Debug)]
pub struct MotionTransitions {
    values: MotionValues,
    properties: MotionProperties,
}

impl MotionTransitions {
    pub fn new(values: MotionValues, properties: MotionProperties) -> Self {
        Self { values, properties }
    }

    /// Animate `key` towards `target`, cancelling any animation already
    /// running on it
    pub fn push(
        &self,
        key: &str,
        target: &Target,
        transition: &Transition,
        on_complete: Option<CompleteFn>,
    ) -> Completion {
        let value = self.values.get_or_create(key, &self.properties);
        let start = get_animation(key, &value, target, transition, on_complete);
        value.start(start)
    }

    pub fn stop<'a>(&self, keys: impl IntoIterator<Item = &'a str>) {
        self.values.stop(keys);
    }

    pub fn stop_all(&self) {
        self.values.stop_all();
    }

    pub fn values(&self) -> &MotionValues {
        &self.values
    }

    pub fn properties(&self) -> &MotionProperties {
        &self.properties
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glide_animation::FrameScheduler;
    use glide_core::Value;

    #[test]
    fn test_push_writes_into_bag() {
        let scheduler = FrameScheduler::new();
        let properties = MotionProperties::new();
        properties.set("x", 0.0);
        let transitions =
            MotionTransitions::new(MotionValues::new(scheduler.handle()), properties.clone());

        let done = transitions.push(
            "x",
            &Target::from(40.0),
            &Transition::tween(32.0, "linear"),
            None,
        );
        for t in [0.0, 16.0, 32.0, 48.0] {
            scheduler.frame(t);
        }
        assert!(done.is_settled());
        assert_eq!(properties.get("x"), Some(Value::Number(40.0)));
    }

    #[test]
    fn test_stop_leaves_completion_pending() {
        let scheduler = FrameScheduler::new();
        let properties = MotionProperties::new();
        properties.set("y", 0.0);
        let transitions =
            MotionTransitions::new(MotionValues::new(scheduler.handle()), properties);

        let done = transitions.push("y", &Target::from(10.0), &Transition::default(), None);
        scheduler.frame(0.0);
        transitions.stop(["y"]);
        for t in [16.0, 32.0, 1000.0] {
            scheduler.frame(t);
        }
        assert!(!done.is_settled());
        assert!(!transitions.values().is_animating().get());
    }
}
