//! Named motion instances
//!
//! A thread-local registry so a subject's motion can be reached by name
//! from elsewhere in the host. Registering a name that is taken stops the
//! previous instance first.

use crate::motion::MotionInstance;
use rustc_hash::FxHashMap;
use std::cell::RefCell;

thread_local! {
    static INSTANCES: RefCell<FxHashMap<String, MotionInstance>> = RefCell::new(FxHashMap::default());
}

/// Register `instance` under `name`, replacing (and stopping) any previous one
pub fn register_motion(name: impl Into<String>, instance: MotionInstance) {
    let name = name.into();
    let previous = INSTANCES.with(|instances| instances.borrow_mut().insert(name.clone(), instance));
    if let Some(previous) = previous {
        tracing::debug!(name, "replacing motion instance");
        previous.stop_all();
    }
}

pub fn motion(name: &str) -> Option<MotionInstance> {
    INSTANCES.with(|instances| instances.borrow().get(name).cloned())
}

pub fn unregister_motion(name: &str) -> Option<MotionInstance> {
    INSTANCES.with(|instances| instances.borrow_mut().remove(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::{use_motion, MotionOptions};
    use crate::transition::Transition;
    use crate::variant::{Variant, Variants};
    use glide_animation::FrameScheduler;

    #[test]
    fn test_register_replaces_and_stops_previous() {
        let scheduler = FrameScheduler::new();
        let first = use_motion(&scheduler.handle(), None, Variants::new(), MotionOptions::default());
        first.properties().set("x", 0.0);
        let pending = first
            .apply(Variant::new().with("x", 10.0).with_transition(Transition::spring(100.0, 10.0)))
            .unwrap();
        assert!(first.is_animating().get());

        register_motion("card", first.clone());
        let second = use_motion(&scheduler.handle(), None, Variants::new(), MotionOptions::default());
        register_motion("card", second);

        assert!(!first.is_animating().get());
        scheduler.frame(0.0);
        assert!(!pending.is_settled());
        assert!(motion("card").is_some_and(|m| !m.properties().contains("x")));

        assert!(unregister_motion("card").is_some());
        assert!(motion("card").is_none());
    }
}
