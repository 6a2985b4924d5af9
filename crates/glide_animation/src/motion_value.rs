//! Animatable property values
//!
//! A [`MotionValue`] holds the live value of one animated property. It
//! tracks the previous value and frame timing so it can report velocity,
//! publishes every change to subscribers, and owns at most one running
//! animation: starting another cancels the first without completing it.

use crate::animate::Controls;
use crate::scheduler::{FrameData, SchedulerHandle};
use glide_core::{Completion, Observable, Subscription, Value};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Callback an animation factory calls when its animation finishes
pub type CompleteFn = Box<dyn FnOnce()>;

struct Tracking {
    prev: Value,
    last_updated: f64,
    time_delta: f64,
    can_track_velocity: bool,
    controls: Option<Controls>,
    /// Bumped on every start/stop; completions from older generations are ignored
    generation: u64,
    velocity_check_pending: bool,
    destroyed: bool,
}

/// The live value of one animated property
///
/// Cloning yields another handle to the same value.
#[derive(Clone)]
pub struct MotionValue {
    value: Observable<Value>,
    animating: Observable<bool>,
    tracking: Rc<RefCell<Tracking>>,
    scheduler: SchedulerHandle,
}

impl MotionValue {
    pub fn new(scheduler: SchedulerHandle, initial: impl Into<Value>) -> Self {
        let initial = initial.into();
        let tracking = Tracking {
            prev: initial.clone(),
            last_updated: scheduler.timestamp(),
            time_delta: 0.0,
            can_track_velocity: initial.as_number().is_some(),
            controls: None,
            generation: 0,
            velocity_check_pending: false,
            destroyed: false,
        };
        Self {
            value: Observable::new(initial),
            animating: Observable::new(false),
            tracking: Rc::new(RefCell::new(tracking)),
            scheduler,
        }
    }

    pub fn get(&self) -> Value {
        self.value.get()
    }

    /// Scheduler this value's animations and velocity checks run on
    pub fn scheduler(&self) -> &SchedulerHandle {
        &self.scheduler
    }

    pub fn previous(&self) -> Value {
        self.tracking.borrow().prev.clone()
    }

    /// Set the value and notify subscribers synchronously
    pub fn set(&self, value: impl Into<Value>) {
        let value = value.into();
        let timestamp = self.scheduler.timestamp();
        {
            let mut tracking = self.tracking.borrow_mut();
            if tracking.last_updated != timestamp {
                tracking.prev = self.value.get();
                tracking.time_delta = timestamp - tracking.last_updated;
                tracking.last_updated = timestamp;
            }
            if value.as_number().is_some() {
                tracking.can_track_velocity = true;
            }
        }

        self.value.set(value);
        self.schedule_velocity_check();
    }

    fn schedule_velocity_check(&self) {
        {
            let mut tracking = self.tracking.borrow_mut();
            if tracking.velocity_check_pending {
                return;
            }
            tracking.velocity_check_pending = true;
        }
        let weak = Rc::downgrade(&self.tracking);
        let value = self.value.clone();
        let scheduler = self.scheduler.clone();
        self.scheduler
            .on_post_render(move |frame| velocity_check(weak, value, scheduler, frame, false));
    }

    /// Units per second; 0 for non-numeric values or before any measurable frame gap
    pub fn velocity(&self) -> f64 {
        let tracking = self.tracking.borrow();
        if !tracking.can_track_velocity || tracking.time_delta <= 0.0 {
            return 0.0;
        }
        match (self.value.with(Value::as_number), tracking.prev.as_number()) {
            (Some(current), Some(prev)) => (current - prev) / tracking.time_delta * 1000.0,
            _ => 0.0,
        }
    }

    /// Run `f` on every change
    pub fn subscribe(&self, f: impl Fn(&Value) + 'static) -> Subscription {
        self.value.subscribe(f)
    }

    /// Run `f` whenever an animation starts or stops running
    pub fn on_animating_change(&self, f: impl Fn(&bool) + 'static) -> Subscription {
        self.animating.subscribe(f)
    }

    pub fn is_animating(&self) -> bool {
        self.tracking.borrow().controls.is_some()
    }

    pub fn is_destroyed(&self) -> bool {
        self.tracking.borrow().destroyed
    }

    /// Start an animation
    ///
    /// Any running animation is stopped first (its completion never
    /// settles). `factory` receives the completion callback and returns the
    /// controls of the animation it started; it may call the callback before
    /// returning. The returned [`Completion`] settles when this animation,
    /// and not a later one, finishes.
    pub fn start(&self, factory: impl FnOnce(CompleteFn) -> Controls) -> Completion {
        // Retargeting keeps the animating flag up: the replaced animation is
        // stopped without publishing `false`
        let (generation, replaced) = {
            let mut tracking = self.tracking.borrow_mut();
            tracking.generation += 1;
            (tracking.generation, tracking.controls.take())
        };
        let was_animating = replaced.is_some();
        if let Some(replaced) = replaced {
            replaced.stop();
        }

        let completion = Completion::pending();
        let done: CompleteFn = {
            let weak = Rc::downgrade(&self.tracking);
            let animating = self.animating.clone();
            let completion = completion.clone();
            Box::new(move || {
                if let Some(tracking) = weak.upgrade() {
                    let finished = {
                        let mut tracking = tracking.borrow_mut();
                        if tracking.generation != generation {
                            return;
                        }
                        tracking.controls.take()
                    };
                    if finished.is_some() {
                        animating.set_if_changed(false);
                    }
                }
                completion.settle();
            })
        };

        let controls = factory(done);

        let install = {
            let tracking = self.tracking.borrow();
            !completion.is_settled() && tracking.generation == generation && !tracking.destroyed
        };
        if install {
            self.tracking.borrow_mut().controls = Some(controls);
            self.animating.set_if_changed(true);
        } else if was_animating {
            self.animating.set_if_changed(false);
        }
        completion
    }

    /// Stop the running animation, if any, without completing it
    pub fn stop(&self) {
        let controls = {
            let mut tracking = self.tracking.borrow_mut();
            tracking.generation += 1;
            tracking.controls.take()
        };
        if let Some(controls) = controls {
            controls.stop();
            self.animating.set_if_changed(false);
        }
    }

    /// Stop and drop every subscriber; later calls do nothing
    pub fn destroy(&self) {
        if self.is_destroyed() {
            tracing::trace!("motion value already destroyed");
            return;
        }
        self.stop();
        self.value.clear_subscribers();
        self.animating.clear_subscribers();
        self.tracking.borrow_mut().destroyed = true;
    }
}

/// Post-render bookkeeping after a set
///
/// Once a newer frame than the last set has started, the value is at rest
/// and previous catches up with current. If the check runs in the same
/// frame as the set, it looks again one frame later.
fn velocity_check(
    weak: Weak<RefCell<Tracking>>,
    value: Observable<Value>,
    scheduler: SchedulerHandle,
    frame: &FrameData,
    rescheduled: bool,
) {
    let Some(tracking) = weak.upgrade() else {
        return;
    };
    let mut state = tracking.borrow_mut();
    if !state.can_track_velocity {
        state.can_track_velocity = value.with(Value::as_number).is_some();
    }

    if frame.timestamp != state.last_updated {
        state.prev = value.get();
        state.velocity_check_pending = false;
    } else if !rescheduled {
        let s = scheduler.clone();
        scheduler.on_post_render(move |frame| velocity_check(weak, value, s, frame, true));
    } else {
        state.velocity_check_pending = false;
    }
}

impl fmt::Debug for MotionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MotionValue")
            .field("value", &self.get())
            .field("animating", &self.is_animating())
            .finish()
    }
}
