//! Per-subject motion values
//!
//! [`MotionValues`] holds one [`MotionValue`] per animated property of a
//! subject. Values are created lazily from the property bag, mirror every
//! change back into it, and feed an aggregated "is animating" flag.

use crate::properties::MotionProperties;
use glide_animation::{MotionValue, SchedulerHandle};
use glide_core::{Observable, Subscription, Subscriptions, Value};
use indexmap::IndexMap;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

struct Entry {
    value: MotionValue,
    subscriptions: Subscriptions,
}

struct Inner {
    scheduler: SchedulerHandle,
    entries: RefCell<IndexMap<String, Entry>>,
    animating_count: Cell<usize>,
    is_animating: Observable<bool>,
}

/// Registry of motion values for one subject (cheap to clone, shared)
#[derive(Clone)]
pub struct MotionValues {
    inner: Rc<Inner>,
}

impl MotionValues {
    pub fn new(scheduler: SchedulerHandle) -> Self {
        Self {
            inner: Rc::new(Inner {
                scheduler,
                entries: RefCell::new(IndexMap::new()),
                animating_count: Cell::new(0),
                is_animating: Observable::new(false),
            }),
        }
    }

    pub fn scheduler(&self) -> &SchedulerHandle {
        &self.inner.scheduler
    }

    pub fn get(&self, key: &str) -> Option<MotionValue> {
        self.inner
            .entries
            .borrow()
            .get(key)
            .map(|entry| entry.value.clone())
    }

    /// The value for `key`, created from the bag's current entry if missing
    ///
    /// A property the bag doesn't hold starts out empty, which the engine
    /// treats as non-animatable (the first transition sets it directly).
    pub fn get_or_create(&self, key: &str, properties: &MotionProperties) -> MotionValue {
        if let Some(value) = self.get(key) {
            return value;
        }

        let initial = properties
            .get(key)
            .unwrap_or_else(|| Value::Text(String::new()));
        let value = MotionValue::new(self.inner.scheduler.clone(), initial);

        let mut subscriptions = Subscriptions::new();
        subscriptions.push({
            let properties = properties.clone();
            let key = key.to_string();
            value.subscribe(move |v| properties.set(key.clone(), v.clone()))
        });
        subscriptions.push(self.track_animating(&value));

        tracing::trace!(key, "motion value created");
        self.inner.entries.borrow_mut().insert(
            key.to_string(),
            Entry {
                value: value.clone(),
                subscriptions,
            },
        );
        value
    }

    fn track_animating(&self, value: &MotionValue) -> Subscription {
        let weak = Rc::downgrade(&self.inner);
        value.on_animating_change(move |animating| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let count = inner.animating_count.get();
            let count = if *animating {
                count + 1
            } else {
                count.saturating_sub(1)
            };
            inner.animating_count.set(count);
            inner.is_animating.set_if_changed(count > 0);
        })
    }

    /// Destroy and forget one value
    pub fn remove(&self, key: &str) {
        let entry = self.inner.entries.borrow_mut().shift_remove(key);
        if let Some(mut entry) = entry {
            entry.value.destroy();
            entry.subscriptions.unsubscribe_all();
        }
    }

    /// Stop the animations of `keys` without completing them
    pub fn stop<'a>(&self, keys: impl IntoIterator<Item = &'a str>) {
        for key in keys {
            if let Some(value) = self.get(key) {
                value.stop();
            }
        }
    }

    pub fn stop_all(&self) {
        for value in self.values() {
            value.stop();
        }
    }

    /// Destroy every value
    pub fn destroy(&self) {
        let entries = std::mem::take(&mut *self.inner.entries.borrow_mut());
        tracing::trace!(count = entries.len(), "destroying motion values");
        for (_, mut entry) in entries {
            entry.value.destroy();
            entry.subscriptions.unsubscribe_all();
        }
    }

    pub fn keys(&self) -> Vec<String> {
        self.inner.entries.borrow().keys().cloned().collect()
    }

    fn values(&self) -> Vec<MotionValue> {
        self.inner
            .entries
            .borrow()
            .values()
            .map(|entry| entry.value.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True while any value has a running animation
    pub fn is_animating(&self) -> Observable<bool> {
        self.inner.is_animating.clone()
    }
}

impl fmt::Debug for MotionValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MotionValues")
            .field("keys", &self.keys())
            .field("animating", &self.inner.is_animating.get())
            .finish()
    }
}
