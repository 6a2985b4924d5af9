//! Observable cells with explicit subscriptions
//!
//! Every dependency edge is a registration that returns a [`Subscription`].
//! Nothing is tracked implicitly: a subscriber runs synchronously, after the
//! cell's borrow is released, each time the value is published.
//!
//! ```ignore
//! let variant = Observable::new(String::from("initial"));
//! let sub = variant.subscribe(|name| println!("now {name}"));
//! variant.set("enter".into());
//! sub.unsubscribe();
//! ```

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

new_key_type! {
    /// Unique identifier for a subscriber
    pub struct SubscriberId;
}

type Subscriber<T> = Rc<dyn Fn(&T)>;

struct ObservableInner<T> {
    value: T,
    /// Bumped on every publish
    version: u64,
    subscribers: SlotMap<SubscriberId, Subscriber<T>>,
}

/// A shared, observable value (cheap to clone)
pub struct Observable<T> {
    inner: Rc<RefCell<ObservableInner<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("value", &self.inner.borrow().value)
            .finish()
    }
}

impl<T: Default + Clone + 'static> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + 'static> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ObservableInner {
                value,
                version: 0,
                subscribers: SlotMap::with_key(),
            })),
        }
    }

    /// Current value
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Borrow the current value
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Replace the value and notify subscribers
    pub fn set(&self, value: T) {
        self.inner.borrow_mut().value = value;
        self.publish();
    }

    /// Mutate the value in place and notify subscribers
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        f(&mut self.inner.borrow_mut().value);
        self.publish();
    }

    /// Number of publishes so far
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    /// Register a subscriber; it runs on every subsequent publish
    pub fn subscribe<F>(&self, f: F) -> Subscription
    where
        F: Fn(&T) + 'static,
    {
        let id = self.inner.borrow_mut().subscribers.insert(Rc::new(f));
        let weak: Weak<RefCell<ObservableInner<T>>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().subscribers.remove(id);
            }
        })
    }

    /// Drop every subscriber
    pub fn clear_subscribers(&self) {
        self.inner.borrow_mut().subscribers.clear();
    }

    fn publish(&self) {
        // Snapshot before calling out so subscribers may read or write the cell
        let (value, subscribers) = {
            let mut inner = self.inner.borrow_mut();
            inner.version += 1;
            let subs: SmallVec<[Subscriber<T>; 4]> =
                inner.subscribers.values().cloned().collect();
            (inner.value.clone(), subs)
        };
        for sub in subscribers {
            sub(&value);
        }
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    /// Replace the value, notifying only if it differs
    ///
    /// Returns `true` when subscribers were notified.
    pub fn set_if_changed(&self, value: T) -> bool {
        if self.inner.borrow().value == value {
            return false;
        }
        self.set(value);
        true
    }
}

/// Teardown handle for one dependency edge
///
/// Dropping the handle leaves the subscription in place; call
/// [`Subscription::unsubscribe`] to remove it.
#[must_use = "keep the subscription to be able to unsubscribe"]
pub struct Subscription {
    teardown: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(teardown: impl FnOnce() + 'static) -> Self {
        Self {
            teardown: Some(Box::new(teardown)),
        }
    }

    /// A subscription with nothing to tear down
    pub fn empty() -> Self {
        Self { teardown: None }
    }

    pub fn unsubscribe(mut self) {
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.teardown.is_some())
            .finish()
    }
}

/// A bag of subscriptions torn down together
#[derive(Default, Debug)]
pub struct Subscriptions {
    items: Vec<Subscription>,
}

impl Subscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sub: Subscription) {
        self.items.push(sub);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn unsubscribe_all(&mut self) {
        for sub in self.items.drain(..) {
            sub.unsubscribe();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_observable_get_set() {
        let count = Observable::new(0i32);
        assert_eq!(count.get(), 0);

        count.set(42);
        assert_eq!(count.get(), 42);
        assert_eq!(count.version(), 1);
    }

    #[test]
    fn test_subscriber_runs_on_publish() {
        let count = Observable::new(0i32);
        let seen = Rc::new(RefCell::new(Vec::new()));

        let seen_clone = seen.clone();
        let _sub = count.subscribe(move |v| seen_clone.borrow_mut().push(*v));

        count.set(1);
        count.update(|v| *v += 1);
        assert_eq!(*seen.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let count = Observable::new(0i32);
        let runs = Rc::new(Cell::new(0));

        let runs_clone = runs.clone();
        let sub = count.subscribe(move |_| runs_clone.set(runs_clone.get() + 1));
        count.set(1);
        assert_eq!(runs.get(), 1);

        sub.unsubscribe();
        count.set(2);
        assert_eq!(runs.get(), 1);
        assert_eq!(count.subscriber_count(), 0);
    }

    #[test]
    fn test_set_if_changed() {
        let flag = Observable::new(false);
        let runs = Rc::new(Cell::new(0));

        let runs_clone = runs.clone();
        let _sub = flag.subscribe(move |_| runs_clone.set(runs_clone.get() + 1));

        assert!(!flag.set_if_changed(false));
        assert!(flag.set_if_changed(true));
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn test_subscriber_may_write_back() {
        let source = Observable::new(1i32);
        let mirror = Observable::new(0i32);

        let mirror_clone = mirror.clone();
        let _sub = source.subscribe(move |v| mirror_clone.set(*v * 10));

        source.set(3);
        assert_eq!(mirror.get(), 30);
    }

    #[test]
    fn test_subscriptions_bag() {
        let a = Observable::new(0);
        let b = Observable::new(0);
        let mut subs = Subscriptions::new();
        subs.push(a.subscribe(|_| {}));
        subs.push(b.subscribe(|_| {}));
        assert_eq!(subs.len(), 2);

        subs.unsubscribe_all();
        assert!(subs.is_empty());
        assert_eq!(a.subscriber_count(), 0);
        assert_eq!(b.subscriber_count(), 0);
    }
}
