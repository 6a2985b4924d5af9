//! The property bag
//!
//! [`MotionProperties`] is the observable ordered map of every property a
//! subject currently shows. Motion values write into it; element import
//! merges into it; the binding projects it onto the element.

use glide_core::{Observable, Subscription, Value};
use indexmap::IndexMap;

pub type PropertyMap = IndexMap<String, Value>;

/// Observable map property → value (cheap to clone, shared)
#[derive(Clone, Debug, Default)]
pub struct MotionProperties {
    inner: Observable<PropertyMap>,
}

impl MotionProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(map: PropertyMap) -> Self {
        Self {
            inner: Observable::new(map),
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner.with(|map| map.get(key).cloned())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.with(|map| map.contains_key(key))
    }

    /// Write one property; subscribers are notified only on change
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        if self.inner.with(|map| map.get(&key) == Some(&value)) {
            return;
        }
        self.inner.update(|map| {
            map.insert(key, value);
        });
    }

    /// Merge many properties with a single notification
    pub fn extend(&self, entries: impl IntoIterator<Item = (String, Value)>) {
        let entries: Vec<_> = entries.into_iter().collect();
        if entries.is_empty() {
            return;
        }
        self.inner.update(|map| map.extend(entries));
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        if !self.contains(key) {
            return None;
        }
        let mut removed = None;
        self.inner.update(|map| removed = map.shift_remove(key));
        removed
    }

    pub fn snapshot(&self) -> PropertyMap {
        self.inner.get()
    }

    pub fn keys(&self) -> Vec<String> {
        self.inner.with(|map| map.keys().cloned().collect())
    }

    pub fn len(&self) -> usize {
        self.inner.with(IndexMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run `f` with the whole map after every change
    pub fn subscribe(&self, f: impl Fn(&PropertyMap) + 'static) -> Subscription {
        self.inner.subscribe(f)
    }

    /// Bumped on every change
    pub fn version(&self) -> u64 {
        self.inner.version()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_set_notifies_on_change_only() {
        let props = MotionProperties::new();
        let calls = Rc::new(Cell::new(0));
        let c = calls.clone();
        let _sub = props.subscribe(move |_| c.set(c.get() + 1));

        props.set("x", 10.0);
        props.set("x", 10.0);
        props.set("y", "5px");
        assert_eq!(calls.get(), 2);
        assert_eq!(props.keys(), ["x", "y"]);
    }

    #[test]
    fn test_extend_and_remove() {
        let props = MotionProperties::new();
        props.extend([
            ("opacity".to_string(), Value::from(0.5)),
            ("x".to_string(), Value::from(1.0)),
        ]);
        assert_eq!(props.len(), 2);
        assert_eq!(props.remove("opacity"), Some(Value::Number(0.5)));
        assert_eq!(props.remove("opacity"), None);
        assert_eq!(props.keys(), ["x"]);
    }
}
