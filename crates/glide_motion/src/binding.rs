//! Element binding
//!
//! An [`ElementBinding`] keeps an element's inline style in step with a
//! subject's property bag. On bind it imports the styles the element
//! already has (including its transform), then writes the projected
//! declarations back on the scheduler's render phase, at most once per
//! frame.

use crate::properties::MotionProperties;
use crate::style::{camel_case, MotionStyle};
use crate::transform::{is_origin_key, is_transform_key, parse_transform, state_from_transform};
use crate::value_types::value_type;
use glide_animation::SchedulerHandle;
use glide_core::{Subscription, Value};
use indexmap::IndexMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Inline style access to a host element
///
/// Names are CSS property names (`background-color`, `transform`).
pub trait ElementSink {
    /// Every inline declaration currently on the element
    fn inline_style(&self) -> Vec<(String, String)>;

    fn set_style(&mut self, name: &str, value: &str);

    fn remove_style(&mut self, name: &str);
}

#[derive(Default)]
struct BindingState {
    element: Option<Box<dyn ElementSink>>,
    /// Declarations as last written to the element
    written: IndexMap<String, String>,
    render_scheduled: bool,
    subscription: Option<Subscription>,
}

struct Inner {
    properties: MotionProperties,
    scheduler: SchedulerHandle,
    hardware_acceleration: bool,
    state: RefCell<BindingState>,
}

/// Two-way sync between an element's inline style and a property bag
#[derive(Clone)]
pub struct ElementBinding {
    inner: Rc<Inner>,
}

impl ElementBinding {
    pub fn new(
        properties: MotionProperties,
        scheduler: SchedulerHandle,
        hardware_acceleration: bool,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                properties,
                scheduler,
                hardware_acceleration,
                state: RefCell::new(BindingState::default()),
            }),
        }
    }

    pub fn is_bound(&self) -> bool {
        self.inner.state.borrow().element.is_some()
    }

    pub fn properties(&self) -> &MotionProperties {
        &self.inner.properties
    }

    pub fn bind(&self, element: Box<dyn ElementSink>) {
        self.bind_with(element, |_| {});
    }

    /// Associate the element, import its styles and write the bag to it
    ///
    /// Values already in the bag take precedence over imported ones. `init`
    /// runs once everything has been written.
    pub fn bind_with(&self, element: Box<dyn ElementSink>, init: impl FnOnce(&MotionProperties)) {
        if self.is_bound() {
            self.unbind();
        }

        let imported = import_styles(&element.inline_style());
        let properties = &self.inner.properties;
        let fresh: Vec<(String, Value)> = imported
            .into_iter()
            .filter(|(key, _)| !properties.contains(key))
            .collect();
        tracing::debug!(imported = fresh.len(), "bind element");

        self.inner.state.borrow_mut().element = Some(element);
        properties.extend(fresh);
        self.flush();

        let weak = Rc::downgrade(&self.inner);
        let subscription = properties.subscribe(move |_| {
            if let Some(inner) = weak.upgrade() {
                ElementBinding { inner }.schedule_render();
            }
        });
        self.inner.state.borrow_mut().subscription = Some(subscription);

        init(properties);
    }

    fn schedule_render(&self) {
        {
            let mut state = self.inner.state.borrow_mut();
            if state.render_scheduled || state.element.is_none() {
                return;
            }
            state.render_scheduled = true;
        }
        let weak = Rc::downgrade(&self.inner);
        self.inner.scheduler.on_render(move |_| {
            if let Some(inner) = weak.upgrade() {
                inner.state.borrow_mut().render_scheduled = false;
                ElementBinding { inner }.flush();
            }
        });
    }

    /// Write the bag to the element now
    ///
    /// Only declarations that changed since the last write are touched;
    /// declarations that disappeared are removed.
    pub fn flush(&self) {
        let snapshot = self.inner.properties.snapshot();
        let declarations =
            MotionStyle::from_properties(&snapshot, self.inner.hardware_acceleration)
                .into_declarations();

        let mut state = self.inner.state.borrow_mut();
        let BindingState {
            element, written, ..
        } = &mut *state;
        let Some(element) = element.as_mut() else {
            return;
        };

        for (name, value) in &declarations {
            if written.get(name) != Some(value) {
                element.set_style(name, value);
            }
        }
        for name in written.keys() {
            if !declarations.contains_key(name) {
                element.remove_style(name);
            }
        }
        tracing::trace!(declarations = declarations.len(), "element write");
        *written = declarations;
    }

    /// Detach from the element, returning it
    pub fn unbind(&self) -> Option<Box<dyn ElementSink>> {
        let mut state = self.inner.state.borrow_mut();
        if let Some(subscription) = state.subscription.take() {
            subscription.unsubscribe();
        }
        state.written.clear();
        state.render_scheduled = false;
        state.element.take()
    }
}

/// Property values from an element's inline declarations
///
/// Only properties with a known value type are imported; the inline
/// transform is parsed into its individual transform properties.
pub fn import_styles(declarations: &[(String, String)]) -> IndexMap<String, Value> {
    let mut imported = IndexMap::new();
    let mut transform = None;

    for (name, css) in declarations {
        let key = camel_case(name);
        if key == "transform" {
            transform = Some(css.as_str());
            continue;
        }
        if is_transform_key(&key) || is_origin_key(&key) {
            continue;
        }
        if let Some(kind) = value_type(&key) {
            imported.insert(key, kind.parse(css));
        }
    }

    if let Some(css) = transform.filter(|css| !css.trim().is_empty() && css.trim() != "none") {
        match parse_transform(css) {
            Ok(functions) => imported.extend(state_from_transform(&functions)),
            Err(error) => tracing::warn!(%error, "ignoring inline transform"),
        }
    }
    imported
}

impl fmt::Debug for ElementBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("ElementBinding")
            .field("bound", &state.element.is_some())
            .field("written", &state.written)
            .finish()
    }
}
