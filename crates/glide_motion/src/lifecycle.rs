//! Lifecycle driver
//!
//! Sequences a subject's variants over its life: `initial` is set when the
//! element mounts, `enter` animates in, `visible`/`visibleOnce` follow a
//! visibility signal, hover/press/focus overlay their variants, and
//! unmounting plays `leave` before the motion values are torn down.
//!
//! The host forwards events as plain method calls.

use crate::binding::{ElementBinding, ElementSink};
use crate::controls::MotionControls;
use crate::motion::MotionOptions;
use crate::variant::{names, Variant, VariantRef};
use glide_core::{Observable, Subscription, Value};
use indexmap::IndexMap;
use smallvec::SmallVec;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LifecycleState {
    #[default]
    Unmounted,
    Initial,
    Enter,
    Visible,
    Leave,
    Disposed,
}

/// Input devices that can produce a press
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputModality {
    Pointer,
    Touch,
    Mouse,
}

const ALL_MODALITIES: [InputModality; 3] =
    [InputModality::Pointer, InputModality::Touch, InputModality::Mouse];

struct DriverState {
    lifecycle: LifecycleState,
    hovered: bool,
    tapped: bool,
    focused: bool,
    /// The press modality in use; the first one the host supports
    press_modality: Option<InputModality>,
    shown_once: bool,
    /// Bag values of overlay-only keys before the first interaction
    rest: IndexMap<String, Value>,
    selector: Option<Subscription>,
}

struct Inner {
    controls: MotionControls,
    binding: ElementBinding,
    options: MotionOptions,
    variant: Observable<String>,
    state: RefCell<DriverState>,
}

/// Drives a subject's variants from mount, visibility, interaction and
/// unmount signals
#[derive(Clone)]
pub struct LifecycleDriver {
    inner: Rc<Inner>,
}

impl LifecycleDriver {
    pub fn new(
        controls: MotionControls,
        binding: ElementBinding,
        variant: Observable<String>,
        options: MotionOptions,
    ) -> Self {
        let driver = Self {
            inner: Rc::new(Inner {
                controls,
                binding,
                options,
                variant,
                state: RefCell::new(DriverState {
                    lifecycle: LifecycleState::Unmounted,
                    hovered: false,
                    tapped: false,
                    focused: false,
                    press_modality: ALL_MODALITIES.first().copied(),
                    shown_once: false,
                    rest: IndexMap::new(),
                    selector: None,
                }),
            }),
        };

        if driver.inner.options.sync_variants {
            let weak = Rc::downgrade(&driver.inner);
            let selector = driver.inner.variant.subscribe(move |_| {
                if let Some(inner) = weak.upgrade() {
                    LifecycleDriver { inner }.sync();
                }
            });
            driver.inner.state.borrow_mut().selector = Some(selector);
        }
        driver
    }

    /// Restrict presses to the first modality in `supported`
    pub fn with_supported_modalities(self, supported: &[InputModality]) -> Self {
        self.inner.state.borrow_mut().press_modality =
            ALL_MODALITIES.into_iter().find(|m| supported.contains(m));
        self
    }

    pub fn state(&self) -> LifecycleState {
        self.inner.state.borrow().lifecycle
    }

    pub fn is_disposed(&self) -> bool {
        self.state() == LifecycleState::Disposed
    }

    pub fn controls(&self) -> &MotionControls {
        &self.inner.controls
    }

    fn has_variant(&self, name: &str) -> bool {
        self.inner.controls.variants().contains_key(name)
    }

    fn transition(&self, to: LifecycleState) {
        let mut state = self.inner.state.borrow_mut();
        if state.lifecycle != to {
            tracing::debug!(from = ?state.lifecycle, ?to, "lifecycle");
            state.lifecycle = to;
        }
    }

    fn disposed(&self, operation: &str) -> bool {
        let disposed = self.is_disposed();
        if disposed {
            tracing::trace!(operation, "ignored after dispose");
        }
        disposed
    }

    /// Select a variant by name; with synced variants this applies it
    pub fn select(&self, name: &str) {
        if self.disposed("select") {
            return;
        }
        self.inner.variant.set(name.to_string());
    }

    /// Attach to an element (if any) and run the entry sequence
    pub fn mount(&self, element: Option<Box<dyn ElementSink>>) {
        if self.disposed("mount") {
            return;
        }
        if let Some(element) = element {
            self.inner.binding.bind(element);
        }
        if !self.inner.options.life_cycle_hooks {
            return;
        }

        if self.has_variant(names::INITIAL) {
            if let Err(error) = self.inner.controls.set(names::INITIAL) {
                tracing::warn!(%error, "initial variant");
            }
            // Show the initial state before the first frame
            self.inner.binding.flush();
            self.transition(LifecycleState::Initial);
        }
        if self.has_variant(names::ENTER) {
            self.transition(LifecycleState::Enter);
            self.select(names::ENTER);
        }
    }

    /// Visibility signal from the host (intersection observation)
    pub fn visibility(&self, is_visible: bool) {
        if self.disposed("visibility") || !self.inner.options.visibility_hooks {
            return;
        }

        if self.has_variant(names::VISIBLE) {
            if is_visible {
                self.transition(LifecycleState::Visible);
                self.select(names::VISIBLE);
            } else {
                self.transition(LifecycleState::Initial);
                self.select(names::INITIAL);
            }
        } else if self.has_variant(names::VISIBLE_ONCE) && is_visible {
            let first = {
                let mut state = self.inner.state.borrow_mut();
                !std::mem::replace(&mut state.shown_once, true)
            };
            if first {
                self.transition(LifecycleState::Visible);
                self.select(names::VISIBLE_ONCE);
            }
        }
    }

    pub fn pointer_enter(&self) {
        self.interaction("pointer_enter", |state| state.hovered = true);
    }

    pub fn pointer_leave(&self) {
        self.interaction("pointer_leave", |state| {
            state.hovered = false;
            state.tapped = false;
        });
    }

    /// Press start; only the first supported modality is listened to
    pub fn press_start(&self, modality: InputModality) {
        if self.inner.state.borrow().press_modality != Some(modality) {
            return;
        }
        self.interaction("press_start", |state| state.tapped = true);
    }

    pub fn press_end(&self, modality: InputModality) {
        if self.inner.state.borrow().press_modality != Some(modality) {
            return;
        }
        self.interaction("press_end", |state| state.tapped = false);
    }

    pub fn focus(&self) {
        self.interaction("focus", |state| state.focused = true);
    }

    pub fn blur(&self) {
        self.interaction("blur", |state| state.focused = false);
    }

    fn interaction(&self, operation: &str, change: impl FnOnce(&mut DriverState)) {
        if self.disposed(operation) || !self.inner.options.event_listeners {
            return;
        }
        if self.leaving(operation) {
            return;
        }
        let changed = {
            let mut state = self.inner.state.borrow_mut();
            let before = (state.hovered, state.tapped, state.focused);
            change(&mut state);
            before != (state.hovered, state.tapped, state.focused)
        };
        if changed {
            tracing::trace!(operation, "interaction");
            self.capture_rest();
            self.sync_overlay();
        }
    }

    fn overlay_variants(&self) -> SmallVec<[(&'static str, bool); 3]> {
        let state = self.inner.state.borrow();
        [
            (names::HOVERED, state.hovered),
            (names::TAPPED, state.tapped),
            (names::FOCUSED, state.focused),
        ]
        .into_iter()
        .filter(|(name, _)| self.has_variant(name))
        .collect()
    }

    /// Remember bag values of overlay keys the current variant won't restore
    fn capture_rest(&self) {
        let variants = self.inner.controls.variants();
        let current = variants.get(&self.inner.variant.get());
        let properties = self.inner.controls.transitions().properties();
        let overlays = self.overlay_variants();
        let mut state = self.inner.state.borrow_mut();

        for (name, _) in overlays {
            for key in variants[name].keys() {
                let restored = current.is_some_and(|v| v.values.contains_key(key));
                if restored || state.rest.contains_key(key) {
                    continue;
                }
                if let Some(value) = properties.get(key) {
                    state.rest.insert(key.to_string(), value);
                }
            }
        }
    }

    /// Lay the active interaction variants over `base`
    fn lay_active(&self, base: &mut Variant, overlays: &[(&'static str, bool)]) {
        let variants = self.inner.controls.variants();
        for (name, _) in overlays.iter().filter(|(_, active)| *active) {
            let overlay = &variants[*name];
            base.values
                .extend(overlay.values.iter().map(|(k, t)| (k.clone(), t.clone())));
            if overlay.transition.is_some() {
                base.transition = overlay.transition.clone();
            }
        }
    }

    /// The interaction overlay
    ///
    /// Holds exactly the keys declared by the hovered/tapped/focused
    /// variants. Each key takes its value from the active interaction
    /// variants, else the current variant, else its captured rest value.
    fn overlay(&self) -> Option<Variant> {
        let variants = self.inner.controls.variants();
        let current = variants.get(&self.inner.variant.get());
        let overlays = self.overlay_variants();

        let mut result = Variant {
            transition: current.and_then(|v| v.transition.clone()),
            values: IndexMap::new(),
        };
        {
            let state = self.inner.state.borrow();
            for (name, _) in &overlays {
                for key in variants[*name].keys() {
                    if result.values.contains_key(key) {
                        continue;
                    }
                    let base = current
                        .and_then(|v| v.get(key).cloned())
                        .or_else(|| state.rest.get(key).map(|rest| rest.clone().into()));
                    if let Some(target) = base {
                        result.values.insert(key.to_string(), target);
                    }
                }
            }
        }
        self.lay_active(&mut result, &overlays);
        (!result.is_empty()).then_some(result)
    }

    /// Leave must run to completion for teardown to happen
    fn leaving(&self, operation: &str) -> bool {
        let leaving = self.state() == LifecycleState::Leave;
        if leaving {
            tracing::trace!(operation, "ignored while leaving");
        }
        leaving
    }

    /// Apply the selected variant with the active interaction variants over it
    fn sync(&self) {
        if self.leaving("variant sync") {
            return;
        }
        let variants = self.inner.controls.variants();
        let Some(current) = variants.get(&self.inner.variant.get()) else {
            return;
        };
        let mut variant = current.clone();
        self.lay_active(&mut variant, &self.overlay_variants());
        self.apply(variant);
    }

    fn sync_overlay(&self) {
        if let Some(variant) = self.overlay() {
            self.apply(variant);
        }
    }

    fn apply(&self, variant: Variant) {
        if let Err(error) = self.inner.controls.apply(VariantRef::Inline(variant)) {
            tracing::warn!(%error, "variant sync");
        }
    }

    /// Play `leave`, then tear down
    pub fn unmount(&self) {
        if self.disposed("unmount") || self.state() == LifecycleState::Leave {
            return;
        }
        if !self.inner.options.life_cycle_hooks {
            self.unmount_immediately();
            return;
        }
        self.transition(LifecycleState::Leave);
        let weak = Rc::downgrade(&self.inner);
        self.inner.controls.leave(move || {
            if let Some(inner) = weak.upgrade() {
                LifecycleDriver { inner }.teardown();
            }
        });
    }

    /// Tear down without playing `leave`
    pub fn unmount_immediately(&self) {
        if self.disposed("unmount_immediately") {
            return;
        }
        self.teardown();
    }

    fn teardown(&self) {
        if self.is_disposed() {
            return;
        }
        let selector = self.inner.state.borrow_mut().selector.take();
        if let Some(selector) = selector {
            selector.unsubscribe();
        }
        self.inner.controls.transitions().values().destroy();
        self.inner.binding.unbind();
        self.transition(LifecycleState::Disposed);
    }
}

impl fmt::Debug for LifecycleDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("LifecycleDriver")
            .field("state", &state.lifecycle)
            .field("variant", &self.inner.variant.get())
            .field("hovered", &state.hovered)
            .field("tapped", &state.tapped)
            .field("focused", &state.focused)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::MotionProperties;
    use crate::registry::MotionValues;
    use crate::transition::Transition;
    use crate::transitions::MotionTransitions;
    use crate::variant::Variants;
    use glide_animation::FrameScheduler;

    fn driver(scheduler: &FrameScheduler, variants: Variants) -> (LifecycleDriver, MotionProperties) {
        let properties = MotionProperties::new();
        let values = MotionValues::new(scheduler.handle());
        let controls = MotionControls::new(
            MotionTransitions::new(values, properties.clone()),
            Rc::new(variants),
        );
        let binding = ElementBinding::new(properties.clone(), scheduler.handle(), true);
        let driver = LifecycleDriver::new(
            controls,
            binding,
            Observable::new(String::new()),
            MotionOptions::default(),
        );
        (driver, properties)
    }

    fn run(scheduler: &FrameScheduler, from: f64, until: f64) {
        let mut t = from;
        while t <= until {
            scheduler.frame(t);
            t += 16.0;
        }
    }

    fn fast() -> Transition {
        Transition::tween(32.0, "linear")
    }

    fn variants(entries: &[(&str, Variant)]) -> Variants {
        entries
            .iter()
            .map(|(name, v)| (name.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_mount_sets_initial_then_enters() {
        let scheduler = FrameScheduler::new();
        let (driver, props) = driver(
            &scheduler,
            variants(&[
                ("initial", Variant::new().with("opacity", 0.0)),
                ("enter", Variant::new().with("opacity", 1.0).with_transition(fast())),
            ]),
        );
        driver.mount(None);
        assert_eq!(driver.state(), LifecycleState::Enter);
        assert_eq!(props.get("opacity"), Some(Value::Number(0.0)));

        run(&scheduler, 0.0, 64.0);
        assert_eq!(props.get("opacity"), Some(Value::Number(1.0)));
    }

    #[test]
    fn test_visibility_toggles() {
        let scheduler = FrameScheduler::new();
        let (driver, props) = driver(
            &scheduler,
            variants(&[
                ("initial", Variant::new().with("y", 100.0).with_transition(fast())),
                ("visible", Variant::new().with("y", 0.0).with_transition(fast())),
            ]),
        );
        driver.mount(None);
        assert_eq!(driver.state(), LifecycleState::Initial);

        driver.visibility(true);
        assert_eq!(driver.state(), LifecycleState::Visible);
        run(&scheduler, 0.0, 64.0);
        assert_eq!(props.get("y"), Some(Value::Number(0.0)));

        driver.visibility(false);
        assert_eq!(driver.state(), LifecycleState::Initial);
        run(&scheduler, 80.0, 160.0);
        assert_eq!(props.get("y"), Some(Value::Number(100.0)));
    }

    #[test]
    fn test_visible_once_stops_after_first_show() {
        let scheduler = FrameScheduler::new();
        let (driver, props) = driver(
            &scheduler,
            variants(&[
                ("initial", Variant::new().with("opacity", 0.0)),
                ("visibleOnce", Variant::new().with("opacity", 1.0).with_transition(fast())),
            ]),
        );
        driver.mount(None);
        driver.visibility(true);
        run(&scheduler, 0.0, 64.0);
        driver.visibility(false);
        driver.visibility(true);
        run(&scheduler, 80.0, 160.0);
        assert_eq!(driver.state(), LifecycleState::Visible);
        assert_eq!(props.get("opacity"), Some(Value::Number(1.0)));
    }

    #[test]
    fn test_hover_overlay_restores() {
        let scheduler = FrameScheduler::new();
        let (driver, props) = driver(
            &scheduler,
            variants(&[
                ("enter", Variant::new().with("opacity", 1.0).with_transition(fast())),
                ("hovered", Variant::new().with("scale", 1.2).with_transition(fast())),
            ]),
        );
        props.set("scale", 1.0);
        driver.mount(None);
        run(&scheduler, 0.0, 64.0);

        driver.pointer_enter();
        run(&scheduler, 80.0, 160.0);
        assert_eq!(props.get("scale"), Some(Value::Number(1.2)));
        assert_eq!(props.get("opacity"), Some(Value::Number(1.0)));

        driver.pointer_leave();
        run(&scheduler, 176.0, 256.0);
        assert_eq!(props.get("scale"), Some(Value::Number(1.0)));
    }

    #[test]
    fn test_overlay_only_touches_interaction_keys() {
        let scheduler = FrameScheduler::new();
        let (driver, props) = driver(
            &scheduler,
            variants(&[
                ("enter", Variant::new().with("opacity", 1.0).with_transition(fast())),
                ("hovered", Variant::new().with("scale", 1.2).with_transition(fast())),
            ]),
        );
        props.set("scale", 1.0);
        driver.mount(None);
        run(&scheduler, 0.0, 64.0);

        driver
            .controls()
            .set(Variant::new().with("opacity", 0.3))
            .unwrap();
        driver.pointer_enter();
        run(&scheduler, 80.0, 160.0);
        assert_eq!(props.get("scale"), Some(Value::Number(1.2)));
        assert_eq!(props.get("opacity"), Some(Value::Number(0.3)));

        driver.pointer_leave();
        run(&scheduler, 176.0, 256.0);
        assert_eq!(props.get("scale"), Some(Value::Number(1.0)));
        assert_eq!(props.get("opacity"), Some(Value::Number(0.3)));
    }

    #[test]
    fn test_overlay_prefers_current_variant_value() {
        let scheduler = FrameScheduler::new();
        let (driver, props) = driver(
            &scheduler,
            variants(&[
                (
                    "enter",
                    Variant::new()
                        .with("opacity", 1.0)
                        .with("scale", 1.1)
                        .with_transition(fast()),
                ),
                ("hovered", Variant::new().with("scale", 1.3).with_transition(fast())),
            ]),
        );
        driver.mount(None);
        run(&scheduler, 0.0, 64.0);

        driver.pointer_enter();
        run(&scheduler, 80.0, 160.0);
        assert_eq!(props.get("scale"), Some(Value::Number(1.3)));

        driver.pointer_leave();
        run(&scheduler, 176.0, 256.0);
        assert_eq!(props.get("scale"), Some(Value::Number(1.1)));
    }

    #[test]
    fn test_interaction_does_not_cancel_leave() {
        let scheduler = FrameScheduler::new();
        let (driver, props) = driver(
            &scheduler,
            variants(&[
                ("initial", Variant::new().with("opacity", 0.0)),
                ("enter", Variant::new().with("opacity", 1.0).with_transition(fast())),
                (
                    "leave",
                    Variant::new()
                        .with("opacity", 0.0)
                        .with_transition(Transition::tween(200.0, "linear")),
                ),
                ("hovered", Variant::new().with("scale", 1.2).with_transition(fast())),
            ]),
        );
        props.set("scale", 1.0);
        driver.mount(None);
        run(&scheduler, 0.0, 64.0);

        driver.unmount();
        run(&scheduler, 80.0, 96.0);
        driver.pointer_enter();
        driver.focus();
        driver.select("enter");
        run(&scheduler, 112.0, 3000.0);

        assert!(driver.is_disposed());
        assert_eq!(props.get("opacity"), Some(Value::Number(0.0)));
        assert_eq!(props.get("scale"), Some(Value::Number(1.0)));
    }

    #[test]
    fn test_press_uses_first_supported_modality() {
        let scheduler = FrameScheduler::new();
        let (driver, props) = driver(
            &scheduler,
            variants(&[(
                "tapped",
                Variant::new().with("scale", 0.9).with_transition(Transition::immediate()),
            )]),
        );
        let driver = driver.with_supported_modalities(&[InputModality::Mouse, InputModality::Touch]);
        props.set("scale", 1.0);

        driver.press_start(InputModality::Mouse);
        assert_eq!(props.get("scale"), Some(Value::Number(1.0)));
        driver.press_start(InputModality::Touch);
        assert_eq!(props.get("scale"), Some(Value::Number(0.9)));
        driver.press_end(InputModality::Touch);
        run(&scheduler, 0.0, 1600.0);
        assert_eq!(props.get("scale"), Some(Value::Number(1.0)));
    }

    #[test]
    fn test_unmount_plays_leave_then_disposes() {
        let scheduler = FrameScheduler::new();
        let (driver, props) = driver(
            &scheduler,
            variants(&[
                ("initial", Variant::new().with("opacity", 0.0)),
                ("enter", Variant::new().with("opacity", 1.0).with_transition(Transition::immediate())),
                ("leave", Variant::new().with("opacity", 0.0).with_transition(fast())),
            ]),
        );
        driver.mount(None);
        assert_eq!(props.get("opacity"), Some(Value::Number(1.0)));

        driver.unmount();
        assert_eq!(driver.state(), LifecycleState::Leave);
        run(&scheduler, 0.0, 64.0);
        assert!(driver.is_disposed());
        assert_eq!(props.get("opacity"), Some(Value::Number(0.0)));

        driver.select("enter");
        driver.pointer_enter();
        driver.mount(None);
        assert!(driver.is_disposed());
    }

    #[test]
    fn test_unmount_immediately() {
        let scheduler = FrameScheduler::new();
        let (driver, _props) = driver(
            &scheduler,
            variants(&[("leave", Variant::new().with("opacity", 0.0))]),
        );
        driver.mount(None);
        driver.unmount_immediately();
        assert!(driver.is_disposed());
        assert!(driver.controls().transitions().values().is_empty());
    }
}
