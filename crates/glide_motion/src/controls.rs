//! Variant application
//!
//! [`MotionControls`] applies whole variants: one transition per property,
//! joined into a single [`Completion`].

use crate::transition::Transition;
use crate::transitions::MotionTransitions;
use crate::variant::{names, Variant, VariantRef, Variants};
use glide_core::{Completion, MotionError, Observable, Result};
use std::rc::Rc;

/// Applies, sets and stops variants on one subject
#[derive(Clone, Debug)]
pub struct MotionControls {
    transitions: MotionTransitions,
    variants: Rc<Variants>,
}

impl MotionControls {
    pub fn new(transitions: MotionTransitions, variants: Rc<Variants>) -> Self {
        Self {
            transitions,
            variants,
        }
    }

    pub fn variants(&self) -> &Variants {
        &self.variants
    }

    pub fn transitions(&self) -> &MotionTransitions {
        &self.transitions
    }

    fn resolve(&self, variant: VariantRef) -> Result<Variant> {
        match variant {
            VariantRef::Named(name) => self
                .variants
                .get(&name)
                .cloned()
                .ok_or(MotionError::UnknownVariant(name)),
            VariantRef::Inline(variant) => Ok(variant),
        }
    }

    /// Animate every property of a variant
    ///
    /// The returned completion settles once every property's animation has
    /// finished; an empty variant is settled immediately. An unknown name
    /// is an error and starts nothing.
    pub fn apply(&self, variant: impl Into<VariantRef>) -> Result<Completion> {
        let variant = self.resolve(variant.into())?;
        Ok(self.start(&variant, variant.transition.clone().unwrap_or_default()))
    }

    /// [`apply`](Self::apply), running `on_complete` once everything has finished
    pub fn apply_with(
        &self,
        variant: impl Into<VariantRef>,
        on_complete: impl FnOnce() + 'static,
    ) -> Result<Completion> {
        let completion = self.apply(variant)?;
        completion.on_settle(on_complete);
        Ok(completion)
    }

    /// Set every property of a variant without animating
    pub fn set(&self, variant: impl Into<VariantRef>) -> Result<Completion> {
        let variant = self.resolve(variant.into())?;
        let mut transition = Transition::immediate();
        if let Some(user) = &variant.transition {
            transition.on_update = user.on_update.clone();
            transition.on_complete = user.on_complete.clone();
        }
        Ok(self.start(&variant, transition))
    }

    fn start(&self, variant: &Variant, transition: Transition) -> Completion {
        tracing::debug!(keys = ?variant.keys().collect::<Vec<_>>(), "apply variant");
        let parts: Vec<Completion> = variant
            .values
            .iter()
            .map(|(key, target)| self.transitions.push(key, target, &transition, None))
            .collect();
        Completion::join(parts)
    }

    /// Stop the given properties without completing them
    pub fn stop<'a>(&self, keys: impl IntoIterator<Item = &'a str>) {
        self.transitions.stop(keys);
    }

    pub fn stop_all(&self) {
        self.transitions.stop_all();
    }

    pub fn is_animating(&self) -> Observable<bool> {
        self.transitions.values().is_animating()
    }

    /// Play the exit animation and call `done` when it finishes
    ///
    /// Uses the `leave` variant, falling back to `initial`; with neither,
    /// `done` runs immediately.
    pub fn leave(&self, done: impl FnOnce() + 'static) {
        let name = [names::LEAVE, names::INITIAL]
            .into_iter()
            .find(|name| self.variants.contains_key(*name));
        match name {
            Some(name) => {
                tracing::debug!(variant = name, "leave");
                let variant = &self.variants[name];
                self.start(variant, variant.transition.clone().unwrap_or_default())
                    .on_settle(done);
            }
            None => done(),
        }
    }
}
