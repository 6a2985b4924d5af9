//! Variants
//!
//! A variant is a named set of property targets plus an optional
//! transition. `transition` is a separate field, never an animatable
//! property.

use crate::transition::Transition;
use glide_core::Target;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Variant names the lifecycle driver recognises
pub mod names {
    pub const INITIAL: &str = "initial";
    pub const ENTER: &str = "enter";
    pub const LEAVE: &str = "leave";
    pub const VISIBLE: &str = "visible";
    pub const VISIBLE_ONCE: &str = "visibleOnce";
    pub const HOVERED: &str = "hovered";
    pub const TAPPED: &str = "tapped";
    pub const FOCUSED: &str = "focused";
}

/// Property targets plus the transition used to reach them
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Variant {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition: Option<Transition>,
    #[serde(flatten)]
    pub values: IndexMap<String, Target>,
}

impl Variant {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, target: impl Into<Target>) -> Self {
        self.values.insert(key.into(), target.into());
        self
    }

    pub fn with_transition(mut self, transition: Transition) -> Self {
        self.transition = Some(transition);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Target> {
        self.values.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Keys of every property this variant targets
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

/// Named variants of one subject, in declaration order
pub type Variants = IndexMap<String, Variant>;

/// A variant by name or given inline
#[derive(Clone, Debug)]
pub enum VariantRef {
    Named(String),
    Inline(Variant),
}

impl From<&str> for VariantRef {
    fn from(name: &str) -> Self {
        VariantRef::Named(name.to_string())
    }
}

impl From<String> for VariantRef {
    fn from(name: String) -> Self {
        VariantRef::Named(name)
    }
}

impl From<Variant> for VariantRef {
    fn from(variant: Variant) -> Self {
        VariantRef::Inline(variant)
    }
}
