//! Directive attributes
//!
//! Hosts that declare motion in markup pass an attribute map: the special
//! variant names, an optional `variants` table, a `preset` name and a
//! numeric `delay`. [`DirectiveRegistry`] turns that map into a variants
//! table, starting from a named directive (a preset or a configured custom
//! directive) when there is one.

use crate::config::MotionPluginConfig;
use crate::motion::MotionOptions;
use crate::presets::presets;
use crate::transition::Transition;
use crate::variant::{names, Variant, Variants};
use glide_core::Result;
use indexmap::IndexMap;
use serde_json::{Map, Value as Json};

/// Attribute names read as variants
pub const VARIANT_ATTRIBUTES: &[&str] = &[
    names::INITIAL,
    names::ENTER,
    names::LEAVE,
    names::VISIBLE,
    names::VISIBLE_ONCE,
    names::HOVERED,
    names::TAPPED,
    names::FOCUSED,
];

/// Variants that receive the `delay` attribute
const DELAYED: &[&str] = &[names::ENTER, names::VISIBLE, names::VISIBLE_ONCE];

/// Named directives and their variant sets
#[derive(Clone, Debug, Default)]
pub struct DirectiveRegistry {
    directives: IndexMap<String, Variants>,
    options: MotionOptions,
}

impl DirectiveRegistry {
    pub fn new(config: &MotionPluginConfig) -> Self {
        let mut directives = IndexMap::new();
        if !config.exclude_presets {
            directives.extend(presets().map(|(name, variants)| (name.to_string(), variants)));
        }
        for (name, variants) in &config.directives {
            if directives.insert(name.clone(), variants.clone()).is_some() {
                tracing::debug!(name, "custom directive overrides preset");
            }
        }
        Self {
            directives,
            options: config.motion_options(),
        }
    }

    /// Options for subjects this registry resolves variants for
    pub fn options(&self) -> MotionOptions {
        self.options
    }

    pub fn get(&self, name: &str) -> Option<&Variants> {
        self.directives.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.directives.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.directives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    /// Resolve a directive's attributes into variants
    ///
    /// Precedence, lowest first: the named directive, the `variants`
    /// attribute, the `preset` attribute, then individual variant
    /// attributes. A numeric `delay` is set on the `enter`, `visible` and
    /// `visibleOnce` transitions. An unknown preset is ignored.
    pub fn resolve(&self, directive: Option<&str>, attrs: &Map<String, Json>) -> Result<Variants> {
        let mut variants = match directive {
            Some(name) => match self.directives.get(name) {
                Some(variants) => variants.clone(),
                None => {
                    tracing::warn!(name, "unknown directive");
                    Variants::new()
                }
            },
            None => Variants::new(),
        };

        if let Some(table @ Json::Object(_)) = attrs.get("variants") {
            let table: Variants = serde_json::from_value(table.clone())?;
            variants.extend(table);
        }

        if let Some(name) = attrs.get("preset").and_then(Json::as_str) {
            match self.directives.get(name) {
                Some(preset) => variants.extend(preset.clone()),
                None => tracing::warn!(name, "unknown preset"),
            }
        }

        for key in VARIANT_ATTRIBUTES {
            if let Some(value @ Json::Object(_)) = attrs.get(*key) {
                let variant: Variant = serde_json::from_value(value.clone())?;
                variants.insert(key.to_string(), variant);
            }
        }

        if let Some(delay) = attrs.get("delay").and_then(Json::as_f64) {
            for key in DELAYED {
                if let Some(variant) = variants.get_mut(*key) {
                    variant
                        .transition
                        .get_or_insert_with(Transition::default)
                        .delay = Some(delay);
                }
            }
        }

        Ok(variants)
    }
}
