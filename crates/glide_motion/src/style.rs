//! Style projection
//!
//! Splits a property bag into plain style declarations, a composed
//! `transform` and a `transform-origin`, and renders the result as CSS.

use crate::transform::{build_transform, build_transform_origin, is_origin_key, is_transform_key};
use crate::value_types::format_value;
use glide_core::Value;
use indexmap::IndexMap;

/// `backgroundColor` → `background-color`, `WebkitFilter` → `-webkit-filter`
pub fn kebab_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// `background-color` → `backgroundColor`, `-webkit-filter` → `WebkitFilter`
pub fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for c in name.chars() {
        if c == '-' {
            upper = true;
        } else if upper {
            out.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// CSS declarations for a property bag, keyed by kebab-case name
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MotionStyle {
    declarations: IndexMap<String, String>,
}

impl MotionStyle {
    pub fn from_properties(props: &IndexMap<String, Value>, hardware_acceleration: bool) -> Self {
        let mut declarations = IndexMap::new();

        for (key, value) in props {
            if is_transform_key(key) || is_origin_key(key) {
                continue;
            }
            declarations.insert(kebab_case(key), format_value(key, value));
        }

        let has_transform = props.keys().any(|k| is_transform_key(k));
        if has_transform {
            let transform = build_transform(props, hardware_acceleration);
            if !transform.is_empty() {
                declarations.insert("transform".to_string(), transform);
            }
        }

        if let Some(origin) = build_transform_origin(props) {
            declarations.insert("transform-origin".to_string(), origin);
        }

        Self { declarations }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.declarations.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.declarations
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn into_declarations(self) -> IndexMap<String, String> {
        self.declarations
    }

    /// `name: value; name: value;`
    pub fn to_style_string(&self) -> String {
        self.declarations
            .iter()
            .map(|(name, value)| format!("{name}: {value};"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
