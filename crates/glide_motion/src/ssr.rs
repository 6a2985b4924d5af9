//! Server-side style strings
//!
//! Renders a variant as an inline style string without animating, so
//! markup produced ahead of time already shows the initial state.

use crate::style::MotionStyle;
use crate::variant::{names, Variant, Variants};
use indexmap::IndexMap;

/// Style string for a variant, without hardware acceleration
pub fn variant_to_style(variant: &Variant) -> String {
    variant_to_style_with(variant, false)
}

/// Style string for a variant
///
/// Keyframe targets render their final keyframe.
pub fn variant_to_style_with(variant: &Variant, hardware_acceleration: bool) -> String {
    let props: IndexMap<_, _> = variant
        .values
        .iter()
        .filter_map(|(key, target)| Some((key.clone(), target.final_value()?.clone())))
        .collect();
    MotionStyle::from_properties(&props, hardware_acceleration).to_style_string()
}

/// Style string for the `initial` variant, or empty without one
pub fn initial_style(variants: &Variants) -> String {
    variants
        .get(names::INITIAL)
        .map(variant_to_style)
        .unwrap_or_default()
}
