//! Built-in variant presets
//!
//! Each preset comes in two forms: one that animates in on `enter`, and a
//! `*Visible` twin that animates in when the subject becomes `visible`.

use crate::variant::{names, Variant, Variants};

/// Names of the built-in presets, `enter` forms first
pub const PRESET_NAMES: &[&str] = &[
    "fade",
    "pop",
    "rollBottom",
    "rollLeft",
    "rollRight",
    "rollTop",
    "slideBottom",
    "slideLeft",
    "slideRight",
    "slideTop",
    "fadeVisible",
    "popVisible",
    "rollVisibleBottom",
    "rollVisibleLeft",
    "rollVisibleRight",
    "rollVisibleTop",
    "slideVisibleBottom",
    "slideVisibleLeft",
    "slideVisibleRight",
    "slideVisibleTop",
];

fn preset_variants(from: Variant, to: Variant, show: &str) -> Variants {
    let mut variants = Variants::new();
    variants.insert(names::INITIAL.to_string(), from);
    variants.insert(show.to_string(), to);
    variants
}

fn slide(axis: &str, offset: f64, show: &str) -> Variants {
    preset_variants(
        Variant::new().with(axis, offset).with("opacity", 0.0),
        Variant::new().with(axis, 0.0).with("opacity", 1.0),
        show,
    )
}

fn roll(axis: &str, offset: f64, rotate: f64, show: &str) -> Variants {
    preset_variants(
        Variant::new()
            .with(axis, offset)
            .with("rotate", rotate)
            .with("opacity", 0.0),
        Variant::new()
            .with(axis, 0.0)
            .with("rotate", 0.0)
            .with("opacity", 1.0),
        show,
    )
}

/// The variants of a built-in preset
pub fn preset(name: &str) -> Option<Variants> {
    let (base, show) = match name.strip_suffix("Visible") {
        Some(base) => (base.to_string(), names::VISIBLE),
        None => match name.split_once("Visible") {
            // rollVisibleLeft → rollLeft
            Some((head, tail)) if !tail.is_empty() => (format!("{head}{tail}"), names::VISIBLE),
            _ => (name.to_string(), names::ENTER),
        },
    };

    let variants = match base.as_str() {
        "fade" => preset_variants(
            Variant::new().with("opacity", 0.0),
            Variant::new().with("opacity", 1.0),
            show,
        ),
        "pop" => preset_variants(
            Variant::new().with("scale", 0.0).with("opacity", 0.0),
            Variant::new().with("scale", 1.0).with("opacity", 1.0),
            show,
        ),
        "rollBottom" => roll("y", 100.0, 10.0, show),
        "rollLeft" => roll("x", -100.0, 10.0, show),
        "rollRight" => roll("x", 100.0, -10.0, show),
        "rollTop" => roll("y", -100.0, -10.0, show),
        "slideBottom" => slide("y", 100.0, show),
        "slideLeft" => slide("x", -100.0, show),
        "slideRight" => slide("x", 100.0, show),
        "slideTop" => slide("y", -100.0, show),
        _ => return None,
    };
    Some(variants)
}

/// Every built-in preset by name
pub fn presets() -> impl Iterator<Item = (&'static str, Variants)> {
    PRESET_NAMES
        .iter()
        .filter_map(|name| preset(name).map(|variants| (*name, variants)))
}
