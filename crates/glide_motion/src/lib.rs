//! glide motion
//!
//! Variant-driven animation of element style and transform properties.
//!
//! A subject's motion is a set of named [`Variant`]s. Applying one starts a
//! transition per property on that property's [`MotionValue`]; every value
//! writes into the subject's [`MotionProperties`] bag, and an
//! [`ElementBinding`] projects the bag onto the element as inline style
//! (`transform`, `transform-origin` and plain declarations) once per frame.
//! A [`LifecycleDriver`] decides when variants fire: `initial`/`enter` on
//! mount, `visible` on visibility, `hovered`/`tapped`/`focused` on
//! interaction, and `leave` before teardown.
//!
//! [`MotionValue`]: glide_animation::MotionValue

pub mod binding;
pub mod config;
pub mod controls;
pub mod directive;
pub mod engine;
pub mod instances;
pub mod lifecycle;
pub mod motion;
pub mod presets;
pub mod properties;
pub mod registry;
pub mod ssr;
pub mod style;
pub mod transform;
pub mod transition;
pub mod transitions;
pub mod value_types;
pub mod variant;

pub use binding::{ElementBinding, ElementSink};
pub use config::MotionPluginConfig;
pub use controls::MotionControls;
pub use directive::DirectiveRegistry;
pub use engine::{get_animation, is_animatable, StartFn};
pub use instances::{motion, register_motion, unregister_motion};
pub use lifecycle::{InputModality, LifecycleDriver, LifecycleState};
pub use motion::{use_motion, MotionInstance, MotionOptions};
pub use presets::{preset, presets};
pub use properties::MotionProperties;
pub use registry::MotionValues;
pub use ssr::{initial_style, variant_to_style, variant_to_style_with};
pub use style::MotionStyle;
pub use transform::{build_transform, build_transform_origin, parse_transform, state_from_transform};
pub use transition::{
    default_transition, resolve_transition, EaseSpec, ResolvedTransition, Transition,
    TransitionKind, TransitionProfile, TransitionType,
};
pub use transitions::MotionTransitions;
pub use value_types::{value_type, ValueType};
pub use variant::{Variant, VariantRef, Variants};
