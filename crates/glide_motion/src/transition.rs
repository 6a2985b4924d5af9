//! Transitions
//!
//! [`Transition`] is the user-facing description of how a variant animates:
//! spring, keyframe (tween), decay or inertia parameters plus delay and
//! repeat options. When a transition leaves the animation kind unspecified,
//! each property falls back to a default profile:
//!
//! | properties | default |
//! |---|---|
//! | `x`, `y`, `z`, `rotate*` | under-damped spring |
//! | `scale`, `scaleX`, `scaleY` | critically damped spring |
//! | `backgroundColor`, `color`, `opacity` | 300 ms linear tween |
//! | keyframe targets | 800 ms tween |
//! | anything else | over-damped spring |

use glide_animation::{
    AnimationKind, DecayConfig, Easing, InertiaConfig, KeyframeEase, RepeatType, SpringConfig,
};
use glide_core::{Target, Value};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// Duration of the default tween for keyframe targets, in ms
pub const KEYFRAMES_DURATION: f64 = 800.0;

/// Duration of a tween that doesn't specify one, in ms
pub const TWEEN_DURATION: f64 = 300.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransitionType {
    Spring,
    Keyframes,
    Tween,
    Inertia,
    Decay,
}

/// The `type` field: an animation type, or `false` to set values immediately
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransitionKind {
    Type(TransitionType),
    Enabled(bool),
}

/// An easing curve as written in a transition
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EaseSpec {
    Named(String),
    Bezier([f64; 4]),
    PerKeyframe(Vec<EaseSpec>),
    #[serde(skip)]
    Custom(Easing),
}

impl EaseSpec {
    fn single(&self) -> Option<Easing> {
        match self {
            EaseSpec::Named(name) => {
                let easing = Easing::from_name(name);
                if easing.is_none() {
                    tracing::trace!(name, "unknown easing, using default");
                }
                easing
            }
            EaseSpec::Bezier([x1, y1, x2, y2]) => Some(Easing::CubicBezier(*x1, *y1, *x2, *y2)),
            EaseSpec::Custom(easing) => Some(easing.clone()),
            EaseSpec::PerKeyframe(_) => None,
        }
    }

    /// Resolve to keyframe easing; unknown names fall back to the default curve
    pub fn resolve(&self) -> KeyframeEase {
        match self {
            EaseSpec::PerKeyframe(list) => KeyframeEase::PerSegment(
                list.iter()
                    .map(|e| e.single().unwrap_or(Easing::EaseInOut))
                    .collect(),
            ),
            single => single.single().map(KeyframeEase::All).unwrap_or_default(),
        }
    }
}

impl From<&str> for EaseSpec {
    fn from(name: &str) -> Self {
        EaseSpec::Named(name.to_string())
    }
}

impl From<Easing> for EaseSpec {
    fn from(easing: Easing) -> Self {
        EaseSpec::Custom(easing)
    }
}

pub type UpdateCallback = Rc<dyn Fn(&Value)>;
pub type CompleteCallback = Rc<dyn Fn()>;

/// How a variant (or one of its properties) animates
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Transition {
    #[serde(rename = "type")]
    pub kind: Option<TransitionKind>,

    // Spring
    pub stiffness: Option<f64>,
    pub damping: Option<f64>,
    pub mass: Option<f64>,
    pub rest_delta: Option<f64>,
    pub rest_speed: Option<f64>,

    // Keyframes
    /// Milliseconds
    pub duration: Option<f64>,
    pub ease: Option<EaseSpec>,
    #[serde(alias = "offset")]
    pub times: Option<Vec<f64>>,
    pub values: Option<Vec<Option<Value>>>,

    // Decay / inertia
    pub power: Option<f64>,
    pub time_constant: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub bounce_stiffness: Option<f64>,
    pub bounce_damping: Option<f64>,

    // Common
    /// Milliseconds
    pub delay: Option<f64>,
    pub repeat: Option<f64>,
    pub repeat_type: Option<RepeatType>,
    pub repeat_delay: Option<f64>,
    pub from: Option<Value>,
    pub velocity: Option<f64>,
    pub immediate: Option<bool>,

    #[serde(skip)]
    pub on_update: Option<UpdateCallback>,
    #[serde(skip)]
    pub on_complete: Option<CompleteCallback>,

    /// Per-property replacements for this transition
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, Transition>,
}

impl Transition {
    pub fn spring(stiffness: f64, damping: f64) -> Self {
        Self {
            kind: Some(TransitionKind::Type(TransitionType::Spring)),
            stiffness: Some(stiffness),
            damping: Some(damping),
            ..Self::default()
        }
    }

    pub fn tween(duration: f64, ease: impl Into<EaseSpec>) -> Self {
        Self {
            kind: Some(TransitionKind::Type(TransitionType::Keyframes)),
            duration: Some(duration),
            ease: Some(ease.into()),
            ..Self::default()
        }
    }

    /// Set values without animating
    pub fn immediate() -> Self {
        Self {
            kind: Some(TransitionKind::Enabled(false)),
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: f64) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_repeat(mut self, repeat: f64, repeat_type: RepeatType) -> Self {
        self.repeat = Some(repeat);
        self.repeat_type = Some(repeat_type);
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, transition: Transition) -> Self {
        self.properties.insert(key.into(), transition);
        self
    }

    pub fn on_update(mut self, f: impl Fn(&Value) + 'static) -> Self {
        self.on_update = Some(Rc::new(f));
        self
    }

    pub fn on_complete(mut self, f: impl Fn() + 'static) -> Self {
        self.on_complete = Some(Rc::new(f));
        self
    }

    pub fn is_immediate(&self) -> bool {
        self.kind == Some(TransitionKind::Enabled(false)) || self.immediate == Some(true)
    }

    /// Whether anything besides delay, repeat options, `from` and callbacks is set
    pub fn is_defined(&self) -> bool {
        self.kind.is_some()
            || self.stiffness.is_some()
            || self.damping.is_some()
            || self.mass.is_some()
            || self.rest_delta.is_some()
            || self.rest_speed.is_some()
            || self.duration.is_some()
            || self.ease.is_some()
            || self.times.is_some()
            || self.values.is_some()
            || self.power.is_some()
            || self.time_constant.is_some()
            || self.min.is_some()
            || self.max.is_some()
            || self.bounce_stiffness.is_some()
            || self.bounce_damping.is_some()
            || self.velocity.is_some()
            || self.immediate.is_some()
    }

    /// The transition for one property
    ///
    /// A `properties` entry replaces this transition for its key; callbacks
    /// it doesn't set are inherited.
    pub fn for_property(&self, key: &str) -> Transition {
        match self.properties.get(key) {
            Some(specific) => {
                let mut t = specific.clone();
                if t.on_update.is_none() {
                    t.on_update = self.on_update.clone();
                }
                if t.on_complete.is_none() {
                    t.on_complete = self.on_complete.clone();
                }
                t
            }
            None => {
                let mut t = self.clone();
                t.properties.clear();
                t
            }
        }
    }

    fn has_spring_params(&self) -> bool {
        self.stiffness.is_some()
            || self.damping.is_some()
            || self.mass.is_some()
            || self.rest_delta.is_some()
            || self.rest_speed.is_some()
    }

    fn spring_config(&self) -> SpringConfig {
        let defaults = SpringConfig::default();
        SpringConfig {
            stiffness: self.stiffness.unwrap_or(defaults.stiffness),
            damping: self.damping.unwrap_or(defaults.damping),
            mass: self.mass.unwrap_or(defaults.mass),
            rest_delta: self.rest_delta.unwrap_or(defaults.rest_delta),
            rest_speed: self.rest_speed.unwrap_or(defaults.rest_speed),
        }
    }

    fn keyframes_kind(&self, default_duration: f64) -> AnimationKind {
        AnimationKind::Keyframes {
            duration: self.duration.unwrap_or(default_duration),
            ease: self.ease.as_ref().map(EaseSpec::resolve).unwrap_or_default(),
            times: self.times.clone(),
        }
    }

    fn decay_config(&self, base: DecayConfig) -> DecayConfig {
        DecayConfig {
            power: self.power.unwrap_or(base.power),
            time_constant: self.time_constant.unwrap_or(base.time_constant),
            rest_delta: self.rest_delta.unwrap_or(base.rest_delta),
            modify_target: base.modify_target,
        }
    }

    fn inertia_config(&self) -> InertiaConfig {
        let base = InertiaConfig::default();
        InertiaConfig {
            decay: self.decay_config(base.decay),
            bounce_stiffness: self.bounce_stiffness.unwrap_or(base.bounce_stiffness),
            bounce_damping: self.bounce_damping.unwrap_or(base.bounce_damping),
            min: self.min,
            max: self.max,
        }
    }
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = self;
        let mut s = f.debug_struct("Transition");
        macro_rules! field {
            ($($name:ident),*) => {
                $(if let Some(v) = &t.$name { s.field(stringify!($name), v); })*
            };
        }
        field!(
            kind, stiffness, damping, mass, rest_delta, rest_speed, duration, ease, times,
            values, power, time_constant, min, max, bounce_stiffness, bounce_damping, delay,
            repeat, repeat_type, repeat_delay, from, velocity, immediate
        );
        if self.on_update.is_some() {
            s.field("on_update", &"<fn>");
        }
        if self.on_complete.is_some() {
            s.field("on_complete", &"<fn>");
        }
        if !self.properties.is_empty() {
            s.field("properties", &self.properties);
        }
        s.finish()
    }
}

fn under_damped_spring() -> Transition {
    Transition {
        rest_delta: Some(0.5),
        rest_speed: Some(10.0),
        ..Transition::spring(500.0, 25.0)
    }
}

fn critically_damped_spring(target: &Target) -> Transition {
    let to_zero = matches!(target, Target::Single(Value::Number(n)) if *n == 0.0);
    Transition {
        rest_delta: Some(0.01),
        rest_speed: Some(10.0),
        ..Transition::spring(550.0, if to_zero { 100.0 } else { 30.0 })
    }
}

/// The default transition for animating `key` towards `target`
pub fn default_transition(key: &str, target: &Target) -> Transition {
    if target.is_keyframes() {
        return Transition {
            kind: Some(TransitionKind::Type(TransitionType::Keyframes)),
            duration: Some(KEYFRAMES_DURATION),
            ..Transition::default()
        };
    }

    match key {
        "x" | "y" | "z" | "rotate" | "rotateX" | "rotateY" | "rotateZ" => under_damped_spring(),
        "scale" | "scaleX" | "scaleY" => critically_damped_spring(target),
        "backgroundColor" | "color" | "opacity" => Transition::tween(TWEEN_DURATION, "linear"),
        // Over-damped default shares the critically damped constants
        _ => critically_damped_spring(target),
    }
}

/// Animation profile chosen for one property
#[derive(Clone, Debug)]
pub enum TransitionProfile {
    /// Write the target without animating
    Immediate,
    Animated(AnimationKind),
}

/// A transition resolved for one property and target
#[derive(Clone, Debug)]
pub struct ResolvedTransition {
    pub profile: TransitionProfile,
    /// Milliseconds
    pub delay: f64,
    pub repeat: f64,
    pub repeat_type: RepeatType,
    pub repeat_delay: f64,
    pub from: Option<Value>,
    pub velocity: Option<f64>,
}

/// Resolve the transition for `key` animating towards `target`
///
/// `transition` should already be narrowed with [`Transition::for_property`].
/// An undefined transition takes the property's default profile but keeps
/// its own delay, repeat options and `from`.
pub fn resolve_transition(key: &str, target: &Target, transition: &Transition) -> ResolvedTransition {
    let common = |profile| ResolvedTransition {
        profile,
        delay: transition.delay.unwrap_or(0.0),
        repeat: transition.repeat.unwrap_or(0.0),
        repeat_type: transition.repeat_type.unwrap_or_default(),
        repeat_delay: transition.repeat_delay.unwrap_or(0.0),
        from: transition.from.clone(),
        velocity: transition.velocity,
    };

    if transition.is_immediate() {
        return common(TransitionProfile::Immediate);
    }

    let defaulted;
    let effective = if transition.is_defined() {
        transition
    } else {
        defaulted = default_transition(key, target);
        &defaulted
    };

    let kind = match effective.kind {
        Some(TransitionKind::Type(TransitionType::Inertia)) => {
            AnimationKind::Inertia(effective.inertia_config())
        }
        Some(TransitionKind::Type(TransitionType::Decay)) => {
            AnimationKind::Decay(effective.decay_config(DecayConfig::default()))
        }
        // A keyframe sequence always plays as keyframes
        _ if target.is_keyframes() => effective.keyframes_kind(KEYFRAMES_DURATION),
        Some(TransitionKind::Type(TransitionType::Spring)) => {
            AnimationKind::Spring(effective.spring_config())
        }
        Some(TransitionKind::Type(TransitionType::Keyframes | TransitionType::Tween)) => {
            effective.keyframes_kind(TWEEN_DURATION)
        }
        Some(TransitionKind::Enabled(_)) | None => {
            if effective.ease.is_some() || effective.duration.is_some() {
                effective.keyframes_kind(TWEEN_DURATION)
            } else if effective.has_spring_params() {
                AnimationKind::Spring(effective.spring_config())
            } else {
                effective.keyframes_kind(TWEEN_DURATION)
            }
        }
    };

    common(TransitionProfile::Animated(kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spring_of(resolved: &ResolvedTransition) -> SpringConfig {
        match &resolved.profile {
            TransitionProfile::Animated(AnimationKind::Spring(config)) => *config,
            other => panic!("expected spring, got {other:?}"),
        }
    }

    fn tween_of(resolved: &ResolvedTransition) -> (f64, KeyframeEase) {
        match &resolved.profile {
            TransitionProfile::Animated(AnimationKind::Keyframes { duration, ease, .. }) => {
                (*duration, ease.clone())
            }
            other => panic!("expected keyframes, got {other:?}"),
        }
    }

    #[test]
    fn test_default_profiles() {
        let none = Transition::default();

        let x = spring_of(&resolve_transition("x", &Target::from(100.0), &none));
        assert_eq!((x.stiffness, x.damping, x.rest_delta), (500.0, 25.0, 0.5));

        let scale = spring_of(&resolve_transition("scale", &Target::from(1.0), &none));
        assert_eq!((scale.stiffness, scale.damping), (550.0, 30.0));

        let to_zero = spring_of(&resolve_transition("scale", &Target::from(0.0), &none));
        assert_eq!(to_zero.damping, 100.0);

        let (duration, ease) = tween_of(&resolve_transition("opacity", &Target::from(1.0), &none));
        assert_eq!(duration, 300.0);
        assert_eq!(ease, KeyframeEase::All(Easing::Linear));

        let other = spring_of(&resolve_transition("width", &Target::from(10.0), &none));
        assert_eq!(other.stiffness, 550.0);
    }

    #[test]
    fn test_keyframe_target_defaults_to_800ms() {
        let target = Target::from(vec![0.0, 1.0, 0.5]);
        let (duration, _) = tween_of(&resolve_transition("x", &target, &Transition::default()));
        assert_eq!(duration, 800.0);

        // The sequence wins over a typed spring
        let spring = Transition::spring(100.0, 10.0);
        assert!(matches!(
            resolve_transition("x", &target, &spring).profile,
            TransitionProfile::Animated(AnimationKind::Keyframes { .. })
        ));
    }

    #[test]
    fn test_undefined_transition_keeps_common_fields() {
        let transition = Transition::default()
            .with_delay(200.0)
            .with_repeat(2.0, RepeatType::Mirror);
        assert!(!transition.is_defined());

        let resolved = resolve_transition("x", &Target::from(1.0), &transition);
        assert_eq!(resolved.delay, 200.0);
        assert_eq!(resolved.repeat, 2.0);
        assert_eq!(resolved.repeat_type, RepeatType::Mirror);
        assert_eq!(spring_of(&resolved).stiffness, 500.0);
    }

    #[test]
    fn test_defined_transition_replaces_default() {
        let resolved = resolve_transition(
            "opacity",
            &Target::from(1.0),
            &Transition::spring(200.0, 20.0),
        );
        assert_eq!(spring_of(&resolved).stiffness, 200.0);

        let duration_only = Transition {
            duration: Some(500.0),
            ..Transition::default()
        };
        let (duration, ease) =
            tween_of(&resolve_transition("x", &Target::from(1.0), &duration_only));
        assert_eq!(duration, 500.0);
        assert_eq!(ease, KeyframeEase::All(Easing::EaseInOut));
    }

    #[test]
    fn test_immediate() {
        let resolved = resolve_transition("x", &Target::from(1.0), &Transition::immediate());
        assert!(matches!(resolved.profile, TransitionProfile::Immediate));
    }

    #[test]
    fn test_inertia() {
        let transition = Transition {
            kind: Some(TransitionKind::Type(TransitionType::Inertia)),
            max: Some(100.0),
            ..Transition::default()
        };
        match resolve_transition("x", &Target::from(0.0), &transition).profile {
            TransitionProfile::Animated(AnimationKind::Inertia(config)) => {
                assert_eq!(config.max, Some(100.0));
                assert_eq!(config.bounce_stiffness, 500.0);
            }
            other => panic!("expected inertia, got {other:?}"),
        }
    }

    #[test]
    fn test_property_overrides() {
        let transition = Transition::tween(100.0, "linear")
            .on_complete(|| {})
            .with_property("x", Transition::spring(300.0, 20.0));

        let x = transition.for_property("x");
        assert_eq!(x.stiffness, Some(300.0));
        assert!(x.on_complete.is_some());

        let opacity = transition.for_property("opacity");
        assert_eq!(opacity.duration, Some(100.0));
        assert!(opacity.properties.is_empty());
    }

    #[test]
    fn test_deserialize() {
        let t: Transition = serde_json::from_str(
            r#"{"type": "spring", "stiffness": 300, "delay": 100, "repeatType": "reverse"}"#,
        )
        .unwrap();
        assert_eq!(t.kind, Some(TransitionKind::Type(TransitionType::Spring)));
        assert_eq!(t.stiffness, Some(300.0));
        assert_eq!(t.repeat_type, Some(RepeatType::Reverse));

        let t: Transition = serde_json::from_str(r#"{"type": false}"#).unwrap();
        assert!(t.is_immediate());

        let t: Transition =
            serde_json::from_str(r#"{"ease": [0.4, 0, 0.2, 1], "offset": [0, 1]}"#).unwrap();
        assert!(matches!(t.ease, Some(EaseSpec::Bezier(_))));
        assert_eq!(t.times, Some(vec![0.0, 1.0]));

        let t: Transition = serde_json::from_str(r#"{"ease": ["easeIn", "nope"]}"#).unwrap();
        assert_eq!(
            t.ease.unwrap().resolve(),
            KeyframeEase::PerSegment(vec![Easing::EaseIn, Easing::EaseInOut])
        );
    }

    #[test]
    fn test_unknown_easing_is_not_an_error() {
        let t: Transition = serde_json::from_str(r#"{"ease": "wobble"}"#).unwrap();
        assert_eq!(t.ease.unwrap().resolve(), KeyframeEase::default());
    }
}
