//! Animation engine
//!
//! [`get_animation`] turns one property's target and transition into a
//! start function for [`MotionValue::start`]: either an immediate set (for
//! values that can't be interpolated, or `type: false`) or a playback on
//! the frame scheduler.

use crate::transition::{resolve_transition, ResolvedTransition, Transition, TransitionProfile};
use glide_animation::{
    animatable_none, animate, is_complex, AnimateOptions, CompleteFn, Controls, MotionValue,
};
use glide_core::{Target, Value};

/// Starts an animation given its completion callback
pub type StartFn = Box<dyn FnOnce(CompleteFn) -> Controls>;

/// Whether `value` can be interpolated for `key`
///
/// Numbers and strings holding numbers or colors are; `url(...)` values and
/// anything on `zIndex` are not.
pub fn is_animatable(key: &str, value: &Value) -> bool {
    if key == "zIndex" {
        return false;
    }
    match value {
        Value::Number(_) => true,
        Value::Text(s) => is_complex(s) && !s.trim_start().starts_with("url("),
    }
}

fn is_target_animatable(key: &str, target: &Target) -> bool {
    match target {
        Target::Single(value) => is_animatable(key, value),
        Target::Keyframes(_) => key != "zIndex",
    }
}

/// Fill keyframe wildcards: a leading gap takes the origin, later gaps the
/// keyframe before them
fn hydrate_keyframes(frames: &[Option<Value>], origin: &Value) -> Vec<Value> {
    let mut hydrated: Vec<Value> = Vec::with_capacity(frames.len());
    for frame in frames {
        let value = match frame {
            Some(value) => value.clone(),
            None => hydrated.last().unwrap_or(origin).clone(),
        };
        hydrated.push(value);
    }
    hydrated
}

/// Build the start function animating `value` towards `target`
///
/// `transition` is the variant-level transition; its per-property override
/// for `key`, if any, is applied here. On completion the transition's
/// `on_complete` runs first, then `on_complete`, then the completion
/// callback handed to the start function.
pub fn get_animation(
    key: &str,
    value: &MotionValue,
    target: &Target,
    transition: &Transition,
    on_complete: Option<CompleteFn>,
) -> StartFn {
    let transition = transition.for_property(key);
    let resolved = resolve_transition(key, target, &transition);

    let mut origin = resolved.from.clone().unwrap_or_else(|| value.get());
    let target_animatable = is_target_animatable(key, target);

    if origin.is_none_keyword() && target_animatable {
        if let Some(Value::Text(s)) = target.final_value() {
            origin = Value::Text(animatable_none(s));
        }
    }

    let checked_origin = match target {
        Target::Keyframes(frames) => frames.first().cloned().flatten(),
        Target::Single(_) => None,
    }
    .unwrap_or_else(|| origin.clone());

    let immediate = matches!(resolved.profile, TransitionProfile::Immediate)
        || !target_animatable
        || !is_animatable(key, &checked_origin);

    if immediate {
        let final_value = target.final_value().cloned().unwrap_or(origin);
        tracing::trace!(key, value = %final_value, "immediate set");
        let value = value.clone();
        return Box::new(move |complete: CompleteFn| {
            value.set(final_value);
            if let Some(f) = &transition.on_complete {
                f();
            }
            if let Some(f) = on_complete {
                f();
            }
            complete();
            Controls::noop()
        });
    }

    let values = match target {
        Target::Single(v) => vec![v.clone()],
        Target::Keyframes(frames) => hydrate_keyframes(frames, &origin),
    };

    let value = value.clone();
    let key = key.to_string();
    Box::new(move |complete: CompleteFn| {
        let ResolvedTransition {
            profile,
            delay,
            repeat,
            repeat_type,
            repeat_delay,
            velocity,
            ..
        } = resolved;
        let TransitionProfile::Animated(kind) = profile else {
            complete();
            return Controls::noop();
        };

        let velocity = velocity
            .filter(|v| *v != 0.0)
            .unwrap_or_else(|| value.velocity());

        let options = if values.len() > 1 {
            AnimateOptions::keyframes(values, kind)
        } else {
            let to = values.into_iter().next().unwrap_or_else(|| origin.clone());
            AnimateOptions::new(origin, to, kind)
        };

        tracing::trace!(key, velocity, delay, "start animation");

        let on_update = transition.on_update.clone();
        let variant_complete = transition.on_complete.clone();
        let writer = value.clone();
        let options = options
            .with_velocity(velocity)
            .with_delay(delay)
            .with_repeat(repeat, repeat_type, repeat_delay)
            .on_update(move |v| {
                writer.set(v.clone());
                if let Some(f) = &on_update {
                    f(v);
                }
            })
            .on_complete(move || {
                if let Some(f) = variant_complete {
                    f();
                }
                if let Some(f) = on_complete {
                    f();
                }
                complete();
            });

        animate(value.scheduler(), options)
    })
}
