//! Transform strings
//!
//! Composes individual transform properties (`x`, `scale`, `rotateY`, ...)
//! into a CSS `transform` string and parses a `transform` string back into
//! those properties.

use crate::value_types::{format_value, value_type};
use glide_core::{MotionError, Result, Value};
use indexmap::IndexMap;
use nom::{
    branch::alt,
    bytes::complete::{take_while1, take_while},
    character::complete::{char, multispace0, multispace1},
    combinator::{all_consuming, map},
    multi::{many0, separated_list1},
    sequence::{delimited, terminated},
    Finish, IResult,
};

/// Transform keys in build order: perspective, translate, scale, rotate, skew
pub const TRANSFORM_KEYS: &[&str] = &[
    "transformPerspective",
    "perspective",
    "x",
    "y",
    "z",
    "translateX",
    "translateY",
    "translateZ",
    "scale",
    "scaleX",
    "scaleY",
    "scaleZ",
    "rotate",
    "rotateX",
    "rotateY",
    "rotateZ",
    "skew",
    "skewX",
    "skewY",
];

pub const ORIGIN_KEYS: &[&str] = &["originX", "originY", "originZ"];

pub fn is_transform_key(key: &str) -> bool {
    TRANSFORM_KEYS.contains(&key)
}

pub fn is_origin_key(key: &str) -> bool {
    ORIGIN_KEYS.contains(&key)
}

/// CSS function name for a transform key
fn function_name(key: &str) -> &str {
    match key {
        "x" => "translateX",
        "y" => "translateY",
        "z" => "translateZ",
        "transformPerspective" => "perspective",
        other => other,
    }
}

/// Whether a translate axis carries a non-zero offset
/// Build a `transform` string from the transform keys in `props`
///
/// With hardware acceleration, `x`/`y`/`z` are folded into a leading
/// `translate3d()` whenever any of them is present, zero included, so the
/// string parses back to the same axes. `translateZ(0)` is emitted when
/// none of them is present.
pub fn build_transform(props: &IndexMap<String, Value>, hardware_acceleration: bool) -> String {
    let mut parts: Vec<String> = Vec::new();

    let axes = ["x", "y", "z"].map(|k| props.get(k));
    let accelerated = hardware_acceleration && axes.iter().any(Option::is_some);
    if accelerated {
        let coords: Vec<String> = ["x", "y", "z"]
            .iter()
            .zip(axes)
            .map(|(key, v)| format_value(key, v.unwrap_or(&Value::Number(0.0))))
            .collect();
        parts.push(format!("translate3d({})", coords.join(", ")));
    }

    for key in TRANSFORM_KEYS {
        if hardware_acceleration && matches!(*key, "x" | "y" | "z") {
            continue;
        }
        if let Some(value) = props.get(*key) {
            parts.push(format!("{}({})", function_name(key), format_value(key, value)));
        }
    }

    if hardware_acceleration && !accelerated {
        parts.push("translateZ(0)".to_string());
    }

    parts.join(" ")
}

/// Build a `transform-origin` string, or `None` when no origin key is present
pub fn build_transform_origin(props: &IndexMap<String, Value>) -> Option<String> {
    if !ORIGIN_KEYS.iter().any(|k| props.contains_key(*k)) {
        return None;
    }
    let axis = |key: &str, default: &str| {
        props
            .get(key)
            .map(|v| format_value(key, v))
            .unwrap_or_else(|| default.to_string())
    };
    Some(format!(
        "{} {} {}",
        axis("originX", "50%"),
        axis("originY", "50%"),
        axis("originZ", "0")
    ))
}

/// Arguments of one parsed transform function
#[derive(Clone, Debug, PartialEq)]
pub enum TransformArgs {
    Scalar(Value),
    Sequence(Vec<Value>),
}

impl TransformArgs {
    fn values(&self) -> Vec<Value> {
        match self {
            TransformArgs::Scalar(v) => vec![v.clone()],
            TransformArgs::Sequence(vs) => vs.clone(),
        }
    }
}

fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_')(input)
}

fn argument(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c != ',' && c != ')' && !c.is_whitespace())(input)
}

fn argument_separator(input: &str) -> IResult<&str, ()> {
    alt((
        map(delimited(multispace0, char(','), multispace0), |_| ()),
        map(multispace1, |_| ()),
    ))(input)
}

fn transform_function(input: &str) -> IResult<&str, (&str, Vec<&str>)> {
    let (input, name) = identifier(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = char('(')(input)?;
    let (input, _) = multispace0(input)?;
    let (input, args) = separated_list1(argument_separator, argument)(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = char(')')(input)?;
    Ok((input, (name, args)))
}

/// `px`/`deg` values become numbers; anything else that isn't a bare number stays text
fn argument_value(arg: &str) -> Value {
    let bare = arg
        .strip_suffix("px")
        .or_else(|| arg.strip_suffix("deg"))
        .unwrap_or(arg);
    match bare.parse::<f64>() {
        Ok(n) => Value::Number(n),
        Err(_) => Value::Text(arg.to_string()),
    }
}

/// Parse a `transform` string into its functions, in order
pub fn parse_transform(input: &str) -> Result<IndexMap<String, TransformArgs>> {
    let mut parser = all_consuming(delimited(
        multispace0,
        many0(terminated(transform_function, take_while(char::is_whitespace))),
        multispace0,
    ));

    let (_, functions) = parser(input)
        .finish()
        .map_err(|e: nom::error::Error<&str>| MotionError::InvalidTransform {
            value: input.to_string(),
            reason: format!("unexpected input at {:?}", e.input),
        })?;

    Ok(functions
        .into_iter()
        .map(|(name, args)| {
            let mut values: Vec<Value> = args.into_iter().map(argument_value).collect();
            let args = if values.len() == 1 {
                TransformArgs::Scalar(values.remove(0))
            } else {
                TransformArgs::Sequence(values)
            };
            (name.to_string(), args)
        })
        .collect())
}

/// Map parsed transform functions onto transform properties
pub fn state_from_transform(functions: &IndexMap<String, TransformArgs>) -> IndexMap<String, Value> {
    let mut state = IndexMap::new();

    for (name, args) in functions {
        let values = args.values();
        let Some(first) = values.first().cloned() else {
            continue;
        };
        match name.as_str() {
            "translate3d" => {
                for (i, axis) in ["x", "y", "z"].iter().enumerate() {
                    let v = match args {
                        TransformArgs::Scalar(v) => Some(v.clone()),
                        TransformArgs::Sequence(vs) => vs.get(i).cloned(),
                    };
                    if let Some(v) = v {
                        state.insert(axis.to_string(), v);
                    }
                }
            }
            "translate" => {
                for (axis, v) in ["x", "y"].iter().zip(values) {
                    state.insert(axis.to_string(), v);
                }
            }
            "translateX" => {
                state.insert("x".to_string(), first);
            }
            "translateY" => {
                state.insert("y".to_string(), first);
            }
            "translateZ" => {
                state.insert("z".to_string(), first);
            }
            "scale" | "skew" if values.len() > 1 => {
                for (axis, v) in ["X", "Y"].iter().zip(values) {
                    state.insert(format!("{name}{axis}"), v);
                }
            }
            other if value_type(other).is_some() => {
                state.insert(other.to_string(), first);
            }
            other => {
                tracing::warn!(function = other, "ignoring unsupported transform function");
            }
        }
    }

    state
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(entries: &[(&str, f64)]) -> IndexMap<String, Value> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), Value::Number(*v)))
            .collect()
    }

    #[test]
    fn test_build_order() {
        let p = props(&[("rotate", 45.0), ("scale", 2.0), ("x", 10.0)]);
        assert_eq!(
            build_transform(&p, false),
            "translateX(10px) scale(2) rotate(45deg)"
        );
    }

    #[test]
    fn test_hardware_acceleration() {
        let p = props(&[("x", 10.0), ("scale", 2.0)]);
        assert_eq!(
            build_transform(&p, true),
            "translate3d(10px, 0px, 0px) scale(2)"
        );

        let p = props(&[("scale", 2.0)]);
        assert_eq!(build_transform(&p, true), "scale(2) translateZ(0)");

        let p = props(&[("rotate", 5.0)]);
        assert_eq!(build_transform(&p, true), "rotate(5deg) translateZ(0)");

        // A zero offset still counts as present
        let p = props(&[("x", 0.0), ("rotate", 5.0)]);
        assert_eq!(
            build_transform(&p, true),
            "translate3d(0px, 0px, 0px) rotate(5deg)"
        );
    }

    #[test]
    fn test_transform_origin() {
        assert_eq!(build_transform_origin(&props(&[("scale", 1.0)])), None);
        assert_eq!(
            build_transform_origin(&props(&[("originX", 0.0)])).as_deref(),
            Some("0% 50% 0")
        );
    }

    #[test]
    fn test_parse_transform() {
        let parsed = parse_transform("translateX(10px) rotate(5deg)").unwrap();
        assert_eq!(parsed["translateX"], TransformArgs::Scalar(Value::Number(10.0)));
        assert_eq!(parsed["rotate"], TransformArgs::Scalar(Value::Number(5.0)));

        let parsed = parse_transform("translate3d(1px, 2px, 3px)").unwrap();
        assert_eq!(
            parsed["translate3d"],
            TransformArgs::Sequence(vec![
                Value::Number(1.0),
                Value::Number(2.0),
                Value::Number(3.0)
            ])
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_transform("rotate(5deg"),
            Err(MotionError::InvalidTransform { .. })
        ));
        assert!(parse_transform("").unwrap().is_empty());
    }

    #[test]
    fn test_state_from_transform() {
        let state =
            state_from_transform(&parse_transform("translateX(10px) rotate(5deg)").unwrap());
        assert_eq!(state, props(&[("x", 10.0), ("rotate", 5.0)]));

        let state = state_from_transform(
            &parse_transform("translate(1px, 2px) scale(2, 3) skew(4deg, 5deg)").unwrap(),
        );
        assert_eq!(
            state,
            props(&[
                ("x", 1.0),
                ("y", 2.0),
                ("scaleX", 2.0),
                ("scaleY", 3.0),
                ("skewX", 4.0),
                ("skewY", 5.0)
            ])
        );
    }

    #[test]
    fn test_round_trip() {
        let original = props(&[
            ("x", 10.0),
            ("y", -20.0),
            ("z", 5.0),
            ("scale", 1.5),
            ("rotate", 45.0),
            ("skew", 10.0),
        ]);
        for accelerate in [false, true] {
            let built = build_transform(&original, accelerate);
            let state = state_from_transform(&parse_transform(&built).unwrap());
            for (key, value) in &original {
                assert_eq!(state.get(key), Some(value), "{key} via {built}");
            }
        }
    }
}
