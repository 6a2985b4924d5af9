//! Animated property values
//!
//! A property holds either a number (`opacity: 0.5`, `x: 100`) or a string
//! (`"10px"`, `"#ff0000"`, `"translate(10px, 0)"`). Animation targets are
//! tagged explicitly as a single value or a keyframe sequence.

use nom::{
    branch::alt,
    character::complete::{char, digit0, digit1, one_of},
    combinator::{opt, recognize},
    sequence::{pair, tuple},
    IResult,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A property value
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    /// Numeric reading of the value
    ///
    /// Strings are read like CSS tooling reads them: the leading float is
    /// taken and any unit suffix ignored (`"10px"` → 10).
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(s) => parse_float(s),
        }
    }

    /// Whether the value is stored as a number
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Number(_) => None,
        }
    }

    /// Whether this is the `none` keyword (or empty)
    pub fn is_none_keyword(&self) -> bool {
        match self {
            Value::Text(s) => {
                let s = s.trim();
                s.is_empty() || s == "none" || s == "0 0"
            }
            Value::Number(_) => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// Format a number without a trailing `.0` and without negative zero
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }
    // Round away float noise from interpolation (e.g. 0.30000000000000004)
    let rounded = (n * 1e6).round() / 1e6;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        format!("{}", rounded)
    }
}

/// Parse the leading float of a string, ignoring whatever follows
///
/// Returns `None` when the string doesn't start with a number.
pub fn parse_float(s: &str) -> Option<f64> {
    let (_, number) = leading_float(s.trim_start()).ok()?;
    number.parse::<f64>().ok()
}

/// `[+-] (digits [. digits] | . digits) [e [+-] digits]`
///
/// Unlike `nom::number::complete::recognize_float` a dangling exponent
/// marker is left unconsumed, so `"1em"` reads as `1`.
fn leading_float(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        opt(one_of("+-")),
        alt((
            recognize(pair(digit1, opt(pair(char('.'), digit0)))),
            recognize(pair(char('.'), digit1)),
        )),
        opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
    )))(input)
}

/// What a property animates towards
///
/// A `None` entry in a keyframe sequence is a wildcard: the first keyframe
/// may be left empty to start from wherever the value currently is.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Target {
    Single(Value),
    Keyframes(Vec<Option<Value>>),
}

impl Target {
    pub fn is_keyframes(&self) -> bool {
        matches!(self, Target::Keyframes(_))
    }

    /// The value the animation settles on
    pub fn final_value(&self) -> Option<&Value> {
        match self {
            Target::Single(v) => Some(v),
            Target::Keyframes(frames) => frames.iter().rev().find_map(|f| f.as_ref()),
        }
    }

    pub fn as_single(&self) -> Option<&Value> {
        match self {
            Target::Single(v) => Some(v),
            Target::Keyframes(_) => None,
        }
    }
}

impl From<Value> for Target {
    fn from(v: Value) -> Self {
        Target::Single(v)
    }
}

impl From<f64> for Target {
    fn from(n: f64) -> Self {
        Target::Single(Value::Number(n))
    }
}

impl From<i32> for Target {
    fn from(n: i32) -> Self {
        Target::Single(Value::Number(n as f64))
    }
}

impl From<&str> for Target {
    fn from(s: &str) -> Self {
        Target::Single(Value::from(s))
    }
}

impl From<Vec<f64>> for Target {
    fn from(frames: Vec<f64>) -> Self {
        Target::Keyframes(frames.into_iter().map(|n| Some(Value::Number(n))).collect())
    }
}

impl From<Vec<Value>> for Target {
    fn from(frames: Vec<Value>) -> Self {
        Target::Keyframes(frames.into_iter().map(Some).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_float_prefixes() {
        assert_eq!(parse_float("10px"), Some(10.0));
        assert_eq!(parse_float("-2.5deg"), Some(-2.5));
        assert_eq!(parse_float(".5"), Some(0.5));
        assert_eq!(parse_float("1e3ms"), Some(1000.0));
        assert_eq!(parse_float("3."), Some(3.0));
        assert_eq!(parse_float("red"), None);
        assert_eq!(parse_float("#fff"), None);
        assert_eq!(parse_float("1em"), Some(1.0));
        assert_eq!(parse_float("  2.5E-1x"), Some(0.25));
        assert_eq!(parse_float("-.5"), Some(-0.5));
        assert_eq!(parse_float("-"), None);
        assert_eq!(parse_float(""), None);
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::from(10.0).to_string(), "10");
        assert_eq!(Value::from(0.5).to_string(), "0.5");
        assert_eq!(Value::from(-0.0).to_string(), "0");
        assert_eq!(Value::from(0.1 + 0.2).to_string(), "0.3");
        assert_eq!(Value::from("50%").to_string(), "50%");
    }

    #[test]
    fn test_target_deserialize_shapes() {
        let single: Target = serde_json::from_str("1").unwrap();
        assert_eq!(single, Target::Single(Value::Number(1.0)));

        let text: Target = serde_json::from_str("\"#fff\"").unwrap();
        assert_eq!(text, Target::Single(Value::from("#fff")));

        let frames: Target = serde_json::from_str("[null, 10, \"20px\"]").unwrap();
        assert_eq!(
            frames,
            Target::Keyframes(vec![None, Some(Value::from(10.0)), Some(Value::from("20px"))])
        );
        assert_eq!(frames.final_value(), Some(&Value::from("20px")));
    }

    #[test]
    fn test_none_keyword() {
        assert!(Value::from("none").is_none_keyword());
        assert!(Value::from("").is_none_keyword());
        assert!(!Value::from(0.0).is_none_keyword());
        assert!(!Value::from("0px").is_none_keyword());
    }
}
