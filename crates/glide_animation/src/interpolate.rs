//! Interpolation between animatable values
//!
//! [`Interpolate`] covers plain numeric types; [`Mixer`] picks the right
//! strategy for a pair of [`Value`]s (number, color, complex string, or an
//! immediate switch when the two can't be blended); [`Interpolator`] maps an
//! input range onto a sequence of values with per-segment easing.

use crate::color::Rgba;
use crate::complex::ComplexValue;
use crate::easing::Easing;
use glide_core::Value;

/// Trait for values that can be linearly interpolated
pub trait Interpolate: Clone {
    /// Linearly interpolate between self and other by factor t (0.0 to 1.0)
    fn lerp(&self, other: &Self, t: f64) -> Self;

    /// Check if two values are approximately equal (for settling detection)
    fn approx_eq(&self, other: &Self, epsilon: f64) -> bool;
}

impl Interpolate for f64 {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        self + (other - self) * t
    }

    fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        (self - other).abs() < epsilon
    }
}

impl Interpolate for Rgba {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        self.mix(other, t)
    }

    fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        (self.r - other.r).abs() < epsilon
            && (self.g - other.g).abs() < epsilon
            && (self.b - other.b).abs() < epsilon
            && (self.a - other.a).abs() < epsilon
    }
}

/// Progress of `value` between `from` and `to`, 0..1 when in range
pub fn progress(from: f64, to: f64, value: f64) -> f64 {
    let span = to - from;
    if span == 0.0 {
        1.0
    } else {
        (value - from) / span
    }
}

/// Blending strategy for one pair of values
#[derive(Clone, Debug)]
pub enum Mixer {
    Number(f64, f64),
    Color(Rgba, Rgba),
    Complex(ComplexValue, ComplexValue),
    /// Jumps to the target as soon as progress leaves zero
    Immediate(Value, Value),
}

impl Mixer {
    pub fn new(from: &Value, to: &Value) -> Self {
        if let (Some(a), Some(b)) = (plain_number(from), plain_number(to)) {
            return Mixer::Number(a, b);
        }

        if let (Some(a), Some(b)) = (from.as_str(), to.as_str()) {
            if let (Some(a), Some(b)) = (Rgba::parse(a), Rgba::parse(b)) {
                return Mixer::Color(a, b);
            }
            let (a, b) = (ComplexValue::parse(a), ComplexValue::parse(b));
            if !a.tokens().is_empty() && a.is_compatible(&b) {
                return Mixer::Complex(a, b);
            }
        }

        tracing::trace!(?from, ?to, "values can't be blended, switching immediately");
        Mixer::Immediate(from.clone(), to.clone())
    }

    pub fn mix(&self, t: f64) -> Value {
        match self {
            Mixer::Number(a, b) => Value::Number(a.lerp(b, t)),
            Mixer::Color(a, b) => Value::Text(a.lerp(b, t).to_string()),
            Mixer::Complex(a, b) => match a.mix(b, t) {
                Some(s) => Value::Text(s),
                None => Value::Text(b.to_string()),
            },
            Mixer::Immediate(a, b) => {
                if t > 0.0 {
                    b.clone()
                } else {
                    a.clone()
                }
            }
        }
    }
}

/// A number, or a string that is nothing but a number
fn plain_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => Some(*n),
        Value::Text(s) => s.trim().parse().ok(),
    }
}

/// Maps an input range onto a list of values
#[derive(Clone, Debug)]
pub struct Interpolator {
    input: Vec<f64>,
    mixers: Vec<Mixer>,
    easings: Vec<Easing>,
    clamp: bool,
}

impl Interpolator {
    /// `input` and `output` must be the same length; a single entry yields a constant.
    pub fn new(input: &[f64], output: &[Value]) -> Self {
        let len = input.len().min(output.len());
        let mut input = input[..len].to_vec();
        let mut output = output[..len].to_vec();

        if len > 1 && input[0] > input[len - 1] {
            input.reverse();
            output.reverse();
        }

        let mixers = match output.as_slice() {
            [] => vec![Mixer::Number(0.0, 0.0)],
            [only] => vec![Mixer::Immediate(only.clone(), only.clone())],
            _ => output
                .windows(2)
                .map(|pair| Mixer::new(&pair[0], &pair[1]))
                .collect(),
        };

        Self {
            input,
            mixers,
            easings: Vec::new(),
            clamp: true,
        }
    }

    /// Easing per segment; shorter lists wrap around
    pub fn with_ease(mut self, easings: Vec<Easing>) -> Self {
        self.easings = easings;
        self
    }

    pub fn with_clamp(mut self, clamp: bool) -> Self {
        self.clamp = clamp;
        self
    }

    pub fn at(&self, v: f64) -> Value {
        if self.input.len() < 2 {
            return self.mixers[0].mix(1.0);
        }

        let first = self.input[0];
        let last = self.input[self.input.len() - 1];
        let v = if self.clamp { v.clamp(first, last) } else { v };

        let segment = self
            .input
            .iter()
            .skip(1)
            .take(self.mixers.len() - 1)
            .take_while(|&&edge| v >= edge)
            .count();

        let t = progress(self.input[segment], self.input[segment + 1], v);
        let eased = if self.easings.is_empty() {
            t
        } else {
            self.easings[segment % self.easings.len()].apply(t)
        };
        self.mixers[segment].mix(eased)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(v: f64) -> Value {
        Value::Number(v)
    }

    #[test]
    fn test_number_segments() {
        let interp = Interpolator::new(&[0.0, 0.5, 1.0], &[n(0.0), n(100.0), n(0.0)]);
        assert_eq!(interp.at(0.25), n(50.0));
        assert_eq!(interp.at(0.5), n(100.0));
        assert_eq!(interp.at(0.75), n(50.0));
    }

    #[test]
    fn test_clamping() {
        let interp = Interpolator::new(&[0.0, 100.0], &[n(0.0), n(1.0)]);
        assert_eq!(interp.at(200.0), n(1.0));
        assert_eq!(interp.at(-5.0), n(0.0));

        let free = interp.with_clamp(false);
        assert_eq!(free.at(200.0), n(2.0));
    }

    #[test]
    fn test_reversed_input() {
        let interp = Interpolator::new(&[1.0, 0.0], &[n(10.0), n(0.0)]);
        assert_eq!(interp.at(0.25), n(2.5));
    }

    #[test]
    fn test_segment_easing() {
        let interp =
            Interpolator::new(&[0.0, 1.0], &[n(0.0), n(1.0)]).with_ease(vec![Easing::EaseIn]);
        let Value::Number(mid) = interp.at(0.5) else {
            panic!("expected number");
        };
        assert!(mid < 0.5);
    }

    #[test]
    fn test_mixer_selection() {
        assert!(matches!(Mixer::new(&n(0.0), &"5".into()), Mixer::Number(..)));
        assert!(matches!(
            Mixer::new(&"#000".into(), &"#fff".into()),
            Mixer::Color(..)
        ));
        assert!(matches!(
            Mixer::new(&"0px".into(), &"10px".into()),
            Mixer::Complex(..)
        ));
        assert!(matches!(
            Mixer::new(&"auto".into(), &"10px".into()),
            Mixer::Immediate(..)
        ));
    }

    #[test]
    fn test_immediate_switch() {
        let mixer = Mixer::new(&"block".into(), &"none".into());
        assert_eq!(mixer.mix(0.0), Value::from("block"));
        assert_eq!(mixer.mix(0.01), Value::from("none"));
    }
}
