//! Easing curves
//!
//! Named curves, cubic-bezier control tuples and code-supplied functions.
//! Every curve maps progress in `[0, 1]` to eased progress; back and
//! anticipate curves overshoot outside that range on purpose.

use std::fmt;
use std::rc::Rc;

const BACK_POWER: f64 = 1.525;

/// An easing function
#[derive(Clone, Default)]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    CircIn,
    CircOut,
    CircInOut,
    BackIn,
    BackOut,
    BackInOut,
    Anticipate,
    BounceIn,
    BounceOut,
    BounceInOut,
    /// CSS-style `cubic-bezier(x1, y1, x2, y2)`
    CubicBezier(f64, f64, f64, f64),
    /// Caller-supplied curve
    Custom(Rc<dyn Fn(f64) -> f64>),
}

impl Easing {
    /// Look up a named curve
    ///
    /// Unknown names return `None`; callers fall back to their own default.
    pub fn from_name(name: &str) -> Option<Easing> {
        let easing = match name {
            "linear" => Easing::Linear,
            "easeIn" => Easing::EaseIn,
            "easeOut" => Easing::EaseOut,
            "easeInOut" => Easing::EaseInOut,
            "circIn" => Easing::CircIn,
            "circOut" => Easing::CircOut,
            "circInOut" => Easing::CircInOut,
            "backIn" => Easing::BackIn,
            "backOut" => Easing::BackOut,
            "backInOut" => Easing::BackInOut,
            "anticipate" => Easing::Anticipate,
            "bounceIn" => Easing::BounceIn,
            "bounceOut" => Easing::BounceOut,
            "bounceInOut" => Easing::BounceInOut,
            _ => return None,
        };
        Some(easing)
    }

    pub fn custom(f: impl Fn(f64) -> f64 + 'static) -> Self {
        Easing::Custom(Rc::new(f))
    }

    /// Apply the curve to progress `p`
    pub fn apply(&self, p: f64) -> f64 {
        match self {
            Easing::Linear => p,
            Easing::EaseIn => ease_in(p),
            Easing::EaseOut => reverse(ease_in, p),
            Easing::EaseInOut => mirror(ease_in, p),
            Easing::CircIn => circ_in(p),
            Easing::CircOut => reverse(circ_in, p),
            Easing::CircInOut => mirror(circ_in, p),
            Easing::BackIn => back_in(p),
            Easing::BackOut => reverse(back_in, p),
            Easing::BackInOut => mirror(back_in, p),
            Easing::Anticipate => anticipate(p),
            Easing::BounceIn => 1.0 - bounce_out(1.0 - p),
            Easing::BounceOut => bounce_out(p),
            Easing::BounceInOut => {
                if p < 0.5 {
                    0.5 * (1.0 - bounce_out(1.0 - p * 2.0))
                } else {
                    0.5 * bounce_out(p * 2.0 - 1.0) + 0.5
                }
            }
            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier(*x1, *y1, *x2, *y2, p),
            Easing::Custom(f) => f(p),
        }
    }
}

impl fmt::Debug for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Easing::Linear => f.write_str("Linear"),
            Easing::EaseIn => f.write_str("EaseIn"),
            Easing::EaseOut => f.write_str("EaseOut"),
            Easing::EaseInOut => f.write_str("EaseInOut"),
            Easing::CircIn => f.write_str("CircIn"),
            Easing::CircOut => f.write_str("CircOut"),
            Easing::CircInOut => f.write_str("CircInOut"),
            Easing::BackIn => f.write_str("BackIn"),
            Easing::BackOut => f.write_str("BackOut"),
            Easing::BackInOut => f.write_str("BackInOut"),
            Easing::Anticipate => f.write_str("Anticipate"),
            Easing::BounceIn => f.write_str("BounceIn"),
            Easing::BounceOut => f.write_str("BounceOut"),
            Easing::BounceInOut => f.write_str("BounceInOut"),
            Easing::CubicBezier(a, b, c, d) => write!(f, "CubicBezier({a}, {b}, {c}, {d})"),
            Easing::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl PartialEq for Easing {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Easing::CubicBezier(a1, b1, c1, d1), Easing::CubicBezier(a2, b2, c2, d2)) => {
                a1 == a2 && b1 == b2 && c1 == c2 && d1 == d2
            }
            (Easing::Custom(a), Easing::Custom(b)) => Rc::ptr_eq(a, b),
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

fn ease_in(p: f64) -> f64 {
    p * p
}

fn circ_in(p: f64) -> f64 {
    1.0 - (p.clamp(-1.0, 1.0)).acos().sin()
}

fn back_in(p: f64) -> f64 {
    p * p * ((BACK_POWER + 1.0) * p - BACK_POWER)
}

fn anticipate(p: f64) -> f64 {
    let p = p * 2.0;
    if p < 1.0 {
        0.5 * back_in(p)
    } else {
        0.5 * (2.0 - 2f64.powf(-10.0 * (p - 1.0)))
    }
}

fn bounce_out(p: f64) -> f64 {
    const TA: f64 = 4.0 / 11.0;
    const TB: f64 = 8.0 / 11.0;
    const TC: f64 = 9.0 / 10.0;
    const CA: f64 = 4356.0 / 361.0;
    const CB: f64 = 35442.0 / 1805.0;
    const CC: f64 = 16061.0 / 1805.0;

    if p == 0.0 || p == 1.0 {
        return p;
    }
    let p2 = p * p;
    if p < TA {
        7.5625 * p2
    } else if p < TB {
        9.075 * p2 - 9.9 * p + 3.4
    } else if p < TC {
        CA * p2 - CB * p + CC
    } else {
        10.8 * p * p - 20.52 * p + 10.72
    }
}

/// Turn an ease-in into an ease-out
fn reverse(f: fn(f64) -> f64, p: f64) -> f64 {
    1.0 - f(1.0 - p)
}

/// Turn an ease-in into an ease-in-out
fn mirror(f: fn(f64) -> f64, p: f64) -> f64 {
    if p <= 0.5 {
        f(2.0 * p) / 2.0
    } else {
        (2.0 - f(2.0 * (1.0 - p))) / 2.0
    }
}

// ============================================================================
// Cubic bezier
// ============================================================================

const NEWTON_ITERATIONS: usize = 8;
const NEWTON_MIN_SLOPE: f64 = 0.001;
const SUBDIVISION_PRECISION: f64 = 0.000_000_1;
const SUBDIVISION_MAX_ITERATIONS: usize = 12;

fn calc_bezier(t: f64, a1: f64, a2: f64) -> f64 {
    (((1.0 - 3.0 * a2 + 3.0 * a1) * t + (3.0 * a2 - 6.0 * a1)) * t + 3.0 * a1) * t
}

fn bezier_slope(t: f64, a1: f64, a2: f64) -> f64 {
    3.0 * (1.0 - 3.0 * a2 + 3.0 * a1) * t * t + 2.0 * (3.0 * a2 - 6.0 * a1) * t + 3.0 * a1
}

/// Solve the curve's parameter `t` for horizontal position `x`
fn solve_t(x: f64, x1: f64, x2: f64) -> f64 {
    // Newton-Raphson from a linear guess
    let mut t = x;
    for _ in 0..NEWTON_ITERATIONS {
        let slope = bezier_slope(t, x1, x2);
        if slope.abs() < NEWTON_MIN_SLOPE {
            break;
        }
        let current = calc_bezier(t, x1, x2) - x;
        if current.abs() < SUBDIVISION_PRECISION {
            return t;
        }
        t -= current / slope;
    }

    // Fall back to binary subdivision
    let (mut lower, mut upper) = (0.0, 1.0);
    t = x;
    for _ in 0..SUBDIVISION_MAX_ITERATIONS {
        let current = calc_bezier(t, x1, x2) - x;
        if current.abs() < SUBDIVISION_PRECISION {
            break;
        }
        if current > 0.0 {
            upper = t;
        } else {
            lower = t;
        }
        t = (upper + lower) / 2.0;
    }
    t
}

fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64, p: f64) -> f64 {
    if x1 == y1 && x2 == y2 {
        return p;
    }
    if p <= 0.0 || p >= 1.0 {
        return p;
    }
    calc_bezier(solve_t(p, x1, x2), y1, y2)
}
