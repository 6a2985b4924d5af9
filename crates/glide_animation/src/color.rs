//! Color parsing and mixing
//!
//! Hex (`#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`), `rgb()`/`rgba()`,
//! `hsl()`/`hsla()` and `transparent`. Colors are serialized as
//! `rgba(r, g, b, a)` and mixed in linear light so midpoints don't go muddy.

use glide_core::value::format_number;
use nom::{
    branch::alt,
    bytes::complete::{tag_no_case, take_while_m_n},
    character::complete::{char, multispace0, multispace1},
    combinator::{all_consuming, map, opt},
    number::complete::double,
    sequence::delimited,
    IResult,
};
use std::fmt;

/// An RGBA color with 0–255 channels and 0–1 alpha
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a CSS color string
    pub fn parse(input: &str) -> Option<Rgba> {
        all_consuming(delimited(multispace0, color, multispace0))(input)
            .ok()
            .map(|(_, c)| c)
    }

    /// Same color with zero alpha and zero channels
    pub fn transparent() -> Self {
        Self::TRANSPARENT
    }

    /// Mix towards `to` by `t` in linear light
    pub fn mix(&self, to: &Rgba, t: f64) -> Rgba {
        let channel = |from: f64, to: f64| {
            let from_sq = from * from;
            (t * (to * to - from_sq) + from_sq).max(0.0).sqrt()
        };
        Rgba {
            r: channel(self.r, to.r),
            g: channel(self.g, to.g),
            b: channel(self.b, to.b),
            a: self.a + (to.a - self.a) * t,
        }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rgba({}, {}, {}, {})",
            format_number(self.r.clamp(0.0, 255.0).round()),
            format_number(self.g.clamp(0.0, 255.0).round()),
            format_number(self.b.clamp(0.0, 255.0).round()),
            format_number(self.a.clamp(0.0, 1.0))
        )
    }
}

/// Whether the whole string is a color
pub fn is_color(input: &str) -> bool {
    Rgba::parse(input).is_some()
}

/// Parse one color at the start of `input`
pub fn color(input: &str) -> IResult<&str, Rgba> {
    alt((
        hex_color,
        rgb_color,
        hsl_color,
        map(tag_no_case("transparent"), |_| Rgba::TRANSPARENT),
    ))(input)
}

fn hex_color(input: &str) -> IResult<&str, Rgba> {
    let (input, _) = char('#')(input)?;
    let (input, digits) = take_while_m_n(3, 8, |c: char| c.is_ascii_hexdigit())(input)?;

    let nibble = |i: usize| u8::from_str_radix(&digits[i..i + 1], 16).unwrap_or(0) as f64 * 17.0;
    let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).unwrap_or(0) as f64;

    let rgba = match digits.len() {
        3 => Rgba::new(nibble(0), nibble(1), nibble(2), 1.0),
        4 => Rgba::new(nibble(0), nibble(1), nibble(2), nibble(3) / 255.0),
        6 => Rgba::new(byte(0), byte(2), byte(4), 1.0),
        8 => Rgba::new(byte(0), byte(2), byte(4), byte(6) / 255.0),
        _ => {
            return Err(nom::Err::Error(nom::error::Error::new(
                input,
                nom::error::ErrorKind::TakeWhileMN,
            )))
        }
    };
    Ok((input, rgba))
}

/// Separator between color function arguments: comma, slash or whitespace
fn separator(input: &str) -> IResult<&str, ()> {
    alt((
        map(delimited(multispace0, char(','), multispace0), |_| ()),
        map(delimited(multispace0, char('/'), multispace0), |_| ()),
        map(multispace1, |_| ()),
    ))(input)
}

/// A number with an optional `%` suffix
fn component(input: &str) -> IResult<&str, (f64, bool)> {
    let (input, value) = double(input)?;
    let (input, pct) = opt(char('%'))(input)?;
    Ok((input, (value, pct.is_some())))
}

fn alpha(input: &str) -> IResult<&str, f64> {
    let (input, _) = separator(input)?;
    let (input, (value, pct)) = component(input)?;
    Ok((input, if pct { value / 100.0 } else { value }))
}

fn rgb_color(input: &str) -> IResult<&str, Rgba> {
    let (input, _) = tag_no_case("rgb")(input)?;
    let (input, _) = opt(tag_no_case("a"))(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = char('(')(input)?;
    let (input, _) = multispace0(input)?;

    let channel = |(v, pct): (f64, bool)| if pct { v * 2.55 } else { v };
    let (input, r) = component(input)?;
    let (input, _) = separator(input)?;
    let (input, g) = component(input)?;
    let (input, _) = separator(input)?;
    let (input, b) = component(input)?;
    let (input, a) = opt(alpha)(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = char(')')(input)?;

    Ok((
        input,
        Rgba::new(channel(r), channel(g), channel(b), a.unwrap_or(1.0)),
    ))
}

fn hsl_color(input: &str) -> IResult<&str, Rgba> {
    let (input, _) = tag_no_case("hsl")(input)?;
    let (input, _) = opt(tag_no_case("a"))(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = char('(')(input)?;
    let (input, _) = multispace0(input)?;

    let (input, (hue, _)) = component(input)?;
    let (input, _) = opt(tag_no_case("deg"))(input)?;
    let (input, _) = separator(input)?;
    let (input, (saturation, _)) = component(input)?;
    let (input, _) = separator(input)?;
    let (input, (lightness, _)) = component(input)?;
    let (input, a) = opt(alpha)(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = char(')')(input)?;

    let (r, g, b) = hsl_to_rgb(hue, saturation / 100.0, lightness / 100.0);
    Ok((input, Rgba::new(r, g, b, a.unwrap_or(1.0))))
}

fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> (f64, f64, f64) {
    let hue = hue.rem_euclid(360.0) / 360.0;
    if saturation == 0.0 {
        let v = lightness * 255.0;
        return (v, v, v);
    }

    let q = if lightness < 0.5 {
        lightness * (1.0 + saturation)
    } else {
        lightness + saturation - lightness * saturation
    };
    let p = 2.0 * lightness - q;

    let channel = |mut t: f64| {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        let v = if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 0.5 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        };
        v * 255.0
    };

    (
        channel(hue + 1.0 / 3.0),
        channel(hue),
        channel(hue - 1.0 / 3.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(Rgba::parse("#fff"), Some(Rgba::new(255.0, 255.0, 255.0, 1.0)));
        assert_eq!(Rgba::parse("#ff0000"), Some(Rgba::new(255.0, 0.0, 0.0, 1.0)));
        assert_eq!(Rgba::parse("#00000000"), Some(Rgba::TRANSPARENT));
        assert_eq!(Rgba::parse("#ggg"), None);
    }

    #[test]
    fn test_parse_functions() {
        assert_eq!(
            Rgba::parse("rgba(10, 20, 30, 0.5)"),
            Some(Rgba::new(10.0, 20.0, 30.0, 0.5))
        );
        assert_eq!(
            Rgba::parse("rgb(10 20 30 / 50%)"),
            Some(Rgba::new(10.0, 20.0, 30.0, 0.5))
        );
        let red = Rgba::parse("hsl(0, 100%, 50%)").unwrap();
        assert!((red.r - 255.0).abs() < 1e-6 && red.g.abs() < 1e-6 && red.b.abs() < 1e-6);
        assert_eq!(Rgba::parse("transparent"), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Rgba::new(254.6, 0.2, 10.0, 0.25).to_string(),
            "rgba(255, 0, 10, 0.25)"
        );
    }

    #[test]
    fn test_mix_endpoints_and_midpoint() {
        let black = Rgba::new(0.0, 0.0, 0.0, 1.0);
        let white = Rgba::new(255.0, 255.0, 255.0, 0.0);
        assert_eq!(black.mix(&white, 0.0), black);
        assert_eq!(black.mix(&white, 1.0), white);

        // Linear-light midpoint is brighter than the naive average
        let mid = black.mix(&white, 0.5);
        assert!(mid.r > 127.5);
        assert!((mid.a - 0.5).abs() < 1e-9);
    }
}
