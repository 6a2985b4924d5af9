//! Complex string values
//!
//! A complex value is any string holding numbers and/or colors embedded in
//! literal text, e.g. `"translateX(10px) rotate(5deg)"` or
//! `"0px 0px 10px rgba(0, 0, 0, 0.5)"`. Parsing splits it into a literal
//! template and a token list so two values with the same shape can be mixed
//! token-by-token.

use crate::color::Rgba;
use glide_core::value::format_number;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(#[0-9a-f]{3,8}\b|(?:rgb|hsl)a?\([^)]*\)|\btransparent\b)|(-?(?:\d+\.?\d*|\.\d+)(?:e[-+]?\d+)?)",
    )
    .expect("valid token pattern")
});

/// Filter functions whose neutral value is 1 rather than 0
const UNIT_DEFAULT_FUNCTIONS: &[&str] = &["brightness", "contrast", "saturate", "opacity"];

/// A token inside a complex value
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Token {
    Number(f64),
    Color(Rgba),
}

impl Token {
    fn same_kind(&self, other: &Token) -> bool {
        matches!(
            (self, other),
            (Token::Number(_), Token::Number(_)) | (Token::Color(_), Token::Color(_))
        )
    }
}

/// A string split into literal segments and animatable tokens.
///
/// `literals.len() == tokens.len() + 1` always holds.
#[derive(Clone, Debug, PartialEq)]
pub struct ComplexValue {
    literals: Vec<String>,
    tokens: Vec<Token>,
}

impl ComplexValue {
    pub fn parse(input: &str) -> Self {
        let mut literals = Vec::new();
        let mut tokens = Vec::new();
        let mut last = 0;

        for caps in TOKEN_PATTERN.captures_iter(input) {
            let Some(whole) = caps.get(0) else { continue };
            let token = if let Some(color) = caps.get(1) {
                match Rgba::parse(color.as_str()) {
                    Some(c) => Token::Color(c),
                    None => continue,
                }
            } else {
                match whole.as_str().parse::<f64>() {
                    Ok(n) => Token::Number(n),
                    Err(_) => continue,
                }
            };
            literals.push(input[last..whole.start()].to_string());
            tokens.push(token);
            last = whole.end();
        }
        literals.push(input[last..].to_string());

        Self { literals, tokens }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn number_count(&self) -> usize {
        self.tokens
            .iter()
            .filter(|t| matches!(t, Token::Number(_)))
            .count()
    }

    pub fn color_count(&self) -> usize {
        self.tokens.len() - self.number_count()
    }

    /// Whether both values have the same token kinds in the same order
    pub fn is_compatible(&self, other: &ComplexValue) -> bool {
        self.tokens.len() == other.tokens.len()
            && self
                .tokens
                .iter()
                .zip(&other.tokens)
                .all(|(a, b)| a.same_kind(b))
    }

    /// Render this value's template with a different set of tokens
    pub fn render_with(&self, tokens: &[Token]) -> String {
        let mut out = String::new();
        for (i, literal) in self.literals.iter().enumerate() {
            out.push_str(literal);
            if let Some(token) = tokens.get(i) {
                match token {
                    Token::Number(n) => out.push_str(&format_number(*n)),
                    Token::Color(c) => out.push_str(&c.to_string()),
                }
            }
        }
        out
    }

    /// Mix token-by-token, rendering through `to`'s template.
    ///
    /// Returns `None` when the two values don't share a shape.
    pub fn mix(&self, to: &ComplexValue, t: f64) -> Option<String> {
        if !self.is_compatible(to) {
            return None;
        }
        let mixed: Vec<Token> = self
            .tokens
            .iter()
            .zip(&to.tokens)
            .map(|(a, b)| match (a, b) {
                (Token::Number(a), Token::Number(b)) => Token::Number(a + (b - a) * t),
                (Token::Color(a), Token::Color(b)) => Token::Color(a.mix(b, t)),
                _ => *b,
            })
            .collect();
        Some(to.render_with(&mixed))
    }

    /// Name of the CSS function enclosing token `index`, if any
    fn enclosing_function(&self, index: usize) -> Option<String> {
        let prefix: String = self.literals[..=index].concat();
        let open = prefix.rfind('(')?;
        if prefix[open..].contains(')') {
            return None;
        }
        let name: String = prefix[..open]
            .chars()
            .rev()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '-')
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        Some(name)
    }
}

impl fmt::Display for ComplexValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_with(&self.tokens))
    }
}

/// Whether a string is a non-numeric value holding at least one number or color
pub fn is_complex(input: &str) -> bool {
    if input.trim().parse::<f64>().is_ok() {
        return false;
    }
    !ComplexValue::parse(input).tokens.is_empty()
}

/// The neutral ("none") form of a complex value.
///
/// Numbers become 0 (1 inside brightness/contrast/saturate/opacity filters,
/// or 100 when expressed as a percentage) and colors become transparent.
pub fn animatable_none(input: &str) -> String {
    let value = ComplexValue::parse(input);
    let tokens: Vec<Token> = value
        .tokens
        .iter()
        .enumerate()
        .map(|(i, token)| match token {
            Token::Color(_) => Token::Color(Rgba::TRANSPARENT),
            Token::Number(_) => {
                let unit_default = value
                    .enclosing_function(i)
                    .is_some_and(|name| UNIT_DEFAULT_FUNCTIONS.contains(&name.as_str()));
                if unit_default {
                    let percent = value.literals[i + 1].starts_with('%');
                    Token::Number(if percent { 100.0 } else { 1.0 })
                } else {
                    Token::Number(0.0)
                }
            }
        })
        .collect();
    value.render_with(&tokens)
}
