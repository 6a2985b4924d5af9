//! CSS value types
//!
//! Every style or transform key glide knows about maps to a [`ValueType`]
//! that decides how a numeric value is rendered (`px`, `deg`, `%`, clamped
//! alpha, rounded integer, ...). Keys without an entry are passed through
//! untouched.

use glide_core::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueType {
    Number,
    Px,
    Degrees,
    Percent,
    /// 0..1 rendered as a percentage
    ProgressPercentage,
    /// Clamped to 0..1
    Alpha,
    Scale,
    /// Rounded to the nearest integer
    Int,
    Color,
    Filter,
}

impl ValueType {
    pub fn unit(&self) -> Option<&'static str> {
        match self {
            ValueType::Px => Some("px"),
            ValueType::Degrees => Some("deg"),
            ValueType::Percent | ValueType::ProgressPercentage => Some("%"),
            _ => None,
        }
    }

    fn transform(&self, n: f64) -> f64 {
        match self {
            ValueType::Alpha => n.clamp(0.0, 1.0),
            ValueType::Int => n.round(),
            ValueType::ProgressPercentage => n * 100.0,
            _ => n,
        }
    }

    /// Render a value as CSS; strings pass through unchanged
    pub fn format(&self, value: &Value) -> String {
        match value {
            Value::Number(n) => {
                let n = self.transform(*n);
                match self.unit() {
                    Some(unit) => format!("{}{unit}", glide_core::value::format_number(n)),
                    None => glide_core::value::format_number(n),
                }
            }
            Value::Text(s) => s.clone(),
        }
    }

    /// Read a CSS string back into a number when it is one in this type's unit
    pub fn parse(&self, css: &str) -> Value {
        let css = css.trim();
        let bare = match self.unit() {
            Some(unit) => css.strip_suffix(unit).unwrap_or(css),
            None => css,
        };
        match bare.trim().parse::<f64>() {
            Ok(n) if *self == ValueType::ProgressPercentage && bare != css => {
                Value::Number(n / 100.0)
            }
            Ok(n) => Value::Number(n),
            Err(_) => Value::Text(css.to_string()),
        }
    }
}

/// Value type for a camelCase style or transform key
pub fn value_type(key: &str) -> Option<ValueType> {
    use ValueType::*;

    let ty = match key {
        // Color
        "color" | "backgroundColor" | "outlineColor" | "fill" | "stroke" | "borderColor"
        | "borderTopColor" | "borderRightColor" | "borderBottomColor" | "borderLeftColor" => Color,

        // Border
        "borderWidth" | "borderTopWidth" | "borderRightWidth" | "borderBottomWidth"
        | "borderLeftWidth" | "borderRadius" | "radius" | "borderTopLeftRadius"
        | "borderTopRightRadius" | "borderBottomRightRadius" | "borderBottomLeftRadius" => Px,

        // Positioning
        "width" | "maxWidth" | "height" | "maxHeight" | "size" | "top" | "right" | "bottom"
        | "left" => Px,

        // Spacing
        "padding" | "paddingTop" | "paddingRight" | "paddingBottom" | "paddingLeft" | "margin"
        | "marginTop" | "marginRight" | "marginBottom" | "marginLeft" => Px,

        // Transforms
        "rotate" | "rotateX" | "rotateY" | "rotateZ" | "skew" | "skewX" | "skewY" => Degrees,
        "scale" | "scaleX" | "scaleY" | "scaleZ" => Scale,
        "distance" | "translateX" | "translateY" | "translateZ" | "x" | "y" | "z"
        | "perspective" | "transformPerspective" => Px,
        "originX" | "originY" => ProgressPercentage,
        "originZ" => Px,

        // Misc
        "opacity" | "fillOpacity" | "strokeOpacity" => Alpha,
        "zIndex" | "numOctaves" => Int,
        "filter" | "WebkitFilter" => Filter,

        _ => return None,
    };
    Some(ty)
}

/// Render a property value as CSS using its value type, if any
pub fn format_value(key: &str, value: &Value) -> String {
    match value_type(key) {
        Some(ty) => ty.format(value),
        None => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_units() {
        assert_eq!(format_value("x", &Value::Number(10.0)), "10px");
        assert_eq!(format_value("rotate", &Value::Number(45.0)), "45deg");
        assert_eq!(format_value("scale", &Value::Number(1.5)), "1.5");
        assert_eq!(format_value("originX", &Value::Number(0.5)), "50%");
    }

    #[test]
    fn test_transformed_numbers() {
        assert_eq!(format_value("opacity", &Value::Number(1.4)), "1");
        assert_eq!(format_value("zIndex", &Value::Number(2.6)), "3");
    }

    #[test]
    fn test_strings_pass_through() {
        assert_eq!(format_value("width", &Value::from("50%")), "50%");
        assert_eq!(format_value("display", &Value::from("none")), "none");
        assert_eq!(format_value("unknownKey", &Value::Number(3.0)), "3");
    }

    #[test]
    fn test_parse_css() {
        assert_eq!(ValueType::Px.parse("10px"), Value::Number(10.0));
        assert_eq!(ValueType::Alpha.parse("0.5"), Value::Number(0.5));
        assert_eq!(ValueType::Px.parse("50%"), Value::from("50%"));
        assert_eq!(ValueType::ProgressPercentage.parse("25%"), Value::Number(0.25));
        assert_eq!(ValueType::Color.parse("#fff"), Value::from("#fff"));
    }
}
