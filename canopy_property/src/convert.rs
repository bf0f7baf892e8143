// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Standard converters and the composite spread rule.
//!
//! Converters accept the loose forms styles are written in and produce the
//! canonical [`Value`] shapes layout and rendering consume. Each converter
//! passes its own output through unchanged, so re-converting an inherited
//! value is a no-op.

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;

use peniko::Color;

use crate::error::ConvertError;
use crate::value::Value;

/// Converts numbers and numeric strings to [`Value::Number`].
///
/// # Errors
///
/// Returns [`ConvertError::NotANumber`] for any other shape.
pub fn to_number(value: &Value) -> Result<Value, ConvertError> {
    match value {
        Value::Null => Ok(Value::Null),
        Value::Number(n) => Ok(Value::Number(*n)),
        Value::Str(s) => s
            .trim()
            .parse::<f64>()
            .map(Value::Number)
            .map_err(|_| ConvertError::NotANumber(s.clone())),
        other => Err(ConvertError::NotANumber(format!("{other:?}"))),
    }
}

/// Converts `#RRGGBB`/`#RRGGBBAA` strings and 4-number lists to
/// [`Value::Color`]. Alpha defaults to fully opaque when omitted.
///
/// # Errors
///
/// Returns [`ConvertError::MalformedColor`] for any other shape, including
/// strings with bad hex digits and lists of the wrong length.
pub fn to_color(value: &Value) -> Result<Value, ConvertError> {
    match value {
        Value::Null => Ok(Value::Null),
        Value::Color(c) => Ok(Value::Color(*c)),
        Value::Str(s) => parse_hex_color(s)
            .map(Value::Color)
            .ok_or_else(|| ConvertError::MalformedColor(s.clone())),
        Value::List(items) if items.len() == 4 => {
            let mut components = [0.0_f32; 4];
            for (slot, item) in components.iter_mut().zip(items) {
                let Some(n) = item.as_number() else {
                    return Err(ConvertError::MalformedColor(format!("{value:?}")));
                };
                *slot = n as f32;
            }
            Ok(Value::Color(Color::new(components)))
        }
        other => Err(ConvertError::MalformedColor(format!("{other:?}"))),
    }
}

/// Converts alignment keywords to [`Value::Number`] fractions.
///
/// `left`/`top` map to `0.0`, `right`/`bottom` to `1.0`, `center` to `0.5`.
/// Numbers (and numeric strings) pass through, so fractional alignments
/// like `0.25` are accepted.
///
/// # Errors
///
/// Returns [`ConvertError::UnknownAlignment`] for any other shape.
pub fn to_alignment(value: &Value) -> Result<Value, ConvertError> {
    match value {
        Value::Null => Ok(Value::Null),
        Value::Number(n) => Ok(Value::Number(*n)),
        Value::Str(s) => match s.trim() {
            "left" | "top" => Ok(Value::Number(0.0)),
            "right" | "bottom" => Ok(Value::Number(1.0)),
            "center" => Ok(Value::Number(0.5)),
            other => other
                .parse::<f64>()
                .map(Value::Number)
                .map_err(|_| ConvertError::UnknownAlignment(s.clone())),
        },
        other => Err(ConvertError::UnknownAlignment(format!("{other:?}"))),
    }
}

/// Distributes a value across the `parts` sub-properties of a composite.
///
/// The rule, preserved from the original system:
///
/// - a string with exactly `parts` whitespace-separated tokens maps
///   token-for-token (each token is handed to the sub-property's converter),
/// - a list of exactly `parts` items maps item-for-item,
/// - anything else (scalars, wrong-length lists, wrong-token-count strings)
///   is broadcast to every sub-property.
#[must_use]
pub fn spread(value: &Value, parts: usize) -> Vec<Value> {
    match value {
        Value::Str(s) => {
            let tokens: Vec<&str> = s.split_whitespace().collect();
            if tokens.len() == parts {
                return tokens
                    .into_iter()
                    .map(|t| Value::Str(t.to_string()))
                    .collect();
            }
        }
        Value::List(items) => {
            if items.len() == parts {
                return items.clone();
            }
        }
        _ => {}
    }
    vec![value.clone(); parts]
}

fn parse_hex_color(s: &str) -> Option<Color> {
    let digits = s.strip_prefix('#')?;
    if digits.len() != 6 && digits.len() != 8 {
        return None;
    }
    let mut components = [1.0_f32; 4];
    for (i, slot) in components.iter_mut().take(digits.len() / 2).enumerate() {
        let byte = u8::from_str_radix(digits.get(i * 2..i * 2 + 2)?, 16).ok()?;
        *slot = f32::from(byte) / 255.0;
    }
    Some(Color::new(components))
}

/// Splits a `Left`/`Top`/`Right`/`Bottom` suffixed name list for a rect
/// composite such as `margin` or `padding`.
#[must_use]
pub fn rect_part_names(name: &str) -> [String; 4] {
    [
        format!("{name}Left"),
        format!("{name}Top"),
        format!("{name}Right"),
        format!("{name}Bottom"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_accepts_numeric_strings() {
        assert_eq!(to_number(&"12".into()).unwrap(), Value::Number(12.0));
        assert_eq!(to_number(&" 2.5 ".into()).unwrap(), Value::Number(2.5));
        assert_eq!(to_number(&3.0.into()).unwrap(), Value::Number(3.0));
        assert!(matches!(
            to_number(&"twelve".into()),
            Err(ConvertError::NotANumber(_))
        ));
    }

    #[test]
    fn color_parses_hex_with_optional_alpha() {
        let opaque = to_color(&"#FF8000".into()).unwrap().as_color().unwrap();
        assert_eq!(opaque.components[3], 1.0);
        assert!((opaque.components[0] - 1.0).abs() < 1e-6);

        let translucent = to_color(&"#00FF0080".into()).unwrap().as_color().unwrap();
        assert!((translucent.components[3] - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn color_accepts_component_lists() {
        let v = Value::List(vec![0.25.into(), 0.5.into(), 0.75.into(), 1.0.into()]);
        let c = to_color(&v).unwrap().as_color().unwrap();
        assert_eq!(c.components, [0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn color_rejects_garbage() {
        for bad in ["#12345", "#GGGGGG", "red", "#1234567"] {
            assert!(matches!(
                to_color(&bad.into()),
                Err(ConvertError::MalformedColor(_))
            ));
        }
        let short = Value::List(vec![1.0.into(), 1.0.into()]);
        assert!(to_color(&short).is_err());
    }

    #[test]
    fn color_is_idempotent_on_output() {
        let once = to_color(&"#102030".into()).unwrap();
        assert_eq!(to_color(&once).unwrap(), once);
    }

    #[test]
    fn alignment_keywords() {
        assert_eq!(to_alignment(&"left".into()).unwrap(), Value::Number(0.0));
        assert_eq!(to_alignment(&"bottom".into()).unwrap(), Value::Number(1.0));
        assert_eq!(to_alignment(&"center".into()).unwrap(), Value::Number(0.5));
        assert_eq!(to_alignment(&"0.25".into()).unwrap(), Value::Number(0.25));
        assert!(to_alignment(&"middle".into()).is_err());
    }

    #[test]
    fn spread_distributes_matching_strings() {
        let parts = spread(&"1 2 3 4".into(), 4);
        assert_eq!(parts, vec!["1".into(), "2".into(), "3".into(), "4".into()]);
    }

    #[test]
    fn spread_distributes_matching_lists() {
        let v = Value::List(vec![1.0.into(), 2.0.into()]);
        assert_eq!(spread(&v, 2), vec![1.0.into(), 2.0.into()]);
    }

    #[test]
    fn spread_broadcasts_everything_else() {
        // Scalars broadcast.
        assert_eq!(spread(&5.0.into(), 4), vec![Value::Number(5.0); 4]);
        // A wrong-length list broadcasts as a whole, per the original rule.
        let v = Value::List(vec![1.0.into(), 2.0.into()]);
        assert_eq!(spread(&v, 4), vec![v.clone(); 4]);
        // A string with the wrong token count broadcasts too.
        assert_eq!(spread(&"1 2".into(), 4), vec![Value::from("1 2"); 4]);
    }

    #[test]
    fn rect_parts_are_in_css_order() {
        let names = rect_part_names("margin");
        assert_eq!(
            names,
            ["marginLeft", "marginTop", "marginRight", "marginBottom"]
        );
    }
}
