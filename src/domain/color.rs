//! Colors: the table heat scale and validated CSS color values

use std::fmt;

use serde::{Serialize, Serializer};

use crate::domain::error::DomainError;

/// Simple RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Lowercase CSS hex, e.g. `#228b22`.
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    fn lerp(self, other: Rgb, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let channel = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Self {
            r: channel(self.r, other.r),
            g: channel(self.g, other.g),
            b: channel(self.b, other.b),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.hex())
    }
}

/// Fill for cells without a usable value or without a usable column range.
pub const NEUTRAL_FILL: Rgb = Rgb::new(0xDC, 0xDC, 0xDC);

/// Heat scale stops, evenly spaced: forest green, yellow, orange, red.
pub const GRADE_STOPS: [Rgb; 4] = [
    Rgb::new(0x22, 0x8B, 0x22),
    Rgb::new(0xFF, 0xFF, 0x00),
    Rgb::new(0xFF, 0xA5, 0x00),
    Rgb::new(0xFF, 0x00, 0x00),
];

/// Sample the heat scale at `position` in `[0, 1]` (clamped).
pub fn grade(position: f64) -> Rgb {
    sample_gradient(&GRADE_STOPS, position)
}

/// Linear interpolation across evenly spaced stops.
pub fn sample_gradient(stops: &[Rgb], position: f64) -> Rgb {
    match stops {
        [] => NEUTRAL_FILL,
        [only] => *only,
        _ => {
            if !position.is_finite() {
                return NEUTRAL_FILL;
            }
            let segments = (stops.len() - 1) as f64;
            let scaled = position.clamp(0.0, 1.0) * segments;
            let idx = (scaled.floor() as usize).min(stops.len() - 2);
            stops[idx].lerp(stops[idx + 1], scaled - idx as f64)
        }
    }
}

/// A color string accepted by chart renderers.
///
/// One of:
/// - `#` followed by 3, 4, 6 or 8 hex digits
/// - `rgb()`, `rgba()`, `hsl()` or `hsla()` with 3 or 4 numeric arguments
/// - a CSS named color (ASCII letters only, e.g. `transparent`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CssColor(String);

/// Longest accepted functional argument, e.g. `-359.5deg`.
const MAX_ARGUMENT_LEN: usize = 12;

impl CssColor {
    pub fn parse(field: &'static str, value: &str) -> Result<Self, DomainError> {
        let trimmed = value.trim();
        let valid = match trimmed.strip_prefix('#') {
            Some(digits) => {
                matches!(digits.len(), 3 | 4 | 6 | 8)
                    && digits.chars().all(|c| c.is_ascii_hexdigit())
            }
            None if trimmed.ends_with(')') => is_color_function(trimmed),
            None => !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_alphabetic()),
        };

        if valid {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(DomainError::InvalidColor {
                field,
                value: value.to_string(),
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// `rgb[a](..)` / `hsl[a](..)` with comma or space separated numbers.
fn is_color_function(text: &str) -> bool {
    let Some((name, rest)) = text.split_once('(') else {
        return false;
    };
    if !matches!(
        name.trim().to_ascii_lowercase().as_str(),
        "rgb" | "rgba" | "hsl" | "hsla"
    ) {
        return false;
    }
    let Some(body) = rest.strip_suffix(')') else {
        return false;
    };

    // modern syntax allows `rgb(0 0 0 / 50%)`
    let arguments: Vec<&str> = body
        .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|a| !a.is_empty())
        .collect();
    matches!(arguments.len(), 3 | 4) && arguments.iter().all(|a| is_numeric_argument(a))
}

fn is_numeric_argument(argument: &str) -> bool {
    let number = argument
        .strip_suffix('%')
        .or_else(|| argument.strip_suffix("deg"))
        .unwrap_or(argument);
    let digits = number.strip_prefix(|c: char| c == '-' || c == '+').unwrap_or(number);
    argument.len() <= MAX_ARGUMENT_LEN
        && digits.chars().any(|c| c.is_ascii_digit())
        && digits.chars().all(|c| c.is_ascii_digit() || c == '.')
        && digits.matches('.').count() <= 1
}

impl fmt::Display for CssColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
