//! Display formatting for table cells

/// Placeholder shown for any value that is unknown or not computable.
pub const NOT_APPLICABLE: &str = "-";

/// Format with comma thousands separators and at most three decimals.
///
/// Trailing fractional zeros are dropped: `1234567.0` → `1,234,567`,
/// `1234.5` → `1,234.5`, `0.1 + 0.2` → `0.3`.
/// Non-finite values render as [`NOT_APPLICABLE`].
pub fn thousands(value: f64) -> String {
    if !value.is_finite() {
        return NOT_APPLICABLE.to_string();
    }

    let text = format!("{:.3}", value);
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((i, f)) => (i, f.trim_end_matches('0')),
        None => (unsigned, ""),
    };
    // `-0.0001` rounds to zero
    let sign = if integer == "0" && fraction.is_empty() { "" } else { sign };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    if fraction.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{fraction}")
    }
}

/// `Some(v)` as thousands-separated text, `None` as [`NOT_APPLICABLE`].
pub fn measure(value: Option<f64>) -> String {
    value.map(thousands).unwrap_or_else(|| NOT_APPLICABLE.to_string())
}

/// Fixed three-decimal percentage, e.g. `50.000 %`.
pub fn percent_fixed(value: f64) -> String {
    format!("{:.3} %", value)
}

/// Exponent notation with three fractional digits, e.g. `5.000e-1`.
///
/// Non-negative exponents carry an explicit sign (`1.000e+0`).
pub fn exponential(value: f64) -> String {
    let text = format!("{:.3e}", value);
    match text.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => text,
    }
}

/// Percentage of `max`, switching to exponent notation below 1 %.
///
/// Returns [`NOT_APPLICABLE`] when the ratio is not a finite number
/// (for example `max == 0`).
pub fn percent_of_max(value: f64, max: f64) -> String {
    let percent = value / max * 100.0;
    if !percent.is_finite() {
        return NOT_APPLICABLE.to_string();
    }
    if percent >= 1.0 {
        percent_fixed(percent)
    } else {
        format!("{} %", exponential(percent))
    }
}
