//! Number formatting for display. Absent values render as `N/A`.

const NOT_AVAILABLE: &str = "N/A";

/// `digits` significant digits, switching to exponent notation for very large
/// or very small magnitudes.
pub fn sig(value: Option<f64>, digits: usize) -> String {
    let Some(value) = value else {
        return NOT_AVAILABLE.to_string();
    };
    if !value.is_finite() {
        return value.to_string();
    }
    let digits = digits.clamp(1, 100);
    let scientific = format!("{:.*e}", digits - 1, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    if exponent < -6 || exponent >= digits as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{}", exponent.abs())
    } else {
        let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
        format!("{value:.decimals$}")
    }
}

/// A ratio as a percentage, e.g. `0.9923` with 3 digits is `99.2%`.
pub fn pct(value: Option<f64>, digits: usize) -> String {
    match value {
        Some(v) => format!("{}%", sig(Some(v * 100.0), digits)),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Thousands separators, at most three decimals.
pub fn com(value: Option<f64>) -> String {
    let Some(value) = value else {
        return NOT_AVAILABLE.to_string();
    };
    if !value.is_finite() {
        return value.to_string();
    }
    let text = format!("{:.3}", value.abs());
    let (integer, fraction) = text.split_once('.').unwrap_or((text.as_str(), ""));
    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let fraction = fraction.trim_end_matches('0');
    let sign = if value < 0.0 && (grouped != "0" || !fraction.is_empty()) {
        "-"
    } else {
        ""
    };
    if fraction.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{fraction}")
    }
}
