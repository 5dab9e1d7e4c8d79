use super::Value;

/// Fractional digits shown for numbers.
const FRACTION_DIGITS: usize = 8;

/// Format a Value for display in a grid cell.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Number(n) => format_number(*n),
        Value::Str(s) => s.clone(),
        Value::Error(message) => message.clone(),
    }
}

/// Format a number for display.
///
/// Up to eight fractional digits with trailing zeros dropped, so `22/7` shows
/// as `3.14285714` and `2.50` as `2.5`. Negative zero shows as `0`.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else {
        let text = format!("{:.*}", FRACTION_DIGITS, n);
        let trimmed = text.trim_end_matches('0').trim_end_matches('.');
        match trimmed {
            "-0" => "0".to_string(),
            other => other.to_string(),
        }
    }
}
