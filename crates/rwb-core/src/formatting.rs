//! Formatting utilities for Telegram HTML replies.

/// Escape HTML special characters for Telegram HTML parse mode.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Round half-up on the scaled integer: `floor(x * 10^d + 0.5) / 10^d`.
pub fn round_half_up(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale + 0.5).floor() / scale
}

/// Shortest decimal form, keeping one fractional digit for whole numbers (`70.0`).
pub fn format_decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// Shortest round-trip form without a trailing `.0` (`3`, `12.5`, `-0.5`).
pub fn format_reading(value: f64) -> String {
    if value == 0.0 {
        // Covers -0.0 as well.
        return "0".to_string();
    }
    value.to_string()
}

/// Hectopascals to millimeters of mercury, rounded to a whole number.
pub fn hpa_to_mmhg(pressure_hpa: f64) -> i64 {
    round_half_up(pressure_hpa * 0.75, 0) as i64
}
