//! Formatting and escaping helpers shared by the core and the HTTP layer

use rust_decimal::{Decimal, RoundingStrategy};

/// Round to `decimal_places` and always print that many digits ("12.5" -> "12.50")
pub fn format_fixed(value: Decimal, decimal_places: u32) -> String {
    let rounded =
        value.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}", decimal_places as usize, rounded)
}

/// Convert a fraction into a percentage rounded to `decimal_places` (0.0375 -> 3.75)
pub fn fraction_to_percent(fraction: Decimal, decimal_places: u32) -> Decimal {
    (fraction * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero)
}

/// Escape text for safe interpolation into HTML element bodies and attributes
pub fn escape_html(content: &str) -> String {
    let mut escaped = String::with_capacity(content.len());
    for c in content.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
