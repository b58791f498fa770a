//! Price rounding and display formatting

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Format a price as `"<currency> 12,345,000"`: whole units, thousands grouped.
pub fn format_price(value: f64, currency: &str) -> String {
    if !value.is_finite() {
        return format!("{currency} {value}");
    }

    let digits = format!("{:.0}", value.abs());
    let negative = value < 0.0 && digits != "0";

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if negative {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{currency} {grouped}")
}
