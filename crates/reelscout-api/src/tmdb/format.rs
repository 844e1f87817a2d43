//! Display formatting for numeric movie fields.

/// Formats a vote average with one decimal place.
///
/// Exact halves round away from zero (`7.25` gives `"7.3"`).
#[must_use]
pub fn format_rating(rating: f64) -> String {
    // Only multiples of 0.25 can sit exactly on a tie; `{:.1}` would round
    // those to even. Scaling such values by ten is exact.
    if (rating * 4.0).fract() == 0.0 {
        let rounded = (rating * 10.0).round() / 10.0;
        return format!("{rounded:.1}");
    }
    format!("{rating:.1}")
}

/// Formats a runtime in minutes as `"{h}h {m}m"`.
#[must_use]
#[allow(clippy::arithmetic_side_effects)]
pub fn format_runtime(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    format!("{hours}h {mins}m")
}

/// Formats a USD amount with thousands separators. Zero means unknown.
#[must_use]
#[allow(clippy::arithmetic_side_effects)]
pub fn format_money(amount: u64) -> String {
    if amount == 0 {
        return String::from("-");
    }
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len().saturating_mul(2));
    out.push('$');
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && digits.len().saturating_sub(i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Extracts the year from a `YYYY-MM-DD` release date.
#[must_use]
pub fn release_year(date: Option<&str>) -> Option<&str> {
    date.and_then(|d| d.get(..4))
        .filter(|y| y.chars().all(|c| c.is_ascii_digit()))
}
