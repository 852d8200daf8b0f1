//! Human-readable price formatting.
//!
//! Mirrors what an `en-US` locale produces: thousands grouped with commas and
//! at most three fraction digits, trailing zeros dropped.

/// Currency prefix shown before every price.
pub const CURRENCY_PREFIX: &str = "$";

const EXACT_INTEGER_LIMIT: f64 = 9_007_199_254_740_992.0;

/// Group the digits of `value` in threes: `1234567` → `"1,234,567"`.
pub fn group_thousands(value: u64) -> String {
    group_digits(&value.to_string())
}

/// Group a plain run of decimal digits.
fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format a number with grouping and up to three fraction digits.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::as_conversions
)]
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let scaled = (value.abs() * 1000.0).round();
    let whole = (scaled / 1000.0).trunc();
    // Past 2^53 an f64 carries no fraction digits.
    let millis = if scaled < EXACT_INTEGER_LIMIT {
        (scaled - whole * 1000.0) as u64
    } else {
        0
    };

    let mut out = group_digits(&format!("{whole:.0}"));
    if millis > 0 {
        let fraction = format!("{millis:03}");
        out.push('.');
        out.push_str(fraction.trim_end_matches('0'));
    }
    if value < 0.0 && scaled > 0.0 {
        out.insert(0, '-');
    }
    out
}

/// `50000.0` → `"$50,000"`.
pub fn format_price(value: f64) -> String {
    format!("{CURRENCY_PREFIX}{}", format_amount(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(100_000), "100,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn formats_fractions_like_locale_string() {
        assert_eq!(format_amount(1250.5), "1,250.5");
        assert_eq!(format_amount(0.1234), "0.123");
        assert_eq!(format_amount(99.9996), "100");
        assert_eq!(format_amount(-1500.0), "-1,500");
    }

    #[test]
    fn prefixes_currency() {
        assert_eq!(format_price(50_000.0), "$50,000");
        assert_eq!(format_price(0.0), "$0");
    }

    #[test]
    fn large_amounts_keep_every_digit() {
        assert_eq!(format_amount(1e25), "10,000,000,000,000,000,905,969,664");
        assert_eq!(
            format_price(18_446_744_073_709_551_616.0),
            "$18,446,744,073,709,551,616"
        );
    }
}
