use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

/// First amount with exactly two fraction digits, optionally thousands-grouped.
static PRICE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,3}(?:,\d{3})+|\d+)\.(\d{2})(?:\D|$)").expect("price pattern compiles")
});

/// Extracts the first price token from `text`.
///
/// Currency symbols, surrounding words and thousands separators are
/// tolerated; only the first `digits.dd` token counts. Text without such a
/// token yields zero, which callers treat as "unknown".
pub fn extract_price(text: &str) -> Decimal {
    find_price(text).unwrap_or(Decimal::ZERO)
}

/// Like [`extract_price`] but distinguishes "no token" from a real zero.
pub fn find_price(text: &str) -> Option<Decimal> {
    let captures = PRICE_TOKEN.captures(text)?;
    let whole = captures.get(1)?.as_str().replace(',', "");
    let fraction = captures.get(2)?.as_str();
    Decimal::from_str(&format!("{}.{}", whole, fraction)).ok()
}

/// Sums a price rendered across a whole-number node and a fraction node.
///
/// The fraction node holds the hundredths digits ("99" in `£11.99`). Either
/// part failing to parse yields zero.
pub fn parse_split_price(whole: &str, fraction: &str) -> Decimal {
    let fraction_digits: String = fraction.chars().filter(|c| c.is_ascii_digit()).collect();
    let cents = if fraction_digits.is_empty() || fraction_digits.len() > 9 {
        None
    } else {
        fraction_digits.parse::<i64>().ok()
    };

    match (parse_digits(whole), cents) {
        (Some(whole), Some(cents)) => whole + Decimal::new(cents, fraction_digits.len() as u32),
        _ => Decimal::ZERO,
    }
}

fn parse_digits(text: &str) -> Option<Decimal> {
    let cleaned: String = text
        .trim()
        .trim_end_matches('.')
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}
