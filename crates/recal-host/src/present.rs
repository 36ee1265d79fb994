//! Presentation formatting. The engine keeps full precision; rounding to two
//! decimals happens only here.

use rust_decimal::{Decimal, RoundingStrategy};

pub const CURRENCY_SYMBOL: char = '£';

fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Two decimals with `,` thousands separators, e.g. `1,234.50`.
pub fn format_grouped(value: Decimal) -> String {
    let rounded = round2(value);
    let plain = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped}.{frac_part}")
}

/// Currency amount, e.g. `£866.00` or `-£216.00`.
pub fn format_currency(value: Decimal) -> String {
    let text = format_grouped(value);
    match text.strip_prefix('-') {
        Some(abs) => format!("-{CURRENCY_SYMBOL}{abs}"),
        None => format!("{CURRENCY_SYMBOL}{text}"),
    }
}

/// Duration in hours, e.g. `1.00h`.
pub fn format_hours(hours: Decimal) -> String {
    format!("{:.2}h", round2(hours))
}

/// Percentage, e.g. `13.40%`.
pub fn format_percent(value: Decimal) -> String {
    format!("{:.2}%", round2(value))
}
