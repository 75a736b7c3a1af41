//! Brazilian-Portuguese currency formatting and locale-aware number parsing.
//!
//! None of these functions fail: anything that cannot be interpreted as a
//! number degrades to zero.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::workbook::CellValue;

pub const CURRENCY_PREFIX: &str = "R$ ";

/// Formats a cell value as `R$ 1.234,50`.
///
/// An absent value, one that is not numeric, or a NaN or infinite number is
/// shown as zero.
pub fn format_currency(value: Option<&CellValue>) -> String {
    let number = value.and_then(CellValue::as_number).unwrap_or(0.0);
    if !number.is_finite() {
        tracing::debug!(number, "non-finite amount formatted as zero");
        return format_brl(Decimal::ZERO);
    }
    match Decimal::from_f64_retain(number) {
        Some(amount) => format_brl(amount),
        // Beyond Decimal's range the float formatter rounds instead.
        None => format_large(number),
    }
}

fn format_large(number: f64) -> String {
    let digits = format!("{:.2}", number.abs());
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));
    let sign = if number < 0.0 { "-" } else { "" };
    format!("{CURRENCY_PREFIX}{sign}{},{frac_part}", group_thousands(int_part))
}

/// Formats an amount with two decimals, `.` grouping thousands and `,` as
/// the decimal separator.
///
/// Rounding is half-to-even, applied to the exact value of `amount`.
pub fn format_brl(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    let digits = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{CURRENCY_PREFIX}{sign}{},{frac_part}", group_thousands(int_part))
}

/// Parses `1.234,56` style text. Absent or unparsable input yields `0.0`.
pub fn parse_locale_float(text: Option<&str>) -> f64 {
    let Some(text) = text else {
        return 0.0;
    };
    let cleaned = text.trim().replace('.', "").replace(',', ".");
    cleaned.parse().unwrap_or_else(|_| {
        if !cleaned.is_empty() {
            tracing::debug!(input = %text, "unparsable decimal treated as zero");
        }
        0.0
    })
}

/// Parses a whole number. Absent or unparsable input yields `0`.
pub fn parse_locale_int(text: Option<&str>) -> i64 {
    let Some(text) = text else {
        return 0;
    };
    let cleaned = text.trim();
    cleaned.parse().unwrap_or_else(|_| {
        if !cleaned.is_empty() {
            tracing::debug!(input = %text, "unparsable integer treated as zero");
        }
        0
    })
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}
