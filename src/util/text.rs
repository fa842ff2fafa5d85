use std::{collections::HashSet, str::FromStr};

use anyhow::*;
use rust_decimal::{Decimal, RoundingStrategy};

const NUMBER_ESCAPE_CHAR: &[char] = &['₹', ',', ' ', '"', '\n'];

/// 金額固定顯示到小數第二位
const CURRENCY_SCALE: u32 = 2;

/// Parses a decimal value from a given string.
///
/// This function accepts a string representation of a decimal number,
/// potentially containing commas as thousands separators, a rupee sign and other escape characters,
/// and attempts to convert it into a `Decimal`. If the conversion fails, an error is returned.
///
/// # Arguments
///
/// * `s`: A string slice containing the representation of a decimal number.
/// * `escape_chars`: Optional characters to be escaped from the input string.
///
/// # Example
///
/// ```
/// let s = "₹1,234.56";
/// let decimal_value = parse_decimal(s, None).unwrap();
/// ```
pub fn parse_decimal(s: &str, escape_chars: Option<Vec<char>>) -> Result<Decimal> {
    let cleaned = clean_escape_chars(s, escape_chars);
    Decimal::from_str(&cleaned)
        .map_err(|why| anyhow!("Failed to parse '{}' as Decimal because {:?}", cleaned, why))
}

/// Formats an amount the way the dashboard shows it: rounded to two decimal places
/// (midpoint away from zero) with `,` between every group of three integer digits.
///
/// # Example
///
/// ```
/// assert_eq!(format_currency(dec!(1234.5)), "1,234.50");
/// assert_eq!(format_currency(Decimal::ZERO), "0.00");
/// ```
pub fn format_currency(amount: Decimal) -> String {
    let rounded =
        amount.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    let plain = format!("{:.*}", CURRENCY_SCALE as usize, rounded);

    let (sign, unsigned) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain.as_str()),
    };
    let (integer, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));

    let mut grouped = String::with_capacity(plain.len() + integer.len() / 3);
    grouped.push_str(sign);
    for (i, c) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if !fraction.is_empty() {
        grouped.push('.');
        grouped.push_str(fraction);
    }

    grouped
}

/// Removes the default number escape characters plus any extra ones from `s`.
///
/// ```
/// let clean_s = clean_escape_chars("₹ 1,080", Some(vec!['$']));
/// assert_eq!(clean_s, "1080");
/// ```
pub(crate) fn clean_escape_chars(s: &str, escape_chars: Option<Vec<char>>) -> String {
    let mut combined: Vec<char> = NUMBER_ESCAPE_CHAR.to_vec();
    if let Some(ec) = escape_chars {
        combined.extend(ec);
    }

    let filters = combined.iter().collect::<HashSet<_>>();
    s.chars().filter(|c| !filters.contains(c)).collect()
}
