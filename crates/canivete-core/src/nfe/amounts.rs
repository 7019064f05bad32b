//! Monetary value parsing and formatting for Brazilian invoices.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a Brazilian-formatted amount (e.g., "1234,56", "1.234,56" or "1234.56").
///
/// A comma is treated as the decimal separator when present; dots to its
/// left are thousands separators. Returns `None` when the string does not
/// describe a number.
pub fn parse_brl_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.' || *c == '-')
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    let normalized = if cleaned.contains(',') {
        cleaned.replace('.', "").replace(',', ".")
    } else {
        cleaned
    };

    Decimal::from_str(&normalized).ok()
}

/// Format an amount in Brazilian style with the currency symbol (R$ 1.234,56).
pub fn format_brl_amount(amount: Decimal) -> String {
    let s = format!("{:.2}", amount);
    let (integer_part, decimal_part) = match s.split_once('.') {
        Some((i, d)) => (i, d),
        None => (s.as_str(), "00"),
    };

    let (sign, digits) = match integer_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", integer_part),
    };

    // Insert a dot every three digits, counting from the right
    let chars: Vec<char> = digits.chars().collect();
    let mut formatted = String::new();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push('.');
        }
        formatted.push(*c);
    }

    format!("R$ {}{},{}", sign, formatted, decimal_part)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_brl_amount() {
        assert_eq!(
            parse_brl_amount("1234,56"),
            Some(Decimal::from_str("1234.56").unwrap())
        );
        assert_eq!(
            parse_brl_amount("1.234,56"),
            Some(Decimal::from_str("1234.56").unwrap())
        );
        assert_eq!(
            parse_brl_amount("1234.56"),
            Some(Decimal::from_str("1234.56").unwrap())
        );
        assert_eq!(parse_brl_amount("150"), Some(Decimal::from(150)));
    }

    #[test]
    fn test_parse_brl_amount_rejects_garbage() {
        assert_eq!(parse_brl_amount(""), None);
        assert_eq!(parse_brl_amount("-"), None);
        assert_eq!(parse_brl_amount("abc"), None);
    }

    #[test]
    fn test_format_brl_amount() {
        let amount = Decimal::from_str("1234.56").unwrap();
        assert_eq!(format_brl_amount(amount), "R$ 1.234,56");

        let amount = Decimal::from_str("12345678.90").unwrap();
        assert_eq!(format_brl_amount(amount), "R$ 12.345.678,90");

        assert_eq!(format_brl_amount(Decimal::ZERO), "R$ 0,00");
    }

    #[test]
    fn test_format_brl_amount_negative() {
        let amount = Decimal::from_str("-1234.5").unwrap();
        assert_eq!(format_brl_amount(amount), "R$ -1.234,50");
    }
}
