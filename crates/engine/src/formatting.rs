//! Localized number rendering and parsing for minor-unit amounts.
//!
//! Both directions work on integers only: a value is never routed through a
//! float on its way to or from a string.

use crate::{CurrencyFormat, EngineError, ResultEngine};

/// Inserts `separator` between groups of three digits, counting from the right.
///
/// `digits` must be a plain run of ASCII digits.
pub(crate) fn group_digits(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        let remaining = len - i;
        if i > 0 && remaining % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}

/// Renders `amount` minor units as a localized plain number (no symbol).
///
/// `format_minor(-123456, usd) == "-1,234.56"`
pub fn format_minor(amount: i64, format: &CurrencyFormat) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();
    let scale = format.minor_per_major().unsigned_abs();
    let major = group_digits(&(abs / scale).to_string(), format.thousands_separator());
    if format.precision() == 0 {
        return format!("{sign}{major}");
    }
    let minor = abs % scale;
    let width = usize::from(format.precision());
    format!("{sign}{major}{}{minor:0width$}", format.decimal_mark())
}

/// Whether `integer` either has no separators or is split into a leading
/// group of 1-3 characters followed by groups of exactly three.
fn is_grouped(integer: &str, separator: char) -> bool {
    let mut groups = integer.split(separator);
    let Some(first) = groups.next() else {
        return false;
    };
    let rest: Vec<&str> = groups.collect();
    if rest.is_empty() {
        return true;
    }
    (1..=3).contains(&first.len()) && rest.iter().all(|group| group.len() == 3)
}

/// Parses a localized decimal string into minor units.
///
/// Accepts an optional leading `+`/`-`, thousands separators placed every
/// three digits of the integer part and at most one decimal mark. Fraction digits beyond the currency
/// precision are accepted only when they are all zeros (`"1000.00"` for a
/// zero-precision currency), anything else is rejected rather than rounded.
pub fn parse_minor(input: &str, format: &CurrencyFormat) -> ResultEngine<i64> {
    let empty = || EngineError::InvalidAmount("empty amount".to_string());
    let invalid = || EngineError::InvalidAmount(format!("invalid amount: {input}"));
    let overflow = || EngineError::InvalidAmount("amount too large".to_string());

    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(empty());
    }

    let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
        (true, stripped)
    } else if let Some(stripped) = trimmed.strip_prefix('+') {
        (false, stripped)
    } else {
        (false, trimmed)
    };

    let rest = rest.trim();
    if rest.is_empty() {
        return Err(empty());
    }

    let (integer_part, fraction_part) = match rest.split_once(format.decimal_mark()) {
        Some((integer, fraction)) => (integer, fraction),
        None => (rest, ""),
    };

    if integer_part.is_empty() || !is_grouped(integer_part, format.thousands_separator()) {
        return Err(invalid());
    }
    let integer_digits: String = integer_part
        .chars()
        .filter(|c| *c != format.thousands_separator())
        .collect();
    if !integer_digits.chars().all(|c| c.is_ascii_digit())
        || !fraction_part.chars().all(|c| c.is_ascii_digit())
    {
        return Err(invalid());
    }

    let precision = usize::from(format.precision());
    let (kept, excess) = if fraction_part.len() > precision {
        fraction_part.split_at(precision)
    } else {
        (fraction_part, "")
    };
    if excess.chars().any(|c| c != '0') {
        return Err(EngineError::InvalidAmount(format!(
            "too many decimals: at most {precision} allowed"
        )));
    }

    let major: i64 = integer_digits.parse().map_err(|_| overflow())?;
    let minor: i64 = if precision == 0 {
        0
    } else {
        format!("{kept:0<precision$}")
            .parse()
            .map_err(|_| invalid())?
    };

    let total = major
        .checked_mul(format.minor_per_major())
        .and_then(|v| v.checked_add(minor))
        .ok_or_else(overflow)?;

    if negative {
        total.checked_neg().ok_or_else(overflow)
    } else {
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn usd() -> CurrencyFormat {
        CurrencyFormat::new(2, "$", true, '.', ',').unwrap()
    }

    fn eur() -> CurrencyFormat {
        CurrencyFormat::new(2, "€", true, ',', '.').unwrap()
    }

    fn jpy() -> CurrencyFormat {
        CurrencyFormat::new(0, "¥", true, '.', ',').unwrap()
    }

    fn bhd() -> CurrencyFormat {
        CurrencyFormat::new(3, "BD", true, '.', ',').unwrap()
    }

    #[test]
    fn grouping() {
        assert_eq!(group_digits("0", ','), "0");
        assert_eq!(group_digits("999", ','), "999");
        assert_eq!(group_digits("1000", ','), "1,000");
        assert_eq!(group_digits("1234567", '.'), "1.234.567");
        assert_eq!(group_digits("123456", ' '), "123 456");
    }

    #[test]
    fn formats_by_precision() {
        assert_eq!(format_minor(0, &usd()), "0.00");
        assert_eq!(format_minor(5, &usd()), "0.05");
        assert_eq!(format_minor(1050, &usd()), "10.50");
        assert_eq!(format_minor(-123_456_789, &usd()), "-1,234,567.89");
        assert_eq!(format_minor(123_456_789, &eur()), "1.234.567,89");
        assert_eq!(format_minor(1_500, &jpy()), "1,500");
        assert_eq!(format_minor(1_234_567, &bhd()), "1,234.567");
        assert_eq!(format_minor(i64::MIN, &jpy()), "-9,223,372,036,854,775,808");
    }

    #[test]
    fn parses_by_precision() {
        assert_eq!(parse_minor("10.50", &usd()).unwrap(), 1050);
        assert_eq!(parse_minor("10.5", &usd()).unwrap(), 1050);
        assert_eq!(parse_minor("10", &usd()).unwrap(), 1000);
        assert_eq!(parse_minor("10.", &usd()).unwrap(), 1000);
        assert_eq!(parse_minor("1,234.56", &usd()).unwrap(), 123_456);
        assert_eq!(parse_minor("1.234,56", &eur()).unwrap(), 123_456);
        assert_eq!(parse_minor(" -0.01 ", &usd()).unwrap(), -1);
        assert_eq!(parse_minor("+2", &usd()).unwrap(), 200);
        assert_eq!(parse_minor("1,500", &jpy()).unwrap(), 1500);
        assert_eq!(parse_minor("1500.00", &jpy()).unwrap(), 1500);
        assert_eq!(parse_minor("1.5", &bhd()).unwrap(), 1500);
    }

    #[test]
    fn rejects_malformed_input() {
        for input in ["", "  ", "-", "abc", "1.2.3", ".5", ",100", "1e3", "12.345", "--1"] {
            assert!(
                matches!(parse_minor(input, &usd()), Err(EngineError::InvalidAmount(_))),
                "{input:?} should be rejected"
            );
        }
        assert!(parse_minor("1500.5", &jpy()).is_err());
        assert!(parse_minor("1.234,567", &eur()).is_err());
        assert!(parse_minor("10,505", &eur()).is_err());
    }

    #[test]
    fn thousands_separators_must_group_by_three() {
        for input in ["10,50", "1,2,3", "5,", "1,,000", "1234,567", "1,0000", "12,34.50"] {
            assert!(
                matches!(parse_minor(input, &usd()), Err(EngineError::InvalidAmount(_))),
                "{input:?} should be rejected"
            );
        }
        assert!(parse_minor("10.50", &eur()).is_err());
        assert!(parse_minor("1 000", &usd()).is_err());

        assert_eq!(parse_minor("1,234,567.89", &usd()).unwrap(), 123_456_789);
        assert_eq!(parse_minor("12,345", &usd()).unwrap(), 1_234_500);
        assert_eq!(parse_minor("-123,456.7", &usd()).unwrap(), -12_345_670);
        assert_eq!(parse_minor("1234567.89", &usd()).unwrap(), 123_456_789);
        assert_eq!(parse_minor("1.234.567,89", &eur()).unwrap(), 123_456_789);
    }

    #[test]
    fn rejects_overflow() {
        assert!(parse_minor("99999999999999999999", &usd()).is_err());
        assert!(parse_minor("92233720368547758.08", &usd()).is_err());
        assert_eq!(
            parse_minor("92233720368547758.07", &usd()).unwrap(),
            i64::MAX
        );
    }

    fn any_format() -> impl Strategy<Value = CurrencyFormat> {
        (prop_oneof![Just(0_u8), Just(2), Just(3)], any::<bool>()).prop_map(
            |(precision, comma_decimal)| {
                let (decimal_mark, thousands_separator) =
                    if comma_decimal { (',', '.') } else { ('.', ',') };
                CurrencyFormat::new(precision, "¤", true, decimal_mark, thousands_separator)
                    .unwrap()
            },
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(512))]

        #[test]
        fn parse_inverts_format(amount in -i64::MAX..=i64::MAX, format in any_format()) {
            let text = format_minor(amount, &format);
            prop_assert_eq!(parse_minor(&text, &format).unwrap(), amount);
        }
    }
}
