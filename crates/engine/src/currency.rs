//! Currency codes and per-currency formatting metadata.
//!
//! ## Minor units
//!
//! The engine stores monetary values as an `i64` number of **minor units** (see `Money`).
//! [`CurrencyFormat::precision`] returns how many decimal digits are used when converting
//! between:
//! - major units (human input/output, e.g. `10.50 USD`)
//! - minor units (stored integers, e.g. `1050`)
//!
//! Example: USD has precision 2, so `10.50 USD` ⇄ `1050`; JPY has precision 0 and
//! BHD has precision 3.

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

/// Upper bound for [`CurrencyFormat::precision`].
pub const MAX_PRECISION: u8 = 8;

/// Three-letter ISO 4217 style currency code (`USD`, `CAD`, `BHD`, ...).
///
/// Always holds three ASCII uppercase letters.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode([u8; 3]);

impl CurrencyCode {
    /// Parses and normalizes a code (trimmed, upper-cased).
    pub fn new(value: &str) -> ResultEngine<Self> {
        let normalized = value.trim().to_ascii_uppercase();
        let bytes: [u8; 3] = normalized
            .as_bytes()
            .try_into()
            .map_err(|_| EngineError::InvalidCurrency(format!("invalid code: {value}")))?;
        if !bytes.iter().all(u8::is_ascii_uppercase) {
            return Err(EngineError::InvalidCurrency(format!(
                "invalid code: {value}"
            )));
        }
        Ok(Self(bytes))
    }

    /// Canonical currency code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CurrencyCode({})", self.as_str())
    }
}

impl FromStr for CurrencyCode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<&str> for CurrencyCode {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(value: CurrencyCode) -> Self {
        value.as_str().to_string()
    }
}

/// How amounts of a currency are rendered and parsed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CurrencyFormat {
    precision: u8,
    symbol: String,
    symbol_first: bool,
    decimal_mark: char,
    thousands_separator: char,
}

impl CurrencyFormat {
    /// Builds a validated format.
    ///
    /// The decimal mark and the thousands separator must differ and must not be
    /// digits or signs, otherwise parsing would be ambiguous.
    pub fn new(
        precision: u8,
        symbol: impl Into<String>,
        symbol_first: bool,
        decimal_mark: char,
        thousands_separator: char,
    ) -> ResultEngine<Self> {
        if precision > MAX_PRECISION {
            return Err(EngineError::InvalidCurrency(format!(
                "precision must be <= {MAX_PRECISION}, got {precision}"
            )));
        }
        if decimal_mark == thousands_separator {
            return Err(EngineError::InvalidCurrency(
                "decimal mark and thousands separator must differ".to_string(),
            ));
        }
        for mark in [decimal_mark, thousands_separator] {
            if mark.is_ascii_digit() || mark == '-' || mark == '+' {
                return Err(EngineError::InvalidCurrency(format!(
                    "invalid separator: {mark:?}"
                )));
            }
        }
        Ok(Self {
            precision,
            symbol: symbol.into(),
            symbol_first,
            decimal_mark,
            thousands_separator,
        })
    }

    /// Formatting metadata for a well-known currency, if any.
    #[must_use]
    pub fn known(code: CurrencyCode) -> Option<Self> {
        Currency::known(code).map(|currency| currency.format)
    }

    /// Number of minor-unit digits.
    #[must_use]
    pub const fn precision(&self) -> u8 {
        self.precision
    }

    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    #[must_use]
    pub const fn symbol_first(&self) -> bool {
        self.symbol_first
    }

    #[must_use]
    pub const fn decimal_mark(&self) -> char {
        self.decimal_mark
    }

    #[must_use]
    pub const fn thousands_separator(&self) -> char {
        self.thousands_separator
    }

    /// `10^precision`, the number of minor units in one major unit.
    #[must_use]
    pub const fn minor_per_major(&self) -> i64 {
        10i64.pow(self.precision as u32)
    }
}

/// A currency registered for a tenant.
///
/// `rate` is expressed relative to the tenant's base currency: one unit of the base
/// currency is worth `rate` units of this currency (base itself is always `1`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Currency {
    pub code: CurrencyCode,
    pub name: String,
    pub format: CurrencyFormat,
    pub rate: Decimal,
    pub enabled: bool,
    pub(crate) is_default: bool,
}

impl Currency {
    pub fn new(
        code: CurrencyCode,
        name: impl Into<String>,
        format: CurrencyFormat,
        rate: Decimal,
    ) -> Self {
        Self {
            code,
            name: name.into(),
            format,
            rate,
            enabled: true,
            is_default: false,
        }
    }

    /// A well-known currency with rate `1`, if the code is in the built-in table.
    #[must_use]
    pub fn known(code: CurrencyCode) -> Option<Self> {
        KNOWN_CURRENCIES
            .iter()
            .find(|known| known.code == code.as_str())
            .map(|known| Self {
                code,
                name: known.name.to_string(),
                format: CurrencyFormat {
                    precision: known.precision,
                    symbol: known.symbol.to_string(),
                    symbol_first: known.symbol_first,
                    decimal_mark: known.decimal_mark,
                    thousands_separator: known.thousands_separator,
                },
                rate: Decimal::ONE,
                enabled: true,
                is_default: false,
            })
    }

    /// Whether this currency is the tenant's base currency.
    #[must_use]
    pub const fn is_default(&self) -> bool {
        self.is_default
    }
}

struct KnownCurrency {
    code: &'static str,
    name: &'static str,
    precision: u8,
    symbol: &'static str,
    symbol_first: bool,
    decimal_mark: char,
    thousands_separator: char,
}

const fn known(
    code: &'static str,
    name: &'static str,
    precision: u8,
    symbol: &'static str,
    symbol_first: bool,
    decimal_mark: char,
    thousands_separator: char,
) -> KnownCurrency {
    KnownCurrency {
        code,
        name,
        precision,
        symbol,
        symbol_first,
        decimal_mark,
        thousands_separator,
    }
}

const KNOWN_CURRENCIES: &[KnownCurrency] = &[
    known("AUD", "Australian Dollar", 2, "$", true, '.', ','),
    known("BHD", "Bahraini Dinar", 3, "BD", true, '.', ','),
    known("BRL", "Brazilian Real", 2, "R$", true, ',', '.'),
    known("CAD", "Canadian Dollar", 2, "$", true, '.', ','),
    known("CHF", "Swiss Franc", 2, "CHF", true, '.', '\''),
    known("CNY", "Yuan Renminbi", 2, "¥", true, '.', ','),
    known("DKK", "Danish Krone", 2, "kr.", false, ',', '.'),
    known("EUR", "Euro", 2, "€", true, ',', '.'),
    known("GBP", "Pound Sterling", 2, "£", true, '.', ','),
    known("INR", "Indian Rupee", 2, "₹", true, '.', ','),
    known("JOD", "Jordanian Dinar", 3, "JD", true, '.', ','),
    known("JPY", "Yen", 0, "¥", true, '.', ','),
    known("KRW", "Won", 0, "₩", true, '.', ','),
    known("KWD", "Kuwaiti Dinar", 3, "KD", true, '.', ','),
    known("MXN", "Mexican Peso", 2, "$", true, '.', ','),
    known("NOK", "Norwegian Krone", 2, "kr", false, ',', '.'),
    known("PLN", "Zloty", 2, "zł", false, ',', ' '),
    known("SEK", "Swedish Krona", 2, "kr", false, ',', ' '),
    known("USD", "US Dollar", 2, "$", true, '.', ','),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_is_normalized() {
        let code = CurrencyCode::new(" usd ").unwrap();
        assert_eq!(code.as_str(), "USD");
        assert_eq!(code.to_string(), "USD");
        assert_eq!("cad".parse::<CurrencyCode>().unwrap().as_str(), "CAD");
    }

    #[test]
    fn code_rejects_garbage() {
        assert!(CurrencyCode::new("US").is_err());
        assert!(CurrencyCode::new("USDX").is_err());
        assert!(CurrencyCode::new("U5D").is_err());
        assert!(CurrencyCode::new("").is_err());
        assert!(CurrencyCode::new("ÜSD").is_err());
    }

    #[test]
    fn code_serializes_as_string() {
        let code = CurrencyCode::new("EUR").unwrap();
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"EUR\"");
        let back: CurrencyCode = serde_json::from_str("\"eur\"").unwrap();
        assert_eq!(back, code);
        assert!(serde_json::from_str::<CurrencyCode>("\"EURO\"").is_err());
    }

    #[test]
    fn format_validation() {
        assert!(CurrencyFormat::new(2, "$", true, '.', ',').is_ok());
        assert!(CurrencyFormat::new(2, "$", true, '.', '.').is_err());
        assert!(CurrencyFormat::new(2, "$", true, '1', ',').is_err());
        assert!(CurrencyFormat::new(2, "$", true, '.', '-').is_err());
        assert!(CurrencyFormat::new(MAX_PRECISION + 1, "$", true, '.', ',').is_err());
    }

    #[test]
    fn known_precisions_follow_iso() {
        let precision = |code: &str| {
            CurrencyFormat::known(CurrencyCode::new(code).unwrap())
                .unwrap()
                .precision()
        };
        assert_eq!(precision("USD"), 2);
        assert_eq!(precision("JPY"), 0);
        assert_eq!(precision("BHD"), 3);
        assert!(CurrencyFormat::known(CurrencyCode::new("XYZ").unwrap()).is_none());
    }

    #[test]
    fn known_currency_defaults() {
        let eur = Currency::known(CurrencyCode::new("EUR").unwrap()).unwrap();
        assert_eq!(eur.name, "Euro");
        assert_eq!(eur.rate, Decimal::ONE);
        assert!(eur.enabled);
        assert!(!eur.is_default());
        assert_eq!(eur.format.decimal_mark(), ',');
        assert_eq!(eur.format.minor_per_major(), 100);
    }
}
