use std::ops::Neg;

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};

use crate::{
    CurrencyCode, CurrencyFormat, CurrencyRegistry, EngineError, ResultEngine, TenantContext,
    formatting::format_minor,
};

/// Signed money amount represented as an integer number of **minor units**
/// tied to a currency.
///
/// Use this type for **all** monetary values in the engine (balances, journal
/// entries, fixed adjustments) to avoid floating-point drift. The number of
/// minor units per major unit depends on the currency's precision: `1050` is
/// `10.50` in USD, `1,050` in JPY and `1.050` in BHD.
///
/// `Money` is immutable; conversions return a new value.
///
/// # Examples
///
/// ```rust
/// use engine::{CurrencyCode, CurrencyFormat, Money};
///
/// let usd = CurrencyCode::new("USD").unwrap();
/// let format = CurrencyFormat::known(usd).unwrap();
/// let amount = Money::new(123_456, usd);
/// assert_eq!(amount.format_using(&format), "$1,234.56");
/// assert_eq!(amount.format_simple_using(&format), "1,234.56");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    amount_minor: i64,
    currency: CurrencyCode,
}

impl Money {
    #[must_use]
    pub const fn new(amount_minor: i64, currency: CurrencyCode) -> Self {
        Self {
            amount_minor,
            currency,
        }
    }

    #[must_use]
    pub const fn zero(currency: CurrencyCode) -> Self {
        Self::new(0, currency)
    }

    /// Returns the raw value in minor units.
    #[must_use]
    pub const fn amount_minor(&self) -> i64 {
        self.amount_minor
    }

    #[must_use]
    pub const fn currency(&self) -> CurrencyCode {
        self.currency
    }

    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.amount_minor == 0
    }

    #[must_use]
    pub const fn is_positive(&self) -> bool {
        self.amount_minor > 0
    }

    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.amount_minor < 0
    }

    /// Magnitude of the amount. Saturates at `i64::MAX`.
    #[must_use]
    pub const fn abs(&self) -> Self {
        Self::new(self.amount_minor.saturating_abs(), self.currency)
    }

    /// Checked addition of two amounts in the same currency.
    pub fn checked_add(self, rhs: Money) -> ResultEngine<Money> {
        self.ensure_same_currency(rhs)?;
        self.amount_minor
            .checked_add(rhs.amount_minor)
            .map(|amount| Money::new(amount, self.currency))
            .ok_or_else(|| EngineError::InvalidAmount("amount too large".to_string()))
    }

    /// Checked subtraction of two amounts in the same currency.
    pub fn checked_sub(self, rhs: Money) -> ResultEngine<Money> {
        self.ensure_same_currency(rhs)?;
        self.amount_minor
            .checked_sub(rhs.amount_minor)
            .map(|amount| Money::new(amount, self.currency))
            .ok_or_else(|| EngineError::InvalidAmount("amount too large".to_string()))
    }

    fn ensure_same_currency(self, other: Money) -> ResultEngine<()> {
        if self.currency != other.currency {
            return Err(EngineError::CurrencyMismatch(format!(
                "expected {}, got {}",
                self.currency, other.currency
            )));
        }
        Ok(())
    }

    /// Renders with the currency symbol on the side the format asks for,
    /// e.g. `-$1,234.56` or `1 234,56 kr`.
    #[must_use]
    pub fn format_using(&self, format: &CurrencyFormat) -> String {
        let sign = if self.amount_minor < 0 { "-" } else { "" };
        let number = format_minor(self.amount_minor, format);
        let number = number.trim_start_matches('-');
        if format.symbol_first() {
            format!("{sign}{}{number}", format.symbol())
        } else {
            format!("{sign}{number} {}", format.symbol())
        }
    }

    /// Renders the plain localized number, without symbol or code.
    #[must_use]
    pub fn format_simple_using(&self, format: &CurrencyFormat) -> String {
        format_minor(self.amount_minor, format)
    }

    /// Renders the plain number followed by the currency code: `1,234.56 USD`.
    #[must_use]
    pub fn format_with_code_using(&self, format: &CurrencyFormat) -> String {
        format!("{} {}", format_minor(self.amount_minor, format), self.currency)
    }

    /// [`format_using`](Self::format_using) with metadata from a registry.
    pub fn format<R: CurrencyRegistry + ?Sized>(&self, registry: &R) -> ResultEngine<String> {
        Ok(self.format_using(&registry.formatting(self.currency)?))
    }

    pub fn format_simple<R: CurrencyRegistry + ?Sized>(
        &self,
        registry: &R,
    ) -> ResultEngine<String> {
        Ok(self.format_simple_using(&registry.formatting(self.currency)?))
    }

    pub fn format_with_code<R: CurrencyRegistry + ?Sized>(
        &self,
        registry: &R,
    ) -> ResultEngine<String> {
        Ok(self.format_with_code_using(&registry.formatting(self.currency)?))
    }

    /// Converts into `to` using the tenant's exchange rates.
    ///
    /// The result is `round(amount * rate(to) / rate(from))`, shifted by the
    /// difference in precision and rounded once, half away from zero. When the
    /// currencies match the value is returned untouched.
    ///
    /// Conversion is lossy: converting A→B→A may not give back the original
    /// amount.
    pub fn convert<R: CurrencyRegistry + ?Sized>(
        &self,
        to: CurrencyCode,
        ctx: &TenantContext<'_, R>,
    ) -> ResultEngine<Money> {
        if to == self.currency {
            return Ok(*self);
        }

        let from_format = ctx.formatting(self.currency)?;
        let to_format = ctx.formatting(to)?;
        let from_rate = ctx.rate(self.currency)?;
        let to_rate = ctx.rate(to)?;

        let overflow = || {
            EngineError::InvalidAmount(format!(
                "converting {} {} to {to} overflows",
                self.amount_minor, self.currency
            ))
        };
        let numerator = Decimal::from(self.amount_minor)
            .checked_mul(to_rate)
            .and_then(|v| v.checked_mul(Decimal::from(to_format.minor_per_major())))
            .ok_or_else(overflow)?;
        let denominator = from_rate
            .checked_mul(Decimal::from(from_format.minor_per_major()))
            .ok_or_else(overflow)?;
        let converted = numerator.checked_div(denominator).ok_or_else(|| {
            EngineError::InvalidRate(format!("cannot convert from {}", self.currency))
        })?;

        Ok(Money::new(round_to_minor(converted).ok_or_else(overflow)?, to))
    }

    /// Converts with an explicit `rate(to) / rate(from)` ratio between two
    /// currencies of the same precision. Identity when the currencies match,
    /// whatever the ratio.
    pub fn convert_with_ratio(&self, to: CurrencyCode, ratio: Decimal) -> ResultEngine<Money> {
        if to == self.currency {
            return Ok(*self);
        }
        if ratio <= Decimal::ZERO {
            return Err(EngineError::InvalidRate(format!(
                "conversion ratio must be > 0, got {ratio}"
            )));
        }
        let amount = Decimal::from(self.amount_minor)
            .checked_mul(ratio)
            .and_then(round_to_minor)
            .ok_or_else(|| EngineError::InvalidAmount("amount too large".to_string()))?;
        Ok(Money::new(amount, to))
    }
}

fn round_to_minor(value: Decimal) -> Option<i64> {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Self::Output {
        Money::new(self.amount_minor.saturating_neg(), self.currency)
    }
}
