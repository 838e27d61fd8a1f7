//! Scaled-integer rates.
//!
//! Percentages (tax and discount rates) are stored as integers scaled by
//! [`SCALING_FACTOR`], so `52.5%` is stored as `525000`. Fixed adjustments are
//! stored in the currency's minor units instead. A [`ScaledRate`] carries the
//! stored integer together with how it must be applied.
//!
//! All arithmetic on stored rates is integer arithmetic; rounding is half away
//! from zero.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};

use crate::{
    CurrencyCode, CurrencyRegistry, EngineError, ResultEngine, TenantContext,
    formatting::group_digits,
};

/// Fraction digits kept on a percentage.
pub const PRECISION: u32 = 4;

/// `10^PRECISION`.
pub const SCALING_FACTOR: i64 = 10_i64.pow(PRECISION);

/// Divisor turning `amount * scaled_percentage` back into an amount.
pub const PERCENTAGE_SCALING_FACTOR: i64 = SCALING_FACTOR * 100;

/// `round(value * scaled_rate / PERCENTAGE_SCALING_FACTOR)`, half away from zero.
///
/// The product is computed in `i128`, so any pair of `i64` inputs is accepted;
/// only a result that does not fit an `i64` is rejected.
pub fn calculate_percentage(value: i64, scaled_rate: i64) -> ResultEngine<i64> {
    let product = i128::from(value) * i128::from(scaled_rate);
    let divisor = i128::from(PERCENTAGE_SCALING_FACTOR);
    let half = divisor / 2;
    let rounded = if product >= 0 {
        (product + half) / divisor
    } else {
        (product - half) / divisor
    };
    i64::try_from(rounded).map_err(|_| {
        EngineError::InvalidAmount(format!(
            "{scaled_rate} percent of {value} does not fit in minor units"
        ))
    })
}

/// `525000 -> 52.5`
///
/// Exact enough to round-trip through [`decimal_to_scaled_rate`] for
/// `|scaled_rate| <= 10^12` (rates up to `10^8`). Larger values lose digits
/// to `f64`.
#[must_use]
pub fn scaled_rate_to_decimal(scaled_rate: i64) -> f64 {
    scaled_rate as f64 / SCALING_FACTOR as f64
}

/// `52.5 -> 525000`, the inverse of [`scaled_rate_to_decimal`].
///
/// Only meaningful for finite inputs with `|decimal| <= 10^8`. The cast
/// saturates: `NaN` becomes `0` and infinities become `i64::MIN`/`i64::MAX`.
/// Use [`parse_localized_rate`] for untrusted input.
#[must_use]
pub fn decimal_to_scaled_rate(decimal: f64) -> i64 {
    (decimal * SCALING_FACTOR as f64).round() as i64
}

/// Parses a rate typed with localized separators into its scaled form.
///
/// Thousands separators are dropped, the decimal mark becomes `.`, and the
/// value is scaled by [`SCALING_FACTOR`] and rounded. A trailing `%` is
/// tolerated.
///
/// `parse_localized_rate("1,234.56", '.', ',') == Ok(12_345_600)`
pub fn parse_localized_rate(
    value: &str,
    decimal_mark: char,
    thousands_separator: char,
) -> ResultEngine<i64> {
    let invalid = || EngineError::InvalidRate(format!("invalid rate: {value:?}"));

    let trimmed = value.trim();
    let trimmed = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();
    let normalized: String = trimmed
        .chars()
        .filter(|c| *c != thousands_separator)
        .map(|c| if c == decimal_mark { '.' } else { c })
        .collect();
    if normalized.is_empty() {
        return Err(invalid());
    }

    let decimal = Decimal::from_str(&normalized).map_err(|_| invalid())?;
    decimal
        .checked_mul(Decimal::from(SCALING_FACTOR))
        .map(|scaled| scaled.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|scaled| scaled.to_i64())
        .ok_or_else(|| EngineError::InvalidRate(format!("rate out of range: {value}")))
}

/// Renders a scaled rate with the given separators, dropping trailing zeros.
///
/// `500000 -> "50"`, `525000 -> "52.5"`, `12345600 -> "1,234.56"`.
#[must_use]
pub fn format_scaled_rate(scaled_rate: i64, decimal_mark: char, thousands_separator: char) -> String {
    let sign = if scaled_rate < 0 { "-" } else { "" };
    let abs = scaled_rate.unsigned_abs();
    let scale = SCALING_FACTOR.unsigned_abs();
    let integer = group_digits(&(abs / scale).to_string(), thousands_separator);
    let width = PRECISION as usize;
    let fraction = format!("{:0width$}", abs % scale);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        format!("{sign}{integer}")
    } else {
        format!("{sign}{integer}{decimal_mark}{fraction}")
    }
}

/// How a stored rate is applied to an amount.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateComputation {
    /// Scaled by [`SCALING_FACTOR`]; applied as a percentage of the amount.
    Percentage,
    /// Scaled by the currency precision; applied as-is.
    Fixed,
}

impl RateComputation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Percentage => "percentage",
            Self::Fixed => "fixed",
        }
    }
}

impl TryFrom<&str> for RateComputation {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "percentage" => Ok(Self::Percentage),
            "fixed" => Ok(Self::Fixed),
            other => Err(EngineError::InvalidRate(format!(
                "invalid rate computation: {other}"
            ))),
        }
    }
}

/// A stored rate: the scaled integer and the way it is computed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScaledRate {
    pub value: i64,
    pub computation: RateComputation,
}

impl ScaledRate {
    #[must_use]
    pub const fn percentage(value: i64) -> Self {
        Self {
            value,
            computation: RateComputation::Percentage,
        }
    }

    #[must_use]
    pub const fn fixed(value: i64) -> Self {
        Self {
            value,
            computation: RateComputation::Fixed,
        }
    }

    /// Parses user input using `currency`'s separators (and precision, for
    /// fixed amounts).
    pub fn parse<R: CurrencyRegistry + ?Sized>(
        input: &str,
        computation: RateComputation,
        currency: CurrencyCode,
        ctx: &TenantContext<'_, R>,
    ) -> ResultEngine<Self> {
        let value = match computation {
            RateComputation::Percentage => {
                let format = ctx.formatting(currency)?;
                parse_localized_rate(input, format.decimal_mark(), format.thousands_separator())?
            }
            RateComputation::Fixed => ctx.converter().prepare_for_accessor(input, currency)?,
        };
        Ok(Self { value, computation })
    }

    pub fn format<R: CurrencyRegistry + ?Sized>(
        &self,
        currency: CurrencyCode,
        ctx: &TenantContext<'_, R>,
    ) -> ResultEngine<String> {
        match self.computation {
            RateComputation::Percentage => {
                let format = ctx.formatting(currency)?;
                Ok(format_scaled_rate(
                    self.value,
                    format.decimal_mark(),
                    format.thousands_separator(),
                ))
            }
            RateComputation::Fixed => ctx.converter().prepare_for_mutator(self.value, currency),
        }
    }

    /// The adjustment this rate produces on `amount_minor`.
    pub fn apply(&self, amount_minor: i64) -> ResultEngine<i64> {
        match self.computation {
            RateComputation::Percentage => calculate_percentage(amount_minor, self.value),
            RateComputation::Fixed => Ok(self.value),
        }
    }
}
