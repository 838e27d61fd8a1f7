//! Currency metadata lookup.
//!
//! [`CurrencyRegistry`] is the seam between the engine and whatever stores a
//! tenant's currencies. [`CurrencyTable`] is the in-memory implementation.

use std::collections::BTreeMap;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::{Currency, CurrencyCode, CurrencyFormat, EngineError, ResultEngine};

/// Decimal places kept on rates recomputed by [`CurrencyTable::set_default`].
pub const RATE_SCALE: u32 = 10;

/// Source of per-currency formatting metadata and exchange rates.
///
/// Rates are relative to the tenant's base currency.
pub trait CurrencyRegistry {
    fn formatting(&self, code: CurrencyCode) -> ResultEngine<CurrencyFormat>;

    fn rate(&self, code: CurrencyCode) -> ResultEngine<Decimal>;
}

/// In-memory registry for one tenant.
///
/// The first currency inserted becomes the default (base) currency, so a
/// non-empty table always has exactly one default.
#[derive(Clone, Debug, Default)]
pub struct CurrencyTable {
    currencies: BTreeMap<CurrencyCode, Currency>,
    default: Option<CurrencyCode>,
}

impl CurrencyTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a currency.
    pub fn insert(&mut self, mut currency: Currency) -> ResultEngine<()> {
        if self.currencies.contains_key(&currency.code) {
            return Err(EngineError::ExistingKey(currency.code.to_string()));
        }
        if currency.rate <= Decimal::ZERO {
            return Err(EngineError::InvalidRate(format!(
                "rate for {} must be > 0",
                currency.code
            )));
        }

        let code = currency.code;
        currency.is_default = self.default.is_none();
        if currency.is_default {
            currency.rate = Decimal::ONE;
            currency.enabled = true;
            self.default = Some(code);
        }
        tracing::debug!(
            "registered currency {code} (rate {}, default: {})",
            currency.rate,
            currency.is_default
        );
        self.currencies.insert(code, currency);
        Ok(())
    }

    /// Makes `code` the base currency and rebases every rate against it.
    pub fn set_default(&mut self, code: CurrencyCode) -> ResultEngine<()> {
        let pivot = self.require(code)?.rate;
        if self.default == Some(code) {
            return Ok(());
        }

        let mut rebased = Vec::with_capacity(self.currencies.len());
        for (other, currency) in &self.currencies {
            let rate = if *other == code {
                Decimal::ONE
            } else {
                currency
                    .rate
                    .checked_div(pivot)
                    .ok_or_else(|| {
                        EngineError::InvalidRate(format!("cannot rebase {other} against {code}"))
                    })?
                    .round_dp_with_strategy(RATE_SCALE, RoundingStrategy::MidpointAwayFromZero)
            };
            rebased.push((*other, rate));
        }

        for (other, rate) in rebased {
            if let Some(currency) = self.currencies.get_mut(&other) {
                currency.rate = rate;
                currency.is_default = other == code;
                if currency.is_default {
                    currency.enabled = true;
                }
            }
        }
        tracing::debug!("default currency switched to {code}");
        self.default = Some(code);
        Ok(())
    }

    /// Updates the exchange rate of a non-base currency.
    pub fn update_rate(&mut self, code: CurrencyCode, rate: Decimal) -> ResultEngine<()> {
        if self.default == Some(code) {
            return Err(EngineError::InvalidRate(format!(
                "{code} is the base currency, its rate is fixed at 1"
            )));
        }
        if rate <= Decimal::ZERO {
            return Err(EngineError::InvalidRate(format!(
                "rate for {code} must be > 0"
            )));
        }
        self.require_mut(code)?.rate = rate;
        Ok(())
    }

    /// Enables or disables a currency. The base currency cannot be disabled.
    pub fn set_enabled(&mut self, code: CurrencyCode, enabled: bool) -> ResultEngine<()> {
        if !enabled && self.default == Some(code) {
            return Err(EngineError::InvalidCurrency(format!(
                "{code} is the base currency and cannot be disabled"
            )));
        }
        self.require_mut(code)?.enabled = enabled;
        Ok(())
    }

    #[must_use]
    pub fn get(&self, code: CurrencyCode) -> Option<&Currency> {
        self.currencies.get(&code)
    }

    #[must_use]
    pub fn default_currency(&self) -> Option<&Currency> {
        self.default.and_then(|code| self.currencies.get(&code))
    }

    /// All currencies ordered by code.
    pub fn iter(&self) -> impl Iterator<Item = &Currency> {
        self.currencies.values()
    }

    pub fn enabled(&self) -> impl Iterator<Item = &Currency> {
        self.iter().filter(|currency| currency.enabled)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.currencies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.currencies.is_empty()
    }

    fn require(&self, code: CurrencyCode) -> ResultEngine<&Currency> {
        self.currencies
            .get(&code)
            .ok_or_else(|| EngineError::UnknownCurrency(code.to_string()))
    }

    fn require_mut(&mut self, code: CurrencyCode) -> ResultEngine<&mut Currency> {
        self.currencies
            .get_mut(&code)
            .ok_or_else(|| EngineError::UnknownCurrency(code.to_string()))
    }
}

impl CurrencyRegistry for CurrencyTable {
    fn formatting(&self, code: CurrencyCode) -> ResultEngine<CurrencyFormat> {
        Ok(self.require(code)?.format.clone())
    }

    fn rate(&self, code: CurrencyCode) -> ResultEngine<Decimal> {
        let currency = self.require(code)?;
        if currency.is_default {
            return Ok(Decimal::ONE);
        }
        Ok(currency.rate)
    }
}
