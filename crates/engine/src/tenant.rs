//! Tenant-scoped view over a [`CurrencyRegistry`].
//!
//! Every conversion and posting takes a `TenantContext` explicitly; the base
//! currency is never looked up from ambient state.

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::{
    CurrencyCode, CurrencyConverter, CurrencyFormat, CurrencyRegistry, CurrencyTable, EngineError,
    RATE_SCALE, ResultEngine,
};

/// A registry paired with the tenant's base currency.
pub struct TenantContext<'a, R: CurrencyRegistry + ?Sized> {
    registry: &'a R,
    base: CurrencyCode,
}

impl<'a, R: CurrencyRegistry + ?Sized> TenantContext<'a, R> {
    pub fn new(registry: &'a R, base: CurrencyCode) -> Self {
        Self { registry, base }
    }

    /// The tenant's base (accounting) currency.
    #[must_use]
    pub fn base(&self) -> CurrencyCode {
        self.base
    }

    #[must_use]
    pub fn registry(&self) -> &'a R {
        self.registry
    }

    /// Exchange rate of `code` relative to the base currency. Base is always `1`.
    ///
    /// Registry rates are quoted against the registry's own default. When the
    /// context's base is another currency the rate is crossed through it and
    /// rounded to [`RATE_SCALE`] places, the same way
    /// [`CurrencyTable::set_default`] rebases.
    pub fn rate(&self, code: CurrencyCode) -> ResultEngine<Decimal> {
        if code == self.base {
            return Ok(Decimal::ONE);
        }
        let rate = self.registry.rate(code)?;
        let pivot = self.registry.rate(self.base)?;
        if pivot == Decimal::ONE {
            return Ok(rate);
        }
        let cross = rate.checked_div(pivot).ok_or_else(|| {
            EngineError::InvalidRate(format!("cannot cross {code} through {}", self.base))
        })?;
        Ok(cross.round_dp_with_strategy(RATE_SCALE, RoundingStrategy::MidpointAwayFromZero))
    }

    pub fn formatting(&self, code: CurrencyCode) -> ResultEngine<CurrencyFormat> {
        self.registry.formatting(code)
    }

    #[must_use]
    pub fn converter(&self) -> CurrencyConverter<'a, R> {
        CurrencyConverter::new(*self)
    }
}

impl<'a> TenantContext<'a, CurrencyTable> {
    /// Context whose base is the table's default currency.
    pub fn for_table(table: &'a CurrencyTable) -> ResultEngine<Self> {
        let base = table
            .default_currency()
            .ok_or_else(|| EngineError::UnknownCurrency("no default currency".to_string()))?;
        Ok(Self::new(table, base.code))
    }
}

impl<R: CurrencyRegistry + ?Sized> Clone for TenantContext<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: CurrencyRegistry + ?Sized> Copy for TenantContext<'_, R> {}

impl<R: CurrencyRegistry + ?Sized> fmt::Debug for TenantContext<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TenantContext")
            .field("base", &self.base)
            .finish_non_exhaustive()
    }
}
