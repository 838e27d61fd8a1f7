//! Balances shown in a currency other than the one they are kept in.

use serde::{Deserialize, Serialize};

use crate::{CurrencyCode, CurrencyRegistry, Money, ResultEngine, TenantContext};

/// An account balance plus the currency it should be displayed in.
///
/// The converted amount is computed on demand from the tenant's current rates
/// and is never written back: `value` stays the amount that gets persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceValue {
    value: Money,
    display_currency: CurrencyCode,
}

impl BalanceValue {
    /// A balance displayed in its own currency.
    #[must_use]
    pub const fn new(value: Money) -> Self {
        Self {
            value,
            display_currency: value.currency(),
        }
    }

    #[must_use]
    pub const fn with_display_currency(self, display_currency: CurrencyCode) -> Self {
        Self {
            value: self.value,
            display_currency,
        }
    }

    /// The balance as stored.
    #[must_use]
    pub const fn value(&self) -> Money {
        self.value
    }

    #[must_use]
    pub const fn display_currency(&self) -> CurrencyCode {
        self.display_currency
    }

    pub fn converted_amount<R: CurrencyRegistry + ?Sized>(
        &self,
        ctx: &TenantContext<'_, R>,
    ) -> ResultEngine<Money> {
        self.value.convert(self.display_currency, ctx)
    }

    pub fn format<R: CurrencyRegistry + ?Sized>(
        &self,
        ctx: &TenantContext<'_, R>,
    ) -> ResultEngine<String> {
        self.converted_amount(ctx)?.format(ctx.registry())
    }

    pub fn format_simple<R: CurrencyRegistry + ?Sized>(
        &self,
        ctx: &TenantContext<'_, R>,
    ) -> ResultEngine<String> {
        self.converted_amount(ctx)?.format_simple(ctx.registry())
    }
}
