//! Bridges between what a user types or sees and the integers that are stored.

use crate::{
    CurrencyCode, CurrencyRegistry, Money, ResultEngine, TenantContext,
    formatting::{format_minor, parse_minor},
};

/// Stateless string ⇄ minor-unit transforms and balance conversion for a tenant.
pub struct CurrencyConverter<'a, R: CurrencyRegistry + ?Sized> {
    ctx: TenantContext<'a, R>,
}

impl<'a, R: CurrencyRegistry + ?Sized> CurrencyConverter<'a, R> {
    pub fn new(ctx: TenantContext<'a, R>) -> Self {
        Self { ctx }
    }

    /// Parses a localized decimal string into minor units of `currency`.
    ///
    /// `"10.50"` in USD is `1050`.
    pub fn prepare_for_accessor(&self, display: &str, currency: CurrencyCode) -> ResultEngine<i64> {
        let format = self.ctx.formatting(currency)?;
        parse_minor(display, &format)
    }

    /// Renders minor units of `currency` as a localized plain number.
    ///
    /// `1050` in USD is `"10.50"`.
    pub fn prepare_for_mutator(&self, minor: i64, currency: CurrencyCode) -> ResultEngine<String> {
        let format = self.ctx.formatting(currency)?;
        Ok(format_minor(minor, &format))
    }

    /// Same rounding contract as [`Money::convert`].
    pub fn convert_balance(
        &self,
        minor: i64,
        from: CurrencyCode,
        to: CurrencyCode,
    ) -> ResultEngine<i64> {
        Ok(Money::new(minor, from).convert(to, &self.ctx)?.amount_minor())
    }

    /// Converts `money` into the tenant's base currency.
    pub fn convert_to_base(&self, money: Money) -> ResultEngine<Money> {
        money.convert(self.ctx.base(), &self.ctx)
    }

    /// Whether `input` is a non-empty, parseable, strictly positive amount in
    /// the base currency.
    #[must_use]
    pub fn is_valid_amount(&self, input: &str) -> bool {
        self.prepare_for_accessor(input, self.ctx.base())
            .is_ok_and(|minor| minor > 0)
    }
}
