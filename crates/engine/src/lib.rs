//! Fixed-point money, currency conversion and double-entry balancing.
//!
//! All amounts are integers in a currency's minor units ([`Money`]). A tenant's
//! currencies, their formatting metadata and exchange rates come from a
//! [`CurrencyRegistry`]; every conversion and posting goes through an explicit
//! [`TenantContext`] that names the base currency. Transactions are recorded as
//! [`JournalEntryCollection`]s in that base currency and are refused when their
//! debits and credits do not match.
//!
//! The engine does no I/O and holds no shared mutable state.

pub use balance::BalanceValue;
pub use commands::{DepositCmd, JournalCmd, JournalLine, TransferCmd, TxMeta, WithdrawalCmd};
pub use converter::CurrencyConverter;
pub use currency::{Currency, CurrencyCode, CurrencyFormat, MAX_PRECISION};
pub use error::EngineError;
pub use formatting::{format_minor, parse_minor};
pub use journal::{EntryType, JournalEntry, JournalEntryCollection};
pub use money::Money;
pub use rate::{
    PERCENTAGE_SCALING_FACTOR, PRECISION, RateComputation, SCALING_FACTOR, ScaledRate,
    calculate_percentage, decimal_to_scaled_rate, format_scaled_rate, parse_localized_rate,
    scaled_rate_to_decimal,
};
pub use registry::{CurrencyRegistry, CurrencyTable, RATE_SCALE};
pub use tenant::TenantContext;
pub use transactions::{Transaction, TransactionKind};

mod balance;
mod commands;
mod converter;
mod currency;
mod error;
mod formatting;
mod journal;
mod money;
mod posting;
mod rate;
mod registry;
mod tenant;
mod transactions;

pub type ResultEngine<T> = Result<T, EngineError>;
