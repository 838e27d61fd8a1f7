//! The module contains the errors the engine can return.
//!
//! Every variant is a data-validation failure: nothing here is transient and
//! nothing is retried. The errors are:
//!
//! - [`InvalidAmount`] thrown when a monetary input cannot be parsed or is out of range.
//! - [`InvalidRate`] thrown when a rate input cannot be parsed or is not acceptable.
//! - [`Reconciliation`] thrown when debits and credits of a set do not match.
//! - [`UnknownCurrency`] thrown when a currency code has no registered metadata.
//!
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`InvalidRate`]: EngineError::InvalidRate
//!  [`Reconciliation`]: EngineError::Reconciliation
//!  [`UnknownCurrency`]: EngineError::UnknownCurrency
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid rate: {0}")]
    InvalidRate(String),
    #[error("Reconciliation error: {0}")]
    Reconciliation(String),
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),
    #[error("Invalid currency: {0}")]
    InvalidCurrency(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Currency mismatch: {0}")]
    CurrencyMismatch(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_context() {
        let err = EngineError::Reconciliation("debits 1000 != credits 999".to_string());
        assert_eq!(
            err.to_string(),
            "Reconciliation error: debits 1000 != credits 999"
        );
        assert_eq!(
            EngineError::ExistingKey("USD".to_string()).to_string(),
            "\"USD\" already present!"
        );
    }
}
