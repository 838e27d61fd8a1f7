//! Transaction primitives.
//!
//! A `Transaction` is an atomic accounting event recorded as a balanced set
//! of [`JournalEntry`](crate::JournalEntry) lines in the tenant's base
//! currency.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, JournalEntryCollection, Money, ResultEngine, TxMeta};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    Transfer,
    Journal,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
            Self::Transfer => "transfer",
            Self::Journal => "journal",
        }
    }

    /// Whether entries must balance before the transaction is accepted.
    ///
    /// Manually entered journal transactions are exempt: each line is
    /// converted on its own, so multi-currency journals may carry rounding
    /// differences the caller has to settle.
    #[must_use]
    pub fn requires_balance(self) -> bool {
        !matches!(self, Self::Journal)
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "deposit" => Ok(Self::Deposit),
            "withdrawal" => Ok(Self::Withdrawal),
            "transfer" => Ok(Self::Transfer),
            "journal" => Ok(Self::Journal),
            other => Err(EngineError::InvalidAmount(format!(
                "invalid transaction kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Transaction {
    pub id: Uuid,
    pub kind: TransactionKind,
    pub posted_at: DateTime<Utc>,
    /// Amount in the originating account's own currency.
    pub amount: Money,
    pub description: Option<String>,
    pub entries: JournalEntryCollection,
}

impl Transaction {
    /// Finalizes a transaction.
    ///
    /// For every kind that [requires balance](TransactionKind::requires_balance)
    /// an unbalanced entry set is rejected with [`EngineError::Reconciliation`].
    pub fn new(
        kind: TransactionKind,
        amount: Money,
        meta: TxMeta,
        entries: JournalEntryCollection,
    ) -> ResultEngine<Self> {
        if !amount.is_positive() {
            return Err(EngineError::InvalidAmount(
                "amount_minor must be > 0".to_string(),
            ));
        }
        if kind.requires_balance()
            && let Err(err) = entries.ensure_balanced()
        {
            tracing::warn!("{} transaction rejected: {err}", kind.as_str());
            return Err(err);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            kind,
            posted_at: meta.posted_at,
            amount,
            description: meta.description,
            entries,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::{CurrencyCode, JournalEntry};

    fn usd(amount: i64) -> Money {
        Money::new(amount, CurrencyCode::new("USD").unwrap())
    }

    fn entries(debit: i64, credit: i64) -> JournalEntryCollection {
        JournalEntryCollection::new(
            CurrencyCode::new("USD").unwrap(),
            vec![
                JournalEntry::debit("Expense", usd(debit)),
                JournalEntry::credit("Cash", usd(credit)),
            ],
        )
        .unwrap()
    }

    #[test]
    fn unbalanced_entries_block_the_transaction() {
        let meta = TxMeta::new(Utc::now());
        let err = Transaction::new(TransactionKind::Withdrawal, usd(1000), meta, entries(1000, 999))
            .unwrap_err();
        assert!(matches!(err, EngineError::Reconciliation(_)));
    }

    #[test]
    fn journal_kind_skips_the_check() {
        let meta = TxMeta::new(Utc::now()).description("opening balance");
        let tx = Transaction::new(TransactionKind::Journal, usd(1000), meta, entries(1000, 999))
            .unwrap();
        assert_eq!(tx.description.as_deref(), Some("opening balance"));
        assert!(!tx.entries.are_balanced());
    }

    #[test]
    fn amount_must_be_positive() {
        let meta = TxMeta::new(Utc::now());
        assert!(matches!(
            Transaction::new(TransactionKind::Deposit, usd(0), meta, entries(0, 0)),
            Err(EngineError::InvalidAmount(_))
        ));
    }

    #[test]
    fn kind_names() {
        for kind in [
            TransactionKind::Deposit,
            TransactionKind::Withdrawal,
            TransactionKind::Transfer,
            TransactionKind::Journal,
        ] {
            assert_eq!(TransactionKind::try_from(kind.as_str()).unwrap(), kind);
        }
        assert!(TransactionKind::try_from("refund").is_err());
    }
}
