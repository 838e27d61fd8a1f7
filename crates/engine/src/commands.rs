//! Command structs for posting operations.
//!
//! These types group parameters for write operations
//! (deposit/withdrawal/transfer/journal), keeping call sites readable and
//! avoiding long argument lists.

use chrono::{DateTime, Utc};

use crate::{EntryType, Money};

/// Common metadata for transaction creation.
#[derive(Clone, Debug)]
pub struct TxMeta {
    pub description: Option<String>,
    pub posted_at: DateTime<Utc>,
}

impl TxMeta {
    #[must_use]
    pub fn new(posted_at: DateTime<Utc>) -> Self {
        Self {
            description: None,
            posted_at,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Money received into a bank account, balanced against an income/category account.
///
/// `amount` is in the bank account's currency.
#[derive(Clone, Debug)]
pub struct DepositCmd {
    pub account: String,
    pub offset_account: String,
    pub amount: Money,
    pub meta: TxMeta,
}

impl DepositCmd {
    #[must_use]
    pub fn new(
        account: impl Into<String>,
        offset_account: impl Into<String>,
        amount: Money,
        posted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            account: account.into(),
            offset_account: offset_account.into(),
            amount,
            meta: TxMeta::new(posted_at),
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.meta = self.meta.description(description);
        self
    }
}

/// Money paid out of a bank account, balanced against an expense/category account.
#[derive(Clone, Debug)]
pub struct WithdrawalCmd {
    pub account: String,
    pub offset_account: String,
    pub amount: Money,
    pub meta: TxMeta,
}

impl WithdrawalCmd {
    #[must_use]
    pub fn new(
        account: impl Into<String>,
        offset_account: impl Into<String>,
        amount: Money,
        posted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            account: account.into(),
            offset_account: offset_account.into(),
            amount,
            meta: TxMeta::new(posted_at),
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.meta = self.meta.description(description);
        self
    }
}

/// Move money between two accounts. `amount` is in the source account's currency.
#[derive(Clone, Debug)]
pub struct TransferCmd {
    pub from_account: String,
    pub to_account: String,
    pub amount: Money,
    pub meta: TxMeta,
}

impl TransferCmd {
    #[must_use]
    pub fn new(
        from_account: impl Into<String>,
        to_account: impl Into<String>,
        amount: Money,
        posted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            from_account: from_account.into(),
            to_account: to_account.into(),
            amount,
            meta: TxMeta::new(posted_at),
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.meta = self.meta.description(description);
        self
    }
}

/// One line of a manual journal transaction.
#[derive(Clone, Debug)]
pub struct JournalLine {
    pub account: String,
    pub entry_type: EntryType,
    pub amount: Money,
}

/// A manually entered journal transaction.
#[derive(Clone, Debug)]
pub struct JournalCmd {
    pub lines: Vec<JournalLine>,
    pub meta: TxMeta,
}

impl JournalCmd {
    #[must_use]
    pub fn new(posted_at: DateTime<Utc>) -> Self {
        Self {
            lines: Vec::new(),
            meta: TxMeta::new(posted_at),
        }
    }

    #[must_use]
    pub fn debit(mut self, account: impl Into<String>, amount: Money) -> Self {
        self.lines.push(JournalLine {
            account: account.into(),
            entry_type: EntryType::Debit,
            amount,
        });
        self
    }

    #[must_use]
    pub fn credit(mut self, account: impl Into<String>, amount: Money) -> Self {
        self.lines.push(JournalLine {
            account: account.into(),
            entry_type: EntryType::Credit,
            amount,
        });
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.meta = self.meta.description(description);
        self
    }
}
