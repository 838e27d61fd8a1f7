//! Journal entries.
//!
//! A [`JournalEntry`] is one debit or credit line of a double-entry
//! [`Transaction`](crate::Transaction). A [`JournalEntryCollection`] is the
//! set of lines of one transaction, all expressed in the same currency (the
//! tenant's base currency), and is where the accounting identity
//! `sum(debits) == sum(credits)` is checked.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{CurrencyCode, EngineError, Money, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    Debit,
    Credit,
}

impl EntryType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debit => "debit",
            Self::Credit => "credit",
        }
    }
}

impl TryFrom<&str> for EntryType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "debit" => Ok(Self::Debit),
            "credit" => Ok(Self::Credit),
            other => Err(EngineError::InvalidAmount(format!(
                "invalid entry type: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: Uuid,
    pub account: String,
    pub entry_type: EntryType,
    pub amount: Money,
    pub description: Option<String>,
}

impl JournalEntry {
    pub fn new(account: impl Into<String>, entry_type: EntryType, amount: Money) -> Self {
        Self {
            id: Uuid::new_v4(),
            account: account.into(),
            entry_type,
            amount,
            description: None,
        }
    }

    pub fn debit(account: impl Into<String>, amount: Money) -> Self {
        Self::new(account, EntryType::Debit, amount)
    }

    pub fn credit(account: impl Into<String>, amount: Money) -> Self {
        Self::new(account, EntryType::Credit, amount)
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// An immutable set of entries in one currency with precomputed totals.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct JournalEntryCollection {
    currency: CurrencyCode,
    entries: Vec<JournalEntry>,
    debits: Money,
    credits: Money,
}

impl JournalEntryCollection {
    /// Builds the collection, rejecting entries in another currency and
    /// totals that overflow.
    pub fn new(currency: CurrencyCode, entries: Vec<JournalEntry>) -> ResultEngine<Self> {
        let mut debits = Money::zero(currency);
        let mut credits = Money::zero(currency);
        for entry in &entries {
            if entry.amount.currency() != currency {
                return Err(EngineError::CurrencyMismatch(format!(
                    "journal currency is {currency}, entry for {} is in {}",
                    entry.account,
                    entry.amount.currency()
                )));
            }
            match entry.entry_type {
                EntryType::Debit => debits = debits.checked_add(entry.amount)?,
                EntryType::Credit => credits = credits.checked_add(entry.amount)?,
            }
        }
        Ok(Self {
            currency,
            entries,
            debits,
            credits,
        })
    }

    #[must_use]
    pub fn currency(&self) -> CurrencyCode {
        self.currency
    }

    #[must_use]
    pub fn sum_debits(&self) -> Money {
        self.debits
    }

    #[must_use]
    pub fn sum_credits(&self) -> Money {
        self.credits
    }

    #[must_use]
    pub fn are_balanced(&self) -> bool {
        self.debits.amount_minor() == self.credits.amount_minor()
    }

    /// `debits - credits`; zero when balanced.
    pub fn imbalance(&self) -> ResultEngine<Money> {
        self.debits.checked_sub(self.credits)
    }

    /// Fails with [`EngineError::Reconciliation`] when the set does not balance.
    pub fn ensure_balanced(&self) -> ResultEngine<()> {
        if self.are_balanced() {
            return Ok(());
        }
        Err(EngineError::Reconciliation(format!(
            "debits {} != credits {} ({})",
            self.debits.amount_minor(),
            self.credits.amount_minor(),
            self.currency
        )))
    }

    #[must_use]
    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    pub fn debits(&self) -> impl Iterator<Item = &JournalEntry> {
        self.of_type(EntryType::Debit)
    }

    pub fn credits(&self) -> impl Iterator<Item = &JournalEntry> {
        self.of_type(EntryType::Credit)
    }

    fn of_type(&self, entry_type: EntryType) -> impl Iterator<Item = &JournalEntry> {
        self.entries
            .iter()
            .filter(move |entry| entry.entry_type == entry_type)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
