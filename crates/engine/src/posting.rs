//! Building transactions from commands.
//!
//! Every command amount is converted into the tenant's base currency before
//! entries are built, so all balancing happens in one currency. The
//! transaction keeps the original amount in the account's own currency.

use crate::{
    CurrencyRegistry, DepositCmd, EngineError, JournalCmd, JournalEntry, JournalEntryCollection,
    Money, ResultEngine, TenantContext, Transaction, TransactionKind, TransferCmd, TxMeta,
    WithdrawalCmd,
};

impl<R: CurrencyRegistry + ?Sized> TenantContext<'_, R> {
    pub fn deposit(&self, cmd: DepositCmd) -> ResultEngine<Transaction> {
        let DepositCmd {
            account,
            offset_account,
            amount,
            meta,
        } = cmd;
        let base = self.to_base_positive(amount)?;
        let entries = vec![
            JournalEntry::debit(account, base),
            JournalEntry::credit(offset_account, base),
        ];
        self.finish(TransactionKind::Deposit, amount, meta, entries)
    }

    pub fn withdrawal(&self, cmd: WithdrawalCmd) -> ResultEngine<Transaction> {
        let WithdrawalCmd {
            account,
            offset_account,
            amount,
            meta,
        } = cmd;
        let base = self.to_base_positive(amount)?;
        let entries = vec![
            JournalEntry::debit(offset_account, base),
            JournalEntry::credit(account, base),
        ];
        self.finish(TransactionKind::Withdrawal, amount, meta, entries)
    }

    /// Debits the destination and credits the source with the same base amount.
    pub fn transfer(&self, cmd: TransferCmd) -> ResultEngine<Transaction> {
        if cmd.from_account == cmd.to_account {
            return Err(EngineError::InvalidAmount(
                "from_account and to_account must differ".to_string(),
            ));
        }
        let TransferCmd {
            from_account,
            to_account,
            amount,
            meta,
        } = cmd;
        let base = self.to_base_positive(amount)?;
        let entries = vec![
            JournalEntry::debit(to_account, base),
            JournalEntry::credit(from_account, base),
        ];
        self.finish(TransactionKind::Transfer, amount, meta, entries)
    }

    /// Records manual lines as given. The result is not required to balance;
    /// callers check [`JournalEntryCollection::ensure_balanced`] themselves.
    pub fn journal(&self, cmd: JournalCmd) -> ResultEngine<Transaction> {
        if cmd.lines.is_empty() {
            return Err(EngineError::InvalidAmount(
                "journal transaction has no lines".to_string(),
            ));
        }
        let mut entries = Vec::with_capacity(cmd.lines.len());
        for line in cmd.lines {
            let base = self.to_base_positive(line.amount)?;
            entries.push(JournalEntry::new(line.account, line.entry_type, base));
        }
        let collection = JournalEntryCollection::new(self.base(), entries)?;
        let (debits, credits) = (collection.sum_debits(), collection.sum_credits());
        let amount = if debits.amount_minor() >= credits.amount_minor() {
            debits
        } else {
            credits
        };
        let tx = Transaction::new(TransactionKind::Journal, amount, cmd.meta, collection)?;
        tracing::debug!(
            "posted journal transaction {} ({} lines)",
            tx.id,
            tx.entries.len()
        );
        Ok(tx)
    }

    fn to_base_positive(&self, amount: Money) -> ResultEngine<Money> {
        if !amount.is_positive() {
            return Err(EngineError::InvalidAmount(
                "amount_minor must be > 0".to_string(),
            ));
        }
        let base = self.converter().convert_to_base(amount)?;
        if !base.is_positive() {
            return Err(EngineError::InvalidAmount(format!(
                "{} {} is worth nothing in {}",
                amount.amount_minor(),
                amount.currency(),
                self.base()
            )));
        }
        Ok(base)
    }

    fn finish(
        &self,
        kind: TransactionKind,
        amount: Money,
        meta: TxMeta,
        entries: Vec<JournalEntry>,
    ) -> ResultEngine<Transaction> {
        let collection = JournalEntryCollection::new(self.base(), entries)?;
        let tx = Transaction::new(kind, amount, meta, collection)?;
        tracing::debug!(
            "posted {} transaction {}: {} {} → {} {}",
            kind.as_str(),
            tx.id,
            amount.amount_minor(),
            amount.currency(),
            tx.entries.sum_debits().amount_minor(),
            self.base()
        );
        Ok(tx)
    }
}
