//! Reconciliation of journal entries read from CSV.
//!
//! Expected columns: `account,type,amount[,currency]`. Amounts are localized
//! decimal strings in the row's currency (base currency when the column is
//! missing or empty) and are converted into the base currency before summing.

use std::{error::Error, fmt, io::Read};

use engine::{
    CurrencyCode, CurrencyRegistry, EntryType, JournalEntry, JournalEntryCollection, Money,
    ResultEngine, TenantContext,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
struct Row {
    account: String,
    #[serde(rename = "type")]
    entry_type: String,
    amount: String,
    #[serde(default)]
    currency: Option<String>,
}

/// Reads every row into a collection in the base currency.
pub fn read_entries<R: Read, G: CurrencyRegistry + ?Sized>(
    reader: R,
    ctx: &TenantContext<'_, G>,
) -> Result<JournalEntryCollection, Box<dyn Error + Send + Sync>> {
    let converter = ctx.converter();
    let mut csv = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut entries = Vec::new();
    for (line, row) in csv.deserialize::<Row>().enumerate() {
        let row = row?;
        let currency = match row.currency.as_deref() {
            Some(code) if !code.is_empty() => CurrencyCode::new(code)?,
            _ => ctx.base(),
        };
        let minor = converter
            .prepare_for_accessor(&row.amount, currency)
            .map_err(|err| format!("row {}: {err}", line + 1))?;
        let base = converter.convert_to_base(Money::new(minor, currency))?;
        let entry_type = EntryType::try_from(row.entry_type.as_str())?;
        entries.push(JournalEntry::new(row.account, entry_type, base));
    }
    tracing::debug!("read {} journal entries", entries.len());

    Ok(JournalEntryCollection::new(ctx.base(), entries)?)
}

/// Totals of a reconciled set, formatted in the base currency.
#[derive(Debug, Serialize)]
pub struct ReconciliationReport {
    pub currency: String,
    pub entries: usize,
    pub debits: String,
    pub credits: String,
    pub imbalance: String,
    pub balanced: bool,
}

impl ReconciliationReport {
    pub fn new<G: CurrencyRegistry + ?Sized>(
        collection: &JournalEntryCollection,
        ctx: &TenantContext<'_, G>,
    ) -> ResultEngine<Self> {
        let registry = ctx.registry();
        Ok(Self {
            currency: collection.currency().to_string(),
            entries: collection.len(),
            debits: collection.sum_debits().format(registry)?,
            credits: collection.sum_credits().format(registry)?,
            imbalance: collection.imbalance()?.format(registry)?,
            balanced: collection.are_balanced(),
        })
    }
}

impl fmt::Display for ReconciliationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "entries:   {}", self.entries)?;
        writeln!(f, "debits:    {}", self.debits)?;
        writeln!(f, "credits:   {}", self.credits)?;
        writeln!(f, "imbalance: {}", self.imbalance)?;
        write!(
            f,
            "status:    {}",
            if self.balanced { "balanced" } else { "UNBALANCED" }
        )
    }
}

#[cfg(test)]
mod tests {
    use engine::{Currency, CurrencyTable, EngineError};
    use rust_decimal_macros::dec;

    use super::*;

    fn table() -> CurrencyTable {
        let mut table = CurrencyTable::new();
        table
            .insert(Currency::known(CurrencyCode::new("USD").unwrap()).unwrap())
            .unwrap();
        let mut cad = Currency::known(CurrencyCode::new("CAD").unwrap()).unwrap();
        cad.rate = dec!(1.36);
        table.insert(cad).unwrap();
        table
    }

    #[test]
    fn balanced_file() {
        let table = table();
        let ctx = TenantContext::for_table(&table).unwrap();
        let csv = "account,type,amount,currency\n\
                   Checking (USD),debit,\"1,102.94\",USD\n\
                   Chequing (CAD),credit,1500,CAD\n";

        let collection = read_entries(csv.as_bytes(), &ctx).unwrap();
        assert!(collection.are_balanced());
        assert_eq!(collection.sum_debits().amount_minor(), 110_294);

        let report = ReconciliationReport::new(&collection, &ctx).unwrap();
        assert_eq!(report.debits, "$1,102.94");
        assert_eq!(report.imbalance, "$0.00");
        assert!(report.to_string().ends_with("status:    balanced"));
    }

    #[test]
    fn unbalanced_file_without_currency_column() {
        let table = table();
        let ctx = TenantContext::for_table(&table).unwrap();
        let csv = "account,type,amount\nRent,debit,10.00\nCash,credit,9.99\n";

        let collection = read_entries(csv.as_bytes(), &ctx).unwrap();
        let report = ReconciliationReport::new(&collection, &ctx).unwrap();
        assert!(!report.balanced);
        assert_eq!(report.imbalance, "$0.01");
        assert!(matches!(
            collection.ensure_balanced(),
            Err(EngineError::Reconciliation(_))
        ));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["balanced"], false);
        assert_eq!(json["currency"], "USD");
    }

    #[test]
    fn bad_rows_are_reported() {
        let table = table();
        let ctx = TenantContext::for_table(&table).unwrap();

        let err = read_entries("account,type,amount\nRent,debit,ten\n".as_bytes(), &ctx)
            .unwrap_err();
        assert!(err.to_string().starts_with("row 1: Invalid amount"));

        assert!(read_entries("account,type,amount\nRent,both,1\n".as_bytes(), &ctx).is_err());
        assert!(
            read_entries("account,type,amount,currency\nRent,debit,1,GBP\n".as_bytes(), &ctx)
                .is_err()
        );
    }
}
