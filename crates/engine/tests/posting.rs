use chrono::Utc;
use rust_decimal_macros::dec;

use engine::{
    Currency, CurrencyCode, CurrencyTable, DepositCmd, EngineError, EntryType, JournalCmd, Money,
    TenantContext, TransactionKind, TransferCmd, WithdrawalCmd,
};

fn code(value: &str) -> CurrencyCode {
    CurrencyCode::new(value).unwrap()
}

/// USD base, CAD at 1.36 per USD, EUR at 0.92, JPY at 150.
fn tenant_table() -> CurrencyTable {
    let mut table = CurrencyTable::new();
    for (value, rate) in [
        ("USD", dec!(1)),
        ("CAD", dec!(1.36)),
        ("EUR", dec!(0.92)),
        ("JPY", dec!(150)),
    ] {
        let mut currency = Currency::known(code(value)).unwrap();
        currency.rate = rate;
        table.insert(currency).unwrap();
    }
    table
}

#[test]
fn cad_to_usd_transfer_balances_in_base_currency() {
    let table = tenant_table();
    let ctx = TenantContext::for_table(&table).unwrap();

    let amount_minor = ctx
        .converter()
        .prepare_for_accessor("1500", code("CAD"))
        .unwrap();
    assert_eq!(amount_minor, 150_000);

    let tx = ctx
        .transfer(
            TransferCmd::new(
                "Chequing (CAD)",
                "Checking (USD)",
                Money::new(amount_minor, code("CAD")),
                Utc::now(),
            )
            .description("Move savings"),
        )
        .unwrap();

    assert_eq!(tx.kind, TransactionKind::Transfer);
    assert_eq!(tx.amount, Money::new(150_000, code("CAD")));
    assert_eq!(
        ctx.converter()
            .prepare_for_mutator(tx.amount.amount_minor(), code("CAD"))
            .unwrap(),
        "1,500.00"
    );

    let entries = &tx.entries;
    assert_eq!(entries.currency(), code("USD"));
    assert_eq!(entries.len(), 2);
    assert!(entries.are_balanced());
    assert_eq!(entries.sum_debits(), Money::new(110_294, code("USD")));
    assert_eq!(entries.sum_credits(), Money::new(110_294, code("USD")));

    let debit = entries.debits().next().unwrap();
    assert_eq!(debit.account, "Checking (USD)");
    let credit = entries.credits().next().unwrap();
    assert_eq!(credit.account, "Chequing (CAD)");
    assert_eq!(credit.entry_type, EntryType::Credit);
}

#[test]
fn deposit_and_withdrawal_sides() {
    let table = tenant_table();
    let ctx = TenantContext::for_table(&table).unwrap();

    let deposit = ctx
        .deposit(DepositCmd::new(
            "Checking",
            "Sales",
            Money::new(25_000, code("USD")),
            Utc::now(),
        ))
        .unwrap();
    assert_eq!(deposit.kind, TransactionKind::Deposit);
    assert_eq!(deposit.entries.debits().next().unwrap().account, "Checking");
    assert_eq!(deposit.entries.credits().next().unwrap().account, "Sales");
    assert_eq!(deposit.entries.sum_debits().amount_minor(), 25_000);

    let withdrawal = ctx
        .withdrawal(WithdrawalCmd::new(
            "Euro account",
            "Office supplies",
            Money::new(4_600, code("EUR")),
            Utc::now(),
        ))
        .unwrap();
    assert_eq!(withdrawal.entries.debits().next().unwrap().account, "Office supplies");
    assert_eq!(withdrawal.entries.credits().next().unwrap().account, "Euro account");
    // €46.00 / 0.92 = $50.00
    assert_eq!(withdrawal.entries.sum_credits(), Money::new(5_000, code("USD")));
    assert_eq!(withdrawal.amount, Money::new(4_600, code("EUR")));
}

#[test]
fn posting_rejects_bad_commands() {
    let table = tenant_table();
    let ctx = TenantContext::for_table(&table).unwrap();

    let same_account = ctx.transfer(TransferCmd::new(
        "Checking",
        "Checking",
        Money::new(100, code("USD")),
        Utc::now(),
    ));
    assert!(matches!(same_account, Err(EngineError::InvalidAmount(_))));

    let negative = ctx.deposit(DepositCmd::new(
        "Checking",
        "Sales",
        Money::new(-100, code("USD")),
        Utc::now(),
    ));
    assert!(matches!(negative, Err(EngineError::InvalidAmount(_))));

    let unknown = ctx.deposit(DepositCmd::new(
        "Checking",
        "Sales",
        Money::new(100, code("GBP")),
        Utc::now(),
    ));
    assert!(matches!(unknown, Err(EngineError::UnknownCurrency(_))));

    // A zero amount is not a transaction, whatever the currency.
    let dust = ctx.deposit(DepositCmd::new(
        "Yen account",
        "Sales",
        Money::new(0, code("JPY")),
        Utc::now(),
    ));
    assert!(matches!(dust, Err(EngineError::InvalidAmount(_))));
}

#[test]
fn manual_journal_converts_each_line() {
    let table = tenant_table();
    let ctx = TenantContext::for_table(&table).unwrap();

    let tx = ctx
        .journal(
            JournalCmd::new(Utc::now())
                .debit("Equipment", Money::new(136_000, code("CAD")))
                .credit("Owner's equity", Money::new(100_000, code("USD")))
                .description("Contributed equipment"),
        )
        .unwrap();
    assert_eq!(tx.kind, TransactionKind::Journal);
    assert!(tx.entries.are_balanced());
    assert_eq!(tx.amount, Money::new(100_000, code("USD")));

    // Rounding differences are left for the caller to settle.
    let tx = ctx
        .journal(
            JournalCmd::new(Utc::now())
                .debit("Fees", Money::new(1, code("CAD")))
                .debit("Fees", Money::new(1, code("CAD")))
                .credit("Cash", Money::new(2, code("CAD"))),
        )
        .unwrap();
    assert!(!tx.entries.are_balanced());
    assert!(matches!(
        tx.entries.ensure_balanced(),
        Err(EngineError::Reconciliation(_))
    ));

    assert!(ctx.journal(JournalCmd::new(Utc::now())).is_err());
}

#[test]
fn switching_base_currency_changes_where_balancing_happens() {
    let mut table = tenant_table();
    table.set_default(code("CAD")).unwrap();
    let ctx = TenantContext::for_table(&table).unwrap();

    let tx = ctx
        .transfer(TransferCmd::new(
            "Chequing (CAD)",
            "Checking (USD)",
            Money::new(150_000, code("CAD")),
            Utc::now(),
        ))
        .unwrap();
    assert_eq!(tx.entries.currency(), code("CAD"));
    assert_eq!(tx.entries.sum_debits(), Money::new(150_000, code("CAD")));
}
