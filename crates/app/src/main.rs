use std::{error::Error, fs::File};

use clap::{Args, Parser, Subcommand};
use engine::{
    CurrencyCode, CurrencyRegistry, CurrencyTable, Money, RateComputation, ScaledRate,
    TenantContext,
};

mod reconcile;
mod settings;

type AppResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

#[derive(Parser, Debug)]
#[command(name = "tally")]
#[command(about = "Fixed-point money formatting, conversion and reconciliation")]
struct Cli {
    /// Settings file without extension (also read from `TALLY_CONFIG`).
    #[arg(long, env = "TALLY_CONFIG", default_value = "settings")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lists configured currencies and their rates against the base.
    Currencies,
    /// Renders an amount given in minor units.
    Format(FormatArgs),
    /// Parses a localized amount into minor units.
    Parse(ParseArgs),
    /// Converts a localized amount between two currencies.
    Convert(ConvertArgs),
    Rate(Rate),
    /// Sums a CSV of journal entries and fails when it does not balance.
    Reconcile(ReconcileArgs),
}

#[derive(Args, Debug)]
struct FormatArgs {
    #[arg(allow_hyphen_values = true)]
    amount_minor: i64,
    /// Defaults to the base currency.
    #[arg(long)]
    currency: Option<String>,
    /// Plain number, no symbol.
    #[arg(long, conflicts_with = "code")]
    simple: bool,
    /// Number followed by the currency code.
    #[arg(long)]
    code: bool,
}

#[derive(Args, Debug)]
struct ParseArgs {
    #[arg(allow_hyphen_values = true)]
    text: String,
    #[arg(long)]
    currency: Option<String>,
}

#[derive(Args, Debug)]
struct ConvertArgs {
    #[arg(allow_hyphen_values = true)]
    text: String,
    #[arg(long)]
    from: String,
    /// Defaults to the base currency.
    #[arg(long)]
    to: Option<String>,
}

#[derive(Args, Debug)]
struct Rate {
    #[command(subcommand)]
    command: RateCommand,
}

#[derive(Subcommand, Debug)]
enum RateCommand {
    /// Parses a localized rate into its scaled integer.
    Parse(RateArgs),
    /// Renders a scaled integer rate.
    Format(RateFormatArgs),
    /// Applies a localized rate to an amount in minor units.
    Apply(RateApplyArgs),
}

#[derive(Args, Debug)]
struct RateArgs {
    rate: String,
    #[arg(long)]
    currency: Option<String>,
    /// Treat the rate as a fixed amount instead of a percentage.
    #[arg(long)]
    fixed: bool,
}

#[derive(Args, Debug)]
struct RateFormatArgs {
    #[arg(allow_hyphen_values = true)]
    scaled: i64,
    #[arg(long)]
    currency: Option<String>,
    #[arg(long)]
    fixed: bool,
}

#[derive(Args, Debug)]
struct RateApplyArgs {
    rate: String,
    #[arg(allow_hyphen_values = true)]
    amount_minor: i64,
    #[arg(long)]
    currency: Option<String>,
    #[arg(long)]
    fixed: bool,
}

#[derive(Args, Debug)]
struct ReconcileArgs {
    path: String,
    /// Print the report as JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> AppResult<()> {
    let cli = Cli::parse();
    let settings = settings::Settings::new(&cli.config)?;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(format!(
            "tally={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let table = settings.currency_table()?;
    tracing::debug!("loaded {} currencies from {}", table.len(), cli.config);
    let ctx = TenantContext::for_table(&table)
        .map_err(|err| format!("{err} (no currencies configured in {}.toml?)", cli.config))?;

    if let Command::Reconcile(args) = &cli.command {
        let collection = reconcile::read_entries(File::open(&args.path)?, &ctx)?;
        let report = reconcile::ReconciliationReport::new(&collection, &ctx)?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!("{report}");
        }
        collection.ensure_balanced()?;
        return Ok(());
    }

    println!("{}", run(cli.command, &table, &ctx)?);
    Ok(())
}

fn currency_or_base<R: CurrencyRegistry + ?Sized>(
    code: Option<&str>,
    ctx: &TenantContext<'_, R>,
) -> AppResult<CurrencyCode> {
    Ok(code.map(CurrencyCode::new).transpose()?.unwrap_or(ctx.base()))
}

fn computation(fixed: bool) -> RateComputation {
    if fixed {
        RateComputation::Fixed
    } else {
        RateComputation::Percentage
    }
}

fn run(
    command: Command,
    table: &CurrencyTable,
    ctx: &TenantContext<'_, CurrencyTable>,
) -> AppResult<String> {
    let output = match command {
        Command::Currencies => table
            .iter()
            .map(|currency| {
                format!(
                    "{}{} {:<24} {} {}{}",
                    currency.code,
                    if currency.is_default() { "*" } else { " " },
                    currency.name,
                    currency.format.symbol(),
                    currency.rate,
                    if currency.enabled { "" } else { " (disabled)" }
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
        Command::Format(args) => {
            let currency = currency_or_base(args.currency.as_deref(), ctx)?;
            let money = Money::new(args.amount_minor, currency);
            if args.simple {
                money.format_simple(table)?
            } else if args.code {
                money.format_with_code(table)?
            } else {
                money.format(table)?
            }
        }
        Command::Parse(args) => {
            let currency = currency_or_base(args.currency.as_deref(), ctx)?;
            ctx.converter()
                .prepare_for_accessor(&args.text, currency)?
                .to_string()
        }
        Command::Convert(args) => {
            let from = CurrencyCode::new(&args.from)?;
            let to = currency_or_base(args.to.as_deref(), ctx)?;
            let minor = ctx.converter().prepare_for_accessor(&args.text, from)?;
            Money::new(minor, from).convert(to, ctx)?.format(table)?
        }
        Command::Rate(rate) => match rate.command {
            RateCommand::Parse(args) => {
                let currency = currency_or_base(args.currency.as_deref(), ctx)?;
                ScaledRate::parse(&args.rate, computation(args.fixed), currency, ctx)?
                    .value
                    .to_string()
            }
            RateCommand::Format(args) => {
                let currency = currency_or_base(args.currency.as_deref(), ctx)?;
                let rate = ScaledRate {
                    value: args.scaled,
                    computation: computation(args.fixed),
                };
                rate.format(currency, ctx)?
            }
            RateCommand::Apply(args) => {
                let currency = currency_or_base(args.currency.as_deref(), ctx)?;
                let rate = ScaledRate::parse(&args.rate, computation(args.fixed), currency, ctx)?;
                Money::new(rate.apply(args.amount_minor)?, currency).format(table)?
            }
        },
        Command::Reconcile(_) => {
            return Err("reconcile is handled before dispatch".into());
        }
    };
    Ok(output)
}
