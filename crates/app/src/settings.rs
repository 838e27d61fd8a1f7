//! Handles settings for the application. Configuration is read from
//! `settings.toml` (see the one at the repository root) and from environment
//! variables such as `TALLY__APP__LEVEL=debug`.
use config::{Config, ConfigError, Environment, File};
use engine::{Currency, CurrencyCode, CurrencyFormat, CurrencyTable, EngineError, ResultEngine};
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

#[derive(Debug, Default, Deserialize)]
pub struct Tenant {
    pub default_currency: Option<String>,
}

/// One `[[currencies]]` entry. Formatting fields left out are taken from the
/// engine's built-in metadata for well-known codes.
#[derive(Debug, Deserialize)]
pub struct CurrencySettings {
    pub code: String,
    pub name: Option<String>,
    #[serde(default = "default_rate")]
    pub rate: Decimal,
    pub precision: Option<u8>,
    pub symbol: Option<String>,
    pub symbol_first: Option<bool>,
    pub decimal_mark: Option<char>,
    pub thousands_separator: Option<char>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_rate() -> Decimal {
    Decimal::ONE
}

fn default_enabled() -> bool {
    true
}

impl CurrencySettings {
    fn to_currency(&self) -> ResultEngine<Currency> {
        let code = CurrencyCode::new(&self.code)?;
        let known = Currency::known(code);
        let fallback = known.as_ref().map(|currency| &currency.format);
        let missing = |field: &str| {
            EngineError::UnknownCurrency(format!(
                "{code} has no built-in metadata, `{field}` is required"
            ))
        };

        let format = CurrencyFormat::new(
            self.precision
                .or(fallback.map(CurrencyFormat::precision))
                .ok_or_else(|| missing("precision"))?,
            self.symbol
                .clone()
                .or_else(|| fallback.map(|format| format.symbol().to_string()))
                .ok_or_else(|| missing("symbol"))?,
            self.symbol_first
                .or(fallback.map(CurrencyFormat::symbol_first))
                .unwrap_or(true),
            self.decimal_mark
                .or(fallback.map(CurrencyFormat::decimal_mark))
                .unwrap_or('.'),
            self.thousands_separator
                .or(fallback.map(CurrencyFormat::thousands_separator))
                .unwrap_or(','),
        )?;
        let name = self
            .name
            .clone()
            .or_else(|| known.as_ref().map(|currency| currency.name.clone()))
            .unwrap_or_else(|| code.to_string());

        let mut currency = Currency::new(code, name, format, self.rate);
        currency.enabled = self.enabled;
        Ok(currency)
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    #[serde(default)]
    pub tenant: Tenant,
    #[serde(default)]
    pub currencies: Vec<CurrencySettings>,
}

impl Settings {
    /// Loads `<path>.toml` (optional) overlaid with `TALLY__*` environment variables.
    pub fn new(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("TALLY").separator("__"))
            .build()?;
        Self::from_config(config)
    }

    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        config.try_deserialize()
    }

    /// Builds the tenant's currency table.
    ///
    /// Rates are read as relative to the default currency, which is therefore
    /// registered first.
    pub fn currency_table(&self) -> ResultEngine<CurrencyTable> {
        let default = self
            .tenant
            .default_currency
            .as_deref()
            .map(CurrencyCode::new)
            .transpose()?;

        let mut currencies = self
            .currencies
            .iter()
            .map(CurrencySettings::to_currency)
            .collect::<ResultEngine<Vec<_>>>()?;
        if let Some(default) = default {
            let position = currencies
                .iter()
                .position(|currency| currency.code == default)
                .ok_or_else(|| {
                    EngineError::UnknownCurrency(format!(
                        "default currency {default} is not listed in [[currencies]]"
                    ))
                })?;
            let base = currencies.remove(position);
            currencies.insert(0, base);
        }

        let mut table = CurrencyTable::new();
        for currency in currencies {
            table.insert(currency)?;
        }
        Ok(table)
    }
}
