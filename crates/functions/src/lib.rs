//! Builtin functions the model can call.
//!
//! Each function is a [`Builtin`] variant carrying its own schema and
//! handler; [`registry`] turns the full set into a runtime [`Registry`].
//! Functions always answer with a JSON string. Data source failures are
//! reported inside that payload as `{"error": ...}`, only arguments that do
//! not fit the schema make a handler fail.

use llm::Function;
use runtime::{Arguments, Registry};
use schemars::{JsonSchema, schema_for};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Value, json};
use std::{path::PathBuf, sync::Arc};

pub use stock::{Dataset, StockIndex};

pub mod stock;
pub mod weather;

/// Settings of the builtin functions.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// CSV file backing the stock market functions
    pub stock_data: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stock_data: PathBuf::from("/mnt/data/Cleaned_Stock_Market_Dataset.csv"),
        }
    }
}

/// Shared state of the builtin functions.
#[derive(Debug, Clone)]
pub struct Context {
    /// The HTTP client for the weather APIs
    pub client: reqwest::Client,
    /// The function settings
    pub config: Config,
}

/// The builtin functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    /// Local time at a named location
    CurrentTime,
    /// Current weather at a named location
    CurrentWeather,
    /// Daily temperature history at a coordinate
    HistoricalTemperature,
    /// One stock index, optionally over a date range
    StockMarketData,
    /// One stock index over a date range, as sorted records
    PriceTrends,
}

impl Builtin {
    /// Every builtin.
    pub const ALL: [Builtin; 5] = [
        Builtin::CurrentTime,
        Builtin::CurrentWeather,
        Builtin::HistoricalTemperature,
        Builtin::StockMarketData,
        Builtin::PriceTrends,
    ];

    /// The name the model calls the function by.
    pub fn name(self) -> &'static str {
        match self {
            Self::CurrentTime => "get_current_time",
            Self::CurrentWeather => "get_current_weather",
            Self::HistoricalTemperature => "get_historical_temperature",
            Self::StockMarketData => "get_stock_market_data",
            Self::PriceTrends => "get_price_trends",
        }
    }

    /// Look a builtin up by the name the model used.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.name() == name)
    }

    /// The schema shown to the model.
    pub fn function(self) -> Function {
        let (description, parameters) = match self {
            Self::CurrentTime => (
                "Get the current time in a given location",
                schema_for!(LocationParams),
            ),
            Self::CurrentWeather => (
                "Get the current weather in a given location",
                schema_for!(LocationParams),
            ),
            Self::HistoricalTemperature => (
                "Fetches the historical temperature data for a given location and date range.",
                schema_for!(TemperatureParams),
            ),
            Self::StockMarketData => (
                "Get the stock market data for a given index and optional date range",
                schema_for!(StockParams),
            ),
            Self::PriceTrends => (
                "Get the price trend of a given index between two dates",
                schema_for!(TrendParams),
            ),
        };

        Function {
            name: self.name().into(),
            description: description.into(),
            parameters,
        }
    }

    /// Run the function.
    pub async fn call(self, ctx: &Context, args: Arguments) -> anyhow::Result<String> {
        Ok(match self {
            Self::CurrentTime => {
                let p: LocationParams = params(args)?;
                weather::current_time(&ctx.client, &p.location).await
            }
            Self::CurrentWeather => {
                let p: LocationParams = params(args)?;
                weather::current_weather(&ctx.client, &p.location).await
            }
            Self::HistoricalTemperature => {
                let p: TemperatureParams = params(args)?;
                weather::historical_temperature(
                    &ctx.client,
                    p.latitude,
                    p.longitude,
                    &p.start_date,
                    &p.end_date,
                )
                .await
            }
            Self::StockMarketData => {
                let p: StockParams = params(args)?;
                stock::market_data(
                    &ctx.config.stock_data,
                    &p.index,
                    p.start_date.as_deref(),
                    p.end_date.as_deref(),
                )
            }
            Self::PriceTrends => {
                let p: TrendParams = params(args)?;
                stock::price_trends(&ctx.config.stock_data, &p.index, &p.start_date, &p.end_date)
            }
        })
    }
}

/// Build the registry holding every builtin.
pub fn registry(ctx: Context) -> Registry {
    let ctx = Arc::new(ctx);
    let mut registry = Registry::new();
    for builtin in Builtin::ALL {
        let ctx = ctx.clone();
        registry.register(builtin.function(), move |args| {
            let ctx = ctx.clone();
            async move { builtin.call(&ctx, args).await }
        });
    }
    registry
}

fn params<T: DeserializeOwned>(args: Arguments) -> anyhow::Result<T> {
    Ok(serde_json::from_value(Value::Object(args))?)
}

/// An error payload, as returned to the model.
pub(crate) fn error(message: impl AsRef<str>) -> String {
    pretty(&json!({ "error": message.as_ref() }))
}

pub(crate) fn pretty(value: &impl Serialize) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| error(e.to_string()))
}

/// Parameters of the location based functions.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct LocationParams {
    /// The location name, e.g. a city. Its timezone is looked up by name.
    pub location: String,
}

/// Parameters of `get_historical_temperature`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct TemperatureParams {
    /// The latitude of the location.
    pub latitude: f64,
    /// The longitude of the location.
    pub longitude: f64,
    /// The start date for the historical data (in YYYY-MM-DD format).
    pub start_date: String,
    /// The end date for the historical data (in YYYY-MM-DD format).
    pub end_date: String,
}

/// Parameters of `get_stock_market_data`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct StockParams {
    /// The dataset column to read.
    #[schemars(with = "StockIndex")]
    pub index: String,
    /// The start date for the data (in YYYY-MM-DD format). Optional.
    #[serde(default)]
    pub start_date: Option<String>,
    /// The end date for the data (in YYYY-MM-DD format). Optional.
    #[serde(default)]
    pub end_date: Option<String>,
}

/// Parameters of `get_price_trends`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct TrendParams {
    /// The dataset column to read.
    #[schemars(with = "StockIndex")]
    pub index: String,
    /// The start date of the trend (in YYYY-MM-DD format).
    pub start_date: String,
    /// The end date of the trend (in YYYY-MM-DD format).
    pub end_date: String,
}
