//! Stock market lookups over a CSV dataset.
//!
//! The dataset has a `Date` column and one column per [`StockIndex`]. Prices
//! may be written with thousands separators and quoted, e.g. `"1,234.50"`.

use crate::{error, pretty, weather::parse_date};
use anyhow::{Context as _, Result, bail};
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value, json};
use std::{collections::BTreeMap, path::Path, str::FromStr};

macro_rules! indices {
    ($($variant:ident => $column:literal,)*) => {
        /// A column of the stock market dataset.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
        pub enum StockIndex {
            $(
                #[serde(rename = $column)]
                $variant,
            )*
        }

        impl StockIndex {
            /// Every index, in dataset order.
            pub const ALL: &[StockIndex] = &[$(StockIndex::$variant,)*];

            /// The dataset column name.
            pub fn column(self) -> &'static str {
                match self {
                    $(StockIndex::$variant => $column,)*
                }
            }
        }
    };
}

indices! {
    NaturalGasPrice => "Natural_Gas_Price",
    NaturalGasVol => "Natural_Gas_Vol.",
    CrudeOilPrice => "Crude_oil_Price",
    CrudeOilVol => "Crude_oil_Vol.",
    CopperPrice => "Copper_Price",
    CopperVol => "Copper_Vol.",
    BitcoinPrice => "Bitcoin_Price",
    BitcoinVol => "Bitcoin_Vol.",
    PlatinumPrice => "Platinum_Price",
    PlatinumVol => "Platinum_Vol.",
    EthereumPrice => "Ethereum_Price",
    EthereumVol => "Ethereum_Vol.",
    Sp500Price => "S&P_500_Price",
    Nasdaq100Price => "Nasdaq_100_Price",
    Nasdaq100Vol => "Nasdaq_100_Vol.",
    ApplePrice => "Apple_Price",
    AppleVol => "Apple_Vol.",
    TeslaPrice => "Tesla_Price",
    TeslaVol => "Tesla_Vol.",
    MicrosoftPrice => "Microsoft_Price",
    MicrosoftVol => "Microsoft_Vol.",
    SilverPrice => "Silver_Price",
    SilverVol => "Silver_Vol.",
    GooglePrice => "Google_Price",
    GoogleVol => "Google_Vol.",
    NvidiaPrice => "Nvidia_Price",
    NvidiaVol => "Nvidia_Vol.",
    BerkshirePrice => "Berkshire_Price",
    BerkshireVol => "Berkshire_Vol.",
    NetflixPrice => "Netflix_Price",
    NetflixVol => "Netflix_Vol.",
    AmazonPrice => "Amazon_Price",
    AmazonVol => "Amazon_Vol.",
    MetaPrice => "Meta_Price",
    MetaVol => "Meta_Vol.",
    GoldPrice => "Gold_Price",
    GoldVol => "Gold_Vol.",
}

impl FromStr for StockIndex {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|index| index.column() == s)
            .with_context(|| format!("invalid index: {s}"))
    }
}

/// The parsed dataset.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<(NaiveDate, Vec<Value>)>,
}

impl Dataset {
    /// Read and parse the dataset file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&text)
    }

    /// Parse CSV text with a header row and a `Date` column.
    ///
    /// Rows whose date does not parse are skipped.
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text.lines().filter(|l| !l.trim().is_empty());
        let Some(header) = lines.next() else {
            bail!("empty dataset");
        };
        let header = split_record(header);
        let Some(date) = header.iter().position(|c| c == "Date") else {
            bail!("dataset has no Date column");
        };

        let mut rows = Vec::new();
        let mut skipped = 0usize;
        for line in lines {
            let record = split_record(line);
            let Some(day) = record.get(date).and_then(|d| parse_dataset_date(d)) else {
                skipped += 1;
                continue;
            };
            rows.push((day, record.iter().map(|f| cell(f)).collect()));
        }

        if skipped > 0 {
            tracing::warn!("skipped {skipped} dataset rows without a valid date");
        }
        rows.sort_by_key(|(day, _)| *day);
        Ok(Self {
            columns: header,
            rows,
        })
    }

    /// Number of dated rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no dated rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The values of one index, oldest first, within the inclusive range.
    pub fn series(
        &self,
        index: StockIndex,
        range: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<Vec<(NaiveDate, Value)>> {
        let column = self
            .columns
            .iter()
            .position(|c| c == index.column())
            .with_context(|| format!("dataset has no {} column", index.column()))?;

        Ok(self
            .rows
            .iter()
            .filter(|(day, _)| range.is_none_or(|(start, end)| (start..=end).contains(day)))
            .map(|(day, values)| (*day, values.get(column).cloned().unwrap_or(Value::Null)))
            .collect())
    }
}

/// Values of one index as a `{date: value}` object, optionally within a date range.
///
/// The range only applies when both dates are given.
pub fn market_data(
    path: &Path,
    index: &str,
    start_date: Option<&str>,
    end_date: Option<&str>,
) -> String {
    let Ok(stock) = index.parse::<StockIndex>() else {
        tracing::warn!("invalid index provided: {index}");
        return invalid_index();
    };

    let start = start_date.map(parse_date);
    let end = end_date.map(parse_date);
    if matches!(start, Some(None)) || matches!(end, Some(None)) {
        return error("Invalid date format. Please use YYYY-MM-DD.");
    }
    let range = start.flatten().zip(end.flatten());

    let series = match Dataset::load(path).and_then(|data| data.series(stock, range)) {
        Ok(series) => series,
        Err(e) => {
            tracing::error!("failed to retrieve stock data for index {index:?}: {e:#}");
            return error("Error in retrieving stock data.");
        }
    };

    if series.is_empty() {
        return error(format!(
            "No data available for index '{index}' in the given date range."
        ));
    }

    let data: BTreeMap<String, Value> = series
        .into_iter()
        .map(|(day, value)| (day.format("%Y-%m-%d").to_string(), value))
        .collect();
    pretty(&data)
}

/// Values of one index between two dates as sorted `[{"Date", index}]` records.
pub fn price_trends(path: &Path, index: &str, start_date: &str, end_date: &str) -> String {
    let Ok(stock) = index.parse::<StockIndex>() else {
        tracing::warn!("invalid index provided: {index}");
        return invalid_index();
    };

    let (Some(start), Some(end)) = (parse_date(start_date), parse_date(end_date)) else {
        return error("Invalid date format. Please use YYYY-MM-DD.");
    };

    let series = match Dataset::load(path).and_then(|data| data.series(stock, Some((start, end))))
    {
        Ok(series) => series,
        Err(e) => {
            tracing::error!("failed to retrieve price trends for index {index:?}: {e:#}");
            return error("Error in retrieving price trends.");
        }
    };

    if series.is_empty() {
        return error("No data available for the specified date range.");
    }

    let records: Vec<Value> = series
        .into_iter()
        .map(|(day, value)| {
            let mut record = Map::new();
            record.insert("Date".into(), json!(day.format("%Y-%m-%d").to_string()));
            record.insert(index.into(), value);
            Value::Object(record)
        })
        .collect();
    pretty(&records)
}

fn invalid_index() -> String {
    let available: Vec<_> = StockIndex::ALL.iter().map(|i| i.column()).collect();
    error(format!(
        "Invalid index. Please choose from available indices: {}",
        available.join(", ")
    ))
}

fn parse_dataset_date(date: &str) -> Option<NaiveDate> {
    let date = date.trim();
    let date = date.split_once([' ', 'T']).map_or(date, |(day, _)| day);
    ["%Y-%m-%d", "%d-%m-%Y", "%m/%d/%Y"]
        .into_iter()
        .find_map(|format| NaiveDate::parse_from_str(date, format).ok())
}

/// A number when the field reads as one, `null` when empty, text otherwise.
fn cell(field: &str) -> Value {
    let field = field.trim();
    if field.is_empty() {
        return Value::Null;
    }

    field
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map_or_else(|| Value::String(field.to_owned()), Value::Number)
}

/// Split one CSV record, honouring double quotes.
fn split_record(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut chars = line.trim_end_matches('\r').chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if quoted && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => quoted = !quoted,
            ',' if !quoted => fields.push(std::mem::take(&mut field)),
            c => field.push(c),
        }
    }
    fields.push(field);
    fields
}
