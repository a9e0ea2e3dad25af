//! Tests for the CSV-backed stock functions.

use relay_functions::{Builtin, Config, Context, Dataset, StockIndex};
use serde_json::{Map, Value, json};
use std::io::Write;
use tempfile::NamedTempFile;

const CSV: &str = "\
,Date,Gold_Price,Gold_Vol.,S&P_500_Price
2,2024-01-03,\"2,043.20\",12.5K,\"4,704.81\"
0,2024-01-01,\"2,063.70\",,\"4,769.83\"
1,2024-01-02,\"2,073.40\",186.3K,\"4,742.83\"
3,not a date,1,2,3
";

fn dataset() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(CSV.as_bytes()).unwrap();
    file
}

fn context(file: &NamedTempFile) -> Context {
    Context {
        client: reqwest::Client::new(),
        config: Config {
            stock_data: file.path().to_owned(),
        },
    }
}

fn args(pairs: &[(&str, &str)]) -> Map<String, Value> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), json!(v)))
        .collect()
}

async fn call(builtin: Builtin, file: &NamedTempFile, pairs: &[(&str, &str)]) -> Value {
    let out = builtin.call(&context(file), args(pairs)).await.unwrap();
    serde_json::from_str(&out).unwrap()
}

#[test]
fn dataset_sorts_rows_and_skips_bad_dates() {
    let data = Dataset::parse(CSV).unwrap();
    assert_eq!(data.len(), 3);
    let series = data.series(StockIndex::GoldPrice, None).unwrap();
    let values: Vec<_> = series.into_iter().map(|(_, v)| v).collect();
    assert_eq!(values, [json!(2063.7), json!(2073.4), json!(2043.2)]);
}

#[test]
fn dataset_without_date_column_fails() {
    assert!(Dataset::parse("a,b\n1,2\n").is_err());
    assert!(Dataset::parse("").is_err());
}

#[test]
fn missing_column_fails() {
    let data = Dataset::parse(CSV).unwrap();
    assert!(data.series(StockIndex::TeslaPrice, None).is_err());
}

#[tokio::test]
async fn market_data_without_range_returns_every_day() {
    let file = dataset();
    let out = call(Builtin::StockMarketData, &file, &[("index", "Gold_Vol.")]).await;
    assert_eq!(
        out,
        json!({
            "2024-01-01": null,
            "2024-01-02": "186.3K",
            "2024-01-03": "12.5K",
        })
    );
}

#[tokio::test]
async fn market_data_within_range() {
    let file = dataset();
    let out = call(
        Builtin::StockMarketData,
        &file,
        &[
            ("index", "S&P_500_Price"),
            ("start_date", "2024-01-02"),
            ("end_date", "2024-01-03"),
        ],
    )
    .await;
    assert_eq!(out, json!({ "2024-01-02": 4742.83, "2024-01-03": 4704.81 }));
}

#[tokio::test]
async fn market_data_reports_invalid_index() {
    let file = dataset();
    let out = call(Builtin::StockMarketData, &file, &[("index", "Dogecoin_Price")]).await;
    let message = out["error"].as_str().unwrap();
    assert!(message.starts_with("Invalid index. Please choose from available indices:"));
    assert!(message.contains("Gold_Price"));
}

#[tokio::test]
async fn market_data_reports_invalid_date() {
    let file = dataset();
    let out = call(
        Builtin::StockMarketData,
        &file,
        &[("index", "Gold_Price"), ("start_date", "January")],
    )
    .await;
    assert_eq!(out["error"], "Invalid date format. Please use YYYY-MM-DD.");
}

#[tokio::test]
async fn market_data_reports_empty_range() {
    let file = dataset();
    let out = call(
        Builtin::StockMarketData,
        &file,
        &[
            ("index", "Gold_Price"),
            ("start_date", "2023-01-01"),
            ("end_date", "2023-12-31"),
        ],
    )
    .await;
    assert_eq!(
        out["error"],
        "No data available for index 'Gold_Price' in the given date range."
    );
}

#[tokio::test]
async fn missing_dataset_is_reported_in_payload() {
    let context = Context {
        client: reqwest::Client::new(),
        config: Config {
            stock_data: "/nonexistent/stock.csv".into(),
        },
    };
    let out = Builtin::StockMarketData
        .call(&context, args(&[("index", "Gold_Price")]))
        .await
        .unwrap();
    let out: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(out["error"], "Error in retrieving stock data.");
}

#[tokio::test]
async fn price_trends_are_sorted_records() {
    let file = dataset();
    let out = call(
        Builtin::PriceTrends,
        &file,
        &[
            ("index", "Gold_Price"),
            ("start_date", "2024-01-01"),
            ("end_date", "2024-01-02"),
        ],
    )
    .await;
    assert_eq!(
        out,
        json!([
            { "Date": "2024-01-01", "Gold_Price": 2063.7 },
            { "Date": "2024-01-02", "Gold_Price": 2073.4 },
        ])
    );
}

#[tokio::test]
async fn price_trends_report_empty_range() {
    let file = dataset();
    let out = call(
        Builtin::PriceTrends,
        &file,
        &[
            ("index", "Gold_Price"),
            ("start_date", "2025-01-01"),
            ("end_date", "2025-02-01"),
        ],
    )
    .await;
    assert_eq!(out["error"], "No data available for the specified date range.");
}
