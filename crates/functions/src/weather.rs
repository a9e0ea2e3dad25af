//! Time and weather lookups backed by the Open-Meteo APIs.

use crate::{error, pretty};
use anyhow::{Context as _, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Value, json};

/// Open-Meteo endpoints.
pub mod endpoint {
    /// Place name search.
    pub const GEOCODING: &str = "https://geocoding-api.open-meteo.com/v1/search";
    /// Forecast, including current conditions.
    pub const FORECAST: &str = "https://api.open-meteo.com/v1/forecast";
    /// Historical weather archive.
    pub const ARCHIVE: &str = "https://archive-api.open-meteo.com/v1/archive";
}

/// A geocoded place.
#[derive(Debug, Clone, Deserialize)]
pub struct Place {
    /// The canonical place name
    pub name: String,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// IANA timezone name
    #[serde(default)]
    pub timezone: Option<String>,
    /// Country name
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Geocoding {
    #[serde(default)]
    results: Vec<Place>,
}

#[derive(Debug, Deserialize)]
struct Forecast {
    utc_offset_seconds: i32,
    #[serde(default)]
    timezone: Option<String>,
    #[serde(default)]
    current: Option<Value>,
    #[serde(default)]
    current_units: Option<Value>,
}

/// Get the current local time at a named location.
pub async fn current_time(client: &Client, location: &str) -> String {
    match lookup_time(client, location).await {
        Ok(value) => pretty(&value),
        Err(e) => {
            tracing::error!("failed to get current time for {location:?}: {e:#}");
            error(format!("Error in retrieving the current time in {location}."))
        }
    }
}

/// Get the current weather at a named location.
pub async fn current_weather(client: &Client, location: &str) -> String {
    match lookup_weather(client, location).await {
        Ok(value) => pretty(&value),
        Err(e) => {
            tracing::error!("failed to get current weather for {location:?}: {e:#}");
            error(format!("Error in retrieving the current weather in {location}."))
        }
    }
}

/// Fetch daily max/min temperatures for a coordinate and date range.
pub async fn historical_temperature(
    client: &Client,
    latitude: f64,
    longitude: f64,
    start_date: &str,
    end_date: &str,
) -> String {
    if parse_date(start_date).is_none() || parse_date(end_date).is_none() {
        return error("Invalid date format. Please use YYYY-MM-DD.");
    }

    let query = [
        ("latitude", latitude.to_string()),
        ("longitude", longitude.to_string()),
        ("start_date", start_date.to_owned()),
        ("end_date", end_date.to_owned()),
        ("daily", "temperature_2m_max,temperature_2m_min".to_owned()),
        ("timezone", "auto".to_owned()),
    ];
    match get::<Value>(client, endpoint::ARCHIVE, &query).await {
        Ok(mut weather) => {
            let daily = weather
                .get_mut("daily")
                .map(Value::take)
                .unwrap_or_else(|| json!({}));
            pretty(&json!({ "temperature_data": daily }))
        }
        Err(e) => {
            tracing::error!("failed to fetch historical temperature data: {e:#}");
            error("Error in retrieving historical temperature data.")
        }
    }
}

/// Resolve a place name to coordinates and timezone.
pub async fn geocode(client: &Client, location: &str) -> Result<Place> {
    let query = [
        ("name", location.to_owned()),
        ("count", "1".to_owned()),
        ("format", "json".to_owned()),
    ];
    let found: Geocoding = get(client, endpoint::GEOCODING, &query).await?;
    found
        .results
        .into_iter()
        .next()
        .with_context(|| format!("no place named {location:?}"))
}

async fn lookup_time(client: &Client, location: &str) -> Result<Value> {
    let place = geocode(client, location).await?;
    let forecast = forecast(client, &place, None).await?;
    let time = local_time(Utc::now(), forecast.utc_offset_seconds)
        .with_context(|| format!("invalid utc offset {}", forecast.utc_offset_seconds))?;

    Ok(json!({
        "location": place.name,
        "country": place.country,
        "timezone": forecast.timezone.or(place.timezone),
        "current_time": time,
    }))
}

async fn lookup_weather(client: &Client, location: &str) -> Result<Value> {
    let place = geocode(client, location).await?;
    let current = "temperature_2m,relative_humidity_2m,wind_speed_10m,weather_code";
    let forecast = forecast(client, &place, Some(current)).await?;

    Ok(json!({
        "location": place.name,
        "country": place.country,
        "current": forecast.current,
        "units": forecast.current_units,
    }))
}

async fn forecast(client: &Client, place: &Place, current: Option<&str>) -> Result<Forecast> {
    let mut query = vec![
        ("latitude", place.latitude.to_string()),
        ("longitude", place.longitude.to_string()),
        ("timezone", "auto".to_owned()),
    ];
    if let Some(current) = current {
        query.push(("current", current.to_owned()));
    }
    get(client, endpoint::FORECAST, &query).await
}

async fn get<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    query: &[(&str, String)],
) -> Result<T> {
    let response = client.get(url).query(query).send().await?;
    Ok(response.error_for_status()?.json().await?)
}

/// Format `now` in the timezone `offset_seconds` east of UTC.
pub fn local_time(now: DateTime<Utc>, offset_seconds: i32) -> Option<String> {
    let offset = FixedOffset::east_opt(offset_seconds)?;
    Some(
        now.with_timezone(&offset)
            .format("%Y-%m-%d %H:%M:%S %:z")
            .to_string(),
    )
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()
}
