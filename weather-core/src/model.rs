use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current conditions for a city, as returned by a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    /// Degrees Celsius.
    pub temperature: f64,
    pub description: String,
    /// Relative humidity, percent.
    pub humidity: u8,
    /// Metres per second.
    pub wind_speed: f64,
}

/// One stored lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRecord {
    pub id: u64,
    /// City exactly as submitted, case preserved.
    pub city: String,
    pub timestamp: DateTime<Utc>,
    pub weather: WeatherSnapshot,
}

/// A page of history plus the size of the full (filtered) sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPage {
    pub total: usize,
    pub items: Vec<SearchRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularCity {
    /// Lowercased city name.
    pub city: String,
    pub search_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryStats {
    pub total_searches: usize,
    pub unique_cities: usize,
    pub searches_last_24_hours: usize,
    pub average_searches_per_day: f64,
}
