use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use weather_core::{DEFAULT_POPULAR_LIMIT, HistoryStats, PopularCity, SearchRecord, WeatherSnapshot};

use crate::{app::AppState, error::ApiError};

const DEFAULT_HISTORY_LIMIT: i64 = 10;
const SIMULATED_NOTE: &str = "Using simulated data - configure OPENWEATHER_API_KEY for real data";

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub city: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub success: bool,
    pub city: String,
    pub weather: WeatherSnapshot,
    pub search_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
    pub city: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub success: bool,
    pub total: usize,
    pub history: Vec<SearchRecord>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularResponse {
    pub success: bool,
    pub popular_cities: Vec<PopularCity>,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub success: bool,
    pub stats: HistoryStats,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

/// Look up a city and record it. The provider is awaited before the history is touched.
pub async fn search(
    State(state): State<AppState>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    // looked up trimmed, recorded as submitted
    let lookup = request.city.trim();
    if lookup.is_empty() {
        return Err(ApiError::BadRequest("City must not be empty".to_string()));
    }

    tracing::info!(city = lookup, provider = %state.provider.id(), "Searching weather");

    let weather = state.provider.current_weather(lookup).await?;
    let record = state.history.append(request.city.as_str(), weather);

    tracing::info!(
        city = %record.city,
        search_id = record.id,
        total = state.history.len(),
        "Weather search recorded"
    );

    Ok(Json(SearchResponse {
        success: true,
        city: record.city,
        weather: record.weather,
        search_id: record.id,
        note: state.provider.is_simulated().then(|| SIMULATED_NOTE.to_string()),
    }))
}

pub async fn history(
    State(state): State<AppState>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    // non-positive limits give an empty page with the full total
    let limit = usize::try_from(query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT)).unwrap_or(0);
    // substring match on the raw value; only an empty filter means "no filter"
    let filter = query.city.as_deref().filter(|c| !c.is_empty());

    let page = state.history.list(limit, filter);

    tracing::debug!(returned = page.items.len(), total = page.total, "Returning history");

    Ok(Json(HistoryResponse { success: true, total: page.total, history: page.items }))
}

pub async fn popular(State(state): State<AppState>) -> Json<PopularResponse> {
    let popular_cities = state.history.popular(DEFAULT_POPULAR_LIMIT);

    tracing::debug!(count = popular_cities.len(), "Returning popular cities");

    Json(PopularResponse { success: true, popular_cities })
}

pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse { success: true, stats: state.history.stats() })
}

pub async fn clear_history(State(state): State<AppState>) -> Json<MessageResponse> {
    state.history.clear();

    tracing::info!("Search history cleared");

    Json(MessageResponse { success: true, message: "Search history cleared".to_string() })
}

fn endpoint_map() -> Value {
    json!({
        "POST /api/weather/search": "Search weather and save to history",
        "GET /api/weather/history": "Get search history",
        "GET /api/weather/popular": "Get popular cities",
        "GET /api/weather/stats": "Get search statistics",
        "DELETE /api/weather/history": "Clear search history"
    })
}

pub async fn root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "message": "Weather Search History API is running",
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": endpoint_map(),
        "totalSearches": state.history.len(),
    }))
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "weather-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn api_info(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "message": "Weather Search History API",
        "version": env!("CARGO_PKG_VERSION"),
        "provider": state.provider.id().as_str(),
        "endpoints": endpoint_map(),
    }))
}
