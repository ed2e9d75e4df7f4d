use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

use crate::{error::ProviderError, model::WeatherSnapshot};

use super::{ProviderId, WeatherProvider, openweather::truncate_body};

const DEFAULT_BASE_URL: &str = "http://api.weatherapi.com/v1";
const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherApiProvider {
    pub fn new(api_key: String) -> Result<Self, reqwest::Error> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: &str) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS)).build()?;

        Ok(Self { api_key, base_url: base_url.trim_end_matches('/').to_string(), http })
    }
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    text: String,
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
    humidity: u8,
    wind_kph: f64,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaResponse {
    current: WaCurrent,
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    async fn current_weather(&self, city: &str) -> Result<WeatherSnapshot, ProviderError> {
        let url = format!("{}/current.json", self.base_url);

        tracing::debug!(city, %url, "Requesting WeatherAPI current conditions");

        let res = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("q", city)])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        // WeatherAPI answers 400 with error code 1006 for "No matching location found."
        if status == StatusCode::NOT_FOUND || status == StatusCode::BAD_REQUEST {
            return Err(ProviderError::not_found(city));
        }

        if !status.is_success() {
            return Err(ProviderError::Unavailable(format!(
                "WeatherAPI request failed with status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        let parsed: WaResponse = serde_json::from_str(&body).map_err(|e| {
            ProviderError::InvalidResponse(format!("Failed to parse WeatherAPI JSON: {e}"))
        })?;

        Ok(WeatherSnapshot {
            temperature: parsed.current.temp_c,
            description: parsed.current.condition.text,
            humidity: parsed.current.humidity,
            wind_speed: parsed.current.wind_kph / 3.6,
        })
    }

    fn id(&self) -> ProviderId {
        ProviderId::WeatherApi
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn converts_wind_to_metres_per_second() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/current.json"))
            .and(query_param("key", "KEY"))
            .and(query_param("q", "Paris"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "location": {"name": "Paris", "country": "France"},
                "current": {
                    "temp_c": 18.0,
                    "feelslike_c": 17.0,
                    "humidity": 40,
                    "wind_kph": 36.0,
                    "condition": {"text": "Sunny"}
                }
            })))
            .mount(&mock_server)
            .await;

        let provider = WeatherApiProvider::with_base_url("KEY".into(), &mock_server.uri()).unwrap();
        let snapshot = provider.current_weather("Paris").await.unwrap();

        assert_eq!(snapshot.description, "Sunny");
        assert_eq!(snapshot.humidity, 40);
        assert!((snapshot.wind_speed - 10.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn no_matching_location_is_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/current.json"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": {"code": 1006, "message": "No matching location found."}
            })))
            .mount(&mock_server)
            .await;

        let provider = WeatherApiProvider::with_base_url("KEY".into(), &mock_server.uri()).unwrap();
        let result = provider.current_weather("Atlantis").await;

        assert!(matches!(result, Err(ProviderError::NotFound { .. })));
    }

    #[tokio::test]
    async fn forbidden_is_unavailable() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/current.json"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&mock_server)
            .await;

        let provider = WeatherApiProvider::with_base_url("KEY".into(), &mock_server.uri()).unwrap();
        let result = provider.current_weather("Paris").await;

        assert!(matches!(result, Err(ProviderError::Unavailable(_))));
    }
}
