use async_trait::async_trait;

use crate::{error::ProviderError, model::WeatherSnapshot};

use super::{ProviderId, WeatherProvider};

/// Fixed conditions for running without an API key.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedProvider;

#[async_trait]
impl WeatherProvider for SimulatedProvider {
    async fn current_weather(&self, _city: &str) -> Result<WeatherSnapshot, ProviderError> {
        Ok(WeatherSnapshot {
            temperature: 22.5,
            description: "partly cloudy".to_string(),
            humidity: 65,
            wind_speed: 3.2,
        })
    }

    fn id(&self) -> ProviderId {
        ProviderId::Simulated
    }

    fn is_simulated(&self) -> bool {
        true
    }
}
