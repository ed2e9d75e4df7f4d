use crate::{
    Config, ProviderError, WeatherSnapshot,
    provider::{
        openweather::OpenWeatherProvider, simulated::SimulatedProvider,
        weatherapi::WeatherApiProvider,
    },
};
use async_trait::async_trait;
use std::{convert::TryFrom, fmt::Debug};

pub mod openweather;
pub mod simulated;
pub mod weatherapi;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenWeather,
    WeatherApi,
    Simulated,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "openweather",
            ProviderId::WeatherApi => "weatherapi",
            ProviderId::Simulated => "simulated",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::OpenWeather, ProviderId::WeatherApi, ProviderId::Simulated]
    }

    /// Whether this provider needs an API key to work.
    pub fn requires_api_key(&self) -> bool {
        !matches!(self, ProviderId::Simulated)
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "openweather" => Ok(ProviderId::OpenWeather),
            "weatherapi" => Ok(ProviderId::WeatherApi),
            "simulated" => Ok(ProviderId::Simulated),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: openweather, weatherapi, simulated."
            )),
        }
    }
}

/// Looks up current conditions for a city.
///
/// Implementations do network I/O and must not be called while holding the
/// history lock.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_weather(&self, city: &str) -> Result<WeatherSnapshot, ProviderError>;

    fn id(&self) -> ProviderId;

    /// True when results are canned rather than fetched.
    fn is_simulated(&self) -> bool {
        false
    }
}

/// Construct a provider from config and explicit ProviderId.
pub fn provider_from_config(
    id: ProviderId,
    config: &Config,
) -> anyhow::Result<Box<dyn WeatherProvider>> {
    if id == ProviderId::Simulated {
        return Ok(Box::new(SimulatedProvider));
    }

    let api_key = config.provider_api_key(id).ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured for provider '{id}'.\n\
                 Hint: run `weather-server configure {id}` and enter your API key."
        )
    })?;

    let boxed: Box<dyn WeatherProvider> = match id {
        ProviderId::OpenWeather => Box::new(OpenWeatherProvider::new(api_key.to_owned())?),
        ProviderId::WeatherApi => Box::new(WeatherApiProvider::new(api_key.to_owned())?),
        ProviderId::Simulated => Box::new(SimulatedProvider),
    };

    Ok(boxed)
}

/// Construct the default provider from config, using `default_provider` field.
pub fn default_provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let id = config.default_provider_id()?;
    provider_from_config(id, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn provider_id_as_str_roundtrip() {
        for id in ProviderId::all() {
            let s = id.as_str();
            let parsed = ProviderId::try_from(s).expect("roundtrip should succeed");
            assert_eq!(*id, parsed);
        }
    }

    #[test]
    fn unknown_provider_error() {
        let err = ProviderId::try_from("doesnotexist").unwrap_err();
        assert!(err.to_string().contains("Unknown provider"));
    }

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = provider_from_config(ProviderId::OpenWeather, &cfg).unwrap_err();
        assert!(err.to_string().contains("No API key configured for provider"));
    }

    #[test]
    fn simulated_provider_needs_no_key() {
        let cfg = Config::default();
        let provider = provider_from_config(ProviderId::Simulated, &cfg).expect("simulated provider");

        assert!(provider.is_simulated());
        assert_eq!(provider.id(), ProviderId::Simulated);
    }

    #[test]
    fn default_provider_from_config_falls_back_to_simulated() {
        let cfg = Config::default();
        let provider = default_provider_from_config(&cfg).expect("fallback provider");

        assert_eq!(provider.id(), ProviderId::Simulated);
    }

    #[test]
    fn default_provider_from_config_works_when_set_and_configured() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "KEY".to_string());

        let provider = default_provider_from_config(&cfg).expect("configured provider");
        assert_eq!(provider.id(), ProviderId::OpenWeather);
        assert!(!provider.is_simulated());
    }

    #[test]
    fn default_provider_without_key_is_an_error() {
        let mut cfg = Config::default();
        cfg.set_default_provider(ProviderId::WeatherApi);

        let err = default_provider_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("weather-server configure weatherapi"));
    }
}
