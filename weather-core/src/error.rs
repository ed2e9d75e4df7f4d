/// Failures from a weather provider lookup.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("City '{city}' not found")]
    NotFound { city: String },

    /// Transport failure or an upstream status that says nothing about the city.
    #[error("Weather provider unavailable: {0}")]
    Unavailable(String),

    #[error("Unexpected weather provider response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    pub fn not_found(city: &str) -> Self {
        ProviderError::NotFound { city: city.to_string() }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Unavailable(err.to_string())
    }
}
