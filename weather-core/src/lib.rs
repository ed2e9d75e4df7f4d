//! Core library for the weather search history service.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Abstraction over weather providers
//! - The bounded, in-memory search history and its derived views
//! - Shared domain models
//!
//! It is used by `weather-server`, but has no knowledge of HTTP routing.

pub mod clock;
pub mod config;
pub mod error;
pub mod history;
pub mod model;
pub mod provider;

pub use clock::{Clock, SystemClock};
pub use config::{Config, ProviderConfig, ServerConfig};
pub use error::ProviderError;
pub use history::{DEFAULT_POPULAR_LIMIT, HISTORY_CAPACITY, HistoryStore};
pub use model::{HistoryPage, HistoryStats, PopularCity, SearchRecord, WeatherSnapshot};
pub use provider::{ProviderId, WeatherProvider};
