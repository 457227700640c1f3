//! Pearls AQI Predictor - air quality dashboard
//!
//! This library provides the core functionality for looking up curated AQI
//! records, deriving their visual encodings, fetching AI health
//! recommendations and composing the dashboard screen.

pub mod config;
pub mod data_access;
pub mod error;
pub mod models;
pub mod presentation;
pub mod recommendations;
pub mod store;
pub mod view;

// Re-export core types for public API
pub use config::AppConfig;
pub use data_access::{AqiDataService, DataOptions, FetchOutcome, Notice, NoticeKind};
pub use error::AqiError;
pub use models::{AqiLevel, AqiRecord, CityKey, FeatureWeight, ForecastPoint, Pollutant, PollutantKind};
pub use presentation::ColorToken;
pub use recommendations::{GeminiClient, RecommendationGateway, TextGenerator};
pub use store::{CityLookup, CuratedStore};
pub use view::{CitySelector, Dashboard, ViewState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, AqiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
