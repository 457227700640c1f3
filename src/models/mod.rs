//! Data models for the AQI predictor
//!
//! This module contains the core domain models organized by concern:
//! - Aqi: records, severity levels, pollutants, forecast and feature weights
//! - City: normalized lookup keys

pub mod aqi;
pub mod city;

// Re-export all public types for convenient access
pub use aqi::{
    AqiLevel, AqiRecord, FORECAST_DAYS, FeatureWeight, ForecastPoint, Pollutant, PollutantKind,
};
pub use city::CityKey;
