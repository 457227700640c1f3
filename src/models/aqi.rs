//! AQI record model: severity levels, pollutants, forecast points and feature weights

use crate::{AqiError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of forecast points carried by every record
pub const FORECAST_DAYS: usize = 3;

/// Severity band derived from an AQI value, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AqiLevel {
    /// 0-50
    Good,
    /// 51-100
    Moderate,
    /// 101-150
    #[serde(rename = "Unhealthy for Sensitive Groups")]
    UnhealthyForSensitiveGroups,
    /// 151-200
    Unhealthy,
    /// 201-300
    #[serde(rename = "Very Unhealthy")]
    VeryUnhealthy,
    /// Above 300
    Hazardous,
}

impl AqiLevel {
    /// All levels in ascending severity
    pub const ALL: [AqiLevel; 6] = [
        AqiLevel::Good,
        AqiLevel::Moderate,
        AqiLevel::UnhealthyForSensitiveGroups,
        AqiLevel::Unhealthy,
        AqiLevel::VeryUnhealthy,
        AqiLevel::Hazardous,
    ];

    /// Classify an AQI value using the US EPA breakpoint table
    #[must_use]
    pub fn from_aqi(aqi: u32) -> Self {
        match aqi {
            0..=50 => AqiLevel::Good,
            51..=100 => AqiLevel::Moderate,
            101..=150 => AqiLevel::UnhealthyForSensitiveGroups,
            151..=200 => AqiLevel::Unhealthy,
            201..=300 => AqiLevel::VeryUnhealthy,
            _ => AqiLevel::Hazardous,
        }
    }

    /// Human-readable label, as shown on the dashboard
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            AqiLevel::Good => "Good",
            AqiLevel::Moderate => "Moderate",
            AqiLevel::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            AqiLevel::Unhealthy => "Unhealthy",
            AqiLevel::VeryUnhealthy => "Very Unhealthy",
            AqiLevel::Hazardous => "Hazardous",
        }
    }
}

impl fmt::Display for AqiLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AqiLevel {
    type Err = AqiError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        AqiLevel::ALL
            .into_iter()
            .find(|level| level.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| AqiError::validation(format!("Unknown AQI level '{s}'")))
    }
}

/// The six tracked pollutants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PollutantKind {
    #[serde(rename = "PM2.5")]
    Pm25,
    #[serde(rename = "PM10")]
    Pm10,
    O3,
    #[serde(rename = "NO2")]
    No2,
    #[serde(rename = "SO2")]
    So2,
    #[serde(rename = "CO")]
    Co,
}

impl PollutantKind {
    /// All pollutant kinds in display order
    pub const ALL: [PollutantKind; 6] = [
        PollutantKind::Pm25,
        PollutantKind::Pm10,
        PollutantKind::O3,
        PollutantKind::No2,
        PollutantKind::So2,
        PollutantKind::Co,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            PollutantKind::Pm25 => "PM2.5",
            PollutantKind::Pm10 => "PM10",
            PollutantKind::O3 => "O3",
            PollutantKind::No2 => "NO2",
            PollutantKind::So2 => "SO2",
            PollutantKind::Co => "CO",
        }
    }
}

impl fmt::Display for PollutantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single pollutant measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pollutant {
    pub name: PollutantKind,
    /// Measured value, never negative
    pub value: f64,
}

/// AQI forecast for one upcoming day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Day label (e.g. "Tomorrow", "In 2 Days")
    pub day: String,
    pub aqi: u32,
}

/// Illustrative weight attached to a forecasting factor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureWeight {
    pub feature: String,
    /// Weight in [0, 1]
    pub importance: f64,
}

/// Complete AQI snapshot for one city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AqiRecord {
    /// Canonical display name
    pub city: String,
    pub current_aqi: u32,
    pub level: AqiLevel,
    pub pollutants: Vec<Pollutant>,
    pub forecast: Vec<ForecastPoint>,
    pub feature_importance: Vec<FeatureWeight>,
}

impl AqiRecord {
    /// Check the record invariants: one entry per pollutant kind, a level that
    /// agrees with the current AQI and well-formed forecast and weights.
    pub fn validate(&self) -> Result<()> {
        if self.city.trim().is_empty() {
            return Err(AqiError::validation("City name cannot be empty"));
        }

        let expected = AqiLevel::from_aqi(self.current_aqi);
        if self.level != expected {
            return Err(AqiError::validation(format!(
                "{}: level '{}' does not match AQI {} (expected '{}')",
                self.city, self.level, self.current_aqi, expected
            )));
        }

        for kind in PollutantKind::ALL {
            let count = self.pollutants.iter().filter(|p| p.name == kind).count();
            if count != 1 {
                return Err(AqiError::validation(format!(
                    "{}: expected exactly one {} entry, found {}",
                    self.city, kind, count
                )));
            }
        }

        if let Some(bad) = self
            .pollutants
            .iter()
            .find(|p| !p.value.is_finite() || p.value < 0.0)
        {
            return Err(AqiError::validation(format!(
                "{}: {} value must be non-negative, got {}",
                self.city, bad.name, bad.value
            )));
        }

        if self.forecast.len() != FORECAST_DAYS {
            return Err(AqiError::validation(format!(
                "{}: expected {} forecast points, found {}",
                self.city,
                FORECAST_DAYS,
                self.forecast.len()
            )));
        }

        if let Some(bad) = self
            .feature_importance
            .iter()
            .find(|w| !(0.0..=1.0).contains(&w.importance))
        {
            return Err(AqiError::validation(format!(
                "{}: importance of '{}' must be within [0, 1], got {}",
                self.city, bad.feature, bad.importance
            )));
        }

        Ok(())
    }

    /// Value of a specific pollutant, if present
    #[must_use]
    pub fn pollutant(&self, kind: PollutantKind) -> Option<f64> {
        self.pollutants
            .iter()
            .find(|p| p.name == kind)
            .map(|p| p.value)
    }
}
