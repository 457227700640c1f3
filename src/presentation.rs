//! Presentation derivation
//!
//! Pure functions turning AQI and pollutant values into visual encodings:
//! color tokens, bar widths and forecast chart heights.

use serde::{Deserialize, Serialize};

use crate::models::{AqiLevel, FeatureWeight, ForecastPoint, PollutantKind};

/// Color bands used across the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorToken {
    Green,
    Yellow,
    Orange,
    Red,
    Purple,
    /// Darkest red, reserved for hazardous readings
    Maroon,
    /// Neutral default
    Gray,
}

impl ColorToken {
    #[must_use]
    pub fn hex(self) -> &'static str {
        match self {
            ColorToken::Green => "#22c55e",
            ColorToken::Yellow => "#eab308",
            ColorToken::Orange => "#f97316",
            ColorToken::Red => "#ef4444",
            ColorToken::Purple => "#8b5cf6",
            ColorToken::Maroon => "#b91c1c",
            ColorToken::Gray => "#6b7280",
        }
    }

    /// Channel values of [`Self::hex`], for true-color terminals
    #[must_use]
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            ColorToken::Green => (0x22, 0xc5, 0x5e),
            ColorToken::Yellow => (0xea, 0xb3, 0x08),
            ColorToken::Orange => (0xf9, 0x73, 0x16),
            ColorToken::Red => (0xef, 0x44, 0x44),
            ColorToken::Purple => (0x8b, 0x5c, 0xf6),
            ColorToken::Maroon => (0xb9, 0x1c, 0x1c),
            ColorToken::Gray => (0x6b, 0x72, 0x80),
        }
    }
}

/// Six-band color for an AQI value; shares breakpoints with [`AqiLevel::from_aqi`]
#[must_use]
pub fn aqi_to_color(aqi: u32) -> ColorToken {
    match aqi {
        0..=50 => ColorToken::Green,
        51..=100 => ColorToken::Yellow,
        101..=150 => ColorToken::Orange,
        151..=200 => ColorToken::Red,
        201..=300 => ColorToken::Purple,
        _ => ColorToken::Maroon,
    }
}

#[must_use]
pub fn level_to_color(level: AqiLevel) -> ColorToken {
    match level {
        AqiLevel::Good => ColorToken::Green,
        AqiLevel::Moderate => ColorToken::Yellow,
        AqiLevel::UnhealthyForSensitiveGroups => ColorToken::Orange,
        AqiLevel::Unhealthy => ColorToken::Red,
        AqiLevel::VeryUnhealthy => ColorToken::Purple,
        AqiLevel::Hazardous => ColorToken::Maroon,
    }
}

/// Color for a free-text level label; unrecognized labels get the neutral token
#[must_use]
pub fn level_label_to_color(label: &str) -> ColorToken {
    label
        .parse::<AqiLevel>()
        .map_or(ColorToken::Gray, level_to_color)
}

/// Simplified per-pollutant color scale.
///
/// This is a rough visual cue only, not a regulatory classification: PM2.5
/// above 55, PM10 above 155 and O3 above 70 are flagged, anything else above
/// 50 is a caution.
#[must_use]
pub fn pollutant_to_color(name: PollutantKind, value: f64) -> ColorToken {
    match name {
        PollutantKind::Pm25 if value > 55.0 => ColorToken::Red,
        PollutantKind::Pm10 if value > 155.0 => ColorToken::Red,
        PollutantKind::O3 if value > 70.0 => ColorToken::Orange,
        _ if value > 50.0 => ColorToken::Yellow,
        _ => ColorToken::Green,
    }
}

/// Bar width in percent: half the value, capped at 100
#[must_use]
pub fn pollutant_to_bar_width(value: f64) -> f64 {
    (value / 2.0).clamp(0.0, 100.0)
}

/// Stable ascending sort by importance
#[must_use]
pub fn sort_by_importance_ascending(features: &[FeatureWeight]) -> Vec<FeatureWeight> {
    let mut sorted = features.to_vec();
    sorted.sort_by(|a, b| a.importance.total_cmp(&b.importance));
    sorted
}

/// One bar of the forecast chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastBar {
    pub day: String,
    pub aqi: u32,
    pub color: ColorToken,
    /// Height relative to the chart's axis maximum, in percent
    pub height_pct: f64,
}

/// Axis maximum for a forecast chart: the series peak rounded up to the next 50
#[must_use]
pub fn forecast_axis_max(forecast: &[ForecastPoint]) -> u32 {
    let peak = forecast.iter().map(|p| p.aqi).max().unwrap_or(0);
    (peak.div_ceil(50) * 50).max(50)
}

#[must_use]
pub fn forecast_bars(forecast: &[ForecastPoint]) -> Vec<ForecastBar> {
    let axis_max = f64::from(forecast_axis_max(forecast));
    forecast
        .iter()
        .map(|point| ForecastBar {
            day: point.day.clone(),
            aqi: point.aqi,
            color: aqi_to_color(point.aqi),
            height_pct: f64::from(point.aqi) / axis_max * 100.0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn weight(feature: &str, importance: f64) -> FeatureWeight {
        FeatureWeight {
            feature: feature.to_string(),
            importance,
        }
    }

    #[rstest]
    #[case(0, ColorToken::Green)]
    #[case(50, ColorToken::Green)]
    #[case(51, ColorToken::Yellow)]
    #[case(100, ColorToken::Yellow)]
    #[case(150, ColorToken::Orange)]
    #[case(162, ColorToken::Red)]
    #[case(200, ColorToken::Red)]
    #[case(300, ColorToken::Purple)]
    #[case(301, ColorToken::Maroon)]
    fn test_aqi_to_color(#[case] aqi: u32, #[case] expected: ColorToken) {
        assert_eq!(aqi_to_color(aqi), expected);
    }

    #[test]
    fn test_color_and_level_encodings_agree() {
        for aqi in 0..=600 {
            assert_eq!(
                aqi_to_color(aqi),
                level_to_color(AqiLevel::from_aqi(aqi)),
                "disagreement at AQI {aqi}"
            );
        }
    }

    #[test]
    fn test_level_label_to_color() {
        assert_eq!(level_label_to_color("Unhealthy"), ColorToken::Red);
        assert_eq!(
            level_label_to_color("Unhealthy for Sensitive Groups"),
            ColorToken::Orange
        );
        assert_eq!(level_label_to_color("Smoky"), ColorToken::Gray);
    }

    #[rstest]
    #[case(PollutantKind::Pm25, 56.0, ColorToken::Red)]
    #[case(PollutantKind::Pm25, 55.0, ColorToken::Yellow)]
    #[case(PollutantKind::Pm10, 156.0, ColorToken::Red)]
    #[case(PollutantKind::Pm10, 95.0, ColorToken::Yellow)]
    #[case(PollutantKind::O3, 71.0, ColorToken::Orange)]
    #[case(PollutantKind::O3, 52.0, ColorToken::Yellow)]
    #[case(PollutantKind::No2, 51.0, ColorToken::Yellow)]
    #[case(PollutantKind::Co, 8.0, ColorToken::Green)]
    fn test_pollutant_to_color(
        #[case] kind: PollutantKind,
        #[case] value: f64,
        #[case] expected: ColorToken,
    ) {
        assert_eq!(pollutant_to_color(kind, value), expected);
    }

    #[test]
    fn test_pollutant_bar_width() {
        assert_eq!(pollutant_to_bar_width(250.0), 100.0);
        assert_eq!(pollutant_to_bar_width(40.0), 20.0);
        assert_eq!(pollutant_to_bar_width(0.0), 0.0);
    }

    #[test]
    fn test_importance_sort_is_idempotent_and_stable() {
        let features = vec![
            weight("Previous Day AQI", 0.98),
            weight("Wind Direction", 0.75),
            weight("Temperature", 0.75),
            weight("Vehicle Traffic", 0.5),
        ];
        let sorted = sort_by_importance_ascending(&features);
        let names: Vec<&str> = sorted.iter().map(|w| w.feature.as_str()).collect();
        assert_eq!(
            names,
            vec!["Vehicle Traffic", "Wind Direction", "Temperature", "Previous Day AQI"]
        );
        assert_eq!(sort_by_importance_ascending(&sorted), sorted);
    }

    #[test]
    fn test_forecast_bars_scale_to_axis() {
        let forecast = vec![
            ForecastPoint {
                day: "Tomorrow".to_string(),
                aqi: 190,
            },
            ForecastPoint {
                day: "In 2 Days".to_string(),
                aqi: 100,
            },
        ];
        assert_eq!(forecast_axis_max(&forecast), 200);
        let bars = forecast_bars(&forecast);
        assert_eq!(bars[0].height_pct, 95.0);
        assert_eq!(bars[0].color, ColorToken::Red);
        assert_eq!(bars[1].height_pct, 50.0);
        assert_eq!(forecast_axis_max(&[]), 50);
    }

    #[rstest]
    #[case(ColorToken::Green)]
    #[case(ColorToken::Yellow)]
    #[case(ColorToken::Orange)]
    #[case(ColorToken::Red)]
    #[case(ColorToken::Purple)]
    #[case(ColorToken::Maroon)]
    #[case(ColorToken::Gray)]
    fn test_rgb_matches_hex(#[case] token: ColorToken) {
        let (r, g, b) = token.rgb();
        assert_eq!(format!("#{r:02x}{g:02x}{b:02x}"), token.hex());
    }
}
