//! Text rendering of the dashboard

use std::fmt;

use nu_ansi_term::{Color, Style};

use super::dashboard::Screen;
use super::panel::PanelStatus;
use super::state::ViewState;
use crate::data_access::Notice;
use crate::models::AqiRecord;
use crate::presentation::{
    ColorToken, forecast_bars, level_to_color, pollutant_to_bar_width, pollutant_to_color,
    sort_by_importance_ascending,
};

/// Width of a full (100%) bar in characters
const BAR_WIDTH: usize = 30;

/// Render options
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Emit ANSI color escapes
    pub color: bool,
}

fn terminal_color(token: ColorToken) -> Color {
    let (r, g, b) = token.rgb();
    Color::Rgb(r, g, b)
}

#[derive(Clone, Copy)]
struct Painter {
    color: bool,
}

impl Painter {
    fn paint(self, token: ColorToken, text: &str) -> String {
        self.style(Style::new().fg(terminal_color(token)), text)
    }

    fn style(self, style: Style, text: &str) -> String {
        if self.color {
            style.paint(text).to_string()
        } else {
            text.to_string()
        }
    }
}

impl From<RenderOptions> for Painter {
    fn from(options: RenderOptions) -> Self {
        Self {
            color: options.color,
        }
    }
}

fn bar(percent: f64) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

#[must_use]
pub fn render_header() -> String {
    "Pearls AQI Predictor\nForecasting air quality for the next 3 days.\n".to_string()
}

#[must_use]
pub fn render_notice(notice: &Notice, options: RenderOptions) -> String {
    let painter = Painter::from(options);
    let (title, color) = if notice.is_informational() {
        ("Info", Color::Blue)
    } else {
        ("Error", Color::Red)
    };
    format!(
        "{}\n{}\n",
        painter.style(color.bold(), &format!("[{title}]")),
        painter.style(Style::new().fg(color), &notice.message)
    )
}

#[must_use]
pub fn render_screen(screen: &Screen, options: RenderOptions) -> String {
    match &screen.view {
        ViewState::Empty => String::new(),
        ViewState::Loading { city } => format!("Loading air quality data for {city}...\n"),
        ViewState::Error { notice, .. } => render_notice(notice, options),
        ViewState::Populated {
            record,
            last_updated,
        } => format!(
            "Last updated: {}\n\n{}",
            last_updated.format("%H:%M:%S"),
            RecordView {
                record,
                panel: &screen.recommendations,
                painter: options.into(),
            }
        ),
    }
}

/// The recommendation section on its own, for output that arrives after the
/// rest of the screen
#[must_use]
pub fn render_recommendations(panel: &PanelStatus) -> String {
    PanelView(panel).to_string()
}

struct PanelView<'a>(&'a PanelStatus);

impl fmt::Display for PanelView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "AI-Powered Health Recommendations")?;
        match self.0 {
            PanelStatus::Idle => {}
            PanelStatus::Loading => writeln!(f, "  Generating recommendations...")?,
            PanelStatus::Ready(recommendations) => {
                if !recommendations.explanation.is_empty() {
                    writeln!(f, "  {}", recommendations.explanation)?;
                }
                for item in &recommendations.items {
                    writeln!(f, "  • {item}")?;
                }
            }
        }
        Ok(())
    }
}

struct RecordView<'a> {
    record: &'a AqiRecord,
    panel: &'a PanelStatus,
    painter: Painter,
}

impl fmt::Display for RecordView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (record, painter) = (self.record, self.painter);

        let card_color = level_to_color(record.level);
        writeln!(f, "Current Air Quality in {}", record.city)?;
        writeln!(
            f,
            "  {} US AQI  {}\n",
            painter.paint(card_color, &record.current_aqi.to_string()),
            painter.paint(card_color, record.level.label())
        )?;

        writeln!(f, "3-Day AQI Forecast")?;
        for forecast_bar in forecast_bars(&record.forecast) {
            writeln!(
                f,
                "  {:<10} {} {}",
                forecast_bar.day,
                painter.paint(forecast_bar.color, &bar(forecast_bar.height_pct)),
                forecast_bar.aqi
            )?;
        }
        writeln!(f)?;

        writeln!(f, "Pollutant Levels")?;
        for pollutant in &record.pollutants {
            let color = pollutant_to_color(pollutant.name, pollutant.value);
            writeln!(
                f,
                "  {:<6} {} {}",
                pollutant.name.label(),
                painter.paint(color, &bar(pollutant_to_bar_width(pollutant.value))),
                pollutant.value
            )?;
        }
        writeln!(f)?;

        writeln!(f, "{}", PanelView(self.panel))?;

        writeln!(f, "Model Insights: Feature Importance")?;
        for weight in sort_by_importance_ascending(&record.feature_importance) {
            writeln!(
                f,
                "  {:<20} {} {:.2}",
                weight.feature,
                painter.paint(ColorToken::Purple, &bar(weight.importance * 100.0)),
                weight.importance
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::aqi::tests::sample_record;
    use crate::view::panel::Recommendations;
    use chrono::Local;

    fn populated(panel: PanelStatus) -> Screen {
        Screen {
            view: ViewState::Populated {
                record: sample_record("Lahore", 185),
                last_updated: Local::now(),
            },
            recommendations: panel,
        }
    }

    #[test]
    fn test_empty_renders_nothing() {
        let screen = Screen {
            view: ViewState::Empty,
            recommendations: PanelStatus::Idle,
        };
        assert_eq!(render_screen(&screen, RenderOptions::default()), "");
    }

    #[test]
    fn test_loading_renders_busy_line() {
        let screen = Screen {
            view: ViewState::Loading {
                city: "Lahore".to_string(),
            },
            recommendations: PanelStatus::Idle,
        };
        let text = render_screen(&screen, RenderOptions::default());
        assert!(text.contains("Loading air quality data for Lahore"));
    }

    #[test]
    fn test_populated_renders_all_panels() {
        let screen = populated(PanelStatus::Ready(Recommendations::parse(
            "Bad air.\n- Stay in\n- Mask up\n- Purify",
        )));
        let text = render_screen(&screen, RenderOptions::default());
        assert!(text.contains("Last updated:"));
        assert!(text.contains("Current Air Quality in Lahore"));
        assert!(text.contains("185 US AQI  Unhealthy"));
        assert!(text.contains("3-Day AQI Forecast"));
        assert!(text.contains("PM2.5"));
        assert!(text.contains("• Mask up"));
        assert!(text.contains("Model Insights: Feature Importance"));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn test_loading_panel_placeholder() {
        let text = render_screen(&populated(PanelStatus::Loading), RenderOptions::default());
        assert!(text.contains("Generating recommendations..."));
    }

    #[test]
    fn test_notice_styles() {
        let info = render_notice(
            &Notice::substitution("Multan", "Karachi"),
            RenderOptions { color: true },
        );
        assert!(info.contains(&Color::Blue.bold().paint("[Info]").to_string()));

        let failure = render_notice(&Notice::failure(), RenderOptions { color: true });
        assert!(failure.contains(&Color::Red.bold().paint("[Error]").to_string()));
        assert!(!failure.contains("[Info]"));
    }

    #[test]
    fn test_colored_card_uses_level_color() {
        let text = render_screen(
            &populated(PanelStatus::Idle),
            RenderOptions { color: true },
        );
        let red = Color::Rgb(239, 68, 68);
        assert!(text.contains(&red.paint("185").to_string()));
        assert!(text.contains(&red.paint("Unhealthy").to_string()));
    }

    #[test]
    fn test_recommendations_section_alone() {
        let text = render_recommendations(&PanelStatus::Ready(Recommendations::parse(
            "Stay safe.\n- Close windows",
        )));
        assert_eq!(
            text,
            "AI-Powered Health Recommendations\n  Stay safe.\n  • Close windows\n"
        );
    }

    #[test]
    fn test_bar_lengths() {
        assert_eq!(bar(100.0).chars().filter(|c| *c == '█').count(), BAR_WIDTH);
        assert_eq!(bar(0.0).chars().filter(|c| *c == '█').count(), 0);
        assert_eq!(bar(50.0).chars().filter(|c| *c == '█').count(), BAR_WIDTH / 2);
    }
}
