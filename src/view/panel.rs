//! Health recommendation panel

use serde::Serialize;

use crate::models::AqiLevel;

/// Recommendation text split into its explanation and bullet items
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendations {
    pub explanation: String,
    pub items: Vec<String>,
}

impl Recommendations {
    /// Split generated text on `- ` bullets. Text without bullets (such as the
    /// placeholder messages) becomes a bare explanation.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let normalized = text.replace("\r\n", "\n");
        let mut parts = normalized.split("\n- ");

        let first = parts.next().unwrap_or_default().trim();
        let mut items = Vec::new();
        let explanation = match first.strip_prefix("- ") {
            Some(item) => {
                items.push(item.trim().to_string());
                String::new()
            }
            None => first.to_string(),
        };

        items.extend(
            parts
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string),
        );

        Self { explanation, items }
    }
}

/// What the recommendation panel shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelStatus {
    /// No reading on screen yet
    Idle,
    /// Waiting on the gateway
    Loading,
    Ready(Recommendations),
}

/// Tracks which reading the panel was last requested for
#[derive(Debug, Clone)]
pub struct RecommendationPanel {
    reading: Option<(u32, AqiLevel)>,
    dispatched: bool,
    status: PanelStatus,
}

impl Default for RecommendationPanel {
    fn default() -> Self {
        Self {
            reading: None,
            dispatched: false,
            status: PanelStatus::Idle,
        }
    }
}

impl RecommendationPanel {
    #[must_use]
    pub fn status(&self) -> &PanelStatus {
        &self.status
    }

    /// Mark a reading as requested. Returns `false` if it already was, in
    /// which case the gateway must not be called again.
    pub fn request(&mut self, aqi: u32, level: AqiLevel) -> bool {
        if self.reading == Some((aqi, level)) {
            return false;
        }
        self.reading = Some((aqi, level));
        self.dispatched = false;
        self.status = PanelStatus::Loading;
        true
    }

    /// Hand out the requested reading for a gateway call, at most once
    pub fn take_pending(&mut self) -> Option<(u32, AqiLevel)> {
        if self.dispatched || self.status != PanelStatus::Loading {
            return None;
        }
        self.dispatched = true;
        self.reading
    }

    /// Store gateway text, unless the panel has since moved to another reading
    pub fn complete(&mut self, aqi: u32, level: AqiLevel, text: &str) -> bool {
        if self.reading != Some((aqi, level)) {
            return false;
        }
        self.status = PanelStatus::Ready(Recommendations::parse(text));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_explanation_and_items() {
        let parsed = Recommendations::parse(
            "The air is unhealthy.\n- Limit outdoor activity\n- Wear an N95 mask \n- Keep windows closed",
        );
        assert_eq!(parsed.explanation, "The air is unhealthy.");
        assert_eq!(
            parsed.items,
            vec![
                "Limit outdoor activity",
                "Wear an N95 mask",
                "Keep windows closed"
            ]
        );
    }

    #[test]
    fn test_parse_plain_message() {
        let parsed = Recommendations::parse("API Key not configured. Please set up your API key.");
        assert_eq!(
            parsed.explanation,
            "API Key not configured. Please set up your API key."
        );
        assert!(parsed.items.is_empty());
    }

    #[test]
    fn test_parse_leading_bullet_and_crlf() {
        let parsed = Recommendations::parse("- Stay inside\r\n- Run a purifier");
        assert_eq!(parsed.explanation, "");
        assert_eq!(parsed.items, vec!["Stay inside", "Run a purifier"]);
    }

    #[test]
    fn test_panel_requests_once_per_reading() {
        let mut panel = RecommendationPanel::default();
        assert_eq!(panel.status(), &PanelStatus::Idle);
        assert!(panel.request(185, AqiLevel::Unhealthy));
        assert!(!panel.request(185, AqiLevel::Unhealthy));
        assert!(panel.request(88, AqiLevel::Moderate));
    }

    #[test]
    fn test_pending_reading_is_handed_out_once() {
        let mut panel = RecommendationPanel::default();
        assert_eq!(panel.take_pending(), None);

        panel.request(162, AqiLevel::Unhealthy);
        assert_eq!(panel.take_pending(), Some((162, AqiLevel::Unhealthy)));
        assert_eq!(panel.take_pending(), None);

        panel.request(88, AqiLevel::Moderate);
        assert_eq!(panel.take_pending(), Some((88, AqiLevel::Moderate)));
        panel.complete(88, AqiLevel::Moderate, "done");
        assert_eq!(panel.take_pending(), None);
    }

    #[test]
    fn test_panel_ignores_outdated_completion() {
        let mut panel = RecommendationPanel::default();
        panel.request(185, AqiLevel::Unhealthy);
        panel.request(88, AqiLevel::Moderate);
        assert!(!panel.complete(185, AqiLevel::Unhealthy, "old"));
        assert_eq!(panel.status(), &PanelStatus::Loading);
        assert!(panel.complete(88, AqiLevel::Moderate, "fresh"));
        assert!(matches!(panel.status(), PanelStatus::Ready(r) if r.explanation == "fresh"));
    }
}
