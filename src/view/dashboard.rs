//! Dashboard controller
//!
//! Ties the data access service and recommendation gateway to the view
//! state. All methods take `&self`, so overlapping requests can be driven
//! from one task; the generation counter in [`DashboardState`] decides which
//! response wins.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Local;
use tracing::{debug, info, instrument};

use super::panel::{PanelStatus, RecommendationPanel};
use super::selector::CitySelector;
use super::state::{DashboardState, ViewState};
use crate::data_access::AqiDataService;
use crate::recommendations::RecommendationGateway;

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    pub view: ViewState,
    pub recommendations: PanelStatus,
}

pub struct Dashboard {
    service: AqiDataService,
    gateway: RecommendationGateway,
    selector: CitySelector,
    state: Mutex<DashboardState>,
    panel: Mutex<RecommendationPanel>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Dashboard {
    #[must_use]
    pub fn new(service: AqiDataService, gateway: RecommendationGateway) -> Self {
        let selector = CitySelector::new(service.available_cities());
        Self {
            service,
            gateway,
            selector,
            state: Mutex::new(DashboardState::new()),
            panel: Mutex::new(RecommendationPanel::default()),
        }
    }

    #[must_use]
    pub fn selector(&self) -> &CitySelector {
        &self.selector
    }

    #[must_use]
    pub fn view(&self) -> ViewState {
        lock(&self.state).view().clone()
    }

    #[must_use]
    pub fn recommendations(&self) -> PanelStatus {
        lock(&self.panel).status().clone()
    }

    #[must_use]
    pub fn screen(&self) -> Screen {
        Screen {
            view: self.view(),
            recommendations: self.recommendations(),
        }
    }

    /// Initial load of the default city
    pub async fn mount(&self) -> bool {
        let city = self.service.default_city().to_string();
        self.select_city(&city).await
    }

    /// Re-run the fetch for the most recently requested city
    pub async fn refresh(&self) -> bool {
        let city = lock(&self.state)
            .requested_city()
            .map(str::to_string)
            .unwrap_or_else(|| self.service.default_city().to_string());
        self.select_city(&city).await
    }

    /// Fetch `city` and show it. Returns `false` if a newer request superseded
    /// this one before it resolved.
    ///
    /// Returns as soon as the record is on screen. The recommendation panel is
    /// left `Loading` for a new reading; call [`Self::load_recommendations`]
    /// to fill it.
    #[instrument(skip(self))]
    pub async fn select_city(&self, city: &str) -> bool {
        let ticket = lock(&self.state).begin_fetch(city);
        let outcome = self.service.fetch_by_city(city).await;

        let applied = lock(&self.state).resolve(&ticket, outcome, Local::now());
        if applied {
            info!("Showing data for request '{}'", city);
            self.request_recommendations();
        }
        applied
    }

    /// Ask the gateway for the pending reading's recommendations. Returns
    /// `false` when nothing was pending or a newer reading replaced it.
    pub async fn load_recommendations(&self) -> bool {
        let Some((aqi, level)) = lock(&self.panel).take_pending() else {
            return false;
        };

        let text = self.gateway.get_recommendations(aqi, level).await;
        lock(&self.panel).complete(aqi, level, &text)
    }

    /// Point the panel at the displayed reading, unless it already was
    fn request_recommendations(&self) {
        let Some((aqi, level)) = lock(&self.state)
            .view()
            .displayed_record()
            .map(|record| (record.current_aqi, record.level))
        else {
            return;
        };

        if !lock(&self.panel).request(aqi, level) {
            debug!("Recommendations for AQI {} ({}) already requested", aqi, level);
        }
    }
}
