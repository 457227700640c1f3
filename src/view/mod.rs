//! View composition
//!
//! This module assembles the dashboard screen:
//! - State: the Loading / Error / Populated / Empty state machine
//! - Dashboard: async controller driving fetches and recommendations
//! - Selector: city autocomplete
//! - Panel: recommendation text parsing and request tracking
//! - Render: text output

pub mod dashboard;
pub mod panel;
pub mod render;
pub mod selector;
pub mod state;

pub use dashboard::{Dashboard, Screen};
pub use panel::{PanelStatus, RecommendationPanel, Recommendations};
pub use render::{
    RenderOptions, render_header, render_notice, render_recommendations, render_screen,
};
pub use selector::CitySelector;
pub use state::{DashboardState, RequestTicket, ViewState};
