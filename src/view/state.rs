//! Dashboard view state machine
//!
//! Every fetch is tagged with a generation number. Only the response for the
//! most recent request may change the view; anything older is dropped.

use chrono::{DateTime, Local};
use tracing::debug;

use crate::data_access::{FetchOutcome, Notice};
use crate::models::AqiRecord;

/// What the dashboard is currently showing
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    /// Nothing requested yet
    Empty,
    /// A fetch is in flight
    Loading { city: String },
    /// The fetch resolved with a notice; the substituted record is kept but
    /// only the notice banner is shown
    Error { notice: Notice, record: AqiRecord },
    /// A record is on screen
    Populated {
        record: AqiRecord,
        last_updated: DateTime<Local>,
    },
}

impl ViewState {
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading { .. })
    }

    /// Record currently rendered, if any
    #[must_use]
    pub fn displayed_record(&self) -> Option<&AqiRecord> {
        match self {
            ViewState::Populated { record, .. } => Some(record),
            _ => None,
        }
    }
}

/// Handle for one in-flight fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    pub generation: u64,
    pub city: String,
}

#[derive(Debug, Clone)]
pub struct DashboardState {
    view: ViewState,
    generation: u64,
    requested_city: Option<String>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            view: ViewState::Empty,
            generation: 0,
            requested_city: None,
        }
    }

    #[must_use]
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// City of the latest request, as the user typed it
    #[must_use]
    pub fn requested_city(&self) -> Option<&str> {
        self.requested_city.as_deref()
    }

    /// Start a new fetch, superseding any request still in flight
    pub fn begin_fetch(&mut self, city: &str) -> RequestTicket {
        self.generation += 1;
        self.requested_city = Some(city.to_string());
        self.view = ViewState::Loading {
            city: city.to_string(),
        };
        RequestTicket {
            generation: self.generation,
            city: city.to_string(),
        }
    }

    /// Apply a fetch result. Returns `false` when the ticket is stale.
    pub fn resolve(
        &mut self,
        ticket: &RequestTicket,
        outcome: FetchOutcome,
        now: DateTime<Local>,
    ) -> bool {
        if ticket.generation != self.generation {
            debug!(
                "Discarding stale response for '{}' (generation {} < {})",
                ticket.city, ticket.generation, self.generation
            );
            return false;
        }

        self.view = match outcome.notice {
            Some(notice) => ViewState::Error {
                notice,
                record: outcome.record,
            },
            None => ViewState::Populated {
                record: outcome.record,
                last_updated: now,
            },
        };
        true
    }
}
