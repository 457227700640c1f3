//! Data access service
//!
//! Resolves a requested city name to a record. Unknown cities fall back to the
//! designated default city with a substitution notice; unexpected store faults
//! fall back the same way with a failure notice. A configurable delay keeps a
//! perceptible loading state ahead of a real backend.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, instrument};

use crate::config::DataConfig;
use crate::models::{AqiRecord, CityKey};
use crate::store::CityLookup;
use crate::{AqiError, Result};

/// Message shown when the data layer fails unexpectedly
pub const FAILURE_MESSAGE: &str = "An unexpected error occurred while fetching data.";

/// Whether a notice is a routine substitution or a genuine failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Requested city is not covered; the default city was shown instead
    Substitution,
    /// The lookup itself failed
    Failure,
}

/// Non-fatal message attached to a fetch result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn substitution(requested: &str, substitute: &str) -> Self {
        Self {
            kind: NoticeKind::Substitution,
            message: format!(
                "Data for \"{requested}\" is not available. Showing data for {substitute} instead."
            ),
        }
    }

    #[must_use]
    pub fn failure() -> Self {
        Self {
            kind: NoticeKind::Failure,
            message: FAILURE_MESSAGE.to_string(),
        }
    }

    #[must_use]
    pub fn is_informational(&self) -> bool {
        self.kind == NoticeKind::Substitution
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Result of resolving a city: always a complete record, plus an optional notice
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    pub record: AqiRecord,
    pub notice: Option<Notice>,
}

/// Tunables for the data access service
#[derive(Debug, Clone)]
pub struct DataOptions {
    /// Artificial latency before every fetch resolves
    pub fetch_delay: Duration,
    /// City substituted when the requested one is unavailable
    pub default_city: String,
}

impl Default for DataOptions {
    fn default() -> Self {
        Self {
            fetch_delay: Duration::from_millis(300),
            default_city: "Karachi".to_string(),
        }
    }
}

impl From<&DataConfig> for DataOptions {
    fn from(config: &DataConfig) -> Self {
        Self {
            fetch_delay: Duration::from_millis(config.fetch_delay_ms),
            default_city: config.default_city.clone(),
        }
    }
}

/// Resolves city names against an injected store
#[derive(Clone)]
pub struct AqiDataService {
    store: Arc<dyn CityLookup>,
    fetch_delay: Duration,
    fallback: AqiRecord,
}

impl AqiDataService {
    /// Create a service over `store`. Fails if the default city is not in it.
    pub fn new(store: Arc<dyn CityLookup>, options: DataOptions) -> Result<Self> {
        let fallback = store
            .lookup(&CityKey::new(&options.default_city))?
            .ok_or_else(|| {
                AqiError::config(format!(
                    "Default city '{}' is not present in the data store",
                    options.default_city
                ))
            })?;

        Ok(Self {
            store,
            fetch_delay: options.fetch_delay,
            fallback,
        })
    }

    /// Canonical names of the cities the store covers
    #[must_use]
    pub fn available_cities(&self) -> Vec<String> {
        self.store.cities()
    }

    /// Display name of the fallback city
    #[must_use]
    pub fn default_city(&self) -> &str {
        &self.fallback.city
    }

    /// Resolve `city_name` to a record, applying the fallback policy
    #[instrument(skip(self))]
    pub async fn fetch_by_city(&self, city_name: &str) -> FetchOutcome {
        if !self.fetch_delay.is_zero() {
            tokio::time::sleep(self.fetch_delay).await;
        }

        let key = CityKey::new(city_name);
        match self.store.lookup(&key) {
            Ok(Some(record)) => {
                debug!("Found record for {}", record.city);
                FetchOutcome {
                    record,
                    notice: None,
                }
            }
            Ok(None) => {
                info!(
                    "No data for '{}', substituting {}",
                    city_name, self.fallback.city
                );
                FetchOutcome {
                    record: self.fallback.clone(),
                    notice: Some(Notice::substitution(city_name, &self.fallback.city)),
                }
            }
            Err(e) => {
                error!("Error fetching curated AQI data for '{}': {}", city_name, e);
                FetchOutcome {
                    record: self.fallback.clone(),
                    notice: Some(Notice::failure()),
                }
            }
        }
    }
}

impl fmt::Debug for AqiDataService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AqiDataService")
            .field("fetch_delay", &self.fetch_delay)
            .field("default_city", &self.fallback.city)
            .finish()
    }
}
