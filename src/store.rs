//! City data store
//!
//! An immutable table of curated AQI records keyed by normalized city name.
//! The bundled table is compiled into the binary, so lookups never touch
//! disk or network.

use std::collections::HashMap;

use tracing::debug;

use crate::models::{AqiRecord, CityKey};
use crate::{AqiError, Result};

const BUNDLED_CITIES: &str = include_str!("../data/cities.json");

/// Read-only lookup capability over a set of city records
pub trait CityLookup: Send + Sync {
    /// Find the record for a normalized city key.
    ///
    /// `Ok(None)` means the city is simply not covered; `Err` is reserved for
    /// unexpected faults in the underlying table.
    fn lookup(&self, key: &CityKey) -> Result<Option<AqiRecord>>;

    /// Canonical display names of every covered city, in table order
    fn cities(&self) -> Vec<String>;
}

/// Curated, validated record table
#[derive(Debug, Clone)]
pub struct CuratedStore {
    records: HashMap<CityKey, AqiRecord>,
    order: Vec<String>,
}

impl CuratedStore {
    /// Load the table bundled with the crate
    pub fn bundled() -> Result<Self> {
        let records: Vec<AqiRecord> = serde_json::from_str(BUNDLED_CITIES)?;
        Self::from_records(records)
    }

    /// Build a table from arbitrary records, rejecting invalid entries and
    /// duplicate keys
    pub fn from_records(records: Vec<AqiRecord>) -> Result<Self> {
        let mut table = HashMap::with_capacity(records.len());
        let mut order = Vec::with_capacity(records.len());

        for record in records {
            record.validate()?;
            let key = CityKey::new(&record.city);
            if table.contains_key(&key) {
                return Err(AqiError::validation(format!(
                    "Duplicate city '{}' in data table",
                    record.city
                )));
            }
            order.push(record.city.clone());
            table.insert(key, record);
        }

        debug!("Loaded {} city records", table.len());
        Ok(Self {
            records: table,
            order,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl CityLookup for CuratedStore {
    fn lookup(&self, key: &CityKey) -> Result<Option<AqiRecord>> {
        Ok(self.records.get(key).cloned())
    }

    fn cities(&self) -> Vec<String> {
        self.order.clone()
    }
}
