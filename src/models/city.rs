//! Lookup key for the city data store

use std::fmt;

/// City name normalized for case-insensitive lookup.
///
/// Keys are only ever used to index the store; the record's own `city`
/// field is what gets displayed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CityKey(String);

impl CityKey {
    /// Normalize a free-text city name
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self(name.trim().to_lowercase())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CityKey {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for CityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
