//! Offline geocoder backed by a fixed table.

use std::collections::HashMap;

use crate::error::{GpsError, Result};

use super::provider::Geocoder;

/// Geocoder that answers from an in-memory table.
///
/// Useful for tests and for running without network access; unknown queries
/// fail exactly like a lookup miss from a real service.
#[derive(Debug, Clone, Default)]
pub struct StaticGeocoder {
    entries: HashMap<String, (f64, f64)>,
}

impl StaticGeocoder {
    /// Create an empty geocoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a known location.
    pub fn with_location(mut self, query: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        self.entries.insert(query.into(), (latitude, longitude));
        self
    }
}

impl Geocoder for StaticGeocoder {
    fn geocode(&self, query: &str) -> Result<(f64, f64)> {
        self.entries
            .get(query)
            .copied()
            .ok_or_else(|| GpsError::Geocode(format!("no result for '{}'", query)))
    }

    fn name(&self) -> &str {
        "static"
    }
}
