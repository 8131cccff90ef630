//! Coordinate resolution with optional geocoding of unseen locations.

use tracing::info;

use crate::error::{GpsError, Result};
use crate::geocode::Geocoder;
use crate::input::{Cell, PLACEHOLDER};
use crate::reference::{Coordinate, ReferenceData};

use super::fields::{location_key, location_query};

/// Resolves specimen locations to coordinates.
///
/// Without a geocoder every location must already be in the coordinates
/// reference. With one, unseen locations are geocoded once, appended to the
/// reference file and reloaded, so later rows find them directly.
pub struct LocationResolver<'g> {
    geocoder: Option<&'g dyn Geocoder>,
    geocoded: usize,
}

impl<'g> LocationResolver<'g> {
    /// Fail on any location missing from the reference.
    pub fn strict() -> Self {
        Self {
            geocoder: None,
            geocoded: 0,
        }
    }

    /// Geocode locations missing from the reference.
    pub fn with_geocoder(geocoder: &'g dyn Geocoder) -> Self {
        Self {
            geocoder: Some(geocoder),
            geocoded: 0,
        }
    }

    /// Number of locations geocoded so far.
    pub fn geocoded(&self) -> usize {
        self.geocoded
    }

    /// Coordinate of a location; placeholders when no part is known.
    pub fn resolve(
        &mut self,
        reference: &mut ReferenceData,
        country: &Cell,
        region: &Cell,
        city: &Cell,
    ) -> Result<Coordinate> {
        if country.is_absent() && region.is_absent() && city.is_absent() {
            return Ok(Coordinate::new(PLACEHOLDER, PLACEHOLDER));
        }

        let key = location_key(country, region, city);
        if let Some(coordinate) = reference.coordinate(&key) {
            return Ok(coordinate.clone());
        }

        let Some(geocoder) = self.geocoder else {
            return Err(GpsError::UnresolvedLocation(key));
        };

        let query = location_query(country, region, city);
        let (latitude, longitude) = geocoder.geocode(&query).map_err(|e| {
            let reason = match e {
                GpsError::Geocode(message) => message,
                other => other.to_string(),
            };
            GpsError::Geocode(format!("{} could not geocode '{}': {}", geocoder.name(), query, reason))
        })?;
        info!(location = %key, latitude, longitude, geocoder = geocoder.name(), "Geocoded new location");

        let coordinate = Coordinate::from_degrees(latitude, longitude);
        reference.append_coordinate(&key, coordinate.clone())?;
        self.geocoded += 1;
        Ok(coordinate)
    }
}
