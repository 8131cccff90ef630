//! Geocoding of previously unseen locations.

mod fixed;
mod mapbox;
mod provider;

pub use fixed::StaticGeocoder;
pub use mapbox::MapboxGeocoder;
pub use provider::Geocoder;
