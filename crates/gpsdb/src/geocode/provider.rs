//! Geocoder trait.

use crate::error::Result;

/// Resolves a free-text location query to a coordinate.
///
/// Implementations perform a single attempt; any failure is returned as an
/// error and callers treat it as fatal.
pub trait Geocoder {
    /// Geocode `query` (non-placeholder location parts joined by `,`),
    /// returning `(latitude, longitude)`.
    fn geocode(&self, query: &str) -> Result<(f64, f64)>;

    /// Short name used in log lines.
    fn name(&self) -> &str;
}
