//! Mapbox forward geocoding.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::Url;
use serde::Deserialize;
use tracing::debug;

use crate::error::{GpsError, Result};

use super::provider::Geocoder;

/// Default Mapbox forward geocoding endpoint.
const DEFAULT_API_URL: &str = "https://api.mapbox.com/geocoding/v5/mapbox.places";

/// Geocoder using the Mapbox places API.
pub struct MapboxGeocoder {
    client: Client,
    api_url: String,
    api_key: String,
}

impl MapboxGeocoder {
    /// Create a geocoder with an API key.
    ///
    /// The endpoint can be overridden with the `MAPBOX_API_URL` environment variable.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(GpsError::Config("Mapbox API key is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| GpsError::Config(format!("Failed to create HTTP client: {}", e)))?;

        let api_url = std::env::var("MAPBOX_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        Ok(Self {
            client,
            api_url,
            api_key,
        })
    }

    /// Create a geocoder using the `MAPBOX_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("MAPBOX_API_KEY").map_err(|_| {
            GpsError::Config(
                "MAPBOX_API_KEY is not set; pass --mapbox-key or export the variable".to_string(),
            )
        })?;
        Self::new(api_key)
    }

    fn request_url(&self, query: &str) -> Result<Url> {
        let mut url = Url::parse(&self.api_url)
            .map_err(|e| GpsError::Config(format!("Invalid Mapbox URL '{}': {}", self.api_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| GpsError::Config(format!("Invalid Mapbox URL '{}'", self.api_url)))?
            .push(&format!("{}.json", query));
        url.query_pairs_mut()
            .append_pair("access_token", &self.api_key)
            .append_pair("limit", "1");
        Ok(url)
    }
}

impl Geocoder for MapboxGeocoder {
    fn geocode(&self, query: &str) -> Result<(f64, f64)> {
        let url = self.request_url(query)?;
        debug!(query, "Requesting Mapbox geocode");

        let response = self.client.get(url).send().map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                GpsError::Geocode(format!("Failed to reach Mapbox: {}", e))
            } else {
                GpsError::Geocode(format!("Mapbox request failed: {}", e))
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().unwrap_or_default();
            if status.as_u16() == 401 {
                return Err(GpsError::Geocode(
                    "The provided Mapbox API key is not valid".to_string(),
                ));
            }
            return Err(GpsError::Geocode(format!(
                "Mapbox error ({}): {}",
                status, error_text
            )));
        }

        let body: MapboxResponse = response
            .json()
            .map_err(|e| GpsError::Geocode(format!("Failed to parse Mapbox response: {}", e)))?;

        body.features
            .first()
            .map(|feature| (feature.center[1], feature.center[0]))
            .ok_or_else(|| GpsError::Geocode(format!("no result for '{}'", query)))
    }

    fn name(&self) -> &str {
        "mapbox"
    }
}

#[derive(Deserialize)]
struct MapboxResponse {
    features: Vec<MapboxFeature>,
}

#[derive(Deserialize)]
struct MapboxFeature {
    /// `[longitude, latitude]`
    center: [f64; 2],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_key_rejected() {
        assert!(matches!(MapboxGeocoder::new("  "), Err(GpsError::Config(_))));
    }

    #[test]
    fn test_request_url_encodes_query() {
        let geocoder = MapboxGeocoder {
            client: Client::new(),
            api_url: DEFAULT_API_URL.to_string(),
            api_key: "token".to_string(),
        };
        let url = geocoder.request_url("UNITED KINGDOM,CAMBRIDGE").unwrap();
        assert!(url.path().ends_with("/UNITED%20KINGDOM,CAMBRIDGE.json"));
        assert_eq!(url.query(), Some("access_token=token&limit=1"));
    }

    #[test]
    fn test_parse_response() {
        let body: MapboxResponse =
            serde_json::from_str(r#"{"features":[{"center":[-0.1,51.5],"place_name":"London"}]}"#)
                .unwrap();
        assert_eq!(body.features[0].center, [-0.1, 51.5]);
    }
}
