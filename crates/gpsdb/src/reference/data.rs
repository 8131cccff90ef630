//! In-memory reference lookup tables.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static REPEAT_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"_R[1-9]$").unwrap());

/// A latitude/longitude pair as stored in the coordinates file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: String,
    pub longitude: String,
}

impl Coordinate {
    /// Create a coordinate from its textual parts.
    pub fn new(latitude: impl Into<String>, longitude: impl Into<String>) -> Self {
        Self {
            latitude: latitude.into(),
            longitude: longitude.into(),
        }
    }

    /// Create a coordinate from a geocoding result.
    pub fn from_degrees(latitude: f64, longitude: f64) -> Self {
        Self::new(latitude.to_string(), longitude.to_string())
    }
}

/// One vaccine introduction in a country's programme.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VaccineIntroduction {
    pub year: i32,
    pub vaccine: String,
}

/// Immutable lookup tables used by validation and derivation.
///
/// Only the coordinates table changes during a run, and only through
/// `append_coordinate`, which also writes the new entry to disk.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub(super) coordinates_path: Option<PathBuf>,
    pub(super) coordinates: IndexMap<String, Coordinate>,
    pub(super) non_standard_ages: IndexMap<String, String>,
    pub(super) manifestations: IndexMap<(String, String), String>,
    pub(super) published: HashSet<String>,
    pub(super) timelines: IndexMap<String, Vec<VaccineIntroduction>>,
    pub(super) valency: IndexMap<String, HashSet<String>>,
    pub(super) country_alpha2: HashMap<String, String>,
    pub(super) alpha2_country: HashMap<String, String>,
    pub(super) country_continent: HashMap<String, String>,
}

impl ReferenceData {
    /// Create empty reference data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a coordinate keyed by `"Country,Region,City"`.
    pub fn with_coordinate(mut self, key: impl Into<String>, coordinate: Coordinate) -> Self {
        self.coordinates.insert(key.into(), coordinate);
        self
    }

    /// Add a non-standard age descriptor and whether it means under five (`Y`/`N`).
    pub fn with_non_standard_age(
        mut self,
        descriptor: impl Into<String>,
        under_5: impl Into<String>,
    ) -> Self {
        self.non_standard_ages.insert(descriptor.into(), under_5.into());
        self
    }

    /// Add a manifestation mapping.
    pub fn with_manifestation(
        mut self,
        clinical_manifestation: impl Into<String>,
        source: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        self.manifestations
            .insert((clinical_manifestation.into(), source.into()), label.into());
        self
    }

    /// Add a published name, expanding suffix-less names to their repeats.
    pub fn with_published(mut self, name: &str) -> Self {
        self.insert_published(name);
        self
    }

    /// Add a vaccine introduction for a country; timelines stay sorted by year.
    pub fn with_introduction(
        mut self,
        country: impl Into<String>,
        vaccine: impl Into<String>,
        year: i32,
    ) -> Self {
        let timeline = self.timelines.entry(country.into()).or_default();
        timeline.push(VaccineIntroduction {
            year,
            vaccine: vaccine.into(),
        });
        timeline.sort();
        self
    }

    /// Add the serotypes covered by a vaccine.
    pub fn with_valency<'a>(
        mut self,
        vaccine: impl Into<String>,
        serotypes: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        self.valency.insert(
            vaccine.into(),
            serotypes.into_iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    /// Add an ISO 3166-1 alpha-2 mapping.
    pub fn with_country(
        mut self,
        alpha2: &str,
        country: &str,
        continent: impl Into<String>,
    ) -> Self {
        self.insert_country(alpha2, country, continent.into());
        self
    }

    pub(super) fn insert_published(&mut self, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        if !REPEAT_SUFFIX.is_match(name) {
            for n in 1..=9 {
                self.published.insert(format!("{}_R{}", name, n));
            }
        }
        self.published.insert(name.to_string());
    }

    pub(super) fn insert_country(&mut self, alpha2: &str, country: &str, continent: String) {
        let alpha2 = alpha2.to_uppercase();
        self.country_alpha2
            .insert(country.to_uppercase(), alpha2.clone());
        self.alpha2_country.insert(alpha2, country.to_string());
        self.country_continent.insert(country.to_uppercase(), continent);
    }

    /// Coordinate for a `"Country,Region,City"` key.
    pub fn coordinate(&self, key: &str) -> Option<&Coordinate> {
        self.coordinates.get(key)
    }

    /// Number of known coordinates.
    pub fn coordinate_count(&self) -> usize {
        self.coordinates.len()
    }

    /// Whether an age descriptor is listed as non-standard.
    pub fn is_non_standard_age(&self, descriptor: &str) -> bool {
        self.non_standard_ages.contains_key(descriptor)
    }

    /// The under-five classification of a non-standard age descriptor.
    pub fn non_standard_age(&self, descriptor: &str) -> Option<&str> {
        self.non_standard_ages.get(descriptor).map(String::as_str)
    }

    /// Manifestation label for a (clinical manifestation, source) pair.
    pub fn manifestation(&self, clinical_manifestation: &str, source: &str) -> Option<&str> {
        self.manifestations
            .get(&(clinical_manifestation.to_string(), source.to_string()))
            .map(String::as_str)
    }

    /// Whether a Public_name has been published.
    pub fn is_published(&self, public_name: &str) -> bool {
        self.published.contains(public_name)
    }

    /// The vaccine introduction timeline of a country, ascending by year.
    pub fn timeline(&self, country: &str) -> Option<&[VaccineIntroduction]> {
        self.timelines.get(country).map(Vec::as_slice)
    }

    /// Whether a country has vaccine introduction information.
    pub fn has_timeline(&self, country: &str) -> bool {
        self.timelines.contains_key(country)
    }

    /// Vaccine names in valency-file order.
    pub fn vaccines(&self) -> impl Iterator<Item = &str> {
        self.valency.keys().map(String::as_str)
    }

    /// Whether a vaccine covers a serotype.
    pub fn covers(&self, vaccine: &str, serotype: &str) -> bool {
        self.valency
            .get(vaccine)
            .is_some_and(|serotypes| serotypes.contains(serotype))
    }

    /// ISO alpha-2 code of an (upper-cased) country name.
    pub fn alpha2(&self, country: &str) -> Option<&str> {
        self.country_alpha2.get(country).map(String::as_str)
    }

    /// Canonical country spelling for an alpha-2 code.
    pub fn country_name(&self, alpha2: &str) -> Option<&str> {
        self.alpha2_country.get(alpha2).map(String::as_str)
    }

    /// Continent of an (upper-cased) country name.
    pub fn continent(&self, country: &str) -> Option<&str> {
        self.country_continent.get(country).map(String::as_str)
    }
}
