//! Derived per-specimen fields of table4.
//!
//! Every function here is pure: it takes cells and reference data and
//! returns the derived value, with the placeholder wherever the inputs do
//! not determine one.

use crate::input::{Cell, PLACEHOLDER};
use crate::reference::ReferenceData;
use crate::schema::SerotypeNormalization;

/// Region with a vaccination programme of its own.
const SEPARATE_PROGRAMME_REGION: &str = "HONG KONG";

/// Period label before any vaccine was introduced.
pub const PRE_PCV: &str = "PREPCV";

/// The `Country,Region,City` key of the coordinates reference.
pub fn location_key(country: &Cell, region: &Cell, city: &Cell) -> String {
    format!("{},{},{}", country.as_raw(), region.as_raw(), city.as_raw())
}

/// The geocoding query: known location parts joined by `,`.
pub fn location_query(country: &Cell, region: &Cell, city: &Cell) -> String {
    [country, region, city]
        .into_iter()
        .filter_map(Cell::value)
        .collect::<Vec<_>>()
        .join(",")
}

/// Geographic resolution: `0` country, `1` region, `2` city, placeholder if
/// none is known. Each more specific known part overrides the previous level.
pub fn resolution(country: &Cell, region: &Cell, city: &Cell) -> &'static str {
    let mut level = PLACEHOLDER;
    if !country.is_absent() {
        level = "0";
    }
    if !region.is_absent() {
        level = "1";
    }
    if !city.is_absent() {
        level = "2";
    }
    level
}

/// Vaccine period of a specimen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaccinePeriod {
    /// `PREPCV` or `POST<vaccine>-<N>YR`.
    pub period: String,
    pub introduction_year: String,
    pub vaccine: String,
}

impl VaccinePeriod {
    /// All three fields unknown.
    pub fn unknown() -> Self {
        Self {
            period: PLACEHOLDER.to_string(),
            introduction_year: PLACEHOLDER.to_string(),
            vaccine: PLACEHOLDER.to_string(),
        }
    }
}

/// Place a collection year within the country's vaccine timeline.
///
/// The current period is set by the last introduction strictly before the
/// collection year; a specimen collected in an introduction year still
/// belongs to the preceding period. Before the first introduction the
/// period is `PREPCV`, reported against the country's first vaccine.
pub fn vaccine_period(
    reference: &ReferenceData,
    country: &Cell,
    region: &Cell,
    year: &Cell,
) -> VaccinePeriod {
    let Some(year) = year.value().and_then(|y| y.parse::<i32>().ok()) else {
        return VaccinePeriod::unknown();
    };
    let programme = match region.value() {
        Some(SEPARATE_PROGRAMME_REGION) => SEPARATE_PROGRAMME_REGION,
        _ => match country.value() {
            Some(country) => country,
            None => return VaccinePeriod::unknown(),
        },
    };

    let Some(timeline) = reference.timeline(programme).filter(|t| !t.is_empty()) else {
        return VaccinePeriod {
            period: PRE_PCV.to_string(),
            ..VaccinePeriod::unknown()
        };
    };

    let first = &timeline[0];
    let mut period = VaccinePeriod {
        period: PRE_PCV.to_string(),
        introduction_year: first.year.to_string(),
        vaccine: first.vaccine.clone(),
    };
    for introduction in timeline.iter().take_while(|i| i.year < year) {
        let elapsed = year.saturating_sub(introduction.year);
        period = VaccinePeriod {
            period: format!("POST{}-{}YR", introduction.vaccine, elapsed),
            introduction_year: introduction.year.to_string(),
            vaccine: introduction.vaccine.clone(),
        };
    }
    period
}

/// Whether a specimen came from a child under five: `Y`, `N` or placeholder.
pub fn under_five(
    reference: &ReferenceData,
    years: &Cell,
    months: &Cell,
    days: &Cell,
) -> String {
    let Some(years) = years.value() else {
        return if months.is_absent() && days.is_absent() {
            PLACEHOLDER.to_string()
        } else {
            "Y".to_string()
        };
    };
    if let Some(flag) = reference.non_standard_age(years) {
        return flag.to_string();
    }
    match years.parse::<f64>() {
        Ok(age) if age < 5.0 => "Y".to_string(),
        Ok(_) => "N".to_string(),
        Err(_) => PLACEHOLDER.to_string(),
    }
}

/// Manifestation label of a (clinical manifestation, source) pair.
pub fn manifestation(reference: &ReferenceData, clinical: &Cell, source: &Cell) -> String {
    reference
        .manifestation(clinical.as_raw(), source.as_raw())
        .unwrap_or(PLACEHOLDER)
        .to_string()
}

/// `Y`/`N` coverage of a serotype by each vaccine, in valency order.
pub fn coverage_flags(
    reference: &ReferenceData,
    serotype: &str,
    normalization: SerotypeNormalization,
) -> Vec<&'static str> {
    let serotype = normalization.apply(serotype);
    reference
        .vaccines()
        .map(|vaccine| if reference.covers(vaccine, &serotype) { "Y" } else { "N" })
        .collect()
}

/// Whether a Public_name (or its suffix-less original) has been published.
pub fn published(reference: &ReferenceData, public_name: &str) -> &'static str {
    if reference.is_published(public_name) { "Y" } else { "N" }
}
