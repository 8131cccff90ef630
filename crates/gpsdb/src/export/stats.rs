//! Dashboard statistics (`data.json`) from the Monocle metadata table.

use std::cmp::Ordering;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{GpsError, Result};
use crate::input::{Cell, Table, PLACEHOLDER};
use crate::reference::ReferenceData;

/// Value counts keyed by category, in presentation order.
pub type Counts = IndexMap<String, usize>;

/// Global counts over all specimens.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub country: Counts,
    pub vaccine_period: Counts,
    pub manifestation: Counts,
    pub year_of_collection: Counts,
    pub age: Counts,
}

/// Counts over the specimens of one country.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CountryBreakdown {
    pub age: Counts,
    pub manifestation: Counts,
    pub vaccine_period: Counts,
    pub year_of_collection: Counts,
}

/// The `data.json` payload of the database overview dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    pub summary: Summary,
    /// Per-country breakdowns keyed by ISO alpha-2 code.
    pub country: IndexMap<String, CountryBreakdown>,
}

/// The fields of one specimen that the dashboard groups by.
struct Specimen {
    country: String,
    vaccine_period: String,
    manifestation: String,
    year: String,
    age: String,
}

/// Age in whole years for grouping.
///
/// Unknown when no age is given or the age is a descriptor; `0` under one
/// year (including ages given only in months or days).
pub fn simplified_age(reference: &ReferenceData, years: &Cell, months: &Cell, days: &Cell) -> String {
    let all_absent = years.is_absent() && months.is_absent() && days.is_absent();
    let Some(years) = years.value() else {
        return if all_absent { PLACEHOLDER } else { "0" }.to_string();
    };
    if reference.is_non_standard_age(years) {
        return PLACEHOLDER.to_string();
    }
    match years.parse::<f64>() {
        Ok(age) if age < 1.0 => "0".to_string(),
        Ok(age) => (age.trunc() as i64).to_string(),
        Err(_) => PLACEHOLDER.to_string(),
    }
}

/// Period label without its years-since-introduction suffix.
fn period_group(period: &str) -> String {
    period.split('-').next().unwrap_or(period).to_string()
}

fn count<'a>(values: impl Iterator<Item = &'a str>) -> Counts {
    let mut counts = Counts::new();
    for value in values {
        *counts.entry(value.to_string()).or_default() += 1;
    }
    counts
}

/// Most frequent first; ties keep first-appearance order.
fn by_count(mut counts: Counts) -> Counts {
    counts.sort_by(|_, a, _, b| b.cmp(a));
    counts
}

fn numeric_key(value: &str) -> (u8, i64, &str) {
    if value == PLACEHOLDER {
        return (0, 0, value);
    }
    match value.parse::<i64>() {
        Ok(n) => (1, n, ""),
        Err(_) => (2, 0, value),
    }
}

/// Placeholder first, then ascending numerically.
fn by_number(mut counts: Counts) -> Counts {
    counts.sort_by(|a, _, b, _| numeric_key(a).cmp(&numeric_key(b)).then(Ordering::Equal));
    counts
}

fn breakdown<'a>(specimens: impl Iterator<Item = &'a Specimen> + Clone) -> CountryBreakdown {
    CountryBreakdown {
        age: by_number(count(specimens.clone().map(|s| s.age.as_str()))),
        manifestation: by_count(count(specimens.clone().map(|s| s.manifestation.as_str()))),
        vaccine_period: by_count(count(specimens.clone().map(|s| s.vaccine_period.as_str()))),
        year_of_collection: by_number(count(specimens.map(|s| s.year.as_str()))),
    }
}

/// Aggregate the Monocle metadata table into dashboard statistics.
pub fn dashboard_data(reference: &ReferenceData, monocle: &Table) -> DashboardData {
    let raw = |row: usize, column: &str| -> String {
        monocle
            .get(row, column)
            .map(|c| c.as_raw().to_string())
            .unwrap_or_else(|| PLACEHOLDER.to_string())
    };
    let cell = |row: usize, column: &str| monocle.get(row, column).cloned().unwrap_or(Cell::Absent);

    let specimens: Vec<Specimen> = (0..monocle.row_count())
        .map(|row| Specimen {
            country: raw(row, "Country"),
            vaccine_period: period_group(&raw(row, "Vaccine_period")),
            manifestation: raw(row, "Manifestation"),
            year: raw(row, "Year"),
            age: simplified_age(
                reference,
                &cell(row, "Age_years"),
                &cell(row, "Age_months"),
                &cell(row, "Age_days"),
            ),
        })
        .collect();

    let summary = Summary {
        country: by_count(count(specimens.iter().map(|s| s.country.as_str()))),
        vaccine_period: by_count(count(specimens.iter().map(|s| s.vaccine_period.as_str()))),
        manifestation: by_count(count(specimens.iter().map(|s| s.manifestation.as_str()))),
        year_of_collection: by_number(count(specimens.iter().map(|s| s.year.as_str()))),
        age: by_number(count(specimens.iter().map(|s| s.age.as_str()))),
    };

    let mut countries: Vec<&str> = summary
        .country
        .keys()
        .map(String::as_str)
        .filter(|c| *c != PLACEHOLDER)
        .collect();
    countries.sort_unstable();

    let mut per_country = IndexMap::new();
    for country in countries {
        let Some(alpha2) = reference.alpha2(&country.to_uppercase()) else {
            warn!(country, "No ISO 3166-1 alpha-2 code; country is left out of the per-country statistics");
            continue;
        };
        let of_country = specimens.iter().filter(|s| s.country == country);
        per_country.insert(alpha2.to_string(), breakdown(of_country));
    }

    DashboardData {
        summary,
        country: per_country,
    }
}

/// Write dashboard statistics as indented JSON.
pub fn write_dashboard_data(data: &DashboardData, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| GpsError::io(path, e))?;
    let mut writer = BufWriter::new(file);

    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
    data.serialize(&mut serializer)?;
    writer.flush().map_err(|e| GpsError::io(path, e))?;

    info!(path = %path.display(), countries = data.country.len(), "Wrote dashboard data");
    Ok(())
}
