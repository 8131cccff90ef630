//! Monocle export tables.

use std::path::PathBuf;

use tracing::info;

use crate::derive::{first_rows, unique_analysis_rows};
use crate::input::{Cell, Table};
use crate::reference::ReferenceData;

/// Columns of the Monocle metadata table and the table each comes from.
pub const METADATA_MONOCLE_COLUMNS: &[(&str, Source)] = &[
    ("Public_name", Source::Table4),
    ("Country", Source::Metadata),
    ("Region", Source::Metadata),
    ("City", Source::Metadata),
    ("Year", Source::Metadata),
    ("Age_years", Source::Metadata),
    ("Age_months", Source::Metadata),
    ("Age_days", Source::Metadata),
    ("Manifestation", Source::Table4),
    ("Vaccine_period", Source::Table4),
    ("Latitude", Source::Table4),
    ("Longitude", Source::Table4),
    ("Resolution", Source::Table4),
    ("Published", Source::Table4),
];

/// Columns of the Monocle genomic table and the table each comes from.
pub const ANALYSIS_MONOCLE_COLUMNS: &[(&str, Source)] = &[
    ("Lane_id", Source::Analysis),
    ("Public_name", Source::Analysis),
    ("GPSC", Source::Analysis),
    ("In_silico_serotype", Source::Analysis),
    ("In_silico_ST", Source::Analysis),
    ("QC", Source::Qc),
    ("Depth_of_coverage", Source::Qc),
];

/// Table a Monocle column is copied from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Metadata,
    Qc,
    Analysis,
    Table4,
}

fn headers(columns: &[(&str, Source)]) -> Vec<String> {
    columns.iter().map(|(name, _)| name.to_string()).collect()
}

fn cell(table: &Table, row: Option<usize>, column: &str) -> Cell {
    row.and_then(|row| table.get(row, column))
        .cloned()
        .unwrap_or(Cell::Absent)
}

/// Country in the spelling of the country reference, when it has one.
fn canonical_country(reference: &ReferenceData, country: Cell) -> Cell {
    let canonical = country
        .value()
        .and_then(|name| reference.alpha2(&name.to_uppercase()))
        .and_then(|alpha2| reference.country_name(alpha2));
    match canonical {
        Some(name) => Cell::known(name),
        None => country,
    }
}

/// Builds the Monocle metadata table: table4 rows of specimens with a
/// UNIQUE analysis row, joined with their location, year and age.
pub fn metadata_monocle(
    reference: &ReferenceData,
    metadata: &Table,
    analysis: &Table,
    table4: &Table,
    path: impl Into<PathBuf>,
) -> Table {
    let path = path.into();
    let mut monocle = Table::new(
        path.display().to_string(),
        path,
        headers(METADATA_MONOCLE_COLUMNS),
    );

    let analysed = unique_analysis_rows(analysis);
    let metadata_rows = first_rows(metadata, "Public_name");

    for (t4_row, name) in table4.column("Public_name").into_iter().enumerate() {
        let name = name.as_raw();
        if !analysed.contains_key(name) {
            continue;
        }
        let meta_row = metadata_rows.get(name).copied();
        let row = METADATA_MONOCLE_COLUMNS
            .iter()
            .map(|(column, source)| match (source, *column) {
                (Source::Metadata, "Country") => {
                    canonical_country(reference, cell(metadata, meta_row, column))
                }
                (Source::Metadata, _) => cell(metadata, meta_row, column),
                _ => cell(table4, Some(t4_row), column),
            })
            .collect();
        monocle.rows.push(row);
    }

    info!(rows = monocle.row_count(), "Generated {}", monocle.name);
    monocle
}

/// Builds the Monocle genomic table: UNIQUE analysis rows joined with
/// their QC outcome on Lane_id.
pub fn analysis_monocle(qc: &Table, analysis: &Table, path: impl Into<PathBuf>) -> Table {
    let path = path.into();
    let mut monocle = Table::new(
        path.display().to_string(),
        path,
        headers(ANALYSIS_MONOCLE_COLUMNS),
    );

    let qc_rows = first_rows(qc, "Lane_id");
    let Some(flag) = analysis.column_index("Duplicate") else {
        return monocle;
    };

    for (a_row, row) in analysis.rows.iter().enumerate() {
        if row[flag].as_raw() != "UNIQUE" {
            continue;
        }
        let qc_row = analysis
            .get(a_row, "Lane_id")
            .and_then(|lane| qc_rows.get(lane.as_raw()).copied());
        let out = ANALYSIS_MONOCLE_COLUMNS
            .iter()
            .map(|(column, source)| match source {
                Source::Qc => cell(qc, qc_row, column),
                _ => cell(analysis, Some(a_row), column),
            })
            .collect();
        monocle.rows.push(out);
    }

    info!(rows = monocle.row_count(), "Generated {}", monocle.name);
    monocle
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
        let mut table = Table::new("t.csv", "t.csv", headers.iter().map(|h| h.to_string()).collect());
        for row in rows {
            table.rows.push(row.iter().map(|v| Cell::parse(v)).collect());
        }
        table
    }

    #[test]
    fn test_metadata_monocle_keeps_analysed_specimens() {
        let reference = ReferenceData::new().with_country("GB", "United Kingdom", "Europe");
        let metadata = table(
            &["Public_name", "Country", "Region", "City", "Year", "Age_years", "Age_months", "Age_days"],
            &[
                &["GPS_1", "UNITED KINGDOM", "_", "_", "2015", "3", "_", "_"],
                &["GPS_2", "UNITED KINGDOM", "_", "_", "2016", "_", "_", "_"],
            ],
        );
        let analysis = table(
            &["Lane_id", "Public_name", "Duplicate"],
            &[&["L1", "GPS_1", "UNIQUE"], &["L2", "GPS_2", "DUPLICATE"]],
        );
        let table4 = table(
            &["Public_name", "Manifestation", "Vaccine_period", "Latitude", "Longitude", "Resolution", "Published"],
            &[
                &["GPS_1", "MENINGITIS", "POSTPCV13-5YR", "51.5", "-0.1", "0", "N"],
                &["GPS_2", "_", "_", "51.5", "-0.1", "0", "N"],
            ],
        );

        let monocle = metadata_monocle(&reference, &metadata, &analysis, &table4, "table1_monocle.csv");

        assert_eq!(monocle.row_count(), 1);
        assert_eq!(monocle.get(0, "Country"), Some(&Cell::known("United Kingdom")));
        assert_eq!(monocle.get(0, "Year"), Some(&Cell::known("2015")));
        assert_eq!(monocle.get(0, "Vaccine_period"), Some(&Cell::known("POSTPCV13-5YR")));
        assert_eq!(monocle.headers.len(), METADATA_MONOCLE_COLUMNS.len());
    }

    #[test]
    fn test_analysis_monocle_joins_qc() {
        let qc = table(
            &["Lane_id", "QC", "Depth_of_coverage"],
            &[&["L1", "PASS", "40.2"]],
        );
        let analysis = table(
            &["Lane_id", "Public_name", "Duplicate", "GPSC", "In_silico_serotype", "In_silico_ST"],
            &[
                &["L1", "GPS_1", "UNIQUE", "5", "14", "123"],
                &["L2", "GPS_1", "DUPLICATE", "5", "14", "123"],
                &["L3", "GPS_3", "UNIQUE", "7", "3", "180"],
            ],
        );

        let monocle = analysis_monocle(&qc, &analysis, "table3_monocle.csv");

        assert_eq!(monocle.row_count(), 2);
        assert_eq!(monocle.get(0, "QC"), Some(&Cell::known("PASS")));
        assert_eq!(monocle.get(0, "Depth_of_coverage"), Some(&Cell::known("40.2")));
        assert_eq!(monocle.get(1, "QC"), Some(&Cell::Absent));
    }
}
