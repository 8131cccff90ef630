//! Appending GPS Pipeline QC results to the database QC table.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::derive::first_rows;
use crate::error::{GpsError, Result};
use crate::input::{read_table, write_table, Cell, Table};
use crate::schema::columns::QC_V2;

/// Pipeline result columns and the QC table columns they become.
pub const RESULT_COLUMN_RENAMES: &[(&str, &str)] = &[
    ("S.Pneumo_%", "Streptococcus_pneumoniae"),
    ("Assembly_Length", "Total_length"),
    ("Contigs#", "No_of_contigs"),
    ("Ref_Cov_%", "Genome_covered"),
    ("Seq_Depth", "Depth_of_coverage"),
    ("Overall_QC", "QC"),
    ("Het-SNP#", "Hetsites_50bp"),
];

/// Info columns that default to the placeholder when missing or empty.
pub const OPTIONAL_INFO_COLUMNS: &[&str] = &["Supplier_name", "Sanger_sample_id", "ERR", "ERS"];

/// Column of the pipeline results naming the lane.
const SAMPLE_ID: &str = "Sample_ID";

/// File name of the QC table inside a data directory.
pub const QC_TABLE_FILE: &str = "table2.csv";

/// Outcome of an integration run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrationSummary {
    pub table2: PathBuf,
    pub appended: usize,
}

fn require_columns(table: &Table, columns: &[&str]) -> Result<()> {
    let missing: Vec<&str> = columns
        .iter()
        .copied()
        .filter(|c| !table.has_column(c))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(GpsError::Integration(format!(
            "{} is missing column(s): {}",
            table.name,
            missing.join(", ")
        )))
    }
}

/// Info cell for an optional column: placeholder when missing or empty.
fn optional_info(info: &Table, row: usize, column: &str) -> Cell {
    match info.get(row, column) {
        Some(Cell::Known(v)) if !v.is_empty() => Cell::known(v.as_str()),
        _ => Cell::Absent,
    }
}

/// Build the QC rows for every pipeline result, in QC table column order.
fn qc_rows(results: &Table, info: &Table, assembler: &str) -> Result<Vec<Vec<(&'static str, Cell)>>> {
    let info_rows = first_rows(info, "Lane_id");

    let unknown: BTreeSet<&str> = results
        .column(SAMPLE_ID)
        .into_iter()
        .map(Cell::as_raw)
        .filter(|lane| !info_rows.contains_key(lane))
        .collect();
    if !unknown.is_empty() {
        return Err(GpsError::Integration(format!(
            "Information of the following Lane ID(s) are not provided: {}",
            unknown.into_iter().collect::<Vec<_>>().join(", ")
        )));
    }

    let mut rows = Vec::with_capacity(results.row_count());
    for row in 0..results.row_count() {
        let lane = results.get(row, SAMPLE_ID).cloned().unwrap_or(Cell::Absent);
        let info_row = info_rows[lane.as_raw()];

        let mut record: Vec<(&'static str, Cell)> = Vec::with_capacity(QC_V2.len());
        for &column in QC_V2 {
            let value = match column {
                "Lane_id" => lane.clone(),
                "Public_name" => info.get(info_row, "Public_name").cloned().unwrap_or(Cell::Absent),
                "Assembler" => Cell::known(assembler),
                "Proportion_of_Het_SNPs" => Cell::Absent,
                "Supplier_name" => optional_info(info, info_row, column),
                _ => RESULT_COLUMN_RENAMES
                    .iter()
                    .find(|(_, renamed)| *renamed == column)
                    .and_then(|(original, _)| results.get(row, original))
                    .cloned()
                    .unwrap_or(Cell::Absent),
            };
            record.push((column, value));
        }
        rows.push(record);
    }
    Ok(rows)
}

/// Append GPS Pipeline results to `table2.csv` in `data_dir`.
///
/// Every result's `Sample_ID` needs a matching `Lane_id` in the info table,
/// and none of them may already be present in the QC table. Nothing is
/// written unless both hold.
pub fn integrate_pipeline_results(
    results: impl AsRef<Path>,
    info: impl AsRef<Path>,
    data_dir: impl AsRef<Path>,
    assembler: &str,
) -> Result<IntegrationSummary> {
    let results = read_table(results)?;
    let info = read_table(info)?;

    let renamed: Vec<&str> = RESULT_COLUMN_RENAMES.iter().map(|(original, _)| *original).collect();
    require_columns(&results, &[SAMPLE_ID])?;
    require_columns(&results, &renamed)?;
    require_columns(&info, &["Lane_id", "Public_name"])?;
    for column in OPTIONAL_INFO_COLUMNS {
        if !info.has_column(column) {
            debug!(column, "Optional info column not provided");
        }
    }

    let data_dir = data_dir.as_ref();
    if !data_dir.is_dir() {
        return Err(GpsError::Integration(format!(
            "{} is not a valid directory path",
            data_dir.display()
        )));
    }
    let table2_path = data_dir.join(QC_TABLE_FILE);
    let mut table2 = read_table(&table2_path)?;

    let new_rows = qc_rows(&results, &info, assembler)?;

    let existing: BTreeSet<&str> = table2.column("Lane_id").into_iter().map(Cell::as_raw).collect();
    let clashes: Vec<&str> = new_rows
        .iter()
        .filter_map(|record| record.first().map(|(_, lane)| lane.as_raw()))
        .filter(|lane| existing.contains(lane))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    if !clashes.is_empty() {
        return Err(GpsError::Integration(format!(
            "The following Lane_ID(s) already exist in {}: {}",
            table2_path.display(),
            clashes.join(", ")
        )));
    }

    let appended = new_rows.len();
    for record in new_rows {
        table2.push_record(record);
    }
    write_table(&table2)?;

    info!(
        table = %table2_path.display(),
        appended,
        assembler,
        "Integrated pipeline results"
    );
    Ok(IntegrationSummary {
        table2: table2_path,
        appended,
    })
}
