//! Integrate command - append GPS Pipeline results to table2.

use std::path::PathBuf;

use colored::Colorize;
use gpsdb::integrate_pipeline_results;

use super::require_csv;

pub fn run(
    results: PathBuf,
    info: PathBuf,
    data: PathBuf,
    assembler: String,
) -> Result<(), Box<dyn std::error::Error>> {
    require_csv([results.as_path(), info.as_path()])?;

    println!(
        "{} {} into {}",
        "Integrating".cyan().bold(),
        results.display().to_string().white(),
        data.display().to_string().white()
    );

    let summary = integrate_pipeline_results(&results, &info, &data, &assembler)?;

    println!(
        "{} {} lane(s) appended to {}",
        "Done:".green().bold(),
        summary.appended.to_string().white().bold(),
        summary.table2.display()
    );
    Ok(())
}
