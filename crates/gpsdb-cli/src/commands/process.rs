//! Process command - validate the database and generate derived outputs.

use std::path::PathBuf;

use colored::Colorize;
use gpsdb::{Processor, ProcessorConfig, RunSummary, SchemaVersion};

use super::require_csv;

/// Paths and switches of a `process` run.
pub struct ProcessArgs {
    pub metadata: PathBuf,
    pub qc: PathBuf,
    pub analysis: PathBuf,
    pub output: PathBuf,
    pub metadata_monocle: PathBuf,
    pub analysis_monocle: PathBuf,
    pub data_json: PathBuf,
    pub data_dir: PathBuf,
    pub schema: SchemaVersion,
    pub validate_only: bool,
    pub geocode: bool,
    pub mapbox_key: Option<String>,
}

pub fn run(args: ProcessArgs) -> Result<(), Box<dyn std::error::Error>> {
    require_csv(
        [
            &args.metadata,
            &args.qc,
            &args.analysis,
            &args.output,
            &args.metadata_monocle,
            &args.analysis_monocle,
        ]
        .map(PathBuf::as_path),
    )?;

    println!(
        "{} {}, {}, {} (schema v{})",
        "Processing".cyan().bold(),
        args.metadata.display().to_string().white(),
        args.qc.display().to_string().white(),
        args.analysis.display().to_string().white(),
        args.schema
    );

    let validate_only = args.validate_only;
    let processor = Processor::with_config(ProcessorConfig {
        version: args.schema,
        metadata: args.metadata,
        qc: args.qc,
        analysis: args.analysis,
        table4: args.output,
        metadata_monocle: args.metadata_monocle,
        analysis_monocle: args.analysis_monocle,
        data_json: args.data_json,
        data_dir: args.data_dir,
        validate_only,
        geocode: args.geocode,
        mapbox_key: args.mapbox_key,
        ..Default::default()
    });

    let summary = processor.run()?;
    print_summary(&summary, validate_only);
    Ok(())
}

fn print_summary(summary: &RunSummary, validate_only: bool) {
    println!();
    println!("{}", "Findings:".yellow().bold());
    println!("  Errors:   {}", summary.findings.error.to_string().red());
    println!("  Warnings: {}", summary.findings.warning.to_string().yellow());
    println!("  Repairs:  {}", summary.findings.info.to_string().blue());

    if !summary.repaired.is_empty() {
        println!();
        println!("{}", "Repaired tables:".yellow().bold());
        for path in &summary.repaired {
            println!("  {}", path.display());
        }
    }

    println!();
    if validate_only {
        println!("{}", "Validation passed.".green().bold());
        return;
    }

    println!("{}", "Generated:".yellow().bold());
    for path in &summary.outputs {
        println!("  {}", path.display().to_string().white());
    }
    println!(
        "  table4 rows: {}, Monocle rows: {} / {}",
        summary.table4_rows, summary.metadata_monocle_rows, summary.analysis_monocle_rows
    );
    if summary.geocoded > 0 {
        println!(
            "  {} new location(s) geocoded and added to the coordinates reference",
            summary.geocoded.to_string().magenta()
        );
    }
    println!();
    println!(
        "{}",
        "Database is validated and all files are generated.".green().bold()
    );
}
