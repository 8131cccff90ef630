//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use gpsdb::SchemaVersion;
use std::path::PathBuf;

use crate::logging::LogFormat;

/// gpsdb: validate and process GPS database updates
#[derive(Parser)]
#[command(name = "gpsdb")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log output format (pretty, compact, json)
    #[arg(long, global = true, default_value = "pretty")]
    pub log_format: LogFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate table1-3, then generate table4, the Monocle tables and data.json
    Process {
        /// Metadata table
        #[arg(short, long, default_value = "table1.csv")]
        metadata: PathBuf,

        /// QC table
        #[arg(short, long, default_value = "table2.csv")]
        qc: PathBuf,

        /// Analysis table
        #[arg(short, long, default_value = "table3.csv")]
        analysis: PathBuf,

        /// Output path of table4
        #[arg(short, long, default_value = "table4.csv")]
        output: PathBuf,

        /// Output path of the Monocle metadata table
        #[arg(long, default_value = "table1_monocle.csv")]
        metadata_monocle: PathBuf,

        /// Output path of the Monocle genomic table
        #[arg(long, default_value = "table3_monocle.csv")]
        analysis_monocle: PathBuf,

        /// Output path of the dashboard statistics
        #[arg(long, default_value = "data.json")]
        data_json: PathBuf,

        /// Directory holding the reference data files
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Database schema version (1 or 2)
        #[arg(long, default_value = "2")]
        schema: SchemaVersion,

        /// Only validate; write neither repairs nor outputs
        #[arg(long)]
        validate_only: bool,

        /// Geocode locations missing from the coordinates reference
        #[arg(long)]
        geocode: bool,

        /// Mapbox API key (default: MAPBOX_API_KEY)
        #[arg(long, requires = "geocode")]
        mapbox_key: Option<String>,
    },

    /// Append GPS Pipeline results to table2.csv of a data directory
    Integrate {
        /// results.csv produced by the GPS Pipeline
        #[arg(short, long, default_value = "results.csv")]
        results: PathBuf,

        /// Lane information (Lane_id, Public_name and optional Supplier_name,
        /// Sanger_sample_id, ERR, ERS)
        #[arg(short, long, default_value = "info.csv")]
        info: PathBuf,

        /// Directory holding table2.csv
        #[arg(short, long, default_value = ".")]
        data: PathBuf,

        /// De novo assembler used in the run
        #[arg(short, long, default_value = "SHOVILL")]
        assembler: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_defaults() {
        let cli = Cli::try_parse_from(["gpsdb", "process"]).unwrap();
        assert_eq!(cli.verbose, 0);
        match cli.command {
            Commands::Process {
                metadata, schema, validate_only, ..
            } => {
                assert_eq!(metadata, PathBuf::from("table1.csv"));
                assert_eq!(schema, SchemaVersion::V2);
                assert!(!validate_only);
            }
            _ => panic!("expected process"),
        }
    }

    #[test]
    fn test_verbosity_and_schema() {
        let cli = Cli::try_parse_from(["gpsdb", "-vv", "process", "--schema", "1", "--log-format", "json"])
            .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(matches!(cli.command, Commands::Process { schema: SchemaVersion::V1, .. }));
    }

    #[test]
    fn test_mapbox_key_requires_geocode() {
        assert!(Cli::try_parse_from(["gpsdb", "process", "--mapbox-key", "k"]).is_err());
    }

    #[test]
    fn test_integrate_arguments() {
        let cli = Cli::try_parse_from(["gpsdb", "integrate", "-r", "r.csv", "-i", "i.csv", "-d", "db", "-a", "UNICYCLER"])
            .unwrap();
        match cli.command {
            Commands::Integrate { results, assembler, .. } => {
                assert_eq!(results, PathBuf::from("r.csv"));
                assert_eq!(assembler, "UNICYCLER");
            }
            _ => panic!("expected integrate"),
        }
    }
}
