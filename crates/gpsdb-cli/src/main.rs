//! gpsdb CLI - validate and process GPS database updates.

mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use commands::process::ProcessArgs;
use logging::{init_logging, LogConfig};

fn main() {
    let cli = Cli::parse();

    init_logging(&LogConfig::from_verbosity(cli.verbose).with_format(cli.log_format));

    let result = match cli.command {
        Commands::Process {
            metadata,
            qc,
            analysis,
            output,
            metadata_monocle,
            analysis_monocle,
            data_json,
            data_dir,
            schema,
            validate_only,
            geocode,
            mapbox_key,
        } => commands::process::run(ProcessArgs {
            metadata,
            qc,
            analysis,
            output,
            metadata_monocle,
            analysis_monocle,
            data_json,
            data_dir,
            schema,
            validate_only,
            geocode,
            mapbox_key,
        }),

        Commands::Integrate {
            results,
            info,
            data,
            assembler,
        } => commands::integrate::run(results, info, data, assembler),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
