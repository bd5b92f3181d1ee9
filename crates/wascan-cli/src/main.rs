use std::{
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wascan_cli::{CliResult, load_config, read_files};
use wascan_core::{ErrorCode, ScanConfig, Symbology};

#[derive(Parser)]
#[command(name = "wascan", version, about = "Decode barcodes from image files")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode each file and print one JSON line per file
    Read {
        /// Image files, read in order
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// JSON scan config; missing keys keep their defaults
        #[arg(long)]
        config: Option<PathBuf>,
        /// Symbology to look for (repeatable), overrides the config
        #[arg(long = "symbology", value_name = "NAME")]
        symbologies: Vec<Symbology>,
        /// Smallest image side to decode, overrides the config
        #[arg(long)]
        min_dimension: Option<u32>,
    },
    /// Print the error code catalog as JSON
    Codes,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(error) => {
            tracing::error!(%error, "wascan failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Codes => {
            let catalog = serde_json::to_string_pretty(&ErrorCode::catalog())?;
            writeln!(io::stdout(), "{catalog}")?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Read {
            files,
            config,
            symbologies,
            min_dimension,
        } => {
            let mut scan_config = match config {
                Some(path) => load_config(&path)?,
                None => ScanConfig::default(),
            };
            scan_config = scan_config.set_symbologies(symbologies);
            if let Some(dimension) = min_dimension {
                scan_config = scan_config.set_min_image_dimension(dimension);
            }

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            let local = tokio::task::LocalSet::new();
            let reports = local.block_on(&runtime, read_files(scan_config, files))?;

            let mut stdout = io::stdout().lock();
            let mut all_detected = true;
            for report in &reports {
                all_detected &= report.result.success;
                serde_json::to_writer(&mut stdout, report)?;
                writeln!(stdout)?;
            }
            Ok(if all_detected {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2)
            })
        }
    }
}
