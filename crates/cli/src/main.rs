//! Terraclass CLI - supervised land-cover classification

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use terraclass_archive::DirectoryStore;
use terraclass_core::io::read_geotiff;
use terraclass_pipeline::{render_report, run, RunConfig};

mod demo;

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "terraclass")]
#[command(author, version, about = "Supervised land-cover classification", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a classification against a scene archive
    Run {
        /// Run configuration file (JSON)
        #[arg(short, long)]
        config: PathBuf,
        /// Scene archive directory holding index.json
        #[arg(short, long)]
        archive: PathBuf,
    },
    /// Generate a synthetic archive and run the pipeline end to end
    Demo {
        /// Directory for the generated archive, config and output
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Show information about a classified raster
    Info {
        /// Input raster file
        input: PathBuf,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn run_pipeline(config: &RunConfig, archive: &PathBuf) -> Result<()> {
    let pb = spinner("Opening scene archive...");
    let store = DirectoryStore::open(archive).context("Failed to open scene archive")?;
    pb.finish_and_clear();

    let start = Instant::now();
    let pb = spinner("Running classification...");
    let report = run(config, &store).context("Classification run failed")?;
    pb.finish_and_clear();

    println!("{}", render_report(&report, config));
    println!("Processing time: {:.2?}", start.elapsed());
    Ok(())
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Run { config, archive } => {
            let config =
                RunConfig::from_file(&config).context("Failed to load run configuration")?;
            run_pipeline(&config, &archive)?;
        }

        Commands::Demo { output } => {
            let pb = spinner("Generating synthetic archive...");
            let (config, archive) =
                demo::generate(&output).context("Failed to generate demo archive")?;
            pb.finish_and_clear();
            println!("Demo archive written to {}", output.display());
            run_pipeline(&config, &archive)?;
        }

        Commands::Info { input } => {
            let pb = spinner("Reading raster...");
            let raster: terraclass_core::Raster<u8> =
                read_geotiff(&input).context("Failed to read raster")?;
            pb.finish_and_clear();

            let (rows, cols) = raster.shape();
            let bounds = raster.bounds();
            let stats = raster.statistics();

            println!("File: {}", input.display());
            println!("Dimensions: {} x {} ({} cells)", cols, rows, raster.len());
            println!("Cell size: {}", raster.cell_size());
            println!(
                "Bounds: ({:.6}, {:.6}) - ({:.6}, {:.6})",
                bounds.0, bounds.1, bounds.2, bounds.3
            );
            if let Some(min) = stats.min {
                println!("Min class: {}", min);
            }
            if let Some(max) = stats.max {
                println!("Max class: {}", max);
            }
            println!(
                "Valid cells: {} ({:.1}%)",
                stats.valid_count,
                100.0 * stats.valid_count as f64 / raster.len() as f64
            );
        }
    }

    Ok(())
}
