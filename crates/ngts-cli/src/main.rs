mod commands;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ngts", about = "Photometric noise budget for wide-field transit surveys")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Noise breakdown for one magnitude, or a magnitude sweep with cross-point
    Noise(commands::noise::NoiseArgs),
    /// Noise against exposure time at several airmasses
    Exposure(commands::exposure::ExposureArgs),
    /// Saturation table and polynomial fits of the saturation limit
    Saturation(commands::saturation::SaturationArgs),
    /// High-precision magnitude range over exposure times
    Precision(commands::precision::PrecisionArgs),
    /// Central pixel fraction of a Gaussian PSF
    Psf(commands::psf::PsfArgs),
    /// Frame counts, storage and shutter use of a survey
    Survey(commands::survey::SurveyArgs),
    /// Generate a default run config file
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Noise(args) => commands::noise::run(args),
        Commands::Exposure(args) => commands::exposure::run(args),
        Commands::Saturation(args) => commands::saturation::run(args),
        Commands::Precision(args) => commands::precision::run(args),
        Commands::Psf(args) => commands::psf::run(args),
        Commands::Survey(args) => commands::survey::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
