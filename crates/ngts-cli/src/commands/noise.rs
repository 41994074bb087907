use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use ngts_core::consts::TARGET_PRECISION;
use ngts_core::photometry::NoiseModel;
use ngts_core::search::cross_point_from_samples;
use ngts_core::sweep::noise_vs_magnitude;

use super::{write_toml, SetupArgs};
use crate::summary::{print_breakdown, print_setup_summary};

#[derive(Args)]
pub struct NoiseArgs {
    #[command(flatten)]
    pub setup: SetupArgs,

    /// Magnitude of a single star; sweeps the magnitude grid when omitted
    #[arg(short, long)]
    pub magnitude: Option<f64>,

    /// Target fractional precision for the cross-point
    #[arg(long, default_value_t = TARGET_PRECISION)]
    pub target: f64,

    /// Rows of the sweep table to print
    #[arg(long, default_value = "12")]
    pub rows: usize,

    /// Write the sweep as TOML
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &NoiseArgs) -> Result<()> {
    let run_config = args.setup.load()?;
    let (detector, config) = run_config.resolve()?;
    print_setup_summary(&run_config.detector, &detector, &config, &run_config.grids);

    if let Some(magnitude) = args.magnitude {
        let breakdown = NoiseModel::new(&detector, &config)?.breakdown(magnitude)?;
        print_breakdown(magnitude, &breakdown);
        return Ok(());
    }

    let grid = run_config.grids.magnitude.build()?;
    let curve = noise_vs_magnitude(&detector, &config, &grid)?;

    println!(
        "{:>8}  {:>11}  {:>11}  {:>11}  {:>11}  {:>11}",
        "Mag", "Source", "Sky", "Read", "Scint", "Total"
    );
    println!("{}", "-".repeat(74));
    let stride = (curve.len() / args.rows.max(1)).max(1);
    for i in (0..curve.len()).step_by(stride) {
        println!(
            "{:>8.3}  {:>11.4e}  {:>11.4e}  {:>11.4e}  {:>11.4e}  {:>11.4e}",
            curve.x[i],
            curve.source[i],
            curve.sky[i],
            curve.read[i],
            curve.scintillation[i],
            curve.total[i]
        );
    }

    let cross = cross_point_from_samples(
        &curve.x,
        &curve.total,
        args.target,
        run_config.grids.policy,
    )?;
    println!(
        "\nCross-point ({:.1} mmag): {:.3} mag ({}, grid resolution {:.4} mag)",
        args.target * 1e3,
        cross.magnitude,
        if cross.interpolated { "interpolated" } else { "nearest sample" },
        cross.resolution
    );

    if let Some(ref path) = args.output {
        write_toml(&curve, Some(path), "noise curve")?;
    }
    Ok(())
}
