use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use ndarray::Array1;
use ngts_core::config::RunConfig;
use ngts_core::detector::DetectorProfile;
use ngts_core::fit::{
    fit_saturation, saturation_table_with_progress, SaturationLimits, SaturationTable,
};
use ngts_core::grid::stepped;
use ngts_core::observation::{ObservationConfig, SkyType};
use serde::{Deserialize, Serialize};

use super::{progress_bar, write_toml, SetupArgs};
use crate::summary::print_setup_summary;

#[derive(Args)]
pub struct SaturationArgs {
    #[command(flatten)]
    pub setup: SetupArgs,

    /// Brightest magnitude of the table
    #[arg(long, default_value = "8.25")]
    pub mag_start: f64,

    /// Faintest magnitude of the table (inclusive)
    #[arg(long, default_value = "12.75")]
    pub mag_end: f64,

    /// Magnitude step of the table
    #[arg(long, default_value = "0.25")]
    pub mag_step: f64,

    /// Output file for the table and fits
    #[arg(short, long, default_value = "saturation.toml")]
    pub output: PathBuf,
}

/// Saturation table together with its fitted limits, as stored on disk.
#[derive(Serialize, Deserialize)]
pub struct SaturationReport {
    pub table: SaturationTable,
    pub limits: SaturationLimits,
}

pub fn run(args: &SaturationArgs) -> Result<()> {
    let run_config = args.setup.load()?;
    let (detector, config) = run_config.resolve()?;
    print_setup_summary(&run_config.detector, &detector, &config, &run_config.grids);

    // Half a step past the end so the faint limit is included.
    let magnitudes = stepped(
        args.mag_start,
        args.mag_end + 0.5 * args.mag_step,
        args.mag_step,
    )?;
    let report = compute_report(&run_config, &detector, &config, &magnitudes)?;

    println!("{:>8}  {:>14}  {:>14}", "Mag", "Bright (s)", "Dark (s)");
    println!("{}", "-".repeat(40));
    let table = &report.table;
    // Rows saturated at the shortest exposure are marked and left out of the fits.
    let cell = |sky: SkyType, i: usize| {
        let t = 10f64.powf(table.log_times(sky)[i]);
        if table.crossed(sky)[i] {
            format!("{t:.2}")
        } else {
            format!("<{t:.2}")
        }
    };
    for (i, m) in table.magnitudes.iter().enumerate() {
        println!(
            "{:>8.2}  {:>14}  {:>14}",
            m,
            cell(SkyType::Bright, i),
            cell(SkyType::Dark, i)
        );
    }
    for sky in SkyType::ALL {
        println!(
            "\n{sky} sky fit (mag vs log10 t): {:?}",
            report.limits.polynomial(sky).coefficients
        );
    }
    println!();

    write_toml(&report, Some(&args.output), "saturation fits")
}

/// Run the saturation table with a progress bar and fit it.
pub fn compute_report(
    run_config: &RunConfig,
    detector: &DetectorProfile,
    config: &ObservationConfig,
    magnitudes: &Array1<f64>,
) -> Result<SaturationReport> {
    let exposure_grid = run_config.grids.exposure.build()?;
    let pb = progress_bar(2 * magnitudes.len(), "Saturation search")?;
    let table = saturation_table_with_progress(
        detector,
        config,
        magnitudes,
        &exposure_grid,
        run_config.grids.policy,
        |done| pb.set_position(done as u64),
    )?;
    pb.finish_with_message("Fitting saturation limits");

    let limits = fit_saturation(&table)?;
    Ok(SaturationReport { table, limits })
}
