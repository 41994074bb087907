use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use ngts_core::grid::LogGrid;
use ngts_core::search::saturation::find_saturation_time;
use ngts_core::sweep::{noise_vs_exposure, NoiseCurve};
use ngts_core::NoiseError;
use serde::Serialize;

use super::{write_toml, SetupArgs};
use crate::summary::print_setup_summary;

#[derive(Args)]
pub struct ExposureArgs {
    #[command(flatten)]
    pub setup: SetupArgs,

    /// Magnitude of the star
    #[arg(short, long, default_value = "10")]
    pub magnitude: f64,

    /// Comma-separated airmasses to compare
    #[arg(long, value_delimiter = ',', default_value = "1.0,1.5,2.0")]
    pub airmasses: Vec<f64>,

    /// Write the curves as TOML
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Serialize)]
struct ExposureReport {
    magnitude: f64,
    airmasses: Vec<f64>,
    curves: Vec<NoiseCurve>,
}

pub fn run(args: &ExposureArgs) -> Result<()> {
    if args.airmasses.is_empty() {
        bail!("At least one airmass is required");
    }
    let run_config = args.setup.load()?;
    let (detector, config) = run_config.resolve()?;
    print_setup_summary(&run_config.detector, &detector, &config, &run_config.grids);

    // A single exposure plus readout has to fit in the binning time.
    let exposure = run_config.grids.exposure;
    let longest = exposure.end.min(config.binning_time_s - detector.read_time());
    if longest <= exposure.start {
        bail!(
            "Binning time {} s leaves no room for exposures of at least {} s",
            config.binning_time_s,
            exposure.start
        );
    }
    let grid = LogGrid {
        end: longest,
        ..exposure
    }
    .build()?;

    let mut curves = Vec::with_capacity(args.airmasses.len());
    println!(
        "{:>8}  {:>12}  {:>12}  {:>12}",
        "Airmass", "Best exp (s)", "Total", "Saturates (s)"
    );
    println!("{}", "-".repeat(50));
    for &airmass in &args.airmasses {
        let airmass_config = config.clone().with_airmass(airmass);
        let curve = noise_vs_exposure(&detector, &airmass_config, args.magnitude, &grid)?;
        let best = curve
            .total
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap_or(0);

        let saturation = match find_saturation_time(
            &detector,
            &airmass_config,
            args.magnitude,
            &grid,
            run_config.grids.policy,
        ) {
            Ok(point) if point.threshold_crossed => format!("{:.2}", point.exposure_time_s),
            Ok(point) => format!("<{:.2}", point.exposure_time_s),
            Err(NoiseError::NoSaturationFound { .. }) => "never".to_string(),
            Err(e) => return Err(e.into()),
        };

        println!(
            "{:>8.2}  {:>12.2}  {:>12.4e}  {:>12}",
            airmass, curve.x[best], curve.total[best], saturation
        );
        curves.push(curve);
    }

    if let Some(ref path) = args.output {
        let report = ExposureReport {
            magnitude: args.magnitude,
            airmasses: args.airmasses.clone(),
            curves,
        };
        write_toml(&report, Some(path), "exposure curves")?;
    }
    Ok(())
}
