use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use ngts_core::fit::default_saturation_magnitudes;
use ngts_core::precision::{default_exposure_times, precision_range_with_progress};
use ngts_core::survey::census;
use serde::Deserialize;

use super::saturation::{compute_report, SaturationReport};
use super::{progress_bar, read_toml, write_toml, SetupArgs};
use crate::summary::print_setup_summary;

#[derive(Args)]
pub struct PrecisionArgs {
    #[command(flatten)]
    pub setup: SetupArgs,

    /// Saturation fits written by `ngts saturation`; computed when omitted
    #[arg(long)]
    pub fits: Option<PathBuf>,

    /// Comma-separated exposure times in seconds [default: 20 log-spaced, 1 to 50 s]
    #[arg(long, value_delimiter = ',')]
    pub exptimes: Vec<f64>,

    /// TOML catalogue with a `magnitudes` array; counts saturated and precise stars
    #[arg(long)]
    pub catalogue: Option<PathBuf>,

    /// Output file for the precision range
    #[arg(short, long, default_value = "precision.toml")]
    pub output: PathBuf,
}

#[derive(Deserialize)]
pub struct Catalogue {
    pub magnitudes: Vec<f64>,
}

pub fn run(args: &PrecisionArgs) -> Result<()> {
    let run_config = args.setup.load()?;
    let (detector, config) = run_config.resolve()?;
    print_setup_summary(&run_config.detector, &detector, &config, &run_config.grids);

    let limits = match args.fits {
        Some(ref path) => read_toml::<SaturationReport>(path, "saturation fits")?.limits,
        None => {
            let magnitudes = default_saturation_magnitudes()?;
            compute_report(&run_config, &detector, &config, &magnitudes)?.limits
        }
    };

    let exposure_times = if args.exptimes.is_empty() {
        default_exposure_times().to_vec()
    } else {
        args.exptimes.clone()
    };
    let magnitude_grid = run_config.grids.magnitude.build()?;

    let pb = progress_bar(exposure_times.len(), "Cross-points")?;
    let range = precision_range_with_progress(
        &detector,
        &config,
        &limits,
        &exposure_times,
        &magnitude_grid,
        run_config.grids.policy,
        |done| pb.set_position(done as u64),
    )?;
    pb.finish_and_clear();

    let catalogue = match args.catalogue {
        Some(ref path) => Some(read_toml::<Catalogue>(path, "catalogue")?),
        None => None,
    };

    println!(
        "{:>10}  {:>12}  {:>12}  {:>8}{}",
        "Exp (s)",
        "Saturation",
        "Cross-point",
        "Width",
        if catalogue.is_some() {
            "  Sat (B)  Sat (D)  Precise   Window"
        } else {
            ""
        }
    );
    println!("{}", "-".repeat(if catalogue.is_some() { 84 } else { 48 }));
    let widths = range.widths();
    for i in 0..range.len() {
        let stars = catalogue
            .as_ref()
            .map(|c| {
                let counts = census(
                    &c.magnitudes,
                    &limits,
                    range.exposure_times[i],
                    range.cross_points[i],
                );
                format!(
                    "  {:>7}  {:>7}  {:>7}  {:>7}",
                    counts.saturated_bright,
                    counts.saturated_dark,
                    counts.high_precision,
                    range.count_in_window(i, &c.magnitudes)
                )
            })
            .unwrap_or_default();
        println!(
            "{:>10.2}  {:>12.3}  {:>12.3}  {:>8.3}{stars}",
            range.exposure_times[i],
            range.saturation_magnitudes[i],
            range.cross_points[i],
            widths[i]
        );
    }
    if let Some((i, width)) = range.widest() {
        println!(
            "\nWidest window: {:.3} mag at {:.2} s",
            width, range.exposure_times[i]
        );
    }
    println!();

    write_toml(&range, Some(&args.output), "precision range")
}
