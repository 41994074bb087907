use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use ngts_core::config::RunConfig;
use ngts_core::survey::{plan_survey, shutter_operations};

use super::{read_toml, write_toml, DetectorArg};
use crate::summary::print_survey_plan;

#[derive(Args)]
pub struct SurveyArgs {
    /// Science exposure time in seconds
    pub exptime: f64,

    /// Number of years to plan for
    #[arg(short, long)]
    pub years: Option<f64>,

    /// Run config file (TOML) supplying the detector and survey assumptions
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Detector preset
    #[arg(long, value_enum)]
    pub detector: Option<DetectorArg>,

    /// Hours of operation for the shutter estimate
    #[arg(long, default_value = "1200")]
    pub shutter_hours: f64,

    /// Readout overhead per shutter cycle in seconds
    #[arg(long, default_value = "1.5")]
    pub readout: f64,

    /// Write the plan as TOML
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &SurveyArgs) -> Result<()> {
    let mut run_config = match args.config {
        Some(ref path) => read_toml::<RunConfig>(path, "run config")?,
        None => RunConfig::default(),
    };
    if let Some(detector) = args.detector {
        run_config.detector = detector.into();
    }
    if let Some(years) = args.years {
        run_config.survey.years = years;
    }

    let detector = run_config.detector.resolve()?;
    let plan = plan_survey(&detector, args.exptime, &run_config.survey)?;
    print_survey_plan(&plan, &run_config.survey);

    let shutter = shutter_operations(&[args.exptime], args.shutter_hours, args.readout);
    println!(
        "  Shutter operations in {} h: {:.1}k",
        args.shutter_hours, shutter[0]
    );
    println!();

    if let Some(ref path) = args.output {
        write_toml(&plan, Some(path), "survey plan")?;
    }
    Ok(())
}
