pub mod config;
pub mod exposure;
pub mod noise;
pub mod precision;
pub mod psf;
pub mod saturation;
pub mod survey;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use ngts_core::config::RunConfig;
use ngts_core::detector::DetectorPreset;
use ngts_core::observation::{ObservationConfig, ScintillationModel, SkyType};
use ngts_core::search::SearchPolicy;
use serde::Serialize;
use tracing::info;

#[derive(Clone, Copy, ValueEnum)]
pub enum DetectorArg {
    Ngts,
    NgtsPrototype,
    Wasp,
}

impl From<DetectorArg> for DetectorPreset {
    fn from(arg: DetectorArg) -> Self {
        match arg {
            DetectorArg::Ngts => DetectorPreset::Ngts,
            DetectorArg::NgtsPrototype => DetectorPreset::NgtsPrototype,
            DetectorArg::Wasp => DetectorPreset::Wasp,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SkyArg {
    Bright,
    Dark,
}

impl From<SkyArg> for SkyType {
    fn from(arg: SkyArg) -> Self {
        match arg {
            SkyArg::Bright => SkyType::Bright,
            SkyArg::Dark => SkyType::Dark,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum PolicyArg {
    Interpolated,
    Nearest,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ScintillationArg {
    Fractional,
    MagnitudeDeficit,
}

/// Observation setup shared by the modelling commands. Flags override
/// values from `--config`.
#[derive(Args)]
pub struct SetupArgs {
    /// Run config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Detector preset
    #[arg(long, value_enum)]
    pub detector: Option<DetectorArg>,

    /// Sky background
    #[arg(long, value_enum)]
    pub sky: Option<SkyArg>,

    /// Single exposure time in seconds
    #[arg(short, long)]
    pub exptime: Option<f64>,

    /// Binning time in seconds
    #[arg(short, long)]
    pub binning: Option<f64>,

    /// Airmass of the observation
    #[arg(long)]
    pub airmass: Option<f64>,

    /// Threshold search policy
    #[arg(long, value_enum)]
    pub policy: Option<PolicyArg>,

    /// Scintillation term
    #[arg(long, value_enum)]
    pub scintillation: Option<ScintillationArg>,
}

impl SetupArgs {
    pub fn load(&self) -> Result<RunConfig> {
        let mut config = match self.config {
            Some(ref path) => {
                let config: RunConfig = read_toml(path, "run config")?;
                info!(path = %path.display(), detector = %config.detector, "Loaded run config");
                config
            }
            None => RunConfig::default(),
        };

        if let Some(detector) = self.detector {
            config.detector = detector.into();
            // WASP observations use their own site and photometry defaults.
            if matches!(detector, DetectorArg::Wasp) && self.config.is_none() {
                config.observation = ObservationConfig::wasp(
                    self.exptime.unwrap_or(config.observation.exposure_time_s),
                );
            }
        }
        let obs = &mut config.observation;
        if let Some(sky) = self.sky {
            obs.sky_level_e_per_s_per_pix = SkyType::from(sky).level_e_per_s_per_pix();
        }
        if let Some(t) = self.exptime {
            obs.exposure_time_s = t;
        }
        if let Some(t) = self.binning {
            obs.binning_time_s = t;
        }
        if let Some(x) = self.airmass {
            obs.airmass = x;
        }
        if let Some(model) = self.scintillation {
            obs.scintillation_model = match model {
                ScintillationArg::Fractional => ScintillationModel::Fractional,
                ScintillationArg::MagnitudeDeficit => ScintillationModel::MagnitudeDeficit,
            };
        }
        if let Some(policy) = self.policy {
            config.grids.policy = match policy {
                PolicyArg::Interpolated => SearchPolicy::Interpolated,
                PolicyArg::Nearest => SearchPolicy::NearestSample,
            };
        }
        Ok(config)
    }
}

/// Serialize `value` as TOML to `path`, or to stdout when no path is given.
pub fn write_toml<T: Serialize>(value: &T, path: Option<&Path>, what: &str) -> Result<()> {
    let toml_str = toml::to_string_pretty(value)
        .with_context(|| format!("Failed to serialize {what}"))?;
    match path {
        Some(path) => {
            std::fs::write(path, &toml_str)
                .with_context(|| format!("Failed to write {what} to {}", path.display()))?;
            println!("{} saved to {}", capitalise(what), path.display());
        }
        None => print!("{toml_str}"),
    }
    Ok(())
}

pub fn read_toml<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {what} {}", path.display()))?;
    toml::from_str(&contents).with_context(|| format!("Invalid {what} in {}", path.display()))
}

pub fn progress_bar(len: usize, message: &'static str) -> Result<ProgressBar> {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    pb.set_message(message);
    Ok(pb)
}

fn capitalise(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
