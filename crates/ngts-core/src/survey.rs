//! Survey planning: frame counts, storage volume and shutter wear.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::{BYTES_PER_MB, BYTES_PER_TB, DAYS_PER_YEAR};
use crate::detector::DetectorProfile;
use crate::error::{NoiseError, Result};
use crate::fit::SaturationLimits;
use crate::observation::SkyType;

/// Operational assumptions behind a survey plan.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyAssumptions {
    pub bias_per_day: f64,
    pub darks_per_day: f64,
    /// Flats per day on nights the dome opens.
    pub flats_per_day: f64,
    /// Observable hours per year.
    pub open_hours_per_year: f64,
    /// Size of one raw frame (MB, 1 MB = 1024^2 bytes).
    pub image_size_mb: f64,
    pub telescopes: u32,
    pub years: f64,
}

impl Default for SurveyAssumptions {
    fn default() -> Self {
        Self {
            bias_per_day: 30.0,
            darks_per_day: 30.0,
            flats_per_day: 45.0,
            open_hours_per_year: 3264.0,
            image_size_mb: 3.75,
            telescopes: 12,
            years: 1.0,
        }
    }
}

impl SurveyAssumptions {
    /// Night hours in a year, taking half of every day as night.
    pub fn night_hours_per_year() -> f64 {
        0.5 * 24.0 * DAYS_PER_YEAR
    }

    /// Fraction of night time with the dome open.
    pub fn open_night_fraction(&self) -> f64 {
        self.open_hours_per_year / Self::night_hours_per_year()
    }

    fn scale(&self) -> f64 {
        DAYS_PER_YEAR * f64::from(self.telescopes) * self.years
    }
}

/// Frame counts and storage for one exposure time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SurveyPlan {
    pub exposure_time_s: f64,
    pub read_time_s: f64,
    pub exposures_per_hour: f64,
    pub science_images: f64,
    pub bias_frames: f64,
    pub dark_frames: f64,
    pub flat_frames: f64,
    pub science_storage_tb: f64,
    pub calibration_storage_tb: f64,
    pub total_storage_tb: f64,
    /// Share of the total storage taken by calibration frames.
    pub calibration_fraction: f64,
}

impl SurveyPlan {
    pub fn calibration_frames(&self) -> f64 {
        self.bias_frames + self.dark_frames + self.flat_frames
    }

    pub fn total_frames(&self) -> f64 {
        self.science_images + self.calibration_frames()
    }
}

pub fn plan_survey(
    detector: &DetectorProfile,
    exposure_time_s: f64,
    assumptions: &SurveyAssumptions,
) -> Result<SurveyPlan> {
    if !(exposure_time_s.is_finite() && exposure_time_s > 0.0) {
        return Err(NoiseError::Configuration(format!(
            "exposure time must be positive, got {exposure_time_s}"
        )));
    }
    if !(assumptions.image_size_mb > 0.0 && assumptions.years > 0.0) {
        return Err(NoiseError::Configuration(
            "image size and survey length must be positive".into(),
        ));
    }

    let read_time_s = detector.read_time();
    let exposures_per_hour = 3600.0 / (exposure_time_s + read_time_s);
    let science_images = (assumptions.open_hours_per_year
        * exposures_per_hour
        * f64::from(assumptions.telescopes)
        * assumptions.years)
        .ceil();

    let scale = assumptions.scale();
    let bias_frames = assumptions.bias_per_day * scale;
    let dark_frames = assumptions.darks_per_day * scale;
    let flat_frames = assumptions.flats_per_day * assumptions.open_night_fraction() * scale;

    let image_bytes = assumptions.image_size_mb * BYTES_PER_MB;
    let to_tb = |frames: f64| frames * image_bytes / BYTES_PER_TB;
    let calibration = bias_frames + dark_frames + flat_frames;
    let science_storage_tb = to_tb(science_images);
    let calibration_storage_tb = to_tb(calibration);
    let total_storage_tb = to_tb(science_images + calibration);

    debug!(
        exposure_s = exposure_time_s,
        science_images,
        total_storage_tb,
        "Survey plan"
    );

    Ok(SurveyPlan {
        exposure_time_s,
        read_time_s,
        exposures_per_hour,
        science_images,
        bias_frames,
        dark_frames,
        flat_frames,
        science_storage_tb,
        calibration_storage_tb,
        total_storage_tb,
        calibration_fraction: calibration_storage_tb / total_storage_tb,
    })
}

/// Shutter operations per year in thousands for each exposure time.
pub fn shutter_operations(exposure_times: &[f64], hours: f64, readout_s: f64) -> Vec<f64> {
    exposure_times
        .iter()
        .map(|t| hours * 3600.0 / (t + readout_s) / 1e3)
        .collect()
}

/// Number of catalogue magnitudes brighter than `threshold`.
pub fn count_brighter_than(magnitudes: &[f64], threshold: f64) -> usize {
    magnitudes.iter().filter(|&&m| m < threshold).count()
}

/// Star counts from a magnitude catalogue at one exposure time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Census {
    pub saturated_bright: usize,
    pub saturated_dark: usize,
    /// Stars brighter than the cross-point, saturated or not.
    pub high_precision: usize,
}

pub fn census(
    magnitudes: &[f64],
    limits: &SaturationLimits,
    exposure_time_s: f64,
    cross_point_mag: f64,
) -> Census {
    Census {
        saturated_bright: count_brighter_than(
            magnitudes,
            limits.magnitude_at(SkyType::Bright, exposure_time_s),
        ),
        saturated_dark: count_brighter_than(
            magnitudes,
            limits.magnitude_at(SkyType::Dark, exposure_time_s),
        ),
        high_precision: count_brighter_than(magnitudes, cross_point_mag),
    }
}
