//! The high-precision magnitude window as a function of exposure time.
//!
//! For each exposure time a star is useful when it is fainter than the
//! dark-sky saturation limit and brighter than the 1 mmag cross-point.

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::consts::TARGET_PRECISION;
use crate::detector::DetectorProfile;
use crate::error::{NoiseError, Result};
use crate::fit::SaturationLimits;
use crate::observation::{ObservationConfig, SkyType};
use crate::search::cross_point::find_cross_point;
use crate::search::SearchPolicy;

/// Exposure times (s) of the default survey: 20 samples from 1 to 50 s, log spaced.
pub fn default_exposure_times() -> Array1<f64> {
    Array1::logspace(10.0, 0.0, 50f64.log10(), 20)
}

/// Magnitude window per exposure time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PrecisionRange {
    pub exposure_times: Vec<f64>,
    /// Faint limit: magnitude where the binned error reaches the target.
    pub cross_points: Vec<f64>,
    /// Bright limit: dark-sky saturation magnitude from the fitted limits.
    pub saturation_magnitudes: Vec<f64>,
}

impl PrecisionRange {
    pub fn len(&self) -> usize {
        self.exposure_times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exposure_times.is_empty()
    }

    /// Width of the window in magnitudes for each exposure time. Negative
    /// widths mean no star is both precise and unsaturated.
    pub fn widths(&self) -> Vec<f64> {
        self.cross_points
            .iter()
            .zip(&self.saturation_magnitudes)
            .map(|(cross, sat)| cross - sat)
            .collect()
    }

    /// Index and width of the widest window.
    pub fn widest(&self) -> Option<(usize, f64)> {
        self.widths()
            .into_iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Number of catalogue magnitudes inside the window at sample `index`:
    /// fainter than the saturation limit, up to and including the cross-point.
    pub fn count_in_window(&self, index: usize, magnitudes: &[f64]) -> usize {
        let (Some(&sat), Some(&cross)) = (
            self.saturation_magnitudes.get(index),
            self.cross_points.get(index),
        ) else {
            return 0;
        };
        magnitudes.iter().filter(|&&m| m > sat && m <= cross).count()
    }
}

/// Compute the precision window at each of `exposure_times`, holding the
/// binning time of `config` fixed.
pub fn precision_range(
    detector: &DetectorProfile,
    config: &ObservationConfig,
    limits: &SaturationLimits,
    exposure_times: &[f64],
    magnitude_grid: &Array1<f64>,
    policy: SearchPolicy,
) -> Result<PrecisionRange> {
    precision_range_with_progress(
        detector,
        config,
        limits,
        exposure_times,
        magnitude_grid,
        policy,
        |_| {},
    )
}

/// Like [`precision_range`], calling `on_progress(items_done)` after each
/// exposure time.
pub fn precision_range_with_progress(
    detector: &DetectorProfile,
    config: &ObservationConfig,
    limits: &SaturationLimits,
    exposure_times: &[f64],
    magnitude_grid: &Array1<f64>,
    policy: SearchPolicy,
    on_progress: impl Fn(usize),
) -> Result<PrecisionRange> {
    if exposure_times.is_empty() {
        return Err(NoiseError::EmptyGrid);
    }

    let mut cross_points = Vec::with_capacity(exposure_times.len());
    let mut saturation_magnitudes = Vec::with_capacity(exposure_times.len());

    for (i, &t) in exposure_times.iter().enumerate() {
        let exposure_config = config.clone().with_exposure(t);
        let cross =
            find_cross_point(detector, &exposure_config, magnitude_grid, TARGET_PRECISION, policy)?;
        let sat = limits.magnitude_at(SkyType::Dark, t);
        debug!(
            exposure_s = t,
            cross_point = cross.magnitude,
            saturation = sat,
            "Precision window"
        );
        cross_points.push(cross.magnitude);
        saturation_magnitudes.push(sat);
        on_progress(i + 1);
    }

    info!(exposure_times = exposure_times.len(), "Precision range complete");

    Ok(PrecisionRange {
        exposure_times: exposure_times.to_vec(),
        cross_points,
        saturation_magnitudes,
    })
}
