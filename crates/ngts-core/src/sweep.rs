//! Noise curves over magnitude and exposure-time grids.
//!
//! Each grid point is independent, so curves are evaluated with Rayon. The
//! output order always follows the grid and every value is identical to the
//! single-point computation.

use ndarray::parallel::prelude::*;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::detector::DetectorProfile;
use crate::error::{NoiseError, Result};
use crate::observation::ObservationConfig;
use crate::photometry::noise::{NoiseBreakdown, NoiseModel};

/// Quantity varied along a noise curve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveAxis {
    Magnitude,
    ExposureTime,
}

/// Noise breakdown sampled along one axis, stored column-wise.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoiseCurve {
    pub axis: CurveAxis,
    /// Magnitude or exposure time (s), depending on `axis`.
    pub x: Vec<f64>,
    pub source: Vec<f64>,
    pub sky: Vec<f64>,
    pub read: Vec<f64>,
    pub scintillation: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dark: Option<Vec<f64>>,
    pub total: Vec<f64>,
}

impl NoiseCurve {
    fn from_breakdowns(axis: CurveAxis, x: Vec<f64>, rows: &[NoiseBreakdown]) -> Self {
        let column = |f: fn(&NoiseBreakdown) -> f64| rows.iter().map(f).collect::<Vec<_>>();
        let dark = rows
            .iter()
            .map(|b| b.dark)
            .collect::<Option<Vec<f64>>>();
        Self {
            axis,
            x,
            source: column(|b| b.source),
            sky: column(|b| b.sky),
            read: column(|b| b.read),
            scintillation: column(|b| b.scintillation),
            dark,
            total: column(|b| b.total),
        }
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Breakdown at sample `index`.
    pub fn breakdown(&self, index: usize) -> Option<NoiseBreakdown> {
        if index >= self.len() {
            return None;
        }
        Some(NoiseBreakdown {
            source: self.source[index],
            sky: self.sky[index],
            read: self.read[index],
            scintillation: self.scintillation[index],
            dark: self.dark.as_ref().map(|d| d[index]),
            total: self.total[index],
        })
    }
}

/// Noise breakdown for every magnitude in `grid` at the configured exposure.
pub fn noise_vs_magnitude(
    detector: &DetectorProfile,
    config: &ObservationConfig,
    grid: &Array1<f64>,
) -> Result<NoiseCurve> {
    if grid.is_empty() {
        return Err(NoiseError::EmptyGrid);
    }
    let model = NoiseModel::new(detector, config)?;
    let rows = grid
        .par_iter()
        .map(|&m| model.breakdown(m))
        .collect::<Result<Vec<_>>>()?;
    debug!(
        samples = rows.len(),
        exposure_s = config.exposure_time_s,
        "Magnitude sweep complete"
    );
    Ok(NoiseCurve::from_breakdowns(
        CurveAxis::Magnitude,
        grid.to_vec(),
        &rows,
    ))
}

/// Noise breakdown for a star of `magnitude` at every exposure time in `grid`,
/// holding the binning time fixed.
pub fn noise_vs_exposure(
    detector: &DetectorProfile,
    config: &ObservationConfig,
    magnitude: f64,
    grid: &Array1<f64>,
) -> Result<NoiseCurve> {
    if grid.is_empty() {
        return Err(NoiseError::EmptyGrid);
    }
    let model = NoiseModel::new(detector, config)?;
    let rows = grid
        .par_iter()
        .map(|&t| model.breakdown_at(magnitude, t))
        .collect::<Result<Vec<_>>>()?;
    debug!(
        samples = rows.len(),
        magnitude,
        airmass = config.airmass,
        "Exposure sweep complete"
    );
    Ok(NoiseCurve::from_breakdowns(
        CurveAxis::ExposureTime,
        grid.to_vec(),
        &rows,
    ))
}
