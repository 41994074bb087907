use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::consts::TARGET_PRECISION;
use crate::detector::DetectorProfile;
use crate::error::{NoiseError, Result};
use crate::grid::mean_spacing;
use crate::observation::ObservationConfig;
use crate::search::{interpolate_crossing, SearchPolicy};
use crate::sweep::noise_vs_magnitude;

/// Magnitude at which the total fractional error reaches a target precision.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CrossPoint {
    pub magnitude: f64,
    /// Total fractional error at `magnitude` (the target itself when interpolated).
    pub total_error: f64,
    /// Mean grid spacing; bounds the accuracy of a snapped result.
    pub resolution: f64,
    /// `true` when the value was interpolated between bracketing samples.
    pub interpolated: bool,
}

/// Cross-point search on precomputed `(magnitude, total error)` samples.
///
/// With [`SearchPolicy::NearestSample`] the sample minimising
/// `|total - target|` wins, the first one on ties. With
/// [`SearchPolicy::Interpolated`] the first neighbouring pair (in grid order)
/// straddling the target is interpolated linearly; if no pair straddles it
/// the nearest sample is returned with `interpolated = false`.
pub fn cross_point_from_samples(
    magnitudes: &[f64],
    totals: &[f64],
    target: f64,
    policy: SearchPolicy,
) -> Result<CrossPoint> {
    if magnitudes.is_empty() {
        return Err(NoiseError::EmptyGrid);
    }
    if magnitudes.len() != totals.len() {
        return Err(NoiseError::Configuration(format!(
            "{} magnitudes but {} error samples",
            magnitudes.len(),
            totals.len()
        )));
    }
    let resolution = mean_spacing(magnitudes);

    if policy == SearchPolicy::Interpolated {
        let bracket = magnitudes
            .windows(2)
            .zip(totals.windows(2))
            .find(|(_, e)| (e[0] - target) * (e[1] - target) <= 0.0 && e[0] != e[1]);
        if let Some((m, e)) = bracket {
            return Ok(CrossPoint {
                magnitude: interpolate_crossing(m[0], e[0], m[1], e[1], target),
                total_error: target,
                resolution,
                interpolated: true,
            });
        }
    }

    let mut best = 0;
    for (i, e) in totals.iter().enumerate() {
        if (e - target).abs() < (totals[best] - target).abs() {
            best = i;
        }
    }
    Ok(CrossPoint {
        magnitude: magnitudes[best],
        total_error: totals[best],
        resolution,
        interpolated: false,
    })
}

/// Magnitude where total noise crosses `target` for the configured exposure
/// and binning time.
pub fn find_cross_point(
    detector: &DetectorProfile,
    config: &ObservationConfig,
    magnitude_grid: &Array1<f64>,
    target: f64,
    policy: SearchPolicy,
) -> Result<CrossPoint> {
    let curve = noise_vs_magnitude(detector, config, magnitude_grid)?;
    cross_point_from_samples(&curve.x, &curve.total, target, policy)
}

/// 1 mmag cross-point with the default (interpolated) policy.
pub fn compute_cross_point(
    detector: &DetectorProfile,
    config: &ObservationConfig,
    magnitude_grid: &Array1<f64>,
) -> Result<CrossPoint> {
    find_cross_point(
        detector,
        config,
        magnitude_grid,
        TARGET_PRECISION,
        SearchPolicy::default(),
    )
}
