use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::detector::DetectorProfile;
use crate::error::{NoiseError, Result};
use crate::observation::ObservationConfig;
use crate::photometry::budget::PhotonBudget;
use crate::photometry::psf::central_pixel_fraction;
use crate::search::{interpolate_crossing, SearchPolicy};

/// Shortest exposure at which the brightest pixel reaches full well.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaturationPoint {
    pub exposure_time_s: f64,
    /// `false` when the shortest exposure in the grid is already saturated,
    /// so the true saturation time lies below the grid.
    pub threshold_crossed: bool,
}

/// Electrons in the brightest pixel after one exposure of `exposure_time_s`.
///
/// Source, sky and bias are summed over the aperture and the PSF's central
/// pixel fraction of that total is taken, the worst case of a star centred
/// on a pixel.
pub fn central_pixel_electrons(
    detector: &DetectorProfile,
    config: &ObservationConfig,
    budget: &PhotonBudget,
    pixel_fraction: f64,
    magnitude: f64,
    exposure_time_s: f64,
) -> f64 {
    let area = config.aperture_area_pix();
    let source = budget.expected_electrons(magnitude, exposure_time_s, config.airmass);
    let sky = config.effective_sky_level() * area * exposure_time_s;
    let bias = detector.bias_level_e() * area;
    pixel_fraction * (source + sky + bias)
}

/// Saturation search on precomputed central pixel counts.
///
/// `exposure_times` and `electrons` are paired samples of a curve that grows
/// with exposure time. Sample order does not matter.
pub fn saturation_from_samples(
    exposure_times: &[f64],
    electrons: &[f64],
    full_well_e: f64,
    policy: SearchPolicy,
) -> Result<SaturationPoint> {
    if exposure_times.is_empty() {
        return Err(NoiseError::EmptyGrid);
    }
    if exposure_times.len() != electrons.len() {
        return Err(NoiseError::Configuration(format!(
            "{} exposure times but {} flux samples",
            exposure_times.len(),
            electrons.len()
        )));
    }

    let saturated = exposure_times
        .iter()
        .zip(electrons)
        .filter(|&(_, &e)| e > full_well_e)
        .min_by(|a, b| a.0.total_cmp(b.0));

    let Some((&t_hi, &e_hi)) = saturated else {
        let (longest, peak) = exposure_times
            .iter()
            .zip(electrons)
            .max_by(|a, b| a.0.total_cmp(b.0))
            .map(|(&t, &e)| (t, e))
            .unwrap_or((f64::NAN, f64::NAN));
        return Err(NoiseError::NoSaturationFound {
            max_exposure_s: longest,
            peak_electrons: peak,
            full_well: full_well_e,
        });
    };

    // Longest unsaturated exposure below the first saturated one.
    let below = exposure_times
        .iter()
        .zip(electrons)
        .filter(|&(&t, &e)| t < t_hi && e <= full_well_e)
        .max_by(|a, b| a.0.total_cmp(b.0));

    let point = match (policy, below) {
        (SearchPolicy::NearestSample, below) => SaturationPoint {
            exposure_time_s: t_hi,
            threshold_crossed: below.is_some(),
        },
        (SearchPolicy::Interpolated, Some((&t_lo, &e_lo))) => SaturationPoint {
            exposure_time_s: interpolate_crossing(t_lo, e_lo, t_hi, e_hi, full_well_e),
            threshold_crossed: true,
        },
        (SearchPolicy::Interpolated, None) => SaturationPoint {
            exposure_time_s: t_hi,
            threshold_crossed: false,
        },
    };
    Ok(point)
}

/// Saturation search over `exposure_grid` for a star of `magnitude`, with the
/// given search policy.
pub fn find_saturation_time(
    detector: &DetectorProfile,
    config: &ObservationConfig,
    magnitude: f64,
    exposure_grid: &Array1<f64>,
    policy: SearchPolicy,
) -> Result<SaturationPoint> {
    detector.validate()?;
    config.validate()?;
    if exposure_grid.is_empty() {
        return Err(NoiseError::EmptyGrid);
    }
    if let Some(bad) = exposure_grid.iter().find(|t| !(t.is_finite() && **t > 0.0)) {
        return Err(NoiseError::InvalidExposure(format!(
            "exposure grid contains non-positive time {bad}"
        )));
    }

    let budget = PhotonBudget::new(detector, config);
    let fraction = central_pixel_fraction(config.fwhm_pix, (0.0, 0.0))?;
    let electrons = exposure_grid.mapv(|t| {
        central_pixel_electrons(detector, config, &budget, fraction, magnitude, t)
    });

    saturation_from_samples(
        &exposure_grid.to_vec(),
        &electrons.to_vec(),
        detector.full_well_depth_e,
        policy,
    )
}

/// Saturation search with the default (interpolated) policy.
pub fn compute_saturation_time(
    detector: &DetectorProfile,
    config: &ObservationConfig,
    magnitude: f64,
    exposure_grid: &Array1<f64>,
) -> Result<SaturationPoint> {
    find_saturation_time(
        detector,
        config,
        magnitude,
        exposure_grid,
        SearchPolicy::default(),
    )
}
