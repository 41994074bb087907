//! Saturation limits as a function of exposure time.
//!
//! The saturation search is run for a range of magnitudes under bright and
//! dark sky, and a polynomial in `log10(exposure time)` is fitted to the
//! saturating magnitude so later calculations can look the limit up without
//! repeating the search.

use std::sync::atomic::{AtomicUsize, Ordering};

use nalgebra::{DMatrix, DVector};
use ndarray::Array1;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::consts::{
    BRIGHT_FIT_ORDER, DARK_FIT_ORDER, FIT_SINGULAR_EPSILON, SATURATION_MAGNITUDES,
};
use crate::detector::DetectorProfile;
use crate::error::{NoiseError, Result};
use crate::grid::stepped;
use crate::observation::{ObservationConfig, SkyType};
use crate::search::saturation::find_saturation_time;
use crate::search::SearchPolicy;

/// Polynomial with coefficients ordered from the highest power down.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Polynomial {
    pub coefficients: Vec<f64>,
}

impl Polynomial {
    pub fn order(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Horner evaluation.
    pub fn eval(&self, x: f64) -> f64 {
        self.coefficients.iter().fold(0.0, |acc, c| acc * x + c)
    }
}

/// Least-squares polynomial fit of `y` against `x`.
pub fn fit_polynomial(x: &[f64], y: &[f64], order: usize) -> Result<Polynomial> {
    if x.len() != y.len() {
        return Err(NoiseError::Fit(format!(
            "{} x values but {} y values",
            x.len(),
            y.len()
        )));
    }
    let terms = order + 1;
    if x.len() < terms {
        return Err(NoiseError::Fit(format!(
            "order {order} needs at least {terms} points, got {}",
            x.len()
        )));
    }

    let vandermonde = DMatrix::from_fn(x.len(), terms, |i, j| x[i].powi((order - j) as i32));
    let rhs = DVector::from_column_slice(y);
    let svd = vandermonde.svd(true, true);
    let eps = FIT_SINGULAR_EPSILON * svd.singular_values.max();
    let rank = svd.singular_values.iter().filter(|&&s| s > eps).count();
    if rank < terms {
        return Err(NoiseError::Fit(format!(
            "design matrix has rank {rank}, need {terms} (too few distinct x values)"
        )));
    }
    let solution = svd.solve(&rhs, eps).map_err(|e| NoiseError::Fit(e.to_string()))?;
    Ok(Polynomial {
        coefficients: solution.iter().copied().collect(),
    })
}

/// Saturation times for a set of magnitudes under bright and dark sky.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaturationTable {
    pub magnitudes: Vec<f64>,
    /// log10 of the bright-sky saturation time (s).
    pub log_time_bright: Vec<f64>,
    /// log10 of the dark-sky saturation time (s).
    pub log_time_dark: Vec<f64>,
    /// `false` where the star was already saturated at the shortest grid
    /// exposure, so the stored time is only the grid start.
    pub crossed_bright: Vec<bool>,
    pub crossed_dark: Vec<bool>,
}

impl SaturationTable {
    pub fn log_times(&self, sky: SkyType) -> &[f64] {
        match sky {
            SkyType::Bright => &self.log_time_bright,
            SkyType::Dark => &self.log_time_dark,
        }
    }

    pub fn crossed(&self, sky: SkyType) -> &[bool] {
        match sky {
            SkyType::Bright => &self.crossed_bright,
            SkyType::Dark => &self.crossed_dark,
        }
    }

    /// `(log10 time, magnitude)` pairs whose saturation time was resolved
    /// inside the exposure grid.
    pub fn resolved_rows(&self, sky: SkyType) -> (Vec<f64>, Vec<f64>) {
        self.log_times(sky)
            .iter()
            .zip(&self.magnitudes)
            .zip(self.crossed(sky))
            .filter(|(_, crossed)| **crossed)
            .map(|((&t, &m), _)| (t, m))
            .unzip()
    }
}

/// Magnitudes of the standard saturation table, 8.25 to 12.75 in steps of 0.25.
pub fn default_saturation_magnitudes() -> Result<Array1<f64>> {
    let (start, end, step) = SATURATION_MAGNITUDES;
    stepped(start, end + 0.5 * step, step)
}

/// Run the saturation search for every magnitude and both sky types.
pub fn saturation_table(
    detector: &DetectorProfile,
    config: &ObservationConfig,
    magnitudes: &Array1<f64>,
    exposure_grid: &Array1<f64>,
    policy: SearchPolicy,
) -> Result<SaturationTable> {
    saturation_table_with_progress(detector, config, magnitudes, exposure_grid, policy, |_| {})
}

/// Like [`saturation_table`], calling `on_progress(items_done)` after each of
/// the `2 * magnitudes.len()` searches.
pub fn saturation_table_with_progress(
    detector: &DetectorProfile,
    config: &ObservationConfig,
    magnitudes: &Array1<f64>,
    exposure_grid: &Array1<f64>,
    policy: SearchPolicy,
    on_progress: impl Fn(usize) + Send + Sync,
) -> Result<SaturationTable> {
    if magnitudes.is_empty() {
        return Err(NoiseError::EmptyGrid);
    }
    let mags = magnitudes.to_vec();
    let done = AtomicUsize::new(0);

    let run = |sky: SkyType| -> Result<(Vec<f64>, Vec<bool>)> {
        let sky_config = config.clone().with_sky(sky);
        mags.par_iter()
            .map(|&m| -> Result<(f64, bool)> {
                let point = find_saturation_time(detector, &sky_config, m, exposure_grid, policy)?;
                if !point.threshold_crossed {
                    debug!(magnitude = m, sky = %sky, "Saturated at shortest grid exposure");
                }
                let completed = done.fetch_add(1, Ordering::Relaxed) + 1;
                on_progress(completed);
                Ok((point.exposure_time_s.log10(), point.threshold_crossed))
            })
            .collect::<Result<Vec<_>>>()
            .map(|rows| rows.into_iter().unzip())
    };

    let (log_time_bright, crossed_bright) = run(SkyType::Bright)?;
    let (log_time_dark, crossed_dark) = run(SkyType::Dark)?;
    info!(magnitudes = mags.len(), "Saturation table complete");

    Ok(SaturationTable {
        magnitudes: mags,
        log_time_bright,
        log_time_dark,
        crossed_bright,
        crossed_dark,
    })
}

/// Fitted saturating magnitude vs. log10(exposure time) for both sky types.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaturationLimits {
    pub bright: Polynomial,
    pub dark: Polynomial,
}

impl SaturationLimits {
    pub fn polynomial(&self, sky: SkyType) -> &Polynomial {
        match sky {
            SkyType::Bright => &self.bright,
            SkyType::Dark => &self.dark,
        }
    }

    /// Brightest unsaturated magnitude for an exposure of `exposure_time_s`.
    pub fn magnitude_at(&self, sky: SkyType, exposure_time_s: f64) -> f64 {
        self.polynomial(sky).eval(exposure_time_s.log10())
    }
}

/// Fit the saturation table: order 4 in bright sky, order 2 in dark sky.
///
/// Rows saturated at the shortest grid exposure carry no saturation time
/// and are left out of the fit.
pub fn fit_saturation(table: &SaturationTable) -> Result<SaturationLimits> {
    let bright = fit_sky(table, SkyType::Bright, BRIGHT_FIT_ORDER)?;
    let dark = fit_sky(table, SkyType::Dark, DARK_FIT_ORDER)?;
    debug!(
        bright = ?bright.coefficients,
        dark = ?dark.coefficients,
        "Saturation fits"
    );
    Ok(SaturationLimits { bright, dark })
}

fn fit_sky(table: &SaturationTable, sky: SkyType, order: usize) -> Result<Polynomial> {
    let (log_times, magnitudes) = table.resolved_rows(sky);
    if log_times.len() <= order {
        return Err(NoiseError::Fit(format!(
            "only {} of {} magnitudes saturate inside the exposure grid under {sky} sky, \
             order {order} needs {}; lower the shortest exposure or use fainter magnitudes",
            log_times.len(),
            table.magnitudes.len(),
            order + 1
        )));
    }
    fit_polynomial(&log_times, &magnitudes, order)
}
