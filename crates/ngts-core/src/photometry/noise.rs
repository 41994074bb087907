use serde::{Deserialize, Serialize};

use crate::consts::{ATMOSPHERE_SCALE_HEIGHT_M, SCINTILLATION_COEFFICIENT};
use crate::detector::DetectorProfile;
use crate::error::{NoiseError, Result};
use crate::observation::{ObservationConfig, ScintillationGeometry, ScintillationModel};
use crate::photometry::budget::PhotonBudget;

/// Fractional error contributions for one binned measurement.
///
/// Every term is an electron standard deviation divided by the mean binned
/// source electrons. Exposures are independent, so per-exposure errors
/// combine as `sqrt(n)` while the signal grows as `n`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoiseBreakdown {
    pub source: f64,
    pub sky: f64,
    pub read: f64,
    pub scintillation: f64,
    /// Present only when the detector models dark current.
    pub dark: Option<f64>,
    pub total: f64,
}

impl NoiseBreakdown {
    /// Assemble a breakdown; `total` is the quadrature sum of the terms.
    pub fn from_components(
        source: f64,
        sky: f64,
        read: f64,
        scintillation: f64,
        dark: Option<f64>,
    ) -> Self {
        let dark_sq = dark.map_or(0.0, |d| d * d);
        let total =
            (source * source + sky * sky + read * read + scintillation * scintillation + dark_sq)
                .sqrt();
        Self {
            source,
            sky,
            read,
            scintillation,
            dark,
            total,
        }
    }
}

/// Per-exposure fractional scintillation (Young 1967, as in Southworth 2008).
pub fn scintillation_per_exposure(
    geometry: &ScintillationGeometry,
    airmass: f64,
    exposure_time_s: f64,
) -> f64 {
    SCINTILLATION_COEFFICIENT
        * geometry.aperture_m.powf(-2.0 / 3.0)
        * airmass.powf(7.0 / 4.0)
        * (-geometry.altitude_m / ATMOSPHERE_SCALE_HEIGHT_M).exp()
        * (2.0 * exposure_time_s).powf(-0.5)
}

/// Noise model for a detector under fixed observing conditions.
#[derive(Clone, Debug)]
pub struct NoiseModel<'a> {
    detector: &'a DetectorProfile,
    config: &'a ObservationConfig,
    budget: PhotonBudget,
}

impl<'a> NoiseModel<'a> {
    pub fn new(detector: &'a DetectorProfile, config: &'a ObservationConfig) -> Result<Self> {
        detector.validate()?;
        config.validate()?;
        Ok(Self {
            detector,
            config,
            budget: PhotonBudget::new(detector, config),
        })
    }

    pub fn budget(&self) -> &PhotonBudget {
        &self.budget
    }

    /// Breakdown at the configured exposure time.
    pub fn breakdown(&self, magnitude: f64) -> Result<NoiseBreakdown> {
        self.breakdown_at(magnitude, self.config.exposure_time_s)
    }

    /// Breakdown for an exposure time other than the configured one; the
    /// binning time and everything else stay fixed.
    pub fn breakdown_at(&self, magnitude: f64, exposure_time_s: f64) -> Result<NoiseBreakdown> {
        if !(exposure_time_s.is_finite() && exposure_time_s > 0.0) {
            return Err(NoiseError::Configuration(format!(
                "exposure time must be positive, got {exposure_time_s}"
            )));
        }
        let airmass = self.config.airmass;
        let n = self
            .budget
            .n_exposures(exposure_time_s, self.config.binning_time_s)?;
        let binned = self.budget.expected_electrons(magnitude, exposure_time_s, airmass) * n;
        if !(binned.is_finite() && binned > 0.0) {
            return Err(NoiseError::DivisionByZero { electrons: binned });
        }

        let area = self.config.aperture_area_pix();

        let source = binned.sqrt() / binned;

        let read = self.detector.read_noise_e * area.sqrt() * n.sqrt() / binned;

        let sky_electrons = self.config.effective_sky_level() * area * exposure_time_s * n;
        let sky = sky_electrons.sqrt() / binned;

        let per_exposure =
            scintillation_per_exposure(&self.config.scintillation, airmass, exposure_time_s);
        let fractional = per_exposure / n.sqrt();
        let scintillation = match self.config.scintillation_model {
            ScintillationModel::Fractional => fractional,
            ScintillationModel::MagnitudeDeficit => 1.0 - 10f64.powf(-fractional / 2.5),
        };

        let dark = self.detector.dark_current_e_per_s_per_pix.map(|rate| {
            (rate * area * exposure_time_s * n).sqrt() / binned
        });

        Ok(NoiseBreakdown::from_components(
            source,
            sky,
            read,
            scintillation,
            dark,
        ))
    }
}

/// Noise breakdown for `magnitude` at the configured exposure and binning.
pub fn compute_noise_breakdown(
    detector: &DetectorProfile,
    config: &ObservationConfig,
    magnitude: f64,
) -> Result<NoiseBreakdown> {
    NoiseModel::new(detector, config)?.breakdown(magnitude)
}
