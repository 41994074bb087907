use crate::detector::DetectorProfile;
use crate::error::Result;
use crate::observation::{n_exposures, ObservationConfig};

/// Converts magnitudes into expected photo-electron counts for one
/// detector/site combination.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhotonBudget {
    /// Per-second zero point (mag).
    pub zero_point_mag: f64,
    /// Extinction (mag per airmass).
    pub extinction_mag_per_airmass: f64,
    /// Detector readout dead time (s).
    pub read_time_s: f64,
}

impl PhotonBudget {
    pub fn new(detector: &DetectorProfile, config: &ObservationConfig) -> Self {
        Self {
            zero_point_mag: config.zero_point.per_second(),
            extinction_mag_per_airmass: config.extinction_mag_per_airmass,
            read_time_s: detector.read_time(),
        }
    }

    /// Magnitude after atmospheric extinction at `airmass`.
    pub fn extincted_magnitude(&self, magnitude: f64, airmass: f64) -> f64 {
        magnitude + self.extinction_mag_per_airmass * airmass
    }

    /// Electrons per second from a source of `magnitude`.
    pub fn flux_per_second(&self, magnitude: f64, airmass: f64) -> f64 {
        10f64.powf((self.zero_point_mag - self.extincted_magnitude(magnitude, airmass)) / 2.5)
    }

    /// Electrons collected in a single exposure.
    pub fn expected_electrons(&self, magnitude: f64, exposure_time_s: f64, airmass: f64) -> f64 {
        self.flux_per_second(magnitude, airmass) * exposure_time_s
    }

    /// Number of exposures binned into `binning_time_s`.
    pub fn n_exposures(&self, exposure_time_s: f64, binning_time_s: f64) -> Result<f64> {
        n_exposures(exposure_time_s, binning_time_s, self.read_time_s)
    }

    /// Electrons collected over all exposures of a binned integration.
    pub fn binned_electrons(
        &self,
        magnitude: f64,
        exposure_time_s: f64,
        binning_time_s: f64,
        airmass: f64,
    ) -> Result<f64> {
        let n = self.n_exposures(exposure_time_s, binning_time_s)?;
        Ok(self.expected_electrons(magnitude, exposure_time_s, airmass) * n)
    }
}
