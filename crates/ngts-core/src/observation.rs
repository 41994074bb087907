//! Observing conditions and photometric setup.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_BINNING_TIME_S, NGTS_APERTURE_M, NGTS_ZERO_POINT_EXPOSURE_S, NGTS_ZERO_POINT_MAG,
    PARANAL_ALTITUDE_M, SKY_BRIGHT_E_PER_S_PER_PIX, SKY_DARK_E_PER_S_PER_PIX, WASP_APERTURE_M,
    WASP_ZERO_POINT_MAG,
};
use crate::detector::{non_negative, positive, DetectorProfile};
use crate::error::{NoiseError, Result};

/// Moon phase class of the sky background.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkyType {
    Bright,
    Dark,
}

impl SkyType {
    pub const ALL: [SkyType; 2] = [SkyType::Bright, SkyType::Dark];

    /// Sky background in electrons per second per pixel.
    pub fn level_e_per_s_per_pix(self) -> f64 {
        match self {
            Self::Bright => SKY_BRIGHT_E_PER_S_PER_PIX,
            Self::Dark => SKY_DARK_E_PER_S_PER_PIX,
        }
    }
}

impl FromStr for SkyType {
    type Err = NoiseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "bright" => Ok(Self::Bright),
            "dark" => Ok(Self::Dark),
            _ => Err(NoiseError::UnsupportedSkyType(s.to_string())),
        }
    }
}

impl fmt::Display for SkyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bright => write!(f, "bright"),
            Self::Dark => write!(f, "dark"),
        }
    }
}

/// Instrumental zero point: the magnitude giving one electron per second.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroPoint {
    /// Zero point measured at a reference exposure time, rescaled to others
    /// assuming a fixed per-second flux: `zp(t) = zp_ref + 2.5 log10(t / t_ref)`.
    Scaled {
        reference_mag: f64,
        reference_exposure_s: f64,
    },
    /// Explicit per-second zero point.
    Fixed(f64),
}

impl ZeroPoint {
    pub fn ngts() -> Self {
        Self::Scaled {
            reference_mag: NGTS_ZERO_POINT_MAG,
            reference_exposure_s: NGTS_ZERO_POINT_EXPOSURE_S,
        }
    }

    pub fn wasp() -> Self {
        Self::Fixed(WASP_ZERO_POINT_MAG)
    }

    /// Zero point for an exposure of `exposure_s` seconds.
    ///
    /// A fixed zero point is a per-second value and scales like the
    /// reference form with a 1 s reference.
    pub fn at(&self, exposure_s: f64) -> f64 {
        match *self {
            Self::Scaled {
                reference_mag,
                reference_exposure_s,
            } => reference_mag + 2.5 * (exposure_s / reference_exposure_s).log10(),
            Self::Fixed(mag) => mag + 2.5 * exposure_s.log10(),
        }
    }

    /// Per-second zero point used for flux conversion.
    pub fn per_second(&self) -> f64 {
        self.at(1.0)
    }

    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::Scaled {
                reference_mag,
                reference_exposure_s,
            } => {
                positive("zero point reference exposure", reference_exposure_s)?;
                finite("zero point", reference_mag)
            }
            Self::Fixed(mag) => finite("zero point", mag),
        }
    }
}

impl Default for ZeroPoint {
    fn default() -> Self {
        Self::ngts()
    }
}

/// Telescope and site parameters of the scintillation law.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScintillationGeometry {
    /// Telescope aperture diameter (m).
    pub aperture_m: f64,
    /// Observatory altitude (m).
    pub altitude_m: f64,
}

impl ScintillationGeometry {
    pub fn ngts() -> Self {
        Self {
            aperture_m: NGTS_APERTURE_M,
            altitude_m: PARANAL_ALTITUDE_M,
        }
    }

    pub fn wasp() -> Self {
        Self {
            aperture_m: WASP_APERTURE_M,
            altitude_m: PARANAL_ALTITUDE_M,
        }
    }
}

impl Default for ScintillationGeometry {
    fn default() -> Self {
        Self::ngts()
    }
}

/// Which form of the scintillation error enters the noise budget.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScintillationModel {
    /// Fractional flux error from the Dravins/Young law, binned in quadrature.
    #[default]
    Fractional,
    /// The binned fractional error expressed as a flux deficit,
    /// `1 - 10^(-scin / 2.5)`.
    MagnitudeDeficit,
}

impl fmt::Display for ScintillationModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fractional => write!(f, "Fractional"),
            Self::MagnitudeDeficit => write!(f, "Magnitude deficit"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservationConfig {
    /// Single science exposure (s).
    pub exposure_time_s: f64,
    /// Total integration the exposures are binned into (s).
    pub binning_time_s: f64,
    pub airmass: f64,
    /// Atmospheric extinction (mag per airmass).
    pub extinction_mag_per_airmass: f64,
    /// Sky background (e-/s/pix).
    pub sky_level_e_per_s_per_pix: f64,
    /// Photometric aperture radius (pix).
    pub aperture_radius_pix: f64,
    /// PSF full width at half maximum (pix).
    pub fwhm_pix: f64,
    pub zero_point: ZeroPoint,
    pub scintillation: ScintillationGeometry,
    pub scintillation_model: ScintillationModel,
    /// Scale the sky level by the extinction above one airmass.
    pub scale_sky_with_airmass: bool,
}

impl Default for ObservationConfig {
    fn default() -> Self {
        Self::ngts()
    }
}

impl ObservationConfig {
    /// Canonical NGTS setup: 10 s exposures binned to an hour, dark sky.
    pub fn ngts() -> Self {
        Self {
            exposure_time_s: 10.0,
            binning_time_s: DEFAULT_BINNING_TIME_S,
            airmass: 1.0,
            extinction_mag_per_airmass: 0.06,
            sky_level_e_per_s_per_pix: SkyType::Dark.level_e_per_s_per_pix(),
            aperture_radius_pix: 1.5,
            fwhm_pix: 1.0,
            zero_point: ZeroPoint::ngts(),
            scintillation: ScintillationGeometry::ngts(),
            scintillation_model: ScintillationModel::Fractional,
            scale_sky_with_airmass: false,
        }
    }

    /// SuperWASP staring setup. The WASP sky estimate is quoted per frame
    /// (400 e- in the aperture for dark time), so it depends on the exposure.
    pub fn wasp(exposure_time_s: f64) -> Self {
        let aperture_radius_pix = 2.5;
        let area = std::f64::consts::PI * aperture_radius_pix * aperture_radius_pix;
        Self {
            exposure_time_s,
            binning_time_s: DEFAULT_BINNING_TIME_S,
            airmass: 1.0,
            extinction_mag_per_airmass: 0.08,
            sky_level_e_per_s_per_pix: 400.0 / area / exposure_time_s,
            aperture_radius_pix,
            fwhm_pix: 1.5,
            zero_point: ZeroPoint::wasp(),
            scintillation: ScintillationGeometry::wasp(),
            scintillation_model: ScintillationModel::Fractional,
            scale_sky_with_airmass: false,
        }
    }

    pub fn with_sky(mut self, sky: SkyType) -> Self {
        self.sky_level_e_per_s_per_pix = sky.level_e_per_s_per_pix();
        self
    }

    pub fn with_exposure(mut self, exposure_time_s: f64) -> Self {
        self.exposure_time_s = exposure_time_s;
        self
    }

    pub fn with_airmass(mut self, airmass: f64) -> Self {
        self.airmass = airmass;
        self
    }

    pub fn aperture_area_pix(&self) -> f64 {
        std::f64::consts::PI * self.aperture_radius_pix * self.aperture_radius_pix
    }

    /// Sky level after the optional airmass scaling.
    pub fn effective_sky_level(&self) -> f64 {
        if self.scale_sky_with_airmass {
            let excess = self.extinction_mag_per_airmass * (self.airmass - 1.0);
            self.sky_level_e_per_s_per_pix * 10f64.powf(excess / 2.5)
        } else {
            self.sky_level_e_per_s_per_pix
        }
    }

    /// Check the parameters that do not depend on the detector.
    pub fn validate(&self) -> Result<()> {
        positive("exposure time", self.exposure_time_s)?;
        positive("binning time", self.binning_time_s)?;
        positive("aperture radius", self.aperture_radius_pix)?;
        positive("FWHM", self.fwhm_pix)?;
        positive("telescope aperture", self.scintillation.aperture_m)?;
        finite("site altitude", self.scintillation.altitude_m)?;
        non_negative("extinction", self.extinction_mag_per_airmass)?;
        non_negative("sky level", self.sky_level_e_per_s_per_pix)?;
        if !(self.airmass.is_finite() && self.airmass >= 1.0) {
            return Err(NoiseError::Configuration(format!(
                "airmass must be at least 1, got {}",
                self.airmass
            )));
        }
        self.zero_point.validate()?;
        if self.binning_time_s < self.exposure_time_s {
            return Err(NoiseError::InvalidExposure(format!(
                "binning time {} s is shorter than exposure time {} s",
                self.binning_time_s, self.exposure_time_s
            )));
        }
        Ok(())
    }

    /// Number of exposures (including readout) that fit in the binning time.
    ///
    /// Fails when the cycle time is not positive or when not even one
    /// exposure fits.
    pub fn n_exposures(&self, detector: &DetectorProfile) -> Result<f64> {
        n_exposures(self.exposure_time_s, self.binning_time_s, detector.read_time())
    }
}

/// `binning_time / (exposure_time + read_time)`, required to be at least one.
pub fn n_exposures(exposure_time_s: f64, binning_time_s: f64, read_time_s: f64) -> Result<f64> {
    let cycle = exposure_time_s + read_time_s;
    if cycle.is_nan() || cycle <= 0.0 {
        return Err(NoiseError::InvalidExposure(format!(
            "exposure plus readout must be positive, got {cycle} s"
        )));
    }
    if binning_time_s < exposure_time_s {
        return Err(NoiseError::InvalidExposure(format!(
            "binning time {binning_time_s} s is shorter than exposure time {exposure_time_s} s"
        )));
    }
    let n = binning_time_s / cycle;
    if n < 1.0 {
        return Err(NoiseError::InvalidExposure(format!(
            "only {n:.3} exposures of {exposure_time_s} s (+{read_time_s:.3} s readout) fit in {binning_time_s} s"
        )));
    }
    Ok(n)
}

fn finite(what: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(NoiseError::Configuration(format!("{what} must be finite")))
    }
}
