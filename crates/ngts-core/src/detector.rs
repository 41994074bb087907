//! CCD detector profiles.
//!
//! A [`DetectorProfile`] bundles the fixed parameters of one camera: readout
//! geometry and clocking (which set the dead time between exposures), the
//! electron/ADU conversion and the saturation limits. Profiles are plain
//! values and the named presets are the only place instrument constants live.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{NoiseError, Result};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectorProfile {
    /// Human-readable instrument name.
    pub name: String,
    /// (columns, rows) in pixels.
    pub pixel_dimensions: (u32, u32),
    /// Time to shift one row vertically (s).
    pub vertical_transfer_time_s: f64,
    /// Horizontal (serial) clock rate (Hz).
    pub horizontal_clock_speed_hz: f64,
    /// Electrons per ADU.
    pub gain_e_per_adu: f64,
    /// Full-well depth (e-).
    pub full_well_depth_e: f64,
    /// Bias pedestal (ADU).
    pub bias_level_adu: f64,
    /// ADC bit depth.
    pub digitisation_bits: u32,
    /// Read noise per pixel (e- RMS).
    pub read_noise_e: f64,
    /// Dark current (e-/s/pix); `None` disables the dark term.
    #[serde(default)]
    pub dark_current_e_per_s_per_pix: Option<f64>,
    /// Plate scale (arcsec/pix), informational.
    #[serde(default)]
    pub pixel_scale_arcsec: Option<f64>,
}

impl DetectorProfile {
    /// Proposed NGTS science camera.
    pub fn ngts() -> Self {
        Self {
            name: "NGTS".into(),
            pixel_dimensions: (2048, 2048),
            vertical_transfer_time_s: 38e-6,
            horizontal_clock_speed_hz: 3e6,
            gain_e_per_adu: 2.1,
            full_well_depth_e: 107e3,
            bias_level_adu: 1667.0,
            digitisation_bits: 16,
            read_noise_e: 15.0,
            dark_current_e_per_s_per_pix: None,
            pixel_scale_arcsec: Some(4.97),
        }
    }

    /// NGTS prototype camera. Only the readout differs from the final camera.
    pub fn ngts_prototype() -> Self {
        Self {
            name: "NGTS prototype".into(),
            pixel_dimensions: (1024, 1024),
            vertical_transfer_time_s: 5.775e-6,
            horizontal_clock_speed_hz: 1e6,
            ..Self::ngts()
        }
    }

    /// SuperWASP camera.
    pub fn wasp() -> Self {
        Self {
            name: "WASP".into(),
            pixel_dimensions: (2048, 2048),
            vertical_transfer_time_s: 16e-6,
            horizontal_clock_speed_hz: 1e6,
            gain_e_per_adu: 2.71,
            full_well_depth_e: 80e3,
            bias_level_adu: 1042.0,
            digitisation_bits: 16,
            read_noise_e: 3.36,
            dark_current_e_per_s_per_pix: None,
            pixel_scale_arcsec: Some(13.7),
        }
    }

    /// Same profile with a dark current term enabled.
    pub fn with_dark_current(mut self, e_per_s_per_pix: f64) -> Self {
        self.dark_current_e_per_s_per_pix = Some(e_per_s_per_pix);
        self
    }

    pub fn validate(&self) -> Result<()> {
        let (columns, rows) = self.pixel_dimensions;
        if columns == 0 || rows == 0 {
            return Err(NoiseError::Configuration(format!(
                "detector dimensions must be positive, got {columns}x{rows}"
            )));
        }
        positive("vertical transfer time", self.vertical_transfer_time_s)?;
        positive("horizontal clock speed", self.horizontal_clock_speed_hz)?;
        positive("gain", self.gain_e_per_adu)?;
        positive("full-well depth", self.full_well_depth_e)?;
        non_negative("bias level", self.bias_level_adu)?;
        non_negative("read noise", self.read_noise_e)?;
        if let Some(dark) = self.dark_current_e_per_s_per_pix {
            non_negative("dark current", dark)?;
        }
        if self.digitisation_bits == 0 || self.digitisation_bits > 32 {
            return Err(NoiseError::Configuration(format!(
                "digitisation must be 1-32 bits, got {}",
                self.digitisation_bits
            )));
        }
        Ok(())
    }

    /// Full-frame readout time (s): every row is shifted vertically, then
    /// clocked out pixel by pixel.
    pub fn read_time(&self) -> f64 {
        let (columns, rows) = self.pixel_dimensions;
        let row_readout = columns as f64 / self.horizontal_clock_speed_hz;
        rows as f64 * (self.vertical_transfer_time_s + row_readout)
    }

    /// Bias pedestal in electrons per pixel.
    pub fn bias_level_e(&self) -> f64 {
        self.bias_level_adu * self.gain_e_per_adu
    }

    /// Largest ADU value the converter can report.
    pub fn max_adu(&self) -> f64 {
        2f64.powi(self.digitisation_bits as i32) - 1.0
    }

    /// ADC ceiling summed over an aperture of `aperture_area_pix` pixels.
    pub fn electronic_saturation_adu(&self, aperture_area_pix: f64) -> f64 {
        self.max_adu() * aperture_area_pix
    }
}

impl fmt::Display for DetectorProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (columns, rows) = self.pixel_dimensions;
        write!(
            f,
            "{}: {}x{} pix, {:.1} MHz horizontal, {:.1} us vertical",
            self.name,
            columns,
            rows,
            self.horizontal_clock_speed_hz / 1e6,
            self.vertical_transfer_time_s / 1e-6
        )
    }
}

/// Named detector selection for config files.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectorPreset {
    #[default]
    Ngts,
    NgtsPrototype,
    Wasp,
    Custom(DetectorProfile),
}

impl DetectorPreset {
    /// Build and validate the profile.
    pub fn resolve(&self) -> Result<DetectorProfile> {
        let profile = match self {
            Self::Ngts => DetectorProfile::ngts(),
            Self::NgtsPrototype => DetectorProfile::ngts_prototype(),
            Self::Wasp => DetectorProfile::wasp(),
            Self::Custom(profile) => profile.clone(),
        };
        profile.validate()?;
        Ok(profile)
    }
}

impl fmt::Display for DetectorPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ngts => write!(f, "NGTS"),
            Self::NgtsPrototype => write!(f, "NGTS prototype"),
            Self::Wasp => write!(f, "WASP"),
            Self::Custom(p) => write!(f, "Custom ({})", p.name),
        }
    }
}

pub(crate) fn positive(what: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(NoiseError::Configuration(format!(
            "{what} must be positive, got {value}"
        )))
    }
}

pub(crate) fn non_negative(what: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(NoiseError::Configuration(format!(
            "{what} must be non-negative, got {value}"
        )))
    }
}
