/// Target fractional precision for the cross-point search (1 millimagnitude).
pub const TARGET_PRECISION: f64 = 1e-3;

/// NGTS reference zero point (mag) measured in a 40 s exposure.
pub const NGTS_ZERO_POINT_MAG: f64 = 24.51;

/// Exposure time (s) of the NGTS reference zero point.
pub const NGTS_ZERO_POINT_EXPOSURE_S: f64 = 40.0;

/// Zero point guessed from the SuperWASP data files.
pub const WASP_ZERO_POINT_MAG: f64 = 15.0;

/// Sky background in bright (moon up) time, electrons per second per pixel.
pub const SKY_BRIGHT_E_PER_S_PER_PIX: f64 = 160.0;

/// Sky background in dark time, electrons per second per pixel.
pub const SKY_DARK_E_PER_S_PER_PIX: f64 = 50.0;

/// Scintillation prefactor from the Dravins/Young law (Southworth 2008).
pub const SCINTILLATION_COEFFICIENT: f64 = 0.004;

/// Atmospheric scale height (m) used by the scintillation law.
pub const ATMOSPHERE_SCALE_HEIGHT_M: f64 = 8000.0;

/// NGTS telescope aperture diameter (m).
pub const NGTS_APERTURE_M: f64 = 0.2;

/// SuperWASP telescope aperture diameter (m).
pub const WASP_APERTURE_M: f64 = 0.111;

/// Paranal altitude (m).
pub const PARANAL_ALTITUDE_M: f64 = 2400.0;

/// Conversion from Gaussian FWHM to sigma.
pub const FWHM_TO_SIGMA: f64 = 2.35;

/// Half-width of the quadrature domain standing in for infinity, in units of FWHM.
pub const PSF_INFINITY_FWHM: f64 = 10.0;

/// Quadrature cells across one pixel for the central pixel integral.
/// 200 cells per pixel keeps the Simpson rule well below 1e-5 relative error.
pub const PSF_CELLS_PER_PIXEL: usize = 200;

/// Number of samples in the default magnitude grid.
pub const DEFAULT_MAGNITUDE_SAMPLES: usize = 1000;

/// Bright and faint ends of the default magnitude grid.
pub const DEFAULT_MAGNITUDE_RANGE: (f64, f64) = (7.0, 18.0);

/// Number of samples in the default exposure-time grid.
pub const DEFAULT_EXPOSURE_SAMPLES: usize = 100;

/// Shortest and longest exposure (s) of the default saturation grid.
pub const DEFAULT_EXPOSURE_RANGE_S: (f64, f64) = (5.0, 3600.0);

/// Default binning (total integration) time: one hour.
pub const DEFAULT_BINNING_TIME_S: f64 = 3600.0;

/// Brightest, faintest (inclusive) and step of the saturation table magnitudes.
pub const SATURATION_MAGNITUDES: (f64, f64, f64) = (8.25, 12.75, 0.25);

/// Polynomial order of the bright-sky saturation fit.
pub const BRIGHT_FIT_ORDER: usize = 4;

/// Polynomial order of the dark-sky saturation fit.
pub const DARK_FIT_ORDER: usize = 2;

/// Singular values below this fraction of the largest are treated as zero in fits.
pub const FIT_SINGULAR_EPSILON: f64 = 1e-12;

/// Days per (Julian) year.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Bytes in a megabyte as used for image sizes (1024^2).
pub const BYTES_PER_MB: f64 = 1_048_576.0;

/// Bytes in a terabyte (1024^4).
pub const BYTES_PER_TB: f64 = 1_099_511_627_776.0;
