use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NoiseError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Invalid exposure: {0}")]
    InvalidExposure(String),

    #[error("Non-positive flux ({electrons} e-): fractional errors are undefined")]
    DivisionByZero { electrons: f64 },

    #[error("No saturation within exposure grid (longest {max_exposure_s:.2} s reaches {peak_electrons:.0} of {full_well:.0} e-)")]
    NoSaturationFound {
        max_exposure_s: f64,
        peak_electrons: f64,
        full_well: f64,
    },

    #[error("Unsupported sky type: {0} (expected bright or dark)")]
    UnsupportedSkyType(String),

    #[error("Empty search grid")]
    EmptyGrid,

    #[error("Polynomial fit failed: {0}")]
    Fit(String),
}

pub type Result<T> = std::result::Result<T, NoiseError>;
