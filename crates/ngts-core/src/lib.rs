pub mod config;
pub mod consts;
pub mod detector;
pub mod error;
pub mod fit;
pub mod grid;
pub mod observation;
pub mod photometry;
pub mod precision;
pub mod search;
pub mod survey;
pub mod sweep;

pub use detector::DetectorProfile;
pub use error::{NoiseError, Result};
pub use observation::{ObservationConfig, SkyType};
pub use photometry::{compute_noise_breakdown, NoiseBreakdown};
pub use search::{compute_cross_point, compute_saturation_time, CrossPoint, SaturationPoint};
