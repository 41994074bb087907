pub mod budget;
pub mod noise;
pub mod psf;

pub use budget::PhotonBudget;
pub use noise::{compute_noise_breakdown, NoiseBreakdown, NoiseModel};
pub use psf::{central_pixel_fraction, GaussianPsf};
