//! Threshold searches over sampled curves.
//!
//! Both searches work on precomputed samples and are pure. The
//! [`SearchPolicy`] decides between snapping to a grid sample (accurate to
//! the grid spacing) and linearly
//! interpolating between the two samples that bracket the threshold.

pub mod cross_point;
pub mod saturation;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use cross_point::{compute_cross_point, cross_point_from_samples, CrossPoint};
pub use saturation::{
    central_pixel_electrons, compute_saturation_time, saturation_from_samples, SaturationPoint,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPolicy {
    /// Linear interpolation between bracketing samples.
    #[default]
    Interpolated,
    /// Snap to the best grid sample.
    NearestSample,
}

impl fmt::Display for SearchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interpolated => write!(f, "Interpolated"),
            Self::NearestSample => write!(f, "Nearest sample"),
        }
    }
}

/// Linear interpolation of `x` where the line through `(x0, y0)`, `(x1, y1)`
/// reaches `target`.
pub(crate) fn interpolate_crossing(x0: f64, y0: f64, x1: f64, y1: f64, target: f64) -> f64 {
    let dy = y1 - y0;
    if dy == 0.0 {
        return x0;
    }
    x0 + (target - y0) * (x1 - x0) / dy
}
