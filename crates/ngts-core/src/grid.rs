//! Sampling grids for magnitude and exposure-time sweeps.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_EXPOSURE_RANGE_S, DEFAULT_EXPOSURE_SAMPLES, DEFAULT_MAGNITUDE_RANGE,
    DEFAULT_MAGNITUDE_SAMPLES,
};
use crate::detector::positive;
use crate::error::{NoiseError, Result};

/// Evenly spaced samples between `start` and `end` inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinearGrid {
    pub start: f64,
    pub end: f64,
    pub samples: usize,
}

impl LinearGrid {
    pub fn build(&self) -> Result<Array1<f64>> {
        check_samples(self.samples)?;
        if !(self.start.is_finite() && self.end.is_finite()) {
            return Err(NoiseError::Configuration(
                "grid bounds must be finite".into(),
            ));
        }
        Ok(Array1::linspace(self.start, self.end, self.samples))
    }

    /// Spacing between neighbouring samples.
    pub fn step(&self) -> f64 {
        if self.samples < 2 {
            0.0
        } else {
            (self.end - self.start).abs() / (self.samples - 1) as f64
        }
    }
}

impl Default for LinearGrid {
    fn default() -> Self {
        Self {
            start: DEFAULT_MAGNITUDE_RANGE.0,
            end: DEFAULT_MAGNITUDE_RANGE.1,
            samples: DEFAULT_MAGNITUDE_SAMPLES,
        }
    }
}

/// Samples equally spaced in log10 between two positive bounds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogGrid {
    pub start: f64,
    pub end: f64,
    pub samples: usize,
}

impl LogGrid {
    pub fn build(&self) -> Result<Array1<f64>> {
        check_samples(self.samples)?;
        positive("log grid start", self.start)?;
        positive("log grid end", self.end)?;
        let mut grid = Array1::logspace(10.0, self.start.log10(), self.end.log10(), self.samples);
        // 10^log10(x) can land an ulp away from x; keep the bounds exact.
        let last = grid.len() - 1;
        grid[0] = self.start;
        grid[last] = self.end;
        Ok(grid)
    }
}

impl Default for LogGrid {
    fn default() -> Self {
        Self {
            start: DEFAULT_EXPOSURE_RANGE_S.0,
            end: DEFAULT_EXPOSURE_RANGE_S.1,
            samples: DEFAULT_EXPOSURE_SAMPLES,
        }
    }
}

/// Half-open range `[start, end)` stepped by `step`.
pub fn stepped(start: f64, end: f64, step: f64) -> Result<Array1<f64>> {
    positive("grid step", step)?;
    if end <= start {
        return Err(NoiseError::EmptyGrid);
    }
    Ok(Array1::range(start, end, step))
}

/// Mean spacing of a sampled grid, used to report search resolution.
pub fn mean_spacing(grid: &[f64]) -> f64 {
    match grid {
        [] | [_] => 0.0,
        [first, .., last] => (last - first).abs() / (grid.len() - 1) as f64,
    }
}

fn check_samples(samples: usize) -> Result<()> {
    if samples < 2 {
        return Err(NoiseError::Configuration(format!(
            "a grid needs at least 2 samples, got {samples}"
        )));
    }
    Ok(())
}
