use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::consts::{FWHM_TO_SIGMA, PSF_CELLS_PER_PIXEL, PSF_INFINITY_FWHM};
use crate::detector::positive;
use crate::error::Result;

/// Unnormalised isotropic 2D Gaussian PSF.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GaussianPsf {
    pub fwhm: f64,
    /// Centre of the PSF relative to the centre of the pixel of interest.
    pub offset: (f64, f64),
}

impl GaussianPsf {
    pub fn new(fwhm: f64, offset: (f64, f64)) -> Result<Self> {
        positive("FWHM", fwhm)?;
        Ok(Self { fwhm, offset })
    }

    pub fn sigma(&self) -> f64 {
        self.fwhm / FWHM_TO_SIGMA
    }

    /// Peak-normalised intensity at `(x, y)`.
    pub fn value(&self, x: f64, y: f64) -> f64 {
        let s = self.sigma();
        let dx = x - self.offset.0;
        let dy = y - self.offset.1;
        (-(dx * dx + dy * dy) / (2.0 * s * s)).exp()
    }

    /// Integral over the box `[x0, x1] x [y0, y1]`.
    ///
    /// Tensor-product composite Simpson rule. The Gaussian is separable, so
    /// the double sum factors into the product of the two axis sums.
    pub fn box_integral(&self, x: (f64, f64), y: (f64, f64)) -> f64 {
        let s = self.sigma();
        let profile = |c: f64, t: f64| (-(t - c) * (t - c) / (2.0 * s * s)).exp();
        let ix = simpson(|t| profile(self.offset.0, t), x.0, x.1, cells_for(x.1 - x.0));
        let iy = simpson(|t| profile(self.offset.1, t), y.0, y.1, cells_for(y.1 - y.0));
        ix * iy
    }

    /// Integral over the whole plane, truncated at `PSF_INFINITY_FWHM` FWHM
    /// either side of the centre.
    pub fn total_integral(&self) -> f64 {
        let half = PSF_INFINITY_FWHM * self.fwhm;
        let (ox, oy) = self.offset;
        self.box_integral((ox - half, ox + half), (oy - half, oy + half))
    }

    /// Fraction of the flux landing in the unit pixel centred on the origin.
    pub fn central_pixel_fraction(&self) -> f64 {
        self.box_integral((-0.5, 0.5), (-0.5, 0.5)) / self.total_integral()
    }
}

/// Fraction of a Gaussian PSF's flux falling in the pixel it is centred on
/// (or offset from by `offset` pixels).
pub fn central_pixel_fraction(fwhm: f64, offset: (f64, f64)) -> Result<f64> {
    Ok(GaussianPsf::new(fwhm, offset)?.central_pixel_fraction())
}

/// Central pixel fraction as the PSF moves away from the pixel centre.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OffsetCurve {
    pub fwhm: f64,
    /// Displacement from the pixel centre (pix).
    pub distance: Vec<f64>,
    /// Fraction for an offset of `(d, 0)`.
    pub horizontal: Vec<f64>,
    /// Fraction for an offset of `(d, d)`.
    pub diagonal: Vec<f64>,
}

/// Sample the central pixel fraction at `samples` log-spaced distances from
/// 0.01 pix out to three FWHM.
pub fn offset_curve(fwhm: f64, samples: usize) -> Result<OffsetCurve> {
    positive("FWHM", fwhm)?;
    let distance = Array1::logspace(10.0, -2.0, (3.0 * fwhm).log10(), samples).to_vec();
    let mut horizontal = Vec::with_capacity(samples);
    let mut diagonal = Vec::with_capacity(samples);
    for &d in &distance {
        horizontal.push(GaussianPsf::new(fwhm, (d, 0.0))?.central_pixel_fraction());
        diagonal.push(GaussianPsf::new(fwhm, (d, d))?.central_pixel_fraction());
    }
    Ok(OffsetCurve {
        fwhm,
        distance,
        horizontal,
        diagonal,
    })
}

fn cells_for(width: f64) -> usize {
    let n = (width.abs() * PSF_CELLS_PER_PIXEL as f64).ceil() as usize;
    // Simpson needs an even, non-zero cell count.
    (n.max(2) + 1) & !1
}

/// Composite Simpson rule over `n` (even) cells.
pub(crate) fn simpson(f: impl Fn(f64) -> f64, a: f64, b: f64, n: usize) -> f64 {
    let h = (b - a) / n as f64;
    let samples = Array1::linspace(a, b, n + 1).mapv(f);
    let weights = Array1::from_shape_fn(n + 1, |i| match i {
        0 => 1.0,
        i if i == n => 1.0,
        i if i % 2 == 1 => 4.0,
        _ => 2.0,
    });
    weights.dot(&samples) * h / 3.0
}
