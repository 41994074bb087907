use approx::assert_relative_eq;
use ngts_core::photometry::psf::{central_pixel_fraction, offset_curve, GaussianPsf};
use ngts_core::NoiseError;

#[test]
fn test_central_fraction_fwhm_1_5() {
    // erf(0.5 / (sigma sqrt 2))^2 with sigma = 1.5 / 2.35
    let f = central_pixel_fraction(1.5, (0.0, 0.0)).unwrap();
    assert!((f - 0.3210).abs() < 1e-4, "got: {f}");
}

#[test]
fn test_central_fraction_fwhm_1_0() {
    let f = central_pixel_fraction(1.0, (0.0, 0.0)).unwrap();
    assert!((f - 0.5776).abs() < 1e-4, "got: {f}");
}

#[test]
fn test_total_integral_matches_analytic() {
    let psf = GaussianPsf::new(1.5, (0.0, 0.0)).unwrap();
    let sigma = psf.sigma();
    let analytic = 2.0 * std::f64::consts::PI * sigma * sigma;
    assert_relative_eq!(psf.total_integral(), analytic, max_relative = 1e-8);
}

#[test]
fn test_offset_total_integral_matches_analytic() {
    let psf = GaussianPsf::new(1.2, (0.7, -0.4)).unwrap();
    let sigma = psf.sigma();
    let analytic = 2.0 * std::f64::consts::PI * sigma * sigma;
    assert_relative_eq!(psf.total_integral(), analytic, max_relative = 1e-8);
}

#[test]
fn test_box_integral_is_additive() {
    let psf = GaussianPsf::new(1.5, (0.2, -0.1)).unwrap();
    let whole = psf.box_integral((-0.5, 0.5), (-0.5, 0.5));
    let left = psf.box_integral((-0.5, 0.0), (-0.5, 0.5));
    let right = psf.box_integral((0.0, 0.5), (-0.5, 0.5));
    assert_relative_eq!(whole, left + right, max_relative = 1e-8);
}

#[test]
fn test_fraction_decreases_with_width() {
    let narrow = central_pixel_fraction(0.8, (0.0, 0.0)).unwrap();
    let wide = central_pixel_fraction(3.0, (0.0, 0.0)).unwrap();
    assert!(narrow > wide);
    assert!(narrow < 1.0 && wide > 0.0);
}

#[test]
fn test_fraction_symmetric_in_offset() {
    let a = central_pixel_fraction(1.5, (0.3, 0.0)).unwrap();
    let b = central_pixel_fraction(1.5, (-0.3, 0.0)).unwrap();
    let c = central_pixel_fraction(1.5, (0.0, 0.3)).unwrap();
    assert_relative_eq!(a, b, max_relative = 1e-9);
    assert_relative_eq!(a, c, max_relative = 1e-9);
}

#[test]
fn test_offset_lowers_fraction() {
    let centred = central_pixel_fraction(1.5, (0.0, 0.0)).unwrap();
    let offset = central_pixel_fraction(1.5, (0.5, 0.5)).unwrap();
    assert!(offset < centred, "{offset} >= {centred}");
}

#[test]
fn test_non_positive_fwhm_rejected() {
    assert!(matches!(
        central_pixel_fraction(0.0, (0.0, 0.0)),
        Err(NoiseError::Configuration(_))
    ));
    assert!(GaussianPsf::new(-1.0, (0.0, 0.0)).is_err());
}

// ---------------------------------------------------------------------------
// Offset curve
// ---------------------------------------------------------------------------

#[test]
fn test_offset_curve_shape() {
    let curve = offset_curve(1.5, 50).unwrap();
    assert_eq!(curve.distance.len(), 50);
    assert_relative_eq!(curve.distance[0], 0.01, max_relative = 1e-9);
    assert_relative_eq!(curve.distance[49], 4.5, max_relative = 1e-9);
}

#[test]
fn test_offset_curve_decreasing() {
    let curve = offset_curve(1.5, 30).unwrap();
    for w in curve.horizontal.windows(2) {
        assert!(w[1] < w[0], "horizontal not decreasing: {w:?}");
    }
    for w in curve.diagonal.windows(2) {
        assert!(w[1] < w[0], "diagonal not decreasing: {w:?}");
    }
}

#[test]
fn test_diagonal_below_horizontal() {
    let curve = offset_curve(1.5, 20).unwrap();
    for (h, d) in curve.horizontal.iter().zip(&curve.diagonal) {
        assert!(d <= h);
    }
}

#[test]
fn test_offset_curve_starts_near_centred_value() {
    let curve = offset_curve(1.5, 20).unwrap();
    let centred = central_pixel_fraction(1.5, (0.0, 0.0)).unwrap();
    assert!((curve.horizontal[0] - centred).abs() < 1e-3);
}
