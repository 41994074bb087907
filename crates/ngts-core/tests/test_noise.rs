mod common;

use approx::assert_relative_eq;
use common::{assert_rel_close, ngts_setup, strictly_increasing};
use ngts_core::detector::DetectorProfile;
use ngts_core::observation::{ObservationConfig, ScintillationGeometry, ScintillationModel, SkyType};
use ngts_core::photometry::noise::scintillation_per_exposure;
use ngts_core::photometry::{compute_noise_breakdown, NoiseBreakdown, NoiseModel, PhotonBudget};
use ngts_core::NoiseError;

// ---------------------------------------------------------------------------
// Photon budget
// ---------------------------------------------------------------------------

#[test]
fn test_zero_point_scaled_to_one_second() {
    let (detector, config) = ngts_setup();
    let budget = PhotonBudget::new(&detector, &config);
    // 24.51 + 2.5 log10(1 / 40)
    assert_relative_eq!(budget.zero_point_mag, 20.504_85, epsilon = 1e-4);
}

#[test]
fn test_flux_drops_by_100_over_5_mag() {
    let (detector, config) = ngts_setup();
    let budget = PhotonBudget::new(&detector, &config);
    let ratio = budget.flux_per_second(10.0, 1.0) / budget.flux_per_second(15.0, 1.0);
    assert_relative_eq!(ratio, 100.0, max_relative = 1e-12);
}

#[test]
fn test_extinction_dims_source() {
    let (detector, config) = ngts_setup();
    let budget = PhotonBudget::new(&detector, &config);
    assert_relative_eq!(budget.extincted_magnitude(12.0, 2.0), 12.12, epsilon = 1e-12);
    assert!(budget.flux_per_second(12.0, 2.0) < budget.flux_per_second(12.0, 1.0));
}

#[test]
fn test_binned_electrons_is_single_times_count() {
    let (detector, config) = ngts_setup();
    let budget = PhotonBudget::new(&detector, &config);
    let single = budget.expected_electrons(11.0, 10.0, 1.0);
    let binned = budget.binned_electrons(11.0, 10.0, 3600.0, 1.0).unwrap();
    let n = budget.n_exposures(10.0, 3600.0).unwrap();
    assert_relative_eq!(binned, single * n, max_relative = 1e-12);
}

// ---------------------------------------------------------------------------
// Breakdown
// ---------------------------------------------------------------------------

#[test]
fn test_canonical_magnitude_9_total_in_range() {
    let (detector, config) = ngts_setup();
    let b = compute_noise_breakdown(&detector, &config, 9.0).unwrap();
    assert!(
        (1e-4..=5e-4).contains(&b.total),
        "total {} outside [1e-4, 5e-4]",
        b.total
    );
}

#[test]
fn test_canonical_magnitude_9_components() {
    let (detector, config) = ngts_setup();
    let b = compute_noise_breakdown(&detector, &config, 9.0).unwrap();
    assert_rel_close(b.source, 9.178_518_8e-5, 1e-6);
    assert_rel_close(b.sky, 8.870_616_3e-6, 1e-6);
    assert_rel_close(b.read, 5.950_590_3e-6, 1e-6);
    assert_rel_close(b.scintillation, 1.093_904_1e-4, 1e-6);
    assert_rel_close(b.total, 1.431_952_5e-4, 1e-6);
    assert!(b.dark.is_none());
}

#[test]
fn test_total_is_quadrature_sum() {
    let (detector, config) = ngts_setup();
    let model = NoiseModel::new(&detector, &config).unwrap();
    for m in [7.0, 9.5, 12.0, 14.5, 18.0] {
        let b = model.breakdown(m).unwrap();
        let expected =
            (b.source.powi(2) + b.sky.powi(2) + b.read.powi(2) + b.scintillation.powi(2)).sqrt();
        assert_relative_eq!(b.total, expected, max_relative = 1e-9);
    }
}

#[test]
fn test_components_non_negative() {
    let (detector, config) = ngts_setup();
    let model = NoiseModel::new(&detector, &config).unwrap();
    for m in [7.0, 12.0, 18.0] {
        let b = model.breakdown(m).unwrap();
        for v in [b.source, b.sky, b.read, b.scintillation, b.total] {
            assert!(v >= 0.0, "negative component at mag {m}: {b:?}");
        }
    }
}

#[test]
fn test_source_error_grows_with_magnitude() {
    let (detector, config) = ngts_setup();
    let model = NoiseModel::new(&detector, &config).unwrap();
    let sources: Vec<f64> = (0..=44)
        .map(|i| model.breakdown(7.0 + 0.25 * i as f64).unwrap().source)
        .collect();
    assert!(strictly_increasing(&sources));
}

#[test]
fn test_scintillation_independent_of_magnitude() {
    let (detector, config) = ngts_setup();
    let model = NoiseModel::new(&detector, &config).unwrap();
    let a = model.breakdown(8.0).unwrap().scintillation;
    let b = model.breakdown(16.0).unwrap().scintillation;
    assert_eq!(a, b);
}

#[test]
fn test_breakdown_is_deterministic() {
    let (detector, config) = ngts_setup();
    let a = compute_noise_breakdown(&detector, &config, 11.3).unwrap();
    let b = compute_noise_breakdown(&detector, &config, 11.3).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.total.to_bits(), b.total.to_bits());
}

#[test]
fn test_bright_sky_adds_noise() {
    let (detector, config) = ngts_setup();
    let dark = compute_noise_breakdown(&detector, &config, 13.0).unwrap();
    let bright_config = config.with_sky(SkyType::Bright);
    let bright = compute_noise_breakdown(&detector, &bright_config, 13.0).unwrap();
    assert_relative_eq!(bright.sky / dark.sky, (160.0f64 / 50.0).sqrt(), max_relative = 1e-12);
    assert!(bright.total > dark.total);
}

#[test]
fn test_from_components_includes_dark() {
    let b = NoiseBreakdown::from_components(3.0, 0.0, 0.0, 0.0, Some(4.0));
    assert_eq!(b.total, 5.0);
}

// ---------------------------------------------------------------------------
// Dark current
// ---------------------------------------------------------------------------

#[test]
fn test_dark_current_term() {
    let (_, config) = ngts_setup();
    let detector = DetectorProfile::ngts().with_dark_current(1.0);
    let b = compute_noise_breakdown(&detector, &config, 12.0).unwrap();
    let dark = b.dark.expect("dark term present");
    assert!(dark > 0.0);
    let expected = (b.source.powi(2)
        + b.sky.powi(2)
        + b.read.powi(2)
        + b.scintillation.powi(2)
        + dark.powi(2))
    .sqrt();
    assert_relative_eq!(b.total, expected, max_relative = 1e-9);
}

// ---------------------------------------------------------------------------
// Scintillation
// ---------------------------------------------------------------------------

#[test]
fn test_scintillation_per_exposure_value() {
    let s = scintillation_per_exposure(&ScintillationGeometry::ngts(), 1.0, 10.0);
    let expected = 0.004 * 0.2f64.powf(-2.0 / 3.0) * (-0.3f64).exp() / 20f64.sqrt();
    assert_relative_eq!(s, expected, max_relative = 1e-12);
}

#[test]
fn test_scintillation_airmass_power_law() {
    let g = ScintillationGeometry::ngts();
    let ratio = scintillation_per_exposure(&g, 2.0, 10.0) / scintillation_per_exposure(&g, 1.0, 10.0);
    assert_relative_eq!(ratio, 2f64.powf(1.75), max_relative = 1e-12);
}

#[test]
fn test_magnitude_deficit_model() {
    let (detector, config) = ngts_setup();
    let fractional = compute_noise_breakdown(&detector, &config, 10.0).unwrap();
    let deficit_config = ObservationConfig {
        scintillation_model: ScintillationModel::MagnitudeDeficit,
        ..config
    };
    let deficit = compute_noise_breakdown(&detector, &deficit_config, 10.0).unwrap();
    let f = fractional.scintillation;
    assert_relative_eq!(
        deficit.scintillation,
        1.0 - 10f64.powf(-f / 2.5),
        max_relative = 1e-12
    );
    // Small-signal slope of 1 - 10^(-x/2.5) is ln(10) / 2.5.
    assert_relative_eq!(deficit.scintillation / f, 10f64.ln() / 2.5, max_relative = 1e-3);
    assert_eq!(deficit.source, fractional.source);
}

// ---------------------------------------------------------------------------
// Sky scaling
// ---------------------------------------------------------------------------

#[test]
fn test_sky_scales_with_airmass_when_enabled() {
    let config = ObservationConfig {
        scale_sky_with_airmass: true,
        ..ObservationConfig::ngts().with_airmass(2.0)
    };
    assert_relative_eq!(
        config.effective_sky_level(),
        50.0 * 10f64.powf(0.06 / 2.5),
        max_relative = 1e-12
    );
    let fixed = ObservationConfig::ngts().with_airmass(2.0);
    assert_eq!(fixed.effective_sky_level(), 50.0);
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn test_zero_flux_is_division_by_zero() {
    let (detector, config) = ngts_setup();
    let err = compute_noise_breakdown(&detector, &config, f64::INFINITY).unwrap_err();
    assert!(matches!(err, NoiseError::DivisionByZero { .. }), "got: {err}");
}

#[test]
fn test_binning_shorter_than_exposure() {
    let (detector, _) = ngts_setup();
    let config = ObservationConfig {
        binning_time_s: 5.0,
        ..ObservationConfig::ngts()
    };
    let err = compute_noise_breakdown(&detector, &config, 10.0).unwrap_err();
    assert!(matches!(err, NoiseError::InvalidExposure(_)), "got: {err}");
}

#[test]
fn test_less_than_one_exposure_per_bin() {
    let (detector, _) = ngts_setup();
    let config = ObservationConfig {
        binning_time_s: 10.5,
        ..ObservationConfig::ngts()
    };
    let err = compute_noise_breakdown(&detector, &config, 10.0).unwrap_err();
    assert!(matches!(err, NoiseError::InvalidExposure(_)), "got: {err}");
}

#[test]
fn test_airmass_below_one_rejected() {
    let (detector, _) = ngts_setup();
    let config = ObservationConfig::ngts().with_airmass(0.5);
    assert!(matches!(
        compute_noise_breakdown(&detector, &config, 10.0),
        Err(NoiseError::Configuration(_))
    ));
}

#[test]
fn test_negative_aperture_rejected() {
    let (detector, _) = ngts_setup();
    let config = ObservationConfig {
        aperture_radius_pix: -1.0,
        ..ObservationConfig::ngts()
    };
    assert!(NoiseModel::new(&detector, &config).is_err());
}

// ---------------------------------------------------------------------------
// WASP setup
// ---------------------------------------------------------------------------

#[test]
fn test_wasp_setup_produces_breakdown() {
    let detector = DetectorProfile::wasp();
    let config = ObservationConfig::wasp(30.0);
    let b = compute_noise_breakdown(&detector, &config, 10.0).unwrap();
    assert!(b.total > 0.0 && b.total.is_finite());
    // 400 e- of sky in the aperture per frame.
    let sky_per_frame = config.sky_level_e_per_s_per_pix * config.aperture_area_pix() * 30.0;
    assert_relative_eq!(sky_per_frame, 400.0, max_relative = 1e-12);
}
