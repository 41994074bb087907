mod common;

use common::ngts_setup;
use ngts_core::grid::{LinearGrid, LogGrid};
use ngts_core::observation::SkyType;
use ngts_core::search::cross_point::find_cross_point;
use ngts_core::search::saturation::find_saturation_time;
use ngts_core::search::{
    compute_cross_point, compute_saturation_time, cross_point_from_samples,
    saturation_from_samples, SearchPolicy,
};
use ngts_core::NoiseError;

// ---------------------------------------------------------------------------
// Saturation on samples
// ---------------------------------------------------------------------------

#[test]
fn test_saturation_interpolates_between_samples() {
    let times = [1.0, 2.0, 3.0, 4.0];
    let electrons = [10.0, 20.0, 30.0, 40.0];
    let p = saturation_from_samples(&times, &electrons, 25.0, SearchPolicy::Interpolated).unwrap();
    assert!((p.exposure_time_s - 2.5).abs() < 1e-12, "got: {}", p.exposure_time_s);
    assert!(p.threshold_crossed);
}

#[test]
fn test_saturation_nearest_sample_snaps_up() {
    let times = [1.0, 2.0, 3.0, 4.0];
    let electrons = [10.0, 20.0, 30.0, 40.0];
    let p = saturation_from_samples(&times, &electrons, 25.0, SearchPolicy::NearestSample).unwrap();
    assert_eq!(p.exposure_time_s, 3.0);
    assert!(p.threshold_crossed);
}

#[test]
fn test_saturation_sample_order_irrelevant() {
    let times = [4.0, 1.0, 3.0, 2.0];
    let electrons = [40.0, 10.0, 30.0, 20.0];
    let p = saturation_from_samples(&times, &electrons, 25.0, SearchPolicy::Interpolated).unwrap();
    assert!((p.exposure_time_s - 2.5).abs() < 1e-12);
}

#[test]
fn test_saturated_from_first_sample() {
    let p = saturation_from_samples(&[1.0, 2.0], &[30.0, 40.0], 25.0, SearchPolicy::Interpolated)
        .unwrap();
    assert_eq!(p.exposure_time_s, 1.0);
    assert!(!p.threshold_crossed);
}

#[test]
fn test_never_saturates() {
    let err = saturation_from_samples(
        &[1.0, 2.0, 4.0],
        &[10.0, 20.0, 40.0],
        100.0,
        SearchPolicy::Interpolated,
    )
    .unwrap_err();
    match err {
        NoiseError::NoSaturationFound {
            max_exposure_s,
            peak_electrons,
            full_well,
        } => {
            assert_eq!(max_exposure_s, 4.0);
            assert_eq!(peak_electrons, 40.0);
            assert_eq!(full_well, 100.0);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_saturation_empty_and_mismatched() {
    assert_eq!(
        saturation_from_samples(&[], &[], 1.0, SearchPolicy::Interpolated),
        Err(NoiseError::EmptyGrid)
    );
    assert!(matches!(
        saturation_from_samples(&[1.0], &[1.0, 2.0], 1.0, SearchPolicy::Interpolated),
        Err(NoiseError::Configuration(_))
    ));
}

// ---------------------------------------------------------------------------
// Saturation on the NGTS model
// ---------------------------------------------------------------------------

#[test]
fn test_ngts_magnitude_16_saturation_time() {
    let (detector, config) = ngts_setup();
    let grid = LogGrid::default().build().unwrap();
    let p = compute_saturation_time(&detector, &config, 16.0, &grid).unwrap();
    // The central pixel count is linear in time, so interpolation is exact.
    assert!((p.exposure_time_s - 388.248).abs() < 0.05, "got: {}", p.exposure_time_s);
    assert!(p.threshold_crossed);
}

#[test]
fn test_nearest_sample_is_first_saturated_grid_point() {
    let (detector, config) = ngts_setup();
    let grid = LogGrid::default().build().unwrap();
    let interp =
        find_saturation_time(&detector, &config, 16.0, &grid, SearchPolicy::Interpolated).unwrap();
    let snapped =
        find_saturation_time(&detector, &config, 16.0, &grid, SearchPolicy::NearestSample).unwrap();
    assert!(grid.iter().any(|&t| t == snapped.exposure_time_s));
    assert!(snapped.exposure_time_s >= interp.exposure_time_s);
}

#[test]
fn test_saturation_time_non_decreasing_for_faint_stars() {
    let (detector, config) = ngts_setup();
    let grid = LogGrid::default().build().unwrap();
    let times: Vec<f64> = (0..=8)
        .map(|i| {
            compute_saturation_time(&detector, &config, 16.0 + 0.25 * i as f64, &grid)
                .unwrap()
                .exposure_time_s
        })
        .collect();
    for w in times.windows(2) {
        assert!(w[1] >= w[0], "saturation times not monotonic: {times:?}");
    }
}

#[test]
fn test_bright_sky_saturates_sooner() {
    let (detector, config) = ngts_setup();
    let grid = LogGrid::default().build().unwrap();
    let dark = compute_saturation_time(&detector, &config, 14.0, &grid).unwrap();
    let bright_config = config.with_sky(SkyType::Bright);
    let bright = compute_saturation_time(&detector, &bright_config, 14.0, &grid).unwrap();
    assert!(bright.exposure_time_s < dark.exposure_time_s);
}

#[test]
fn test_bright_star_saturated_below_grid() {
    let (detector, config) = ngts_setup();
    let grid = LogGrid::default().build().unwrap();
    let p = compute_saturation_time(&detector, &config, 8.0, &grid).unwrap();
    assert!(!p.threshold_crossed);
    assert!((p.exposure_time_s - 5.0).abs() < 1e-9);
}

#[test]
fn test_faint_star_short_grid_never_saturates() {
    let (detector, config) = ngts_setup();
    let grid = LogGrid {
        start: 5.0,
        end: 100.0,
        samples: 20,
    }
    .build()
    .unwrap();
    let err = compute_saturation_time(&detector, &config, 18.0, &grid).unwrap_err();
    assert!(matches!(err, NoiseError::NoSaturationFound { .. }), "got: {err}");
}

#[test]
fn test_non_positive_grid_time_rejected() {
    let (detector, config) = ngts_setup();
    let grid = ndarray::arr1(&[0.0, 10.0, 100.0]);
    assert!(matches!(
        compute_saturation_time(&detector, &config, 12.0, &grid),
        Err(NoiseError::InvalidExposure(_))
    ));
}

// ---------------------------------------------------------------------------
// Cross-point on samples
// ---------------------------------------------------------------------------

#[test]
fn test_cross_point_interpolated() {
    let mags = [10.0, 11.0, 12.0, 13.0];
    let totals = [1e-4, 6e-4, 1.6e-3, 3e-3];
    let c = cross_point_from_samples(&mags, &totals, 1e-3, SearchPolicy::Interpolated).unwrap();
    assert!((c.magnitude - 11.4).abs() < 1e-9, "got: {}", c.magnitude);
    assert_eq!(c.total_error, 1e-3);
    assert!(c.interpolated);
    assert_eq!(c.resolution, 1.0);
}

#[test]
fn test_cross_point_nearest_sample() {
    let mags = [10.0, 11.0, 12.0, 13.0];
    let totals = [1e-4, 6e-4, 1.6e-3, 3e-3];
    let c = cross_point_from_samples(&mags, &totals, 1e-3, SearchPolicy::NearestSample).unwrap();
    assert_eq!(c.magnitude, 11.0);
    assert_eq!(c.total_error, 6e-4);
    assert!(!c.interpolated);
}

#[test]
fn test_cross_point_tie_takes_first() {
    let c =
        cross_point_from_samples(&[9.0, 10.0], &[1.0, 3.0], 2.0, SearchPolicy::NearestSample).unwrap();
    assert_eq!(c.magnitude, 9.0);
}

#[test]
fn test_cross_point_without_bracket_falls_back() {
    let c = cross_point_from_samples(
        &[9.0, 10.0, 11.0],
        &[1e-4, 2e-4, 4e-4],
        1e-3,
        SearchPolicy::Interpolated,
    )
    .unwrap();
    assert_eq!(c.magnitude, 11.0);
    assert!(!c.interpolated);
}

#[test]
fn test_cross_point_empty_grid() {
    assert_eq!(
        cross_point_from_samples(&[], &[], 1e-3, SearchPolicy::Interpolated),
        Err(NoiseError::EmptyGrid)
    );
}

// ---------------------------------------------------------------------------
// Cross-point on the NGTS model
// ---------------------------------------------------------------------------

#[test]
fn test_ngts_cross_point() {
    let (detector, config) = ngts_setup();
    let grid = LinearGrid::default().build().unwrap();
    let c = compute_cross_point(&detector, &config, &grid).unwrap();
    assert!((c.magnitude - 13.5017).abs() < 0.01, "got: {}", c.magnitude);
    assert!(c.interpolated);
}

#[test]
fn test_ngts_cross_point_nearest_within_resolution() {
    let (detector, config) = ngts_setup();
    let grid = LinearGrid::default().build().unwrap();
    let c = find_cross_point(&detector, &config, &grid, 1e-3, SearchPolicy::NearestSample).unwrap();
    assert!(
        (c.magnitude - 13.5017).abs() <= c.resolution,
        "got: {} (resolution {})",
        c.magnitude,
        c.resolution
    );
    assert!(grid.iter().any(|&m| m == c.magnitude));
}

#[test]
fn test_longer_exposure_moves_cross_point_fainter() {
    let (detector, config) = ngts_setup();
    let grid = LinearGrid::default().build().unwrap();
    let short = compute_cross_point(&detector, &config.clone().with_exposure(5.0), &grid).unwrap();
    let long = compute_cross_point(&detector, &config.with_exposure(30.0), &grid).unwrap();
    assert!(long.magnitude > short.magnitude);
}
