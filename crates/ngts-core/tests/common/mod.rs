#![allow(dead_code)]

use ngts_core::detector::DetectorProfile;
use ngts_core::observation::ObservationConfig;

/// NGTS detector with the canonical 10 s / 1 h dark-sky observation.
pub fn ngts_setup() -> (DetectorProfile, ObservationConfig) {
    (DetectorProfile::ngts(), ObservationConfig::ngts())
}

/// Relative closeness check with a readable failure message.
pub fn assert_rel_close(actual: f64, expected: f64, rel: f64) {
    let scale = expected.abs().max(f64::MIN_POSITIVE);
    assert!(
        ((actual - expected) / scale).abs() <= rel,
        "expected {expected}, got {actual} (rel tol {rel})"
    );
}

/// `true` when every element is strictly greater than the one before.
pub fn strictly_increasing(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[1] > w[0])
}
