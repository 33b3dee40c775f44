//! Peak Detector Tests
//!
//! Detection on synthetic pulse trains, refractory gating and rate.
//! Run with: cargo test -p pulse-dsp-core --test detector_tests

use pulse_dsp_core::array::{gradient, normalize};
use pulse_dsp_core::peaks::{find_regions, smooth_boxcar};
use pulse_dsp_core::{heart_rate, DetectorConfig, Error, PeakDetector, Region};

const SAMPLE_RATE: f64 = 60.0;

/// Unit impulses on an optional linear ramp.
fn pulse_train(len: usize, positions: &[usize], slope: f64) -> Vec<f64> {
    let mut signal: Vec<f64> = (0..len).map(|i| slope * i as f64).collect();
    for &p in positions {
        signal[p] += 1.0;
    }
    signal
}

fn detector(config: DetectorConfig) -> PeakDetector {
    PeakDetector::new(SAMPLE_RATE, config).unwrap()
}

// =============================================================================
// Detection Tests
// =============================================================================

#[test]
fn test_impulses_are_found_exactly() {
    let positions = [60, 130, 200, 270, 340, 410, 480, 550, 620];
    let signal = pulse_train(700, &positions, 0.0);
    let peaks = detector(DetectorConfig::default()).find_peaks(&signal);
    assert_eq!(peaks, positions);
}

#[test]
fn test_linear_drift_does_not_move_peaks() {
    let positions = [60, 130, 200, 270, 340, 410, 480, 550, 620];
    let signal = pulse_train(700, &positions, 1e-3);
    let peaks = detector(DetectorConfig::default()).find_peaks(&signal);
    assert_eq!(peaks, positions);
}

#[test]
fn test_activity_marks_the_upstroke() {
    let signal = pulse_train(200, &[100], 0.0);
    let active = detector(DetectorConfig::default()).activity(&signal);
    assert_eq!(find_regions(&active), vec![Region { start: 96, end: 105 }]);
}

#[test]
fn test_pulse_at_buffer_end_is_dropped() {
    // The last region never falls back below threshold
    let signal = pulse_train(200, &[100, 198], 0.0);
    let peaks = detector(DetectorConfig::default()).find_peaks(&signal);
    assert_eq!(peaks, vec![100]);
}

// =============================================================================
// Refractory Gate Tests
// =============================================================================

#[test]
fn test_early_pulse_is_gated_from_origin() {
    let signal = pulse_train(300, &[10, 100, 190], 0.0);

    let gated = detector(DetectorConfig::default()).find_peaks(&signal);
    assert_eq!(gated, vec![100, 190]);

    let config = DetectorConfig {
        gate_from_origin: false,
        ..DetectorConfig::default()
    };
    assert_eq!(detector(config).find_peaks(&signal), vec![10, 100, 190]);
}

#[test]
fn test_close_pulses_are_suppressed() {
    let config = DetectorConfig {
        min_peak_delay: 1.0,
        ..DetectorConfig::default()
    };
    let signal = pulse_train(400, &[100, 150, 300], 0.0);
    assert_eq!(detector(config).find_peaks(&signal), vec![100, 300]);
}

#[test]
fn test_peaks_respect_refractory_delay() {
    // Irregular multi-tone trace with no clean pulses
    let signal: Vec<f64> = (0..2000)
        .map(|i| {
            let t = i as f64 / SAMPLE_RATE;
            (7.3 * t).sin() + 0.6 * (19.1 * t).sin() + 0.3 * ((i * 37 % 11) as f64 / 11.0)
        })
        .collect();

    let det = detector(DetectorConfig::default());
    let peaks = det.find_peaks(&signal);
    let min_delay = det.min_delay_samples();

    if let Some(&first) = peaks.first() {
        assert!(first > min_delay, "first peak {} inside gate", first);
    }
    for pair in peaks.windows(2) {
        assert!(
            pair[1] > pair[0] && pair[1] - pair[0] > min_delay,
            "peaks {} and {} too close",
            pair[0],
            pair[1]
        );
    }
    for &p in &peaks {
        assert!(p < signal.len());
    }
}

// =============================================================================
// Rate Tests
// =============================================================================

#[test]
fn test_rate_of_one_pulse_per_second() {
    let positions: Vec<usize> = (1..=10).map(|k| k * 60).collect();
    let signal = pulse_train(700, &positions, 0.0);
    assert_eq!(detector(DetectorConfig::default()).rate(&signal), Ok(60.0));
}

#[test]
fn test_rate_scales_with_sample_rate() {
    assert_eq!(heart_rate(&[60, 120, 180], 60.0), Ok(60.0));
    assert_eq!(heart_rate(&[60, 120, 180], 30.0), Ok(30.0));
    assert_eq!(heart_rate(&[0, 25, 50], 50.0), Ok(120.0));
}

#[test]
fn test_single_pulse_has_no_rate() {
    let signal = pulse_train(300, &[150], 0.0);
    assert_eq!(
        detector(DetectorConfig::default()).rate(&signal),
        Err(Error::InsufficientData { peaks: 1 })
    );
}

// =============================================================================
// Helper Property Tests
// =============================================================================

#[test]
fn test_boxcar_preserves_constants() {
    for size in [0, 1, 2, 5, 45, 500] {
        assert_eq!(smooth_boxcar(&[2.5; 40], size), vec![2.5; 40]);
    }
}

#[test]
fn test_boxcar_output_length() {
    let xs: Vec<f64> = (0..17).map(|i| i as f64).collect();
    for size in [0, 3, 8, 40] {
        assert_eq!(smooth_boxcar(&xs, size).len(), xs.len());
    }
    assert!(smooth_boxcar(&[], 5).is_empty());
}

#[test]
fn test_gradient_of_ramp_is_constant() {
    let ramp: Vec<f64> = (0..10).map(|i| 3.0 * i as f64 - 4.0).collect();
    assert_eq!(gradient(&ramp), vec![3.0; 10]);
}

#[test]
fn test_normalize_is_shift_invariant() {
    let xs = [0.0, 4.0, 1.0, -2.0, 3.0];
    let shifted: Vec<f64> = xs.iter().map(|x| x + 100.0).collect();
    let a = normalize(&xs).unwrap();
    let b = normalize(&shifted).unwrap();
    for (x, y) in a.iter().zip(&b) {
        assert!((x - y).abs() < 1e-12);
    }
}
