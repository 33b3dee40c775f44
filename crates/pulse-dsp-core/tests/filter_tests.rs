//! Cascade Filter Tests
//!
//! Design contract and streaming behaviour of the highpass cascade.
//! Run with: cargo test -p pulse-dsp-core --test filter_tests

use pulse_dsp_core::{Cascade, Design, Error, FilterConfig, SectionCoeffs};

const SAMPLE_RATE: f64 = 60.0;

fn highpass(order: u32, cutoff: f64) -> Design {
    Design::highpass(FilterConfig::highpass(SAMPLE_RATE, cutoff).with_order(order)).unwrap()
}

/// Steady-state peak amplitude of a unit sine after the filter settles.
fn sine_gain(design: &Design, freq: f64) -> f64 {
    let mut cascade = design.cascade();
    let n = 6000;
    let output: Vec<f64> = (0..n)
        .map(|i| {
            let t = i as f64 / SAMPLE_RATE;
            cascade.step((2.0 * std::f64::consts::PI * freq * t).sin())
        })
        .collect();
    output[n - 600..].iter().fold(0.0, |m: f64, y| m.max(y.abs()))
}

// =============================================================================
// Design Contract Tests
// =============================================================================

#[test]
fn test_even_orders_give_half_as_many_sections() {
    for order in [2, 4, 6, 8, 10, 12, 24] {
        for cutoff in [0.1, 0.5, 5.0, 29.0] {
            assert_eq!(highpass(order, cutoff).len(), order as usize / 2);
        }
    }
}

#[test]
fn test_odd_order_is_invalid() {
    let config = FilterConfig::highpass(SAMPLE_RATE, 0.5).with_order(5);
    assert_eq!(Design::highpass(config), Err(Error::InvalidParameter("order")));
}

#[test]
fn test_default_config_designs() {
    let design = Design::highpass(FilterConfig::default()).unwrap();
    assert_eq!(design.len(), 5);
    assert!(design.is_stable());
}

#[test]
fn test_first_section_carries_the_gain() {
    let design = highpass(6, 1.0);
    let sections = design.sections();
    assert!(sections[0].b[0] < 1.0);
    for s in &sections[1..] {
        assert_eq!(s.b, [1.0, -2.0, 1.0]);
        assert_eq!(s.k, 1.0);
    }
}

#[test]
fn test_sine_at_cutoff_is_attenuated_3db() {
    let design = highpass(4, 2.0);
    let gain = sine_gain(&design, 2.0);
    assert!(
        (gain - std::f64::consts::FRAC_1_SQRT_2).abs() < 0.01,
        "Cutoff gain: {}",
        gain
    );
}

#[test]
fn test_pulse_band_passes_and_drift_is_removed() {
    let design = highpass(4, 0.5);

    let pass = sine_gain(&design, 1.5);
    assert!(pass > 0.98, "1.5 Hz gain: {}", pass);

    let drift = sine_gain(&design, 0.05);
    assert!(drift < 1e-3, "0.05 Hz gain: {}", drift);
}

// =============================================================================
// Streaming Tests
// =============================================================================

#[test]
fn test_zero_is_a_fixed_point() {
    for order in [2, 10, 24] {
        let mut cascade = highpass(order, 0.5).cascade();
        let output = cascade.apply_forward(&vec![0.0; 500]);
        assert!(output.iter().all(|&y| y == 0.0), "order {}", order);
    }
}

#[test]
fn test_reinitialize_matches_fresh_cascade() {
    let design = highpass(6, 0.5);
    let input: Vec<f64> = (0..400).map(|i| ((i * i) % 17) as f64 - 8.0).collect();

    let mut running = design.cascade();
    let _ = running.apply_forward(&input);

    let expected = design.cascade().apply_forward(&input);
    assert_eq!(running.reinitialize().apply_forward(&input), expected);
}

#[test]
fn test_single_steps_match_batch() {
    let design = highpass(4, 0.5);
    let input: Vec<f64> = (0..100).map(|i| (i as f64 * 0.7).sin()).collect();

    let mut stepper = design.cascade();
    let stepped: Vec<f64> = input.iter().map(|&x| stepper.step(x)).collect();
    assert_eq!(stepped, design.cascade().apply_forward(&input));
}

#[test]
fn test_stability_with_alternating_input() {
    let mut cascade = highpass(24, 0.5).cascade();
    for i in 0..20_000 {
        let input = if i % 2 == 0 { 1.0 } else { -1.0 };
        let output = cascade.step(input);
        assert!(
            output.is_finite() && output.abs() < 10.0,
            "Filter unstable at iteration {}",
            i
        );
    }
}

#[test]
fn test_zero_phase_keeps_pulse_position() {
    let design = highpass(4, 0.5);
    let mut input = vec![0.0; 600];
    input[300] = 1.0;

    let forward = design.cascade().apply_forward(&input);
    let zero_phase = design.cascade().apply_zero_phase(&input);

    let argmax = |xs: &[f64]| {
        xs.iter()
            .enumerate()
            .fold((0, f64::MIN), |best, (i, &y)| if y > best.1 { (i, y) } else { best })
            .0
    };
    assert_eq!(argmax(&forward[..]), 300);
    assert_eq!(argmax(&zero_phase[..]), 300);
    // Pre-echo only exists when filtering backwards
    assert_eq!(forward[290], 0.0);
    assert_ne!(zero_phase[290], 0.0);
}

#[test]
fn test_manual_cascade_from_coefficients() {
    let half = SectionCoeffs::new([1.0, 0.0, 0.0], [0.0, 0.0], 0.5).unwrap();
    let mut cascade = Cascade::new(&[half, half]).unwrap();
    assert_eq!(cascade.apply_forward(&[4.0, 8.0]), vec![1.0, 2.0]);
}
