//! Sequence helpers used by the detector and by display consumers.
//!
//! All sums accumulate left to right so results are reproducible.

use alloc::vec::Vec;

use crate::error::{Error, Result};

/// Arithmetic mean.
///
/// # Errors
/// `DegenerateInput` on an empty sequence.
pub fn average(xs: &[f64]) -> Result<f64> {
    if xs.is_empty() {
        return Err(Error::DegenerateInput("empty sequence"));
    }
    let sum = xs.iter().fold(0.0, |acc, &x| acc + x);
    Ok(sum / xs.len() as f64)
}

/// Remove the mean, then map the minimum to -1 and the maximum to +1.
///
/// A constant sequence has no spread to rescale; it maps to all zeros.
///
/// # Errors
/// `DegenerateInput` on an empty sequence.
pub fn normalize(xs: &[f64]) -> Result<Vec<f64>> {
    let avg = average(xs)?;
    let (lo, hi) = xs
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| (lo.min(x), hi.max(x)));
    let min = lo - avg;
    let max = hi - avg;
    let span = max - min;
    if span == 0.0 || !span.is_finite() {
        warn!("normalize: no spread in {} samples, returning zeros", xs.len());
        return Ok(alloc::vec![0.0; xs.len()]);
    }
    Ok(xs
        .iter()
        .map(|&x| (x - avg - min) / span * 2.0 - 1.0)
        .collect())
}

/// Elementwise absolute value.
#[must_use]
pub fn absolute(xs: &[f64]) -> Vec<f64> {
    xs.iter().map(|&x| libm::fabs(x)).collect()
}

/// Elementwise multiplication by a constant.
#[must_use]
pub fn scale(xs: &[f64], factor: f64) -> Vec<f64> {
    xs.iter().map(|&x| x * factor).collect()
}

/// Elementwise rounding, half away from zero.
#[must_use]
pub fn round(xs: &[f64]) -> Vec<f64> {
    xs.iter().map(|&x| libm::round(x)).collect()
}

/// Numerical gradient.
///
/// Centred difference `(x[i+1] - x[i-1]) / 2` inside, one-sided difference
/// at both ends. A single sample has gradient zero.
#[must_use]
pub fn gradient(xs: &[f64]) -> Vec<f64> {
    let n = xs.len();
    match n {
        0 => Vec::new(),
        1 => alloc::vec![0.0],
        _ => (0..n)
            .map(|i| {
                if i == 0 {
                    xs[1] - xs[0]
                } else if i == n - 1 {
                    xs[i] - xs[i - 1]
                } else {
                    (xs[i + 1] - xs[i - 1]) / 2.0
                }
            })
            .collect(),
    }
}

/// Elementwise `a[i] > b[i]`, as long as `a`. Positions past the end of
/// `b` are `false`.
#[must_use]
pub fn greater_than(a: &[f64], b: &[f64]) -> Vec<bool> {
    a.iter()
        .enumerate()
        .map(|(i, &x)| b.get(i).is_some_and(|&y| x > y))
        .collect()
}
