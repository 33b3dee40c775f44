//! Streaming biquad cascade.
//!
//! A [`Cascade`] owns the delay-line state of every section. It is created
//! once per run (from a [`Design`](crate::design::Design) or with
//! [`Cascade::reinitialize`]) and advanced exactly one step per sample.
//! Never share one instance between independent runs.

use alloc::vec::Vec;

use crate::config::MAX_SECTIONS;
use crate::design::{PoleZero, SectionCoeffs};
use crate::error::{Error, Result};

/// One biquad section with its delay line (Direct Form II).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Section {
    coeffs: SectionCoeffs,
    /// State variables `[z0, z1]`, most recent first
    z: [f64; 2],
}

impl Section {
    /// Create an idle section.
    #[must_use]
    pub const fn new(coeffs: SectionCoeffs) -> Self {
        Self { coeffs, z: [0.0; 2] }
    }

    /// Process a single sample through this section.
    #[inline]
    pub fn process(&mut self, input: f64) -> f64 {
        let SectionCoeffs { b, a, k } = self.coeffs;
        // New state is computed from the old delay line before either
        // delay value moves.
        let temp = input * k - a[0] * self.z[0] - a[1] * self.z[1];
        let output = b[0] * temp + b[1] * self.z[0] + b[2] * self.z[1];
        self.z[1] = self.z[0];
        self.z[0] = temp;
        output
    }

    /// Reset the delay line to zero.
    pub fn reset(&mut self) {
        self.z = [0.0; 2];
    }

    /// Current delay line `[z0, z1]`.
    #[must_use]
    pub const fn state(&self) -> [f64; 2] {
        self.z
    }

    /// Section coefficients.
    #[must_use]
    pub const fn coeffs(&self) -> SectionCoeffs {
        self.coeffs
    }
}

/// Cascade of biquad sections; section `i` feeds section `i + 1`.
///
/// A cascade with no sections is the identity.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cascade {
    sections: heapless::Vec<Section, MAX_SECTIONS>,
}

impl Cascade {
    /// Build an idle cascade from section coefficients.
    ///
    /// # Errors
    /// `InvalidParameter("sections")` when more than `MAX_SECTIONS` are given.
    pub fn new(coeffs: &[SectionCoeffs]) -> Result<Self> {
        if coeffs.len() > MAX_SECTIONS {
            return Err(Error::InvalidParameter("sections"));
        }
        Ok(Self::from_coeffs(coeffs))
    }

    /// Build from coefficients already known to fit.
    pub(crate) fn from_coeffs(coeffs: &[SectionCoeffs]) -> Self {
        Self {
            sections: coeffs
                .iter()
                .take(MAX_SECTIONS)
                .copied()
                .map(Section::new)
                .collect(),
        }
    }

    /// Process a single sample through every section.
    #[inline]
    pub fn step(&mut self, sample: f64) -> f64 {
        self.sections
            .iter_mut()
            .fold(sample, |acc, section| section.process(acc))
    }

    /// Filter a sequence, continuing from the current state.
    #[must_use]
    pub fn apply_forward(&mut self, input: &[f64]) -> Vec<f64> {
        input.iter().map(|&x| self.step(x)).collect()
    }

    /// Filter a block of samples in place, continuing from the current state.
    pub fn process_block(&mut self, samples: &mut [f64]) {
        for sample in samples.iter_mut() {
            *sample = self.step(*sample);
        }
    }

    /// Forward-backward filtering of a complete buffer.
    ///
    /// Runs forward from the current state, resets, then filters the
    /// time-reversed result and reverses it back. The net phase shift
    /// cancels; the magnitude response is applied twice. Not causal.
    /// The cascade is left holding the backward pass history.
    #[must_use]
    pub fn apply_zero_phase(&mut self, input: &[f64]) -> Vec<f64> {
        let mut output = self.apply_forward(input);
        self.reset();
        for sample in output.iter_mut().rev() {
            *sample = self.step(*sample);
        }
        output
    }

    /// A state-reset copy with the same coefficients. `self` is untouched.
    #[must_use]
    pub fn reinitialize(&self) -> Self {
        let mut fresh = self.clone();
        fresh.reset();
        fresh
    }

    /// Filter a sequence on a reinitialized copy, leaving `self` untouched.
    #[must_use]
    pub fn simulate(&self, input: &[f64]) -> Vec<f64> {
        self.reinitialize().apply_forward(input)
    }

    /// Reset every delay line to zero.
    pub fn reset(&mut self) {
        for section in &mut self.sections {
            section.reset();
        }
    }

    /// Whether every delay line is zero.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.sections.iter().all(|s| s.z == [0.0; 2])
    }

    /// Number of sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether the cascade has no sections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Sections in cascade order.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Coefficients of every section, in cascade order.
    pub fn coefficients(&self) -> impl Iterator<Item = SectionCoeffs> + '_ {
        self.sections.iter().map(Section::coeffs)
    }

    /// Zeros and poles of every section.
    #[must_use]
    pub fn poles_zeros(&self) -> heapless::Vec<PoleZero, MAX_SECTIONS> {
        self.coefficients().map(|c| c.pole_zero()).collect()
    }
}
