//! Filter Design Module
//!
//! Derives the biquad cascade for a highpass Butterworth response. All
//! calculations happen once at design time, never per sample.
//!
//! The procedure is the textbook one: place the analog Butterworth poles on
//! the unit circle, invert them into highpass poles at the pre-warped cutoff,
//! map each conjugate pair through the bilinear transform, and normalise
//! every section to unity gain at Nyquist. The accumulated gain is folded
//! into the first section.

use core::f64::consts::PI;

use crate::config::{DEFAULT_BANDWIDTH, DEFAULT_CUTOFF_HZ, DEFAULT_ORDER, DEFAULT_SAMPLE_RATE_HZ};
use crate::config::{MAX_ORDER, MAX_SECTIONS};
use crate::error::{Error, Result};
use crate::filter::Cascade;
use crate::types::{Complex, SampleRate};

/// Filter response family
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Characteristic {
    /// Maximally flat passband magnitude
    #[default]
    Butterworth,
}

/// Filter design parameters.
///
/// `bandwidth` and `gain` are carried for band and peaking designs; they
/// are validated but do not affect a highpass cascade.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FilterConfig {
    /// Filter order, even, 2 to 24
    pub order: u32,
    /// Response family
    pub characteristic: Characteristic,
    /// Sampling rate in Hz
    pub sampling_rate: f64,
    /// -3 dB cutoff frequency in Hz
    pub cutoff_frequency: f64,
    /// Bandwidth in Hz (band designs only)
    pub bandwidth: f64,
    /// Gain in dB (peaking and shelving designs only)
    pub gain: f64,
    /// Keep the cascade gain as a separate multiplier instead of scaling
    /// the first section's numerator taps
    pub pre_gain: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            order: DEFAULT_ORDER,
            characteristic: Characteristic::Butterworth,
            sampling_rate: DEFAULT_SAMPLE_RATE_HZ,
            cutoff_frequency: DEFAULT_CUTOFF_HZ,
            bandwidth: DEFAULT_BANDWIDTH,
            gain: 0.0,
            pre_gain: false,
        }
    }
}

impl FilterConfig {
    /// Highpass configuration with default order.
    #[must_use]
    pub fn highpass(sampling_rate: f64, cutoff_frequency: f64) -> Self {
        Self {
            sampling_rate,
            cutoff_frequency,
            ..Self::default()
        }
    }

    /// Set the filter order.
    #[must_use]
    pub const fn with_order(mut self, order: u32) -> Self {
        self.order = order;
        self
    }

    /// Check every field, returning the validated sampling rate.
    ///
    /// # Errors
    /// `InvalidParameter` naming the first offending field.
    pub fn validate(&self) -> Result<SampleRate> {
        if self.order == 0 || self.order % 2 != 0 || self.order > MAX_ORDER {
            return Err(Error::InvalidParameter("order"));
        }
        let rate = SampleRate::new(self.sampling_rate)?;
        let fc = self.cutoff_frequency;
        if !(fc.is_finite() && fc > 0.0 && fc < rate.nyquist()) {
            return Err(Error::InvalidParameter("cutoff_frequency"));
        }
        if !(self.bandwidth.is_finite() && self.bandwidth > 0.0) {
            return Err(Error::InvalidParameter("bandwidth"));
        }
        if !self.gain.is_finite() {
            return Err(Error::InvalidParameter("gain"));
        }
        Ok(rate)
    }
}

/// Biquad section coefficients (design form)
///
/// Transfer function:
/// ```text
/// H(z) = k * (b0 + b1*z^-1 + b2*z^-2) / (1 + a1*z^-1 + a2*z^-2)
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SectionCoeffs {
    /// Numerator taps `[b0, b1, b2]`
    pub b: [f64; 3],
    /// Denominator taps `[a1, a2]` (a0 is normalised to 1)
    pub a: [f64; 2],
    /// Gain applied before the numerator
    pub k: f64,
}

impl SectionCoeffs {
    /// Unity (pass-through) coefficients
    pub const UNITY: Self = Self {
        b: [1.0, 0.0, 0.0],
        a: [0.0, 0.0],
        k: 1.0,
    };

    /// Create section coefficients.
    ///
    /// # Errors
    /// `InvalidParameter("b0")` when `b0` is zero, `InvalidParameter("coefficients")`
    /// when any tap is not finite.
    pub fn new(b: [f64; 3], a: [f64; 2], k: f64) -> Result<Self> {
        let all_finite = b.iter().chain(a.iter()).all(|c| c.is_finite()) && k.is_finite();
        if !all_finite {
            return Err(Error::InvalidParameter("coefficients"));
        }
        if b[0] == 0.0 {
            return Err(Error::InvalidParameter("b0"));
        }
        Ok(Self { b, a, k })
    }

    /// Numerator in ratio form `(b1/b0, b2/b0)`.
    #[must_use]
    pub fn numerator_ratio(&self) -> (f64, f64) {
        (self.b[1] / self.b[0], self.b[2] / self.b[0])
    }

    /// Zeros and poles of this section.
    #[must_use]
    pub fn pole_zero(&self) -> PoleZero {
        let (n1, n2) = self.numerator_ratio();
        PoleZero {
            zeros: quadratic_roots(n1, n2),
            poles: quadratic_roots(self.a[0], self.a[1]),
        }
    }
}

impl Default for SectionCoeffs {
    fn default() -> Self {
        Self::UNITY
    }
}

/// Zeros and poles of one biquad section
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PoleZero {
    /// Roots of the numerator
    pub zeros: [Complex; 2],
    /// Roots of the denominator
    pub poles: [Complex; 2],
}

impl PoleZero {
    /// Whether both poles lie strictly inside the unit circle.
    #[must_use]
    pub fn is_stable(&self) -> bool {
        self.poles.iter().all(|p| p.magnitude() < 1.0)
    }

    /// Largest pole radius; how close the section is to instability.
    #[must_use]
    pub fn pole_radius(&self) -> f64 {
        self.poles[0].magnitude().max(self.poles[1].magnitude())
    }

    /// Frequency in Hz at which the first pole sits.
    #[must_use]
    pub fn pole_frequency(&self, sample_rate: f64) -> f64 {
        libm::fabs(self.poles[0].phase()) * sample_rate / (2.0 * PI)
    }
}

/// Roots of `z^2 + n1*z + n2`.
fn quadratic_roots(n1: f64, n2: f64) -> [Complex; 2] {
    let half = -n1 / 2.0;
    let inner = (n1 / 2.0) * (n1 / 2.0) - n2;
    if inner < 0.0 {
        let im = libm::sqrt(-inner);
        [Complex::new(half, im), Complex::new(half, -im)]
    } else {
        let root = libm::sqrt(inner);
        [Complex::from_real(half + root), Complex::from_real(half - root)]
    }
}

/// `n!` by iterative accumulation.
///
/// # Errors
/// `InvalidParameter("factorial")` when the result does not fit in `u64`.
pub fn factorial(n: u32) -> Result<u64> {
    let mut acc: u64 = 1;
    for i in 2..=u64::from(n) {
        acc = acc.checked_mul(i).ok_or(Error::InvalidParameter("factorial"))?;
    }
    Ok(acc)
}

/// Binomial coefficient `n choose k`.
///
/// # Errors
/// `InvalidParameter` when `k > n` or an intermediate factorial overflows.
pub fn binomial(n: u32, k: u32) -> Result<u64> {
    if k > n {
        return Err(Error::InvalidParameter("binomial"));
    }
    let denom = factorial(k)?
        .checked_mul(factorial(n - k)?)
        .ok_or(Error::InvalidParameter("factorial"))?;
    Ok(factorial(n)? / denom)
}

/// Numerator taps of a second-order highpass section: the signed binomial
/// expansion of `(1 - z^-1)^2`, a double zero at DC.
fn highpass_numerator() -> Result<[f64; 3]> {
    let mut taps = [0.0; 3];
    for (k, tap) in (0u32..).zip(taps.iter_mut()) {
        let c = binomial(2, k)? as f64;
        *tap = if k % 2 == 0 { c } else { -c };
    }
    Ok(taps)
}

/// A designed cascade: validated configuration plus section coefficients.
///
/// Immutable and cheap to clone. Runtime state lives in [`Cascade`], one
/// per run, created with [`Design::cascade`].
#[derive(Clone, Debug, PartialEq)]
pub struct Design {
    config: FilterConfig,
    sections: heapless::Vec<SectionCoeffs, MAX_SECTIONS>,
}

impl Design {
    /// Design a highpass cascade of `order / 2` sections.
    ///
    /// # Errors
    /// `InvalidParameter` when the configuration is out of range.
    pub fn highpass(config: FilterConfig) -> Result<Self> {
        let rate = config.validate()?;
        let fs = rate.hz();
        let order = config.order;

        let two_fs = Complex::from_real(2.0 * fs);
        // Pre-warp so the bilinear transform lands the -3 dB point on fc
        let warped = Complex::from_real(2.0 * fs * libm::tan(PI * config.cutoff_frequency / fs));
        let numerator = highpass_numerator()?;
        let nyquist_numerator = numerator[0] - numerator[1] + numerator[2];

        let mut sections = heapless::Vec::new();
        let mut total_gain = 1.0;
        for m in 0..order / 2 {
            let theta = PI * f64::from(2 * m + 1) / f64::from(2 * order);
            // Upper-half-plane pole of the unit-cutoff lowpass prototype
            let prototype = Complex::new(-libm::sin(theta), libm::cos(theta));
            let analog = warped / prototype;
            let pole = (two_fs + analog) / (two_fs - analog);

            let a1 = -2.0 * pole.re;
            let a2 = pole.magnitude_squared();
            total_gain *= (1.0 - a1 + a2) / nyquist_numerator;

            let section = SectionCoeffs::new(numerator, [a1, a2], 1.0)?;
            sections
                .push(section)
                .map_err(|_| Error::InvalidParameter("order"))?;
        }

        if let Some(first) = sections.first_mut() {
            if config.pre_gain {
                first.k = total_gain;
            } else {
                for tap in &mut first.b {
                    *tap *= total_gain;
                }
            }
        }

        debug!(
            "designed highpass: order {}, fc {} Hz, fs {} Hz, gain {}",
            order,
            config.cutoff_frequency,
            fs,
            total_gain
        );

        Ok(Self { config, sections })
    }

    /// The configuration this design was built from.
    #[must_use]
    pub const fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Section coefficients, in cascade order.
    #[must_use]
    pub fn sections(&self) -> &[SectionCoeffs] {
        &self.sections
    }

    /// Number of sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether the design has no sections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// A fresh, idle runtime cascade for one run.
    #[must_use]
    pub fn cascade(&self) -> Cascade {
        Cascade::from_coeffs(&self.sections)
    }

    /// Zeros and poles of every section.
    #[must_use]
    pub fn poles_zeros(&self) -> heapless::Vec<PoleZero, MAX_SECTIONS> {
        self.sections.iter().map(SectionCoeffs::pole_zero).collect()
    }

    /// Whether every pole lies inside the unit circle.
    #[must_use]
    pub fn is_stable(&self) -> bool {
        self.sections.iter().all(|s| s.pole_zero().is_stable())
    }
}
