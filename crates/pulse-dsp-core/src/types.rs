//! Core types for pulse DSP processing.

use crate::error::{Error, Result};

/// Complex number used during coefficient derivation and root analysis.
///
/// Only the designer and the pole/zero helpers use it; samples themselves
/// are plain `f64`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Complex {
    /// Real part
    pub re: f64,
    /// Imaginary part
    pub im: f64,
}

impl Complex {
    /// Zero.
    pub const ZERO: Self = Self { re: 0.0, im: 0.0 };

    /// One.
    pub const ONE: Self = Self { re: 1.0, im: 0.0 };

    /// Create a new complex number.
    #[must_use]
    #[inline]
    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// Create a complex number from a real value (imaginary part zero).
    #[must_use]
    #[inline]
    pub const fn from_real(re: f64) -> Self {
        Self { re, im: 0.0 }
    }

    /// Add two complex numbers.
    #[must_use]
    #[inline]
    pub fn add(&self, other: Self) -> Self {
        Self {
            re: self.re + other.re,
            im: self.im + other.im,
        }
    }

    /// Subtract two complex numbers.
    #[must_use]
    #[inline]
    pub fn sub(&self, other: Self) -> Self {
        Self {
            re: self.re - other.re,
            im: self.im - other.im,
        }
    }

    /// Complex multiply.
    #[must_use]
    #[inline]
    pub fn mul(&self, other: Self) -> Self {
        Self {
            re: self.re * other.re - self.im * other.im,
            im: self.re * other.im + self.im * other.re,
        }
    }

    /// Complex divide.
    ///
    /// A divisor of zero magnitude gives non-finite components; callers
    /// must not divide by zero.
    #[must_use]
    #[inline]
    pub fn div(&self, other: Self) -> Self {
        let (a, b, c, d) = (self.re, self.im, other.re, other.im);
        let n = c * c + d * d;
        Self {
            re: (a * c + b * d) / n,
            im: (b * c - a * d) / n,
        }
    }

    /// Scale by a real factor.
    #[must_use]
    #[inline]
    pub fn scale(&self, factor: f64) -> Self {
        Self {
            re: self.re * factor,
            im: self.im * factor,
        }
    }

    /// Complex conjugate.
    #[must_use]
    #[inline]
    pub const fn conj(&self) -> Self {
        Self {
            re: self.re,
            im: -self.im,
        }
    }

    /// Magnitude (absolute value).
    #[must_use]
    #[inline]
    pub fn magnitude(&self) -> f64 {
        libm::sqrt(self.re * self.re + self.im * self.im)
    }

    /// Magnitude squared (avoids sqrt).
    #[must_use]
    #[inline]
    pub fn magnitude_squared(&self) -> f64 {
        self.re * self.re + self.im * self.im
    }

    /// Phase angle in radians, in (-π, π].
    #[must_use]
    #[inline]
    pub fn phase(&self) -> f64 {
        libm::atan2(self.im, self.re)
    }

    /// Whether both components are finite.
    #[must_use]
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.re.is_finite() && self.im.is_finite()
    }
}

impl core::ops::Add for Complex {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::add(&self, other)
    }
}

impl core::ops::Sub for Complex {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::sub(&self, other)
    }
}

impl core::ops::Mul for Complex {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        Self::mul(&self, other)
    }
}

impl core::ops::Mul<f64> for Complex {
    type Output = Self;

    fn mul(self, factor: f64) -> Self {
        self.scale(factor)
    }
}

impl core::ops::Div for Complex {
    type Output = Self;

    fn div(self, other: Self) -> Self {
        Self::div(&self, other)
    }
}

/// Sampling rate in Hz with validation
///
/// Always finite and strictly positive.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SampleRate(f64);

impl SampleRate {
    /// Create a sampling rate, rejecting non-finite or non-positive values.
    ///
    /// # Errors
    /// `InvalidParameter("sampling_rate")` when out of range.
    pub fn new(hz: f64) -> Result<Self> {
        if hz.is_finite() && hz > 0.0 {
            Ok(Self(hz))
        } else {
            Err(Error::InvalidParameter("sampling_rate"))
        }
    }

    /// Rate in Hz
    #[must_use]
    pub const fn hz(self) -> f64 {
        self.0
    }

    /// Nyquist frequency in Hz
    #[must_use]
    pub fn nyquist(self) -> f64 {
        self.0 / 2.0
    }

    /// Convert a duration in seconds to a whole number of samples.
    #[must_use]
    pub fn samples(self, seconds: f64) -> usize {
        crate::config::seconds_to_samples(seconds, self.0)
    }
}
