//! Error taxonomy shared by the designer, filter, detector and monitor.

use core::fmt;

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;

/// Pulse DSP error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A configuration value is out of range. Carries the field name.
    InvalidParameter(&'static str),
    /// The input sequence cannot produce a value (e.g. it is empty).
    DegenerateInput(&'static str),
    /// Fewer than two peaks are available, so no rate can be derived yet.
    InsufficientData {
        /// Number of peaks that were available
        peaks: usize,
    },
}

impl Error {
    /// Whether the condition is an expected "no estimate yet" outcome
    /// rather than a caller mistake.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::InsufficientData { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter(name) => write!(f, "invalid parameter: {name}"),
            Self::DegenerateInput(what) => write!(f, "degenerate input: {what}"),
            Self::InsufficientData { peaks } => {
                write!(f, "insufficient data: {peaks} peak(s), need at least 2")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
