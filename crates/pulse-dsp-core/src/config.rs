//! Defaults and capacity constants
//!
//! Every tunable of the designer, detector and monitor has its default
//! defined here so the configuration records and the docs agree.

/// Maximum number of biquad sections in one cascade
pub const MAX_SECTIONS: usize = 12;

/// Maximum supported filter order (two poles per section)
pub const MAX_ORDER: u32 = 2 * MAX_SECTIONS as u32;

/// Default sampling rate (one camera frame every 20 ms)
pub const DEFAULT_SAMPLE_RATE_HZ: f64 = 50.0;

/// Default highpass cutoff, removes baseline drift below 30 BPM
pub const DEFAULT_CUTOFF_HZ: f64 = 0.5;

/// Default filter order (five biquad sections)
pub const DEFAULT_ORDER: u32 = 10;

/// Default bandwidth field of the filter configuration (unused by highpass)
pub const DEFAULT_BANDWIDTH: f64 = 1.0;

/// Gradient smoothing window in seconds
pub const DEFAULT_SMOOTH_WINDOW_S: f64 = 0.1;

/// Baseline averaging window in seconds
pub const DEFAULT_AVG_WINDOW_S: f64 = 0.75;

/// Smoothed gradient must exceed this multiple of the baseline
pub const DEFAULT_GRADIENT_THRESHOLD_WEIGHT: f64 = 1.5;

/// Regions shorter than this fraction of the mean region length are dropped
pub const DEFAULT_MIN_REGION_LENGTH_WEIGHT: f64 = 0.4;

/// Refractory delay between accepted peaks in seconds
pub const DEFAULT_MIN_PEAK_DELAY_S: f64 = 0.3;

/// Analysis window kept by the streaming monitor, in seconds
pub const DEFAULT_WINDOW_SECONDS: f64 = 10.0;

/// Longest detector window or monitor buffer, in samples
pub const MAX_WINDOW_SAMPLES: usize = 1 << 20;

/// Seconds per minute, for beats-per-minute conversion
pub const SECONDS_PER_MINUTE: f64 = 60.0;

/// Convert a duration in seconds to a whole number of samples.
///
/// Rounds half away from zero; negative or non-finite products give zero.
#[must_use]
pub fn seconds_to_samples(seconds: f64, sample_rate: f64) -> usize {
    let samples = libm::round(seconds * sample_rate);
    if samples.is_finite() && samples > 0.0 {
        samples as usize
    } else {
        0
    }
}
