//! Gradient-threshold pulse detector.
//!
//! Finds steep upstrokes by comparing a short-window smoothed absolute
//! gradient against a long-window baseline of itself. Contiguous stretches
//! above threshold become candidate regions; narrow regions are dropped, the
//! largest sample of each remaining region is a candidate peak, and a
//! refractory gate enforces a minimum spacing between accepted peaks.

use alloc::vec::Vec;

use crate::array::{absolute, average, gradient, greater_than, scale};
use crate::config::{
    DEFAULT_AVG_WINDOW_S, DEFAULT_GRADIENT_THRESHOLD_WEIGHT, DEFAULT_MIN_PEAK_DELAY_S,
    DEFAULT_MIN_REGION_LENGTH_WEIGHT, DEFAULT_SMOOTH_WINDOW_S, MAX_WINDOW_SAMPLES,
    SECONDS_PER_MINUTE,
};
use crate::error::{Error, Result};
use crate::types::SampleRate;

/// Detector tunables.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DetectorConfig {
    /// Gradient smoothing window in seconds
    pub smooth_window: f64,
    /// Baseline averaging window in seconds
    pub avg_window: f64,
    /// Smoothed gradient must exceed this multiple of the baseline
    pub gradient_threshold_weight: f64,
    /// Regions shorter than this fraction of the mean length are dropped
    pub min_region_length_weight: f64,
    /// Minimum spacing between accepted peaks in seconds
    pub min_peak_delay: f64,
    /// Gate the first candidate against a virtual peak at sample 0.
    ///
    /// A pulse within the first refractory delay of the buffer is then
    /// never reported. Enabled by default for compatibility with earlier
    /// releases.
    pub gate_from_origin: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            smooth_window: DEFAULT_SMOOTH_WINDOW_S,
            avg_window: DEFAULT_AVG_WINDOW_S,
            gradient_threshold_weight: DEFAULT_GRADIENT_THRESHOLD_WEIGHT,
            min_region_length_weight: DEFAULT_MIN_REGION_LENGTH_WEIGHT,
            min_peak_delay: DEFAULT_MIN_PEAK_DELAY_S,
            gate_from_origin: true,
        }
    }
}

impl DetectorConfig {
    /// Check every tunable.
    ///
    /// # Errors
    /// `InvalidParameter` naming the first negative or non-finite field.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            (self.smooth_window, "smooth_window"),
            (self.avg_window, "avg_window"),
            (self.gradient_threshold_weight, "gradient_threshold_weight"),
            (self.min_region_length_weight, "min_region_length_weight"),
            (self.min_peak_delay, "min_peak_delay"),
        ];
        for (value, name) in fields {
            if !(value.is_finite() && value >= 0.0) {
                return Err(Error::InvalidParameter(name));
            }
        }
        Ok(())
    }
}

/// Half-open span `[start, end)` of consecutive active samples.
///
/// `start` is the first active sample itself. Detectors that open the span
/// one sample before the rising edge can report peaks one sample apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Region {
    /// First active sample
    pub start: usize,
    /// One past the last active sample
    pub end: usize,
}

impl Region {
    /// Number of samples in the region.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the region holds no samples.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

/// Moving average over a symmetric window with replicated edges.
///
/// Even sizes are widened to the next odd width `2*(size/2) + 1`; sizes 0
/// and 1 are the identity. Positions outside the signal repeat the edge
/// sample, so the cost per output is bounded by the signal length.
#[must_use]
pub fn smooth_boxcar(signal: &[f64], size: usize) -> Vec<f64> {
    let n = signal.len();
    let (Some(&first), Some(&last_value)) = (signal.first(), signal.last()) else {
        return Vec::new();
    };
    let half = size / 2;
    let width = 2.0 * half as f64 + 1.0;
    let last = n - 1;
    (0..n)
        .map(|i| {
            let below = half.saturating_sub(i);
            let above = i.saturating_add(half).saturating_sub(last);
            let lo = i.saturating_sub(half);
            let hi = i.saturating_add(half).min(last);
            let mut sum = if below > 0 { below as f64 * first } else { 0.0 };
            for &x in &signal[lo..=hi] {
                sum += x;
            }
            if above > 0 {
                sum += above as f64 * last_value;
            }
            sum / width
        })
        .collect()
}

/// Split an activity mask into regions.
///
/// The sample before index 0 counts as inactive. A region still active at
/// the end of the mask has no falling edge and is not returned. Falling
/// edges that precede the first rising edge are discarded.
#[must_use]
pub fn find_regions(active: &[bool]) -> Vec<Region> {
    let mut starts = Vec::new();
    let mut ends = Vec::new();
    let mut previous = false;
    for (i, &current) in active.iter().enumerate() {
        if !previous && current {
            starts.push(i);
        }
        if previous && !current {
            ends.push(i);
        }
        previous = current;
    }

    let Some(&first_start) = starts.first() else {
        return Vec::new();
    };
    ends.retain(|&end| end > first_start);

    starts
        .into_iter()
        .zip(ends)
        .map(|(start, end)| Region { start, end })
        .collect()
}

/// Index of the largest value, first occurrence on ties.
fn arg_max(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, top)) if v <= top => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Mean spacing between consecutive peaks, in samples.
///
/// `None` with fewer than two peaks or when the offsets are not strictly
/// increasing.
#[must_use]
pub fn mean_interval(peaks: &[usize]) -> Option<f64> {
    let intervals = peaks
        .windows(2)
        .map(|w| w[1].checked_sub(w[0]).filter(|&d| d > 0).map(|d| d as f64))
        .collect::<Option<Vec<f64>>>()?;
    average(&intervals).ok()
}

/// Rate in beats per minute: `60 / (mean_interval / sample_rate)`.
///
/// # Errors
/// `InsufficientData` with fewer than two peaks, `InvalidParameter("peaks")`
/// when the offsets are not strictly increasing, `InvalidParameter` for a
/// bad sampling rate.
pub fn heart_rate(peaks: &[usize], sample_rate: f64) -> Result<f64> {
    let rate = SampleRate::new(sample_rate)?;
    if peaks.len() < 2 {
        return Err(Error::InsufficientData { peaks: peaks.len() });
    }
    let interval = mean_interval(peaks).ok_or(Error::InvalidParameter("peaks"))?;
    Ok(SECONDS_PER_MINUTE / (interval / rate.hz()))
}

/// Peak detector bound to one sampling rate.
///
/// Stateless between calls and freely shareable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PeakDetector {
    config: DetectorConfig,
    sample_rate: SampleRate,
}

impl PeakDetector {
    /// Create a detector.
    ///
    /// # Errors
    /// `InvalidParameter` for a bad sampling rate or tunable, including a
    /// smoothing or averaging window longer than `MAX_WINDOW_SAMPLES`.
    pub fn new(sample_rate: f64, config: DetectorConfig) -> Result<Self> {
        let sample_rate = SampleRate::new(sample_rate)?;
        config.validate()?;
        if sample_rate.samples(config.smooth_window) > MAX_WINDOW_SAMPLES {
            return Err(Error::InvalidParameter("smooth_window"));
        }
        if sample_rate.samples(config.avg_window) > MAX_WINDOW_SAMPLES {
            return Err(Error::InvalidParameter("avg_window"));
        }
        Ok(Self {
            config,
            sample_rate,
        })
    }

    /// Detector tunables.
    #[must_use]
    pub const fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Sampling rate the detector was built for.
    #[must_use]
    pub const fn sample_rate(&self) -> SampleRate {
        self.sample_rate
    }

    /// Refractory delay in samples.
    #[must_use]
    pub fn min_delay_samples(&self) -> usize {
        self.sample_rate.samples(self.config.min_peak_delay)
    }

    /// Activity mask: smoothed absolute gradient above the weighted baseline.
    #[must_use]
    pub fn activity(&self, signal: &[f64]) -> Vec<bool> {
        let abs_grad = absolute(&gradient(signal));
        let smooth_size = self.sample_rate.samples(self.config.smooth_window);
        let avg_size = self.sample_rate.samples(self.config.avg_window);
        let smooth_grad = smooth_boxcar(&abs_grad, smooth_size);
        let baseline = smooth_boxcar(&smooth_grad, avg_size);
        let threshold = scale(&baseline, self.config.gradient_threshold_weight);
        greater_than(&smooth_grad, &threshold)
    }

    /// Sample offsets of accepted peaks, strictly increasing.
    #[must_use]
    pub fn find_peaks(&self, signal: &[f64]) -> Vec<usize> {
        let regions = find_regions(&self.activity(signal));
        let lengths: Vec<f64> = regions.iter().map(|r| r.len() as f64).collect();
        let Ok(mean_len) = average(&lengths) else {
            trace!("no active region in {} samples", signal.len());
            return Vec::new();
        };
        let min_len = mean_len * self.config.min_region_length_weight;
        let min_delay = self.min_delay_samples();

        let mut peaks = Vec::new();
        let mut last = if self.config.gate_from_origin { Some(0) } else { None };
        for region in regions.iter().filter(|r| r.len() as f64 >= min_len) {
            let Some(offset) = arg_max(&signal[region.start..region.end]) else {
                continue;
            };
            let peak = region.start + offset;
            let clear = match last {
                Some(prev) => peak > prev && peak - prev > min_delay,
                None => true,
            };
            if clear {
                peaks.push(peak);
                last = Some(peak);
            }
        }

        trace!(
            "{} regions, mean length {}, {} peaks",
            regions.len(),
            mean_len,
            peaks.len()
        );
        peaks
    }

    /// Rate in beats per minute from the peaks of `signal`.
    ///
    /// # Errors
    /// `InsufficientData` with fewer than two peaks.
    pub fn rate(&self, signal: &[f64]) -> Result<f64> {
        heart_rate(&self.find_peaks(signal), self.sample_rate.hz())
    }
}
