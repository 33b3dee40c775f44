//! Sample-by-sample rate monitor.
//!
//! Owns one cascade for the whole run and keeps the most recent filtered
//! samples in a bounded window that the detector re-scans on demand.

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use crate::array::normalize;
use crate::config::{DEFAULT_WINDOW_SECONDS, MAX_WINDOW_SAMPLES};
use crate::design::Design;
use crate::error::{Error, Result};
use crate::filter::Cascade;
use crate::peaks::{heart_rate, PeakDetector};
use crate::pipeline::PipelineConfig;

/// Monitor configuration.
///
/// The monitor filters causally, one sample at a time, so
/// `pipeline.zero_phase` must be `false`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MonitorConfig {
    /// Filter and detector settings
    pub pipeline: PipelineConfig,
    /// Length of the analysis window in seconds
    pub window_seconds: f64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            pipeline: PipelineConfig::default(),
            window_seconds: DEFAULT_WINDOW_SECONDS,
        }
    }
}

/// Streaming pulse monitor.
#[derive(Clone, Debug)]
pub struct PulseMonitor {
    design: Design,
    cascade: Cascade,
    detector: PeakDetector,
    window: VecDeque<f64>,
    capacity: usize,
    samples_seen: u64,
}

impl PulseMonitor {
    /// Create a monitor.
    ///
    /// # Errors
    /// `InvalidParameter` for any out-of-range setting, including a window
    /// shorter than one sample or longer than `MAX_WINDOW_SAMPLES`, and
    /// `InvalidParameter("zero_phase")` when zero-phase filtering is requested.
    pub fn new(config: MonitorConfig) -> Result<Self> {
        if config.pipeline.zero_phase {
            return Err(Error::InvalidParameter("zero_phase"));
        }
        let design = Design::highpass(config.pipeline.filter)?;
        let detector = PeakDetector::new(config.pipeline.filter.sampling_rate, config.pipeline.detector)?;
        let capacity = detector.sample_rate().samples(config.window_seconds);
        if !config.window_seconds.is_finite() || capacity == 0 || capacity > MAX_WINDOW_SAMPLES {
            return Err(Error::InvalidParameter("window_seconds"));
        }
        Ok(Self {
            cascade: design.cascade(),
            design,
            detector,
            window: VecDeque::with_capacity(capacity),
            capacity,
            samples_seen: 0,
        })
    }

    /// Filter one sample and append it to the window, evicting the oldest
    /// sample when full. Returns the filtered value.
    pub fn push(&mut self, sample: f64) -> f64 {
        let filtered = self.cascade.step(sample);
        if self.window.len() == self.capacity {
            self.window.pop_front();
        }
        self.window.push_back(filtered);
        self.samples_seen += 1;
        filtered
    }

    /// Push a block of samples in order.
    pub fn push_block(&mut self, samples: &[f64]) {
        for &sample in samples {
            self.push(sample);
        }
    }

    /// Filtered samples currently in the window, oldest first.
    #[must_use]
    pub fn window(&self) -> Vec<f64> {
        self.window.iter().copied().collect()
    }

    /// Window capacity in samples.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total samples pushed since creation or the last reset.
    #[must_use]
    pub const fn samples_seen(&self) -> u64 {
        self.samples_seen
    }

    /// Peak offsets into the current window.
    #[must_use]
    pub fn peaks(&self) -> Vec<usize> {
        self.detector.find_peaks(&self.window())
    }

    /// Rate in beats per minute over the current window.
    ///
    /// # Errors
    /// `DegenerateInput` before the first sample, `InsufficientData` while
    /// fewer than two peaks are visible.
    pub fn estimate(&self) -> Result<f64> {
        if self.window.is_empty() {
            return Err(Error::DegenerateInput("empty window"));
        }
        heart_rate(&self.peaks(), self.detector.sample_rate().hz())
    }

    /// Window scaled to [-1, 1] for display.
    ///
    /// # Errors
    /// `DegenerateInput` before the first sample.
    pub fn normalized_window(&self) -> Result<Vec<f64>> {
        normalize(&self.window())
    }

    /// Start a new run: idle cascade, empty window.
    pub fn reset(&mut self) {
        debug!("monitor reset after {} samples", self.samples_seen);
        self.cascade = self.design.cascade();
        self.window.clear();
        self.samples_seen = 0;
    }
}
