//! Batch entry point: highpass the raw trace, then detect pulses.

use alloc::vec::Vec;

use crate::design::{Design, FilterConfig};
use crate::error::{Error, Result};
use crate::peaks::{heart_rate, DetectorConfig, PeakDetector};

/// Pipeline configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PipelineConfig {
    /// Baseline-removal filter
    pub filter: FilterConfig,
    /// Pulse detector tunables
    pub detector: DetectorConfig,
    /// Filter forward and backward instead of forward only
    pub zero_phase: bool,
}

impl PipelineConfig {
    /// Default pipeline at the given sampling rate.
    #[must_use]
    pub fn with_sample_rate(sampling_rate: f64) -> Self {
        let mut config = Self::default();
        config.filter.sampling_rate = sampling_rate;
        config
    }
}

/// Result of one batch run.
#[derive(Clone, Debug, PartialEq)]
pub struct PulseReport {
    /// Peak offsets into the input buffer
    pub peaks: Vec<usize>,
    /// Rate in beats per minute, `None` until two peaks are found
    pub rate: Option<f64>,
    /// The highpassed trace the peaks were found in
    pub filtered: Vec<f64>,
}

/// Designs once, then runs any number of independent buffers.
#[derive(Clone, Debug, PartialEq)]
pub struct PulsePipeline {
    design: Design,
    detector: PeakDetector,
    zero_phase: bool,
}

impl PulsePipeline {
    /// Build a pipeline.
    ///
    /// # Errors
    /// `InvalidParameter` for any out-of-range filter or detector setting.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let design = Design::highpass(config.filter)?;
        let detector = PeakDetector::new(config.filter.sampling_rate, config.detector)?;
        Ok(Self {
            design,
            detector,
            zero_phase: config.zero_phase,
        })
    }

    /// The filter design.
    #[must_use]
    pub const fn design(&self) -> &Design {
        &self.design
    }

    /// The peak detector.
    #[must_use]
    pub const fn detector(&self) -> &PeakDetector {
        &self.detector
    }

    /// Highpass a complete buffer on a fresh cascade.
    #[must_use]
    pub fn filter(&self, signal: &[f64]) -> Vec<f64> {
        let mut cascade = self.design.cascade();
        if self.zero_phase {
            cascade.apply_zero_phase(signal)
        } else {
            cascade.apply_forward(signal)
        }
    }

    /// Filter and detect one buffer. Each call starts from an idle cascade.
    ///
    /// # Errors
    /// `DegenerateInput` on an empty buffer.
    pub fn detect(&self, signal: &[f64]) -> Result<PulseReport> {
        if signal.is_empty() {
            return Err(Error::DegenerateInput("empty signal"));
        }
        let filtered = self.filter(signal);
        let peaks = self.detector.find_peaks(&filtered);
        let rate = heart_rate(&peaks, self.detector.sample_rate().hz()).ok();
        Ok(PulseReport {
            peaks,
            rate,
            filtered,
        })
    }
}
