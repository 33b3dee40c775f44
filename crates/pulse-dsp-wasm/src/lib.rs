//! WASM bindings for pulse monitoring.
//!
//! This crate exposes the streaming monitor to JavaScript, designed to be
//! fed one brightness sample per camera frame.

use pulse_dsp_core::{Error, MonitorConfig, PipelineConfig, PulseMonitor, PulsePipeline};
use wasm_bindgen::prelude::*;

fn to_js(err: Error) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn offsets(peaks: &[usize]) -> Vec<u32> {
    peaks.iter().map(|&p| p as u32).collect()
}

/// Pulse monitor for per-frame integration.
///
/// Highpasses each sample on arrival and keeps a rolling window for peak
/// detection.
#[wasm_bindgen]
pub struct PulseProcessor {
    monitor: PulseMonitor,
}

#[wasm_bindgen]
impl PulseProcessor {
    /// Create a processor with default filter and detector settings.
    #[wasm_bindgen(constructor)]
    pub fn new(sample_rate: f64) -> Result<PulseProcessor, JsValue> {
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();

        let config = MonitorConfig {
            pipeline: PipelineConfig::with_sample_rate(sample_rate),
            ..MonitorConfig::default()
        };
        let monitor = PulseMonitor::new(config).map_err(to_js)?;
        Ok(Self { monitor })
    }

    /// Push one raw sample; returns the filtered value.
    #[wasm_bindgen]
    pub fn push(&mut self, sample: f64) -> f64 {
        self.monitor.push(sample)
    }

    /// Push a block of raw samples.
    #[wasm_bindgen]
    pub fn push_block(&mut self, samples: &[f64]) {
        self.monitor.push_block(samples);
    }

    /// Peak offsets into the current window.
    #[wasm_bindgen]
    pub fn peaks(&self) -> Vec<u32> {
        offsets(&self.monitor.peaks())
    }

    /// Current rate in beats per minute, `undefined` until two peaks are
    /// visible.
    #[wasm_bindgen]
    pub fn bpm(&self) -> Option<f64> {
        self.monitor.estimate().ok()
    }

    /// Filtered window scaled to [-1, 1] for plotting.
    #[wasm_bindgen]
    pub fn normalized_window(&self) -> Vec<f64> {
        self.monitor.normalized_window().unwrap_or_default()
    }

    /// Samples pushed since creation or the last reset.
    #[wasm_bindgen]
    pub fn samples_seen(&self) -> f64 {
        self.monitor.samples_seen() as f64
    }

    /// Reset processor state.
    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.monitor.reset();
    }
}

/// Filter a complete recording and return its peak offsets.
#[wasm_bindgen]
pub fn detect_peaks(signal: &[f64], sample_rate: f64) -> Result<Vec<u32>, JsValue> {
    let pipeline = PulsePipeline::new(PipelineConfig::with_sample_rate(sample_rate)).map_err(to_js)?;
    let report = pipeline.detect(signal).map_err(to_js)?;
    Ok(offsets(&report.peaks))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processor_streams() {
        let mut p = PulseProcessor::new(50.0).unwrap();
        for _ in 0..100 {
            p.push(0.0);
        }
        assert_eq!(p.samples_seen(), 100.0);
        assert!(p.peaks().is_empty());
        assert_eq!(p.bpm(), None);
        assert_eq!(p.normalized_window(), vec![0.0; 100]);

        p.reset();
        assert_eq!(p.samples_seen(), 0.0);
        assert!(p.normalized_window().is_empty());
    }

    #[test]
    fn test_offsets_convert() {
        assert_eq!(offsets(&[3, 70, 140]), vec![3, 70, 140]);
    }
}
