//! Pulse DSP Core Library
//!
//! Extracts a periodic physiological signal from a noisy intensity trace
//! and estimates its rate. This crate is `no_std` compatible (it needs
//! `alloc`) for use in both embedded and WASM targets.
//!
//! # Modules
//!
//! - [`types`] - Core types: Complex, SampleRate
//! - [`design`] - Highpass Butterworth coefficient design, pole/zero analysis
//! - [`filter`] - Streaming biquad cascade with persistent state
//! - [`array`] - Sequence helpers: average, normalize, gradient
//! - [`peaks`] - Gradient-threshold peak detector and rate derivation
//! - [`pipeline`] - Batch filter-then-detect entry point
//! - [`monitor`] - Sample-by-sample rate monitor over a bounded window
//! - [`config`] - Defaults and capacity constants
//! - [`error`] - Error taxonomy
//!
//! # Example
//!
//! ```
//! use pulse_dsp_core::{PipelineConfig, PulsePipeline};
//!
//! let mut config = PipelineConfig::default();
//! config.filter.sampling_rate = 60.0;
//! let pipeline = PulsePipeline::new(config).unwrap();
//!
//! let mut signal = vec![0.0; 600];
//! for p in [100, 160, 220, 280, 340] {
//!     signal[p] = 1.0;
//! }
//! let report = pipeline.detect(&signal).unwrap();
//! assert!(!report.peaks.is_empty());
//! ```

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

extern crate alloc;

// Must come first so the logging macros are visible to every module.
#[macro_use]
mod fmt;

pub mod array;
pub mod config;
pub mod design;
pub mod error;
pub mod filter;
pub mod monitor;
pub mod peaks;
pub mod pipeline;
pub mod types;

// Re-export commonly used types
pub use design::{Characteristic, Design, FilterConfig, PoleZero, SectionCoeffs};
pub use error::{Error, Result};
pub use filter::{Cascade, Section};
pub use monitor::{MonitorConfig, PulseMonitor};
pub use peaks::{heart_rate, DetectorConfig, PeakDetector, Region};
pub use pipeline::{PipelineConfig, PulsePipeline, PulseReport};
pub use types::{Complex, SampleRate};
