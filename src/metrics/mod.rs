//! # Metrics Module
//!
//! Presentation-rate tracking and inference timing accumulators.

pub mod fps;
pub mod perf;

pub use fps::FpsCounter;
pub use perf::{PERF_CHANNELS, PERF_SAMPLES, PerfChannel, PerfMetrics};
