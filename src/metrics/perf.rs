//! # Inference Timing Accumulator
//!
//! Keeps the last [`PERF_SAMPLES`] timings of each channel in a ring and
//! maintains running sums, so averages are O(1).

use std::time::Instant;

use crate::inference::TimingSample;

/// Samples kept per channel.
pub const PERF_SAMPLES: usize = 100;
/// Number of timing channels (total, pre, model, post).
pub const PERF_CHANNELS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerfChannel {
    Total = 0,
    Pre = 1,
    Model = 2,
    Post = 3,
}

#[derive(Debug, Clone)]
pub struct PerfMetrics {
    samples: [[f32; PERF_SAMPLES]; PERF_CHANNELS],
    sums: [f64; PERF_CHANNELS],
    next: usize,
    filled: usize,
    created: Instant,
    startup_ms: Option<f32>,
}

impl PerfMetrics {
    pub fn new() -> Self {
        Self {
            samples: [[0.0; PERF_SAMPLES]; PERF_CHANNELS],
            sums: [0.0; PERF_CHANNELS],
            next: 0,
            filled: 0,
            created: Instant::now(),
            startup_ms: None,
        }
    }

    /// Add one inference timing, evicting the oldest once the ring is full.
    ///
    /// # Performance Characteristics
    ///
    /// **Time complexity**: O(1). The evicted value is subtracted from the
    /// running sum instead of re-summing the window.
    pub fn record(&mut self, sample: TimingSample) {
        let values = [sample.total, sample.pre, sample.model, sample.post];
        for (channel, value) in values.into_iter().enumerate() {
            let slot = &mut self.samples[channel][self.next];
            self.sums[channel] += value as f64 - *slot as f64;
            *slot = value;
        }
        self.next = (self.next + 1) % PERF_SAMPLES;
        self.filled = (self.filled + 1).min(PERF_SAMPLES);
    }

    /// Mean over the samples recorded so far (at most the last 100).
    pub fn average(&self, channel: PerfChannel) -> f32 {
        if self.filled == 0 {
            return 0.0;
        }
        (self.sums[channel as usize] / self.filled as f64) as f32
    }

    pub fn averages(&self) -> TimingSample {
        TimingSample {
            total: self.average(PerfChannel::Total),
            pre: self.average(PerfChannel::Pre),
            model: self.average(PerfChannel::Model),
            post: self.average(PerfChannel::Post),
        }
    }

    pub fn sample_count(&self) -> usize {
        self.filled
    }

    /// Freeze the time since construction as the startup duration. Later
    /// calls keep the first value.
    pub fn mark_started(&mut self) {
        if self.startup_ms.is_none() {
            self.startup_ms = Some(self.created.elapsed().as_secs_f32() * 1000.0);
        }
    }

    pub fn startup_ms(&self) -> Option<f32> {
        self.startup_ms
    }
}

impl Default for PerfMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(v: f32) -> TimingSample {
        TimingSample {
            total: v,
            pre: v / 4.0,
            model: v / 2.0,
            post: v / 4.0,
        }
    }

    #[test]
    fn test_empty_average_is_zero() {
        assert_eq!(PerfMetrics::new().average(PerfChannel::Total), 0.0);
    }

    #[test]
    fn test_average_over_filled_samples() {
        let mut perf = PerfMetrics::new();
        perf.record(sample(10.0));
        perf.record(sample(20.0));
        assert_eq!(perf.sample_count(), 2);
        assert!((perf.average(PerfChannel::Total) - 15.0).abs() < 1e-4);
        assert!((perf.average(PerfChannel::Model) - 7.5).abs() < 1e-4);
    }

    #[test]
    fn test_ring_evicts_oldest() {
        let mut perf = PerfMetrics::new();
        for _ in 0..PERF_SAMPLES {
            perf.record(sample(1000.0));
        }
        for _ in 0..PERF_SAMPLES {
            perf.record(sample(4.0));
        }
        assert_eq!(perf.sample_count(), PERF_SAMPLES);
        assert!((perf.averages().total - 4.0).abs() < 1e-3);
        assert!((perf.averages().pre - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_startup_recorded_once() {
        let mut perf = PerfMetrics::new();
        assert!(perf.startup_ms().is_none());
        perf.mark_started();
        let first = perf.startup_ms();
        perf.mark_started();
        assert_eq!(perf.startup_ms(), first);
    }
}
