//! Smoothed frames-per-second counter.

use std::time::Instant;

/// Counts presented frames and folds them into a smoothed rate once at least
/// one second has accumulated:
///
/// ```text
/// fps = 0.5 * fps + 0.5 * frames / elapsed
/// ```
#[derive(Debug, Clone)]
pub struct FpsCounter {
    last: Instant,
    elapsed: f64,
    frames: u32,
    fps: f64,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self {
            last: start,
            elapsed: 0.0,
            frames: 0,
            fps: 0.0,
        }
    }

    /// Record one presented frame at `now`.
    pub fn frame_presented(&mut self, now: Instant) {
        self.elapsed += now.saturating_duration_since(self.last).as_secs_f64();
        self.last = now;
        self.frames += 1;
        if self.elapsed >= 1.0 {
            self.fps = 0.5 * self.fps + 0.5 * (self.frames as f64 / self.elapsed);
            self.frames = 0;
            self.elapsed = 0.0;
        }
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_no_update_before_one_second() {
        let start = Instant::now();
        let mut fps = FpsCounter::starting_at(start);
        for i in 1..=50 {
            fps.frame_presented(start + Duration::from_millis(10 * i));
        }
        assert_eq!(fps.fps(), 0.0);
    }

    #[test]
    fn test_smoothing() {
        let start = Instant::now();
        let mut fps = FpsCounter::starting_at(start);
        // 100 frames over exactly 1s -> 0.5 * 0 + 0.5 * 100
        for i in 1..=100 {
            fps.frame_presented(start + Duration::from_millis(10 * i));
        }
        assert!((fps.fps() - 50.0).abs() < 1e-6, "{}", fps.fps());
        for i in 101..=200 {
            fps.frame_presented(start + Duration::from_millis(10 * i));
        }
        assert!((fps.fps() - 75.0).abs() < 1e-6, "{}", fps.fps());
    }
}
