// SPDX-License-Identifier: MIT
//! # Quality Plan Computation
//!
//! The quality dial is an integer in a closed [`QualityRange`]. The top of the
//! range feeds the model at capture resolution; every step down halves both
//! axes:
//!
//! ```text
//! factor = 1 / 2^(range.max - quality)
//! ```
//!
//! The model only accepts dimensions that are multiples of 4. Each axis is
//! scaled, rounded to the nearest integer and then truncated to a multiple of
//! 4, never going below 4.

/// Represents a 2D size with width and height in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Size {
    pub w: u32,
    pub h: u32,
}

impl Size {
    pub const fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }

    /// Number of bytes of a tightly packed BGRA buffer of this size.
    pub fn bgra_len(&self) -> usize {
        (self.w as usize) * (self.h as usize) * 4
    }

    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }
}

/// Model input dimensions must be a multiple of this value.
pub const MODEL_ALIGN: u32 = 4;

/// Closed integer range of the quality/performance dial.
///
/// `min` is the performance-most end, `max` the quality-most end.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QualityRange {
    pub min: i32,
    pub max: i32,
}

impl Default for QualityRange {
    fn default() -> Self {
        Self { min: 0, max: 3 }
    }
}

impl QualityRange {
    /// Create a range, swapping the bounds if they were given inverted.
    pub fn new(min: i32, max: i32) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn clamp(&self, value: i32) -> i32 {
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: i32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Number of halving steps between the two ends of the range.
    pub fn width(&self) -> u32 {
        self.max.abs_diff(self.min)
    }
}

/// Downscale factor applied before inference for a quality setting.
///
/// Out-of-range settings are clamped first, so the result always lies in
/// `[1 / 2^range.width(), 1]`.
pub fn downscale_factor(range: QualityRange, quality: i32) -> f64 {
    let steps = range.max.abs_diff(range.clamp(quality));
    1.0 / 2f64.powi(i32::try_from(steps).unwrap_or(i32::MAX))
}

/// Round a scaled dimension to the model grid.
fn align_dim(scaled: f64) -> u32 {
    let rounded = scaled.round().max(0.0) as u32;
    (rounded & !(MODEL_ALIGN - 1)).max(MODEL_ALIGN)
}

/// Apply `factor` to both axes and snap each one to the model grid.
pub fn model_input_size(input: Size, factor: f64) -> Size {
    Size {
        w: align_dim(input.w as f64 * factor),
        h: align_dim(input.h as f64 * factor),
    }
}

/// Everything the resampler needs for one inference pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResamplePlan {
    /// Capture resolution; the stylized output is scaled back to this
    pub input: Size,
    /// Resolution handed to the model
    pub model: Size,
    /// Downscale factor derived from the quality setting
    pub factor: f64,
}

impl ResamplePlan {
    /// True when the model runs at capture resolution and no resize is needed.
    pub fn is_passthrough(&self) -> bool {
        self.input == self.model
    }
}

pub fn build_plan(input: Size, range: QualityRange, quality: i32) -> ResamplePlan {
    let factor = downscale_factor(range, quality);
    ResamplePlan {
        input,
        model: model_input_size(input, factor),
        factor,
    }
}

/// Named positions on the quality dial, for command-line use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum QualityPreset {
    /// Lowest resolution, fastest inference
    #[clap(name = "performance")]
    Performance,
    /// One step above the performance end
    #[clap(name = "balanced")]
    Balanced,
    /// One step below full resolution
    #[clap(name = "quality")]
    Quality,
    /// Full capture resolution
    #[clap(name = "max")]
    Max,
}

impl QualityPreset {
    pub fn to_factor(self, range: QualityRange) -> i32 {
        match self {
            QualityPreset::Performance => range.min,
            QualityPreset::Balanced => range.clamp(range.min.saturating_add(1)),
            QualityPreset::Quality => range.clamp(range.max.saturating_sub(1)),
            QualityPreset::Max => range.max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factor_spans_range() {
        let range = QualityRange::default();
        assert_eq!(downscale_factor(range, 3), 1.0);
        assert_eq!(downscale_factor(range, 2), 0.5);
        assert_eq!(downscale_factor(range, 0), 0.125);
        // clamped
        assert_eq!(downscale_factor(range, 42), 1.0);
        assert_eq!(downscale_factor(range, -7), 0.125);
    }

    #[test]
    fn max_quality_keeps_aligned_sizes() {
        let plan = build_plan(Size::new(640, 480), QualityRange::default(), 3);
        assert!(plan.is_passthrough());
        assert_eq!(plan.model, Size::new(640, 480));
    }

    #[test]
    fn rounds_down_to_multiple_of_four() {
        let size = model_input_size(Size::new(101, 99), 1.0);
        assert_eq!(size, Size::new(100, 96));
    }

    #[test]
    fn never_collapses_to_zero() {
        assert_eq!(model_input_size(Size::new(3, 1), 1.0), Size::new(4, 4));
        assert_eq!(model_input_size(Size::new(20, 12), 0.125), Size::new(4, 4));
        assert_eq!(model_input_size(Size::new(0, 0), 1.0), Size::new(4, 4));
    }

    #[test]
    fn axes_are_independent() {
        let size = model_input_size(Size::new(600, 534), 0.5);
        assert_eq!(size, Size::new(300, 264));
    }

    #[test]
    fn inverted_range_is_normalized() {
        let range = QualityRange::new(5, 1);
        assert_eq!(range, QualityRange { min: 1, max: 5 });
        assert_eq!(range.width(), 4);
    }

    #[test]
    fn extreme_range_does_not_overflow() {
        let range = QualityRange::new(i32::MIN, i32::MAX);
        assert_eq!(range.width(), u32::MAX);
        assert_eq!(downscale_factor(range, i32::MAX), 1.0);
        assert_eq!(downscale_factor(range, i32::MIN), 0.0);
        assert_eq!(
            build_plan(Size::new(640, 480), range, 0).model,
            Size::new(4, 4)
        );
        assert_eq!(QualityPreset::Balanced.to_factor(range), i32::MIN + 1);
    }

    #[test]
    fn presets_map_onto_range() {
        let range = QualityRange::default();
        assert_eq!(QualityPreset::Performance.to_factor(range), 0);
        assert_eq!(QualityPreset::Balanced.to_factor(range), 1);
        assert_eq!(QualityPreset::Quality.to_factor(range), 2);
        assert_eq!(QualityPreset::Max.to_factor(range), 3);

        let narrow = QualityRange::new(2, 2);
        assert_eq!(QualityPreset::Balanced.to_factor(narrow), 2);
    }
}
