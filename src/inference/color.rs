//! Colour-statistics style model.
//!
//! Matches the per-channel mean and standard deviation of the content to the
//! style image, blended with the original by `strength`. Deterministic and
//! CPU-only, so the whole pipeline runs without neural model files.

use super::transfer::{StyleModel, Tensor};
use crate::error::StylishResult;
use crate::style::StyleDescriptor;

#[derive(Debug, Clone, Copy, PartialEq)]
struct ChannelStats {
    mean: [f32; 3],
    std: [f32; 3],
}

fn stats(rgb: &[f32]) -> ChannelStats {
    let n = (rgb.len() / 3).max(1) as f64;
    let mut sum = [0f64; 3];
    let mut sq = [0f64; 3];
    for px in rgb.chunks_exact(3) {
        for c in 0..3 {
            let v = px[c] as f64;
            sum[c] += v;
            sq[c] += v * v;
        }
    }
    let mean = sum.map(|s| s / n);
    let mut std = [0f32; 3];
    for c in 0..3 {
        std[c] = (sq[c] / n - mean[c] * mean[c]).max(0.0).sqrt() as f32;
    }
    ChannelStats {
        mean: mean.map(|m| m as f32),
        std,
    }
}

#[derive(Debug, Clone)]
pub struct ColorStatsModel {
    strength: f32,
}

impl ColorStatsModel {
    /// `strength` is clamped to `[0, 1]`; 0 leaves content untouched.
    pub fn new(strength: f32) -> Self {
        Self {
            strength: strength.clamp(0.0, 1.0),
        }
    }

    pub fn strength(&self) -> f32 {
        self.strength
    }
}

impl Default for ColorStatsModel {
    fn default() -> Self {
        Self::new(0.8)
    }
}

impl StyleModel for ColorStatsModel {
    fn name(&self) -> &str {
        "color-stats"
    }

    fn stylize(&mut self, content: &Tensor, style: &StyleDescriptor<'_>) -> StylishResult<Tensor> {
        let src = stats(&content.data);
        let dst = stats(style.blob);
        let mut data = Vec::with_capacity(content.data.len());
        for px in content.data.chunks_exact(3) {
            for c in 0..3 {
                // flat content channels only shift
                let gain = if src.std[c] > 1e-6 {
                    dst.std[c] / src.std[c]
                } else {
                    1.0
                };
                let moved = (px[c] - src.mean[c]) * gain + dst.mean[c];
                let v = px[c] + (moved - px[c]) * self.strength;
                data.push(v.clamp(0.0, 1.0));
            }
        }
        Ok(Tensor {
            data,
            size: content.size,
        })
    }
}
