//! Inference adapter interface.

use serde::{Deserialize, Serialize};
use stylish_scale::QualityRange;

use crate::capture::CapturedFrame;
use crate::error::StylishResult;
use crate::style::StyleDescriptor;

/// Execution provider for the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Cpu,
    Gpu,
}

impl Provider {
    /// Persisted index: 0 = CPU, 1 = GPU.
    pub fn index(self) -> i32 {
        match self {
            Provider::Cpu => 0,
            Provider::Gpu => 1,
        }
    }

    pub fn from_index(index: i32) -> Option<Self> {
        match index {
            0 => Some(Provider::Cpu),
            1 => Some(Provider::Gpu),
            _ => None,
        }
    }
}

/// Milliseconds spent in one inference call.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TimingSample {
    pub total: f32,
    pub pre: f32,
    pub model: f32,
    pub post: f32,
}

/// A stylized frame at capture resolution.
#[derive(Debug, Clone)]
pub struct Stylized {
    pub frame: CapturedFrame,
    pub timing: TimingSample,
}

/// Style inference as the pipeline sees it. Calls are synchronous and only
/// happen on the paint path.
pub trait StyleInference {
    /// Stylize `frame`. `Ok(None)` when the adapter is disabled.
    fn run(
        &mut self,
        frame: &CapturedFrame,
        style: &StyleDescriptor<'_>,
    ) -> StylishResult<Option<Stylized>>;

    fn enable(&mut self);
    fn disable(&mut self);
    fn is_enabled(&self) -> bool;

    /// Store `factor` clamped into [`quality_range`](Self::quality_range).
    fn set_quality_factor(&mut self, factor: i32);
    fn quality_factor(&self) -> i32;
    fn quality_range(&self) -> QualityRange;

    /// Select a provider; GPU falls back to CPU when no GPU session exists.
    fn set_provider(&mut self, provider: Provider);
    fn provider(&self) -> Provider;
    fn is_gpu_ready(&self) -> bool;
}
