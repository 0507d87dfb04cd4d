//! `StyleTransfer`: the inference adapter built on a model backend.
//!
//! One call runs the whole per-frame chain:
//!
//! ```text
//! capture ─(area downscale)─► model size ─(BGRA→RGB f32)─► model
//!        ◄─(cubic upscale)──  model size ◄─(RGB f32→BGRA)─┘
//! ```
//!
//! Pre-processing covers the downscale and tensor conversion, post-processing
//! the conversion back and the upscale.

use std::time::{Duration, Instant};

use stylish_scale::tensor::{bgra_to_rgb_f32, rgb_f32_to_bgra};
use stylish_scale::{QualityRange, Resampler, Size, build_plan};
use tracing::{debug, info, warn};

use super::adapter::{Provider, StyleInference, Stylized, TimingSample};
use crate::capture::CapturedFrame;
use crate::error::{StylishError, StylishResult};
use crate::metrics::PerfMetrics;
use crate::style::StyleDescriptor;

/// RGB f32 image in HWC order.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    pub data: Vec<f32>,
    pub size: Size,
}

/// A style-transfer model backend.
pub trait StyleModel {
    fn name(&self) -> &str;

    /// Stylize `content` with `style`. The output must have the content's size.
    fn stylize(&mut self, content: &Tensor, style: &StyleDescriptor<'_>) -> StylishResult<Tensor>;
}

pub struct StyleTransfer {
    cpu: Box<dyn StyleModel>,
    gpu: Option<Box<dyn StyleModel>>,
    provider: Provider,
    enabled: bool,
    range: QualityRange,
    quality: i32,
    resampler: Resampler,
    metrics: Option<PerfMetrics>,
}

impl StyleTransfer {
    pub fn new(cpu: Box<dyn StyleModel>) -> Self {
        let range = QualityRange::default();
        Self {
            cpu,
            gpu: None,
            provider: Provider::Cpu,
            enabled: true,
            range,
            quality: range.clamp(range.max.saturating_sub(1)),
            resampler: Resampler::new(),
            metrics: None,
        }
    }

    /// Attach a GPU session and select it.
    pub fn with_gpu(mut self, gpu: Box<dyn StyleModel>) -> Self {
        self.gpu = Some(gpu);
        self.provider = Provider::Gpu;
        self
    }

    pub fn with_range(mut self, range: QualityRange) -> Self {
        self.range = range;
        self.quality = range.clamp(self.quality);
        self
    }

    /// Collect timing averages. Startup is the time from this call to the
    /// first stylized frame.
    pub fn with_metrics(mut self) -> Self {
        self.metrics = Some(PerfMetrics::new());
        self
    }

    pub fn metrics(&self) -> Option<&PerfMetrics> {
        self.metrics.as_ref()
    }
}

fn millis(d: Duration) -> f32 {
    d.as_secs_f32() * 1000.0
}

impl StyleInference for StyleTransfer {
    fn run(
        &mut self,
        frame: &CapturedFrame,
        style: &StyleDescriptor<'_>,
    ) -> StylishResult<Option<Stylized>> {
        if !self.enabled {
            return Ok(None);
        }

        let start = Instant::now();
        let plan = build_plan(frame.size(), self.range, self.quality);
        let small = self
            .resampler
            .scale_down(frame.data(), plan.input, Some(frame.stride()), plan.model)?;
        let content = Tensor {
            data: bgra_to_rgb_f32(&small, plan.model)?,
            size: plan.model,
        };
        let pre = start.elapsed();

        let model_start = Instant::now();
        let model: &mut dyn StyleModel = match (self.provider, self.gpu.as_mut()) {
            (Provider::Gpu, Some(gpu)) => &mut **gpu,
            _ => &mut *self.cpu,
        };
        let output = model.stylize(&content, style)?;
        if output.size != content.size || output.data.len() != content.data.len() {
            return Err(StylishError::inference(
                model.name(),
                format!(
                    "output is {}x{} ({} values), expected {}x{} ({} values)",
                    output.size.w,
                    output.size.h,
                    output.data.len(),
                    content.size.w,
                    content.size.h,
                    content.data.len()
                ),
            ));
        }
        let model_time = model_start.elapsed();

        let post_start = Instant::now();
        let bgra = rgb_f32_to_bgra(&output.data, plan.model)?;
        let full = if plan.is_passthrough() {
            bgra
        } else {
            self.resampler.scale_up(&bgra, plan.model, plan.input)?
        };
        let stylized = CapturedFrame::from_bgra(full, plan.input.w, plan.input.h)?;
        let post = post_start.elapsed();

        let timing = TimingSample {
            total: millis(start.elapsed()),
            pre: millis(pre),
            model: millis(model_time),
            post: millis(post),
        };
        if let Some(metrics) = self.metrics.as_mut() {
            metrics.mark_started();
            metrics.record(timing);
        }
        debug!(
            model_w = plan.model.w,
            model_h = plan.model.h,
            total_ms = timing.total,
            pre_ms = timing.pre,
            model_ms = timing.model,
            post_ms = timing.post,
            "frame stylized"
        );

        Ok(Some(Stylized {
            frame: stylized,
            timing,
        }))
    }

    fn enable(&mut self) {
        self.enabled = true;
    }

    fn disable(&mut self) {
        self.enabled = false;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_quality_factor(&mut self, factor: i32) {
        self.quality = self.range.clamp(factor);
    }

    fn quality_factor(&self) -> i32 {
        self.quality
    }

    fn quality_range(&self) -> QualityRange {
        self.range
    }

    fn set_provider(&mut self, provider: Provider) {
        self.provider = match provider {
            Provider::Gpu if self.gpu.is_none() => {
                warn!("no GPU session available, using CPU");
                Provider::Cpu
            }
            other => other,
        };
        info!(provider = ?self.provider, "inference provider selected");
    }

    fn provider(&self) -> Provider {
        self.provider
    }

    fn is_gpu_ready(&self) -> bool {
        self.gpu.is_some()
    }
}
