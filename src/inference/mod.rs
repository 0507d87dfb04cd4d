//! # Inference Module
//!
//! The style inference adapter seen by the pipeline, the `StyleTransfer`
//! implementation that wraps a model backend with the adaptive resampler, and
//! a deterministic colour-statistics backend.

pub mod adapter;
pub mod color;
pub mod transfer;

pub use adapter::{Provider, StyleInference, Stylized, TimingSample};
pub use color::ColorStatsModel;
pub use transfer::{StyleModel, StyleTransfer, Tensor};
