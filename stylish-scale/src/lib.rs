// SPDX-License-Identifier: MIT
//! # stylish-scale: Adaptive Resampling for Style-Transfer Input
//!
//! This crate turns captured BGRA frames into model-friendly tensors and back.
//! The style-transfer model is the most expensive stage of the render loop, so
//! the resolution it sees is driven by a single integer quality dial.
//!
//! ## Key Components
//!
//! - [`plan`]: quality range, downscale factor and multiple-of-4 model sizes
//! - [`cpu`]: SIMD resampling on top of fast_image_resize (area down, cubic up)
//! - [`tensor`]: BGRA8 <-> normalized RGB f32 conversion
//!
//! ## Usage Example
//!
//! ```rust
//! use stylish_scale::{cpu::Resampler, plan::{build_plan, QualityRange, Size}};
//!
//! let input = Size { w: 640, h: 480 };
//! let plan = build_plan(input, QualityRange::default(), 2);
//! assert_eq!(plan.model, Size { w: 320, h: 240 });
//!
//! let frame = vec![0u8; (input.w * input.h * 4) as usize];
//! let mut resampler = Resampler::new();
//! let small = resampler.scale_down(&frame, input, None, plan.model).unwrap();
//! assert_eq!(small.len(), (plan.model.w * plan.model.h * 4) as usize);
//! ```

pub mod cpu;
pub mod plan;
pub mod tensor;

pub use cpu::{Filter, Resampler, ScaleError};
pub use plan::{
    QualityPreset, QualityRange, ResamplePlan, Size, build_plan, downscale_factor, model_input_size,
};
