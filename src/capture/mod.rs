//! # Capture Module
//!
//! Frame buffers and the capture source that drives the magnifier control.

pub mod frame;
pub mod source;

pub use frame::{BYTES_PER_PIXEL, CapturedFrame, ImageHeader, RawImage};
pub use source::CaptureSource;
