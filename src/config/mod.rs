//! # Configuration Module
//!
//! Startup configuration for the pipeline and the small settings file that
//! remembers user choices between runs.

pub mod config;
pub mod settings;

pub use config::{MAX_QUALITY_STEPS, PipelineConfig};
pub use settings::{SETTINGS_HEADER, Settings};
