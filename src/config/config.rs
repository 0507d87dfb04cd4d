//! # Pipeline Configuration
//!
//! | Parameter | Default | Constraint |
//! |-----------|---------|------------|
//! | `timer_interval_ms` | 10 | > 0 |
//! | `initial_rect` | (100, 100)-(600, 634) | non-empty |
//! | `quality_min` / `quality_max` | 0 / 3 | min <= max, at most 16 steps apart |
//! | `quality` | 2 | within the range |
//! | `provider` | `cpu` | |
//! | `inference_enabled` | true | |
//! | `style_folder` | `styles` | |
//! | `style_size` | 256 | > 0 |
//! | `settings_path` | `stylish.ini` | |
//!
//! Every field is optional in the JSON file; missing ones take the default.
//!
//! ```rust
//! use stylish::config::PipelineConfig;
//!
//! let config: PipelineConfig = serde_json::from_str(r#"{ "quality": 1 }"#).unwrap();
//! assert_eq!(config.quality, 1);
//! assert_eq!(config.timer_interval_ms, 10);
//! assert!(config.validate().is_ok());
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use stylish_scale::QualityRange;

use crate::error::{StylishError, StylishResult};
use crate::inference::Provider;
use crate::monitor::ScreenRect;
use crate::style::{DEFAULT_STYLE_FOLDER, DEFAULT_STYLE_SIZE};

/// Widest quality range accepted; each step halves the model input.
pub const MAX_QUALITY_STEPS: u32 = 16;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Capture timer period in milliseconds
    pub timer_interval_ms: u64,
    /// Window client rectangle at creation, in screen coordinates
    pub initial_rect: ScreenRect,
    pub quality_min: i32,
    pub quality_max: i32,
    /// Quality/performance factor at startup
    pub quality: i32,
    pub provider: Provider,
    pub inference_enabled: bool,
    pub style_folder: PathBuf,
    /// Side length styles are resized to
    pub style_size: u32,
    pub settings_path: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            timer_interval_ms: 10,
            initial_rect: ScreenRect::new(100, 100, 600, 634),
            quality_min: 0,
            quality_max: 3,
            quality: 2,
            provider: Provider::Cpu,
            inference_enabled: true,
            style_folder: PathBuf::from(DEFAULT_STYLE_FOLDER),
            style_size: DEFAULT_STYLE_SIZE,
            settings_path: PathBuf::from("stylish.ini"),
        }
    }
}

impl PipelineConfig {
    /// Read a JSON config file and validate it.
    pub fn load(path: &Path) -> StylishResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            StylishError::io("read config", e).with_path(path.display().to_string())
        })?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> StylishResult<()> {
        if self.timer_interval_ms == 0 {
            return Err(StylishError::validation(
                "timer_interval_ms",
                "must be greater than 0",
                "0",
            ));
        }
        if self.initial_rect.is_empty() {
            return Err(StylishError::validation(
                "initial_rect",
                "must have a non-zero width and height",
                format!("{:?}", self.initial_rect),
            ));
        }
        if self.quality_min > self.quality_max {
            return Err(StylishError::config(
                "quality_min",
                self.quality_min.to_string(),
                format!("greater than quality_max ({})", self.quality_max),
            ));
        }
        if self.quality_range().width() > MAX_QUALITY_STEPS {
            return Err(StylishError::config(
                "quality_min",
                self.quality_min.to_string(),
                format!(
                    "more than {} steps below quality_max ({})",
                    MAX_QUALITY_STEPS, self.quality_max
                ),
            ));
        }
        if !self.quality_range().contains(self.quality) {
            return Err(StylishError::validation(
                "quality",
                format!("must be between {} and {}", self.quality_min, self.quality_max),
                self.quality.to_string(),
            ));
        }
        if self.style_size == 0 {
            return Err(StylishError::validation(
                "style_size",
                "must be greater than 0",
                "0",
            ));
        }
        Ok(())
    }

    pub fn quality_range(&self) -> QualityRange {
        QualityRange::new(self.quality_min, self.quality_max)
    }

    pub fn timer_interval(&self) -> Duration {
        Duration::from_millis(self.timer_interval_ms)
    }
}
