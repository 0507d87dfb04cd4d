//! User settings persisted as `Key=Value` lines:
//!
//! ```text
//! [Stylish][Neural Style Transfer]
//! Enabled=1
//! Provider=0
//! StyleImage=styles/wave.png
//! Quality=2
//! ```
//!
//! Unknown keys and malformed values are ignored, so a damaged file degrades
//! to defaults instead of failing startup.

use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{StylishError, StylishResult};
use crate::inference::{Provider, StyleInference};
use crate::style::StyleImageCache;

pub const SETTINGS_HEADER: &str = "[Stylish][Neural Style Transfer]";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub enabled: Option<bool>,
    pub provider: Option<Provider>,
    pub style_image: Option<PathBuf>,
    pub quality: Option<i32>,
}

impl Settings {
    pub fn parse(text: &str) -> Self {
        let mut settings = Self::default();
        for line in text.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                debug!(line, "ignoring settings line");
                continue;
            };
            let value = value.trim();
            match key.trim() {
                "Enabled" => settings.enabled = value.parse::<i32>().ok().map(|v| v != 0),
                "Provider" => {
                    settings.provider = value.parse().ok().and_then(Provider::from_index)
                }
                "StyleImage" if !value.is_empty() => {
                    settings.style_image = Some(PathBuf::from(value))
                }
                "Quality" => settings.quality = value.parse().ok(),
                _ => debug!(key, "ignoring settings key"),
            }
        }
        settings
    }

    /// Snapshot the current user-facing state.
    pub fn capture(inference: &dyn StyleInference, styles: &StyleImageCache) -> Self {
        Self {
            enabled: Some(inference.is_enabled()),
            provider: Some(inference.provider()),
            style_image: styles.active_path().map(Path::to_path_buf),
            quality: Some(inference.quality_factor()),
        }
    }

    /// Restore saved state. The adapter clamps the quality and falls back from
    /// an unavailable GPU; an unknown style image is ignored.
    pub fn apply(&self, inference: &mut dyn StyleInference, styles: &mut StyleImageCache) {
        match self.enabled {
            Some(true) => inference.enable(),
            Some(false) => inference.disable(),
            None => {}
        }
        if let Some(provider) = self.provider {
            inference.set_provider(provider);
        }
        if let Some(quality) = self.quality {
            inference.set_quality_factor(quality);
        }
        if let Some(path) = &self.style_image {
            styles.set_active_image(path);
        }
    }

    /// Read settings from `path`; a missing file yields defaults.
    pub fn load(path: &Path) -> StylishResult<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => Ok(Self::parse(&text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => {
                Err(StylishError::io("read settings", e).with_path(path.display().to_string()))
            }
        }
    }

    pub fn save(&self, path: &Path) -> StylishResult<()> {
        std::fs::write(path, self.to_string())
            .map_err(|e| {
                StylishError::io("write settings", e).with_path(path.display().to_string())
            })
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", SETTINGS_HEADER)?;
        if let Some(enabled) = self.enabled {
            writeln!(f, "Enabled={}", enabled as i32)?;
        }
        if let Some(provider) = self.provider {
            writeln!(f, "Provider={}", provider.index())?;
        }
        if let Some(path) = &self.style_image {
            writeln!(f, "StyleImage={}", path.display())?;
        }
        if let Some(quality) = self.quality {
            writeln!(f, "Quality={}", quality)?;
        }
        Ok(())
    }
}
