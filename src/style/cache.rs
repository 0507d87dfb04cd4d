//! # Style Image Cache
//!
//! Loads every image in a folder as a style: centre-cropped to a square,
//! area-resized to the style input size and normalized to an RGB float blob.
//! Reloading only decodes files whose modification time changed, and files
//! that disappeared from the folder are dropped.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use image::imageops;
use stylish_scale::tensor::rgb_u8_to_f32;
use stylish_scale::{Filter, Resampler, Size};
use tracing::{debug, info, warn};

use super::descriptor::{StyleDescriptor, StyleSource};
use crate::capture::BYTES_PER_PIXEL;
use crate::error::{StylishError, StylishResult};

pub const DEFAULT_STYLE_FOLDER: &str = "styles";
pub const DEFAULT_STYLE_SIZE: u32 = 256;

/// One decoded style image.
#[derive(Debug, Clone)]
pub struct StyleImage {
    path: PathBuf,
    modified: Option<SystemTime>,
    blob: Vec<f32>,
    size: u32,
}

impl StyleImage {
    /// Decode `path` into a `size`×`size` style.
    pub fn decode(path: &Path, size: u32) -> StylishResult<Self> {
        let modified = fs::metadata(path).and_then(|m| m.modified()).ok();
        let rgba = image::open(path)
            .map_err(|e| StylishError::style(Some(path.display().to_string()), e.to_string()))?
            .to_rgba8();

        let (w, h) = rgba.dimensions();
        let side = w.min(h);
        if side == 0 || size == 0 {
            return Err(StylishError::style(
                Some(path.display().to_string()),
                format!("cannot make a {}px style from a {}x{} image", size, w, h),
            ));
        }
        let square = imageops::crop_imm(&rgba, (w - side) / 2, (h - side) / 2, side, side)
            .to_image();

        // area averaging when shrinking, cubic when the source is smaller
        let filter = if side >= size { Filter::Area } else { Filter::Cubic };
        let resized = Resampler::new()
            .resample(
                square.as_raw(),
                Size::new(side, side),
                None,
                Size::new(size, size),
                filter,
            )
            .map_err(|e| StylishError::style(Some(path.display().to_string()), e.to_string()))?;
        let rgb: Vec<u8> = resized
            .chunks_exact(BYTES_PER_PIXEL)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect();

        Ok(Self {
            path: path.to_path_buf(),
            modified,
            blob: rgb_u8_to_f32(&rgb),
            size,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn descriptor(&self) -> StyleDescriptor<'_> {
        StyleDescriptor {
            blob: &self.blob,
            width: self.size,
            height: self.size,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StyleImageCache {
    size: u32,
    images: BTreeMap<PathBuf, StyleImage>,
    active: Option<PathBuf>,
}

impl Default for StyleImageCache {
    fn default() -> Self {
        Self::new(DEFAULT_STYLE_SIZE)
    }
}

impl StyleImageCache {
    pub fn new(size: u32) -> Self {
        Self {
            size,
            images: BTreeMap::new(),
            active: None,
        }
    }

    /// Sync the cache with `folder`. Returns how many files were decoded.
    ///
    /// Unreadable images are skipped with a warning. The active style is kept
    /// if it is still present, otherwise the first image (by path) becomes
    /// active.
    pub fn load(&mut self, folder: &Path) -> StylishResult<usize> {
        let entries = fs::read_dir(folder).map_err(|e| {
            StylishError::io("read style folder", e).with_path(folder.display().to_string())
        })?;

        let mut present = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.is_file() {
                present.push(path);
            }
        }
        self.images.retain(|path, _| present.contains(path));

        let mut decoded = 0;
        for path in present {
            let modified = fs::metadata(&path).and_then(|m| m.modified()).ok();
            if let Some(cached) = self.images.get(&path) {
                if modified.is_some() && cached.modified == modified {
                    debug!(path = %path.display(), "style unchanged");
                    continue;
                }
            }
            match StyleImage::decode(&path, self.size) {
                Ok(image) => {
                    self.images.insert(path, image);
                    decoded += 1;
                }
                Err(e) => {
                    warn!(error = %e, "skipping style image");
                    self.images.remove(&path);
                }
            }
        }

        self.reselect_active();
        info!(
            folder = %folder.display(),
            styles = self.images.len(),
            decoded,
            "style images loaded"
        );
        Ok(decoded)
    }

    fn reselect_active(&mut self) {
        let still_present = self
            .active
            .as_ref()
            .is_some_and(|p| self.images.contains_key(p));
        if !still_present {
            self.active = self.images.keys().next().cloned();
        }
    }

    /// Make `path` the active style. Unknown paths are ignored.
    pub fn set_active_image(&mut self, path: &Path) -> bool {
        if self.images.contains_key(path) {
            self.active = Some(path.to_path_buf());
            true
        } else {
            debug!(path = %path.display(), "ignoring unknown style");
            false
        }
    }

    pub fn active_path(&self) -> Option<&Path> {
        self.active.as_deref()
    }

    pub fn images(&self) -> impl Iterator<Item = &StyleImage> {
        self.images.values()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn clear(&mut self) {
        self.images.clear();
        self.active = None;
    }

    pub fn image_size(&self) -> u32 {
        self.size
    }
}

impl StyleSource for StyleImageCache {
    fn active_image(&self) -> Option<StyleDescriptor<'_>> {
        self.active
            .as_ref()
            .and_then(|p| self.images.get(p))
            .map(StyleImage::descriptor)
    }
}
