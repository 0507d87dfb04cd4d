//! Read-only style descriptors.

use stylish_scale::Size;
use stylish_scale::tensor::rgb_len;

use crate::error::{StylishError, StylishResult};

/// Normalized RGB float blob (height × width × 3, values in `[0, 1]`),
/// borrowed for the duration of one inference call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleDescriptor<'a> {
    pub blob: &'a [f32],
    pub width: u32,
    pub height: u32,
}

impl<'a> StyleDescriptor<'a> {
    pub fn new(blob: &'a [f32], width: u32, height: u32) -> StylishResult<Self> {
        let expected = rgb_len(Size::new(width, height));
        if blob.len() != expected || expected == 0 {
            return Err(StylishError::style(
                None,
                format!(
                    "blob holds {} floats, {}x{} RGB needs {}",
                    blob.len(),
                    width,
                    height,
                    expected
                ),
            ));
        }
        Ok(Self { blob, width, height })
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Per-channel mean over the blob.
    pub fn channel_means(&self) -> [f32; 3] {
        let mut sums = [0f64; 3];
        for px in self.blob.chunks_exact(3) {
            for (sum, v) in sums.iter_mut().zip(px) {
                *sum += *v as f64;
            }
        }
        let n = (self.blob.len() / 3).max(1) as f64;
        sums.map(|s| (s / n) as f32)
    }
}

/// Supplies the active style, if any. `None` means the raw capture is shown.
pub trait StyleSource {
    fn active_image(&self) -> Option<StyleDescriptor<'_>>;
}

/// A single style held in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct OwnedStyle {
    pub blob: Vec<f32>,
    pub width: u32,
    pub height: u32,
}

impl OwnedStyle {
    pub fn new(blob: Vec<f32>, width: u32, height: u32) -> StylishResult<Self> {
        StyleDescriptor::new(&blob, width, height)?;
        Ok(Self { blob, width, height })
    }

    /// A style of one flat colour, RGB in `[0, 1]`.
    pub fn solid(rgb: [f32; 3], width: u32, height: u32) -> Self {
        let blob = rgb
            .iter()
            .copied()
            .cycle()
            .take(rgb_len(Size::new(width, height)))
            .collect();
        Self { blob, width, height }
    }

    pub fn descriptor(&self) -> StyleDescriptor<'_> {
        StyleDescriptor {
            blob: &self.blob,
            width: self.width,
            height: self.height,
        }
    }
}

impl StyleSource for OwnedStyle {
    fn active_image(&self) -> Option<StyleDescriptor<'_>> {
        Some(self.descriptor())
    }
}

impl<T: StyleSource> StyleSource for Option<T> {
    fn active_image(&self) -> Option<StyleDescriptor<'_>> {
        self.as_ref().and_then(StyleSource::active_image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_validates_length() {
        let blob = vec![0.5f32; 2 * 2 * 3];
        assert!(StyleDescriptor::new(&blob, 2, 2).is_ok());
        assert!(StyleDescriptor::new(&blob, 3, 2).is_err());
        assert!(StyleDescriptor::new(&[], 0, 0).is_err());
    }

    #[test]
    fn test_solid_style_means() {
        let style = OwnedStyle::solid([0.25, 0.5, 1.0], 4, 4);
        let means = style.descriptor().channel_means();
        assert!((means[0] - 0.25).abs() < 1e-6);
        assert!((means[2] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_option_source() {
        let none: Option<OwnedStyle> = None;
        assert!(none.active_image().is_none());
        assert!(Some(OwnedStyle::solid([0.0; 3], 1, 1)).active_image().is_some());
    }
}
