// SPDX-License-Identifier: MIT
//! Conversion between packed BGRA8 frames and the normalized RGB f32 layout
//! (height × width × 3, values in `[0, 1]`) the style model consumes.

use crate::cpu::ScaleError;
use crate::plan::Size;

pub const RGB_CHANNELS: usize = 3;

/// Number of floats in an RGB tensor of `size`.
pub fn rgb_len(size: Size) -> usize {
    (size.w as usize) * (size.h as usize) * RGB_CHANNELS
}

/// Tightly packed BGRA8 -> RGB f32 in `[0, 1]`; alpha is dropped.
pub fn bgra_to_rgb_f32(bgra: &[u8], size: Size) -> Result<Vec<f32>, ScaleError> {
    let needed = size.bgra_len();
    if bgra.len() < needed {
        return Err(ScaleError::BufferTooSmall { needed, actual: bgra.len() });
    }
    let mut out = Vec::with_capacity(rgb_len(size));
    for px in bgra[..needed].chunks_exact(4) {
        out.push(px[2] as f32 / 255.0);
        out.push(px[1] as f32 / 255.0);
        out.push(px[0] as f32 / 255.0);
    }
    Ok(out)
}

/// RGB f32 -> opaque BGRA8. Values are scaled by 255, rounded to nearest and
/// saturated, so out-of-range model output cannot wrap.
pub fn rgb_f32_to_bgra(rgb: &[f32], size: Size) -> Result<Vec<u8>, ScaleError> {
    let needed = rgb_len(size);
    if rgb.len() < needed {
        return Err(ScaleError::BufferTooSmall { needed, actual: rgb.len() });
    }
    let mut out = Vec::with_capacity(size.bgra_len());
    for px in rgb[..needed].chunks_exact(RGB_CHANNELS) {
        out.push(to_u8(px[2]));
        out.push(to_u8(px[1]));
        out.push(to_u8(px[0]));
        out.push(255);
    }
    Ok(out)
}

/// Packed RGB8 (e.g. a decoded style image) -> RGB f32 in `[0, 1]`.
pub fn rgb_u8_to_f32(rgb: &[u8]) -> Vec<f32> {
    rgb.iter().map(|&v| v as f32 / 255.0).collect()
}

#[inline]
fn to_u8(v: f32) -> u8 {
    // NaN saturates to 0
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swaps_channel_order() {
        let bgra = [10u8, 20, 30, 255];
        let rgb = bgra_to_rgb_f32(&bgra, Size::new(1, 1)).unwrap();
        assert_eq!(rgb, vec![30.0 / 255.0, 20.0 / 255.0, 10.0 / 255.0]);
    }

    #[test]
    fn back_conversion_saturates_and_is_opaque() {
        let rgb = [1.5f32, -0.2, 0.5];
        let bgra = rgb_f32_to_bgra(&rgb, Size::new(1, 1)).unwrap();
        assert_eq!(bgra, vec![128, 0, 255, 255]);
    }

    #[test]
    fn integer_values_are_stable() {
        let bgra: Vec<u8> = vec![0, 1, 2, 255, 127, 128, 254, 255];
        let size = Size::new(2, 1);
        let rgb = bgra_to_rgb_f32(&bgra, size).unwrap();
        assert_eq!(rgb_f32_to_bgra(&rgb, size).unwrap(), bgra);
    }

    #[test]
    fn short_tensor_is_rejected() {
        assert!(rgb_f32_to_bgra(&[0.0; 5], Size::new(2, 1)).is_err());
    }
}
