// SPDX-License-Identifier: MIT
// CPU resampler built on fast_image_resize (SIMD-accelerated).
// BGRA8 in, BGRA8 out. Area averaging for shrink, Catmull-Rom for enlarge.

use fast_image_resize as fir;
use fir::images::{TypedImage, TypedImageRef};
use fir::pixels::U8x4;
use fir::{FilterType, ResizeAlg, ResizeOptions, Resizer};

use crate::plan::Size;

#[derive(Debug)]
pub enum ScaleError {
    BufferTooSmall { needed: usize, actual: usize },
    EmptyInput,
    Fir(fir::ResizeError),
    ImageBuf(fir::ImageBufferError),
}

impl From<fir::ResizeError> for ScaleError {
    fn from(e: fir::ResizeError) -> Self {
        Self::Fir(e)
    }
}

impl From<fir::ImageBufferError> for ScaleError {
    fn from(e: fir::ImageBufferError) -> Self {
        Self::ImageBuf(e)
    }
}

impl std::fmt::Display for ScaleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScaleError::BufferTooSmall { needed, actual } => {
                write!(f, "Buffer too small: need {} bytes, got {}", needed, actual)
            }
            ScaleError::EmptyInput => write!(f, "Input image has a zero dimension"),
            ScaleError::Fir(e) => write!(f, "Fast image resize error: {}", e),
            ScaleError::ImageBuf(e) => write!(f, "Image buffer error: {}", e),
        }
    }
}

impl std::error::Error for ScaleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScaleError::Fir(e) => Some(e),
            ScaleError::ImageBuf(e) => Some(e),
            _ => None,
        }
    }
}

/// Resampling kernel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Filter {
    /// Box convolution: every source pixel contributes to the average of the
    /// destination pixel it falls into.
    Area,
    /// Catmull-Rom bicubic.
    Cubic,
}

impl Filter {
    fn options(self) -> ResizeOptions {
        let alg = match self {
            Filter::Area => ResizeAlg::Convolution(FilterType::Box),
            Filter::Cubic => ResizeAlg::Convolution(FilterType::CatmullRom),
        };
        // Alpha is always opaque for screen captures.
        ResizeOptions::new().resize_alg(alg).use_alpha(false)
    }
}

/// Pre-allocated scratch to compact strided input to tightly packed rows (only if needed).
pub struct Staging {
    pub(crate) buf: Vec<u8>,
}
impl Staging {
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            buf: Vec::with_capacity(cap),
        }
    }

    pub fn ensure_len(&mut self, len: usize) {
        if self.buf.len() < len {
            self.buf.resize(len, 0);
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }
}

/// Minimum number of bytes a strided image of `size` occupies.
fn strided_len(size: Size, pitch: usize) -> usize {
    if size.h == 0 {
        return 0;
    }
    pitch * (size.h as usize - 1) + (size.w as usize) * 4
}

/// Resize `src_bgra` into `dst`.
/// `src_stride_bytes`: bytes per row of source. If `Some(stride) != width*4`,
/// rows are compacted into staging.
/// `dst` must hold at least `out.w * out.h * 4` bytes (BGRA).
pub fn scale_bgra_cpu(
    resizer: &mut Resizer,
    src_bgra: &[u8],
    src: Size,
    src_stride_bytes: Option<usize>,
    out: Size,
    filter: Filter,
    dst: &mut [u8],
    staging: &mut Staging,
) -> Result<(), ScaleError> {
    if src.is_empty() || out.is_empty() {
        return Err(ScaleError::EmptyInput);
    }
    let dst_len = out.bgra_len();
    if dst.len() < dst_len {
        return Err(ScaleError::BufferTooSmall { needed: dst_len, actual: dst.len() });
    }

    let src_tight = tight_view(src_bgra, src, src_stride_bytes, staging)?;

    if src == out {
        dst[..dst_len].copy_from_slice(&src_tight[..dst_len]);
        return Ok(());
    }

    let src_view = TypedImageRef::<U8x4>::from_buffer(src.w, src.h, src_tight)?;
    let mut dst_image = TypedImage::<U8x4>::from_buffer(out.w, out.h, &mut dst[..dst_len])?;
    resizer.resize_typed::<U8x4>(&src_view, &mut dst_image, &filter.options())?;

    Ok(())
}

/// Borrow `src` as tightly packed rows, compacting through `staging` when the
/// pitch is wider than the row.
fn tight_view<'a>(
    src: &'a [u8],
    size: Size,
    pitch: Option<usize>,
    staging: &'a mut Staging,
) -> Result<&'a [u8], ScaleError> {
    let row_bytes = (size.w as usize) * 4;
    let tight_len = size.bgra_len();
    let pitch = pitch.unwrap_or(row_bytes).max(row_bytes);

    let needed = strided_len(size, pitch);
    if src.len() < needed {
        return Err(ScaleError::BufferTooSmall { needed, actual: src.len() });
    }

    if pitch == row_bytes {
        return Ok(&src[..tight_len]);
    }
    staging.ensure_len(tight_len);
    compact_rows(src, pitch, &mut staging.buf[..tight_len], row_bytes, size.h as usize);
    Ok(&staging.buf[..tight_len])
}

#[inline]
fn compact_rows(src: &[u8], src_pitch: usize, dst: &mut [u8], row_bytes: usize, rows: usize) {
    for r in 0..rows {
        let s = &src[r * src_pitch..r * src_pitch + row_bytes];
        let d = &mut dst[r * row_bytes..(r + 1) * row_bytes];
        d.copy_from_slice(s);
    }
}

/// Owns the resizer state and staging scratch reused across frames.
pub struct Resampler {
    resizer: Resizer,
    staging: Staging,
}

impl Default for Resampler {
    fn default() -> Self {
        Self::new()
    }
}

impl Resampler {
    pub fn new() -> Self {
        Self {
            resizer: Resizer::new(),
            staging: Staging::with_capacity(0),
        }
    }

    /// Shrink a captured frame to the model resolution with area averaging.
    pub fn scale_down(
        &mut self,
        src: &[u8],
        src_size: Size,
        src_stride_bytes: Option<usize>,
        out: Size,
    ) -> Result<Vec<u8>, ScaleError> {
        self.resample(src, src_size, src_stride_bytes, out, Filter::Area)
    }

    /// Enlarge the model output back to capture resolution with a cubic filter.
    pub fn scale_up(
        &mut self,
        src: &[u8],
        src_size: Size,
        out: Size,
    ) -> Result<Vec<u8>, ScaleError> {
        self.resample(src, src_size, None, out, Filter::Cubic)
    }

    pub fn resample(
        &mut self,
        src: &[u8],
        src_size: Size,
        src_stride_bytes: Option<usize>,
        out: Size,
        filter: Filter,
    ) -> Result<Vec<u8>, ScaleError> {
        let mut dst = vec![0u8; out.bgra_len()];
        scale_bgra_cpu(
            &mut self.resizer,
            src,
            src_size,
            src_stride_bytes,
            out,
            filter,
            &mut dst,
            &mut self.staging,
        )?;
        Ok(dst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(size: Size, bgra: [u8; 4]) -> Vec<u8> {
        bgra.iter().copied().cycle().take(size.bgra_len()).collect()
    }

    #[test]
    fn same_size_is_a_copy() {
        let size = Size::new(8, 4);
        let src: Vec<u8> = (0..size.bgra_len()).map(|i| i as u8).collect();
        let out = Resampler::new().scale_down(&src, size, None, size).unwrap();
        assert_eq!(out, src);
    }

    #[test]
    fn area_downscale_averages() {
        // 2x1 black/white -> 1x1 grey
        let src = vec![0, 0, 0, 255, 255, 255, 255, 255];
        let out = Resampler::new()
            .scale_down(&src, Size::new(2, 1), None, Size::new(1, 1))
            .unwrap();
        assert!((126..=129).contains(&out[0]), "got {}", out[0]);
    }

    #[test]
    fn solid_colour_survives_round_trip() {
        let big = Size::new(64, 48);
        let small = Size::new(16, 12);
        let src = solid(big, [10, 120, 240, 255]);
        let mut r = Resampler::new();
        let down = r.scale_down(&src, big, None, small).unwrap();
        let up = r.scale_up(&down, small, big).unwrap();
        assert_eq!(up.len(), big.bgra_len());
        for px in up.chunks_exact(4) {
            for (got, want) in px[..3].iter().zip([10u8, 120, 240]) {
                assert!(got.abs_diff(want) <= 1, "{} vs {}", got, want);
            }
        }
    }

    #[test]
    fn strided_rows_are_compacted() {
        let size = Size::new(2, 2);
        let pitch = 12; // 4 bytes of padding per row
        let mut src = vec![0xAAu8; pitch * 2];
        src[..8].copy_from_slice(&[1, 2, 3, 255, 4, 5, 6, 255]);
        src[12..20].copy_from_slice(&[7, 8, 9, 255, 10, 11, 12, 255]);
        let out = Resampler::new().scale_down(&src, size, Some(pitch), size).unwrap();
        assert_eq!(
            out,
            vec![1, 2, 3, 255, 4, 5, 6, 255, 7, 8, 9, 255, 10, 11, 12, 255]
        );
    }

    #[test]
    fn short_source_is_rejected() {
        let err = Resampler::new()
            .scale_down(&[0u8; 10], Size::new(4, 4), None, Size::new(4, 4))
            .unwrap_err();
        assert!(matches!(err, ScaleError::BufferTooSmall { needed: 64, actual: 10 }));
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = Resampler::new()
            .scale_down(&[], Size::new(0, 4), None, Size::new(4, 4))
            .unwrap_err();
        assert!(matches!(err, ScaleError::EmptyInput));
    }
}
