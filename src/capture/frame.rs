//! Frame buffers delivered by the magnifier callback.

use stylish_scale::Size;

use crate::error::{StylishError, StylishResult};

/// Bytes per BGRA pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// Geometry of an incoming capture buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHeader {
    pub width: u32,
    pub height: u32,
    /// Bytes per row, at least `width * 4`
    pub stride: usize,
}

impl ImageHeader {
    pub fn new(width: u32, height: u32, stride: usize) -> Self {
        Self { width, height, stride }
    }

    /// Header of a tightly packed buffer.
    pub fn packed(width: u32, height: u32) -> Self {
        Self::new(width, height, width as usize * BYTES_PER_PIXEL)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Bytes the callback hands over: `height * stride`.
    pub fn byte_len(&self) -> usize {
        self.height as usize * self.stride
    }

    fn validate(&self) -> StylishResult<()> {
        let row = self.width as usize * BYTES_PER_PIXEL;
        if self.stride < row {
            return Err(StylishError::frame_capture(format!(
                "stride {} smaller than row of {} bytes",
                self.stride, row
            )));
        }
        Ok(())
    }
}

/// Borrowed view of the buffer passed to the capture callback. Only valid for
/// the duration of the callback.
#[derive(Debug, Clone, Copy)]
pub struct RawImage<'a> {
    pub data: &'a [u8],
    pub header: ImageHeader,
}

impl<'a> RawImage<'a> {
    pub fn new(data: &'a [u8], header: ImageHeader) -> Self {
        Self { data, header }
    }
}

/// The single most recent frame, top-down BGRA rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedFrame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    stride: usize,
}

impl CapturedFrame {
    /// Copy `height * stride` bytes out of a callback buffer.
    pub fn from_raw(raw: RawImage<'_>) -> StylishResult<Self> {
        let mut frame = Self {
            data: Vec::new(),
            width: 0,
            height: 0,
            stride: 0,
        };
        frame.replace_from(raw)?;
        Ok(frame)
    }

    /// Replace the contents wholesale, reusing the allocation.
    pub fn replace_from(&mut self, raw: RawImage<'_>) -> StylishResult<()> {
        raw.header.validate()?;
        let len = raw.header.byte_len();
        if raw.data.len() < len {
            return Err(StylishError::frame_capture(format!(
                "buffer holds {} bytes, header describes {}",
                raw.data.len(),
                len
            )));
        }
        self.data.clear();
        self.data.extend_from_slice(&raw.data[..len]);
        self.width = raw.header.width;
        self.height = raw.header.height;
        self.stride = raw.header.stride;
        Ok(())
    }

    /// Wrap a tightly packed BGRA buffer.
    pub fn from_bgra(data: Vec<u8>, width: u32, height: u32) -> StylishResult<Self> {
        let header = ImageHeader::packed(width, height);
        if data.len() != header.byte_len() {
            return Err(StylishError::frame_capture(format!(
                "expected {} bytes for {}x{}, got {}",
                header.byte_len(),
                width,
                height,
                data.len()
            )));
        }
        Ok(Self {
            data,
            width,
            height,
            stride: header.stride,
        })
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn is_packed(&self) -> bool {
        self.stride == self.width as usize * BYTES_PER_PIXEL
    }

    pub fn as_raw(&self) -> RawImage<'_> {
        RawImage::new(&self.data, ImageHeader::new(self.width, self.height, self.stride))
    }

    /// BGRA at (x, y), if in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let at = y as usize * self.stride + x as usize * BYTES_PER_PIXEL;
        self.data.get(at..at + 4).map(|px| [px[0], px[1], px[2], px[3]])
    }

    /// Rows without stride padding.
    pub fn to_packed(&self) -> Vec<u8> {
        let row = self.width as usize * BYTES_PER_PIXEL;
        if self.is_packed() {
            return self.data[..row * self.height as usize].to_vec();
        }
        let mut out = Vec::with_capacity(row * self.height as usize);
        for y in 0..self.height as usize {
            out.extend_from_slice(&self.data[y * self.stride..y * self.stride + row]);
        }
        out
    }
}
