use std::sync::Arc;

use crate::error::{NavError, Result};
use crate::geometry::{Point, Size};

/// Fill byte for the synthetic highlight. The compositor colorizes it, so any
/// neutral mid-gray works.
pub const NEUTRAL_GRAY: u8 = 0x80;

/// Packed RGBA8 pixel buffer, one `u32` per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    size: Size,
    pixels: Vec<u32>,
}

impl Bitmap {
    /// Allocate a bitmap with every byte set to `fill`.
    ///
    /// Uses fallible allocation so that a huge menu resolution cannot abort the
    /// process from inside a render call.
    pub fn try_filled(size: Size, fill: u8) -> Result<Self> {
        let count = size.area();
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(count)
            .map_err(|_| NavError::Alloc { pixels: count })?;
        pixels.resize(count, u32::from_ne_bytes([fill; 4]));
        Ok(Self { size, pixels })
    }

    /// Copy RGBA8 rows out of a strided byte buffer.
    pub fn from_rgba8(size: Size, stride: usize, data: &[u8]) -> Result<Self> {
        let row_bytes = size.w.max(0) as usize * 4;
        let rows = size.h.max(0) as usize;
        let needed = if rows == 0 {
            0
        } else {
            stride.saturating_mul(rows - 1).saturating_add(row_bytes)
        };
        if stride < row_bytes || data.len() < needed {
            return Err(NavError::InvalidBitmap {
                size,
                stride,
                len: data.len(),
            });
        }

        let mut bitmap = Self::try_filled(size, 0)?;
        let dst: &mut [u8] = bytemuck::cast_slice_mut(&mut bitmap.pixels);
        for row in 0..rows {
            let src = &data[row * stride..row * stride + row_bytes];
            dst[row * row_bytes..(row + 1) * row_bytes].copy_from_slice(src);
        }
        Ok(bitmap)
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Bytes per row. Bitmaps are always tightly packed.
    pub fn stride(&self) -> usize {
        self.size.w.max(0) as usize * 4
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}

/// Image supplied by the navigation source, positioned in video coordinates.
#[derive(Debug, Clone)]
pub struct OverlayImage {
    pub pos: Point,
    pub bitmap: Arc<Bitmap>,
}

impl OverlayImage {
    pub fn new(pos: Point, bitmap: Bitmap) -> Self {
        Self {
            pos,
            bitmap: Arc::new(bitmap),
        }
    }

    pub fn size(&self) -> Size {
        self.bitmap.size()
    }
}

/// One bitmap handed to the compositor.
///
/// `x`/`y` place the part, `w`/`h` select how much of `bitmap` to draw from its
/// top-left corner (`stride` bytes per row). `dw`/`dh` are the on-screen size once
/// rescaled to display resolution.
#[derive(Debug, Clone)]
pub struct OverlayPart {
    pub bitmap: Arc<Bitmap>,
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    pub stride: usize,
    pub dw: i32,
    pub dh: i32,
}

impl OverlayPart {
    /// Part covering `size` pixels of `bitmap`, placed at `pos` in video space.
    pub fn new(bitmap: Arc<Bitmap>, pos: Point, size: Size) -> Self {
        Self {
            bitmap,
            x: pos.x,
            y: pos.y,
            w: size.w,
            h: size.h,
            stride: size.w.max(0) as usize * 4,
            dw: size.w,
            dh: size.h,
        }
    }

    pub fn from_overlay(image: &OverlayImage) -> Self {
        let mut part = Self::new(Arc::clone(&image.bitmap), image.pos, image.size());
        part.stride = image.bitmap.stride();
        part
    }
}
