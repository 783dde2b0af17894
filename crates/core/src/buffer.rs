//! CPU-side RGBA frame buffer with trail-fade compositing.
//!
//! The particle system draws into this buffer every tick. Instead of
//! clearing between frames, [`FrameBuffer::fade`] scales every channel down,
//! so previous strokes linger as dimming trails — the pixel-buffer
//! equivalent of a translucent-black erase composite on a canvas.

use crate::error::FlowError;
use crate::scale::Rgba;

/// An RGBA8 pixel buffer, row-major, 4 bytes per pixel.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl FrameBuffer {
    /// Creates a transparent buffer of the given dimensions.
    ///
    /// Returns `FlowError::InvalidDimensions` if either dimension is zero or
    /// the byte length overflows `usize`.
    pub fn new(width: usize, height: usize) -> Result<Self, FlowError> {
        if width == 0 || height == 0 {
            return Err(FlowError::InvalidDimensions);
        }
        let len = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(4))
            .ok_or(FlowError::InvalidDimensions)?;
        Ok(Self {
            width,
            height,
            data: vec![0; len],
        })
    }

    /// Buffer width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Buffer height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Read-only access to the raw RGBA bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Resets every pixel to transparent black.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Scales every channel by `retain` in [0, 1], dimming previous frames
    /// into trails. `retain = 1.0` keeps the frame untouched.
    pub fn fade(&mut self, retain: f64) {
        let retain = retain.clamp(0.0, 1.0) as f32;
        for c in &mut self.data {
            *c = (*c as f32 * retain) as u8;
        }
    }

    /// Writes one pixel. Out-of-bounds coordinates are ignored.
    pub fn set_pixel(&mut self, x: i64, y: i64, color: Rgba) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * 4;
        self.data[idx..idx + 4].copy_from_slice(&color);
    }

    /// Reads one pixel, or `None` out of bounds.
    pub fn pixel(&self, x: i64, y: i64) -> Option<Rgba> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        let idx = (y as usize * self.width + x as usize) * 4;
        Some([
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ])
    }

    /// Strokes a 1-pixel line from (x0, y0) to (x1, y1) with Bresenham's
    /// algorithm. Segments reaching outside the buffer are clipped per pixel.
    pub fn draw_line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, color: Rgba) {
        let (mut x, mut y) = (x0.round() as i64, y0.round() as i64);
        let (ex, ey) = (x1.round() as i64, y1.round() as i64);
        let dx = (ex - x).abs();
        let dy = -(ey - y).abs();
        let sx = if x < ex { 1 } else { -1 };
        let sy = if y < ey { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.set_pixel(x, y, color);
            if x == ex && y == ey {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Writes the buffer as a PNG image.
    #[cfg(feature = "png")]
    pub fn write_png(&self, path: &std::path::Path) -> Result<(), FlowError> {
        let w = u32::try_from(self.width).map_err(|_| FlowError::InvalidDimensions)?;
        let h = u32::try_from(self.height).map_err(|_| FlowError::InvalidDimensions)?;
        let img = image::RgbaImage::from_raw(w, h, self.data.clone())
            .ok_or_else(|| FlowError::Io("RGBA buffer size mismatch".into()))?;
        img.save(path).map_err(|e| FlowError::Io(e.to_string()))
    }
}
