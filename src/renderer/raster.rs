//! Software raster canvas
//!
//! Packed RGBA pixels (see `Color::to_u32`), row-major, origin top-left.
//! Used by the in-memory surface; real hosts bring their own `Canvas`.

use glam::Vec2;

use super::{Canvas, Color};
use crate::sim::Rect;

/// A pre-scaled raster image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl Sprite {
    /// Wrap `pixels`; returns None if the buffer doesn't match the size
    pub fn new(width: u32, height: u32, pixels: Vec<u32>) -> Option<Self> {
        (pixels.len() == width as usize * height as usize).then_some(Self { width, height, pixels })
    }

    pub fn solid(width: u32, height: u32, color: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![color.to_u32(); width as usize * height as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelCanvas {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl PixelCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::BLACK.to_u32(); width as usize * height as usize],
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(Color::from_u32(self.pixels[self.offset(x, y)]))
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Clamp a span [start, end) in float pixels to [0, limit)
    fn clip(start: f32, end: f32, limit: u32) -> (u32, u32) {
        let lo = start.round().clamp(0.0, limit as f32) as u32;
        let hi = end.round().clamp(0.0, limit as f32) as u32;
        (lo, hi.max(lo))
    }
}

impl Canvas for PixelCanvas {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn draw_sprite(&mut self, sprite: &Sprite, pos: Vec2) {
        // Reject in float space so far-off (or NaN) positions never reach the integer math
        let on_x = pos.x < self.width as f32 && pos.x + sprite.width as f32 > 0.0;
        let on_y = pos.y < self.height as f32 && pos.y + sprite.height as f32 > 0.0;
        if !(on_x && on_y) {
            return;
        }
        let origin_x = pos.x.round() as i64;
        let origin_y = pos.y.round() as i64;

        for sy in 0..sprite.height {
            let y = origin_y + sy as i64;
            if y < 0 || y >= self.height as i64 {
                continue;
            }
            for sx in 0..sprite.width {
                let x = origin_x + sx as i64;
                if x < 0 || x >= self.width as i64 {
                    continue;
                }
                let src = sprite.pixels[sy as usize * sprite.width as usize + sx as usize];
                // Fully transparent texels leave the background visible
                if Color::from_u32(src).a == 0 {
                    continue;
                }
                let dst = self.offset(x as u32, y as u32);
                self.pixels[dst] = src;
            }
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let (x0, x1) = Self::clip(rect.left, rect.right, self.width);
        let (y0, y1) = Self::clip(rect.top, rect.bottom, self.height);
        let value = color.to_u32();
        for y in y0..y1 {
            let row = self.offset(0, y);
            self.pixels[row + x0 as usize..row + x1 as usize].fill(value);
        }
    }
}
