//! Frame composition
//!
//! The host owns the actual pixels; we paint through the `Canvas` trait in a
//! fixed order: background, closed cover, then every man in spawn order.

pub mod raster;

pub use raster::{PixelCanvas, Sprite};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::{GameState, Rect};

/// RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::new_rgb(0, 0, 0);
    pub const WHITE: Color = Color::new_rgb(255, 255, 255);
    pub const GRAY: Color = Color::new_rgb(136, 136, 136);
    pub const TRANSPARENT: Color = Color::new_rgba(0, 0, 0, 0);

    #[inline]
    pub const fn new_rgb(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b, a: 0xff }
    }

    #[inline]
    pub const fn new_rgba(r: u8, g: u8, b: u8, a: u8) -> Color {
        Color { r, g, b, a }
    }

    pub fn to_u32(&self) -> u32 {
        u32::from_le_bytes([self.r, self.g, self.b, self.a])
    }

    pub fn from_u32(value: u32) -> Color {
        let [r, g, b, a] = value.to_le_bytes();
        Color { r, g, b, a }
    }
}

/// A drawable target handed out by the host surface
pub trait Canvas {
    /// (width, height) in pixels
    fn size(&self) -> (u32, u32);

    /// Blit `sprite` with its top-left corner at `pos`
    fn draw_sprite(&mut self, sprite: &Sprite, pos: Vec2);

    /// Solid fill
    fn fill_rect(&mut self, rect: Rect, color: Color);
}

/// Sprites already scaled to the current layout
#[derive(Debug, Clone, Default)]
pub struct SpriteSet {
    pub background: Option<Sprite>,
    pub man: Option<Sprite>,
}

/// Paint one frame of `state`
pub fn draw_frame<C: Canvas + ?Sized>(canvas: &mut C, state: &GameState, sprites: &SpriteSet, cover_color: Color) {
    match &sprites.background {
        Some(background) => canvas.draw_sprite(background, Vec2::ZERO),
        None => {
            let (width, height) = canvas.size();
            canvas.fill_rect(Rect::new(0.0, 0.0, width as f32, height as f32), Color::BLACK);
        }
    }

    if let Some(rect) = state.active_cover_rect() {
        canvas.fill_rect(rect, cover_color);
    }

    if let Some(man) = &sprites.man {
        for m in &state.men {
            canvas.draw_sprite(man, m.pos);
        }
    }
}
