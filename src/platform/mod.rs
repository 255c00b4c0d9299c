//! Platform abstraction layer
//!
//! The host supplies:
//! - A drawable surface that hands out one canvas at a time
//! - Background and man rasters scaled to a requested size
//! - Touch, focus and surface lifecycle callbacks (see `GameThread`)
//!
//! `FrameBuffer` and `SolidAssets` are in-memory stand-ins for native runs
//! and tests.

pub mod framebuffer;

pub use framebuffer::FrameBuffer;

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::renderer::{Canvas, Color, Sprite};
use crate::sim::SpriteSize;

/// A host surface the game loop paints into
pub trait Surface: Send + Sync + 'static {
    type Canvas: Canvas;

    /// Take exclusive access to the drawing buffer
    ///
    /// May block while another frame is in flight. Returns None when the
    /// surface is temporarily unavailable.
    fn lock_canvas(&self) -> Option<Self::Canvas>;

    /// Hand the canvas back and publish its contents
    fn unlock_canvas_and_post(&self, canvas: Self::Canvas);
}

/// Source of pre-scaled sprites
pub trait AssetProvider: Send + Sync + 'static {
    fn background(&self, size: SpriteSize) -> Sprite;

    fn man(&self, size: SpriteSize) -> Sprite;
}

/// Flat-colored sprites of whatever size is asked for
#[derive(Debug, Clone, Copy)]
pub struct SolidAssets {
    pub background: Color,
    pub man: Color,
}

impl Default for SolidAssets {
    fn default() -> Self {
        Self {
            background: Color::new_rgb(46, 52, 64),
            man: Color::new_rgb(235, 203, 139),
        }
    }
}

impl AssetProvider for SolidAssets {
    fn background(&self, size: SpriteSize) -> Sprite {
        Sprite::solid(size.width, size.height, self.background)
    }

    fn man(&self, size: SpriteSize) -> Sprite {
        Sprite::solid(size.width, size.height, self.man)
    }
}

/// Posts the canvas back to its surface when dropped, unwinding included
struct CanvasGuard<'a, S: Surface + ?Sized> {
    surface: &'a S,
    canvas: Option<S::Canvas>,
}

impl<S: Surface + ?Sized> Drop for CanvasGuard<'_, S> {
    fn drop(&mut self) {
        if let Some(canvas) = self.canvas.take() {
            self.surface.unlock_canvas_and_post(canvas);
        }
    }
}

/// Run `draw` against a locked canvas of `surface`
///
/// The canvas is released if and only if it was acquired, even when `draw`
/// panics. Returns None without calling `draw` if the surface is unavailable.
pub fn with_canvas<S, R>(surface: &S, draw: impl FnOnce(&mut S::Canvas) -> R) -> Option<R>
where
    S: Surface + ?Sized,
{
    let mut guard = CanvasGuard {
        surface,
        canvas: Some(surface.lock_canvas()?),
    };
    guard.canvas.as_mut().map(draw)
}

/// Lock a mutex, carrying on with the data if a previous holder panicked
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
