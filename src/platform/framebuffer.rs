//! In-memory double-buffered surface

use std::sync::{Condvar, Mutex, PoisonError};
use std::time::Duration;

use super::{Surface, lock};
use crate::renderer::PixelCanvas;

#[derive(Debug)]
struct Buffers {
    width: u32,
    height: u32,
    front: PixelCanvas,
    available: bool,
    locked: bool,
    frames_posted: u64,
}

/// A `Surface` backed by a `PixelCanvas`
///
/// `lock_canvas` hands out a fresh back buffer and blocks while another one
/// is outstanding; posting swaps it to the front.
#[derive(Debug)]
pub struct FrameBuffer {
    buffers: Mutex<Buffers>,
    changed: Condvar,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            buffers: Mutex::new(Buffers {
                width,
                height,
                front: PixelCanvas::new(width, height),
                available: true,
                locked: false,
                frames_posted: 0,
            }),
            changed: Condvar::new(),
        }
    }

    /// Change the size of subsequent back buffers
    pub fn resize(&self, width: u32, height: u32) {
        let mut buffers = lock(&self.buffers);
        buffers.width = width;
        buffers.height = height;
    }

    /// Simulate the host taking the surface away (or giving it back)
    pub fn set_available(&self, available: bool) {
        lock(&self.buffers).available = available;
        self.changed.notify_all();
    }

    pub fn frames_posted(&self) -> u64 {
        lock(&self.buffers).frames_posted
    }

    /// Copy of the last posted frame
    pub fn front(&self) -> PixelCanvas {
        lock(&self.buffers).front.clone()
    }

    /// Block until at least `count` frames have been posted or `timeout` passes
    pub fn wait_for_frames(&self, count: u64, timeout: Duration) -> bool {
        let buffers = lock(&self.buffers);
        let (buffers, _) = self
            .changed
            .wait_timeout_while(buffers, timeout, |b| b.frames_posted < count)
            .unwrap_or_else(PoisonError::into_inner);
        buffers.frames_posted >= count
    }
}

impl Surface for FrameBuffer {
    type Canvas = PixelCanvas;

    fn lock_canvas(&self) -> Option<PixelCanvas> {
        let buffers = lock(&self.buffers);
        let mut buffers = self
            .changed
            .wait_while(buffers, |b| b.available && b.locked)
            .unwrap_or_else(PoisonError::into_inner);
        if !buffers.available {
            return None;
        }
        buffers.locked = true;
        Some(PixelCanvas::new(buffers.width, buffers.height))
    }

    fn unlock_canvas_and_post(&self, canvas: PixelCanvas) {
        let mut buffers = lock(&self.buffers);
        buffers.front = canvas;
        buffers.locked = false;
        buffers.frames_posted += 1;
        self.changed.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{Canvas, Color};
    use crate::sim::Rect;

    #[test]
    fn test_post_swaps_front_buffer() {
        let fb = FrameBuffer::new(4, 4);
        let mut canvas = fb.lock_canvas().unwrap();
        canvas.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0), Color::WHITE);
        assert_eq!(fb.front().pixel(0, 0), Some(Color::BLACK));

        fb.unlock_canvas_and_post(canvas);
        assert_eq!(fb.front().pixel(0, 0), Some(Color::WHITE));
        assert_eq!(fb.frames_posted(), 1);
        assert!(fb.wait_for_frames(1, Duration::from_millis(10)));
    }

    #[test]
    fn test_unavailable_returns_none() {
        let fb = FrameBuffer::new(4, 4);
        fb.set_available(false);
        assert!(fb.lock_canvas().is_none());
        fb.set_available(true);
        assert!(fb.lock_canvas().is_some());
    }

    #[test]
    fn test_resize_applies_to_next_canvas() {
        let fb = FrameBuffer::new(4, 4);
        fb.resize(8, 2);
        let canvas = fb.lock_canvas().unwrap();
        assert_eq!(canvas.size(), (8, 2));
    }

    #[test]
    fn test_wait_times_out_without_frames() {
        let fb = FrameBuffer::new(1, 1);
        assert!(!fb.wait_for_frames(1, Duration::from_millis(10)));
    }
}
