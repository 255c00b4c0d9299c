//! Cover geometry derived from the surface size
//!
//! The four manhole slots sit on a 2x2 grid of reference lines:
//! - columns X1 (left) and X2 (right)
//! - rows Y1 (upper) and Y2 (lower)
//!
//! Every absolute pixel value here is a ratio constant times the surface
//! dimension, so a `Layout` is rebuilt wholesale whenever the size changes.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// One of the four cover positions, numbered in hit-test priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    TopLeft = 1,
    TopRight = 2,
    BottomLeft = 3,
    BottomRight = 4,
}

impl Slot {
    /// All slots in priority order (1, 2, 3, 4)
    pub const ALL: [Slot; 4] = [Slot::TopLeft, Slot::TopRight, Slot::BottomLeft, Slot::BottomRight];

    /// 1-based slot number
    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            1 => Some(Slot::TopLeft),
            2 => Some(Slot::TopRight),
            3 => Some(Slot::BottomLeft),
            4 => Some(Slot::BottomRight),
            _ => None,
        }
    }

    /// Whether the slot sits on the left column (X1)
    #[inline]
    pub fn is_left(self) -> bool {
        matches!(self, Slot::TopLeft | Slot::BottomLeft)
    }

    /// Whether the slot sits on the upper row (Y1)
    #[inline]
    pub fn is_top(self) -> bool {
        matches!(self, Slot::TopLeft | Slot::TopRight)
    }
}

/// Axis-aligned rectangle in surface pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }

    pub fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self::new(origin.x, origin.y, origin.x + size.x, origin.y + size.y)
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }
}

/// The four reference lines plus the size of a cover
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CoverGeometry {
    pub x1: f32,
    pub x2: f32,
    pub y1: f32,
    pub y2: f32,
    /// Cover extent (width, height)
    pub size: Vec2,
}

impl CoverGeometry {
    /// Reference point of a slot: its column line and row line
    pub fn anchor(&self, slot: Slot) -> Vec2 {
        let x = if slot.is_left() { self.x1 } else { self.x2 };
        let y = if slot.is_top() { self.y1 } else { self.y2 };
        Vec2::new(x, y)
    }

    /// Rectangle drawn when the slot's cover is closed
    pub fn rect(&self, slot: Slot) -> Rect {
        Rect::from_origin_size(self.anchor(slot), self.size)
    }
}

/// Per-axis distance under which a touch counts as "on" a slot
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TapTolerance {
    pub x: f32,
    pub y: f32,
}

/// Pixel size a sprite must be scaled to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SpriteSize {
    pub width: u32,
    pub height: u32,
}

/// Everything derived from the surface size, swapped in as one value
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Layout {
    pub width: u32,
    pub height: u32,
    pub covers: CoverGeometry,
    pub tolerance: TapTolerance,
    /// Background is stretched to the full surface
    pub background_size: SpriteSize,
    pub man_size: SpriteSize,
    /// Horizontal distance a man walks per tick
    pub step_x: f32,
}

impl Layout {
    /// Derive the layout for a surface of the given size
    ///
    /// Pure function of its inputs: identical sizes yield identical layouts.
    pub fn recompute(width: u32, height: u32) -> Self {
        let w = width as f32;
        let h = height as f32;

        Self {
            width,
            height,
            covers: CoverGeometry {
                x1: w * COVER_RATIO_X1,
                x2: w * COVER_RATIO_X2,
                y1: h * COVER_RATIO_Y1,
                y2: h * COVER_RATIO_Y2,
                size: Vec2::new(w * COVER_RATIO_WIDTH, h * COVER_RATIO_HEIGHT),
            },
            tolerance: TapTolerance {
                x: w / TOLERANCE_DIVISOR,
                y: h / TOLERANCE_DIVISOR,
            },
            background_size: SpriteSize { width, height },
            man_size: SpriteSize {
                width: (w * MAN_RATIO_WIDTH) as u32,
                height: (h * MAN_RATIO_HEIGHT) as u32,
            },
            step_x: w * STEP_RATIO_X,
        }
    }

    /// A zero-area surface has no hit-testable slots
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    pub fn cover_rect(&self, slot: Slot) -> Rect {
        self.covers.rect(slot)
    }

    /// Where a freshly started man appears: left edge, standing on row Y1
    pub fn spawn_point(&self) -> Vec2 {
        Vec2::new(0.0, self.covers.y1 - self.man_size.height as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_reference_surface_matches_artwork() {
        let layout = Layout::recompute(800, 506);
        assert!((layout.covers.x1 - 216.5).abs() < 1e-3);
        assert!((layout.covers.x2 - 539.0).abs() < 1e-3);
        assert!((layout.covers.y1 - 132.0).abs() < 1e-3);
        assert!((layout.covers.y2 - 370.0).abs() < 1e-3);
        assert!((layout.covers.size.x - 43.0).abs() < 1e-3);
        assert!((layout.covers.size.y - 10.0).abs() < 1e-3);
        assert!((layout.tolerance.x - 100.0).abs() < 1e-3);
        assert!((layout.tolerance.y - 63.25).abs() < 1e-3);
        assert!((layout.step_x - 30.0).abs() < 1e-3);
        assert_eq!(layout.man_size, SpriteSize { width: 43, height: 82 });
        assert_eq!(layout.background_size, SpriteSize { width: 800, height: 506 });
    }

    #[test]
    fn test_cover_rect_per_slot() {
        let layout = Layout::recompute(800, 506);
        let r1 = layout.cover_rect(Slot::TopLeft);
        assert!((r1.left - 216.5).abs() < 1e-3);
        assert!((r1.top - 132.0).abs() < 1e-3);
        assert!((r1.width() - 43.0).abs() < 1e-3);
        assert!((r1.height() - 10.0).abs() < 1e-3);

        let r4 = layout.cover_rect(Slot::BottomRight);
        assert!((r4.left - 539.0).abs() < 1e-3);
        assert!((r4.top - 370.0).abs() < 1e-3);
    }

    #[test]
    fn test_zero_surface_is_invalid() {
        assert!(!Layout::default().is_valid());
        assert!(!Layout::recompute(0, 506).is_valid());
        assert!(!Layout::recompute(800, 0).is_valid());
        assert!(Layout::recompute(1, 1).is_valid());
    }

    #[test]
    fn test_slot_index_round_trip() {
        for slot in Slot::ALL {
            assert_eq!(Slot::from_index(slot.index()), Some(slot));
        }
        assert_eq!(Slot::from_index(0), None);
        assert_eq!(Slot::from_index(5), None);
    }

    #[test]
    fn test_spawn_point_stands_on_upper_row() {
        let layout = Layout::recompute(800, 506);
        let spawn = layout.spawn_point();
        assert_eq!(spawn.x, 0.0);
        assert!((spawn.y + layout.man_size.height as f32 - layout.covers.y1).abs() < 1e-3);
    }

    proptest! {
        #[test]
        fn prop_anchors_are_symmetric(width in 1u32..4096, height in 1u32..4096) {
            let covers = Layout::recompute(width, height).covers;
            let a1 = covers.anchor(Slot::TopLeft);
            let a2 = covers.anchor(Slot::TopRight);
            let a3 = covers.anchor(Slot::BottomLeft);
            let a4 = covers.anchor(Slot::BottomRight);
            prop_assert_eq!(a1.y, a2.y);
            prop_assert_eq!(a3.y, a4.y);
            prop_assert_eq!(a1.x, a3.x);
            prop_assert_eq!(a2.x, a4.x);
        }

        #[test]
        fn prop_recompute_is_deterministic(width in 0u32..8192, height in 0u32..8192) {
            let a = Layout::recompute(width, height);
            let b = Layout::recompute(width, height);
            prop_assert_eq!(a.covers.x1.to_bits(), b.covers.x1.to_bits());
            prop_assert_eq!(a.covers.y2.to_bits(), b.covers.y2.to_bits());
            prop_assert_eq!(a.tolerance.x.to_bits(), b.tolerance.x.to_bits());
            prop_assert_eq!(a.step_x.to_bits(), b.step_x.to_bits());
            prop_assert_eq!(a, b);
        }
    }
}
