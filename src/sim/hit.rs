//! Touch to slot hit-testing
//!
//! A touch is measured against the reference lines, not the cover rectangles:
//! slot i matches when the touch is within tolerance of both its column line
//! and its row line. Slots are tried in order 1..4 and the first match wins,
//! so overlapping tolerance windows resolve to the lower-numbered slot.

use glam::Vec2;

use super::geometry::{Layout, Slot};

/// Map a touch position to the slot it selects, if any
pub fn hit_test(point: Vec2, layout: &Layout) -> Option<Slot> {
    if !layout.is_valid() {
        return None;
    }

    let covers = &layout.covers;
    let tolerance = &layout.tolerance;
    let near_x1 = (point.x - covers.x1).abs() < tolerance.x;
    let near_x2 = (point.x - covers.x2).abs() < tolerance.x;
    let near_y1 = (point.y - covers.y1).abs() < tolerance.y;
    let near_y2 = (point.y - covers.y2).abs() < tolerance.y;

    Slot::ALL.into_iter().find(|slot| {
        let near_column = if slot.is_left() { near_x1 } else { near_x2 };
        let near_row = if slot.is_top() { near_y1 } else { near_y2 };
        near_column && near_row
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn reference_layout() -> Layout {
        Layout::recompute(800, 506)
    }

    #[test]
    fn test_reference_touches() {
        let layout = reference_layout();
        assert_eq!(hit_test(Vec2::new(216.0, 132.0), &layout), Some(Slot::TopLeft));
        assert_eq!(hit_test(Vec2::new(539.0, 370.0), &layout), Some(Slot::BottomRight));
        assert_eq!(hit_test(Vec2::new(400.0, 250.0), &layout), None);
    }

    #[test]
    fn test_each_anchor_selects_its_slot() {
        let layout = reference_layout();
        for slot in Slot::ALL {
            let anchor = layout.covers.anchor(slot);
            assert_eq!(hit_test(anchor, &layout), Some(slot));
        }
    }

    #[test]
    fn test_tolerance_boundary_is_exclusive() {
        let layout = reference_layout();
        let edge = Vec2::new(layout.covers.x1 + layout.tolerance.x, layout.covers.y1);
        assert_eq!(hit_test(edge, &layout), None);

        let inside = Vec2::new(layout.covers.x1 + layout.tolerance.x - 0.5, layout.covers.y1);
        assert_eq!(hit_test(inside, &layout), Some(Slot::TopLeft));
    }

    #[test]
    fn test_overlapping_windows_pick_lowest_slot() {
        // Windows wider than the slot spacing: every slot is a candidate
        let mut layout = reference_layout();
        layout.tolerance.x = 1000.0;
        layout.tolerance.y = 1000.0;
        assert_eq!(hit_test(Vec2::new(400.0, 250.0), &layout), Some(Slot::TopLeft));

        layout.tolerance.y = 10.0;
        let on_lower_row = Vec2::new(400.0, layout.covers.y2);
        assert_eq!(hit_test(on_lower_row, &layout), Some(Slot::BottomLeft));
    }

    #[test]
    fn test_invalid_layout_never_matches() {
        let layout = Layout::default();
        assert_eq!(hit_test(Vec2::ZERO, &layout), None);
        assert_eq!(hit_test(Vec2::new(216.0, 132.0), &Layout::recompute(0, 0)), None);
    }

    proptest! {
        #[test]
        fn prop_hit_test_is_deterministic(
            width in 1u32..2048,
            height in 1u32..2048,
            x in -100.0f32..2200.0,
            y in -100.0f32..2200.0,
        ) {
            let layout = Layout::recompute(width, height);
            let point = Vec2::new(x, y);
            prop_assert_eq!(hit_test(point, &layout), hit_test(point, &layout));
        }

        #[test]
        fn prop_match_is_first_candidate(
            width in 1u32..2048,
            height in 1u32..2048,
            x in -100.0f32..2200.0,
            y in -100.0f32..2200.0,
        ) {
            let layout = Layout::recompute(width, height);
            let point = Vec2::new(x, y);
            let candidates: Vec<Slot> = Slot::ALL
                .into_iter()
                .filter(|slot| {
                    let anchor = layout.covers.anchor(*slot);
                    (point.x - anchor.x).abs() < layout.tolerance.x
                        && (point.y - anchor.y).abs() < layout.tolerance.y
                })
                .collect();
            prop_assert_eq!(hit_test(point, &layout), candidates.first().copied());
        }
    }
}
