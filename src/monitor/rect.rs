//! Axis-aligned rectangles in virtual-screen coordinates.

use serde::{Deserialize, Serialize};
use stylish_scale::Size;

/// Rectangle with exclusive `right`/`bottom` edges.
///
/// The constructor normalizes swapped edges. Fields are public, so a literal
/// with swapped edges is possible; it measures as empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ScreenRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl ScreenRect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left: left.min(right),
            top: top.min(bottom),
            right: left.max(right),
            bottom: top.max(bottom),
        }
    }

    pub fn from_origin_size(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self::new(
            x,
            y,
            x.saturating_add(i32::try_from(width).unwrap_or(i32::MAX)),
            y.saturating_add(i32::try_from(height).unwrap_or(i32::MAX)),
        )
    }

    pub fn width(&self) -> u32 {
        if self.right > self.left {
            self.right.abs_diff(self.left)
        } else {
            0
        }
    }

    pub fn height(&self) -> u32 {
        if self.bottom > self.top {
            self.bottom.abs_diff(self.top)
        } else {
            0
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// True when `other` lies entirely inside `self` (shared edges count).
    pub fn contains_rect(&self, other: &ScreenRect) -> bool {
        other.left >= self.left
            && other.top >= self.top
            && other.right <= self.right
            && other.bottom <= self.bottom
    }

    pub fn intersection(&self, other: &ScreenRect) -> Option<ScreenRect> {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right.min(other.right);
        let bottom = self.bottom.min(other.bottom);
        (left < right && top < bottom).then_some(ScreenRect { left, top, right, bottom })
    }

    pub fn intersection_area(&self, other: &ScreenRect) -> u64 {
        self.intersection(other)
            .map(|r| r.width() as u64 * r.height() as u64)
            .unwrap_or(0)
    }

    /// Translate by `(dx, dy)`, saturating at the coordinate limits.
    pub fn offset(&self, dx: i32, dy: i32) -> ScreenRect {
        ScreenRect {
            left: self.left.saturating_add(dx),
            top: self.top.saturating_add(dy),
            right: self.right.saturating_add(dx),
            bottom: self.bottom.saturating_add(dy),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes() {
        let r = ScreenRect::new(50, 40, 10, 0);
        assert_eq!(r, ScreenRect { left: 10, top: 0, right: 50, bottom: 40 });
        assert_eq!(r.size(), Size::new(40, 40));
    }

    #[test]
    fn test_unnormalized_literal_is_empty() {
        let swapped = ScreenRect { left: 50, top: 0, right: 10, bottom: 40 };
        assert_eq!(swapped.size(), Size::new(0, 40));
        assert!(swapped.is_empty());
        assert_eq!(swapped.intersection_area(&ScreenRect::new(0, 0, 100, 100)), 0);
    }

    #[test]
    fn test_extreme_coordinates_do_not_overflow() {
        let wide = ScreenRect { left: i32::MIN, top: 0, right: i32::MAX, bottom: 1 };
        assert_eq!(wide.width(), u32::MAX);
        let moved = ScreenRect::new(0, 0, 10, 10).offset(i32::MAX, i32::MIN);
        assert_eq!(moved.right, i32::MAX);
        assert_eq!(moved.top, i32::MIN);
    }

    #[test]
    fn test_containment_includes_edges() {
        let monitor = ScreenRect::new(0, 0, 1920, 1080);
        assert!(monitor.contains_rect(&monitor));
        assert!(monitor.contains_rect(&ScreenRect::new(100, 100, 700, 634)));
        assert!(!monitor.contains_rect(&ScreenRect::new(1800, 100, 1921, 200)));
    }

    #[test]
    fn test_intersection() {
        let a = ScreenRect::new(0, 0, 100, 100);
        let b = ScreenRect::new(50, 80, 200, 120);
        assert_eq!(a.intersection(&b), Some(ScreenRect::new(50, 80, 100, 100)));
        assert_eq!(a.intersection_area(&b), 50 * 20);
        // touching edges do not intersect
        assert_eq!(a.intersection(&ScreenRect::new(100, 0, 150, 50)), None);
    }

    #[test]
    fn test_offset_and_origin_size() {
        let r = ScreenRect::from_origin_size(100, 100, 600, 534);
        assert_eq!(r.offset(1920, 0), ScreenRect::new(2020, 100, 2620, 634));
        assert!(ScreenRect::from_origin_size(5, 5, 0, 10).is_empty());
    }
}
