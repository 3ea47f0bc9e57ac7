use glam::Vec2;

/// Axis-aligned rectangle in pixels (top-left origin, non-negative size).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// Rectangle spanning two corners given in any order.
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        let min = a.min(b);
        Self {
            origin: min,
            size: a.max(b) - min,
        }
    }

    #[inline]
    pub fn left(self) -> f32 {
        self.origin.x
    }

    #[inline]
    pub fn top(self) -> f32 {
        self.origin.y
    }

    #[inline]
    pub fn right(self) -> f32 {
        self.origin.x + self.size.x
    }

    #[inline]
    pub fn bottom(self) -> f32 {
        self.origin.y + self.size.y
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        self.origin + self.size
    }

    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// Overlapping area; `None` when the rectangles only touch or are apart.
    pub fn intersection(self, other: Rect) -> Option<Rect> {
        let min = self.origin.max(other.origin);
        let max = self.max().min(other.max());
        let overlap = Rect {
            origin: min,
            size: max - min,
        };
        (!overlap.is_empty()).then_some(overlap)
    }

    #[inline]
    pub fn intersects(self, other: Rect) -> bool {
        self.intersection(other).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect::new(x, y, w, h)
    }

    #[test]
    fn corners_in_any_order() {
        let rect = Rect::from_corners(Vec2::new(10.0, 2.0), Vec2::new(6.0, 7.0));
        assert_eq!(rect, r(6.0, 2.0, 4.0, 5.0));
    }

    #[test]
    fn edges_follow_origin_and_size() {
        let rect = r(2.0, 3.0, 4.0, 5.0);
        assert_eq!((rect.left(), rect.top(), rect.right(), rect.bottom()), (2.0, 3.0, 6.0, 8.0));
        assert!(!rect.is_empty());
        assert!(r(0.0, 0.0, 0.0, 5.0).is_empty());
    }

    // ── intersection ──────────────────────────────────────────────────────

    #[test]
    fn overlapping_rects_intersect() {
        let a = r(0.0, 0.0, 10.0, 10.0);
        let b = r(5.0, 5.0, 10.0, 10.0);
        assert_eq!(a.intersection(b), Some(r(5.0, 5.0, 5.0, 5.0)));
    }

    #[test]
    fn touching_edges_do_not_intersect() {
        let a = r(0.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(r(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.intersects(r(0.0, -5.0, 10.0, 5.0)));
    }

    #[test]
    fn quadrant_intersects_viewport() {
        let viewport = r(0.0, 0.0, 800.0, 600.0);
        assert!(r(400.0, 300.0, 400.0, 300.0).intersects(viewport));
        assert!(r(750.0, 550.0, 100.0, 100.0).intersects(viewport));
        assert!(!r(800.0, 0.0, 100.0, 100.0).intersects(viewport));
    }
}
