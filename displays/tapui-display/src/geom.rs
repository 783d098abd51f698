//! Screen-space rectangles

/// Axis-aligned rectangle in pixels
///
/// `w == 0 && h == 0` is the "unset" rectangle of a widget that has not
/// been sized yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    /// Create a new rectangle
    pub const fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Exclusive right edge
    pub const fn right(&self) -> i32 {
        self.x + self.w as i32
    }

    /// Exclusive bottom edge
    pub const fn bottom(&self) -> i32 {
        self.y + self.h as i32
    }

    /// Check if the rectangle covers no pixels
    pub const fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Check if a point lies strictly inside the rectangle
    ///
    /// Points on the boundary do not count as inside.
    pub const fn contains(&self, px: i32, py: i32) -> bool {
        self.x < px && px < self.right() && self.y < py && py < self.bottom()
    }

    /// Smallest rectangle covering both `self` and `other`
    pub fn union(&self, other: &Rect) -> Rect {
        let left = self.x.min(other.x);
        let top = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::from_edges(left, top, right, bottom)
    }

    /// Build a rectangle from its edges, collapsing inverted spans to zero
    pub fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Rect {
        Rect {
            x: left,
            y: top,
            w: right.saturating_sub(left).max(0) as u32,
            h: bottom.saturating_sub(top).max(0) as u32,
        }
    }

    /// Shrink the rectangle by `dx` on the left/right and `dy` on top/bottom
    pub fn inset(&self, dx: u32, dy: u32) -> Rect {
        Rect {
            x: self.x + dx as i32,
            y: self.y + dy as i32,
            w: self.w.saturating_sub(dx * 2),
            h: self.h.saturating_sub(dy * 2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_strict() {
        let r = Rect::new(10, 20, 30, 40);
        assert!(r.contains(11, 21));
        assert!(r.contains(39, 59));
        assert!(!r.contains(10, 30));
        assert!(!r.contains(40, 30));
        assert!(!r.contains(20, 20));
        assert!(!r.contains(20, 60));
    }

    #[test]
    fn test_empty_rect_contains_nothing() {
        let r = Rect::new(5, 5, 0, 0);
        assert!(r.is_empty());
        assert!(!r.contains(5, 5));
    }

    #[test]
    fn test_union() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(20, 5, 5, 20);
        assert_eq!(a.union(&b), Rect::new(0, 0, 25, 25));
    }

    #[test]
    fn test_from_edges_collapses_inverted() {
        let r = Rect::from_edges(10, 10, 5, 20);
        assert_eq!(r.w, 0);
        assert_eq!(r.h, 10);
    }

    #[test]
    fn test_inset() {
        let r = Rect::new(0, 0, 20, 10).inset(2, 3);
        assert_eq!(r, Rect::new(2, 3, 16, 4));
        assert_eq!(Rect::new(0, 0, 2, 2).inset(2, 2).w, 0);
    }
}
