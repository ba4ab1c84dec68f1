use super::Vec2;

/// Axis-aligned rectangle (top-left origin).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// Square of side `side` centered on `center`.
    #[inline]
    pub fn centered_square(center: Vec2, side: f32) -> Self {
        let half = side / 2.0;
        Rect::new(center.x - half, center.y - half, side, side)
    }

    #[inline]
    pub fn min(self) -> Vec2 {
        self.origin
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        Vec2::new(self.origin.x + self.size.x, self.origin.y + self.size.y)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// Normalizes the rectangle so width/height are non-negative.
    #[inline]
    pub fn normalized(self) -> Self {
        let mut x = self.origin.x;
        let mut y = self.origin.y;
        let mut w = self.size.x;
        let mut h = self.size.y;

        if w < 0.0 {
            x += w;
            w = -w;
        }
        if h < 0.0 {
            y += h;
            h = -h;
        }

        Rect::new(x, y, w, h)
    }

    /// Closed containment: [min, max] on both axes.
    #[inline]
    pub fn contains_inclusive(self, p: Vec2) -> bool {
        let r = self.normalized();
        let max = r.max();
        p.x >= r.origin.x && p.y >= r.origin.y && p.x <= max.x && p.y <= max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: f32, y: f32, w: f32, h: f32) -> Rect { Rect::new(x, y, w, h) }

    // ── normalized ────────────────────────────────────────────────────────

    #[test]
    fn normalized_positive_is_identity() {
        let rect = r(1.0, 2.0, 10.0, 20.0);
        assert_eq!(rect.normalized(), rect);
    }

    #[test]
    fn normalized_negative_width() {
        let rect = r(10.0, 0.0, -4.0, 5.0);
        let n = rect.normalized();
        assert_eq!(n.origin.x, 6.0);
        assert_eq!(n.size.x, 4.0);
    }

    // ── centered_square ───────────────────────────────────────────────────

    #[test]
    fn centered_square_spans_half_side_each_way() {
        let sq = Rect::centered_square(Vec2::new(400.0, 300.0), 100.0);
        assert_eq!(sq.min(), Vec2::new(350.0, 250.0));
        assert_eq!(sq.max(), Vec2::new(450.0, 350.0));
    }

    // ── contains_inclusive ────────────────────────────────────────────────

    #[test]
    fn contains_inclusive_accepts_both_edges() {
        let rect = r(0.0, 0.0, 10.0, 10.0);
        assert!(rect.contains_inclusive(Vec2::new(0.0, 0.0)));
        assert!(rect.contains_inclusive(Vec2::new(10.0, 10.0)));
    }

    #[test]
    fn contains_inclusive_rejects_outside() {
        let rect = r(0.0, 0.0, 10.0, 10.0);
        assert!(!rect.contains_inclusive(Vec2::new(-0.01, 5.0)));
        assert!(!rect.contains_inclusive(Vec2::new(5.0, 10.01)));
    }

    // ── is_empty ──────────────────────────────────────────────────────────

    #[test]
    fn is_empty_zero_size() {
        assert!(r(0.0, 0.0, 0.0, 5.0).is_empty());
        assert!(!r(0.0, 0.0, 1.0, 1.0).is_empty());
    }
}
