use super::{Expanse, Point};

/// A rectangle with a top-left corner and a size.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Rect {
    /// Top-left corner.
    pub tl: Point,
    /// Width.
    pub w: u32,
    /// Height.
    pub h: u32,
}

impl Rect {
    /// Construct a rectangle.
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self {
            tl: Point::new(x, y),
            w,
            h,
        }
    }

    /// A zero-sized rectangle at the origin.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Construct a rectangle from a location and a size.
    pub fn at(tl: Point, size: Expanse) -> Self {
        Self {
            tl,
            w: size.w,
            h: size.h,
        }
    }

    /// The size of this rectangle.
    pub fn expanse(&self) -> Expanse {
        Expanse::new(self.w, self.h)
    }

    /// Shrink the rectangle by independent insets on each side. Insets that
    /// exceed the available extent collapse that dimension to zero.
    pub fn inset(&self, left: u32, top: u32, right: u32, bottom: u32) -> Self {
        let w = self.w.saturating_sub(left.saturating_add(right));
        let h = self.h.saturating_sub(top.saturating_add(bottom));
        Self {
            tl: Point::new(
                self.tl.x.saturating_add(left.min(self.w)),
                self.tl.y.saturating_add(top.min(self.h)),
            ),
            w,
            h,
        }
    }

    /// True if the point falls within this rectangle.
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.tl.x
            && p.x < self.tl.x.saturating_add(self.w)
            && p.y >= self.tl.y
            && p.y < self.tl.y.saturating_add(self.h)
    }

    /// True if the two rectangles share any area.
    pub fn intersects(&self, other: &Self) -> bool {
        !(self.is_empty()
            || other.is_empty()
            || self.tl.x.saturating_add(self.w) <= other.tl.x
            || other.tl.x.saturating_add(other.w) <= self.tl.x
            || self.tl.y.saturating_add(self.h) <= other.tl.y
            || other.tl.y.saturating_add(other.h) <= self.tl.y)
    }

    /// True if either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn inset_shrinks_each_side() {
        let r = Rect::new(0, 0, 100, 50).inset(10, 5, 20, 15);
        assert_eq!(r, Rect::new(10, 5, 70, 30));
    }

    #[test]
    fn inset_collapses_when_too_large() {
        let r = Rect::new(0, 0, 10, 10).inset(8, 0, 8, 0);
        assert_eq!(r.w, 0);
        assert_eq!(r.h, 10);
    }

    #[test]
    fn adjacent_rects_do_not_intersect() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(10, 0, 10, 10);
        assert!(!a.intersects(&b));
        assert!(a.intersects(&Rect::new(9, 9, 5, 5)));
    }

    proptest! {
        #[test]
        fn inset_stays_within_source_rect(
            w in 0u32..500, h in 0u32..500,
            l in 0u32..300, t in 0u32..300, r in 0u32..300, b in 0u32..300,
        ) {
            let outer = Rect::new(3, 4, w, h);
            let inner = outer.inset(l, t, r, b);
            prop_assert!(inner.tl.x >= outer.tl.x);
            prop_assert!(inner.tl.y >= outer.tl.y);
            prop_assert!(inner.tl.x + inner.w <= outer.tl.x + outer.w);
            prop_assert!(inner.tl.y + inner.h <= outer.tl.y + outer.h);
        }
    }
}
