use super::{Axis, Point, Rect};

/// An `Expanse` is a size with no location: a width and a height.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Expanse {
    /// Width.
    pub w: u32,
    /// Height.
    pub h: u32,
}

impl Expanse {
    /// Construct an expanse.
    pub fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }

    /// True if either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// The extent along an axis.
    pub fn along(&self, axis: Axis) -> u32 {
        match axis {
            Axis::Horizontal => self.w,
            Axis::Vertical => self.h,
        }
    }

    /// Build an expanse from a main-axis and a cross-axis extent.
    pub fn from_axes(axis: Axis, main: u32, cross: u32) -> Self {
        match axis {
            Axis::Horizontal => Self::new(main, cross),
            Axis::Vertical => Self::new(cross, main),
        }
    }

    /// Component-wise maximum.
    pub fn max(self, other: Self) -> Self {
        Self::new(self.w.max(other.w), self.h.max(other.h))
    }

    /// A rect of this size located at the origin.
    pub fn rect(&self) -> Rect {
        Rect {
            tl: Point::zero(),
            w: self.w,
            h: self.h,
        }
    }

    /// True if this expanse can completely enclose `other`.
    pub fn contains(&self, other: &Self) -> bool {
        self.w >= other.w && self.h >= other.h
    }
}

impl From<Rect> for Expanse {
    fn from(r: Rect) -> Self {
        Self { w: r.w, h: r.h }
    }
}

impl From<(u32, u32)> for Expanse {
    fn from(v: (u32, u32)) -> Self {
        Self { w: v.0, h: v.1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axes_round_trip_through_from_axes() {
        let e = Expanse::from_axes(Axis::Vertical, 7, 3);
        assert_eq!(e, Expanse::new(3, 7));
        assert_eq!(e.along(Axis::Vertical), 7);
        assert_eq!(e.along(Axis::Vertical.cross()), 3);
    }

    #[test]
    fn max_is_componentwise() {
        assert_eq!(
            Expanse::new(1, 9).max(Expanse::new(4, 2)),
            Expanse::new(4, 9)
        );
    }
}
