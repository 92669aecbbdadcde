use crate::{
    geom::{Axis, Expanse},
    layout::LayoutFlags,
    widget::Widget,
};

/// Reserves space in a layout. Spacers take part in layout even when hidden.
pub struct Spacer {
    /// Axis along which the spacer expands, if any.
    axis: Option<Axis>,
    /// Fixed size.
    size: Expanse,
}

impl Spacer {
    /// Soaks up horizontal surplus.
    pub fn horizontal() -> Self {
        Self {
            axis: Some(Axis::Horizontal),
            size: Expanse::default(),
        }
    }

    /// Soaks up vertical surplus.
    pub fn vertical() -> Self {
        Self {
            axis: Some(Axis::Vertical),
            size: Expanse::default(),
        }
    }

    /// A gap of fixed size.
    pub fn fixed(w: u32, h: u32) -> Self {
        Self {
            axis: None,
            size: Expanse::new(w, h),
        }
    }
}

impl Widget for Spacer {
    fn is_spacer(&self) -> bool {
        true
    }

    fn size_hint(&self) -> Option<Expanse> {
        Some(self.size)
    }

    fn min_size_hint(&self) -> Expanse {
        self.size
    }

    fn layout_flags(&self) -> LayoutFlags {
        match self.axis {
            Some(axis) => {
                LayoutFlags::shrinkable(axis) | LayoutFlags::growable(axis) | LayoutFlags::greedy(axis)
            }
            None => LayoutFlags::empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spacers_grow_along_their_axis() {
        let h = Spacer::horizontal();
        assert!(h.is_spacer());
        assert!(h.layout_flags().contains(LayoutFlags::GREEDY_HORZ));
        assert!(!h.layout_flags().contains(LayoutFlags::GROWABLE_VERT));
        assert_eq!(Spacer::fixed(4, 2).size_hint(), Some(Expanse::new(4, 2)));
        assert_eq!(Spacer::fixed(4, 2).layout_flags(), LayoutFlags::empty());
    }
}
