//! The layout contract and the box layout.

use std::any::Any;

use bitflags::bitflags;
use tracing::trace;

use crate::{
    error::{Error, Result},
    geom::{Axis, Expanse, Point, Rect},
    id::NodeId,
    world::Core,
};

bitflags! {
    /// Growth and shrink capabilities a widget reports to its parent layout.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct LayoutFlags: u32 {
        /// May be narrower than its size hint.
        const SHRINKABLE_HORZ = 1 << 0;
        /// May be shorter than its size hint.
        const SHRINKABLE_VERT = 1 << 1;
        /// May be wider than its size hint.
        const GROWABLE_HORZ = 1 << 2;
        /// May be taller than its size hint.
        const GROWABLE_VERT = 1 << 3;
        /// Claims horizontal surplus ahead of merely growable siblings.
        const GREEDY_HORZ = 1 << 4;
        /// Claims vertical surplus ahead of merely growable siblings.
        const GREEDY_VERT = 1 << 5;
    }
}

impl LayoutFlags {
    /// The shrinkable flag for an axis.
    pub fn shrinkable(axis: Axis) -> Self {
        match axis {
            Axis::Horizontal => Self::SHRINKABLE_HORZ,
            Axis::Vertical => Self::SHRINKABLE_VERT,
        }
    }

    /// The growable flag for an axis.
    pub fn growable(axis: Axis) -> Self {
        match axis {
            Axis::Horizontal => Self::GROWABLE_HORZ,
            Axis::Vertical => Self::GROWABLE_VERT,
        }
    }

    /// The greedy flag for an axis.
    pub fn greedy(axis: Axis) -> Self {
        match axis {
            Axis::Horizontal => Self::GREEDY_HORZ,
            Axis::Vertical => Self::GREEDY_VERT,
        }
    }
}

/// Insets between a container's client edge and its laid out children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Margins {
    /// Left inset.
    pub h_near: u32,
    /// Top inset.
    pub v_near: u32,
    /// Right inset.
    pub h_far: u32,
    /// Bottom inset.
    pub v_far: u32,
}

impl Margins {
    /// Independent insets for each edge.
    pub fn new(h_near: u32, v_near: u32, h_far: u32, v_far: u32) -> Self {
        Self {
            h_near,
            v_near,
            h_far,
            v_far,
        }
    }

    /// The same inset on every edge.
    pub fn uniform(inset: u32) -> Self {
        Self::new(inset, inset, inset, inset)
    }

    /// Leading inset along an axis.
    pub fn near(&self, axis: Axis) -> u32 {
        match axis {
            Axis::Horizontal => self.h_near,
            Axis::Vertical => self.v_near,
        }
    }

    /// Trailing inset along an axis.
    pub fn far(&self, axis: Axis) -> u32 {
        match axis {
            Axis::Horizontal => self.h_far,
            Axis::Vertical => self.v_far,
        }
    }

    /// Sum of both insets along an axis.
    pub fn total(&self, axis: Axis) -> u32 {
        self.near(axis).saturating_add(self.far(axis))
    }

    /// The area left inside `rect` once these margins are removed.
    pub fn apply(&self, rect: Rect) -> Rect {
        rect.inset(self.h_near, self.v_near, self.h_far, self.v_far)
    }
}

/// A strategy that computes a container's minimum size and positions its
/// children.
///
/// The container reference is a plain association maintained by the owning
/// container: `Core` sets it when the layout is attached and clears it when
/// the layout is replaced or its container is destroyed.
pub trait Layout: Any + Send {
    /// The container this layout is attached to.
    fn container(&self) -> Option<NodeId>;

    /// Record the container this layout is attached to. Pure storage.
    fn set_container(&mut self, container: Option<NodeId>);

    /// Outer insets.
    fn margins(&self) -> Margins;

    /// Set the outer insets.
    fn set_margins(&mut self, margins: Margins) -> Result<()>;

    /// Gap between consecutive children.
    fn spacing(&self) -> u32;

    /// Set the gap between consecutive children.
    fn set_spacing(&mut self, spacing: u32) -> Result<()>;

    /// Capabilities of the container as seen by its own parent layout.
    fn layout_flags(&self, core: &Core) -> LayoutFlags;

    /// Smallest size the contained widgets can be rendered at.
    fn min_size(&self, core: &Core) -> Expanse;

    /// Reposition every participating child. `reset` forces a full pass even
    /// when cached state looks current.
    fn update(&mut self, core: &mut Core, reset: bool) -> Result<()>;
}

/// True if a widget takes part in layout: it must exist, and it must either be
/// a spacer or be visible.
pub fn should_layout(core: &Core, widget: Option<NodeId>) -> bool {
    let Some(node) = widget.and_then(|id| core.node(id)) else {
        return false;
    };
    node.is_spacer() || node.visible()
}

/// State remembered from the last completed pass.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PassKey {
    /// Client size of the container.
    client: Expanse,
    /// Participating children, in order.
    participants: Vec<NodeId>,
}

/// Size information gathered for one child.
#[derive(Debug, Clone, Copy)]
struct ChildHints {
    /// Preferred size.
    pref: Expanse,
    /// Minimum size.
    min: Expanse,
    /// Growth flags.
    flags: LayoutFlags,
}

/// Lays children out in a single row or column.
#[derive(Debug, Clone)]
pub struct BoxLayout {
    /// Owning container.
    container: Option<NodeId>,
    /// Main axis.
    orientation: Axis,
    /// Outer insets.
    margins: Margins,
    /// Gap between children.
    spacing: u32,
    /// Key of the last completed pass.
    last: Option<PassKey>,
}

impl BoxLayout {
    /// A layout along `orientation` with no margins or spacing.
    pub fn new(orientation: Axis) -> Self {
        Self {
            container: None,
            orientation,
            margins: Margins::default(),
            spacing: 0,
            last: None,
        }
    }

    /// A left-to-right row.
    pub fn horizontal() -> Self {
        Self::new(Axis::Horizontal)
    }

    /// A top-to-bottom column.
    pub fn vertical() -> Self {
        Self::new(Axis::Vertical)
    }

    /// Builder: outer insets.
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    /// Builder: gap between children.
    pub fn with_spacing(mut self, spacing: u32) -> Self {
        self.spacing = spacing;
        self
    }

    /// Main axis.
    pub fn orientation(&self) -> Axis {
        self.orientation
    }

    /// Children of the container that take part in layout.
    fn participants(&self, core: &Core) -> Vec<NodeId> {
        let Some(container) = self.container else {
            return Vec::new();
        };
        core.children(container)
            .iter()
            .copied()
            .filter(|c| should_layout(core, Some(*c)))
            .collect()
    }

    /// Total spacing between `n` children.
    fn gaps(&self, n: usize) -> u32 {
        let n = u32::try_from(n).unwrap_or(u32::MAX);
        self.spacing.saturating_mul(n.saturating_sub(1))
    }

    /// Compute child rectangles within a client area of size `client`.
    fn arrange(&self, client: Expanse, hints: &[ChildHints]) -> Vec<Rect> {
        let axis = self.orientation;
        let cross = axis.cross();
        let area = self.margins.apply(client.rect());
        let main_avail = area.expanse().along(axis).saturating_sub(self.gaps(hints.len()));
        let cross_avail = area.expanse().along(cross);

        let mut sizes: Vec<u32> = hints
            .iter()
            .map(|h| h.pref.along(axis).max(h.min.along(axis)))
            .collect();
        let total = sizes.iter().fold(0u32, |acc, s| acc.saturating_add(*s));

        if total < main_avail {
            let growers = Self::growers(hints, axis);
            distribute(&mut sizes, &growers, main_avail - total);
        } else if total > main_avail {
            let mut excess = total - main_avail;
            for (i, h) in hints.iter().enumerate().rev() {
                if excess == 0 {
                    break;
                }
                if h.flags.contains(LayoutFlags::shrinkable(axis)) {
                    let give = sizes[i].saturating_sub(h.min.along(axis)).min(excess);
                    sizes[i] -= give;
                    excess -= give;
                }
            }
        }

        let mut pos = area.tl.along(axis);
        let cross_pos = area.tl.along(cross);
        hints
            .iter()
            .zip(sizes)
            .map(|(h, main)| {
                let extent = if h.flags.contains(LayoutFlags::growable(cross)) {
                    cross_avail
                } else {
                    h.pref.along(cross).max(h.min.along(cross)).min(cross_avail)
                };
                let rect = Rect::at(
                    Point::from_axes(axis, pos, cross_pos),
                    Expanse::from_axes(axis, main, extent),
                );
                pos = pos.saturating_add(main).saturating_add(self.spacing);
                rect
            })
            .collect()
    }

    /// Indices of children that receive surplus space: greedy children if
    /// there are any, otherwise every growable child.
    fn growers(hints: &[ChildHints], axis: Axis) -> Vec<usize> {
        let pick = |flag: LayoutFlags| -> Vec<usize> {
            hints
                .iter()
                .enumerate()
                .filter(|(_, h)| h.flags.contains(flag))
                .map(|(i, _)| i)
                .collect()
        };
        let greedy = pick(LayoutFlags::greedy(axis));
        if greedy.is_empty() {
            pick(LayoutFlags::growable(axis))
        } else {
            greedy
        }
    }
}

/// Share `surplus` equally among `targets`; the first `surplus % n` targets
/// receive one extra unit.
fn distribute(sizes: &mut [u32], targets: &[usize], surplus: u32) {
    let Ok(n) = u32::try_from(targets.len()) else {
        return;
    };
    if n == 0 {
        return;
    }
    let share = surplus / n;
    let rem = surplus % n;
    for (k, i) in targets.iter().enumerate() {
        let extra = u32::from(u32::try_from(k).is_ok_and(|k| k < rem));
        sizes[*i] = sizes[*i].saturating_add(share + extra);
    }
}

impl Layout for BoxLayout {
    fn container(&self) -> Option<NodeId> {
        self.container
    }

    fn set_container(&mut self, container: Option<NodeId>) {
        self.container = container;
        self.last = None;
    }

    fn margins(&self) -> Margins {
        self.margins
    }

    fn set_margins(&mut self, margins: Margins) -> Result<()> {
        self.margins = margins;
        self.last = None;
        Ok(())
    }

    fn spacing(&self) -> u32 {
        self.spacing
    }

    fn set_spacing(&mut self, spacing: u32) -> Result<()> {
        self.spacing = spacing;
        self.last = None;
        Ok(())
    }

    fn layout_flags(&self, core: &Core) -> LayoutFlags {
        let participants = self.participants(core);
        if participants.is_empty() {
            return LayoutFlags::SHRINKABLE_HORZ
                | LayoutFlags::SHRINKABLE_VERT
                | LayoutFlags::GROWABLE_HORZ
                | LayoutFlags::GROWABLE_VERT;
        }
        participants
            .iter()
            .fold(LayoutFlags::empty(), |acc, c| acc | core.layout_flags(*c))
    }

    fn min_size(&self, core: &Core) -> Expanse {
        let axis = self.orientation;
        let cross = axis.cross();
        let participants = self.participants(core);
        let (main, cross_max) = participants.iter().fold((0u32, 0u32), |(m, c), id| {
            let min = core.min_size_hint(*id);
            (m.saturating_add(min.along(axis)), c.max(min.along(cross)))
        });
        Expanse::from_axes(
            axis,
            main.saturating_add(self.gaps(participants.len()))
                .saturating_add(self.margins.total(axis)),
            cross_max.saturating_add(self.margins.total(cross)),
        )
    }

    fn update(&mut self, core: &mut Core, reset: bool) -> Result<()> {
        let Some(container) = self.container else {
            return Ok(());
        };
        let node = core
            .node(container)
            .ok_or(Error::NodeNotFound(container))?;
        if node.suspended() {
            trace!("layout of {:?} deferred while suspended", container);
            return Ok(());
        }
        let client = node.bounds().expanse();
        let participants = self.participants(core);
        let key = PassKey {
            client,
            participants,
        };
        if !reset && self.last.as_ref() == Some(&key) {
            trace!("layout of {:?} is current", container);
            return Ok(());
        }

        let hints: Vec<ChildHints> = key
            .participants
            .iter()
            .map(|id| ChildHints {
                pref: core.size_hint(*id),
                min: core.min_size_hint(*id),
                flags: core.layout_flags(*id),
            })
            .collect();
        let rects = self.arrange(client, &hints);
        trace!(
            "layout of {:?}: {} children in {:?}",
            container,
            rects.len(),
            client
        );
        // Forget the key until every child is placed, so a failed pass is
        // retried by the next incremental update.
        self.last = None;
        for (child, rect) in key.participants.iter().zip(rects) {
            core.set_bounds(*child, rect)?;
        }
        self.last = Some(key);
        Ok(())
    }
}
