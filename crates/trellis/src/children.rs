//! Child collections and the membership hooks that keep them consistent with
//! tree-parent links.

use std::slice;

use tracing::trace;

use crate::{
    container::ContainerMut,
    error::{Error, Result},
    id::NodeId,
};

/// Ordered children of a container. Order determines layout position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidgetList {
    /// Members, in order.
    items: Vec<NodeId>,
}

impl WidgetList {
    /// An empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of children.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if there are no children.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Child at `index`.
    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.items.get(index).copied()
    }

    /// Iterate over the children in order.
    pub fn iter(&self) -> slice::Iter<'_, NodeId> {
        self.items.iter()
    }

    /// True if `id` is a member.
    pub fn contains(&self, id: NodeId) -> bool {
        self.items.contains(&id)
    }

    /// Position of `id`.
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.items.iter().position(|c| *c == id)
    }

    /// The children as a slice.
    pub fn as_slice(&self) -> &[NodeId] {
        &self.items
    }

    /// Drop `id` without running any hooks. Returns whether it was a member.
    pub(crate) fn forget(&mut self, id: NodeId) -> bool {
        match self.index_of(id) {
            Some(i) => {
                self.items.remove(i);
                true
            }
            None => false,
        }
    }
}

impl<'a> IntoIterator for &'a WidgetList {
    type Item = &'a NodeId;
    type IntoIter = slice::Iter<'a, NodeId>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl ContainerMut<'_> {
    /// Insert `child` at `index`. The child is reparented to this container
    /// and the layout is reset.
    pub fn insert(&mut self, index: usize, child: NodeId) -> Result<()> {
        self.core.get(child)?;
        let len = self.children().len();
        if index > len {
            return Err(Error::IndexOutOfRange { index, len });
        }
        if self.children().contains(&child) {
            return Err(Error::DuplicateChild {
                parent: self.id,
                child,
            });
        }
        self.on_inserting(index, child)?;
        self.insert_vetted(index, child)
    }

    /// Insert a child whose insertion the container has already accepted.
    pub(crate) fn insert_vetted(&mut self, index: usize, child: NodeId) -> Result<()> {
        self.base_mut()?.children.items.insert(index, child);
        self.on_inserted(index, child)
    }

    /// Append `child`.
    pub fn push(&mut self, child: NodeId) -> Result<()> {
        let len = self.children().len();
        self.insert(len, child)
    }

    /// Remove and return the child at `index`. The child is detached if this
    /// container is its parent.
    pub fn remove_at(&mut self, index: usize) -> Result<NodeId> {
        let len = self.children().len();
        let child = self
            .children()
            .get(index)
            .copied()
            .ok_or(Error::IndexOutOfRange { index, len })?;
        self.on_removing(index, child)?;
        self.base_mut()?.children.items.remove(index);
        self.on_removed(index, child)?;
        Ok(child)
    }

    /// Remove `child` if it is a member. Returns whether it was.
    pub fn remove(&mut self, child: NodeId) -> Result<bool> {
        match self.children().iter().position(|c| *c == child) {
            Some(index) => {
                self.remove_at(index)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove every child.
    pub fn clear(&mut self) -> Result<()> {
        self.on_clearing()?;
        self.base_mut()?.children.items.clear();
        self.on_cleared()
    }

    /// Run before a child is inserted. The container widget may veto.
    pub(crate) fn on_inserting(&mut self, index: usize, child: NodeId) -> Result<()> {
        self.core
            .with_widget_mut(self.id, |w, _| w.on_inserting_child(index, child))?
    }

    /// Run after a child is inserted.
    fn on_inserted(&mut self, index: usize, child: NodeId) -> Result<()> {
        trace!("{:?} inserted into {:?} at {}", child, self.id, index);
        if self.core.parent(child) != Some(self.id)
            && let Err(e) = self.core.set_parent(child, Some(self.id))
        {
            // Keep the membership only if the parent link was established.
            if self.core.parent(child) != Some(self.id)
                && let Ok(base) = self.base_mut()
            {
                base.children.forget(child);
            }
            return Err(e);
        }
        self.update_layout(true)
    }

    /// Run before a child is removed.
    fn on_removing(&mut self, _index: usize, child: NodeId) -> Result<()> {
        if self.core.parent(child) == Some(self.id) {
            self.core.reparent_native(child, None)?;
        }
        Ok(())
    }

    /// Run after a child is removed.
    fn on_removed(&mut self, index: usize, child: NodeId) -> Result<()> {
        trace!("{:?} removed from {:?} at {}", child, self.id, index);
        self.update_layout(true)
    }

    /// Run before all children are removed. Stops at the first failure.
    fn on_clearing(&mut self) -> Result<()> {
        for child in self.children().to_vec() {
            if self.core.parent(child) == Some(self.id) {
                self.core.reparent_native(child, None)?;
            }
        }
        Ok(())
    }

    /// Run after all children are removed.
    fn on_cleared(&mut self) -> Result<()> {
        trace!("{:?} cleared", self.id);
        self.update_layout(true)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        testing::{EventLog, RecordingLayout, Refusing},
        widgets::{Composite, Label},
        world::Core,
    };

    #[test]
    fn insert_sets_parent_and_resets_layout() -> Result<()> {
        let mut core = Core::new();
        let c = core.create(Composite::new());
        let log = EventLog::new();
        let (layout, _probe) = RecordingLayout::new("c", &log);
        core.container_mut(c)?.set_layout(Some(Box::new(layout)))?;

        let a = core.create(Label::new("a"));
        let b = core.create(Label::new("b"));
        core.container_mut(c)?.push(a)?;
        core.container_mut(c)?.insert(0, b)?;
        assert_eq!(core.children(c), &[b, a]);
        assert_eq!(core.parent(a), Some(c));
        assert_eq!(core.parent(b), Some(c));
        assert_eq!(log.entries(), vec!["c:update(true)", "c:update(true)"]);
        Ok(())
    }

    #[test]
    fn insert_validates() -> Result<()> {
        let mut core = Core::new();
        let c = core.create(Composite::new());
        let a = core.create(Label::new("a"));
        assert_eq!(
            core.container_mut(c)?.insert(1, a),
            Err(Error::IndexOutOfRange { index: 1, len: 0 })
        );
        core.container_mut(c)?.push(a)?;
        assert_eq!(
            core.container_mut(c)?.push(a),
            Err(Error::DuplicateChild {
                parent: c,
                child: a
            })
        );
        Ok(())
    }

    #[test]
    fn inserting_an_ancestor_is_rolled_back() -> Result<()> {
        let mut core = Core::new();
        let outer = core.create(Composite::new());
        let inner = core.create(Composite::new());
        core.container_mut(outer)?.push(inner)?;
        assert_eq!(
            core.container_mut(inner)?.push(outer),
            Err(Error::WouldCreateCycle {
                parent: inner,
                child: outer
            })
        );
        assert!(core.children(inner).is_empty());
        assert_eq!(core.parent(outer), None);
        Ok(())
    }

    #[test]
    fn insert_moves_child_out_of_previous_parent() -> Result<()> {
        let mut core = Core::new();
        let first = core.create(Composite::new());
        let second = core.create(Composite::new());
        let a = core.create(Label::new("a"));
        core.container_mut(first)?.push(a)?;
        core.container_mut(second)?.push(a)?;
        assert!(core.children(first).is_empty());
        assert_eq!(core.children(second), &[a]);
        assert_eq!(core.parent(a), Some(second));
        Ok(())
    }

    #[test]
    fn remove_and_clear_detach() -> Result<()> {
        let mut core = Core::new();
        let c = core.create(Composite::new());
        let log = EventLog::new();
        let (layout, _probe) = RecordingLayout::new("c", &log);
        let kids: Vec<NodeId> = (0..3).map(|_| core.create(Label::new("x"))).collect();
        for k in &kids {
            core.container_mut(c)?.push(*k)?;
        }
        core.container_mut(c)?.set_layout(Some(Box::new(layout)))?;

        assert!(core.container_mut(c)?.remove(kids[1])?);
        assert!(!core.container_mut(c)?.remove(kids[1])?);
        assert_eq!(core.parent(kids[1]), None);
        assert_eq!(core.container_mut(c)?.remove_at(0)?, kids[0]);
        core.container_mut(c)?.clear()?;
        assert!(core.children(c).is_empty());
        assert!(kids.iter().all(|k| core.parent(*k).is_none()));
        assert_eq!(log.len(), 3);
        Ok(())
    }

    #[test]
    fn failed_layout_aborts_the_mutation_result() -> Result<()> {
        let mut core = Core::new();
        let c = core.create(Composite::new());
        let log = EventLog::new();
        let (layout, probe) = RecordingLayout::new("c", &log);
        core.container_mut(c)?.set_layout(Some(Box::new(layout)))?;
        probe.fail_updates(true);
        let a = core.create(Label::new("a"));
        assert_eq!(
            core.container_mut(c)?.push(a),
            Err(Error::Layout("c: injected failure".into()))
        );
        assert_eq!(core.children(c), &[a]);
        assert_eq!(core.parent(a), Some(c));
        Ok(())
    }

    #[test]
    fn vetoed_insert_leaves_collection_untouched() -> Result<()> {
        let mut core = Core::new();
        let c = core.create(Refusing::container("veto"));
        let a = core.create(Label::new("a"));
        assert!(matches!(
            core.container_mut(c)?.push(a),
            Err(Error::Invalid(_))
        ));
        assert!(core.children(c).is_empty());
        assert_eq!(core.parent(a), None);
        Ok(())
    }

    #[test]
    fn clear_stops_at_first_detach_failure() -> Result<()> {
        let mut core = Core::new();
        let c = core.create(Composite::new());
        let a = core.create(Label::new("a"));
        let p = core.create(Refusing::pinned("pinned"));
        let b = core.create(Label::new("b"));
        for k in [a, p, b] {
            core.container_mut(c)?.push(k)?;
        }
        let log = EventLog::new();
        let (layout, _probe) = RecordingLayout::new("c", &log);
        core.container_mut(c)?.set_layout(Some(Box::new(layout)))?;

        assert_eq!(
            core.container_mut(c)?.clear(),
            Err(Error::Native("pinned: SetParent failed".into()))
        );
        assert_eq!(core.children(c), &[a, p, b]);
        assert_eq!(core.parent(a), None);
        assert_eq!(core.parent(p), Some(c));
        assert_eq!(core.parent(b), Some(c));
        assert!(log.is_empty());
        Ok(())
    }

    #[test]
    fn widget_list_queries() {
        let list = WidgetList::new();
        assert!(list.is_empty());
        assert_eq!(list.get(0), None);
        assert_eq!(list.iter().count(), 0);
    }
}
