use std::{
    collections::{BTreeMap, HashMap},
    mem,
};

use serde_json::Value;
use slotmap::SlotMap;
use tracing::{debug, trace};

use crate::{
    action::ActionRegistry,
    binder::DataBinder,
    container::{ContainerBase, ContainerMut},
    error::{Error, Result},
    geom::{Expanse, Rect},
    id::{Handle, NodeId},
    layout::{Layout, LayoutFlags},
    message::{Message, MessageResult},
    node::Node,
    widget::{Font, Property, Widget},
};

/// Fallback size hint for containers whose widget kind has no better one.
const CONTAINER_SIZE_HINT: Expanse = Expanse { w: 100, h: 100 };

/// Return value of traversal closures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    /// Keep going, descending into this node's children.
    Continue,
    /// Do not descend into this node's children.
    Skip,
}

/// The widget arena: every widget's common state, the tree-parent links, the
/// handle registry and the action registry. All operations run on the UI
/// thread that owns the `Core`.
pub struct Core {
    /// Node storage arena.
    pub(crate) nodes: SlotMap<NodeId, Node>,
    /// Handle-to-widget registry.
    handles: HashMap<Handle, NodeId>,
    /// Next native handle to assign.
    next_handle: u64,
    /// Action registry consulted for menu and accelerator commands.
    actions: ActionRegistry,
}

impl Default for Core {
    fn default() -> Self {
        Self::new()
    }
}

impl Core {
    /// An empty arena with an empty action registry.
    pub fn new() -> Self {
        Self::with_actions(ActionRegistry::new())
    }

    /// An empty arena using `actions` for command lookup.
    pub fn with_actions(actions: ActionRegistry) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            handles: HashMap::new(),
            next_handle: 1,
            actions,
        }
    }

    /// The action registry.
    pub fn actions(&self) -> &ActionRegistry {
        &self.actions
    }

    /// The action registry, mutably.
    pub fn actions_mut(&mut self) -> &mut ActionRegistry {
        &mut self.actions
    }

    /// Tear everything down: release every layout and data binder, drop all
    /// widgets, and clear the handle and action registries.
    pub fn shutdown(&mut self) {
        for (_, node) in self.nodes.iter_mut() {
            if let Some(base) = node.container.as_mut() {
                base.release();
            }
        }
        self.nodes.clear();
        self.handles.clear();
        self.actions.clear();
        debug!("core shut down");
    }

    /// Add a widget to the arena, detached from the tree.
    pub fn create<W>(&mut self, widget: W) -> NodeId
    where
        W: Widget + 'static,
    {
        self.create_boxed(Box::new(widget))
    }

    /// Add a boxed widget to the arena, detached from the tree.
    pub fn create_boxed(&mut self, widget: Box<dyn Widget>) -> NodeId {
        let handle = Handle(self.next_handle);
        self.next_handle += 1;
        let name = widget.name();
        let spacer = widget.is_spacer();
        let container = widget.is_container().then(ContainerBase::new);
        let id = self.nodes.insert(Node {
            widget: Some(widget),
            container,
            handle,
            name,
            spacer,
            parent: None,
            bounds: Rect::zero(),
            visible: true,
            enabled: true,
            font: None,
            suspended: false,
            needs_repaint: false,
            properties: BTreeMap::new(),
        });
        self.handles.insert(handle, id);
        trace!("created {:?} with handle {}", id, handle);
        id
    }

    /// A node by id.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// A node by id, or `NodeNotFound`.
    pub fn get(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id).ok_or(Error::NodeNotFound(id))
    }

    /// A node by id, mutably, or `NodeNotFound`.
    pub(crate) fn get_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(id).ok_or(Error::NodeNotFound(id))
    }

    /// True if the node exists.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of widgets in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the arena holds no widgets.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// True if the node exists and is a container.
    pub fn is_container(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(Node::is_container)
    }

    /// The widget owning a native handle.
    pub fn widget_from_handle(&self, handle: Handle) -> Option<NodeId> {
        self.handles.get(&handle).copied()
    }

    /// Native handle of a widget.
    pub fn handle_of(&self, id: NodeId) -> Option<Handle> {
        self.nodes.get(id).map(Node::handle)
    }

    /// Tree-parent of a widget.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(Node::parent)
    }

    /// The child collection of a container; empty for plain widgets.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id)
            .and_then(|n| n.container.as_ref())
            .map(|c| c.children().as_slice())
            .unwrap_or(&[])
    }

    /// Container state of a node, or `NotAContainer`.
    pub(crate) fn base(&self, id: NodeId) -> Result<&ContainerBase> {
        self.get(id)?
            .container
            .as_ref()
            .ok_or(Error::NotAContainer(id))
    }

    /// Container state of a node, mutably, or `NotAContainer`.
    pub(crate) fn base_mut(&mut self, id: NodeId) -> Result<&mut ContainerBase> {
        self.get_mut(id)?
            .container
            .as_mut()
            .ok_or(Error::NotAContainer(id))
    }

    /// A mutable handle on a container.
    pub fn container_mut(&mut self, id: NodeId) -> Result<ContainerMut<'_>> {
        self.base(id)?;
        Ok(ContainerMut::new(self, id))
    }

    /// The layout attached to a container.
    pub fn layout(&self, id: NodeId) -> Option<&dyn Layout> {
        self.base(id).ok().and_then(ContainerBase::layout)
    }

    /// The data binder attached to a container.
    pub fn data_binder(&self, id: NodeId) -> Option<&DataBinder> {
        self.base(id).ok().and_then(ContainerBase::data_binder)
    }

    /// True if `ancestor` appears on the parent chain above `id`.
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = self.parent(id);
        let mut steps = 0;
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            steps += 1;
            if steps > self.nodes.len() {
                return false;
            }
            current = self.parent(p);
        }
        false
    }

    /// The enclosing top-level owner: the last widget on the parent chain.
    pub fn top_level(&self, id: NodeId) -> Result<NodeId> {
        let mut current = self.get(id).map(|_| id)?;
        let mut steps = 0;
        while let Some(p) = self.parent(current) {
            current = p;
            steps += 1;
            if steps > self.nodes.len() {
                return Err(Error::Invalid("parent chain has a cycle".into()));
            }
        }
        Ok(current)
    }

    /// Key under which a widget's persisted state is stored: the names on the
    /// path from the top-level owner, joined by `/`.
    pub fn settings_key(&self, id: NodeId) -> Result<String> {
        let mut names = vec![self.get(id)?.name.to_string()];
        let mut current = id;
        while let Some(p) = self.parent(current) {
            names.push(self.get(p)?.name.to_string());
            current = p;
            if names.len() > self.nodes.len() {
                return Err(Error::Invalid("parent chain has a cycle".into()));
            }
        }
        names.reverse();
        Ok(names.join("/"))
    }

    /// Change the tree-parent link only. Membership of child collections is
    /// left to the caller.
    pub(crate) fn reparent_native(&mut self, child: NodeId, parent: Option<NodeId>) -> Result<()> {
        self.check_parent(child, parent)?;
        let node = self.get_mut(child)?;
        // A widget checked out by an enclosing call is moved without its hook.
        if let Some(widget) = node.widget.as_mut() {
            widget.on_reparenting(parent)?;
        }
        node.parent = parent;
        debug!("reparented {:?} under {:?}", child, parent);
        Ok(())
    }

    /// Fail unless `parent` may become the tree-parent of `child`.
    fn check_parent(&self, child: NodeId, parent: Option<NodeId>) -> Result<()> {
        self.get(child)?;
        if let Some(p) = parent {
            if !self.get(p)?.is_container() {
                return Err(Error::NotAContainer(p));
            }
            if p == child || self.is_ancestor(child, p) {
                return Err(Error::WouldCreateCycle { parent: p, child });
            }
        }
        Ok(())
    }

    /// Set a widget's tree-parent and keep child collections consistent with
    /// it: the widget leaves the old parent's collection and joins the end of
    /// the new parent's collection, running both containers' hooks.
    ///
    /// Nothing changes if the new parent is invalid or vetoes the insertion.
    /// A layout failure in either container is returned after both
    /// collections have been updated.
    pub fn set_parent(&mut self, child: NodeId, parent: Option<NodeId>) -> Result<()> {
        let old = self.get(child)?.parent;
        if old == parent {
            return Ok(());
        }
        self.check_parent(child, parent)?;
        let joining = parent.filter(|new| !self.children(*new).contains(&child));
        if let Some(new) = joining {
            let index = self.children(new).len();
            self.container_mut(new)?.on_inserting(index, child)?;
        }

        self.reparent_native(child, parent)?;
        let left = match old {
            Some(old) if self.children(old).contains(&child) => self
                .container_mut(old)
                .and_then(|mut c| c.remove(child))
                .map(|_| ()),
            _ => Ok(()),
        };
        let joined = match joining {
            Some(new) => {
                let index = self.children(new).len();
                self.container_mut(new)
                    .and_then(|mut c| c.insert_vetted(index, child))
            }
            None => Ok(()),
        };
        left.and(joined)
    }

    /// Own visibility flag.
    pub fn visible(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(Node::visible)
    }

    /// Show or hide a widget. A change re-runs the parent container's layout.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> Result<()> {
        let node = self.get_mut(id)?;
        if node.visible == visible {
            return Ok(());
        }
        node.visible = visible;
        node.needs_repaint = true;
        let parent = node.parent;
        if let Some(parent) = parent {
            self.container_mut(parent)?.update_layout(false)?;
        }
        Ok(())
    }

    /// Own enabled flag.
    pub fn enabled(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(Node::enabled)
    }

    /// Enable or disable a widget and, for containers, every descendant.
    pub fn set_enabled(&mut self, id: NodeId, enabled: bool) -> Result<()> {
        self.walk_mut(id, &mut |core, w| {
            let node = core.get_mut(w)?;
            node.enabled = enabled;
            node.needs_repaint = true;
            Ok(Walk::Continue)
        })
    }

    /// Assigned font of a widget.
    pub fn font(&self, id: NodeId) -> Option<&Font> {
        self.nodes.get(id).and_then(Node::font)
    }

    /// Set the font of a widget and, for containers, every descendant.
    pub fn set_font(&mut self, id: NodeId, font: &Font) -> Result<()> {
        self.walk_mut(id, &mut |core, w| {
            let node = core.get_mut(w)?;
            node.font = Some(font.clone());
            node.needs_repaint = true;
            Ok(Walk::Continue)
        })
    }

    /// True while a widget defers visual updates.
    pub fn suspended(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(Node::suspended)
    }

    /// Suspension bookkeeping for a single widget.
    pub(crate) fn set_suspended_flag(&mut self, id: NodeId, suspended: bool) -> Result<()> {
        self.get_mut(id)?.suspended = suspended;
        Ok(())
    }

    /// Set a widget's suspension state. Containers propagate the change to
    /// their nested containers.
    pub fn set_suspended(&mut self, id: NodeId, suspended: bool) -> Result<()> {
        if self.is_container(id) {
            self.container_mut(id)?.set_suspended(suspended)
        } else {
            self.set_suspended_flag(id, suspended)
        }
    }

    /// Mark a widget for repaint.
    pub fn invalidate(&mut self, id: NodeId) -> Result<()> {
        self.get_mut(id)?.needs_repaint = true;
        Ok(())
    }

    /// Clear and return a widget's repaint mark.
    pub fn take_repaint(&mut self, id: NodeId) -> bool {
        self.nodes
            .get_mut(id)
            .is_some_and(|n| mem::replace(&mut n.needs_repaint, false))
    }

    /// Outer rectangle of a widget in parent client coordinates.
    pub fn bounds(&self, id: NodeId) -> Rect {
        self.nodes.get(id).map(Node::bounds).unwrap_or_default()
    }

    /// Move and resize a widget. A container whose size changed receives a
    /// size message, which updates its layout.
    pub fn set_bounds(&mut self, id: NodeId, bounds: Rect) -> Result<()> {
        let node = self.get_mut(id)?;
        let old = node.bounds;
        if old == bounds {
            return Ok(());
        }
        node.bounds = bounds;
        node.needs_repaint = true;
        let resized = old.expanse() != bounds.expanse() && node.is_container();
        if resized {
            self.send_message(id, &Message::size(bounds.expanse()))?;
        }
        Ok(())
    }

    /// Record a new client size reported by the native layer.
    pub(crate) fn record_client_size(&mut self, id: NodeId, size: Expanse) -> Result<()> {
        let node = self.get_mut(id)?;
        node.bounds.w = size.w;
        node.bounds.h = size.h;
        Ok(())
    }

    /// A named property of a widget.
    pub fn property(&self, id: NodeId, name: &str) -> Option<&Property> {
        self.nodes.get(id).and_then(|n| n.properties.get(name))
    }

    /// Define or replace a named property.
    pub fn set_property(&mut self, id: NodeId, name: &str, property: Property) -> Result<()> {
        self.get_mut(id)?
            .properties
            .insert(name.to_string(), property);
        Ok(())
    }

    /// Set the value of a named property, defining an unbound property if
    /// none exists.
    pub fn set_property_value(&mut self, id: NodeId, name: &str, value: Value) -> Result<()> {
        let node = self.get_mut(id)?;
        node.properties
            .entry(name.to_string())
            .and_modify(|p| p.value = value.clone())
            .or_insert_with(|| Property::new(value));
        node.needs_repaint = true;
        Ok(())
    }

    /// Preferred size of a widget. Containers fall back to a fixed hint when
    /// their widget kind has none; other widgets fall back to their minimum.
    pub fn size_hint(&self, id: NodeId) -> Expanse {
        let Some(node) = self.nodes.get(id) else {
            return Expanse::default();
        };
        match node.widget().and_then(|w| w.size_hint()) {
            Some(hint) => hint,
            None if node.is_container() => CONTAINER_SIZE_HINT,
            None => self.min_size_hint(id),
        }
    }

    /// Minimum size of a widget. Containers delegate to their layout.
    pub fn min_size_hint(&self, id: NodeId) -> Expanse {
        let Some(node) = self.nodes.get(id) else {
            return Expanse::default();
        };
        match &node.container {
            Some(base) => base.min_size_hint(self),
            None => node.widget().map(|w| w.min_size_hint()).unwrap_or_default(),
        }
    }

    /// Layout flags of a widget. Containers delegate to their layout.
    pub fn layout_flags(&self, id: NodeId) -> LayoutFlags {
        let Some(node) = self.nodes.get(id) else {
            return LayoutFlags::empty();
        };
        match &node.container {
            Some(base) => base.layout_flags(self),
            None => node.widget().map(|w| w.layout_flags()).unwrap_or_default(),
        }
    }

    /// Pre-order traversal through child collections, starting at (and
    /// including) `root`.
    pub fn walk(&self, root: NodeId, f: &mut dyn FnMut(&Self, NodeId) -> Walk) {
        if !self.nodes.contains_key(root) {
            return;
        }
        if f(self, root) == Walk::Skip {
            return;
        }
        for child in self.children(root) {
            self.walk(*child, f);
        }
    }

    /// Pre-order traversal that may mutate the arena. The child list of each
    /// node is read after its visit.
    pub fn walk_mut(
        &mut self,
        root: NodeId,
        f: &mut dyn FnMut(&mut Self, NodeId) -> Result<Walk>,
    ) -> Result<()> {
        if !self.nodes.contains_key(root) {
            return Ok(());
        }
        if f(self, root)? == Walk::Skip {
            return Ok(());
        }
        let children = self.children(root).to_vec();
        for child in children {
            self.walk_mut(child, f)?;
        }
        Ok(())
    }

    /// Run `f` with a widget checked out of its slot.
    pub fn with_widget_mut<R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut dyn Widget, &mut Self) -> R,
    ) -> Result<R> {
        let mut widget = self
            .get_mut(id)?
            .widget
            .take()
            .ok_or(Error::ReentrantWidget(id))?;
        let out = f(widget.as_mut(), self);
        if let Some(node) = self.nodes.get_mut(id)
            && node.widget.is_none()
        {
            node.widget = Some(widget);
        }
        Ok(out)
    }

    /// Deliver a message to a widget. Containers route it; other widgets
    /// handle it themselves.
    pub fn send_message(&mut self, id: NodeId, msg: &Message) -> Result<MessageResult> {
        if self.is_container(id) {
            self.container_mut(id)?.handle_message(msg)
        } else {
            self.default_message(id, msg)
        }
    }

    /// The widget kind's own message handling.
    pub(crate) fn default_message(&mut self, id: NodeId, msg: &Message) -> Result<MessageResult> {
        self.with_widget_mut(id, |w, _| w.handle_message(msg))?
    }

    /// Destroy a widget and its subtree. The widget leaves its parent's
    /// collection, handles are unregistered, and every layout and data
    /// binder in the subtree is released.
    pub fn destroy(&mut self, id: NodeId) -> Result<()> {
        let parent = self.get(id)?.parent;
        let detached = match parent {
            Some(parent) if self.children(parent).contains(&id) => self
                .container_mut(parent)
                .and_then(|mut c| c.remove(id))
                .map(|_| ()),
            Some(_) => self.reparent_native(id, None),
            None => Ok(()),
        };
        // The subtree goes regardless of how the parent's hooks fared.
        if let Some(parent) = parent
            && let Ok(base) = self.base_mut(parent)
        {
            base.children.forget(id);
        }

        let mut doomed = Vec::new();
        self.walk(id, &mut |_, n| {
            doomed.push(n);
            Walk::Continue
        });
        for n in doomed.iter().rev() {
            if let Some(mut node) = self.nodes.remove(*n) {
                self.handles.remove(&node.handle);
                if let Some(base) = node.container.as_mut() {
                    base.release();
                }
            }
        }
        debug!("destroyed {:?} ({} widgets)", id, doomed.len());
        detached
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        action::Action,
        testing::{EventLog, RecordingLayout},
        widgets::{Composite, Label, Spacer},
    };

    fn tree() -> Result<(Core, NodeId, NodeId, NodeId, NodeId)> {
        let mut core = Core::new();
        let root = core.create(Composite::named("root"));
        let inner = core.create(Composite::named("inner"));
        let a = core.create(Label::new("a"));
        let b = core.create(Label::new("b"));
        core.container_mut(root)?.push(inner)?;
        core.container_mut(root)?.push(a)?;
        core.container_mut(inner)?.push(b)?;
        Ok((core, root, inner, a, b))
    }

    #[test]
    fn handles_resolve_to_widgets() -> Result<()> {
        let (core, root, _, a, _) = tree()?;
        let h = core.handle_of(a).ok_or(Error::NodeNotFound(a))?;
        assert_eq!(core.widget_from_handle(h), Some(a));
        assert_ne!(core.handle_of(root), Some(h));
        Ok(())
    }

    #[test]
    fn walk_is_pre_order_and_honours_skip() -> Result<()> {
        let (core, root, inner, a, b) = tree()?;
        let mut seen = Vec::new();
        core.walk(root, &mut |_, id| {
            seen.push(id);
            Walk::Continue
        });
        assert_eq!(seen, vec![root, inner, b, a]);

        let mut seen = Vec::new();
        core.walk(root, &mut |_, id| {
            seen.push(id);
            if id == inner { Walk::Skip } else { Walk::Continue }
        });
        assert_eq!(seen, vec![root, inner, a]);
        Ok(())
    }

    #[test]
    fn set_parent_moves_between_collections() -> Result<()> {
        let (mut core, root, inner, a, _) = tree()?;
        core.set_parent(a, Some(inner))?;
        assert_eq!(core.parent(a), Some(inner));
        assert!(!core.children(root).contains(&a));
        assert_eq!(core.children(inner).last(), Some(&a));

        core.set_parent(a, None)?;
        assert_eq!(core.parent(a), None);
        assert!(!core.children(inner).contains(&a));
        Ok(())
    }

    #[test]
    fn set_parent_rejects_cycles_and_plain_widgets() -> Result<()> {
        let (mut core, root, inner, a, b) = tree()?;
        assert_eq!(
            core.set_parent(root, Some(inner)),
            Err(Error::WouldCreateCycle {
                parent: inner,
                child: root
            })
        );
        assert_eq!(core.set_parent(b, Some(a)), Err(Error::NotAContainer(a)));
        assert_eq!(core.parent(b), Some(inner));
        Ok(())
    }

    #[test]
    fn enabled_and_font_propagate_to_all_descendants() -> Result<()> {
        let (mut core, root, inner, a, b) = tree()?;
        core.set_enabled(b, true)?;
        core.set_enabled(root, false)?;
        for id in [root, inner, a, b] {
            assert!(!core.enabled(id));
        }
        let font = Font::new("mono", 11).bold();
        core.set_font(inner, &font)?;
        assert_eq!(core.font(b), Some(&font));
        assert_eq!(core.font(inner), Some(&font));
        assert_eq!(core.font(a), None);
        Ok(())
    }

    #[test]
    fn settings_key_joins_names_from_top_level() -> Result<()> {
        let (core, root, _, _, b) = tree()?;
        assert_eq!(core.settings_key(b)?, "root/inner/label");
        assert_eq!(core.top_level(b)?, root);
        Ok(())
    }

    #[test]
    fn size_hints_fall_back_by_kind() -> Result<()> {
        let (mut core, root, _, a, _) = tree()?;
        assert_eq!(core.size_hint(root), Expanse::new(100, 100));
        assert_eq!(core.min_size_hint(root), Expanse::default());
        assert_eq!(core.layout_flags(root), LayoutFlags::empty());
        let s = core.create(Spacer::horizontal());
        assert!(core.layout_flags(s).contains(LayoutFlags::GROWABLE_HORZ));
        core.set_property_value(a, "text", Value::from("hi"))?;
        assert_eq!(
            core.property(a, "text").map(|p| p.value.clone()),
            Some(Value::from("hi"))
        );
        Ok(())
    }

    #[test]
    fn destroy_releases_layout_and_unregisters() -> Result<()> {
        let (mut core, root, inner, _, b) = tree()?;
        let log = EventLog::new();
        let (layout, probe) = RecordingLayout::new("inner", &log);
        core.container_mut(inner)?.set_layout(Some(Box::new(layout)))?;
        assert_eq!(probe.container(), Some(inner));
        let hb = core.handle_of(b).ok_or(Error::NodeNotFound(b))?;

        core.destroy(inner)?;
        assert!(!core.contains(inner));
        assert!(!core.contains(b));
        assert_eq!(core.widget_from_handle(hb), None);
        assert!(!core.children(root).contains(&inner));
        assert_eq!(probe.container(), None);
        Ok(())
    }

    #[test]
    fn set_bounds_resizes_nested_layouts() -> Result<()> {
        let (mut core, _, inner, _, _) = tree()?;
        let log = EventLog::new();
        let (layout, _probe) = RecordingLayout::new("inner", &log);
        core.container_mut(inner)?.set_layout(Some(Box::new(layout)))?;
        log.clear();
        core.set_bounds(inner, Rect::new(0, 0, 50, 40))?;
        assert_eq!(log.entries(), vec!["inner:update(false)"]);
        core.set_bounds(inner, Rect::new(5, 5, 50, 40))?;
        assert_eq!(log.len(), 1);
        Ok(())
    }

    #[test]
    fn hiding_a_child_updates_the_parent_layout() -> Result<()> {
        let (mut core, root, _, a, _) = tree()?;
        let log = EventLog::new();
        let (layout, _probe) = RecordingLayout::new("root", &log);
        core.container_mut(root)?.set_layout(Some(Box::new(layout)))?;
        core.set_visible(a, false)?;
        core.set_visible(a, false)?;
        assert_eq!(log.entries(), vec!["root:update(false)"]);
        assert!(!core.visible(a));
        Ok(())
    }

    #[test]
    fn shutdown_clears_everything() -> Result<()> {
        let (mut core, ..) = tree()?;
        core.actions_mut().register(Action::new("Quit"))?;
        core.shutdown();
        assert!(core.is_empty());
        assert!(core.actions().is_empty());
        Ok(())
    }
}
