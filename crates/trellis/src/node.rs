use std::collections::BTreeMap;

use crate::{
    container::ContainerBase,
    geom::Rect,
    id::{Handle, NodeId},
    state::NodeName,
    widget::{Font, Property, Widget},
};

/// Core node data stored in the arena: the common widget state shared by
/// every widget kind.
pub struct Node {
    /// Widget behavior. Temporarily `None` while the widget is checked out
    /// for a call.
    pub(crate) widget: Option<Box<dyn Widget>>,
    /// Container state, for container-kind widgets.
    pub(crate) container: Option<ContainerBase>,

    /// Native handle.
    pub(crate) handle: Handle,
    /// Name used for persistence keys.
    pub(crate) name: NodeName,
    /// Cached spacer capability.
    pub(crate) spacer: bool,

    /// Tree-parent. Non-owning.
    pub(crate) parent: Option<NodeId>,
    /// Outer rectangle in parent client coordinates.
    pub(crate) bounds: Rect,

    /// Own visibility flag.
    pub(crate) visible: bool,
    /// Own enabled flag.
    pub(crate) enabled: bool,
    /// Assigned font, if any.
    pub(crate) font: Option<Font>,
    /// Whether visual updates are deferred.
    pub(crate) suspended: bool,
    /// Whether the widget has been marked for repaint.
    pub(crate) needs_repaint: bool,

    /// Named property table.
    pub(crate) properties: BTreeMap<String, Property>,
}

impl Node {
    /// Native handle.
    pub fn handle(&self) -> Handle {
        self.handle
    }

    /// Widget name.
    pub fn name(&self) -> &NodeName {
        &self.name
    }

    /// Tree-parent, if any.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// True for container-kind widgets.
    pub fn is_container(&self) -> bool {
        self.container.is_some()
    }

    /// True for spacers.
    pub fn is_spacer(&self) -> bool {
        self.spacer
    }

    /// Outer rectangle in parent client coordinates.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Own visibility flag.
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Own enabled flag.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Assigned font.
    pub fn font(&self) -> Option<&Font> {
        self.font.as_ref()
    }

    /// True while visual updates are deferred.
    pub fn suspended(&self) -> bool {
        self.suspended
    }

    /// True if the widget has been marked for repaint.
    pub fn needs_repaint(&self) -> bool {
        self.needs_repaint
    }

    /// Named property table.
    pub fn properties(&self) -> &BTreeMap<String, Property> {
        &self.properties
    }

    /// The widget behavior, unless it is checked out for a call.
    pub fn widget(&self) -> Option<&dyn Widget> {
        self.widget.as_deref()
    }

    /// Container state, for container-kind widgets.
    pub fn container(&self) -> Option<&ContainerBase> {
        self.container.as_ref()
    }
}
