//! Widget trait, capability traits, and per-widget property types.

use std::any::{Any, type_name};

use serde_json::Value;

use crate::{
    error::Result,
    geom::Expanse,
    id::NodeId,
    layout::LayoutFlags,
    message::{Message, MessageResult},
    persist::Persistable,
    state::NodeName,
};

/// Widgets are the behavior attached to nodes in the Core arena. The common
/// widget state (parent, visibility, enabled flag, font, suspension, bounds,
/// properties) lives on the node; the widget supplies kind-specific hints and
/// capabilities.
pub trait Widget: Any + Send {
    /// Name used to build persistence keys.
    fn name(&self) -> NodeName {
        let name = type_name::<Self>();
        let short = name.rsplit("::").next().unwrap_or(name);
        NodeName::convert(short)
    }

    /// True if nodes of this kind own a child collection, an optional layout
    /// and an optional data binder.
    fn is_container(&self) -> bool {
        false
    }

    /// True for layout placeholders. Spacers take part in layout even when
    /// hidden.
    fn is_spacer(&self) -> bool {
        false
    }

    /// Preferred size, if this widget kind has one.
    fn size_hint(&self) -> Option<Expanse> {
        None
    }

    /// Smallest size the widget can be rendered at.
    fn min_size_hint(&self) -> Expanse {
        Expanse::default()
    }

    /// Growth and shrink behavior consumed by a parent layout.
    fn layout_flags(&self) -> LayoutFlags {
        LayoutFlags::empty()
    }

    /// Kind-specific message handling. This is the "default processing"
    /// that container routing falls through to.
    fn handle_message(&mut self, _msg: &Message) -> Result<MessageResult> {
        Ok(MessageResult::default())
    }

    /// Validation hook run before a child is inserted into this container's
    /// collection. Returning an error vetoes the insertion.
    fn on_inserting_child(&mut self, _index: usize, _child: NodeId) -> Result<()> {
        Ok(())
    }

    /// Native reparenting hook, run before the widget's tree-parent changes.
    /// Returning an error leaves the parent link untouched.
    fn on_reparenting(&mut self, _parent: Option<NodeId>) -> Result<()> {
        Ok(())
    }

    /// Persistence capability.
    fn as_persistable_mut(&mut self) -> Option<&mut dyn Persistable> {
        None
    }

    /// Dialog capability, queried on the top-level owner for default and
    /// cancel buttons.
    fn as_dialog(&self) -> Option<&dyn Dialogish> {
        None
    }

    /// Click capability.
    fn as_clickable_mut(&mut self) -> Option<&mut dyn Clickable> {
        None
    }
}

/// Convert widgets into boxed trait objects.
impl<W> From<W> for Box<dyn Widget>
where
    W: Widget + 'static,
{
    fn from(widget: W) -> Self {
        Box::new(widget)
    }
}

/// A top-level owner that exposes dialog-style default and cancel buttons.
pub trait Dialogish {
    /// Button clicked by the "accept" command.
    fn default_button(&self) -> Option<NodeId>;
    /// Button clicked by the "cancel" command.
    fn cancel_button(&self) -> Option<NodeId>;
}

/// A widget that can be clicked programmatically.
pub trait Clickable {
    /// Run every registered click handler.
    fn raise_clicked(&mut self);
}

/// Font description propagated through container subtrees.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Font {
    /// Family name.
    pub family: String,
    /// Size in points.
    pub point_size: u32,
    /// Bold weight.
    pub bold: bool,
    /// Italic style.
    pub italic: bool,
}

impl Font {
    /// A regular-weight font.
    pub fn new(family: &str, point_size: u32) -> Self {
        Self {
            family: family.to_string(),
            point_size,
            bold: false,
            italic: false,
        }
    }

    /// The bold variant of this font.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::new("sans-serif", 9)
    }
}

/// Where a property takes its value from.
#[derive(Debug, Clone, PartialEq)]
pub enum BindingSource {
    /// Names a field of the enclosing data binder's data source.
    Name(String),
    /// A fixed value.
    Literal(Value),
    /// Already resolved to a property of another widget.
    Widget {
        /// Source widget.
        node: NodeId,
        /// Property on the source widget.
        property: String,
    },
}

impl BindingSource {
    /// The data-source field this source names, if it is a plain name.
    pub fn field_name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(name),
            _ => None,
        }
    }
}

/// A named widget property.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Property {
    /// Current value.
    pub value: Value,
    /// Binding source, if the property is bound.
    pub source: Option<BindingSource>,
}

impl Property {
    /// An unbound property holding `value`.
    pub fn new(value: Value) -> Self {
        Self {
            value,
            source: None,
        }
    }

    /// A property bound to a data-source field.
    pub fn bound_to(field: &str) -> Self {
        Self {
            value: Value::Null,
            source: Some(BindingSource::Name(field.to_string())),
        }
    }

    /// A property whose source is a literal value.
    pub fn literal(value: Value) -> Self {
        Self {
            value: value.clone(),
            source: Some(BindingSource::Literal(value)),
        }
    }
}
