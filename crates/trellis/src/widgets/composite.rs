use crate::{state::NodeName, widget::Widget};

/// A plain container widget.
pub struct Composite {
    /// Name override.
    name: Option<NodeName>,
}

impl Default for Composite {
    fn default() -> Self {
        Self::new()
    }
}

impl Composite {
    /// An unnamed composite.
    pub fn new() -> Self {
        Self { name: None }
    }

    /// A composite with an explicit name, used in persistence keys.
    pub fn named(name: &str) -> Self {
        Self {
            name: Some(NodeName::convert(name)),
        }
    }
}

impl Widget for Composite {
    fn name(&self) -> NodeName {
        self.name
            .clone()
            .unwrap_or_else(|| NodeName::convert("composite"))
    }

    fn is_container(&self) -> bool {
        true
    }
}
