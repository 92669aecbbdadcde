use crate::{
    id::NodeId,
    state::NodeName,
    widget::{Dialogish, Widget},
};

/// A top-level container with optional default and cancel buttons.
#[derive(Default)]
pub struct Dialog {
    /// Clicked on "accept".
    default_button: Option<NodeId>,
    /// Clicked on "cancel".
    cancel_button: Option<NodeId>,
}

impl Dialog {
    /// A dialog with no default or cancel button.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: the button clicked by the `IDOK` command.
    pub fn with_default_button(mut self, button: NodeId) -> Self {
        self.default_button = Some(button);
        self
    }

    /// Builder: the button clicked by the `IDCANCEL` command.
    pub fn with_cancel_button(mut self, button: NodeId) -> Self {
        self.cancel_button = Some(button);
        self
    }
}

impl Dialogish for Dialog {
    fn default_button(&self) -> Option<NodeId> {
        self.default_button
    }

    fn cancel_button(&self) -> Option<NodeId> {
        self.cancel_button
    }
}

impl Widget for Dialog {
    fn name(&self) -> NodeName {
        NodeName::convert("dialog")
    }

    fn is_container(&self) -> bool {
        true
    }

    fn as_dialog(&self) -> Option<&dyn Dialogish> {
        Some(self)
    }
}
