use crate::{
    error::Result,
    geom::Expanse,
    layout::LayoutFlags,
    message::{Message, MessageResult},
    widget::{Clickable, Widget},
};

/// Command notification code for a click.
pub const BN_CLICKED: u16 = 0;

/// A push button. Click handlers run when the button is clicked by the
/// native layer or programmatically.
pub struct PushButton {
    /// Caption.
    text: String,
    /// Click handlers.
    clicked: Vec<Box<dyn FnMut() + Send>>,
}

impl PushButton {
    /// A button with the given caption and no handlers.
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            clicked: Vec::new(),
        }
    }

    /// Add a click handler.
    pub fn on_clicked(mut self, f: impl FnMut() + Send + 'static) -> Self {
        self.clicked.push(Box::new(f));
        self
    }

    /// Caption.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Clickable for PushButton {
    fn raise_clicked(&mut self) {
        for f in &mut self.clicked {
            f();
        }
    }
}

impl Widget for PushButton {
    fn size_hint(&self) -> Option<Expanse> {
        Some(Expanse::new(75, 23))
    }

    fn min_size_hint(&self) -> Expanse {
        Expanse::new(75, 23)
    }

    fn layout_flags(&self) -> LayoutFlags {
        LayoutFlags::GROWABLE_HORZ
    }

    fn handle_message(&mut self, msg: &Message) -> Result<MessageResult> {
        match msg {
            Message::Command {
                code: BN_CLICKED,
                control: Some(_),
                ..
            } => {
                self.raise_clicked();
                Ok(MessageResult::handled(0))
            }
            _ => Ok(MessageResult::default()),
        }
    }

    fn as_clickable_mut(&mut self) -> Option<&mut dyn Clickable> {
        Some(self)
    }
}
