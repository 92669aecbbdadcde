use crate::{geom::Expanse, layout::LayoutFlags, widget::Widget};

/// Static text.
pub struct Label {
    /// Displayed text.
    text: String,
    /// Preferred size, if fixed.
    hint: Option<Expanse>,
    /// Minimum size.
    min: Expanse,
    /// Flags reported to the parent layout.
    flags: LayoutFlags,
}

impl Label {
    /// A label with no fixed size hint.
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            hint: None,
            min: Expanse::default(),
            flags: LayoutFlags::empty(),
        }
    }

    /// Builder: preferred size.
    pub fn with_size_hint(mut self, w: u32, h: u32) -> Self {
        self.hint = Some(Expanse::new(w, h));
        self
    }

    /// Builder: minimum size.
    pub fn with_min_size(mut self, w: u32, h: u32) -> Self {
        self.min = Expanse::new(w, h);
        self
    }

    /// Builder: layout flags.
    pub fn with_flags(mut self, flags: LayoutFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Displayed text.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Widget for Label {
    fn size_hint(&self) -> Option<Expanse> {
        self.hint
    }

    fn min_size_hint(&self) -> Expanse {
        self.min
    }

    fn layout_flags(&self) -> LayoutFlags {
        self.flags
    }
}
