use std::fmt;

use slotmap::new_key_type;

new_key_type! {
    /// Opaque identifier for a widget stored in the Core arena.
    pub struct NodeId;
}

/// Native window handle. Every widget is assigned a unique, non-zero handle
/// when it enters the arena; the `Core` keeps a handle-to-widget registry so
/// that messages naming a handle can be redispatched to the owning widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(pub u64);

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}
