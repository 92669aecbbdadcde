//! Window messages routed through containers.

use crate::{geom::Expanse, id::Handle};

/// Client area size changed.
pub const WM_SIZE: u32 = 0x0005;
/// Notification from a common control.
pub const WM_NOTIFY: u32 = 0x004E;
/// Command from a menu, accelerator or control.
pub const WM_COMMAND: u32 = 0x0111;
/// Window is being resized interactively.
pub const WM_SIZING: u32 = 0x0214;

/// "Accept" command identifier.
pub const IDOK: u16 = 1;
/// "Cancel" command identifier.
pub const IDCANCEL: u16 = 2;

/// Command notification code for menu items.
pub const CMD_MENU: u16 = 0;
/// Command notification code for accelerators.
pub const CMD_ACCELERATOR: u16 = 1;

/// `WM_SIZE` kind for a plain resize.
pub const SIZE_RESTORED: u32 = 0;

/// Low 16 bits of a message parameter.
#[inline]
pub fn loword(v: usize) -> u16 {
    (v & 0xFFFF) as u16
}

/// Bits 16..32 of a message parameter.
#[inline]
pub fn hiword(v: usize) -> u16 {
    ((v >> 16) & 0xFFFF) as u16
}

/// Pack two words into a message parameter.
#[inline]
pub fn makelong(lo: u16, hi: u16) -> usize {
    (lo as usize) | ((hi as usize) << 16)
}

/// Header shared by every control notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotifyHeader {
    /// Handle of the control sending the notification.
    pub from: Handle,
    /// Identifier of the control.
    pub id: usize,
    /// Notification code.
    pub code: i32,
}

/// A decoded window message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// A command. `control` is the originating control's handle, or `None`
    /// for menu and accelerator commands.
    Command {
        /// Command or control identifier.
        id: u16,
        /// Notification code.
        code: u16,
        /// Originating control.
        control: Option<Handle>,
    },
    /// A control notification.
    Notify(NotifyHeader),
    /// The client area was resized.
    Size {
        /// Resize kind.
        kind: u32,
        /// New client size.
        size: Expanse,
    },
    /// The window is being resized.
    Sizing {
        /// Edge being dragged.
        edge: u32,
    },
    /// Any other message.
    Other {
        /// Message identifier.
        msg: u32,
        /// First parameter.
        wparam: usize,
        /// Second parameter.
        lparam: isize,
    },
}

impl Message {
    /// Decode a raw message. `notify` is the header the native layer read
    /// from a `WM_NOTIFY` payload; a notify message without one decodes as
    /// [`Message::Other`].
    pub fn from_raw(msg: u32, wparam: usize, lparam: isize, notify: Option<NotifyHeader>) -> Self {
        match msg {
            WM_COMMAND => Self::Command {
                id: loword(wparam),
                code: hiword(wparam),
                control: (lparam != 0).then_some(Handle(lparam as u64)),
            },
            WM_NOTIFY => match notify {
                Some(header) => Self::Notify(header),
                None => Self::Other {
                    msg,
                    wparam,
                    lparam,
                },
            },
            WM_SIZE => Self::Size {
                kind: wparam as u32,
                size: Expanse::new(
                    loword(lparam as usize).into(),
                    hiword(lparam as usize).into(),
                ),
            },
            WM_SIZING => Self::Sizing {
                edge: wparam as u32,
            },
            _ => Self::Other {
                msg,
                wparam,
                lparam,
            },
        }
    }

    /// A menu command.
    pub fn menu(id: u16) -> Self {
        Self::Command {
            id,
            code: CMD_MENU,
            control: None,
        }
    }

    /// An accelerator command.
    pub fn accelerator(id: u16) -> Self {
        Self::Command {
            id,
            code: CMD_ACCELERATOR,
            control: None,
        }
    }

    /// A command sent by a control.
    pub fn control(id: u16, code: u16, control: Handle) -> Self {
        Self::Command {
            id,
            code,
            control: Some(control),
        }
    }

    /// A plain resize to `size`.
    pub fn size(size: Expanse) -> Self {
        Self::Size {
            kind: SIZE_RESTORED,
            size,
        }
    }
}

/// The outcome of message handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MessageResult {
    /// Value returned to the native layer.
    pub value: isize,
    /// True when the message was fully handled and dispatch stops.
    pub handled: bool,
}

impl MessageResult {
    /// A fully handled message.
    pub fn handled(value: isize) -> Self {
        Self {
            value,
            handled: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_without_control_decodes_as_menu() {
        let m = Message::from_raw(WM_COMMAND, makelong(42, CMD_MENU), 0, None);
        assert_eq!(m, Message::menu(42));
    }

    #[test]
    fn command_with_control_keeps_handle() {
        let m = Message::from_raw(WM_COMMAND, makelong(7, 3), 0x55, None);
        assert_eq!(m, Message::control(7, 3, Handle(0x55)));
    }

    #[test]
    fn size_unpacks_dimensions() {
        let lparam = makelong(640, 480) as isize;
        let m = Message::from_raw(WM_SIZE, 0, lparam, None);
        assert_eq!(m, Message::size(Expanse::new(640, 480)));
    }

    #[test]
    fn notify_without_header_is_other() {
        let m = Message::from_raw(WM_NOTIFY, 1, 2, None);
        assert!(matches!(m, Message::Other { msg: WM_NOTIFY, .. }));
    }
}
