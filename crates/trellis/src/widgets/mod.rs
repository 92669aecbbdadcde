//! Concrete widget kinds used with the container core.

mod button;
mod composite;
mod dialog;
mod label;
mod spacer;

pub use button::PushButton;
pub use composite::Composite;
pub use dialog::Dialog;
pub use label::Label;
pub use spacer::Spacer;
