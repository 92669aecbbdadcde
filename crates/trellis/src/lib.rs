#![allow(clippy::new_without_default)]
//! Container, layout and data-binding core for a desktop widget toolkit.
//!
//! Widgets live in a [`Core`] arena. Container widgets own an ordered child
//! collection, an optional [`Layout`] and an optional [`DataBinder`]; the
//! [`ContainerMut`] handle keeps tree-parent links consistent with
//! membership, runs layout passes when geometry changes, propagates
//! suspension, and routes window messages.

pub use trellis_geom as geom;

pub mod action;
pub mod binder;
pub mod children;
pub mod column;
pub mod container;
pub mod error;
pub mod id;
pub mod layout;
pub mod message;
pub mod node;
pub mod persist;
pub mod state;
pub mod widget;
pub mod widgets;
pub mod world;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Public exports
pub use action::{Action, ActionRegistry};
pub use binder::{DataBinder, DataBinderConfig, DataSource, ErrorPresenter};
pub use children::WidgetList;
pub use column::{Alignment, ColumnHost, TableViewColumn};
pub use container::{ContainerBase, ContainerMut};
pub use error::{Error, Result};
pub use id::{Handle, NodeId};
pub use layout::{BoxLayout, Layout, LayoutFlags, Margins, should_layout};
pub use message::{Message, MessageResult, NotifyHeader};
pub use node::Node;
pub use persist::{MemorySettings, Persistable, Settings};
pub use state::NodeName;
pub use widget::{BindingSource, Clickable, Dialogish, Font, Property, Widget};
pub use world::{Core, Walk};

pub use geom::{Axis, Expanse, Point, Rect};
