//! Container state and the mutable container handle.
//!
//! A container owns an ordered child collection, at most one layout and at
//! most one data binder. The [`ContainerMut`] handle drives layout updates on
//! size, membership and suspend/resume transitions, attaches data binders,
//! saves and restores persisted state, and routes window messages.

use tracing::{debug, trace, warn};

use crate::{
    binder::DataBinder,
    children::WidgetList,
    error::{Error, Result},
    geom::Expanse,
    id::NodeId,
    layout::{Layout, LayoutFlags},
    message::{CMD_ACCELERATOR, CMD_MENU, IDCANCEL, IDOK, Message, MessageResult},
    node::Node,
    persist::Settings,
    widget::{BindingSource, Font},
    world::{Core, Walk},
};

/// State carried by every container-kind widget.
pub struct ContainerBase {
    /// Attached layout. `None` while no layout is attached, or while the
    /// layout is checked out for a pass.
    pub(crate) layout: Option<Box<dyn Layout>>,
    /// True while the layout is checked out for a pass.
    layout_busy: bool,
    /// Bumped whenever the layout slot is replaced.
    layout_epoch: u64,
    /// Child collection.
    pub(crate) children: WidgetList,
    /// Attached data binder.
    data_binder: Option<DataBinder>,
    /// Whether this container takes part in state save/restore.
    persistent: bool,
}

impl Default for ContainerBase {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerBase {
    /// Empty container state.
    pub fn new() -> Self {
        Self {
            layout: None,
            layout_busy: false,
            layout_epoch: 0,
            children: WidgetList::new(),
            data_binder: None,
            persistent: false,
        }
    }

    /// The child collection.
    pub fn children(&self) -> &WidgetList {
        &self.children
    }

    /// The attached layout.
    pub fn layout(&self) -> Option<&dyn Layout> {
        self.layout.as_deref()
    }

    /// The attached data binder.
    pub fn data_binder(&self) -> Option<&DataBinder> {
        self.data_binder.as_ref()
    }

    /// Persistence flag.
    pub fn persistent(&self) -> bool {
        self.persistent
    }

    /// No flags without a layout, otherwise the layout's flags.
    pub fn layout_flags(&self, core: &Core) -> LayoutFlags {
        self.layout
            .as_ref()
            .map_or(LayoutFlags::empty(), |l| l.layout_flags(core))
    }

    /// Zero without a layout, otherwise the layout's minimum size.
    pub fn min_size_hint(&self, core: &Core) -> Expanse {
        self.layout
            .as_ref()
            .map_or(Expanse::default(), |l| l.min_size(core))
    }

    /// Break the associations with the attached layout and data binder and
    /// drop them.
    pub(crate) fn release(&mut self) {
        if let Some(mut layout) = self.layout.take() {
            layout.set_container(None);
        }
        if let Some(mut binder) = self.data_binder.take() {
            binder.set_bound_widgets(Vec::new());
        }
        self.layout_epoch += 1;
    }
}

/// A mutable handle on one container in the arena.
pub struct ContainerMut<'a> {
    /// The arena.
    pub(crate) core: &'a mut Core,
    /// The container.
    pub(crate) id: NodeId,
}

impl<'a> ContainerMut<'a> {
    /// Wrap a node known to be a container.
    pub(crate) fn new(core: &'a mut Core, id: NodeId) -> Self {
        Self { core, id }
    }

    /// The container's node id.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The arena.
    pub fn core(&self) -> &Core {
        &*self.core
    }

    /// Container state.
    fn base(&self) -> Result<&ContainerBase> {
        self.core.base(self.id)
    }

    /// Container state, mutably.
    pub(crate) fn base_mut(&mut self) -> Result<&mut ContainerBase> {
        self.core.base_mut(self.id)
    }

    /// The child collection.
    pub fn children(&self) -> &[NodeId] {
        self.core.children(self.id)
    }

    /// The attached layout.
    pub fn layout(&self) -> Option<&dyn Layout> {
        self.core.layout(self.id)
    }

    /// Attach a layout, or detach the current one with `None`, returning the
    /// layout previously attached. The old layout's container reference is
    /// cleared before the new layout is installed.
    pub fn set_layout(&mut self, layout: Option<Box<dyn Layout>>) -> Result<Option<Box<dyn Layout>>> {
        let id = self.id;
        let base = self.base_mut()?;
        if base.layout.is_none() && layout.is_none() && !base.layout_busy {
            return Ok(None);
        }
        let mut old = base.layout.take();
        if let Some(old) = old.as_mut() {
            old.set_container(None);
        }
        if let Some(mut new) = layout {
            if new.container() != Some(id) {
                new.set_container(Some(id));
            }
            base.layout = Some(new);
        }
        base.layout_epoch += 1;
        debug!("layout of {:?} replaced", id);
        Ok(old)
    }

    /// Run a pass of the attached layout. Does nothing without a layout.
    pub fn update_layout(&mut self, reset: bool) -> Result<()> {
        let id = self.id;
        let base = self.base_mut()?;
        if base.layout_busy {
            return Err(Error::ReentrantLayout(id));
        }
        let Some(mut layout) = base.layout.take() else {
            return Ok(());
        };
        base.layout_busy = true;
        let epoch = base.layout_epoch;
        trace!("update layout of {:?} (reset={})", id, reset);

        let result = layout.update(self.core, reset);

        match self.core.base_mut(id) {
            Ok(base) => {
                base.layout_busy = false;
                if base.layout_epoch == epoch {
                    base.layout = Some(layout);
                } else {
                    layout.set_container(None);
                }
            }
            Err(_) => layout.set_container(None),
        }
        result
    }

    /// The attached data binder.
    pub fn data_binder(&self) -> Option<&DataBinder> {
        self.core.data_binder(self.id)
    }

    /// Attach a data binder, or detach the current one with `None`,
    /// returning the binder previously attached with its bound list emptied.
    /// A new binder receives the complete list of bindable descendants.
    pub fn set_data_binder(&mut self, binder: Option<DataBinder>) -> Result<Option<DataBinder>> {
        let base = self.base_mut()?;
        if base.data_binder.is_none() && binder.is_none() {
            return Ok(None);
        }
        let mut old = base.data_binder.take();
        if let Some(old) = old.as_mut() {
            old.set_bound_widgets(Vec::new());
        }
        if let Some(mut binder) = binder {
            let bound = self.bindable_descendants();
            debug!("data binder of {:?} bound to {} widgets", self.id, bound.len());
            binder.set_bound_widgets(bound);
            self.base_mut()?.data_binder = Some(binder);
        }
        Ok(old)
    }

    /// Descendants with at least one property bound to a data-source field,
    /// in traversal order. Nested containers that own a data binder are
    /// excluded along with their subtrees.
    fn bindable_descendants(&self) -> Vec<NodeId> {
        let own = self.core.handle_of(self.id);
        let mut bound = Vec::new();
        self.core.walk(self.id, &mut |core, w| {
            if core.handle_of(w) == own {
                return Walk::Continue;
            }
            if core.data_binder(w).is_some() {
                return Walk::Skip;
            }
            let names_a_field = core.node(w).is_some_and(|n| {
                n.properties()
                    .values()
                    .any(|p| p.source.as_ref().and_then(BindingSource::field_name).is_some())
            });
            if names_a_field {
                bound.push(w);
            }
            Walk::Continue
        });
        bound
    }

    /// Run `f` with the data binder checked out of its slot.
    fn with_binder(
        &mut self,
        f: impl FnOnce(&mut DataBinder, &mut Core) -> Result<()>,
    ) -> Result<()> {
        let Some(mut binder) = self.base_mut()?.data_binder.take() else {
            return Ok(());
        };
        let result = f(&mut binder, self.core);
        if let Ok(base) = self.core.base_mut(self.id)
            && base.data_binder.is_none()
        {
            base.data_binder = Some(binder);
        }
        result
    }

    /// Copy data-source values into the bound widgets' properties.
    pub fn reset_bindings(&mut self) -> Result<()> {
        self.with_binder(|binder, core| binder.reset(core))
    }

    /// Copy the bound widgets' property values back into the data source.
    pub fn submit_bindings(&mut self) -> Result<()> {
        self.with_binder(|binder, core| binder.submit(core))
    }

    /// Persistence flag.
    pub fn persistent(&self) -> bool {
        self.base().is_ok_and(ContainerBase::persistent)
    }

    /// Set the persistence flag.
    pub fn set_persistent(&mut self, persistent: bool) -> Result<()> {
        self.base_mut()?.persistent = persistent;
        Ok(())
    }

    /// Save the state of every persistent child, in order. Stops at the
    /// first failure.
    pub fn save_state(&mut self, settings: &mut dyn Settings) -> Result<()> {
        for child in self.children().to_vec() {
            if self.core.is_container(child) {
                if self.core.base(child)?.persistent() {
                    self.core.container_mut(child)?.save_state(settings)?;
                }
                continue;
            }
            let key = self.core.settings_key(child)?;
            self.core.with_widget_mut(child, |w, _| match w.as_persistable_mut() {
                Some(p) if p.persistent() => p.save_state(&key, settings),
                _ => Ok(()),
            })??;
        }
        Ok(())
    }

    /// Restore the state of every persistent child, in order. Stops at the
    /// first failure.
    pub fn restore_state(&mut self, settings: &dyn Settings) -> Result<()> {
        for child in self.children().to_vec() {
            if self.core.is_container(child) {
                if self.core.base(child)?.persistent() {
                    self.core.container_mut(child)?.restore_state(settings)?;
                }
                continue;
            }
            let key = self.core.settings_key(child)?;
            self.core.with_widget_mut(child, |w, _| match w.as_persistable_mut() {
                Some(p) if p.persistent() => p.restore_state(&key, settings),
                _ => Ok(()),
            })??;
        }
        Ok(())
    }

    /// Suspend or resume the container and every nested container. Resuming
    /// a suspended container with a layout runs one reset pass before the
    /// change reaches nested containers. Every container visited is marked
    /// for repaint.
    pub fn set_suspended(&mut self, suspend: bool) -> Result<()> {
        let id = self.id;
        let was = self.core.suspended(id);
        self.core.set_suspended_flag(id, suspend)?;
        if !suspend && was && self.layout().is_some() {
            self.update_layout(true)?;
        }
        self.core.walk_mut(id, &mut |core, w| {
            if !core.is_container(w) {
                return Ok(Walk::Skip);
            }
            core.invalidate(w)?;
            if w == id {
                return Ok(Walk::Continue);
            }
            core.container_mut(w)?.set_suspended(suspend)?;
            Ok(Walk::Skip)
        })
    }

    /// Enable or disable the container and every descendant.
    pub fn set_enabled(&mut self, enabled: bool) -> Result<()> {
        self.core.set_enabled(self.id, enabled)
    }

    /// Set the font of the container and every descendant.
    pub fn set_font(&mut self, font: &Font) -> Result<()> {
        self.core.set_font(self.id, font)
    }

    /// Route a window message.
    ///
    /// Commands from a control and notifications go to the widget that
    /// raised them. Menu and accelerator commands trigger the registered
    /// action; `IDOK` and `IDCANCEL` menu commands first click the top-level
    /// owner's default or cancel button. Size messages update the layout.
    /// Everything not fully handled here falls through to the container
    /// widget's own handling.
    pub fn handle_message(&mut self, msg: &Message) -> Result<MessageResult> {
        match *msg {
            Message::Command {
                id: cmd,
                code,
                control: None,
            } if code == CMD_MENU || code == CMD_ACCELERATOR => {
                if code == CMD_MENU && (cmd == IDOK || cmd == IDCANCEL) {
                    self.click_dialog_button(cmd)?;
                }
                if let Some(action) = self.core.actions_mut().get_mut(cmd) {
                    trace!("command {} triggers action {:?}", cmd, action.text());
                    action.raise_triggered();
                    return Ok(MessageResult::handled(0));
                }
            }
            Message::Command {
                control: Some(handle),
                ..
            } => {
                if let Some(target) = self.core.widget_from_handle(handle)
                    && target != self.id
                {
                    trace!("command from {} redispatched to {:?}", handle, target);
                    self.core.send_message(target, msg)?;
                    return Ok(MessageResult::handled(0));
                }
            }
            Message::Notify(header) => match self.core.widget_from_handle(header.from) {
                Some(target) if target != self.id => {
                    trace!("notify {} redispatched to {:?}", header.code, target);
                    return self.core.send_message(target, msg);
                }
                Some(_) => {}
                None => warn!("notify from unknown handle {}", header.from),
            },
            Message::Size { size, .. } => {
                self.core.record_client_size(self.id, size)?;
                self.update_layout(false)?;
            }
            Message::Sizing { .. } => self.update_layout(false)?,
            _ => {}
        }
        self.core.default_message(self.id, msg)
    }

    /// Click the top-level owner's default or cancel button if it is visible
    /// and enabled.
    fn click_dialog_button(&mut self, cmd: u16) -> Result<()> {
        let top = self.core.top_level(self.id)?;
        let button = self
            .core
            .node(top)
            .and_then(Node::widget)
            .and_then(|w| w.as_dialog())
            .and_then(|d| {
                if cmd == IDOK {
                    d.default_button()
                } else {
                    d.cancel_button()
                }
            });
        let Some(button) = button else {
            return Ok(());
        };
        if !self.core.visible(button) || !self.core.enabled(button) {
            trace!("button {:?} is not clickable", button);
            return Ok(());
        }
        self.core.with_widget_mut(button, |w, _| {
            if let Some(c) = w.as_clickable_mut() {
                c.raise_clicked();
            }
        })
    }
}
