//! Helpers for exercising containers in tests: a shared event log, a layout
//! that records its passes, and probe widgets.

use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;
use tracing::Level;

use crate::{
    binder::ErrorPresenter,
    error::{Error, Result},
    geom::Expanse,
    id::NodeId,
    layout::{Layout, LayoutFlags, Margins},
    message::{Message, MessageResult},
    persist::{Persistable, Settings},
    state::NodeName,
    widget::Widget,
    world::Core,
};

/// Install a fmt subscriber writing through the test harness. Safe to call
/// from every test.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(Level::TRACE)
        .without_time()
        .compact()
        .try_init()
        .ok();
}

/// An append-only log shared between probes and the test body.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    /// Entries, oldest first.
    entries: Arc<Mutex<Vec<String>>>,
}

impl EventLog {
    /// An empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock the entries. A poisoned lock is recovered.
    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Append an entry.
    pub fn push(&self, entry: impl Into<String>) {
        self.lock().push(entry.into());
    }

    /// A copy of all entries.
    pub fn entries(&self) -> Vec<String> {
        self.lock().clone()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True if nothing has been logged.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.lock().clear();
    }
}

/// State shared between a [`RecordingLayout`] and its [`LayoutProbe`].
#[derive(Debug, Default)]
struct ProbeState {
    /// The layout's container reference.
    container: Option<NodeId>,
    /// Whether update passes fail.
    fail: bool,
    /// Minimum size reported.
    min_size: Expanse,
}

/// Observes a [`RecordingLayout`] after it has been handed to a container.
#[derive(Debug, Clone)]
pub struct LayoutProbe {
    /// Shared state.
    state: Arc<Mutex<ProbeState>>,
}

impl LayoutProbe {
    /// Lock the shared state.
    fn lock(&self) -> MutexGuard<'_, ProbeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// The layout's container reference.
    pub fn container(&self) -> Option<NodeId> {
        self.lock().container
    }

    /// Make subsequent update passes fail.
    pub fn fail_updates(&self, fail: bool) {
        self.lock().fail = fail;
    }

    /// Set the minimum size the layout reports.
    pub fn set_min_size(&self, size: Expanse) {
        self.lock().min_size = size;
    }
}

/// A layout that logs `label:update(reset)` for every pass and positions
/// nothing.
#[derive(Debug)]
pub struct RecordingLayout {
    /// Prefix for log entries.
    label: String,
    /// Destination for log entries.
    log: EventLog,
    /// Shared with the probe.
    state: Arc<Mutex<ProbeState>>,
    /// Stored margins.
    margins: Margins,
    /// Stored spacing.
    spacing: u32,
}

impl RecordingLayout {
    /// A layout and a probe observing it.
    pub fn new(label: &str, log: &EventLog) -> (Self, LayoutProbe) {
        let state = Arc::new(Mutex::new(ProbeState::default()));
        (
            Self {
                label: label.to_string(),
                log: log.clone(),
                state: state.clone(),
                margins: Margins::default(),
                spacing: 0,
            },
            LayoutProbe { state },
        )
    }

    /// Lock the shared state.
    fn lock(&self) -> MutexGuard<'_, ProbeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Layout for RecordingLayout {
    fn container(&self) -> Option<NodeId> {
        self.lock().container
    }

    fn set_container(&mut self, container: Option<NodeId>) {
        self.lock().container = container;
    }

    fn margins(&self) -> Margins {
        self.margins
    }

    fn set_margins(&mut self, margins: Margins) -> Result<()> {
        self.margins = margins;
        Ok(())
    }

    fn spacing(&self) -> u32 {
        self.spacing
    }

    fn set_spacing(&mut self, spacing: u32) -> Result<()> {
        self.spacing = spacing;
        Ok(())
    }

    fn layout_flags(&self, _core: &Core) -> LayoutFlags {
        LayoutFlags::empty()
    }

    fn min_size(&self, _core: &Core) -> Expanse {
        self.lock().min_size
    }

    fn update(&mut self, _core: &mut Core, reset: bool) -> Result<()> {
        self.log.push(format!("{}:update({})", self.label, reset));
        if self.lock().fail {
            return Err(Error::Layout(format!("{}: injected failure", self.label)));
        }
        Ok(())
    }
}

/// A leaf widget with persisted state. Saving writes its value under its
/// settings key; restoring reads it back.
pub struct PersistProbe {
    /// Widget name.
    name: NodeName,
    /// Destination for log entries.
    log: EventLog,
    /// Persistence flag.
    persistent: bool,
    /// Whether save and restore fail.
    fail: bool,
    /// The state being persisted.
    pub value: Value,
}

impl PersistProbe {
    /// A persistent probe.
    pub fn new(name: &str, log: &EventLog) -> Self {
        Self {
            name: NodeName::convert(name),
            log: log.clone(),
            persistent: true,
            fail: false,
            value: Value::Null,
        }
    }

    /// Builder: make save and restore fail.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Builder: initial value.
    pub fn with_value(mut self, value: Value) -> Self {
        self.value = value;
        self
    }

    /// Builder: persistence flag.
    pub fn with_persistent(mut self, persistent: bool) -> Self {
        self.persistent = persistent;
        self
    }
}

impl Persistable for PersistProbe {
    fn persistent(&self) -> bool {
        self.persistent
    }

    fn set_persistent(&mut self, value: bool) {
        self.persistent = value;
    }

    fn save_state(&mut self, key: &str, settings: &mut dyn Settings) -> Result<()> {
        self.log.push(format!("{}:save({key})", self.name));
        if self.fail {
            return Err(Error::Persist(format!("{}: save failed", self.name)));
        }
        settings.put(key, self.value.clone())
    }

    fn restore_state(&mut self, key: &str, settings: &dyn Settings) -> Result<()> {
        self.log.push(format!("{}:restore({key})", self.name));
        if self.fail {
            return Err(Error::Persist(format!("{}: restore failed", self.name)));
        }
        if let Some(v) = settings.get(key) {
            self.value = v.clone();
        }
        Ok(())
    }
}

impl Widget for PersistProbe {
    fn name(&self) -> NodeName {
        self.name.clone()
    }

    fn as_persistable_mut(&mut self) -> Option<&mut dyn Persistable> {
        Some(self)
    }
}

/// A widget that logs every message it handles and answers with a fixed
/// result. Built as a container or as a leaf.
pub struct MessageProbe {
    /// Widget name.
    name: NodeName,
    /// Destination for log entries.
    log: EventLog,
    /// Result returned for every message.
    result: MessageResult,
    /// Whether nodes of this probe are containers.
    container: bool,
}

impl MessageProbe {
    /// A leaf probe.
    pub fn leaf(name: &str, log: &EventLog) -> Self {
        Self {
            name: NodeName::convert(name),
            log: log.clone(),
            result: MessageResult::default(),
            container: false,
        }
    }

    /// A container probe.
    pub fn container(name: &str, log: &EventLog) -> Self {
        Self {
            container: true,
            ..Self::leaf(name, log)
        }
    }

    /// Builder: the result returned for every message.
    pub fn answering(mut self, result: MessageResult) -> Self {
        self.result = result;
        self
    }
}

impl Widget for MessageProbe {
    fn name(&self) -> NodeName {
        self.name.clone()
    }

    fn is_container(&self) -> bool {
        self.container
    }

    fn handle_message(&mut self, msg: &Message) -> Result<MessageResult> {
        self.log.push(format!("{}:{:?}", self.name, msg));
        Ok(self.result)
    }
}

/// A widget that refuses structural changes. As a container it vetoes every
/// child insertion; as a pinned leaf it cannot be detached.
pub struct Refusing {
    /// Widget name.
    name: NodeName,
    /// Whether nodes of this widget are containers.
    container: bool,
    /// Whether reparenting fails.
    pinned: bool,
}

impl Refusing {
    /// A container that vetoes every insertion.
    pub fn container(name: &str) -> Self {
        Self {
            name: NodeName::convert(name),
            container: true,
            pinned: false,
        }
    }

    /// A leaf whose detach always fails.
    pub fn pinned(name: &str) -> Self {
        Self {
            name: NodeName::convert(name),
            container: false,
            pinned: true,
        }
    }
}

impl Widget for Refusing {
    fn name(&self) -> NodeName {
        self.name.clone()
    }

    fn is_container(&self) -> bool {
        self.container
    }

    fn on_inserting_child(&mut self, _index: usize, child: NodeId) -> Result<()> {
        Err(Error::Invalid(format!("{} refuses {child:?}", self.name)))
    }

    fn on_reparenting(&mut self, parent: Option<NodeId>) -> Result<()> {
        if self.pinned && parent.is_none() {
            return Err(Error::Native(format!("{}: SetParent failed", self.name)));
        }
        Ok(())
    }
}

/// An error presenter that logs every failure it is handed.
#[derive(Debug, Clone)]
pub struct RecordingPresenter {
    /// Destination for log entries.
    log: EventLog,
}

impl RecordingPresenter {
    /// A presenter writing to `log`.
    pub fn new(log: &EventLog) -> Self {
        Self { log: log.clone() }
    }
}

impl ErrorPresenter for RecordingPresenter {
    fn present(&mut self, widget: NodeId, error: &Error) {
        self.log.push(format!("present {widget:?}: {error}"));
    }
}
