//! Actions triggered by menu and accelerator commands.

use std::{collections::HashMap, fmt};

use tracing::debug;

use crate::error::{Error, Result};

/// Handler run when an action triggers.
pub type TriggerFn = Box<dyn FnMut() + Send>;

/// A user-invokable command reachable by numeric identifier.
pub struct Action {
    /// Numeric identifier carried by command messages.
    id: u16,
    /// Display text.
    text: String,
    /// Whether the action is enabled.
    enabled: bool,
    /// Handlers run on trigger.
    triggered: Vec<TriggerFn>,
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("id", &self.id)
            .field("text", &self.text)
            .field("enabled", &self.enabled)
            .field("handlers", &self.triggered.len())
            .finish()
    }
}

impl Action {
    /// A new enabled action with the given display text.
    pub fn new(text: &str) -> Self {
        Self {
            id: 0,
            text: text.to_string(),
            enabled: true,
            triggered: Vec::new(),
        }
    }

    /// Add a trigger handler.
    pub fn on_triggered(mut self, f: impl FnMut() + Send + 'static) -> Self {
        self.triggered.push(Box::new(f));
        self
    }

    /// The identifier assigned at registration.
    pub fn id(&self) -> u16 {
        self.id
    }

    /// Display text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the action is enabled.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable the action.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Run every trigger handler.
    pub fn raise_triggered(&mut self) {
        for handler in &mut self.triggered {
            handler();
        }
    }
}

/// Registry mapping command identifiers to actions. One registry is shared
/// by every container of an application; it is handed to the `Core` at
/// startup and cleared at shutdown.
#[derive(Debug)]
pub struct ActionRegistry {
    /// Registered actions.
    actions: HashMap<u16, Action>,
    /// Next identifier to assign.
    next_id: u16,
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self {
            actions: HashMap::new(),
            next_id: FIRST_ACTION_ID,
        }
    }
}

/// Identifiers below this collide with IDOK and IDCANCEL.
const FIRST_ACTION_ID: u16 = 3;

impl ActionRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an action and return its assigned identifier. Identifiers
    /// already in use and those reserved for dialog commands are skipped.
    pub fn register(&mut self, mut action: Action) -> Result<u16> {
        let id = self.next_free_id()?;
        self.next_id = id.checked_add(1).unwrap_or(FIRST_ACTION_ID);
        action.id = id;
        debug!("registered action {:?} as {}", action.text, id);
        self.actions.insert(id, action);
        Ok(id)
    }

    /// The first unused identifier at or after `next_id`, wrapping past the
    /// reserved range.
    fn next_free_id(&self) -> Result<u16> {
        let first = u32::from(FIRST_ACTION_ID);
        let span = u32::from(u16::MAX) - first + 1;
        let start = u32::from(self.next_id.max(FIRST_ACTION_ID)) - first;
        (0..span)
            .filter_map(|step| u16::try_from(first + (start + step) % span).ok())
            .find(|id| !self.actions.contains_key(id))
            .ok_or_else(|| Error::Invalid("no free action identifiers".into()))
    }

    /// Register an action under a fixed identifier, replacing any action
    /// already stored there.
    pub fn register_with_id(&mut self, id: u16, mut action: Action) -> Option<Action> {
        action.id = id;
        self.actions.insert(id, action)
    }

    /// Look up an action.
    pub fn get(&self, id: u16) -> Option<&Action> {
        self.actions.get(&id)
    }

    /// Look up an action mutably.
    pub fn get_mut(&mut self, id: u16) -> Option<&mut Action> {
        self.actions.get_mut(&id)
    }

    /// Remove an action.
    pub fn remove(&mut self, id: u16) -> Option<Action> {
        self.actions.remove(&id)
    }

    /// Number of registered actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// True if no actions are registered.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Drop every registered action.
    pub fn clear(&mut self) {
        self.actions.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use super::*;
    use crate::message::{IDCANCEL, IDOK};

    #[test]
    fn register_assigns_distinct_ids() {
        let mut reg = ActionRegistry::new();
        let a = reg.register(Action::new("Open")).unwrap();
        let b = reg.register(Action::new("Save")).unwrap();
        assert_ne!(a, b);
        assert!(a > 2 && b > 2);
        assert_eq!(reg.get(a).map(Action::text), Some("Open"));
        assert_eq!(reg.get(b).map(Action::id), Some(b));
    }

    #[test]
    fn trigger_runs_handlers() {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        let mut reg = ActionRegistry::new();
        let id = reg
            .register(Action::new("Go").on_triggered(move || {
                h.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();
        if let Some(a) = reg.get_mut(id) {
            a.raise_triggered();
            a.raise_triggered();
        }
        assert_eq!(hits.load(Ordering::SeqCst), 2);
        reg.clear();
        assert!(reg.is_empty());
    }

    #[test]
    fn register_wraps_past_reserved_and_used_ids() {
        let mut reg = ActionRegistry::new();
        reg.register_with_id(u16::MAX, Action::new("Last"));
        reg.register_with_id(3, Action::new("First"));
        reg.next_id = u16::MAX;
        let id = reg.register(Action::new("Wrapped")).unwrap();
        assert_eq!(id, 4);
        assert_eq!(reg.get(u16::MAX).map(Action::text), Some("Last"));
        assert_eq!(reg.get(3).map(Action::text), Some("First"));
        assert_eq!(reg.get(IDOK), None);
        assert_eq!(reg.get(IDCANCEL), None);
        assert_eq!(reg.register(Action::new("Next")).unwrap(), 5);
    }

    #[test]
    fn register_fails_when_every_id_is_taken() {
        let mut reg = ActionRegistry::new();
        for id in FIRST_ACTION_ID..=u16::MAX {
            reg.register_with_id(id, Action::new("x"));
        }
        assert!(matches!(
            reg.register(Action::new("overflow")),
            Err(Error::Invalid(_))
        ));
        assert_eq!(reg.get(u16::MAX).map(Action::text), Some("x"));
    }
}
