//! Data binding between a data source and the widgets of a container.

use std::fmt;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::{
    error::{Error, Result},
    id::NodeId,
    widget::{BindingSource, Property},
    world::Core,
};

/// A record of named fields that widgets can be bound to.
pub trait DataSource: Send {
    /// Current value of a field.
    fn field(&self, name: &str) -> Option<Value>;

    /// Store a new value for a field.
    fn set_field(&mut self, name: &str, value: Value) -> Result<()>;
}

impl DataSource for Map<String, Value> {
    fn field(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }

    fn set_field(&mut self, name: &str, value: Value) -> Result<()> {
        self.insert(name.to_string(), value);
        Ok(())
    }
}

/// Receives binding failures for display to the user.
pub trait ErrorPresenter: Send {
    /// Report `error` for the widget `widget`.
    fn present(&mut self, widget: NodeId, error: &Error);
}

/// Connects a data source to the widgets whose properties name its fields.
#[derive(Default)]
pub struct DataBinder {
    /// Bound record.
    data_source: Option<Box<dyn DataSource>>,
    /// Failure sink.
    error_presenter: Option<Box<dyn ErrorPresenter>>,
    /// Widgets with at least one name-bound property, in traversal order.
    bound_widgets: Vec<NodeId>,
}

impl fmt::Debug for DataBinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataBinder")
            .field("data_source", &self.data_source.is_some())
            .field("error_presenter", &self.error_presenter.is_some())
            .field("bound_widgets", &self.bound_widgets)
            .finish()
    }
}

impl DataBinder {
    /// A binder with no data source.
    pub fn new() -> Self {
        Self::default()
    }

    /// The data source.
    pub fn data_source(&self) -> Option<&dyn DataSource> {
        self.data_source.as_deref()
    }

    /// Replace the data source.
    pub fn set_data_source(&mut self, source: Option<Box<dyn DataSource>>) {
        self.data_source = source;
    }

    /// Replace the error presenter.
    pub fn set_error_presenter(&mut self, presenter: Option<Box<dyn ErrorPresenter>>) {
        self.error_presenter = presenter;
    }

    /// True if an error presenter is set.
    pub fn has_error_presenter(&self) -> bool {
        self.error_presenter.is_some()
    }

    /// The bound widgets, in traversal order.
    pub fn bound_widgets(&self) -> &[NodeId] {
        &self.bound_widgets
    }

    /// Replace the complete bound-widget list.
    pub fn set_bound_widgets(&mut self, widgets: Vec<NodeId>) {
        self.bound_widgets = widgets;
    }

    /// Hand a failure to the presenter and return it.
    fn fail(&mut self, widget: NodeId, error: Error) -> Error {
        match self.error_presenter.as_mut() {
            Some(p) => p.present(widget, &error),
            None => warn!("binding failed for {:?}: {}", widget, error),
        }
        error
    }

    /// Copy data-source fields into the name-bound properties of every bound
    /// widget. Widgets that no longer exist are skipped.
    pub fn reset(&mut self, core: &mut Core) -> Result<()> {
        let Some(source) = self.data_source.as_ref() else {
            return Ok(());
        };
        let mut updates = Vec::new();
        let mut missing = None;
        for w in &self.bound_widgets {
            let Some(node) = core.node(*w) else {
                continue;
            };
            for (prop, field) in name_bound(node.properties()) {
                match source.field(&field) {
                    Some(value) => updates.push((*w, prop, value)),
                    None => {
                        missing = Some((*w, field));
                        break;
                    }
                }
            }
            if missing.is_some() {
                break;
            }
        }
        if let Some((w, field)) = missing {
            return Err(self.fail(w, Error::Binding(format!("no field named {field:?}"))));
        }
        debug!("reset {} bound properties", updates.len());
        for (w, prop, value) in updates {
            core.set_property_value(w, &prop, value)?;
        }
        Ok(())
    }

    /// Copy the name-bound property values of every bound widget back into
    /// the data source. Stops at the first failure.
    pub fn submit(&mut self, core: &Core) -> Result<()> {
        if self.data_source.is_none() {
            return Ok(());
        }
        let mut values = Vec::new();
        for w in &self.bound_widgets {
            let Some(node) = core.node(*w) else {
                continue;
            };
            for (prop, field) in name_bound(node.properties()) {
                if let Some(p) = node.properties().get(&prop) {
                    values.push((*w, field, p.value.clone()));
                }
            }
        }
        for (w, field, value) in values {
            let result = match self.data_source.as_mut() {
                Some(source) => source.set_field(&field, value),
                None => Ok(()),
            };
            if let Err(e) = result {
                return Err(self.fail(w, e));
            }
        }
        Ok(())
    }
}

/// `(property, field)` pairs for every property bound to a field by name.
fn name_bound<'a>(
    properties: impl IntoIterator<Item = (&'a String, &'a Property)>,
) -> Vec<(String, String)> {
    properties
        .into_iter()
        .filter_map(|(name, p)| {
            p.source
                .as_ref()
                .and_then(BindingSource::field_name)
                .map(|field| (name.clone(), field.to_string()))
        })
        .collect()
}

/// Declarative description of a data binder.
#[derive(Default)]
pub struct DataBinderConfig {
    /// Record to bind to. No binder is created without one.
    pub data_source: Option<Box<dyn DataSource>>,
    /// Failure sink.
    pub error_presenter: Option<Box<dyn ErrorPresenter>>,
}

impl DataBinderConfig {
    /// Build the binder. Returns `None` when there is no data source.
    pub fn create(self) -> Result<Option<DataBinder>> {
        let Some(source) = self.data_source else {
            return Ok(None);
        };
        let mut binder = DataBinder::new();
        if let Some(presenter) = self.error_presenter {
            binder.set_error_presenter(Some(presenter));
        }
        binder.set_data_source(Some(source));
        Ok(Some(binder))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn config_without_source_creates_nothing() -> Result<()> {
        assert!(DataBinderConfig::default().create()?.is_none());
        Ok(())
    }

    #[test]
    fn config_with_source_creates_configured_binder() -> Result<()> {
        let mut record = Map::new();
        record.insert("name".into(), json!("Ada"));
        let binder = DataBinderConfig {
            data_source: Some(Box::new(record)),
            error_presenter: None,
        }
        .create()?
        .ok_or(Error::Invalid("no binder".into()))?;
        assert_eq!(
            binder.data_source().and_then(|s| s.field("name")),
            Some(json!("Ada"))
        );
        assert!(!binder.has_error_presenter());
        assert!(binder.bound_widgets().is_empty());
        Ok(())
    }

    #[test]
    fn map_source_sets_fields() -> Result<()> {
        let mut record = Map::new();
        record.set_field("age", json!(36))?;
        assert_eq!(record.field("age"), Some(json!(36)));
        assert_eq!(record.field("missing"), None);
        Ok(())
    }
}
