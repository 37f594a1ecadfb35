//! Widget configuration.
//!
//! Precedence, lowest to highest: built-in defaults, per-element data
//! overrides, explicit caller options.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::binding::Binding;
use crate::controller::SelectList;

pub const DEFAULT_CONTAINER_TAG: &str = "ul";
pub const DEFAULT_CONTAINER_CLASS: &str = "select2list";
pub const DEFAULT_ITEM_TAG: &str = "li";
pub const DEFAULT_ITEM_CLASS: &str = "select2list-option";
pub const DEFAULT_VALUE_BINDING_KEY: &str = "select2list-value";

/// Configuration error type.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Structural configuration captured when a widget is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    /// Tag of the generated list element
    pub container_tag: String,
    /// Class of the generated list element
    pub container_class: String,
    /// Tag of each generated item
    pub item_tag: String,
    /// Class of each generated item
    pub item_class: String,
    /// Data key each item stores its option value under
    pub value_binding_key: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            container_tag: DEFAULT_CONTAINER_TAG.to_string(),
            container_class: DEFAULT_CONTAINER_CLASS.to_string(),
            item_tag: DEFAULT_ITEM_TAG.to_string(),
            item_class: DEFAULT_ITEM_CLASS.to_string(),
            value_binding_key: DEFAULT_VALUE_BINDING_KEY.to_string(),
        }
    }
}

/// Partial configuration. Unset fields fall through to the next layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigOverrides {
    pub container_tag: Option<String>,
    pub container_class: Option<String>,
    pub item_tag: Option<String>,
    pub item_class: Option<String>,
    pub value_binding_key: Option<String>,
}

impl ConfigOverrides {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Decode overrides from an element's data entries.
    ///
    /// Keys may be camelCase (`itemTag`) or kebab-case (`item-tag`); entries
    /// that are not configuration keys are ignored.
    pub fn from_data(data: &BTreeMap<String, String>) -> Result<Self, ConfigError> {
        let object = data
            .iter()
            .map(|(key, value)| (camel_case(key), Value::String(value.clone())))
            .collect();
        Ok(serde_json::from_value(Value::Object(object))?)
    }

    /// Fill unset fields from `fallback`. Fields set on `self` win.
    pub fn or(self, fallback: ConfigOverrides) -> Self {
        Self {
            container_tag: self.container_tag.or(fallback.container_tag),
            container_class: self.container_class.or(fallback.container_class),
            item_tag: self.item_tag.or(fallback.item_tag),
            item_class: self.item_class.or(fallback.item_class),
            value_binding_key: self.value_binding_key.or(fallback.value_binding_key),
        }
    }

    /// Resolve against a complete configuration.
    pub fn apply(self, base: WidgetConfig) -> WidgetConfig {
        WidgetConfig {
            container_tag: self.container_tag.unwrap_or(base.container_tag),
            container_class: self.container_class.unwrap_or(base.container_class),
            item_tag: self.item_tag.unwrap_or(base.item_tag),
            item_class: self.item_class.unwrap_or(base.item_class),
            value_binding_key: self.value_binding_key.unwrap_or(base.value_binding_key),
        }
    }
}

fn camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper = false;
    for c in key.chars() {
        if c == '-' {
            upper = !out.is_empty();
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Called after an accepted selection with the widget, the new value and its
/// label.
pub type ChangeCallback<B> = Rc<dyn Fn(&SelectList<B>, &str, &str)>;

/// Caller-supplied construction options.
pub struct Options<B: Binding> {
    pub overrides: ConfigOverrides,
    pub on_change: Option<ChangeCallback<B>>,
}

impl<B: Binding> Default for Options<B> {
    fn default() -> Self {
        Self {
            overrides: ConfigOverrides::default(),
            on_change: None,
        }
    }
}

impl<B: Binding> Clone for Options<B> {
    fn clone(&self) -> Self {
        Self {
            overrides: self.overrides.clone(),
            on_change: self.on_change.clone(),
        }
    }
}

impl<B: Binding> fmt::Debug for Options<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("overrides", &self.overrides)
            .field("on_change", &self.on_change.is_some())
            .finish()
    }
}

impl<B: Binding> Options<B> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn overrides(mut self, overrides: ConfigOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn container_tag(mut self, tag: impl Into<String>) -> Self {
        self.overrides.container_tag = Some(tag.into());
        self
    }

    pub fn container_class(mut self, class: impl Into<String>) -> Self {
        self.overrides.container_class = Some(class.into());
        self
    }

    pub fn item_tag(mut self, tag: impl Into<String>) -> Self {
        self.overrides.item_tag = Some(tag.into());
        self
    }

    pub fn item_class(mut self, class: impl Into<String>) -> Self {
        self.overrides.item_class = Some(class.into());
        self
    }

    pub fn value_binding_key(mut self, key: impl Into<String>) -> Self {
        self.overrides.value_binding_key = Some(key.into());
        self
    }

    pub fn on_change(mut self, callback: impl Fn(&SelectList<B>, &str, &str) + 'static) -> Self {
        self.on_change = Some(Rc::new(callback));
        self
    }

    /// Resolve the final configuration for an element carrying `data`
    /// overrides. Explicit options win over element data.
    pub fn resolve(&self, data: ConfigOverrides) -> WidgetConfig {
        self.overrides
            .clone()
            .or(data)
            .apply(WidgetConfig::default())
    }
}
