//! Free-form action configuration.
//!
//! Config values are whatever the settings form stored: usually strings, but
//! any JSON scalar is accepted. Readers go through [`ActionConfig::text`],
//! which only reports *truthy* values. An empty string, `0`, `false` and
//! `null` all read as "not set", so the per-kind defaults apply to them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Configuration map of a single action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionConfig(BTreeMap<String, Value>);

impl ActionConfig {
  pub fn new() -> Self {
    Self::default()
  }

  /// Read a field as text if it is set to a truthy value.
  pub fn text(&self, key: &str) -> Option<String> {
    match self.0.get(key)? {
      Value::String(s) if !s.is_empty() => Some(s.clone()),
      Value::Number(n) if n.as_f64().is_some_and(|v| v != 0.0) => Some(n.to_string()),
      Value::Bool(true) => Some("true".to_string()),
      _ => None,
    }
  }

  /// Read a field as text, falling back to `default` when it is not set.
  pub fn text_or(&self, key: &str, default: &str) -> String {
    self.text(key).unwrap_or_else(|| default.to_string())
  }

  /// Raw access to a stored value.
  pub fn get(&self, key: &str) -> Option<&Value> {
    self.0.get(key)
  }

  /// Return a copy with `key` set to `value`.
  ///
  /// This is the field-level merge callers perform before handing the whole
  /// map to `Workflow::update_action_config`.
  pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
    self.0.insert(key.into(), value.into());
    self
  }

  /// Return a copy without `key`.
  pub fn without(mut self, key: &str) -> Self {
    self.0.remove(key);
    self
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
    self.0.iter()
  }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ActionConfig {
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    Self(
      iter
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect(),
    )
  }
}
