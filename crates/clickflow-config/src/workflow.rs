use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::config::ActionConfig;
use crate::kind::ActionKind;

/// Label used when a workflow has none.
pub const DEFAULT_LABEL: &str = "Click Me!";

fn default_label() -> String {
  DEFAULT_LABEL.to_string()
}

/// A button label plus the ordered actions run when the button is clicked.
///
/// Edit operations take the workflow by value and return the edited one.
/// Operations that target a missing id or an out-of-range index return the
/// workflow unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
  #[serde(default = "default_label")]
  pub label: String,
  #[serde(default)]
  pub actions: Vec<Action>,
}

impl Default for Workflow {
  fn default() -> Self {
    Self {
      label: default_label(),
      actions: Vec::new(),
    }
  }
}

impl Workflow {
  pub fn new(label: impl Into<String>) -> Self {
    Self {
      label: label.into(),
      actions: Vec::new(),
    }
  }

  /// Append a new action of `kind` and return its id.
  pub fn add_action(mut self, kind: ActionKind) -> (Self, String) {
    let action = Action::new(kind);
    let id = action.id.clone();
    self.actions.push(action);
    (self, id)
  }

  pub fn remove_action(mut self, id: &str) -> Self {
    self.actions.retain(|action| action.id != id);
    self
  }

  /// Replace the config of the action with `id` wholesale.
  pub fn update_action_config(mut self, id: &str, config: ActionConfig) -> Self {
    if let Some(action) = self.actions.iter_mut().find(|a| a.id == id) {
      action.config = config;
    }
    self
  }

  /// Move the action at `from` to `to`.
  ///
  /// Both indices must be in `0..len`. Since the target is always below the
  /// original length, it never exceeds the shortened list during reinsertion.
  pub fn reorder(mut self, from: usize, to: usize) -> Self {
    let len = self.actions.len();
    if from >= len || to >= len || from == to {
      return self;
    }
    let action = self.actions.remove(from);
    self.actions.insert(to, action);
    self
  }

  pub fn set_label(mut self, label: impl Into<String>) -> Self {
    self.label = label.into();
    self
  }

  /// Remove every action, keeping the label.
  pub fn clear_actions(mut self) -> Self {
    self.actions.clear();
    self
  }

  /// Get an action by id.
  pub fn get_action(&self, id: &str) -> Option<&Action> {
    self.actions.iter().find(|a| a.id == id)
  }

  pub fn position(&self, id: &str) -> Option<usize> {
    self.actions.iter().position(|a| a.id == id)
  }

  pub fn is_empty(&self) -> bool {
    self.actions.is_empty()
  }
}
