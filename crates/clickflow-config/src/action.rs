use serde::{Deserialize, Serialize};

use crate::config::ActionConfig;
use crate::kind::ActionKind;

/// One step of a button workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
  /// Opaque id, unique within its workflow.
  pub id: String,
  #[serde(rename = "type")]
  pub kind: ActionKind,
  #[serde(default)]
  pub config: ActionConfig,
}

impl Action {
  /// Create an action with a freshly generated id and an empty config.
  pub fn new(kind: ActionKind) -> Self {
    Self {
      id: format!("action-{}", uuid::Uuid::new_v4().simple()),
      kind,
      config: ActionConfig::new(),
    }
  }

  /// Set the config, builder style.
  pub fn with_config(mut self, config: ActionConfig) -> Self {
    self.config = config;
    self
  }

  /// One-line description used by the workflow preview.
  pub fn describe(&self) -> String {
    let config = &self.config;
    match &self.kind {
      ActionKind::Alert => format!("Show alert: \"{}\"", config.text_or("message", "Alert!")),
      ActionKind::ShowText => {
        format!("Display text: \"{}\"", config.text_or("text", "Text content"))
      }
      ActionKind::ShowImage => match config.text("url") {
        Some(url) => format!("Show image from {url}"),
        None => "Show image".to_string(),
      },
      ActionKind::RefreshPage => "Refresh the page".to_string(),
      ActionKind::SetLocalStorage => format!(
        "Save to localStorage: {} = {}",
        config.text_or("key", "key"),
        config.text_or("value", "value")
      ),
      ActionKind::GetLocalStorage => {
        format!("Get from localStorage: {}", config.text_or("key", "key"))
      }
      ActionKind::IncreaseButtonSize => "Make button larger".to_string(),
      ActionKind::CloseWindow => "Attempt to close window".to_string(),
      ActionKind::PromptAndShow => format!(
        "Ask user: \"{}\"",
        config.text_or("promptMessage", "Enter value")
      ),
      ActionKind::ChangeButtonColor => match config.text("color") {
        Some(color) => format!("Change button color to {color}"),
        None => "Change button color randomly".to_string(),
      },
      ActionKind::DisableButton => "Disable the button".to_string(),
      ActionKind::Other(tag) => tag.clone(),
    }
  }
}
