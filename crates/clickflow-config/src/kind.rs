use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The kind of an action, serialized as its camelCase tag.
///
/// Tags that are not part of the catalogue are kept as [`ActionKind::Other`]
/// so a saved workflow round-trips unchanged and the executor can skip them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionKind {
  Alert,
  ShowText,
  ShowImage,
  RefreshPage,
  SetLocalStorage,
  GetLocalStorage,
  IncreaseButtonSize,
  CloseWindow,
  PromptAndShow,
  ChangeButtonColor,
  DisableButton,
  Other(String),
}

/// A field offered by the settings form of an action kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigField {
  /// Key in the action's config map.
  pub key: &'static str,
  pub label: &'static str,
  pub placeholder: &'static str,
}

const fn field(key: &'static str, label: &'static str, placeholder: &'static str) -> ConfigField {
  ConfigField {
    key,
    label,
    placeholder,
  }
}

const ALERT_FIELDS: &[ConfigField] = &[field(
  "message",
  "Alert Message",
  "What message should pop up?",
)];
const SHOW_TEXT_FIELDS: &[ConfigField] = &[field("text", "Text Content", "Enter text to display")];
const SHOW_IMAGE_FIELDS: &[ConfigField] = &[field(
  "url",
  "Image URL",
  "https://example.com/image.jpg",
)];
const SET_STORAGE_FIELDS: &[ConfigField] = &[
  field("key", "Key", "Enter storage key"),
  field("value", "Value", "Enter storage value"),
];
const GET_STORAGE_FIELDS: &[ConfigField] = &[field(
  "key",
  "Key to Retrieve",
  "Enter storage key to retrieve",
)];
const PROMPT_FIELDS: &[ConfigField] = &[
  field("promptMessage", "Prompt Message", "Enter prompt message"),
  field("prefix", "Text Prefix (before user input)", "Hello,"),
  field("suffix", "Text Suffix (after user input)", "!"),
];
const COLOR_FIELDS: &[ConfigField] = &[field(
  "color",
  "Button Color (leave empty for random)",
  "#000000 or rgb(0,0,0)",
)];

impl ActionKind {
  /// Every kind the editor offers, in catalogue order.
  pub const ALL: [ActionKind; 11] = [
    ActionKind::Alert,
    ActionKind::ShowText,
    ActionKind::ShowImage,
    ActionKind::RefreshPage,
    ActionKind::SetLocalStorage,
    ActionKind::GetLocalStorage,
    ActionKind::IncreaseButtonSize,
    ActionKind::CloseWindow,
    ActionKind::PromptAndShow,
    ActionKind::ChangeButtonColor,
    ActionKind::DisableButton,
  ];

  /// The serialized tag, e.g. `"setLocalStorage"`.
  pub fn as_str(&self) -> &str {
    match self {
      ActionKind::Alert => "alert",
      ActionKind::ShowText => "showText",
      ActionKind::ShowImage => "showImage",
      ActionKind::RefreshPage => "refreshPage",
      ActionKind::SetLocalStorage => "setLocalStorage",
      ActionKind::GetLocalStorage => "getLocalStorage",
      ActionKind::IncreaseButtonSize => "increaseButtonSize",
      ActionKind::CloseWindow => "closeWindow",
      ActionKind::PromptAndShow => "promptAndShow",
      ActionKind::ChangeButtonColor => "changeButtonColor",
      ActionKind::DisableButton => "disableButton",
      ActionKind::Other(tag) => tag,
    }
  }

  /// Human readable name shown in the action catalogue.
  pub fn title(&self) -> &str {
    match self {
      ActionKind::Alert => "Alert",
      ActionKind::ShowText => "Show Text",
      ActionKind::ShowImage => "Show Image",
      ActionKind::RefreshPage => "Refresh Page",
      ActionKind::SetLocalStorage => "Set LocalStorage",
      ActionKind::GetLocalStorage => "Get LocalStorage",
      ActionKind::IncreaseButtonSize => "Increase Button Size",
      ActionKind::CloseWindow => "Close Window",
      ActionKind::PromptAndShow => "Prompt and Show",
      ActionKind::ChangeButtonColor => "Change Button Color",
      ActionKind::DisableButton => "Disable Button",
      ActionKind::Other(tag) => tag,
    }
  }

  /// Config fields consumed by this kind. Empty for kinds without settings.
  pub fn fields(&self) -> &'static [ConfigField] {
    match self {
      ActionKind::Alert => ALERT_FIELDS,
      ActionKind::ShowText => SHOW_TEXT_FIELDS,
      ActionKind::ShowImage => SHOW_IMAGE_FIELDS,
      ActionKind::SetLocalStorage => SET_STORAGE_FIELDS,
      ActionKind::GetLocalStorage => GET_STORAGE_FIELDS,
      ActionKind::PromptAndShow => PROMPT_FIELDS,
      ActionKind::ChangeButtonColor => COLOR_FIELDS,
      ActionKind::RefreshPage
      | ActionKind::IncreaseButtonSize
      | ActionKind::CloseWindow
      | ActionKind::DisableButton
      | ActionKind::Other(_) => &[],
    }
  }

  /// Whether this is one of the catalogue kinds.
  pub fn is_known(&self) -> bool {
    !matches!(self, ActionKind::Other(_))
  }
}

impl From<String> for ActionKind {
  fn from(tag: String) -> Self {
    ActionKind::ALL
      .into_iter()
      .find(|kind| kind.as_str() == tag)
      .unwrap_or(ActionKind::Other(tag))
  }
}

impl From<ActionKind> for String {
  fn from(kind: ActionKind) -> Self {
    match kind {
      ActionKind::Other(tag) => tag,
      known => known.as_str().to_string(),
    }
  }
}

impl FromStr for ActionKind {
  type Err = std::convert::Infallible;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Ok(ActionKind::from(s.to_string()))
  }
}

impl fmt::Display for ActionKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}
