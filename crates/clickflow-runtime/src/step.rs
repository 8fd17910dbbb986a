//! Typed steps resolved from workflow actions.
//!
//! Resolving an [`Action`] applies the per-kind defaults up front, so the
//! executor only deals with fully populated variants. Fields whose absence
//! means "skip" stay optional.

use clickflow_config::{Action, ActionKind};
use rand::Rng;

pub const DEFAULT_ALERT_MESSAGE: &str = "Alert!";
pub const DEFAULT_TEXT: &str = "Text content";
pub const DEFAULT_PROMPT_MESSAGE: &str = "Please enter a value:";
/// Shown by `getLocalStorage` when the key has no value.
pub const NOT_FOUND: &str = "Not found";

/// A single executable step.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
  Alert {
    message: String,
  },
  ShowText {
    text: String,
  },
  ShowImage {
    url: Option<String>,
  },
  RefreshPage,
  SetStorage {
    key: Option<String>,
    value: String,
  },
  GetStorage {
    key: Option<String>,
  },
  IncreaseButtonSize,
  CloseWindow,
  PromptAndShow {
    message: String,
    prefix: String,
    suffix: String,
  },
  ChangeButtonColor {
    color: Option<String>,
  },
  DisableButton,
  /// A kind outside the catalogue.
  Unknown {
    kind: String,
  },
}

impl Step {
  pub fn resolve(action: &Action) -> Self {
    let config = &action.config;
    match &action.kind {
      ActionKind::Alert => Step::Alert {
        message: config.text_or("message", DEFAULT_ALERT_MESSAGE),
      },
      ActionKind::ShowText => Step::ShowText {
        text: config.text_or("text", DEFAULT_TEXT),
      },
      ActionKind::ShowImage => Step::ShowImage {
        url: config.text("url"),
      },
      ActionKind::RefreshPage => Step::RefreshPage,
      ActionKind::SetLocalStorage => Step::SetStorage {
        key: config.text("key"),
        value: config.text_or("value", ""),
      },
      ActionKind::GetLocalStorage => Step::GetStorage {
        key: config.text("key"),
      },
      ActionKind::IncreaseButtonSize => Step::IncreaseButtonSize,
      ActionKind::CloseWindow => Step::CloseWindow,
      ActionKind::PromptAndShow => Step::PromptAndShow {
        message: config.text_or("promptMessage", DEFAULT_PROMPT_MESSAGE),
        prefix: config.text_or("prefix", ""),
        suffix: config.text_or("suffix", ""),
      },
      ActionKind::ChangeButtonColor => Step::ChangeButtonColor {
        color: config.text("color"),
      },
      ActionKind::DisableButton => Step::DisableButton,
      ActionKind::Other(kind) => Step::Unknown { kind: kind.clone() },
    }
  }
}

/// Random color formatted as `#rrggbb`.
pub fn random_color() -> String {
  let rgb: u32 = rand::thread_rng().gen_range(0..=0x00ff_ffff);
  format!("#{rgb:06x}")
}

/// Text shown for a prompt answer: the non-empty parts joined by a space.
pub(crate) fn prompt_text(prefix: &str, input: &str, suffix: &str) -> String {
  [prefix, input, suffix]
    .into_iter()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(" ")
}
