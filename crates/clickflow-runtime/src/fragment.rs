use std::fmt;

use serde::{Deserialize, Serialize};

/// One piece of output produced by a step and rendered below the button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Fragment {
  /// Plain text block.
  Text { text: String },
  /// Image reference.
  Image { url: String },
  /// Status line reporting a side effect, e.g. a storage write.
  Status { text: String },
}

impl Fragment {
  pub fn text(text: impl Into<String>) -> Self {
    Fragment::Text { text: text.into() }
  }

  pub fn image(url: impl Into<String>) -> Self {
    Fragment::Image { url: url.into() }
  }

  pub fn status(text: impl Into<String>) -> Self {
    Fragment::Status { text: text.into() }
  }
}

impl fmt::Display for Fragment {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Fragment::Text { text } | Fragment::Status { text } => f.write_str(text),
      Fragment::Image { url } => write!(f, "[image] {url}"),
    }
  }
}
