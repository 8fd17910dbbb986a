use serde::{Deserialize, Serialize};

/// Scale added by each `increaseButtonSize` step.
pub const SIZE_STEP: f64 = 0.2;

/// Visual state of the button, carried from step to step and click to click.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Presentation {
  /// Number of size increases applied so far.
  pub size_steps: u32,
  /// Color override, `None` for the default style.
  pub color: Option<String>,
  /// Once set, clicks no longer run the workflow.
  pub disabled: bool,
}

impl Presentation {
  /// Scale factor relative to the base size of 1.0.
  pub fn scale(&self) -> f64 {
    1.0 + SIZE_STEP * f64::from(self.size_steps)
  }
}
