//! Execution results.

use serde::{Deserialize, Serialize};

use crate::fragment::Fragment;
use crate::presentation::Presentation;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
  /// Every step ran.
  Completed,
  /// A `refreshPage` step reloaded the view. Later steps did not run.
  Reloaded,
  /// A `closeWindow` step was granted. Later steps did not run.
  WindowClosed,
}

/// A problem recorded while running a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
  /// Position of the step in the workflow.
  pub index: usize,
  pub action_id: String,
  pub message: String,
}

/// Result of one click.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
  /// Unique execution ID.
  pub execution_id: String,
  /// Output fragments in the order they were produced.
  pub fragments: Vec<Fragment>,
  /// Presentation after the last step.
  pub presentation: Presentation,
  pub diagnostics: Vec<Diagnostic>,
  pub termination: Termination,
}
