//! Error types for workflow execution.

use thiserror::Error;

/// Errors that can occur while running a workflow.
///
/// Problems inside a single step (unknown kinds, missing config, store
/// failures) never surface here. They are recorded as diagnostics on the
/// result and the run continues.
#[derive(Debug, Error)]
pub enum ExecutionError {
  /// The run was cancelled, e.g. by navigating away from the button.
  #[error("execution cancelled")]
  Cancelled,

  /// The button runner is no longer accepting clicks.
  #[error("button runner closed")]
  RunnerClosed,
}
