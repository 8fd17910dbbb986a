//! Execution events and notifiers for observability.
//!
//! Events are emitted while a workflow runs, so a view can render fragments
//! as they appear instead of waiting for the whole sequence.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::fragment::Fragment;
use crate::presentation::Presentation;
use crate::result::Termination;

/// Events emitted during workflow execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ExecutionEvent {
  /// A click started a run.
  RunStarted {
    execution_id: String,
    actions: usize,
  },

  /// A step has started executing.
  StepStarted {
    execution_id: String,
    index: usize,
    action_id: String,
    kind: String,
  },

  /// A step produced an output fragment.
  FragmentAdded {
    execution_id: String,
    index: usize,
    fragment: Fragment,
  },

  /// A step changed the button's presentation.
  PresentationChanged {
    execution_id: String,
    index: usize,
    presentation: Presentation,
  },

  /// A step did nothing, for the given reason.
  StepSkipped {
    execution_id: String,
    index: usize,
    action_id: String,
    reason: String,
  },

  /// The run ended normally.
  RunCompleted {
    execution_id: String,
    termination: Termination,
  },

  /// The run was cancelled before finishing.
  RunCancelled { execution_id: String },
}

/// Trait for receiving execution events.
///
/// The executor calls `notify` for each event. Implementations decide what
/// to do with them (render, log, forward, ignore).
pub trait ExecutionNotifier: Send + Sync {
  /// Called when an execution event occurs.
  fn notify(&self, event: ExecutionEvent);
}

/// A no-op notifier that discards all events.
#[derive(Debug, Clone, Default)]
pub struct NoopNotifier;

impl ExecutionNotifier for NoopNotifier {
  fn notify(&self, _event: ExecutionEvent) {}
}

/// A notifier that sends events to an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
  // Unbounded so a slow consumer never stalls a run. A run emits a handful
  // of events per step.
  sender: mpsc::UnboundedSender<ExecutionEvent>,
}

impl ChannelNotifier {
  /// Create a new channel notifier.
  pub fn new(sender: mpsc::UnboundedSender<ExecutionEvent>) -> Self {
    Self { sender }
  }
}

impl ExecutionNotifier for ChannelNotifier {
  fn notify(&self, event: ExecutionEvent) {
    // Receiver may have been dropped
    let _ = self.sender.send(event);
  }
}
