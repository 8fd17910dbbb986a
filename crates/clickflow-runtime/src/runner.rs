//! Button runner with channel-based clicks.
//!
//! The `ButtonRunner` is the execution view of a saved workflow. It owns the
//! button's presentation, which outlives individual clicks, and executes
//! clicks one at a time. Clicks that arrive during a run wait in the
//! channel until the run finishes.

use std::sync::Arc;

use clickflow_config::Workflow;
use clickflow_store::WorkflowStore;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::environment::Environment;
use crate::error::ExecutionError;
use crate::executor::ActionExecutor;
use crate::fragment::Fragment;
use crate::presentation::Presentation;
use crate::result::{ExecutionResult, Termination};

/// Snapshot of what the button view shows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ButtonView {
  pub label: String,
  pub presentation: Presentation,
  /// Fragments of the latest click.
  pub fragments: Vec<Fragment>,
  /// Whether a click is being executed right now.
  pub running: bool,
  /// Number of clicks that ran to completion.
  pub runs: u64,
}

impl ButtonView {
  fn initial(workflow: &Workflow) -> Self {
    Self {
      label: workflow.label.clone(),
      ..Self::default()
    }
  }
}

/// Outcome of a single click.
#[derive(Debug)]
pub enum ClickOutcome {
  /// The workflow ran.
  Ran(ExecutionResult),
  /// The button is disabled, nothing ran.
  Ignored,
}

/// Handle for clicking the button and watching its view.
#[derive(Debug, Clone)]
pub struct ButtonHandle {
  sender: mpsc::Sender<()>,
  view: watch::Receiver<ButtonView>,
}

impl ButtonHandle {
  /// Queue a click.
  pub async fn click(&self) -> Result<(), ExecutionError> {
    self
      .sender
      .send(())
      .await
      .map_err(|_| ExecutionError::RunnerClosed)
  }

  /// Subscribe to view updates.
  pub fn subscribe(&self) -> watch::Receiver<ButtonView> {
    self.view.clone()
  }

  /// Current view.
  pub fn view(&self) -> ButtonView {
    self.view.borrow().clone()
  }
}

/// Executes the saved workflow each time the button is clicked.
///
/// # Usage
///
/// ```ignore
/// let (runner, handle) = ButtonRunner::new(executor, store, environment).await;
///
/// // Clicks can come from anywhere holding a handle
/// handle.click().await?;
///
/// // Start the click loop
/// let cancel = CancellationToken::new();
/// runner.start(cancel).await?;
/// ```
pub struct ButtonRunner {
  receiver: mpsc::Receiver<()>,
  view: watch::Sender<ButtonView>,
  executor: Arc<ActionExecutor>,
  store: WorkflowStore,
  environment: Arc<dyn Environment>,
  workflow: Workflow,
}

impl ButtonRunner {
  /// Create a runner for the workflow saved in `store`.
  pub async fn new(
    executor: Arc<ActionExecutor>,
    store: WorkflowStore,
    environment: Arc<dyn Environment>,
  ) -> (Self, ButtonHandle) {
    Self::with_buffer_size(executor, store, environment, 16).await
  }

  /// Create a runner with a custom click buffer size.
  pub async fn with_buffer_size(
    executor: Arc<ActionExecutor>,
    store: WorkflowStore,
    environment: Arc<dyn Environment>,
    buffer_size: usize,
  ) -> (Self, ButtonHandle) {
    let workflow = store.load().await;
    let (sender, receiver) = mpsc::channel(buffer_size);
    let (view, view_receiver) = watch::channel(ButtonView::initial(&workflow));

    info!(
      label = %workflow.label,
      actions = workflow.actions.len(),
      "workflow_loaded"
    );

    let runner = Self {
      receiver,
      view,
      executor,
      store,
      environment,
      workflow,
    };
    let handle = ButtonHandle {
      sender,
      view: view_receiver,
    };
    (runner, handle)
  }

  /// The workflow currently loaded.
  pub fn workflow(&self) -> &Workflow {
    &self.workflow
  }

  /// Current view.
  pub fn view(&self) -> ButtonView {
    self.view.borrow().clone()
  }

  /// Run one click directly, without going through the channel.
  pub async fn click_once(
    &mut self,
    cancel: &CancellationToken,
  ) -> Result<ClickOutcome, ExecutionError> {
    let presentation = self.view.borrow().presentation.clone();
    if presentation.disabled {
      info!(label = %self.workflow.label, "click_ignored_disabled");
      return Ok(ClickOutcome::Ignored);
    }

    self.view.send_modify(|view| {
      view.fragments.clear();
      view.running = true;
    });

    let result = self
      .executor
      .execute(
        &self.workflow.actions,
        self.environment.as_ref(),
        presentation,
        cancel,
      )
      .await;

    match result {
      Ok(result) => {
        if result.termination == Termination::Reloaded {
          self.reload().await;
        } else {
          self.view.send_modify(|view| {
            view.presentation = result.presentation.clone();
            view.fragments = result.fragments.clone();
            view.running = false;
            view.runs += 1;
          });
        }
        Ok(ClickOutcome::Ran(result))
      }
      Err(e) => {
        self.view.send_modify(|view| view.running = false);
        Err(e)
      }
    }
  }

  /// Reload the saved workflow and reset the view, as a page reload would.
  async fn reload(&mut self) {
    self.workflow = self.store.load().await;
    let runs = self.view.borrow().runs + 1;
    self.view.send_replace(ButtonView {
      runs,
      ..ButtonView::initial(&self.workflow)
    });
    info!(
      label = %self.workflow.label,
      actions = self.workflow.actions.len(),
      "workflow_reloaded"
    );
  }

  /// Start the click loop.
  ///
  /// Runs until the cancellation token is triggered, every handle is
  /// dropped, or a run closes the window.
  pub async fn start(mut self, cancel: CancellationToken) -> Result<(), ExecutionError> {
    info!(label = %self.workflow.label, "starting button runner");

    loop {
      let click = tokio::select! {
          _ = cancel.cancelled() => {
              info!(label = %self.workflow.label, "button runner cancelled");
              break;
          }
          click = self.receiver.recv() => click,
      };

      if click.is_none() {
        info!(label = %self.workflow.label, "button runner channel closed");
        break;
      }

      let run_cancel = cancel.child_token();
      match self.click_once(&run_cancel).await {
        Ok(ClickOutcome::Ran(result)) => {
          info!(
            execution_id = %result.execution_id,
            fragments = result.fragments.len(),
            termination = ?result.termination,
            "click_completed"
          );
          if result.termination == Termination::WindowClosed {
            info!(label = %self.workflow.label, "window closed, stopping button runner");
            break;
          }
        }
        Ok(ClickOutcome::Ignored) => {}
        Err(ExecutionError::Cancelled) => {
          info!(label = %self.workflow.label, "click cancelled");
          break;
        }
        Err(e) => {
          error!(label = %self.workflow.label, error = %e, "click failed");
        }
      }
    }

    Ok(())
  }
}
