//! Action executor implementation.

use std::sync::Arc;
use std::time::Duration;

use clickflow_config::Action;
use clickflow_store::KvStore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::environment::Environment;
use crate::error::ExecutionError;
use crate::events::{ExecutionEvent, ExecutionNotifier, NoopNotifier};
use crate::fragment::Fragment;
use crate::presentation::Presentation;
use crate::result::{Diagnostic, ExecutionResult, Termination};
use crate::step::{NOT_FOUND, Step, prompt_text, random_color};

/// Pause between two steps.
pub const DEFAULT_STEP_DELAY: Duration = Duration::from_millis(300);

/// Configuration for the action executor.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
  /// Settling delay observed after every step, so the sequence plays out
  /// at a visible pace.
  pub step_delay: Duration,
}

impl Default for ExecutorConfig {
  fn default() -> Self {
    Self {
      step_delay: DEFAULT_STEP_DELAY,
    }
  }
}

/// What the loop does after a step.
enum Flow {
  /// Wait for the settling delay, then continue.
  Settle,
  /// Continue immediately.
  Skip,
  /// End the run.
  Stop(Termination),
}

/// Accumulated state of a single run.
struct RunState<'a> {
  execution_id: String,
  notifier: &'a dyn ExecutionNotifier,
  fragments: Vec<Fragment>,
  presentation: Presentation,
  diagnostics: Vec<Diagnostic>,
}

impl RunState<'_> {
  fn push_fragment(&mut self, index: usize, fragment: Fragment) {
    self.notifier.notify(ExecutionEvent::FragmentAdded {
      execution_id: self.execution_id.clone(),
      index,
      fragment: fragment.clone(),
    });
    self.fragments.push(fragment);
  }

  fn update_presentation(&mut self, index: usize, update: impl FnOnce(&mut Presentation)) {
    update(&mut self.presentation);
    self.notifier.notify(ExecutionEvent::PresentationChanged {
      execution_id: self.execution_id.clone(),
      index,
      presentation: self.presentation.clone(),
    });
  }

  fn skip(&self, index: usize, action: &Action, reason: &str) {
    debug!(
      execution_id = %self.execution_id,
      action_id = %action.id,
      kind = %action.kind,
      reason,
      "step_skipped"
    );
    self.notifier.notify(ExecutionEvent::StepSkipped {
      execution_id: self.execution_id.clone(),
      index,
      action_id: action.id.clone(),
      reason: reason.to_string(),
    });
  }

  fn diagnose(&mut self, index: usize, action: &Action, message: String) {
    warn!(
      execution_id = %self.execution_id,
      action_id = %action.id,
      kind = %action.kind,
      message = %message,
      "step_diagnostic"
    );
    self.diagnostics.push(Diagnostic {
      index,
      action_id: action.id.clone(),
      message,
    });
  }

  fn finish(self, termination: Termination) -> ExecutionResult {
    self.notifier.notify(ExecutionEvent::RunCompleted {
      execution_id: self.execution_id.clone(),
      termination,
    });
    ExecutionResult {
      execution_id: self.execution_id,
      fragments: self.fragments,
      presentation: self.presentation,
      diagnostics: self.diagnostics,
      termination,
    }
  }
}

/// Runs a workflow's actions one after another.
///
/// Each action is resolved into a [`Step`] and applied against the run's
/// accumulator. Effects that need the host go through the [`Environment`],
/// storage steps go through the shared [`KvStore`].
pub struct ActionExecutor {
  config: ExecutorConfig,
  store: Arc<dyn KvStore>,
  notifier: Arc<dyn ExecutionNotifier>,
}

impl ActionExecutor {
  /// Create a new executor over the given store.
  pub fn new(config: ExecutorConfig, store: Arc<dyn KvStore>) -> Self {
    Self {
      config,
      store,
      notifier: Arc::new(NoopNotifier),
    }
  }

  /// Send execution events to `notifier`.
  pub fn with_notifier(mut self, notifier: Arc<dyn ExecutionNotifier>) -> Self {
    self.notifier = notifier;
    self
  }

  /// Execute `actions` in order, starting from `presentation`.
  ///
  /// Returns the fragments produced by this run and the final presentation.
  /// Cancelling `cancel` stops the run before the next step or during a
  /// delay or prompt.
  #[instrument(
    name = "workflow_execute",
    skip(self, actions, environment, presentation, cancel),
    fields(actions = actions.len())
  )]
  pub async fn execute(
    &self,
    actions: &[Action],
    environment: &dyn Environment,
    presentation: Presentation,
    cancel: &CancellationToken,
  ) -> Result<ExecutionResult, ExecutionError> {
    let execution_id = uuid::Uuid::new_v4().to_string();
    info!(execution_id = %execution_id, "run_started");
    self.notifier.notify(ExecutionEvent::RunStarted {
      execution_id: execution_id.clone(),
      actions: actions.len(),
    });

    let mut state = RunState {
      execution_id,
      notifier: self.notifier.as_ref(),
      fragments: Vec::new(),
      presentation,
      diagnostics: Vec::new(),
    };

    for (index, action) in actions.iter().enumerate() {
      if cancel.is_cancelled() {
        return Err(self.cancelled(&state));
      }

      self.notifier.notify(ExecutionEvent::StepStarted {
        execution_id: state.execution_id.clone(),
        index,
        action_id: action.id.clone(),
        kind: action.kind.to_string(),
      });

      let flow = self
        .apply(&mut state, index, action, environment, cancel)
        .await?;

      match flow {
        Flow::Settle => {
          tokio::select! {
            _ = tokio::time::sleep(self.config.step_delay) => {}
            _ = cancel.cancelled() => return Err(self.cancelled(&state)),
          }
        }
        Flow::Skip => {}
        Flow::Stop(termination) => {
          info!(execution_id = %state.execution_id, ?termination, "run_stopped");
          return Ok(state.finish(termination));
        }
      }
    }

    info!(
      execution_id = %state.execution_id,
      fragments = state.fragments.len(),
      diagnostics = state.diagnostics.len(),
      "run_completed"
    );
    Ok(state.finish(Termination::Completed))
  }

  /// Apply one action's effect.
  async fn apply(
    &self,
    state: &mut RunState<'_>,
    index: usize,
    action: &Action,
    environment: &dyn Environment,
    cancel: &CancellationToken,
  ) -> Result<Flow, ExecutionError> {
    let flow = match Step::resolve(action) {
      Step::Alert { message } => {
        tokio::select! {
          _ = environment.alert(&message) => {}
          _ = cancel.cancelled() => return Err(self.cancelled(state)),
        }
        Flow::Settle
      }

      Step::ShowText { text } => {
        state.push_fragment(index, Fragment::text(text));
        Flow::Settle
      }

      Step::ShowImage { url: Some(url) } => {
        state.push_fragment(index, Fragment::image(url));
        Flow::Settle
      }
      Step::ShowImage { url: None } => {
        state.skip(index, action, "no image url configured");
        Flow::Settle
      }

      Step::RefreshPage => {
        environment.reload().await;
        Flow::Stop(Termination::Reloaded)
      }

      Step::SetStorage {
        key: Some(key),
        value,
      } => {
        match self.store.set(&key, value.clone()).await {
          Ok(()) => state.push_fragment(
            index,
            Fragment::status(format!("Saved to localStorage: {key} = {value}")),
          ),
          Err(e) => state.diagnose(index, action, format!("failed to write '{key}': {e}")),
        }
        Flow::Settle
      }
      Step::SetStorage { key: None, .. } => {
        state.skip(index, action, "no storage key configured");
        Flow::Settle
      }

      Step::GetStorage { key: Some(key) } => {
        match self.store.get(&key).await {
          Ok(value) => {
            let value = value
              .filter(|v| !v.is_empty())
              .unwrap_or_else(|| NOT_FOUND.to_string());
            state.push_fragment(
              index,
              Fragment::status(format!("Retrieved from localStorage: {key} = {value}")),
            );
          }
          Err(e) => state.diagnose(index, action, format!("failed to read '{key}': {e}")),
        }
        Flow::Settle
      }
      Step::GetStorage { key: None } => {
        state.skip(index, action, "no storage key configured");
        Flow::Settle
      }

      Step::IncreaseButtonSize => {
        state.update_presentation(index, |p| p.size_steps += 1);
        Flow::Settle
      }

      Step::CloseWindow => {
        if environment.close_window().await {
          Flow::Stop(Termination::WindowClosed)
        } else {
          state.diagnose(index, action, "close request denied by host".to_string());
          Flow::Settle
        }
      }

      Step::PromptAndShow {
        message,
        prefix,
        suffix,
      } => {
        let answer = tokio::select! {
          answer = environment.prompt(&message) => answer,
          _ = cancel.cancelled() => return Err(self.cancelled(state)),
        };
        match answer {
          Some(input) => {
            state.push_fragment(index, Fragment::text(prompt_text(&prefix, &input, &suffix)));
          }
          None => state.skip(index, action, "prompt cancelled"),
        }
        Flow::Settle
      }

      Step::ChangeButtonColor { color } => {
        let color = color.unwrap_or_else(random_color);
        state.update_presentation(index, |p| p.color = Some(color));
        Flow::Settle
      }

      Step::DisableButton => {
        state.update_presentation(index, |p| p.disabled = true);
        Flow::Settle
      }

      Step::Unknown { kind } => {
        state.diagnose(index, action, format!("unknown action type: {kind}"));
        state.skip(index, action, "unknown action type");
        Flow::Skip
      }
    };

    Ok(flow)
  }

  fn cancelled(&self, state: &RunState<'_>) -> ExecutionError {
    warn!(execution_id = %state.execution_id, "run_cancelled");
    self.notifier.notify(ExecutionEvent::RunCancelled {
      execution_id: state.execution_id.clone(),
    });
    ExecutionError::Cancelled
  }
}
