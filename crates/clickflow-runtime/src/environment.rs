use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

/// Effects the host performs on behalf of a running workflow.
///
/// `alert` and `prompt` block the sequence until the host answers. The
/// executor awaits them before moving to the next step.
#[async_trait]
pub trait Environment: Send + Sync {
  /// Show a message and wait until it is dismissed.
  async fn alert(&self, message: &str);

  /// Ask the user for a line of text. `None` means the prompt was cancelled.
  async fn prompt(&self, message: &str) -> Option<String>;

  /// Reload the execution view.
  async fn reload(&self);

  /// Ask to close the execution view. Returns whether the host allowed it.
  async fn close_window(&self) -> bool;
}

/// Environment without a user, driven by scripted prompt answers.
///
/// Records every alert and prompt so callers can inspect what a run asked
/// for. Prompts beyond the scripted answers are treated as cancelled.
#[derive(Debug, Default)]
pub struct HeadlessEnvironment {
  allow_close: bool,
  answers: Mutex<VecDeque<Option<String>>>,
  alerts: Mutex<Vec<String>>,
  prompts: Mutex<Vec<String>>,
  reloads: Mutex<usize>,
  close_requests: Mutex<usize>,
}

impl HeadlessEnvironment {
  pub fn new() -> Self {
    Self::default()
  }

  /// Queue answers for upcoming prompts, in order.
  pub fn with_answers<I, S>(self, answers: I) -> Self
  where
    I: IntoIterator<Item = Option<S>>,
    S: Into<String>,
  {
    Self {
      answers: Mutex::new(answers.into_iter().map(|a| a.map(Into::into)).collect()),
      ..self
    }
  }

  /// Grant close requests instead of denying them.
  pub fn allow_close(self, allow: bool) -> Self {
    Self {
      allow_close: allow,
      ..self
    }
  }

  pub async fn alerts(&self) -> Vec<String> {
    self.alerts.lock().await.clone()
  }

  pub async fn prompts(&self) -> Vec<String> {
    self.prompts.lock().await.clone()
  }

  pub async fn reloads(&self) -> usize {
    *self.reloads.lock().await
  }

  pub async fn close_requests(&self) -> usize {
    *self.close_requests.lock().await
  }
}

#[async_trait]
impl Environment for HeadlessEnvironment {
  async fn alert(&self, message: &str) {
    self.alerts.lock().await.push(message.to_string());
  }

  async fn prompt(&self, message: &str) -> Option<String> {
    self.prompts.lock().await.push(message.to_string());
    self.answers.lock().await.pop_front().flatten()
  }

  async fn reload(&self) {
    *self.reloads.lock().await += 1;
  }

  async fn close_window(&self) -> bool {
    *self.close_requests.lock().await += 1;
    self.allow_close
  }
}
