//! Terminal host for running a button workflow.

use std::io::BufRead;

use async_trait::async_trait;
use clickflow_runtime::{Environment, ExecutionEvent, ExecutionNotifier};
use tokio::sync::{Mutex, mpsc};

/// Environment backed by the terminal.
///
/// Alerts are printed to stderr, prompts read one line from stdin. End of
/// input counts as a cancelled prompt.
///
/// Stdin is read on a detached thread that hands lines over a channel. A
/// prompt that is abandoned mid-read leaves only that thread blocked, so the
/// process can still exit.
pub struct TerminalEnvironment {
  input: Mutex<mpsc::Receiver<String>>,
  allow_close: bool,
}

impl TerminalEnvironment {
  pub fn new(allow_close: bool) -> Self {
    let (tx, rx) = mpsc::channel(1);
    std::thread::spawn(move || {
      for line in std::io::stdin().lock().lines() {
        match line {
          Ok(line) => {
            if tx.blocking_send(line).is_err() {
              break;
            }
          }
          Err(e) => {
            tracing::warn!(error = %e, "failed to read prompt answer");
            break;
          }
        }
      }
    });

    Self {
      input: Mutex::new(rx),
      allow_close,
    }
  }
}

#[async_trait]
impl Environment for TerminalEnvironment {
  async fn alert(&self, message: &str) {
    eprintln!("[alert] {message}");
  }

  async fn prompt(&self, message: &str) -> Option<String> {
    eprintln!("[prompt] {message}");
    self.input.lock().await.recv().await
  }

  async fn reload(&self) {
    eprintln!("[reload] reloading saved workflow");
  }

  async fn close_window(&self) -> bool {
    if self.allow_close {
      eprintln!("[close] window closed");
    } else {
      eprintln!("[close] close request denied");
    }
    self.allow_close
  }
}

/// Prints fragments and button changes as a run produces them.
pub struct TerminalNotifier;

impl ExecutionNotifier for TerminalNotifier {
  fn notify(&self, event: ExecutionEvent) {
    match event {
      ExecutionEvent::RunStarted { actions, .. } => {
        eprintln!("--- click ({actions} actions) ---");
      }
      ExecutionEvent::FragmentAdded { fragment, .. } => println!("{fragment}"),
      ExecutionEvent::PresentationChanged { presentation, .. } => {
        eprintln!(
          "[button] scale={:.1} color={} disabled={}",
          presentation.scale(),
          presentation.color.as_deref().unwrap_or("default"),
          presentation.disabled
        );
      }
      ExecutionEvent::StepSkipped {
        index, reason, ..
      } => {
        eprintln!("[skip] step {}: {reason}", index + 1);
      }
      ExecutionEvent::RunCancelled { .. } => eprintln!("--- cancelled ---"),
      ExecutionEvent::StepStarted { .. } | ExecutionEvent::RunCompleted { .. } => {}
    }
  }
}
