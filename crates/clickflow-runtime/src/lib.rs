//! Clickflow Runtime
//!
//! This crate runs button workflows. It provides the sequential action
//! executor and the button runner built on top of it.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       ButtonRunner                          │
//! │  - owns the click channel and the button view               │
//! │  - presentation persists across clicks                      │
//! │  - clicks run one at a time, ignored once disabled          │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ActionExecutor                         │
//! │  - execute(actions, env, presentation, cancel)              │
//! │  - resolves each action into a Step and applies it          │
//! │  - fixed settling delay between steps                       │
//! └─────────────────────────────────────────────────────────────┘
//!                  │                            │
//!                  ▼                            ▼
//!        ┌──────────────────┐         ┌──────────────────┐
//!        │   Environment    │         │     KvStore      │
//!        │ alert, prompt,   │         │ setLocalStorage, │
//!        │ reload, close    │         │ getLocalStorage  │
//!        └──────────────────┘         └──────────────────┘
//! ```

mod environment;
mod error;
mod events;
mod executor;
mod fragment;
mod presentation;
mod result;
mod runner;
mod step;

pub use environment::{Environment, HeadlessEnvironment};
pub use error::ExecutionError;
pub use events::{ChannelNotifier, ExecutionEvent, ExecutionNotifier, NoopNotifier};
pub use executor::{ActionExecutor, DEFAULT_STEP_DELAY, ExecutorConfig};
pub use fragment::Fragment;
pub use presentation::{Presentation, SIZE_STEP};
pub use result::{Diagnostic, ExecutionResult, Termination};
pub use runner::{ButtonHandle, ButtonRunner, ButtonView, ClickOutcome};
pub use step::{Step, random_color};
