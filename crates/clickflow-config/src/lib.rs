//! Clickflow Config
//!
//! This crate contains the workflow model for clickflow: a button label and
//! the ordered list of actions replayed when the button is clicked.
//!
//! The types serialize to the single persisted workflow document:
//!
//! ```json
//! {
//!   "label": "Click Me!",
//!   "actions": [
//!     { "id": "action-1", "type": "showText", "config": { "text": "Hi" } }
//!   ]
//! }
//! ```
//!
//! Edit operations on [`Workflow`] are pure. They consume the workflow and
//! return the edited value, so editors can keep the previous state around.

mod action;
mod config;
mod kind;
mod workflow;

pub use action::Action;
pub use config::ActionConfig;
pub use kind::{ActionKind, ConfigField};
pub use workflow::{DEFAULT_LABEL, Workflow};
