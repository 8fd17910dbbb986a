//! Clickflow Store
//!
//! This crate provides the persisted key-value store used by clickflow and
//! the workflow persistence gateway built on top of it.
//!
//! The [`KvStore`] trait is the "local storage" of a host. Workflow steps
//! read and write it, and [`WorkflowStore`] keeps the saved workflow
//! document in one of its slots.

mod kv;
mod workflow;

pub use kv::{FileKvStore, InMemoryKvStore, KvStore};
pub use workflow::{WORKFLOW_SLOT, WorkflowStore};

/// Error type for storage operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
  /// Reading or writing the backing file failed.
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  /// A stored document could not be encoded or decoded.
  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}
