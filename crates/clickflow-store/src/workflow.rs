use std::sync::Arc;

use clickflow_config::Workflow;
use tracing::{debug, warn};

use crate::Error;
use crate::kv::KvStore;

/// Key of the slot holding the saved workflow document.
pub const WORKFLOW_SLOT: &str = "buttonWorkflow";

/// Saves and loads the workflow document in a single slot of a [`KvStore`].
#[derive(Clone)]
pub struct WorkflowStore {
  kv: Arc<dyn KvStore>,
  slot: String,
}

impl WorkflowStore {
  pub fn new(kv: Arc<dyn KvStore>) -> Self {
    Self::with_slot(kv, WORKFLOW_SLOT)
  }

  /// Use a custom slot name instead of [`WORKFLOW_SLOT`].
  pub fn with_slot(kv: Arc<dyn KvStore>, slot: impl Into<String>) -> Self {
    Self {
      kv,
      slot: slot.into(),
    }
  }

  /// Overwrite the slot with the serialized workflow.
  pub async fn save(&self, workflow: &Workflow) -> Result<(), Error> {
    let document = serde_json::to_string(workflow)?;
    self.kv.set(&self.slot, document).await?;
    debug!(
      slot = %self.slot,
      label = %workflow.label,
      actions = workflow.actions.len(),
      "workflow_saved"
    );
    Ok(())
  }

  /// Load the saved workflow.
  ///
  /// Returns `Ok(None)` when nothing is saved, and an error when the slot
  /// holds something that is not a workflow document.
  pub async fn load_saved(&self) -> Result<Option<Workflow>, Error> {
    match self.kv.get(&self.slot).await? {
      Some(document) => Ok(Some(serde_json::from_str(&document)?)),
      None => Ok(None),
    }
  }

  /// Load the saved workflow, falling back to [`Workflow::default`].
  ///
  /// Never fails: an empty slot, an unreadable store and a corrupt document
  /// all produce the default workflow.
  pub async fn load(&self) -> Workflow {
    match self.load_saved().await {
      Ok(Some(workflow)) => workflow,
      Ok(None) => Workflow::default(),
      Err(e) => {
        warn!(slot = %self.slot, error = %e, "failed to load saved workflow, using default");
        Workflow::default()
      }
    }
  }
}
