mod terminal;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use clickflow_config::{ActionConfig, ActionKind, Workflow};
use clickflow_runtime::{ActionExecutor, ButtonRunner, ExecutorConfig};
use clickflow_store::{FileKvStore, KvStore, WORKFLOW_SLOT, WorkflowStore};

use crate::terminal::{TerminalEnvironment, TerminalNotifier};

/// Clickflow - build a button workflow and click it
#[derive(Parser)]
#[command(name = "clickflow")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path to the data directory (default: ~/.clickflow)
  #[arg(long, global = true, env = "CLICKFLOW_DATA_DIR")]
  data_dir: Option<PathBuf>,

  /// Delay between workflow steps, in milliseconds
  #[arg(long, global = true, env = "CLICKFLOW_STEP_DELAY_MS", default_value_t = 300)]
  step_delay_ms: u64,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Preview the saved workflow and the stored values
  Show {
    /// Also list each action's settings
    #[arg(long)]
    settings: bool,
  },

  /// List the available action types and their settings
  Kinds,

  /// Append an action to the workflow
  Add {
    /// Action type, e.g. showText
    kind: ActionKind,

    /// Initial settings as key=value
    #[arg(value_parser = parse_setting)]
    settings: Vec<(String, String)>,
  },

  /// Remove an action
  Remove {
    /// Action id or 1-based position
    action: String,
  },

  /// Change an action's settings (an empty value removes the setting)
  Configure {
    /// Action id or 1-based position
    action: String,

    /// Settings as key=value
    #[arg(value_parser = parse_setting, required = true)]
    settings: Vec<(String, String)>,
  },

  /// Move an action to another position (1-based)
  Move { from: usize, to: usize },

  /// Set the button label
  Label { label: String },

  /// Remove every action
  Clear,

  /// Delete a stored value
  Unset { key: String },

  /// Click the button
  Click {
    /// Number of clicks
    #[arg(long, default_value_t = 1)]
    times: u32,

    /// Deny closeWindow requests instead of ending the session
    #[arg(long)]
    deny_close: bool,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
    .with_writer(std::io::stderr)
    .init();

  let data_dir = match cli.data_dir {
    Some(dir) => dir,
    None => dirs::home_dir()
      .context("could not determine home directory")?
      .join(".clickflow"),
  };

  let Some(command) = cli.command else {
    println!("clickflow - use --help to see available commands");
    return Ok(());
  };

  let step_delay = Duration::from_millis(cli.step_delay_ms);
  let rt = tokio::runtime::Runtime::new()?;
  rt.block_on(async { run(command, &data_dir, step_delay).await })
}

async fn run(command: Commands, data_dir: &Path, step_delay: Duration) -> Result<()> {
  let kv_path = data_dir.join("local_storage.json");
  let kv: Arc<dyn KvStore> = Arc::new(
    FileKvStore::open(&kv_path)
      .await
      .with_context(|| format!("failed to open store: {}", kv_path.display()))?,
  );
  let store = WorkflowStore::new(kv.clone());

  match command {
    Commands::Show { settings } => show(&store, kv.as_ref(), settings).await,
    Commands::Kinds => {
      list_kinds();
      Ok(())
    }
    Commands::Unset { key } => {
      kv.remove(&key)
        .await
        .with_context(|| format!("failed to remove '{key}'"))?;
      eprintln!("Removed '{key}'");
      Ok(())
    }
    Commands::Click { times, deny_close } => click(kv, store, step_delay, times, !deny_close).await,
    edit => {
      let workflow = load_for_edit(&store).await?;
      let workflow = apply_edit(workflow, edit)?;
      store.save(&workflow).await.context("failed to save workflow")?;
      print_preview(&workflow, false);
      Ok(())
    }
  }
}

/// Load the workflow to edit, starting fresh when the saved one is unusable.
async fn load_for_edit(store: &WorkflowStore) -> Result<Workflow> {
  match store.load_saved().await {
    Ok(Some(workflow)) => Ok(workflow),
    Ok(None) => Ok(Workflow::default()),
    Err(e) => {
      eprintln!("Saved workflow is unreadable ({e}), starting from an empty one");
      Ok(Workflow::default())
    }
  }
}

fn apply_edit(workflow: Workflow, edit: Commands) -> Result<Workflow> {
  let workflow = match edit {
    Commands::Add { kind, settings } => {
      if !kind.is_known() {
        eprintln!("Warning: '{kind}' is not a known action type, it will be skipped when run");
      }
      warn_unused_settings(&kind, None, &settings);
      let (workflow, id) = workflow.add_action(kind);
      eprintln!("Added {id}");
      let config: ActionConfig = settings.into_iter().filter(|(_, v)| !v.is_empty()).collect();
      if config.is_empty() {
        workflow
      } else {
        workflow.update_action_config(&id, config)
      }
    }
    Commands::Remove { action } => {
      let id = resolve_action(&workflow, &action)?;
      if let Some(index) = workflow.position(&id) {
        eprintln!("Removed action {} ({id})", index + 1);
      }
      workflow.remove_action(&id)
    }
    Commands::Configure { action, settings } => {
      let id = resolve_action(&workflow, &action)?;
      configure(workflow, &id, settings)?
    }
    Commands::Move { from, to } => {
      let len = workflow.actions.len();
      if from == 0 || to == 0 || from > len || to > len {
        bail!("positions must be between 1 and {len}");
      }
      workflow.reorder(from - 1, to - 1)
    }
    Commands::Label { label } => workflow.set_label(label),
    Commands::Clear => workflow.clear_actions(),
    Commands::Show { .. } | Commands::Kinds | Commands::Unset { .. } | Commands::Click { .. } => {
      workflow
    }
  };
  Ok(workflow)
}

/// Merge `settings` into the action's config and store it back.
fn configure(workflow: Workflow, id: &str, settings: Vec<(String, String)>) -> Result<Workflow> {
  let action = workflow
    .get_action(id)
    .with_context(|| format!("action '{}' not found", id))?;

  warn_unused_settings(&action.kind, Some(id), &settings);
  let mut config = action.config.clone();
  for (key, value) in settings {
    config = if value.is_empty() {
      config.without(&key)
    } else {
      config.with(key, value)
    };
  }

  Ok(workflow.update_action_config(id, config))
}

fn warn_unused_settings(kind: &ActionKind, id: Option<&str>, settings: &[(String, String)]) {
  let fields = kind.fields();
  for (key, _) in settings {
    if !fields.iter().any(|f| f.key == key) {
      tracing::warn!(action_id = ?id, kind = %kind, key = %key, "setting not used by this action type");
    }
  }
}

/// Accept an action id or a 1-based position.
fn resolve_action(workflow: &Workflow, target: &str) -> Result<String> {
  if workflow.get_action(target).is_some() {
    return Ok(target.to_string());
  }
  if let Ok(position) = target.parse::<usize>()
    && let Some(action) = position.checked_sub(1).and_then(|i| workflow.actions.get(i))
  {
    return Ok(action.id.clone());
  }
  bail!("no action with id or position '{}'", target)
}

fn parse_setting(s: &str) -> Result<(String, String), String> {
  let (key, value) = s
    .split_once('=')
    .ok_or_else(|| format!("expected key=value, got '{s}'"))?;
  if key.is_empty() {
    return Err(format!("empty key in '{s}'"));
  }
  Ok((key.to_string(), value.to_string()))
}

async fn show(store: &WorkflowStore, kv: &dyn KvStore, with_settings: bool) -> Result<()> {
  match store.load_saved().await {
    Ok(Some(workflow)) => print_preview(&workflow, with_settings),
    Ok(None) => {
      eprintln!("No saved workflow, showing the default");
      print_preview(&Workflow::default(), with_settings);
    }
    Err(e) => {
      eprintln!("Saved workflow is unreadable ({e}), showing the default");
      print_preview(&Workflow::default(), with_settings);
    }
  }

  let entries = stored_values(kv).await.context("failed to read stored values")?;
  if !entries.is_empty() {
    println!("Stored values:");
    for (key, value) in entries {
      println!("  {key} = {value}");
    }
  }
  Ok(())
}

/// Everything in the store except the workflow document itself.
async fn stored_values(kv: &dyn KvStore) -> Result<Vec<(String, String)>> {
  let mut entries = Vec::new();
  for key in kv.keys().await? {
    if key == WORKFLOW_SLOT {
      continue;
    }
    if let Some(value) = kv.get(&key).await? {
      entries.push((key, value));
    }
  }
  Ok(entries)
}

fn print_preview(workflow: &Workflow, with_settings: bool) {
  println!("[ {} ]", workflow.label);
  if workflow.is_empty() {
    println!("Your workflow is empty. Add some actions to get started!");
    return;
  }
  println!("Workflow Sequence:");
  for (index, action) in workflow.actions.iter().enumerate() {
    println!("  {}. {}  ({})", index + 1, action.describe(), action.id);
    if with_settings {
      println!("       {} setting(s)", action.config.len());
      for (key, value) in action.config.iter() {
        println!("       {key}: {value}");
      }
    }
  }
}

fn list_kinds() {
  for kind in ActionKind::ALL {
    println!("{} - {}", kind, kind.title());
    let fields = kind.fields();
    if fields.is_empty() {
      println!("    (no settings)");
    }
    for field in fields {
      println!("    {}: {} (e.g. {})", field.key, field.label, field.placeholder);
    }
  }
}

async fn click(
  kv: Arc<dyn KvStore>,
  store: WorkflowStore,
  step_delay: Duration,
  times: u32,
  allow_close: bool,
) -> Result<()> {
  let executor = ActionExecutor::new(ExecutorConfig { step_delay }, kv)
    .with_notifier(Arc::new(TerminalNotifier));
  let environment = Arc::new(TerminalEnvironment::new(allow_close));
  let (runner, handle) = ButtonRunner::new(Arc::new(executor), store, environment).await;

  eprintln!("Loaded button: {}", runner.workflow().label);

  // Ctrl-C acts like navigating away: the current run stops.
  let cancel = CancellationToken::new();
  let ctrl_c = cancel.clone();
  tokio::spawn(async move {
    if tokio::signal::ctrl_c().await.is_ok() {
      ctrl_c.cancel();
    }
  });

  let view = handle.subscribe();
  let task = tokio::spawn(runner.start(cancel));

  for _ in 0..times {
    if handle.click().await.is_err() {
      break;
    }
  }
  drop(handle);

  task
    .await
    .context("button runner panicked")?
    .context("button runner failed")?;

  let view = view.borrow().clone();
  eprintln!(
    "Button '{}': {} run(s), scale={:.1}, color={}, disabled={}",
    view.label,
    view.runs,
    view.presentation.scale(),
    view.presentation.color.as_deref().unwrap_or("default"),
    view.presentation.disabled
  );
  Ok(())
}
