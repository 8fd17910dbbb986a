//! Integration tests for ActionExecutor and ButtonRunner over real stores.

use std::sync::Arc;
use std::time::Duration;

use clickflow_config::{Action, ActionConfig, ActionKind, Workflow};
use clickflow_runtime::{
  ActionExecutor, ButtonRunner, ChannelNotifier, ExecutionError, ExecutionEvent, ExecutorConfig,
  Fragment, HeadlessEnvironment, Presentation, Termination,
};
use clickflow_store::{FileKvStore, InMemoryKvStore, KvStore, WORKFLOW_SLOT, WorkflowStore};
use serde_json::json;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

fn instant_executor(store: Arc<dyn KvStore>) -> ActionExecutor {
  ActionExecutor::new(
    ExecutorConfig {
      step_delay: Duration::ZERO,
    },
    store,
  )
}

fn actions(value: serde_json::Value) -> Vec<Action> {
  serde_json::from_value(value).unwrap()
}

#[tokio::test]
async fn test_set_then_get_shows_value() {
  let executor = instant_executor(Arc::new(InMemoryKvStore::new()));
  let actions = actions(json!([
    { "id": "a", "type": "setLocalStorage", "config": { "key": "k", "value": "v" } },
    { "id": "b", "type": "getLocalStorage", "config": { "key": "k" } }
  ]));

  let result = executor
    .execute(
      &actions,
      &HeadlessEnvironment::new(),
      Presentation::default(),
      &CancellationToken::new(),
    )
    .await
    .unwrap();

  let last = result.fragments.last().unwrap();
  assert_eq!(
    *last,
    Fragment::status("Retrieved from localStorage: k = v")
  );
  assert!(last.to_string().ends_with("k = v"));
}

#[tokio::test(start_paused = true)]
async fn test_steps_are_paced_by_delay() {
  let executor = ActionExecutor::new(ExecutorConfig::default(), Arc::new(InMemoryKvStore::new()));
  let actions = actions(json!([
    { "id": "a", "type": "showText", "config": { "text": "one" } },
    { "id": "b", "type": "unknownThing", "config": {} },
    { "id": "c", "type": "showText", "config": { "text": "two" } },
    { "id": "d", "type": "increaseButtonSize", "config": {} }
  ]));

  let started = Instant::now();
  let result = executor
    .execute(
      &actions,
      &HeadlessEnvironment::new(),
      Presentation::default(),
      &CancellationToken::new(),
    )
    .await
    .unwrap();
  let elapsed = started.elapsed();

  // Three known steps settle for 300ms each; the unknown one does not.
  assert!(elapsed >= Duration::from_millis(900), "{elapsed:?}");
  assert!(elapsed < Duration::from_millis(1200), "{elapsed:?}");
  assert_eq!(
    result.fragments,
    vec![Fragment::text("one"), Fragment::text("two")]
  );
}

#[tokio::test(start_paused = true)]
async fn test_cancel_during_delay() {
  let executor = Arc::new(ActionExecutor::new(
    ExecutorConfig {
      step_delay: Duration::from_secs(3600),
    },
    Arc::new(InMemoryKvStore::new()),
  ));
  let actions = actions(json!([
    { "id": "a", "type": "showText", "config": { "text": "one" } },
    { "id": "b", "type": "showText", "config": { "text": "two" } }
  ]));

  let cancel = CancellationToken::new();
  let cancel_clone = cancel.clone();
  let task = tokio::spawn(async move {
    executor
      .execute(
        &actions,
        &HeadlessEnvironment::new(),
        Presentation::default(),
        &cancel_clone,
      )
      .await
  });

  tokio::time::sleep(Duration::from_millis(10)).await;
  cancel.cancel();

  let result = task.await.unwrap();
  assert!(matches!(result, Err(ExecutionError::Cancelled)));
}

#[tokio::test]
async fn test_events_are_emitted_in_order() {
  let (sender, mut receiver) = mpsc::unbounded_channel();
  let executor = instant_executor(Arc::new(InMemoryKvStore::new()))
    .with_notifier(Arc::new(ChannelNotifier::new(sender)));
  let actions = actions(json!([
    { "id": "a", "type": "showText", "config": { "text": "Hi" } },
    { "id": "b", "type": "mystery", "config": {} },
    { "id": "c", "type": "disableButton", "config": {} }
  ]));

  executor
    .execute(
      &actions,
      &HeadlessEnvironment::new(),
      Presentation::default(),
      &CancellationToken::new(),
    )
    .await
    .unwrap();
  drop(executor);

  let mut events = Vec::new();
  while let Some(event) = receiver.recv().await {
    events.push(event);
  }

  assert!(matches!(
    events.first(),
    Some(ExecutionEvent::RunStarted { actions: 3, .. })
  ));
  assert!(events.iter().any(|e| matches!(
    e,
    ExecutionEvent::FragmentAdded { index: 0, fragment, .. } if *fragment == Fragment::text("Hi")
  )));
  assert!(events.iter().any(|e| matches!(
    e,
    ExecutionEvent::StepSkipped { index: 1, action_id, .. } if action_id == "b"
  )));
  assert!(events.iter().any(|e| matches!(
    e,
    ExecutionEvent::PresentationChanged { index: 2, presentation, .. } if presentation.disabled
  )));
  assert!(matches!(
    events.last(),
    Some(ExecutionEvent::RunCompleted {
      termination: Termination::Completed,
      ..
    })
  ));
}

#[tokio::test]
async fn test_random_color_on_every_invocation() {
  let executor = instant_executor(Arc::new(InMemoryKvStore::new()));
  let action = Action::new(ActionKind::ChangeButtonColor);

  for _ in 0..50 {
    let result = executor
      .execute(
        std::slice::from_ref(&action),
        &HeadlessEnvironment::new(),
        Presentation::default(),
        &CancellationToken::new(),
      )
      .await
      .unwrap();

    let color = result.presentation.color.unwrap();
    assert_eq!(color.len(), 7, "{color}");
    assert!(color.starts_with('#'), "{color}");
    assert!(
      color[1..].chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()),
      "{color}"
    );
  }
}

#[tokio::test]
async fn test_workflow_step_can_overwrite_saved_workflow() {
  let kv: Arc<dyn KvStore> = Arc::new(InMemoryKvStore::new());
  let store = WorkflowStore::new(kv.clone());

  let (workflow, id) = Workflow::new("Press").add_action(ActionKind::SetLocalStorage);
  let workflow = workflow.update_action_config(
    &id,
    ActionConfig::new()
      .with("key", WORKFLOW_SLOT)
      .with("value", "garbage"),
  );
  store.save(&workflow).await.unwrap();

  instant_executor(kv)
    .execute(
      &workflow.actions,
      &HeadlessEnvironment::new(),
      Presentation::default(),
      &CancellationToken::new(),
    )
    .await
    .unwrap();

  // The slot now holds an invalid document, so loading falls back.
  assert_eq!(store.load().await, Workflow::default());
}

#[tokio::test]
async fn test_runner_over_file_store() {
  let temp_dir = tempfile::tempdir().unwrap();
  let path = temp_dir.path().join("local_storage.json");

  let kv: Arc<dyn KvStore> = Arc::new(FileKvStore::open(&path).await.unwrap());
  let store = WorkflowStore::new(kv.clone());
  let (workflow, id) = Workflow::new("Save it").add_action(ActionKind::SetLocalStorage);
  let workflow =
    workflow.update_action_config(&id, ActionConfig::new().with("key", "theme").with("value", "dark"));
  let (workflow, _) = workflow.add_action(ActionKind::DisableButton);
  store.save(&workflow).await.unwrap();

  let env = Arc::new(HeadlessEnvironment::new());
  let (runner, handle) = ButtonRunner::new(Arc::new(instant_executor(kv)), store, env).await;
  handle.click().await.unwrap();
  handle.click().await.unwrap();
  let view = handle.subscribe();
  drop(handle);
  runner.start(CancellationToken::new()).await.unwrap();

  // The second click hits a disabled button.
  let view = view.borrow().clone();
  assert_eq!(view.runs, 1);
  assert!(view.presentation.disabled);
  assert_eq!(
    view.fragments,
    vec![Fragment::status("Saved to localStorage: theme = dark")]
  );

  let reopened = FileKvStore::open(&path).await.unwrap();
  assert_eq!(reopened.get("theme").await.unwrap(), Some("dark".to_string()));
  assert!(reopened.get(WORKFLOW_SLOT).await.unwrap().is_some());
}

#[tokio::test]
async fn test_window_close_stops_runner() {
  let kv: Arc<dyn KvStore> = Arc::new(InMemoryKvStore::new());
  let store = WorkflowStore::new(kv.clone());
  let (workflow, _) = Workflow::default().add_action(ActionKind::CloseWindow);
  store.save(&workflow).await.unwrap();

  let env = Arc::new(HeadlessEnvironment::new().allow_close(true));
  let (runner, handle) =
    ButtonRunner::new(Arc::new(instant_executor(kv)), store, env.clone()).await;
  handle.click().await.unwrap();

  // The handle is still alive, so only the close can end the loop.
  runner.start(CancellationToken::new()).await.unwrap();
  assert_eq!(env.close_requests().await, 1);
  assert!(handle.click().await.is_err());
}
