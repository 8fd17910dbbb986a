use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::Error;

/// Trait for the persisted key-value store workflows read and write.
///
/// Keys and values are plain strings. The store is shared by everything that
/// runs in the same host: workflow steps and the saved workflow document use
/// the same key space.
#[async_trait]
pub trait KvStore: Send + Sync {
  /// Get a value by key.
  async fn get(&self, key: &str) -> Result<Option<String>, Error>;

  /// Set a value, replacing any previous one.
  async fn set(&self, key: &str, value: String) -> Result<(), Error>;

  /// Delete a value. Deleting a missing key is not an error.
  async fn remove(&self, key: &str) -> Result<(), Error>;

  /// List all keys in sorted order.
  async fn keys(&self) -> Result<Vec<String>, Error>;
}

/// In-memory KV store implementation.
///
/// Suitable for tests and headless runs.
#[derive(Debug, Default)]
pub struct InMemoryKvStore {
  data: Mutex<BTreeMap<String, String>>,
}

impl InMemoryKvStore {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl KvStore for InMemoryKvStore {
  async fn get(&self, key: &str) -> Result<Option<String>, Error> {
    Ok(self.data.lock().await.get(key).cloned())
  }

  async fn set(&self, key: &str, value: String) -> Result<(), Error> {
    self.data.lock().await.insert(key.to_string(), value);
    Ok(())
  }

  async fn remove(&self, key: &str) -> Result<(), Error> {
    self.data.lock().await.remove(key);
    Ok(())
  }

  async fn keys(&self) -> Result<Vec<String>, Error> {
    Ok(self.data.lock().await.keys().cloned().collect())
  }
}

/// File-backed KV store.
///
/// The whole store is one JSON object of string values:
/// ```text
/// {root}/local_storage.json
/// { "buttonWorkflow": "{...}", "theme": "dark" }
/// ```
///
/// The file is read once when the store is opened and rewritten in full on
/// every change. Other processes writing the same file are not coordinated
/// with; whichever write lands last wins.
#[derive(Debug)]
pub struct FileKvStore {
  path: PathBuf,
  data: Mutex<BTreeMap<String, String>>,
}

impl FileKvStore {
  /// Open the store at `path`.
  ///
  /// A missing file starts an empty store. A file that is not a JSON object
  /// is treated as empty and gets replaced on the next write. Non-string
  /// values in a valid object are kept as their JSON text.
  pub async fn open(path: impl Into<PathBuf>) -> Result<Self, Error> {
    let path = path.into();
    let data = match fs::read_to_string(&path).await {
      Ok(content) => match serde_json::from_str::<Map<String, Value>>(&content) {
        Ok(object) => object
          .into_iter()
          .map(|(key, value)| (key, value_text(value)))
          .collect(),
        Err(e) => {
          warn!(path = %path.display(), error = %e, "corrupt store file, starting empty");
          BTreeMap::new()
        }
      },
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
        debug!(path = %path.display(), "store file not found, starting empty");
        BTreeMap::new()
      }
      Err(e) => return Err(Error::Io(e)),
    };

    Ok(Self {
      path,
      data: Mutex::new(data),
    })
  }

  async fn persist(&self, data: &BTreeMap<String, String>) -> Result<(), Error> {
    if let Some(parent) = self.path.parent()
      && !parent.as_os_str().is_empty()
    {
      fs::create_dir_all(parent).await?;
    }
    let content = serde_json::to_string_pretty(data)?;
    fs::write(&self.path, content).await?;
    Ok(())
  }
}

fn value_text(value: Value) -> String {
  match value {
    Value::String(s) => s,
    other => other.to_string(),
  }
}

#[async_trait]
impl KvStore for FileKvStore {
  async fn get(&self, key: &str) -> Result<Option<String>, Error> {
    Ok(self.data.lock().await.get(key).cloned())
  }

  async fn set(&self, key: &str, value: String) -> Result<(), Error> {
    let mut data = self.data.lock().await;
    data.insert(key.to_string(), value);
    self.persist(&data).await
  }

  async fn remove(&self, key: &str) -> Result<(), Error> {
    let mut data = self.data.lock().await;
    if data.remove(key).is_some() {
      self.persist(&data).await?;
    }
    Ok(())
  }

  async fn keys(&self) -> Result<Vec<String>, Error> {
    Ok(self.data.lock().await.keys().cloned().collect())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_in_memory_kv_store() {
    let store = InMemoryKvStore::new();

    assert_eq!(store.get("key").await.unwrap(), None);

    store.set("key", "value".to_string()).await.unwrap();
    assert_eq!(store.get("key").await.unwrap(), Some("value".to_string()));

    store.set("key", "updated".to_string()).await.unwrap();
    assert_eq!(store.get("key").await.unwrap(), Some("updated".to_string()));

    store.remove("key").await.unwrap();
    assert_eq!(store.get("key").await.unwrap(), None);
  }

  #[tokio::test]
  async fn test_file_store_persists_across_opens() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("nested").join("local_storage.json");

    let store = FileKvStore::open(&path).await.unwrap();
    store.set("b", "2".to_string()).await.unwrap();
    store.set("a", "1".to_string()).await.unwrap();
    drop(store);

    let reopened = FileKvStore::open(&path).await.unwrap();
    assert_eq!(reopened.get("a").await.unwrap(), Some("1".to_string()));
    assert_eq!(reopened.keys().await.unwrap(), vec!["a", "b"]);

    reopened.remove("a").await.unwrap();
    let reopened = FileKvStore::open(&path).await.unwrap();
    assert_eq!(reopened.get("a").await.unwrap(), None);
  }

  #[tokio::test]
  async fn test_file_store_treats_corrupt_file_as_empty() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("local_storage.json");
    std::fs::write(&path, "not json at all").unwrap();

    let store = FileKvStore::open(&path).await.unwrap();
    assert!(store.keys().await.unwrap().is_empty());

    store.set("k", "v".to_string()).await.unwrap();
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("\"k\": \"v\""));
  }

  #[tokio::test]
  async fn test_file_store_keeps_non_string_values_as_text() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("local_storage.json");
    std::fs::write(&path, r#"{"n": 1, "flag": true, "name": "ada", "list": [1, 2]}"#).unwrap();

    let store = FileKvStore::open(&path).await.unwrap();
    assert_eq!(store.get("n").await.unwrap().as_deref(), Some("1"));
    assert_eq!(store.get("flag").await.unwrap().as_deref(), Some("true"));
    assert_eq!(store.get("name").await.unwrap().as_deref(), Some("ada"));
    assert_eq!(store.get("list").await.unwrap().as_deref(), Some("[1,2]"));

    store.set("k", "v".to_string()).await.unwrap();
    let reopened = FileKvStore::open(&path).await.unwrap();
    assert_eq!(reopened.keys().await.unwrap(), vec!["flag", "k", "list", "n", "name"]);
    assert_eq!(reopened.get("n").await.unwrap().as_deref(), Some("1"));
  }
}
