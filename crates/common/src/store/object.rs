use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use serde::{Deserialize, Serialize};

use super::{ContentStore, StoreError, TreeStore};
use crate::tree::{NodeId, Tree};

/// Which backend an [`ObjectStorage`] writes to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageConfig {
    /// In-memory storage, gone when the process exits
    #[default]
    Memory,

    /// Local filesystem storage
    Local {
        /// Root directory of the store, created if missing
        path: PathBuf,
    },
}

/// Trees, content blobs and raw objects on top of an `object_store` backend.
#[derive(Debug, Clone)]
pub struct ObjectStorage {
    inner: Arc<dyn ObjectStore>,
}

impl ObjectStorage {
    /// Create a new storage backend from configuration.
    pub async fn new(config: &StorageConfig) -> Result<Self, StoreError> {
        let inner: Arc<dyn ObjectStore> = match config {
            StorageConfig::Memory => Arc::new(InMemory::new()),

            StorageConfig::Local { path } => {
                tokio::fs::create_dir_all(path).await?;
                Arc::new(
                    LocalFileSystem::new_with_prefix(path)
                        .map_err(|e| StoreError::InvalidConfig(e.to_string()))?,
                )
            }
        };
        tracing::debug!(?config, "object storage ready");
        Ok(Self { inner })
    }

    /// In-memory storage.
    pub fn memory() -> Self {
        Self {
            inner: Arc::new(InMemory::new()),
        }
    }

    fn tree_path(owner: &str) -> ObjectPath {
        ObjectPath::from(format!("users/{}/tree.json", owner))
    }

    fn content_path(owner: &str, id: &NodeId) -> ObjectPath {
        ObjectPath::from(format!("users/{}/content/{}", owner, id))
    }

    /// Store raw bytes under `key`, replacing whatever was there.
    pub async fn put_object(&self, key: &str, data: Bytes) -> Result<(), StoreError> {
        self.inner.put(&ObjectPath::from(key), data.into()).await?;
        Ok(())
    }

    /// Fetch raw bytes stored under `key`, `None` if absent.
    pub async fn get_object(&self, key: &str) -> Result<Option<Bytes>, StoreError> {
        match self.inner.get(&ObjectPath::from(key)).await {
            Ok(result) => Ok(Some(result.bytes().await?)),
            Err(object_store::Error::NotFound { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete the object under `key`. Missing objects are ignored.
    pub async fn delete_object(&self, key: &str) -> Result<(), StoreError> {
        Self::ignore_missing(self.inner.delete(&ObjectPath::from(key)).await)
    }

    fn ignore_missing(result: object_store::Result<()>) -> Result<(), StoreError> {
        match result {
            Ok(()) => Ok(()),
            Err(object_store::Error::NotFound { .. }) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl TreeStore for ObjectStorage {
    async fn exists(&self, owner: &str) -> Result<bool, StoreError> {
        match self.inner.head(&Self::tree_path(owner)).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn load(&self, owner: &str) -> Result<Tree, StoreError> {
        let path = Self::tree_path(owner);
        let bytes = match self.inner.get(&path).await {
            Ok(result) => result.bytes().await?,
            Err(object_store::Error::NotFound { .. }) => {
                return Err(StoreError::NotFound(path.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        let tree: Tree = serde_json::from_slice(&bytes)?;
        tree.verify().map_err(|e| StoreError::Corrupt {
            owner: owner.to_string(),
            reason: e.to_string(),
        })?;
        Ok(tree)
    }

    async fn save(&self, owner: &str, tree: &Tree) -> Result<(), StoreError> {
        let data = serde_json::to_vec(tree)?;
        self.inner
            .put(&Self::tree_path(owner), Bytes::from(data).into())
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ContentStore for ObjectStorage {
    async fn put(&self, owner: &str, id: &NodeId, content: Bytes) -> Result<(), StoreError> {
        self.inner
            .put(&Self::content_path(owner, id), content.into())
            .await?;
        Ok(())
    }

    async fn get(&self, owner: &str, id: &NodeId) -> Result<Bytes, StoreError> {
        let path = Self::content_path(owner, id);
        match self.inner.get(&path).await {
            Ok(result) => Ok(result.bytes().await?),
            Err(object_store::Error::NotFound { .. }) => Err(StoreError::NotFound(path.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    async fn remove(&self, owner: &str, id: &NodeId) -> Result<(), StoreError> {
        Self::ignore_missing(self.inner.delete(&Self::content_path(owner, id)).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_tree_save_load() {
        let storage = ObjectStorage::memory();
        assert!(!storage.exists("alice").await.unwrap());

        let mut tree = Tree::new();
        tree.insert_file("/docs/readme").unwrap();
        storage.save("alice", &tree).await.unwrap();

        assert!(storage.exists("alice").await.unwrap());
        assert_eq!(storage.load("alice").await.unwrap(), tree);
        assert!(!storage.exists("bob").await.unwrap());
    }

    #[tokio::test]
    async fn test_load_missing_tree() {
        let storage = ObjectStorage::memory();
        assert!(matches!(
            storage.load("nobody").await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_load_rejects_corrupt_document() {
        let storage = ObjectStorage::memory();
        let document = serde_json::json!({
            "type": "folder", "path": "/", "id": "root", "children": [
                { "type": "file", "path": "/a", "id": "f1", "children": [] },
                { "type": "file", "path": "/a", "id": "f2", "children": [] }
            ]
        });
        storage
            .put_object(
                "users/alice/tree.json",
                Bytes::from(serde_json::to_vec(&document).unwrap()),
            )
            .await
            .unwrap();

        assert!(matches!(
            storage.load("alice").await,
            Err(StoreError::Corrupt { .. })
        ));
    }

    #[tokio::test]
    async fn test_load_rejects_garbage() {
        let storage = ObjectStorage::memory();
        storage
            .put_object("users/alice/tree.json", Bytes::from_static(b"not json"))
            .await
            .unwrap();
        assert!(matches!(
            storage.load("alice").await,
            Err(StoreError::Codec(_))
        ));
    }

    #[tokio::test]
    async fn test_content_is_owner_scoped() {
        let storage = ObjectStorage::memory();
        let id = NodeId::generate();

        storage
            .put("alice", &id, Bytes::from("hello"))
            .await
            .unwrap();

        assert_eq!(storage.get("alice", &id).await.unwrap(), "hello");
        assert!(matches!(
            storage.get("bob", &id).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_content_remove_is_idempotent() {
        let storage = ObjectStorage::memory();
        let id = NodeId::generate();
        storage.put("alice", &id, Bytes::new()).await.unwrap();

        storage.remove("alice", &id).await.unwrap();
        storage.remove("alice", &id).await.unwrap();
        assert!(storage.get("alice", &id).await.is_err());
    }

    #[tokio::test]
    async fn test_raw_objects() {
        let storage = ObjectStorage::memory();
        assert!(storage.get_object("accounts.json").await.unwrap().is_none());

        storage
            .put_object("accounts.json", Bytes::from("{}"))
            .await
            .unwrap();
        assert_eq!(
            storage.get_object("accounts.json").await.unwrap().unwrap(),
            "{}"
        );

        storage.delete_object("accounts.json").await.unwrap();
        storage.delete_object("accounts.json").await.unwrap();
        assert!(storage.get_object("accounts.json").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_local_storage_layout() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = StorageConfig::Local {
            path: temp_dir.path().join("data"),
        };
        let storage = ObjectStorage::new(&config).await.unwrap();

        let id = NodeId::generate();
        storage.save("alice", &Tree::new()).await.unwrap();
        storage
            .put("alice", &id, Bytes::from("bytes"))
            .await
            .unwrap();

        let user_dir = temp_dir.path().join("data").join("users").join("alice");
        assert!(user_dir.join("tree.json").exists());
        assert!(user_dir.join("content").join(id.as_str()).exists());
    }

    #[test]
    fn test_config_toml_shape() {
        let config: StorageConfig = toml::from_str("type = \"local\"\npath = \"/tmp/x\"").unwrap();
        assert_eq!(
            config,
            StorageConfig::Local {
                path: PathBuf::from("/tmp/x")
            }
        );
        let memory: StorageConfig = toml::from_str("type = \"memory\"").unwrap();
        assert_eq!(memory, StorageConfig::Memory);
    }
}
