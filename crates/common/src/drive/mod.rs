//! Owner-facing file operations
//!
//! A [`Drive`] ties the pure tree edits to storage. Every operation runs
//! one full cycle while holding the owner's lock:
//!
//! ```text
//! lock(owner) -> load tree -> edit private copy -> persist -> unlock
//! ```
//!
//! An edit that fails drops the copy, so the stored document only ever
//! changes as a whole. Different owners never wait on each other.

use std::collections::HashMap;
use std::str::Utf8Error;
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::store::{ContentStore, ObjectStorage, StoreError, TreeStore};
use crate::tree::{path, Node, NodeId, Tree, TreeError};

/// What lives at a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// A folder, with its full subtree
    Folder(Node),
    /// A file's content
    File(Bytes),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Created,
    Overwritten,
}

#[derive(Debug, thiserror::Error)]
pub enum DriveError {
    #[error(transparent)]
    Tree(#[from] TreeError),
    #[error("no tree for owner {0}")]
    OwnerNotFound(String),
    #[error("owner {0} already exists")]
    OwnerExists(String),
    #[error("content is not UTF-8 text: {0}")]
    NonTextContent(#[from] Utf8Error),
    #[error("file {path} points at missing content {id}")]
    DanglingReference { path: String, id: NodeId },
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

type LockTable = Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>;

/// Held for the length of one operation on an owner. Dropping the last
///  holder of an owner's lock takes its entry out of the table.
struct OwnerLock {
    guard: Option<OwnedMutexGuard<()>>,
    table: LockTable,
    owner: String,
}

impl Drop for OwnerLock {
    fn drop(&mut self) {
        drop(self.guard.take());
        let mut table = self.table.lock();
        // the table's own reference is the only one left
        if table
            .get(&self.owner)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            table.remove(&self.owner);
        }
    }
}

#[derive(Debug, Clone)]
pub struct Drive {
    trees: Arc<dyn TreeStore>,
    content: Arc<dyn ContentStore>,
    locks: LockTable,
}

impl Drive {
    pub fn new(trees: Arc<dyn TreeStore>, content: Arc<dyn ContentStore>) -> Self {
        Self {
            trees,
            content,
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Trees and content both kept in one object storage.
    pub fn from_storage(storage: ObjectStorage) -> Self {
        let storage = Arc::new(storage);
        Self::new(storage.clone(), storage)
    }

    async fn lock(&self, owner: &str) -> OwnerLock {
        let lock = self
            .locks
            .lock()
            .entry(owner.to_string())
            .or_default()
            .clone();
        OwnerLock {
            guard: Some(lock.lock_owned().await),
            table: self.locks.clone(),
            owner: owner.to_string(),
        }
    }

    async fn load(&self, owner: &str) -> Result<Tree, DriveError> {
        self.trees.load(owner).await.map_err(|e| match e {
            StoreError::NotFound(_) => DriveError::OwnerNotFound(owner.to_string()),
            e => e.into(),
        })
    }

    /// Give `owner` an empty tree.
    pub async fn create_owner(&self, owner: &str) -> Result<(), DriveError> {
        let _guard = self.lock(owner).await;
        if self.trees.exists(owner).await? {
            return Err(DriveError::OwnerExists(owner.to_string()));
        }
        self.trees.save(owner, &Tree::new()).await?;
        tracing::info!(owner, "created tree");
        Ok(())
    }

    pub async fn owner_exists(&self, owner: &str) -> Result<bool, DriveError> {
        Ok(self.trees.exists(owner).await?)
    }

    /// Snapshot of the owner's whole tree.
    pub async fn tree(&self, owner: &str) -> Result<Tree, DriveError> {
        let _guard = self.lock(owner).await;
        self.load(owner).await
    }

    /// Read a folder listing or a file's content.
    ///
    /// A file whose blob is missing is reported as
    ///  [`DriveError::DanglingReference`] rather than as empty content.
    pub async fn read(&self, owner: &str, path: &str) -> Result<Entry, DriveError> {
        let _guard = self.lock(owner).await;
        let tree = self.load(owner).await?;
        let node = tree
            .resolve(path)
            .ok_or_else(|| TreeError::NotFound(path::normalize(path)))?;

        if node.is_folder() {
            return Ok(Entry::Folder(node.clone()));
        }
        match self.content.get(owner, node.id()).await {
            Ok(bytes) => Ok(Entry::File(bytes)),
            Err(StoreError::NotFound(_)) => Err(DriveError::DanglingReference {
                path: node.path().to_string(),
                id: node.id().clone(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Create or overwrite the text file at `path`.
    ///
    /// Overwriting keeps the file's id and only replaces its blob, the
    ///  tree document is left alone. Creating synthesizes any missing
    ///  parent folders, stores the blob, then persists the tree.
    pub async fn write(
        &self,
        owner: &str,
        path: &str,
        content: Bytes,
    ) -> Result<WriteOutcome, DriveError> {
        std::str::from_utf8(&content)?;

        let _guard = self.lock(owner).await;
        let mut tree = self.load(owner).await?;

        if let Some(node) = tree.resolve(path) {
            if node.is_folder() {
                return Err(TreeError::WriteToFolder(node.path().to_string()).into());
            }
            self.content.put(owner, node.id(), content).await?;
            tracing::debug!(owner, path = %node.path(), id = %node.id(), "overwrote file");
            return Ok(WriteOutcome::Overwritten);
        }

        let id = tree.insert_file(path)?;
        self.content.put(owner, &id, content).await?;
        self.trees.save(owner, &tree).await?;
        tracing::debug!(owner, path = %path::normalize(path), %id, "created file");
        Ok(WriteOutcome::Created)
    }

    /// Move `from` (with its subtree) to `to`.
    pub async fn rename(&self, owner: &str, from: &str, to: &str) -> Result<(), DriveError> {
        let _guard = self.lock(owner).await;
        let mut tree = self.load(owner).await?;
        tree.move_node(from, to)?;
        self.trees.save(owner, &tree).await?;
        Ok(())
    }

    /// Delete the node at `path` and release the content of every file
    ///  underneath it. Returns how many blobs were released.
    ///
    /// The tree is persisted before any blob is touched, so an error while
    ///  removing blobs can only orphan content, never leave the tree
    ///  pointing at missing blobs.
    pub async fn delete(&self, owner: &str, path: &str) -> Result<usize, DriveError> {
        let _guard = self.lock(owner).await;
        let mut tree = self.load(owner).await?;
        let removed = tree.remove(path)?;
        self.trees.save(owner, &tree).await?;

        let ids = removed.file_ids();
        for id in &ids {
            self.content.remove(owner, id).await?;
        }
        tracing::debug!(owner, path = %removed.path(), blobs = ids.len(), "released content");
        Ok(ids.len())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn drive() -> Drive {
        Drive::from_storage(ObjectStorage::memory())
    }

    #[tokio::test]
    async fn test_create_owner_twice() {
        let drive = drive();
        drive.create_owner("alice").await.unwrap();
        assert!(matches!(
            drive.create_owner("alice").await,
            Err(DriveError::OwnerExists(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_owner() {
        let drive = drive();
        assert!(matches!(
            drive.read("ghost", "/").await,
            Err(DriveError::OwnerNotFound(_))
        ));
        assert!(matches!(
            drive.write("ghost", "/a", Bytes::from("x")).await,
            Err(DriveError::OwnerNotFound(_))
        ));
        assert!(drive.locks.lock().is_empty());
    }

    #[tokio::test]
    async fn test_lock_table_is_pruned() {
        let drive = drive();
        for i in 0..8 {
            let owner = format!("user{}", i);
            drive.create_owner(&owner).await.unwrap();
            drive
                .write(&owner, "/note", Bytes::from("x"))
                .await
                .unwrap();
        }
        assert!(drive.locks.lock().is_empty());

        let held = drive.lock("user0").await;
        assert_eq!(drive.locks.lock().len(), 1);
        drop(held);
        assert!(drive.locks.lock().is_empty());
    }

    #[tokio::test]
    async fn test_owners_are_isolated() {
        let drive = drive();
        drive.create_owner("alice").await.unwrap();
        drive.create_owner("bob").await.unwrap();

        drive
            .write("alice", "/secret", Bytes::from("mine"))
            .await
            .unwrap();

        assert!(matches!(
            drive.read("bob", "/secret").await,
            Err(DriveError::Tree(TreeError::NotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_concurrent_writes_to_one_owner() {
        let drive = drive();
        drive.create_owner("alice").await.unwrap();

        let mut handles = Vec::new();
        for i in 0..16 {
            let drive = drive.clone();
            handles.push(tokio::spawn(async move {
                drive
                    .write("alice", &format!("/dir/file{}", i), Bytes::from("x"))
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let tree = drive.tree("alice").await.unwrap();
        assert_eq!(tree.resolve("/dir").unwrap().children().len(), 16);
        tree.verify().unwrap();
        assert!(drive.locks.lock().is_empty());
    }
}
