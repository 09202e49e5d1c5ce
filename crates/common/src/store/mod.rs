//! Persistence contracts for trees and file content
//!
//! - **[`TreeStore`]**: one tree document per owner, always read and
//!   written whole
//! - **[`ContentStore`]**: file bytes keyed by `(owner, node id)`
//! - **[`ObjectStorage`]**: the `object_store` backed implementation of
//!   both, plus raw keyed objects for anything that is not part of a tree
//!
//! Objects are laid out as
//! ```text
//! users/{owner}/tree.json
//! users/{owner}/content/{id}
//! ```

use std::fmt::Debug;

use async_trait::async_trait;
use bytes::Bytes;

use crate::tree::{NodeId, Tree};

mod object;

pub use object::{ObjectStorage, StorageConfig};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("object storage error: {0}")]
    ObjectStore(#[from] object_store::Error),
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),
    #[error("corrupt tree document for {owner}: {reason}")]
    Corrupt { owner: String, reason: String },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Whole-document storage of owner trees.
#[async_trait]
pub trait TreeStore: Send + Sync + Debug {
    /// Whether `owner` has a tree document at all.
    async fn exists(&self, owner: &str) -> Result<bool, StoreError>;

    /// Load and verify the owner's tree.
    ///  Fails with [`StoreError::NotFound`] if the owner has no tree, and
    ///  with [`StoreError::Corrupt`] if the stored document breaks a
    ///  structural invariant.
    async fn load(&self, owner: &str) -> Result<Tree, StoreError>;

    /// Replace the owner's tree document.
    async fn save(&self, owner: &str, tree: &Tree) -> Result<(), StoreError>;
}

/// Owner-scoped blob storage for file content.
#[async_trait]
pub trait ContentStore: Send + Sync + Debug {
    async fn put(&self, owner: &str, id: &NodeId, content: Bytes) -> Result<(), StoreError>;

    /// Fetch a blob, [`StoreError::NotFound`] if there is none.
    async fn get(&self, owner: &str, id: &NodeId) -> Result<Bytes, StoreError>;

    /// Drop a blob. Removing a missing blob is not an error.
    async fn remove(&self, owner: &str, id: &NodeId) -> Result<(), StoreError>;
}
