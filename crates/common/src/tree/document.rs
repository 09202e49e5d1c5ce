use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::node::{Node, NodeId, ROOT_ID};
use super::path;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("path not found: {0}")]
    NotFound(String),
    #[error("cannot write to folder: {0}")]
    WriteToFolder(String),
    #[error("not a folder: {0}")]
    NotAFolder(String),
    #[error("name already exists: {0}")]
    NameConflict(String),
    #[error("the root folder cannot be renamed or deleted")]
    RootProtected,
    #[error("invalid path: {0:?}")]
    InvalidPath(String),
    #[error("cannot move '{from}' to '{to}': destination is inside source")]
    MoveIntoSelf { from: String, to: String },
    #[error("corrupt tree document: {0}")]
    Corrupt(String),
}

/// One owner's whole hierarchy.
///  Serializes as its root node, which is the tree document
///  persisted by a [`TreeStore`](crate::store::TreeStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tree {
    root: Node,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// A tree holding nothing but the root folder.
    pub fn new() -> Self {
        Tree { root: Node::root() }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub(crate) fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    /// Look up the node at `path`.
    ///
    /// An empty path or `/` is the root. Each segment must match a child
    ///  of the folder reached so far; there are no partial results, and
    ///  a file can't be descended into.
    pub fn resolve(&self, path: &str) -> Option<&Node> {
        let mut current = &self.root;
        for segment in path::segments(path) {
            if !current.is_folder() {
                return None;
            }
            current = current.child(segment)?;
        }
        Some(current)
    }

    pub(crate) fn resolve_mut(&mut self, path: &str) -> Option<&mut Node> {
        let mut current = &mut self.root;
        for segment in path::segments(path) {
            if !current.is_folder() {
                return None;
            }
            current = current.child_mut(segment)?;
        }
        Some(current)
    }

    /// Check every structural invariant of the document.
    pub fn verify(&self) -> Result<(), TreeError> {
        if !self.root.is_folder() || self.root.path() != path::ROOT || !self.root.id().is_root()
        {
            return Err(TreeError::Corrupt(format!(
                "root must be a folder at '/' with id '{}'",
                ROOT_ID
            )));
        }
        let mut ids = HashSet::new();
        ids.insert(self.root.id().clone());
        Self::verify_children(&self.root, &mut ids)
    }

    fn verify_children(parent: &Node, ids: &mut HashSet<NodeId>) -> Result<(), TreeError> {
        if parent.is_file() && !parent.children().is_empty() {
            return Err(TreeError::Corrupt(format!(
                "file {} has children",
                parent.path()
            )));
        }

        let mut names = HashSet::new();
        for child in parent.children() {
            let name = child.name();
            if name.is_empty() || child.path() != path::join(parent.path(), name) {
                return Err(TreeError::Corrupt(format!(
                    "{} is not a direct child of {}",
                    child.path(),
                    parent.path()
                )));
            }
            if !names.insert(name) {
                return Err(TreeError::Corrupt(format!(
                    "duplicate name {}",
                    child.path()
                )));
            }
            if !ids.insert(child.id().clone()) {
                return Err(TreeError::Corrupt(format!(
                    "duplicate id {} at {}",
                    child.id(),
                    child.path()
                )));
            }
            Self::verify_children(child, ids)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn document(json: serde_json::Value) -> Tree {
        serde_json::from_value(json).unwrap()
    }

    fn sample() -> Tree {
        document(serde_json::json!({
            "type": "folder", "path": "/", "id": "root", "children": [
                { "type": "folder", "path": "/docs", "id": "d1", "children": [
                    { "type": "file", "path": "/docs/readme", "id": "f1", "children": [] }
                ]},
                { "type": "file", "path": "/notes", "id": "f2", "children": [] }
            ]
        }))
    }

    #[test]
    fn test_resolve_root() {
        let tree = sample();
        assert_eq!(tree.resolve("").unwrap().path(), "/");
        assert_eq!(tree.resolve("/").unwrap().path(), "/");
        assert_eq!(tree.resolve("//").unwrap().path(), "/");
    }

    #[test]
    fn test_resolve_nested() {
        let tree = sample();
        let node = tree.resolve("/docs/readme").unwrap();
        assert_eq!(node.id().as_str(), "f1");
        assert_eq!(tree.resolve("docs/readme/").unwrap().id().as_str(), "f1");
    }

    #[test]
    fn test_resolve_missing_has_no_partial_result() {
        let tree = sample();
        assert!(tree.resolve("/docs/missing").is_none());
        assert!(tree.resolve("/missing/readme").is_none());
    }

    #[test]
    fn test_resolve_does_not_descend_into_files() {
        let tree = sample();
        assert!(tree.resolve("/notes/anything").is_none());
    }

    #[test]
    fn test_resolve_is_case_sensitive() {
        let tree = sample();
        assert!(tree.resolve("/Docs").is_none());
    }

    #[test]
    fn test_verify_accepts_well_formed_tree() {
        sample().verify().unwrap();
        Tree::new().verify().unwrap();
    }

    #[test]
    fn test_verify_rejects_bad_child_path() {
        let tree = document(serde_json::json!({
            "type": "folder", "path": "/", "id": "root", "children": [
                { "type": "folder", "path": "/docs", "id": "d1", "children": [
                    { "type": "file", "path": "/elsewhere/readme", "id": "f1", "children": [] }
                ]}
            ]
        }));
        assert!(matches!(tree.verify(), Err(TreeError::Corrupt(_))));
    }

    #[test]
    fn test_verify_rejects_duplicate_names() {
        let tree = document(serde_json::json!({
            "type": "folder", "path": "/", "id": "root", "children": [
                { "type": "file", "path": "/a", "id": "f1", "children": [] },
                { "type": "file", "path": "/a", "id": "f2", "children": [] }
            ]
        }));
        assert!(matches!(tree.verify(), Err(TreeError::Corrupt(_))));
    }

    #[test]
    fn test_verify_rejects_wrong_root() {
        let tree = document(serde_json::json!({
            "type": "folder", "path": "/", "id": "not-root", "children": []
        }));
        assert!(matches!(tree.verify(), Err(TreeError::Corrupt(_))));
    }
}
