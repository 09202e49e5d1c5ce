use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::path;

/// Reserved identifier of every tree's root folder.
pub const ROOT_ID: &str = "root";

/// Opaque, stable node identifier.
///  Assigned once when a node is created and never rewritten,
///  not even when the node is moved. For files it doubles as the
///  key of the content blob.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn root() -> Self {
        NodeId(ROOT_ID.to_string())
    }

    /// Fresh random identifier (32 lowercase hex characters).
    pub fn generate() -> Self {
        NodeId(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0 == ROOT_ID
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        NodeId(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Folder,
    File,
}

/**
 * Nodes
 * =====
 * A node is one entry of an owner's tree: either a folder, which
 *  contains other nodes, or a file, whose bytes live outside the
 *  tree in the content store under the node's id.
 * Every node carries its full path. This is redundant with its
 *  position in the tree, which is exactly why moves have to
 *  rewrite the paths of the whole moved subtree.
 * Serialized, a node looks like
 *  {"type":"folder","path":"/docs","id":"…","children":[…]}
 */
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "type")]
    kind: NodeKind,
    path: String,
    id: NodeId,
    #[serde(default)]
    children: Vec<Node>,
}

impl Node {
    pub(crate) fn root() -> Self {
        Node {
            kind: NodeKind::Folder,
            path: path::ROOT.to_string(),
            id: NodeId::root(),
            children: Vec::new(),
        }
    }

    pub(crate) fn folder(path: String) -> Self {
        Node {
            kind: NodeKind::Folder,
            path,
            id: NodeId::generate(),
            children: Vec::new(),
        }
    }

    pub(crate) fn file(path: String) -> Self {
        Node {
            kind: NodeKind::File,
            path,
            id: NodeId::generate(),
            children: Vec::new(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }

    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    /// Last segment of the node's path; empty for the root.
    pub fn name(&self) -> &str {
        path::name(&self.path)
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.name() == name)
    }

    pub(crate) fn child_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.children.iter_mut().find(|c| c.name() == name)
    }

    pub(crate) fn child_index(&self, name: &str) -> Option<usize> {
        self.children.iter().position(|c| c.name() == name)
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<Node> {
        &mut self.children
    }

    /// Detach the child with the given name.
    pub(crate) fn remove_child(&mut self, name: &str) -> Option<Node> {
        let index = self.child_index(name)?;
        Some(self.children.remove(index))
    }

    /// Point this node at `new_path` and rewrite every descendant so
    ///  that each keeps its own final segment under the new prefix.
    pub(crate) fn repath(&mut self, new_path: String) {
        for child in &mut self.children {
            let child_path = path::join(&new_path, child.name());
            child.repath(child_path);
        }
        self.path = new_path;
    }

    /// Ids of every file in this subtree, this node included.
    pub fn file_ids(&self) -> Vec<NodeId> {
        let mut ids = Vec::new();
        self.collect_file_ids(&mut ids);
        ids
    }

    fn collect_file_ids(&self, ids: &mut Vec<NodeId>) {
        match self.kind {
            NodeKind::File => ids.push(self.id.clone()),
            NodeKind::Folder => {
                for child in &self.children {
                    child.collect_file_ids(ids);
                }
            }
        }
    }

    /// Number of nodes in this subtree, this node included.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Node::count).sum::<usize>()
    }
}
