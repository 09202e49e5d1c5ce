//! Per-owner folder/file hierarchy
//!
//! Every owner has exactly one [`Tree`]: a root folder (`id = "root"`,
//! `path = "/"`) holding folders and files. The tree only describes
//! structure; file bytes live in a [`ContentStore`](crate::store::ContentStore)
//! keyed by the file node's [`NodeId`].
//!
//! ```text
//!               / (root)
//!                  |
//!        +---------+---------+
//!        |                   |
//!      /docs              /notes   -> content blob <id>
//!        |
//!   /docs/readme  -> content blob <id>
//! ```
//!
//! # Invariants
//!
//! - every child's path is its parent's path plus one segment
//! - names are unique among siblings, ids are unique in the tree
//! - files never have children, the root is never moved or removed
//!
//! Mutations ([`Tree::insert_file`], [`Tree::move_node`], [`Tree::remove`])
//! uphold these on success and leave the tree untouched on failure.
//! Missing parent folders are synthesized on demand by
//! [`Tree::ensure_parents`].

mod document;
mod mutate;
mod node;
mod parents;
pub mod path;

pub use document::{Tree, TreeError};
pub use node::{Node, NodeId, NodeKind, ROOT_ID};
