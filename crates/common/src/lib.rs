/**
 * Owner-facing operations: read, write, rename
 *  and delete by path, each one a full
 *  load -> edit -> persist cycle under the
 *  owner's lock.
 */
pub mod drive;
/**
 * Storage contracts for tree documents and
 *  file content, and the object_store backed
 *  implementation of both.
 */
pub mod store;
/**
 * The path-addressed tree itself: nodes,
 *  lookup, parent synthesis and the pure
 *  in-memory edits.
 */
pub mod tree;
/**
 * Helper for setting build version information
 *  at compile time.
 */
pub mod version;

pub mod prelude {
    pub use crate::drive::{Drive, DriveError, Entry, WriteOutcome};
    pub use crate::store::{ContentStore, ObjectStorage, StorageConfig, StoreError, TreeStore};
    pub use crate::tree::{Node, NodeId, NodeKind, Tree, TreeError};
    pub use crate::version::{build_info, BuildInfo};
}
