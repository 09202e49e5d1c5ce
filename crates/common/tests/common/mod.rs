//! Shared test utilities for drive integration tests
#![allow(dead_code)]

use bytes::Bytes;
use common::drive::{Drive, Entry};
use common::store::ObjectStorage;
use common::tree::Tree;

pub const OWNER: &str = "alice";

/// Set up a drive over in-memory storage with one owner already created.
///  The storage handle is returned as well so tests can inspect raw objects.
pub async fn setup_test_env() -> (Drive, ObjectStorage) {
    let storage = ObjectStorage::memory();
    let drive = Drive::from_storage(storage.clone());
    drive.create_owner(OWNER).await.unwrap();
    (drive, storage)
}

/// Write a text file, panicking on failure.
pub async fn write(drive: &Drive, path: &str, text: &str) {
    drive
        .write(OWNER, path, Bytes::from(text.to_string()))
        .await
        .unwrap();
}

/// Read a file back as text, panicking if it is missing or a folder.
pub async fn read_text(drive: &Drive, path: &str) -> String {
    match drive.read(OWNER, path).await.unwrap() {
        Entry::File(bytes) => String::from_utf8(bytes.to_vec()).unwrap(),
        Entry::Folder(node) => panic!("expected a file at {}, found folder {}", path, node.path()),
    }
}

/// Exact bytes of the stored tree document.
pub async fn raw_tree(storage: &ObjectStorage) -> Bytes {
    storage
        .get_object(&format!("users/{}/tree.json", OWNER))
        .await
        .unwrap()
        .unwrap()
}

/// Load the owner's tree and check every structural invariant.
pub async fn verified_tree(drive: &Drive) -> Tree {
    let tree = drive.tree(OWNER).await.unwrap();
    tree.verify().unwrap();
    tree
}
