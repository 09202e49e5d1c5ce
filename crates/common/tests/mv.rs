//! Integration tests for Drive rename (move) operations

mod common;

use ::common::drive::DriveError;
use ::common::tree::TreeError;

use self::common::{raw_tree, read_text, setup_test_env, verified_tree, write, OWNER};

#[tokio::test]
async fn test_mv_file() {
    let (drive, _) = setup_test_env().await;
    write(&drive, "/old.txt", "data").await;

    drive.rename(OWNER, "/old.txt", "/new.txt").await.unwrap();

    assert!(drive.read(OWNER, "/old.txt").await.is_err());
    assert_eq!(read_text(&drive, "/new.txt").await, "data");
    verified_tree(&drive).await;
}

#[tokio::test]
async fn test_mv_folder_preserves_shape_ids_and_content() {
    let (drive, _) = setup_test_env().await;
    write(&drive, "/a/x", "x").await;
    write(&drive, "/a/y/z", "z").await;
    let before = verified_tree(&drive).await;
    let a = before.resolve("/a").unwrap().clone();

    drive.rename(OWNER, "/a", "/b").await.unwrap();

    let after = verified_tree(&drive).await;
    assert!(after.resolve("/a").is_none());
    let b = after.resolve("/b").unwrap();
    assert_eq!(b.id(), a.id());
    assert_eq!(b.count(), a.count());
    assert_eq!(b.file_ids(), a.file_ids());
    assert_eq!(after.resolve("/b/y").unwrap().path(), "/b/y");
    assert_eq!(after.resolve("/b/y/z").unwrap().path(), "/b/y/z");
    assert_eq!(read_text(&drive, "/b/x").await, "x");
    assert_eq!(read_text(&drive, "/b/y/z").await, "z");
}

#[tokio::test]
async fn test_mv_creates_missing_parents() {
    let (drive, _) = setup_test_env().await;
    write(&drive, "/file.txt", "data").await;

    drive
        .rename(OWNER, "/file.txt", "/subdir/deeper/file.txt")
        .await
        .unwrap();

    let tree = verified_tree(&drive).await;
    assert!(tree.resolve("/subdir/deeper").unwrap().is_folder());
    assert_eq!(read_text(&drive, "/subdir/deeper/file.txt").await, "data");
}

#[tokio::test]
async fn test_mv_root_is_protected() {
    let (drive, storage) = setup_test_env().await;
    write(&drive, "/a", "a").await;
    let before = raw_tree(&storage).await;

    let result = drive.rename(OWNER, "/", "/elsewhere").await;

    assert!(matches!(
        result,
        Err(DriveError::Tree(TreeError::RootProtected))
    ));
    assert_eq!(raw_tree(&storage).await, before);
}

#[tokio::test]
async fn test_mv_into_own_subtree_is_rejected() {
    let (drive, storage) = setup_test_env().await;
    write(&drive, "/parent/child", "c").await;
    let before = raw_tree(&storage).await;

    let result = drive.rename(OWNER, "/parent", "/parent/child/inner").await;

    assert!(matches!(
        result,
        Err(DriveError::Tree(TreeError::MoveIntoSelf { .. }))
    ));
    assert_eq!(raw_tree(&storage).await, before);
}

#[tokio::test]
async fn test_mv_onto_existing_name_keeps_source() {
    let (drive, storage) = setup_test_env().await;
    write(&drive, "/src", "source").await;
    write(&drive, "/dst", "destination").await;
    let before = raw_tree(&storage).await;

    let result = drive.rename(OWNER, "/src", "/dst").await;

    assert!(matches!(
        result,
        Err(DriveError::Tree(TreeError::NameConflict(_)))
    ));
    assert_eq!(raw_tree(&storage).await, before);
    assert_eq!(read_text(&drive, "/src").await, "source");
    assert_eq!(read_text(&drive, "/dst").await, "destination");
}

#[tokio::test]
async fn test_mv_below_file_keeps_source() {
    let (drive, storage) = setup_test_env().await;
    write(&drive, "/src", "source").await;
    write(&drive, "/blocker", "file").await;
    let before = raw_tree(&storage).await;

    let result = drive.rename(OWNER, "/src", "/blocker/src").await;

    assert!(matches!(
        result,
        Err(DriveError::Tree(TreeError::NotAFolder(_)))
    ));
    assert_eq!(raw_tree(&storage).await, before);
    assert_eq!(read_text(&drive, "/src").await, "source");
}

#[tokio::test]
async fn test_mv_missing_source() {
    let (drive, _) = setup_test_env().await;

    let result = drive.rename(OWNER, "/nope", "/other").await;

    assert!(matches!(
        result,
        Err(DriveError::Tree(TreeError::NotFound(_)))
    ));
}

#[tokio::test]
async fn test_mv_to_empty_path() {
    let (drive, _) = setup_test_env().await;
    write(&drive, "/a", "a").await;

    let result = drive.rename(OWNER, "/a", "").await;

    assert!(matches!(
        result,
        Err(DriveError::Tree(TreeError::InvalidPath(_)))
    ));
    assert_eq!(read_text(&drive, "/a").await, "a");
}

#[tokio::test]
async fn test_mv_sibling_with_common_prefix_is_allowed() {
    let (drive, _) = setup_test_env().await;
    write(&drive, "/a/file", "f").await;

    drive.rename(OWNER, "/a", "/ab").await.unwrap();

    assert_eq!(read_text(&drive, "/ab/file").await, "f");
}
