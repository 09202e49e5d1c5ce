use super::document::{Tree, TreeError};
use super::node::Node;
use super::path;

impl Tree {
    /// Make sure every folder along `parent_path` exists and return the
    ///  deepest one.
    ///
    /// Missing folders are created with fresh ids; existing folders are
    ///  reused, so a second call with the same path creates nothing.
    ///  Hitting a file on the way fails with [`TreeError::NotAFolder`].
    ///  Creation only starts past the last existing segment, so a failed
    ///  call never leaves new folders behind.
    pub fn ensure_parents(&mut self, parent_path: &str) -> Result<&mut Node, TreeError> {
        let mut current = self.root_mut();
        for segment in path::segments(parent_path) {
            let index = match current.child_index(segment) {
                Some(index) => {
                    let existing = &current.children()[index];
                    if !existing.is_folder() {
                        return Err(TreeError::NotAFolder(existing.path().to_string()));
                    }
                    index
                }
                None => {
                    let folder = Node::folder(path::join(current.path(), segment));
                    tracing::debug!(path = %folder.path(), id = %folder.id(), "creating folder");
                    let children = current.children_mut();
                    children.push(folder);
                    children.len() - 1
                }
            };
            current = &mut current.children_mut()[index];
        }
        Ok(current)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_ensure_parents_creates_chain() {
        let mut tree = Tree::new();
        let deepest = tree.ensure_parents("/a/b/c").unwrap();
        assert_eq!(deepest.path(), "/a/b/c");
        assert!(deepest.is_folder());

        let a = tree.resolve("/a").unwrap();
        assert_eq!(a.children().len(), 1);
        assert_eq!(tree.resolve("/a/b").unwrap().children().len(), 1);
        tree.verify().unwrap();
    }

    #[test]
    fn test_ensure_parents_is_idempotent() {
        let mut tree = Tree::new();
        tree.ensure_parents("/a/b/c").unwrap();
        let before = tree.clone();

        tree.ensure_parents("a/b/c/").unwrap();

        assert_eq!(tree, before);
        assert_eq!(tree.root().count(), 4);
    }

    #[test]
    fn test_ensure_parents_of_root_is_root() {
        let mut tree = Tree::new();
        let root = tree.ensure_parents("/").unwrap();
        assert_eq!(root.path(), "/");
        assert_eq!(tree.root().count(), 1);
    }

    #[test]
    fn test_ensure_parents_reuses_existing_prefix() {
        let mut tree = Tree::new();
        tree.ensure_parents("/a/b").unwrap();
        let b_id = tree.resolve("/a/b").unwrap().id().clone();

        tree.ensure_parents("/a/b/x/y").unwrap();

        assert_eq!(tree.resolve("/a/b").unwrap().id(), &b_id);
        assert!(tree.resolve("/a/b/x/y").unwrap().is_folder());
        tree.verify().unwrap();
    }

    #[test]
    fn test_ensure_parents_fails_through_file() {
        let mut tree = Tree::new();
        tree.insert_file("/a/file").unwrap();

        let result = tree.ensure_parents("/a/file/sub");
        assert_eq!(
            result.err(),
            Some(TreeError::NotAFolder("/a/file".to_string()))
        );
        assert!(tree.resolve("/a/file/sub").is_none());
    }
}
