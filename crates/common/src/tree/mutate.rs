use super::document::{Tree, TreeError};
use super::node::{Node, NodeId};
use super::path;

impl Tree {
    /// Create an empty file node at `path`, synthesizing missing parent
    ///  folders, and return its fresh id.
    ///
    /// The caller is expected to have checked that nothing lives at
    ///  `path` yet; an existing entry of either kind is reported as a
    ///  [`TreeError::NameConflict`].
    pub fn insert_file(&mut self, path: &str) -> Result<NodeId, TreeError> {
        let (parent_path, name) =
            path::split(path).ok_or_else(|| TreeError::WriteToFolder(path::ROOT.to_string()))?;

        let parent = self.ensure_parents(&parent_path)?;
        if let Some(existing) = parent.child(name) {
            return Err(TreeError::NameConflict(existing.path().to_string()));
        }

        let file = Node::file(path::join(parent.path(), name));
        let id = file.id().clone();
        tracing::debug!(path = %file.path(), id = %id, "creating file");
        parent.children_mut().push(file);
        Ok(id)
    }

    /// Move the node at `from` (and its whole subtree) to `to`.
    ///
    /// The destination is fully validated before anything is detached,
    ///  so a failed move leaves the tree exactly as it was. Ids are kept;
    ///  every path in the moved subtree is rewritten under the new prefix.
    pub fn move_node(&mut self, from: &str, to: &str) -> Result<(), TreeError> {
        let (from_parent, from_name) = path::split(from).ok_or(TreeError::RootProtected)?;
        let (to_parent, to_name) =
            path::split(to).ok_or_else(|| TreeError::InvalidPath(to.to_string()))?;

        let from = path::normalize(from);
        let to = path::normalize(to);
        if path::is_within(&to, &from) {
            return Err(TreeError::MoveIntoSelf { from, to });
        }

        if self.resolve(&from).is_none() {
            return Err(TreeError::NotFound(from));
        }
        self.check_destination(&to_parent, to_name)?;

        let mut node = self
            .resolve_mut(&from_parent)
            .and_then(|parent| parent.remove_child(from_name))
            .ok_or_else(|| TreeError::NotFound(from.clone()))?;
        node.repath(to.clone());

        let parent = self.ensure_parents(&to_parent)?;
        tracing::debug!(from = %from, to = %to, id = %node.id(), "moving node");
        parent.children_mut().push(node);
        Ok(())
    }

    /// Read-only check that `name` could be placed under `parent_path`:
    ///  every existing segment must be a folder and, if the parent
    ///  already exists, the name must be free.
    fn check_destination(&self, parent_path: &str, name: &str) -> Result<(), TreeError> {
        let mut current = self.root();
        for segment in path::segments(parent_path) {
            match current.child(segment) {
                Some(next) if next.is_folder() => current = next,
                Some(next) => return Err(TreeError::NotAFolder(next.path().to_string())),
                // The rest of the chain gets synthesized, so nothing can collide
                None => return Ok(()),
            }
        }
        match current.child(name) {
            Some(existing) => Err(TreeError::NameConflict(existing.path().to_string())),
            None => Ok(()),
        }
    }

    /// Detach the node at `path` and hand back the removed subtree.
    pub fn remove(&mut self, path: &str) -> Result<Node, TreeError> {
        let (parent_path, name) = path::split(path).ok_or(TreeError::RootProtected)?;
        let node = self
            .resolve_mut(&parent_path)
            .filter(|parent| parent.is_folder())
            .and_then(|parent| parent.remove_child(name))
            .ok_or_else(|| TreeError::NotFound(path::normalize(path)))?;
        tracing::debug!(path = %node.path(), id = %node.id(), nodes = node.count(), "removing node");
        Ok(node)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_insert_file_at_root() {
        let mut tree = Tree::new();
        let id = tree.insert_file("/readme").unwrap();
        let node = tree.resolve("/readme").unwrap();
        assert!(node.is_file());
        assert_eq!(node.id(), &id);
        tree.verify().unwrap();
    }

    #[test]
    fn test_insert_file_synthesizes_parents() {
        let mut tree = Tree::new();
        tree.insert_file("docs/guides/intro").unwrap();
        assert!(tree.resolve("/docs").unwrap().is_folder());
        assert!(tree.resolve("/docs/guides").unwrap().is_folder());
        assert_eq!(
            tree.resolve("/docs/guides/intro").unwrap().path(),
            "/docs/guides/intro"
        );
        tree.verify().unwrap();
    }

    #[test]
    fn test_insert_file_name_conflict() {
        let mut tree = Tree::new();
        tree.insert_file("/docs/readme").unwrap();
        assert_eq!(
            tree.insert_file("/docs/readme"),
            Err(TreeError::NameConflict("/docs/readme".to_string()))
        );
        tree.ensure_parents("/docs/sub").unwrap();
        assert_eq!(
            tree.insert_file("/docs/sub"),
            Err(TreeError::NameConflict("/docs/sub".to_string()))
        );
    }

    #[test]
    fn test_insert_file_under_file() {
        let mut tree = Tree::new();
        tree.insert_file("/notes").unwrap();
        assert_eq!(
            tree.insert_file("/notes/today"),
            Err(TreeError::NotAFolder("/notes".to_string()))
        );
        assert_eq!(
            tree.insert_file("/notes/a/b"),
            Err(TreeError::NotAFolder("/notes".to_string()))
        );
    }

    #[test]
    fn test_insert_file_at_root_path_is_rejected() {
        let mut tree = Tree::new();
        assert!(matches!(
            tree.insert_file("/"),
            Err(TreeError::WriteToFolder(_))
        ));
    }

    #[test]
    fn test_move_preserves_subtree_shape_and_ids() {
        let mut tree = Tree::new();
        let x = tree.insert_file("/a/x").unwrap();
        let z = tree.insert_file("/a/y/z").unwrap();
        let a = tree.resolve("/a").unwrap().id().clone();

        tree.move_node("/a", "/b").unwrap();

        assert!(tree.resolve("/a").is_none());
        assert_eq!(tree.resolve("/b").unwrap().id(), &a);
        assert_eq!(tree.resolve("/b/x").unwrap().id(), &x);
        assert_eq!(tree.resolve("/b/y/z").unwrap().id(), &z);
        assert_eq!(tree.resolve("/b/y/z").unwrap().path(), "/b/y/z");
        tree.verify().unwrap();
    }

    #[test]
    fn test_move_into_new_parents() {
        let mut tree = Tree::new();
        tree.insert_file("/file").unwrap();
        tree.move_node("/file", "/deep/er/renamed").unwrap();
        assert!(tree.resolve("/file").is_none());
        assert!(tree.resolve("/deep/er/renamed").unwrap().is_file());
        tree.verify().unwrap();
    }

    #[test]
    fn test_move_root_is_protected() {
        let mut tree = Tree::new();
        tree.insert_file("/a").unwrap();
        let before = tree.clone();
        assert_eq!(tree.move_node("/", "/b"), Err(TreeError::RootProtected));
        assert_eq!(tree.move_node("", "/b"), Err(TreeError::RootProtected));
        assert_eq!(tree, before);
    }

    #[test]
    fn test_move_to_empty_path() {
        let mut tree = Tree::new();
        tree.insert_file("/a").unwrap();
        assert!(matches!(
            tree.move_node("/a", ""),
            Err(TreeError::InvalidPath(_))
        ));
        assert!(matches!(
            tree.move_node("/a", "/"),
            Err(TreeError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_move_into_self() {
        let mut tree = Tree::new();
        tree.insert_file("/a/x").unwrap();
        let before = tree.clone();
        assert!(matches!(
            tree.move_node("/a", "/a/inner"),
            Err(TreeError::MoveIntoSelf { .. })
        ));
        assert!(matches!(
            tree.move_node("/a", "/a"),
            Err(TreeError::MoveIntoSelf { .. })
        ));
        assert_eq!(tree, before);
    }

    #[test]
    fn test_move_conflict_leaves_tree_untouched() {
        let mut tree = Tree::new();
        tree.insert_file("/a").unwrap();
        tree.insert_file("/dir/a").unwrap();
        let before = tree.clone();

        assert_eq!(
            tree.move_node("/a", "/dir/a"),
            Err(TreeError::NameConflict("/dir/a".to_string()))
        );
        assert_eq!(tree, before);
    }

    #[test]
    fn test_move_through_file_leaves_tree_untouched() {
        let mut tree = Tree::new();
        tree.insert_file("/a").unwrap();
        tree.insert_file("/blocker").unwrap();
        let before = tree.clone();

        assert_eq!(
            tree.move_node("/a", "/blocker/sub/a"),
            Err(TreeError::NotAFolder("/blocker".to_string()))
        );
        assert_eq!(tree, before);
    }

    #[test]
    fn test_move_missing_source() {
        let mut tree = Tree::new();
        assert_eq!(
            tree.move_node("/missing", "/b"),
            Err(TreeError::NotFound("/missing".to_string()))
        );
    }

    #[test]
    fn test_move_within_same_folder() {
        let mut tree = Tree::new();
        let id = tree.insert_file("/dir/old").unwrap();
        tree.move_node("/dir/old", "/dir/new").unwrap();
        let dir = tree.resolve("/dir").unwrap();
        assert_eq!(dir.children().len(), 1);
        assert_eq!(dir.child("new").unwrap().id(), &id);
    }

    #[test]
    fn test_remove_subtree() {
        let mut tree = Tree::new();
        tree.insert_file("/a/x").unwrap();
        tree.insert_file("/a/y/z").unwrap();
        tree.insert_file("/keep").unwrap();

        let removed = tree.remove("/a").unwrap();

        assert_eq!(removed.file_ids().len(), 2);
        assert!(tree.resolve("/a").is_none());
        assert!(tree.resolve("/keep").is_some());
        tree.verify().unwrap();
    }

    #[test]
    fn test_remove_root_and_missing() {
        let mut tree = Tree::new();
        assert_eq!(tree.remove("/"), Err(TreeError::RootProtected));
        assert_eq!(
            tree.remove("/nope"),
            Err(TreeError::NotFound("/nope".to_string()))
        );
    }
}
