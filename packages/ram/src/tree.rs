//! Arena-backed directory tree.
//!
//! Nodes live in slots addressed by [`NodeId`]. A directory maps child names
//! to ids; every node keeps the id of its owning directory. The arena is the
//! only owner of node lifetime: detaching a node removes it from its parent's
//! mapping, clears its parent id, and returns the slots of the whole detached
//! subtree to the free list.

use std::collections::HashMap;

use pathfs_core::{Error, PathType, Resource, Timestamped};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

#[derive(Debug)]
pub(crate) struct Node {
    name: String,
    parent: Option<NodeId>,
    kind: NodeKind,
}

#[derive(Debug)]
pub(crate) enum NodeKind {
    Directory {
        children: HashMap<String, NodeId>,
        last_modified: u64,
    },
    File {
        resource: Timestamped<Resource>,
    },
}

impl Node {
    #[cfg(test)]
    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    #[cfg(test)]
    pub(crate) fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub(crate) fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub(crate) fn path_type(&self) -> PathType {
        match self.kind {
            NodeKind::Directory { .. } => PathType::Directory,
            NodeKind::File { .. } => PathType::File,
        }
    }

    pub(crate) fn last_modified(&self) -> u64 {
        match &self.kind {
            NodeKind::Directory { last_modified, .. } => *last_modified,
            NodeKind::File { resource } => resource.last_modified,
        }
    }

    fn directory(name: String, parent: Option<NodeId>, last_modified: u64) -> Self {
        Node {
            name,
            parent,
            kind: NodeKind::Directory {
                children: HashMap::new(),
                last_modified,
            },
        }
    }
}

#[derive(Debug)]
pub(crate) struct Tree {
    slots: Vec<Option<Node>>,
    free: Vec<NodeId>,
    root: NodeId,
}

impl Tree {
    pub(crate) fn new(now: u64) -> Self {
        Tree {
            slots: vec![Some(Node::directory(String::new(), None, now))],
            free: Vec::new(),
            root: NodeId(0),
        }
    }

    pub(crate) fn root(&self) -> NodeId {
        self.root
    }

    pub(crate) fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Number of live nodes, the root included.
    pub(crate) fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// The child `name` of `dir`; `None` if `dir` is not a directory.
    pub(crate) fn child(&self, dir: NodeId, name: &str) -> Option<NodeId> {
        match &self.node(dir)?.kind {
            NodeKind::Directory { children, .. } => children.get(name).copied(),
            NodeKind::File { .. } => None,
        }
    }

    /// Child names of `dir`, or nothing if `dir` is not a directory.
    pub(crate) fn child_names(&self, dir: NodeId) -> Vec<&str> {
        match self.node(dir).map(Node::kind) {
            Some(NodeKind::Directory { children, .. }) => {
                children.keys().map(String::as_str).collect()
            }
            _ => Vec::new(),
        }
    }

    /// Walk from the root, one segment at a time.
    ///
    /// A segment under a file does not resolve.
    pub(crate) fn lookup<'a, I>(&self, names: I) -> Option<NodeId>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut current = self.root;
        for name in names {
            current = self.child(current, name)?;
        }
        Some(current)
    }

    pub(crate) fn resource(&self, id: NodeId) -> Option<&Timestamped<Resource>> {
        match &self.node(id)?.kind {
            NodeKind::File { resource } => Some(resource),
            NodeKind::Directory { .. } => None,
        }
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.slots[id.0] = Some(node);
                id
            }
            None => {
                self.slots.push(Some(node));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    /// Allocate `node` and register it in its parent's mapping.
    fn attach(&mut self, dir: NodeId, node: Node) -> NodeId {
        let name = node.name.clone();
        let id = self.alloc(node);
        if let Some(NodeKind::Directory { children, .. }) = self.node_mut(dir).map(|n| &mut n.kind)
        {
            children.insert(name, id);
        }
        id
    }

    /// Walk `names` from the root, creating missing directories stamped with
    /// `now`. Returns the final directory.
    pub(crate) fn ensure_dir<'a, I>(&mut self, names: I, now: u64) -> Result<NodeId, Error>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut current = self.root;
        let mut walked: Vec<&str> = Vec::new();
        for name in names {
            walked.push(name);
            current = match self.child(current, name) {
                None => {
                    log::debug!("Creating directory {}", walked.join("/"));
                    self.attach(
                        current,
                        Node::directory(name.to_string(), Some(current), now),
                    )
                }
                Some(next) => match self.node(next).map(Node::path_type) {
                    Some(PathType::Directory) => next,
                    _ => {
                        return Err(Error::conflict(walked.join("/"), "a file already exists"));
                    }
                },
            };
        }
        Ok(current)
    }

    /// Store `resource` at the file named by `names`, creating it and any
    /// missing parent directories.
    ///
    /// An existing file keeps its node and gets a timestamp no earlier than
    /// its previous one.
    pub(crate) fn write(
        &mut self,
        names: &[&str],
        resource: Resource,
        now: u64,
    ) -> Result<u64, Error> {
        let Some((name, parents)) = names.split_last() else {
            return Err(Error::conflict("", "the root is a directory"));
        };
        let dir = self.ensure_dir(parents.iter().copied(), now)?;

        match self.child(dir, name) {
            None => {
                log::debug!("Creating file {}", names.join("/"));
                self.attach(
                    dir,
                    Node {
                        name: name.to_string(),
                        parent: Some(dir),
                        kind: NodeKind::File {
                            resource: Timestamped::new(now, resource),
                        },
                    },
                );
                Ok(now)
            }
            Some(id) => match self.node_mut(id).map(|n| &mut n.kind) {
                Some(NodeKind::File { resource: current }) => {
                    let last_modified = now.max(current.last_modified);
                    log::debug!("Updating file {}", names.join("/"));
                    *current = Timestamped::new(last_modified, resource);
                    Ok(last_modified)
                }
                _ => Err(Error::conflict(names.join("/"), "a directory already exists")),
            },
        }
    }

    /// Detach `id` from its parent and release its subtree.
    ///
    /// Returns `false` for the root, which has no parent to detach from.
    pub(crate) fn remove(&mut self, id: NodeId) -> bool {
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        let Some(parent) = node.parent.take() else {
            return false;
        };
        let name = node.name.clone();
        if let Some(NodeKind::Directory { children, .. }) =
            self.node_mut(parent).map(|n| &mut n.kind)
        {
            children.remove(&name);
        }
        self.release(id);
        true
    }

    fn release(&mut self, id: NodeId) {
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(node) = self.slots.get_mut(next.0).and_then(Option::take) {
                if let NodeKind::Directory { children, .. } = node.kind {
                    pending.extend(children.into_values());
                }
                self.free.push(next);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(path: &str) -> Vec<&str> {
        path.split('/').filter(|s| !s.is_empty()).collect()
    }

    #[test]
    fn new_tree_has_only_root() {
        let tree = Tree::new(7);
        assert_eq!(tree.len(), 1);
        let root = tree.node(tree.root()).unwrap();
        assert_eq!(root.name(), "");
        assert_eq!(root.parent(), None);
        assert_eq!(root.last_modified(), 7);
        assert_eq!(tree.lookup(split("")), Some(tree.root()));
    }

    #[test]
    fn ensure_dir_creates_intermediates() {
        let mut tree = Tree::new(0);
        let leaf = tree.ensure_dir(split("a/b/c"), 10).unwrap();
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.lookup(split("a/b/c")), Some(leaf));

        let b = tree.lookup(split("a/b")).unwrap();
        assert_eq!(tree.node(leaf).unwrap().parent(), Some(b));
        assert_eq!(tree.node(b).unwrap().last_modified(), 10);

        // Idempotent
        assert_eq!(tree.ensure_dir(split("a/b/c"), 20).unwrap(), leaf);
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn lookup_under_file_does_not_resolve() {
        let mut tree = Tree::new(0);
        tree.write(&split("f"), Resource::from_text("x"), 1).unwrap();
        assert!(tree.lookup(split("f")).is_some());
        assert_eq!(tree.lookup(split("f/g")), None);
        assert!(tree.child_names(tree.lookup(split("f")).unwrap()).is_empty());
    }

    #[test]
    fn write_updates_in_place() {
        let mut tree = Tree::new(0);
        assert_eq!(tree.write(&split("d/f"), Resource::from_text("1"), 5).unwrap(), 5);
        let id = tree.lookup(split("d/f")).unwrap();

        assert_eq!(tree.write(&split("d/f"), Resource::from_text("2"), 9).unwrap(), 9);
        assert_eq!(tree.lookup(split("d/f")), Some(id));
        assert_eq!(tree.resource(id).unwrap().value.text(), Some("2"));
    }

    #[test]
    fn write_never_moves_timestamp_backwards() {
        let mut tree = Tree::new(0);
        tree.write(&split("f"), Resource::from_text("1"), 100).unwrap();
        assert_eq!(tree.write(&split("f"), Resource::from_text("2"), 50).unwrap(), 100);
    }

    #[test]
    fn write_conflicts() {
        let mut tree = Tree::new(0);
        tree.ensure_dir(split("dir"), 0).unwrap();
        tree.write(&split("file"), Resource::default(), 0).unwrap();

        assert!(tree.write(&split("dir"), Resource::default(), 0).unwrap_err().is_conflict());
        assert!(tree.write(&split("file/x"), Resource::default(), 0).unwrap_err().is_conflict());
        assert!(tree.write(&[], Resource::default(), 0).unwrap_err().is_conflict());
        assert!(tree.ensure_dir(split("file/x"), 0).unwrap_err().is_conflict());
    }

    #[test]
    fn remove_detaches_and_releases_subtree() {
        let mut tree = Tree::new(0);
        tree.write(&split("a/b/f1"), Resource::default(), 0).unwrap();
        tree.write(&split("a/b/f2"), Resource::default(), 0).unwrap();
        tree.ensure_dir(split("keep"), 0).unwrap();
        assert_eq!(tree.len(), 6);

        let a = tree.lookup(split("a")).unwrap();
        assert!(tree.remove(a));
        assert_eq!(tree.lookup(split("a")), None);
        assert_eq!(tree.lookup(split("a/b/f1")), None);
        assert_eq!(tree.child_names(tree.root()), vec!["keep"]);
        assert_eq!(tree.len(), 2);
        assert!(tree.node(a).is_none());

        // Released slots are reused.
        tree.write(&split("x/y"), Resource::default(), 0).unwrap();
        assert_eq!(tree.slots.len(), 6);
    }

    #[test]
    fn root_cannot_be_removed() {
        let mut tree = Tree::new(0);
        let root = tree.root();
        assert!(!tree.remove(root));
        assert_eq!(tree.lookup(split("")), Some(root));
    }
}
