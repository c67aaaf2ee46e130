//! The in-memory filesystem.

use std::borrow::Cow;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use bytes::Bytes;
use url::Url;
use uuid::Uuid;

use pathfs_core::{
    Error, Path, PathCodec, PathType, ReadFileSystem, ReadWriteFileSystem, Resource,
    SegmentCodec, Timestamped, UrlHandler, UrlLoader,
};

use crate::clock::{Clock, SystemClock};
use crate::config::RamConfig;
use crate::tree::Tree;
use crate::url_handler::{url_for, RamUrlHandler};

/// An ephemeral filesystem held entirely in memory.
///
/// Content is addressed by segment [`Path`]s and exposed for URL-based
/// loading under a base URL unique to this instance, `<scheme>://<uuid>/`.
/// Bind it into a [`UrlLoader`] with [`RamFileSystem::bind`].
///
/// Writes take `&mut self`; there is no transaction discipline, and callers
/// that share an instance across threads must serialize writers themselves.
/// The tree sits behind a lock only so that the URL handler can read it.
///
/// # Example
///
/// ```rust
/// use pathfs_core::{path, ReadFileSystem, ReadWriteFileSystem, Resource, UrlLoader};
/// use pathfs_ram::RamFileSystem;
///
/// let mut fs = RamFileSystem::new();
/// fs.update_resource(&path!("docs/readme.txt"), Resource::from_text("hello")).unwrap();
///
/// let mut loader = UrlLoader::new();
/// fs.bind(&mut loader);
///
/// let url = fs.url(&path!("docs/readme.txt")).unwrap();
/// assert_eq!(loader.open(&url).unwrap(), "hello");
/// ```
pub struct RamFileSystem {
    tree: Arc<RwLock<Tree>>,
    handler: Arc<RamUrlHandler>,
    clock: Arc<dyn Clock>,
}

impl RamFileSystem {
    /// An empty filesystem under the `ram` scheme, stamped by the system clock.
    pub fn new() -> Self {
        // The default scheme always forms a valid base URL.
        Self::with_clock(RamConfig::default(), Arc::new(SystemClock))
            .expect("default RAM configuration is valid")
    }

    pub fn with_config(config: RamConfig) -> Result<Self, Error> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: RamConfig, clock: Arc<dyn Clock>) -> Result<Self, Error> {
        config.validate()?;
        let base = Url::parse(&format!("{}://{}/", config.scheme, Uuid::new_v4()))?;
        let tree = Arc::new(RwLock::new(Tree::new(clock.now_millis())));
        let handler = Arc::new(RamUrlHandler::new(base, Arc::downgrade(&tree)));
        Ok(Self {
            tree,
            handler,
            clock,
        })
    }

    /// The base URL of this instance.
    pub fn base_url(&self) -> &Url {
        self.handler.base()
    }

    /// The handler serving this instance's URLs.
    pub fn url_handler(&self) -> Arc<RamUrlHandler> {
        Arc::clone(&self.handler)
    }

    /// Register this instance's URL handler with `loader`.
    pub fn bind(&self, loader: &mut UrlLoader) {
        loader.register(self.base_url(), self.url_handler());
    }

    /// Read the bytes behind one of this instance's URLs.
    pub fn open_url(&self, url: &Url) -> Result<Bytes, Error> {
        self.handler.open(url)
    }

    /// Number of live nodes, the root included.
    pub fn node_count(&self) -> usize {
        self.read_tree().len()
    }

    fn read_tree(&self) -> RwLockReadGuard<'_, Tree> {
        self.tree.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_tree(&self) -> RwLockWriteGuard<'_, Tree> {
        self.tree.write().unwrap_or_else(PoisonError::into_inner)
    }

    #[cfg(test)]
    pub(crate) fn node_id(&self, path: &Path) -> Option<crate::tree::NodeId> {
        self.read_tree().lookup(segments(path))
    }
}

impl Default for RamFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RamFileSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RamFileSystem")
            .field("base", self.base_url())
            .field("nodes", &self.node_count())
            .finish()
    }
}

fn segments(path: &Path) -> impl Iterator<Item = &str> {
    path.iter().map(String::as_str)
}

/// Reject paths carrying an empty, `/`-bearing or relative segment before
/// any traversal.
fn check_path(path: &Path) -> Result<(), Error> {
    path.validate()
        .map_err(|e| Error::invalid_argument(format!("malformed path {:?}: {}", path, e)))
}

impl PathCodec for RamFileSystem {
    type Path = Path;

    fn root(&self) -> Path {
        SegmentCodec.root()
    }

    fn make_path(&self, parent: &Path, name: &str) -> Result<Path, Error> {
        SegmentCodec.make_path(parent, name)
    }

    fn name<'a>(&self, path: &'a Path) -> Cow<'a, str> {
        SegmentCodec.name(path)
    }

    fn names<'a>(&self, path: &'a Path) -> Box<dyn Iterator<Item = Cow<'a, str>> + 'a> {
        SegmentCodec.names(path)
    }

    fn equals(&self, left: &Path, right: &Path) -> bool {
        SegmentCodec.equals(left, right)
    }
}

impl ReadFileSystem for RamFileSystem {
    fn description(&self) -> String {
        format!("ram[{}]", self.base_url())
    }

    fn type_of(&self, path: &Path) -> Result<Option<PathType>, Error> {
        let tree = self.read_tree();
        Ok(tree
            .lookup(segments(path))
            .and_then(|id| tree.node(id))
            .map(|node| node.path_type()))
    }

    fn children(&self, dir: &Path) -> Result<Vec<Path>, Error> {
        let tree = self.read_tree();
        let Some(id) = tree.lookup(segments(dir)) else {
            return Ok(Vec::new());
        };
        tree.child_names(id)
            .into_iter()
            .map(|name| dir.child(name).map_err(Error::from))
            .collect()
    }

    fn child(&self, dir: &Path, name: &str) -> Result<Option<Path>, Error> {
        let tree = self.read_tree();
        match tree.lookup(segments(dir)).and_then(|id| tree.child(id, name)) {
            Some(_) => Ok(Some(dir.child(name)?)),
            None => Ok(None),
        }
    }

    fn last_modified(&self, path: &Path) -> Result<u64, Error> {
        let tree = self.read_tree();
        Ok(tree
            .lookup(segments(path))
            .and_then(|id| tree.node(id))
            .map_or(0, |node| node.last_modified()))
    }

    fn resource(&self, path: &Path) -> Result<Option<Timestamped<Resource>>, Error> {
        check_path(path)?;
        let tree = self.read_tree();
        Ok(tree
            .lookup(segments(path))
            .and_then(|id| tree.resource(id))
            .cloned())
    }

    fn url(&self, path: &Path) -> Result<Url, Error> {
        check_path(path)?;
        url_for(self.base_url(), segments(path))
    }

    /// Always `None`: nothing here lives on disk. Use [`url`](Self::url) or
    /// [`resource`](Self::resource) to stream content instead.
    fn file(&self, _path: &Path) -> Option<PathBuf> {
        None
    }
}

impl ReadWriteFileSystem for RamFileSystem {
    fn create_dir(&mut self, path: &Path) -> Result<(), Error> {
        check_path(path)?;
        let now = self.clock.now_millis();
        self.write_tree().ensure_dir(segments(path), now)?;
        Ok(())
    }

    fn update_resource(&mut self, path: &Path, resource: Resource) -> Result<u64, Error> {
        check_path(path)?;
        let now = self.clock.now_millis();
        let names: Vec<&str> = segments(path).collect();
        self.write_tree().write(&names, resource, now)
    }

    /// Detach the node at `path` and its subtree.
    ///
    /// A path that does not resolve is accepted silently and still reports
    /// success. The root cannot be removed: that is
    /// `Error::InvalidArgument`.
    fn remove_path(&mut self, path: &Path) -> Result<(), Error> {
        check_path(path)?;
        if path.is_root() {
            return Err(Error::invalid_argument("the root cannot be removed"));
        }
        let mut tree = self.write_tree();
        match tree.lookup(segments(path)) {
            Some(id) => {
                log::debug!("Removing {}", path);
                tree.remove(id);
            }
            None => log::trace!("Nothing to remove at {}", path),
        }
        Ok(())
    }
}
