//! Filesystem contracts: read-only and read-write.

use std::path::PathBuf;

use url::Url;

use crate::{Error, PathCodec, PathType, Resource, Timestamped};

/// Read access to a tree of directories and files.
///
/// A path that does not resolve is a normal outcome: lookups return `None`,
/// listings return an empty vector and timestamps return 0. Errors are
/// reserved for malformed arguments and backend failures.
pub trait ReadFileSystem: PathCodec {
    /// A short human readable description of the backend.
    fn description(&self) -> String;

    /// The kind of node at `path`, or `None` if it does not resolve.
    fn type_of(&self, path: &Self::Path) -> Result<Option<PathType>, Error>;

    /// The paths of the direct children of `dir`.
    ///
    /// Empty when `dir` is a file or does not resolve.
    fn children(&self, dir: &Self::Path) -> Result<Vec<Self::Path>, Error>;

    /// The path of the child `name` under `dir`, if there is one.
    fn child(&self, dir: &Self::Path, name: &str) -> Result<Option<Self::Path>, Error>;

    /// Last-modified instant in epoch millis, or 0 if `path` does not resolve.
    fn last_modified(&self, path: &Self::Path) -> Result<u64, Error>;

    /// The resource stored at `path` if it resolves to a file.
    fn resource(&self, path: &Self::Path) -> Result<Option<Timestamped<Resource>>, Error>;

    /// A URL from which the content at `path` can be loaded.
    fn url(&self, path: &Self::Path) -> Result<Url, Error>;

    /// The native file backing `path`, for backends that have one.
    fn file(&self, path: &Self::Path) -> Option<PathBuf>;

    fn exists(&self, path: &Self::Path) -> Result<bool, Error> {
        Ok(self.type_of(path)?.is_some())
    }

    fn is_dir(&self, path: &Self::Path) -> Result<bool, Error> {
        Ok(self.type_of(path)? == Some(PathType::Directory))
    }

    fn is_file(&self, path: &Self::Path) -> Result<bool, Error> {
        Ok(self.type_of(path)? == Some(PathType::File))
    }
}

/// Write access on top of [`ReadFileSystem`].
///
/// Implementations perform no locking: at most one writer may be active on
/// an instance at a time, which `&mut self` enforces for safe callers.
pub trait ReadWriteFileSystem: ReadFileSystem {
    /// Create the directory at `path` and any missing ancestors.
    ///
    /// Idempotent on an existing directory. Fails with `Error::Conflict` if
    /// a file sits anywhere along the way.
    fn create_dir(&mut self, path: &Self::Path) -> Result<(), Error>;

    /// Create or replace the file at `path`, creating missing ancestors.
    ///
    /// Returns the new last-modified instant. Fails with `Error::Conflict`
    /// when a file blocks descent or when `path` is a directory (including
    /// the root). A failed write does not undo directories it already
    /// created.
    fn update_resource(&mut self, path: &Self::Path, resource: Resource) -> Result<u64, Error>;

    /// Detach the node at `path` together with its whole subtree.
    ///
    /// Removing a path that does not resolve is a no-op that still returns
    /// `Ok(())`.
    fn remove_path(&mut self, path: &Self::Path) -> Result<(), Error>;
}

// Blanket implementations for references

impl<T: ReadFileSystem + ?Sized> ReadFileSystem for &T {
    fn description(&self) -> String {
        (**self).description()
    }

    fn type_of(&self, path: &Self::Path) -> Result<Option<PathType>, Error> {
        (**self).type_of(path)
    }

    fn children(&self, dir: &Self::Path) -> Result<Vec<Self::Path>, Error> {
        (**self).children(dir)
    }

    fn child(&self, dir: &Self::Path, name: &str) -> Result<Option<Self::Path>, Error> {
        (**self).child(dir, name)
    }

    fn last_modified(&self, path: &Self::Path) -> Result<u64, Error> {
        (**self).last_modified(path)
    }

    fn resource(&self, path: &Self::Path) -> Result<Option<Timestamped<Resource>>, Error> {
        (**self).resource(path)
    }

    fn url(&self, path: &Self::Path) -> Result<Url, Error> {
        (**self).url(path)
    }

    fn file(&self, path: &Self::Path) -> Option<PathBuf> {
        (**self).file(path)
    }
}

impl<T: PathCodec + ?Sized> PathCodec for &T {
    type Path = T::Path;

    fn root(&self) -> Self::Path {
        (**self).root()
    }

    fn make_path(&self, parent: &Self::Path, name: &str) -> Result<Self::Path, Error> {
        (**self).make_path(parent, name)
    }

    fn name<'a>(&self, path: &'a Self::Path) -> std::borrow::Cow<'a, str> {
        (**self).name(path)
    }

    fn names<'a>(
        &self,
        path: &'a Self::Path,
    ) -> Box<dyn Iterator<Item = std::borrow::Cow<'a, str>> + 'a> {
        (**self).names(path)
    }

    fn equals(&self, left: &Self::Path, right: &Self::Path) -> bool {
        (**self).equals(left, right)
    }
}
