//! pathfs disk backend: the filesystem contract over a native directory.
//!
//! Paths are `PathBuf`s relative to the store root; the empty path is the
//! root itself. Only plain name components are accepted, so a path can never
//! escape the root.

use std::borrow::Cow;
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use url::Url;

use pathfs_core::{
    system_time_millis, Error, PathCodec, PathType, ReadFileSystem, ReadWriteFileSystem,
    Resource, Timestamped,
};

/// A filesystem rooted at a directory on disk.
///
/// Resource metadata is not persisted: reading a file back yields its bytes
/// only.
#[derive(Debug, Clone)]
pub struct DiskFileSystem {
    root: PathBuf,
}

impl DiskFileSystem {
    /// Open the directory at `root`.
    ///
    /// The root must exist, be a directory and be writable.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, Error> {
        let root = root.into();
        let attr = fs::metadata(&root).map_err(|source| Error::RootInvalid {
            path: root.clone(),
            source,
        })?;

        if !attr.is_dir() {
            return Err(Error::RootInvalid {
                path: root,
                source: io::Error::other("root path must be a directory"),
            });
        }

        if attr.permissions().readonly() {
            return Err(Error::RootInvalid {
                path: root,
                source: io::Error::other("root directory must be writable"),
            });
        }

        match root.canonicalize() {
            Ok(root) => Ok(DiskFileSystem { root }),
            Err(source) => Err(Error::RootInvalid { path: root, source }),
        }
    }

    /// The canonical root directory.
    pub fn root_dir(&self) -> &Path {
        &self.root
    }

    /// The native location of `path`, refusing anything but plain names.
    fn native(&self, path: &Path) -> Result<PathBuf, Error> {
        let mut native = self.root.clone();
        for component in path.components() {
            match component {
                Component::Normal(name) => native.push(name),
                other => {
                    return Err(Error::invalid_argument(format!(
                        "unsupported component {:?} in {}",
                        other.as_os_str(),
                        path.display()
                    )))
                }
            }
        }
        Ok(native)
    }

    /// Metadata of `native`, `None` if nothing is there.
    fn metadata(native: &Path) -> Result<Option<fs::Metadata>, Error> {
        match fs::metadata(native) {
            Ok(attr) => Ok(Some(attr)),
            Err(e) if is_absent(&e) => Ok(None),
            Err(e) => Err(Error::Io(e)),
        }
    }
}

fn is_absent(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}

fn modified_millis(attr: &fs::Metadata) -> Result<u64, Error> {
    Ok(system_time_millis(attr.modified()?))
}

impl PathCodec for DiskFileSystem {
    type Path = PathBuf;

    fn root(&self) -> PathBuf {
        PathBuf::new()
    }

    fn make_path(&self, parent: &PathBuf, name: &str) -> Result<PathBuf, Error> {
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(Error::invalid_argument(format!(
                "'{}' is not a valid name",
                name
            )));
        }
        Ok(parent.join(name))
    }

    fn name<'a>(&self, path: &'a PathBuf) -> Cow<'a, str> {
        path.file_name()
            .map(OsStr::to_string_lossy)
            .unwrap_or(Cow::Borrowed(""))
    }

    fn names<'a>(&self, path: &'a PathBuf) -> Box<dyn Iterator<Item = Cow<'a, str>> + 'a> {
        Box::new(path.components().filter_map(|component| match component {
            Component::Normal(name) => Some(name.to_string_lossy()),
            _ => None,
        }))
    }

    fn equals(&self, left: &PathBuf, right: &PathBuf) -> bool {
        self.names(left).eq(self.names(right))
    }
}

impl ReadFileSystem for DiskFileSystem {
    fn description(&self) -> String {
        format!("disk[{}]", self.root.display())
    }

    fn type_of(&self, path: &PathBuf) -> Result<Option<PathType>, Error> {
        let native = self.native(path)?;
        Ok(Self::metadata(&native)?.map(|attr| {
            if attr.is_dir() {
                PathType::Directory
            } else {
                PathType::File
            }
        }))
    }

    fn children(&self, dir: &PathBuf) -> Result<Vec<PathBuf>, Error> {
        let native = self.native(dir)?;
        let entries = match fs::read_dir(&native) {
            Ok(entries) => entries,
            Err(e) if is_absent(&e) => return Ok(Vec::new()),
            Err(e) => return Err(Error::Io(e)),
        };
        let mut children = entries
            .map(|entry| entry.map(|entry| dir.join(entry.file_name())))
            .collect::<Result<Vec<_>, io::Error>>()?;
        children.sort();
        Ok(children)
    }

    fn child(&self, dir: &PathBuf, name: &str) -> Result<Option<PathBuf>, Error> {
        if !self.is_dir(dir)? {
            return Ok(None);
        }
        let Ok(child) = self.make_path(dir, name) else {
            return Ok(None);
        };
        Ok(self.exists(&child)?.then_some(child))
    }

    fn last_modified(&self, path: &PathBuf) -> Result<u64, Error> {
        let native = self.native(path)?;
        match Self::metadata(&native)? {
            Some(attr) => modified_millis(&attr),
            None => Ok(0),
        }
    }

    fn resource(&self, path: &PathBuf) -> Result<Option<Timestamped<Resource>>, Error> {
        let native = self.native(path)?;
        match Self::metadata(&native)? {
            Some(attr) if attr.is_file() => {
                log::debug!("Reading {}...", native.display());
                let content = fs::read(&native)?;
                Ok(Some(Timestamped::new(
                    modified_millis(&attr)?,
                    Resource::new(content),
                )))
            }
            _ => Ok(None),
        }
    }

    fn url(&self, path: &PathBuf) -> Result<Url, Error> {
        let native = self.native(path)?;
        Url::from_file_path(&native).map_err(|()| {
            Error::invalid_argument(format!("{} has no file URL", native.display()))
        })
    }

    fn file(&self, path: &PathBuf) -> Option<PathBuf> {
        self.native(path).ok()
    }
}

impl ReadWriteFileSystem for DiskFileSystem {
    fn create_dir(&mut self, path: &PathBuf) -> Result<(), Error> {
        self.native(path)?;
        let mut walked = PathBuf::new();
        for name in self.names(path) {
            walked.push(&*name);
            let native = self.root.join(&walked);
            match Self::metadata(&native)? {
                None => {
                    log::debug!("Creating directory {}...", native.display());
                    fs::create_dir(&native)?;
                }
                Some(attr) if attr.is_dir() => {}
                Some(_) => {
                    return Err(Error::conflict(
                        walked.display(),
                        "a file already exists",
                    ))
                }
            }
        }
        Ok(())
    }

    fn update_resource(&mut self, path: &PathBuf, resource: Resource) -> Result<u64, Error> {
        let native = self.native(path)?;
        let Some(parent) = path.parent() else {
            return Err(Error::conflict("", "the root is a directory"));
        };
        self.create_dir(&parent.to_path_buf())?;

        if let Some(attr) = Self::metadata(&native)? {
            if attr.is_dir() {
                return Err(Error::conflict(
                    path.display(),
                    "a directory already exists",
                ));
            }
        }

        log::debug!("Writing {}...", native.display());
        fs::write(&native, &resource.content)?;
        modified_millis(&fs::metadata(&native)?)
    }

    /// Delete the file or directory tree at `path`.
    ///
    /// A path that does not resolve is accepted silently. The root cannot be
    /// removed.
    fn remove_path(&mut self, path: &PathBuf) -> Result<(), Error> {
        let native = self.native(path)?;
        if native == self.root {
            return Err(Error::invalid_argument("the root cannot be removed"));
        }
        match Self::metadata(&native)? {
            Some(attr) if attr.is_dir() => {
                log::debug!("Removing directory {}...", native.display());
                fs::remove_dir_all(&native)?;
            }
            Some(_) => {
                log::debug!("Removing {}...", native.display());
                fs::remove_file(&native)?;
            }
            None => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disk() -> (tempfile::TempDir, DiskFileSystem) {
        let dir = tempfile::tempdir().unwrap();
        let fs = DiskFileSystem::new(dir.path()).unwrap();
        (dir, fs)
    }

    fn p(s: &str) -> PathBuf {
        PathBuf::from(s)
    }

    #[test]
    fn root_must_be_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain");
        fs::write(&file, b"x").unwrap();

        assert!(matches!(
            DiskFileSystem::new(&file),
            Err(Error::RootInvalid { .. })
        ));
        assert!(matches!(
            DiskFileSystem::new(dir.path().join("missing")),
            Err(Error::RootInvalid { .. })
        ));
    }

    #[test]
    fn codec_over_path_bufs() {
        let (_dir, fs) = disk();
        let root = fs.root();
        let docs = fs.make_path(&root, "docs").unwrap();
        let readme = fs.make_path(&docs, "readme.txt").unwrap();
        assert_eq!(readme, p("docs/readme.txt"));
        assert_eq!(fs.name(&readme), "readme.txt");
        assert_eq!(fs.name(&root), "");
        assert_eq!(fs.names(&readme).collect::<Vec<_>>(), ["docs", "readme.txt"]);
        assert!(fs.equals(&readme, &p("docs/readme.txt")));
        assert!(!fs.equals(&readme, &docs));

        for bad in ["", ".", "..", "a/b"] {
            assert!(fs.make_path(&root, bad).unwrap_err().is_invalid_argument());
        }
    }

    #[test]
    fn unusable_child_names_are_absent() {
        let (_dir, mut fs) = disk();
        fs.create_dir(&p("docs")).unwrap();
        for bad in ["", ".", "..", "a/b"] {
            assert_eq!(fs.child(&p("docs"), bad).unwrap(), None);
        }
        assert_eq!(fs.child(&p("docs"), "missing").unwrap(), None);
    }

    #[test]
    fn escaping_paths_rejected() {
        let (_dir, fs) = disk();
        assert!(fs.type_of(&p("../etc")).unwrap_err().is_invalid_argument());
        assert!(fs.resource(&p("/etc/passwd")).unwrap_err().is_invalid_argument());
        assert_eq!(fs.file(&p("../x")), None);
    }

    #[test]
    fn write_read_and_list() {
        let (dir, mut fs) = disk();
        let ts = fs
            .update_resource(&p("docs/readme.txt"), Resource::from_text("hello"))
            .unwrap();
        assert!(ts > 0);

        assert_eq!(fs.type_of(&p("docs")).unwrap(), Some(PathType::Directory));
        assert_eq!(fs.type_of(&p("docs/readme.txt")).unwrap(), Some(PathType::File));
        assert_eq!(fs.children(&fs.root()).unwrap(), vec![p("docs")]);
        assert_eq!(
            fs.child(&p("docs"), "readme.txt").unwrap(),
            Some(p("docs/readme.txt"))
        );

        let resource = fs.resource(&p("docs/readme.txt")).unwrap().unwrap();
        assert_eq!(resource.value.text(), Some("hello"));
        assert_eq!(resource.last_modified, ts);

        assert_eq!(
            fs.file(&p("docs/readme.txt")),
            Some(dir.path().canonicalize().unwrap().join("docs/readme.txt"))
        );
    }

    #[test]
    fn absent_paths() {
        let (_dir, mut fs) = disk();
        fs.update_resource(&p("f"), Resource::from_text("x")).unwrap();
        assert_eq!(fs.type_of(&p("missing")).unwrap(), None);
        assert_eq!(fs.type_of(&p("f/below")).unwrap(), None);
        assert!(fs.children(&p("missing")).unwrap().is_empty());
        assert!(fs.children(&p("f")).unwrap().is_empty());
        assert_eq!(fs.child(&p("f"), "x").unwrap(), None);
        assert_eq!(fs.last_modified(&p("missing")).unwrap(), 0);
        assert_eq!(fs.resource(&p("missing")).unwrap(), None);
        assert_eq!(fs.resource(&fs.root()).unwrap(), None);
    }

    #[test]
    fn conflicts() {
        let (_dir, mut fs) = disk();
        fs.create_dir(&p("a")).unwrap();
        fs.update_resource(&p("f"), Resource::from_text("x")).unwrap();

        assert!(fs
            .update_resource(&p("a"), Resource::from_text("y"))
            .unwrap_err()
            .is_conflict());
        assert!(fs.create_dir(&p("f/sub")).unwrap_err().is_conflict());
        assert!(fs
            .update_resource(&p("f/sub/g"), Resource::default())
            .unwrap_err()
            .is_conflict());
        assert!(fs
            .update_resource(&fs.root(), Resource::default())
            .unwrap_err()
            .is_conflict());
    }

    #[test]
    fn remove_is_lenient() {
        let (_dir, mut fs) = disk();
        fs.update_resource(&p("a/b/c"), Resource::from_text("x")).unwrap();
        fs.remove_path(&p("a")).unwrap();
        assert_eq!(fs.type_of(&p("a")).unwrap(), None);
        assert!(fs.remove_path(&p("a")).is_ok());
        assert!(fs.remove_path(&fs.root()).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn url_is_a_file_url() {
        let (_dir, mut fs) = disk();
        fs.update_resource(&p("readme.txt"), Resource::from_text("hi")).unwrap();
        let url = fs.url(&p("readme.txt")).unwrap();
        assert_eq!(url.scheme(), "file");
        assert!(url.path().ends_with("readme.txt"));
    }
}
