//! Exposes tree content under the filesystem's own URL base.

use std::sync::{PoisonError, RwLock, Weak};

use bytes::Bytes;
use percent_encoding::percent_decode_str;
use url::Url;

use pathfs_core::{Error, UrlHandler};

use crate::tree::{NodeKind, Tree};

/// The URL of the node named by `names` under `base`.
///
/// Names are percent-encoded, so any name round-trips through
/// [`RamUrlHandler`].
pub(crate) fn url_for<'a, I>(base: &Url, names: I) -> Result<Url, Error>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut names = names.into_iter().peekable();
    let mut url = base.clone();
    if names.peek().is_some() {
        let mut segments = url
            .path_segments_mut()
            .map_err(|()| Error::invalid_argument(format!("{} cannot be a base URL", base)))?;
        segments.pop_if_empty().extend(names);
    }
    Ok(url)
}

/// Serves the bytes of files in one [`RamFileSystem`](crate::RamFileSystem).
///
/// Holds only a weak reference to the tree: a handler left registered in a
/// [`UrlLoader`](pathfs_core::UrlLoader) does not keep a dropped filesystem
/// alive, it just stops resolving.
#[derive(Debug, Clone)]
pub struct RamUrlHandler {
    base: Url,
    tree: Weak<RwLock<Tree>>,
}

impl RamUrlHandler {
    pub(crate) fn new(base: Url, tree: Weak<RwLock<Tree>>) -> Self {
        Self { base, tree }
    }

    /// The base URL this handler answers for.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Decode the segments of `url` relative to the base.
    fn names(&self, url: &Url) -> Result<Vec<String>, Error> {
        if url.scheme() != self.base.scheme() || url.host_str() != self.base.host_str() {
            return Err(Error::unresolved(url, "belongs to another filesystem"));
        }
        let segments = url
            .path_segments()
            .ok_or_else(|| Error::unresolved(url, "URL has no path"))?;
        segments
            .filter(|segment| !segment.is_empty())
            .map(|segment| {
                percent_decode_str(segment)
                    .decode_utf8()
                    .map(|name| name.into_owned())
                    .map_err(|_| Error::unresolved(url, "path is not valid UTF-8"))
            })
            .collect()
    }
}

impl UrlHandler for RamUrlHandler {
    fn open(&self, url: &Url) -> Result<Bytes, Error> {
        let names = self.names(url)?;
        let tree = self
            .tree
            .upgrade()
            .ok_or_else(|| Error::unresolved(url, "filesystem has been dropped"))?;
        let tree = tree.read().unwrap_or_else(PoisonError::into_inner);

        log::trace!("Opening {}", url);
        let node = tree
            .lookup(names.iter().map(String::as_str))
            .and_then(|id| tree.node(id))
            .ok_or_else(|| Error::unresolved(url, "no such file"))?;
        match node.kind() {
            NodeKind::File { resource } => Ok(resource.value.content.clone()),
            NodeKind::Directory { .. } => Err(Error::unresolved(url, "is a directory")),
        }
    }
}
