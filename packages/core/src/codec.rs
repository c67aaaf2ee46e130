//! Path codec: the bridge between a backend's path representation and an
//! ordered sequence of name segments.

use std::borrow::Cow;
use std::fmt::Debug;

use crate::{Error, Path};

/// Translate between an opaque path representation and name segments.
///
/// Every filesystem contract is parameterized by a codec so that backends
/// with different native path types (segment vectors, `PathBuf`s) can be
/// driven by the same generic code.
pub trait PathCodec {
    /// The backend's path representation.
    type Path: Clone + Debug;

    /// The path with zero segments.
    fn root(&self) -> Self::Path;

    /// `parent` extended by one segment.
    ///
    /// `name` must be non-empty and must not contain `/`; a bad name is
    /// `Error::InvalidArgument`. Pure: never touches the tree.
    fn make_path(&self, parent: &Self::Path, name: &str) -> Result<Self::Path, Error>;

    /// The last segment, or `""` for the root.
    fn name<'a>(&self, path: &'a Self::Path) -> Cow<'a, str>;

    /// The segments of `path` in order.
    ///
    /// The iterator is lazy; call again to restart.
    fn names<'a>(&self, path: &'a Self::Path) -> Box<dyn Iterator<Item = Cow<'a, str>> + 'a>;

    /// True iff both paths have element-wise equal segments.
    fn equals(&self, left: &Self::Path, right: &Self::Path) -> bool;

    /// Build a path from a sequence of segments, starting at the root.
    fn path_of<I, S>(&self, names: I) -> Result<Self::Path, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        Self: Sized,
    {
        names
            .into_iter()
            .try_fold(self.root(), |parent, name| self.make_path(&parent, name.as_ref()))
    }
}

/// Codec over the segment [`Path`], shared by segment-addressed backends.
#[derive(Clone, Copy, Debug, Default)]
pub struct SegmentCodec;

impl PathCodec for SegmentCodec {
    type Path = Path;

    fn root(&self) -> Path {
        Path::root()
    }

    fn make_path(&self, parent: &Path, name: &str) -> Result<Path, Error> {
        parent
            .child(name)
            .map_err(|e| Error::invalid_argument(e.to_string()))
    }

    fn name<'a>(&self, path: &'a Path) -> Cow<'a, str> {
        Cow::Borrowed(path.name())
    }

    fn names<'a>(&self, path: &'a Path) -> Box<dyn Iterator<Item = Cow<'a, str>> + 'a> {
        Box::new(path.iter().map(|s| Cow::Borrowed(s.as_str())))
    }

    fn equals(&self, left: &Path, right: &Path) -> bool {
        left == right
    }
}
