//! pathfs: path-addressable virtual filesystems behind one read/write interface.
//!
//! Every backend implements the same pair of contracts. [`ReadFileSystem`]
//! answers lookups (absence is a normal `None`, never an error) and
//! [`ReadWriteFileSystem`] adds directory creation, resource writes, and
//! removal. A [`PathCodec`] bridges each backend's own path representation
//! and the ordered name segments generic code works with, so [`copy`] can
//! move a subtree between backends with different path types.
//!
//! Backends:
//!
//! - [`RamFileSystem`]: an in-memory tree, readable through URLs under a
//!   base unique to each instance once bound into a [`UrlLoader`].
//! - [`DiskFileSystem`]: a native directory, addressed by relative
//!   `PathBuf`s and exposed through `file://` URLs.
//!
//! Writers that start from characters rather than bytes build resource
//! content with an [`EncodingStream`].
//!
//! ```
//! use pathfs::{path, RamFileSystem, ReadFileSystem, ReadWriteFileSystem, Resource, UrlLoader};
//!
//! let mut fs = RamFileSystem::new();
//! fs.update_resource(&path!("docs/readme.txt"), Resource::from_text("hello")).unwrap();
//!
//! let mut loader = UrlLoader::new();
//! fs.bind(&mut loader);
//! let url = fs.url(&path!("docs/readme.txt")).unwrap();
//! assert_eq!(&loader.open(&url).unwrap()[..], b"hello");
//! ```

pub use pathfs_core::*;
pub use pathfs_disk::DiskFileSystem;
pub use pathfs_ram::{
    Clock, ManualClock, RamConfig, RamFileSystem, RamUrlHandler, SystemClock, DEFAULT_SCHEME,
};
pub use pathfs_stream::{ByteSink, Charset, EncodingStream, BUFFER_SIZE};
