//! pathfs core: the backend-independent filesystem contract.
//!
//! This crate defines how callers address and move content without knowing
//! the storage medium behind it:
//! - `PathCodec`: bridges a backend's path type and name segments
//! - `Path`: the segment path used by in-memory backends
//! - `ReadFileSystem` / `ReadWriteFileSystem`: the operation surface
//! - `Resource` and `Timestamped`: what is stored and when it changed
//! - `UrlLoader`: URL-based loading that reaches any bound backend
//!
//! Backends live in their own crates (`pathfs-ram`, `pathfs-disk`).
//!
//! # Example
//!
//! ```rust
//! use pathfs_core::{ReadFileSystem, Resource, Timestamped, Error};
//!
//! fn load<F: ReadFileSystem>(fs: &F, path: &F::Path) -> Result<Option<Resource>, Error> {
//!     Ok(fs.resource(path)?.map(Timestamped::into_value))
//! }
//! ```

pub use bytes::Bytes;
pub use url::Url;

mod codec;
mod copy;
mod error;
mod path;
mod resource;
mod traits;
mod url_loader;

pub use codec::{PathCodec, SegmentCodec};
pub use copy::copy;
pub use error::Error;
pub use path::{Path, PathError};
pub use resource::{now_millis, system_time_millis, PathType, Resource, Timestamped, CHARSET};
pub use traits::{ReadFileSystem, ReadWriteFileSystem};
pub use url_loader::{FileUrlHandler, UrlHandler, UrlLoader};
