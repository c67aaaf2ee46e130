//! pathfs RAM backend: an ephemeral, in-memory directory tree.
//!
//! [`RamFileSystem`] implements the read-write contract from `pathfs-core`
//! over an arena of nodes, and serves file content through a per-instance
//! URL base so generic URL loading reaches it like any native scheme.
//!
//! Nothing here persists across process restarts.

mod clock;
mod config;
mod fs;
mod tree;
mod url_handler;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{RamConfig, DEFAULT_SCHEME};
pub use fs::RamFileSystem;
pub use url_handler::RamUrlHandler;
