//! Configuration for the in-memory backend.

use serde::{Deserialize, Serialize};

use pathfs_core::Error;

pub const DEFAULT_SCHEME: &str = "ram";

/// Options for a [`RamFileSystem`](crate::RamFileSystem).
///
/// Can be read from JSON; missing fields take their defaults:
///
/// ```json
/// {"scheme": "ram"}
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RamConfig {
    /// URL scheme under which file content is exposed.
    pub scheme: String,
}

impl RamConfig {
    /// Check that `scheme` is a syntactically valid URL scheme.
    pub fn validate(&self) -> Result<(), Error> {
        let mut chars = self.scheme.chars();
        let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
            && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
        if valid {
            Ok(())
        } else {
            Err(Error::invalid_argument(format!(
                "'{}' is not a valid URL scheme",
                self.scheme
            )))
        }
    }
}

impl Default for RamConfig {
    fn default() -> Self {
        Self {
            scheme: DEFAULT_SCHEME.to_string(),
        }
    }
}
