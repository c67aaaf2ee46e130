//! Values stored in and returned by filesystems.

use std::collections::BTreeMap;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use bytes::Bytes;

/// Metadata key naming the character set of textual content.
pub const CHARSET: &str = "charset";

/// The kind of node a path resolves to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PathType {
    Directory,
    File,
}

impl fmt::Display for PathType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathType::Directory => write!(f, "directory"),
            PathType::File => write!(f, "file"),
        }
    }
}

/// Opaque content stored at a file.
///
/// Filesystems store and return resources but never interpret the bytes or
/// the metadata.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Resource {
    pub content: Bytes,
    pub metadata: BTreeMap<String, String>,
}

impl Resource {
    /// Create a resource from raw bytes with no metadata.
    pub fn new(content: impl Into<Bytes>) -> Self {
        Resource {
            content: content.into(),
            metadata: BTreeMap::new(),
        }
    }

    /// Create a UTF-8 text resource.
    pub fn from_text(text: impl Into<String>) -> Self {
        Resource::new(text.into()).with_metadata(CHARSET, "UTF-8")
    }

    /// Attach a metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn charset(&self) -> Option<&str> {
        self.metadata.get(CHARSET).map(String::as_str)
    }

    /// The content as text, if it is valid UTF-8.
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.content).ok()
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// A value paired with its last-modified instant, in milliseconds since the
/// Unix epoch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Timestamped<T> {
    pub last_modified: u64,
    pub value: T,
}

impl<T> Timestamped<T> {
    pub fn new(last_modified: u64, value: T) -> Self {
        Timestamped {
            last_modified,
            value,
        }
    }

    pub fn as_ref(&self) -> Timestamped<&T> {
        Timestamped::new(self.last_modified, &self.value)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Timestamped<U> {
        Timestamped::new(self.last_modified, f(self.value))
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

/// The current time in milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    system_time_millis(SystemTime::now())
}

/// Convert a `SystemTime` to milliseconds since the Unix epoch.
///
/// Instants before the epoch clamp to 0.
pub fn system_time_millis(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use collection_literals::btree;
    use std::time::Duration;

    #[test]
    fn text_resource_carries_charset() {
        let r = Resource::from_text("hello");
        assert_eq!(r.text(), Some("hello"));
        assert_eq!(r.charset(), Some("UTF-8"));
        assert_eq!(r.len(), 5);
    }

    #[test]
    fn binary_resource_has_no_text() {
        let r = Resource::new(vec![0xff, 0xfe]);
        assert_eq!(r.text(), None);
        assert_eq!(r.charset(), None);
    }

    #[test]
    fn metadata_is_kept_verbatim() {
        let r = Resource::new(Bytes::from_static(b"x"))
            .with_metadata("content-type", "text/plain")
            .with_metadata("origin", "generator");
        let expected: BTreeMap<String, String> = btree! {
            "content-type".to_string() => "text/plain".to_string(),
            "origin".to_string() => "generator".to_string(),
        };
        assert_eq!(r.metadata, expected);
    }

    #[test]
    fn timestamped_map_keeps_instant() {
        let t = Timestamped::new(42, Resource::from_text("abc"));
        let len = t.as_ref().map(|r| r.len());
        assert_eq!(len, Timestamped::new(42, 3));
        assert_eq!(t.into_value().text(), Some("abc"));
    }

    #[test]
    fn millis_conversion() {
        let t = UNIX_EPOCH + Duration::from_millis(1_500);
        assert_eq!(system_time_millis(t), 1_500);
        assert_eq!(system_time_millis(UNIX_EPOCH - Duration::from_secs(1)), 0);
        assert!(now_millis() > 0);
    }

    #[test]
    fn path_type_display() {
        assert_eq!(PathType::Directory.to_string(), "directory");
        assert_eq!(PathType::File.to_string(), "file");
    }
}
