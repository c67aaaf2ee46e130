//! URL loading: dispatch from a URL to the handler bound to its scheme.
//!
//! Backends without native files expose their content under a custom URL
//! scheme. Binding the backend's handler into a [`UrlLoader`] lets any code
//! that loads content by URL reach it exactly like a `file:` URL.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use url::Url;

use crate::Error;

/// Produces the bytes behind a URL.
pub trait UrlHandler: Send + Sync {
    /// Read the full content behind `url`.
    fn open(&self, url: &Url) -> Result<Bytes, Error>;
}

impl<F> UrlHandler for F
where
    F: Fn(&Url) -> Result<Bytes, Error> + Send + Sync,
{
    fn open(&self, url: &Url) -> Result<Bytes, Error> {
        self(url)
    }
}

/// Handler for `file:` URLs backed by the native filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileUrlHandler;

impl UrlHandler for FileUrlHandler {
    fn open(&self, url: &Url) -> Result<Bytes, Error> {
        let path = url
            .to_file_path()
            .map_err(|()| Error::unresolved(url, "not a local file URL"))?;
        log::trace!("Loading {}...", path.display());
        match std::fs::read(&path) {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::unresolved(url, "no such file"))
            }
            Err(e) => Err(Error::Io(e)),
        }
    }
}

/// A registry of URL handlers keyed by origin.
///
/// A handler is bound either to a whole scheme or to a single base
/// (scheme + host). Lookups prefer the base binding.
#[derive(Clone)]
pub struct UrlLoader {
    bases: HashMap<String, Arc<dyn UrlHandler>>,
    schemes: HashMap<String, Arc<dyn UrlHandler>>,
}

impl UrlLoader {
    /// A loader that only knows `file:` URLs.
    pub fn new() -> Self {
        let mut loader = Self::empty();
        loader.register_scheme("file", Arc::new(FileUrlHandler));
        loader
    }

    /// A loader with no handlers at all.
    pub fn empty() -> Self {
        Self {
            bases: HashMap::new(),
            schemes: HashMap::new(),
        }
    }

    /// Bind `handler` to every URL sharing the scheme and host of `base`.
    pub fn register(&mut self, base: &Url, handler: Arc<dyn UrlHandler>) {
        log::debug!("Binding URL handler to {}", origin_key(base));
        self.bases.insert(origin_key(base), handler);
    }

    /// Bind `handler` to every URL of `scheme`.
    pub fn register_scheme(&mut self, scheme: &str, handler: Arc<dyn UrlHandler>) {
        self.schemes.insert(scheme.to_ascii_lowercase(), handler);
    }

    /// Remove the handler bound to the origin of `base`.
    pub fn unregister(&mut self, base: &Url) -> bool {
        self.bases.remove(&origin_key(base)).is_some()
    }

    /// The handler that would serve `url`.
    pub fn handler_for(&self, url: &Url) -> Option<&Arc<dyn UrlHandler>> {
        self.bases
            .get(&origin_key(url))
            .or_else(|| self.schemes.get(url.scheme()))
    }

    /// Load the content behind `url`.
    pub fn open(&self, url: &Url) -> Result<Bytes, Error> {
        match self.handler_for(url) {
            Some(handler) => handler.open(url),
            None => Err(Error::unresolved(
                url,
                format!("no handler for scheme '{}'", url.scheme()),
            )),
        }
    }

    /// Parse `input` and load the content behind it.
    pub fn open_str(&self, input: &str) -> Result<Bytes, Error> {
        self.open(&Url::parse(input)?)
    }
}

impl Default for UrlLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for UrlLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UrlLoader")
            .field("bases", &self.bases.keys().collect::<Vec<_>>())
            .field("schemes", &self.schemes.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn origin_key(url: &Url) -> String {
    format!("{}://{}", url.scheme(), url.host_str().unwrap_or(""))
}
