//! Segment path: an immutable sequence of name segments.

use std::fmt;

/// Errors related to path parsing and validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// A path component is empty.
    EmptyComponent { position: usize },
    /// A path component contains a character that cannot appear in a name.
    InvalidComponent {
        component: String,
        position: usize,
        message: String,
    },
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathError::EmptyComponent { position } => {
                write!(f, "empty path component at position {}", position)
            }
            PathError::InvalidComponent {
                component,
                position,
                message,
            } => {
                write!(
                    f,
                    "invalid path component '{}' at position {}: {}",
                    component, position, message
                )
            }
        }
    }
}

impl std::error::Error for PathError {}

/// A location in a segment-addressed tree.
///
/// The empty sequence is the root. Equality, ordering and hashing are
/// structural, segment by segment. A `Path` is a pure addressing value and
/// says nothing about whether anything exists at that location.
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Path {
    pub components: Vec<String>,
}

impl Path {
    /// The root path (zero segments).
    pub fn root() -> Self {
        Path {
            components: Vec::new(),
        }
    }

    /// Parse a `/`-separated path string.
    ///
    /// Empty components are ignored, so `//`, a leading `/` and a trailing
    /// `/` all normalize away. The empty string is the root.
    ///
    /// ```rust
    /// use pathfs_core::Path;
    ///
    /// let path = Path::parse("docs/images/logo.png").unwrap();
    /// assert_eq!(path.len(), 3);
    /// assert_eq!(Path::parse("/docs/").unwrap(), Path::parse("docs").unwrap());
    /// ```
    pub fn parse(s: &str) -> Result<Self, PathError> {
        Self::try_from_components(s.split('/').filter(|c| !c.is_empty()))
    }

    /// Try to create a path from components, validating each.
    pub fn try_from_components<I, S>(components: I) -> Result<Self, PathError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let components: Vec<String> = components.into_iter().map(Into::into).collect();
        for (i, component) in components.iter().enumerate() {
            Self::validate_component(component, i)?;
        }
        Ok(Path { components })
    }

    /// Validate a single path component.
    pub fn validate_component(component: &str, position: usize) -> Result<(), PathError> {
        if component.is_empty() {
            return Err(PathError::EmptyComponent { position });
        }
        if component.contains('/') {
            return Err(PathError::InvalidComponent {
                component: component.to_string(),
                position,
                message: "contains '/'".to_string(),
            });
        }
        if component == "." || component == ".." {
            return Err(PathError::InvalidComponent {
                component: component.to_string(),
                position,
                message: "relative segment".to_string(),
            });
        }
        Ok(())
    }

    /// Check every component, reporting the first malformed one.
    ///
    /// `components` is public, so a path built by hand may hold segments
    /// that `parse` and `child` would never produce.
    pub fn validate(&self) -> Result<(), PathError> {
        for (i, component) in self.components.iter().enumerate() {
            Self::validate_component(component, i)?;
        }
        Ok(())
    }

    /// A new path with `name` appended.
    pub fn child(&self, name: &str) -> Result<Path, PathError> {
        Self::validate_component(name, self.components.len())?;
        let mut components = Vec::with_capacity(self.components.len() + 1);
        components.extend(self.components.iter().cloned());
        components.push(name.to_string());
        Ok(Path { components })
    }

    /// The path without its last segment, `None` for the root.
    pub fn parent(&self) -> Option<Path> {
        self.components.split_last().map(|(_, rest)| Path {
            components: rest.to_vec(),
        })
    }

    /// The last segment, or `""` for the root.
    pub fn name(&self) -> &str {
        self.components.last().map(String::as_str).unwrap_or("")
    }

    /// Check if this is the root path.
    pub fn is_root(&self) -> bool {
        self.components.is_empty()
    }

    /// Get the number of components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Iterate over components.
    pub fn iter(&self) -> impl Iterator<Item = &String> + Clone {
        self.components.iter()
    }

    /// Check if this path has the given prefix.
    pub fn has_prefix(&self, prefix: &Path) -> bool {
        prefix.components.len() <= self.components.len()
            && prefix.components == self.components[..prefix.components.len()]
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.components.join("/"))
    }
}

impl std::ops::Index<usize> for Path {
    type Output = String;

    fn index(&self, i: usize) -> &Self::Output {
        &self.components[i]
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.components.iter()
    }
}

/// Macro for creating paths from string literals.
///
/// # Example
///
/// ```rust
/// use pathfs_core::path;
///
/// let p = path!("docs/readme.txt");
/// assert_eq!(p.len(), 2);
/// assert!(path!("").is_root());
/// ```
#[macro_export]
macro_rules! path {
    ($s:expr) => {
        $crate::Path::parse($s).expect("invalid path literal")
    };
}
