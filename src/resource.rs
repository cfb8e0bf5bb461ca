//! Bundled resource lookup.
//!
//! Guards fetch their artifacts through the [`ResourceProvider`] trait, keyed
//! by logical name and category. Two implementations are provided: one backed
//! by a directory tree laid out as `<root>/<category>/<name>`, and one backed
//! by an in-memory table for binaries that embed their artifacts.

use crate::error::ResourceError;
use camino::{Utf8Path, Utf8PathBuf};
use log::trace;
use std::borrow::Cow;
use std::collections::HashMap;
use std::io::{Cursor, ErrorKind, Read};
use std::path::{Component, Path};

/// Readable byte source for a bundled artifact.
pub type ResourceReader = Box<dyn Read + Send>;

/// Locates bundled artifacts by logical name and category.
///
/// Implementations must be deterministic: the same key yields the same bytes
/// for the lifetime of the process, and a missing artifact is reported as
/// [`ResourceError::NotFound`] rather than defaulted.
#[cfg_attr(test, mockall::automock)]
pub trait ResourceProvider {
    /// Open the artifact bundled as `name` under `category`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] when nothing is bundled under the
    /// key, or [`ResourceError::Io`] when it exists but cannot be opened.
    fn resolve(&self, name: &str, category: &str) -> Result<ResourceReader, ResourceError>;
}

/// Resources stored on disk as `<root>/<category>/<name>`.
#[derive(Debug, Clone)]
pub struct DirectoryResources {
    root: Utf8PathBuf,
}

impl DirectoryResources {
    /// Serve resources from beneath `root`.
    #[must_use]
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory resources are served from.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }
}

impl ResourceProvider for DirectoryResources {
    fn resolve(&self, name: &str, category: &str) -> Result<ResourceReader, ResourceError> {
        validate_key(name, category)?;
        let path = self.root.join(category).join(name);
        trace!("resolving resource {category}/{name} from {path}");

        match std::fs::File::open(&path) {
            Ok(file) => Ok(Box::new(file)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(ResourceError::NotFound {
                name: name.to_owned(),
                category: category.to_owned(),
            }),
            Err(source) => Err(ResourceError::Io {
                name: name.to_owned(),
                category: category.to_owned(),
                source,
            }),
        }
    }
}

/// Reject keys that would resolve outside their category directory.
fn validate_key(name: &str, category: &str) -> Result<(), ResourceError> {
    let reject = |reason| ResourceError::InvalidName {
        name: name.to_owned(),
        category: category.to_owned(),
        reason,
    };

    for part in [category, name] {
        let mut components = Path::new(part).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => {}
            (None, _) => return Err(reject("empty lookup key")),
            _ => return Err(reject("lookup key must be a single path component")),
        }
    }
    Ok(())
}

/// Resources held in memory, typically from `include_bytes!`.
///
/// # Examples
///
/// ```
/// use launch_guard::resource::{EmbeddedResources, ResourceProvider};
/// use std::io::Read;
///
/// let resources = EmbeddedResources::new().with("wrapper64.exe", "guard", &b"MZ"[..]);
/// let mut bytes = Vec::new();
/// resources
///     .resolve("wrapper64.exe", "guard")
///     .expect("bundled")
///     .read_to_end(&mut bytes)
///     .expect("readable");
/// assert_eq!(bytes, b"MZ");
/// ```
#[derive(Debug, Clone, Default)]
pub struct EmbeddedResources {
    entries: HashMap<(String, String), Cow<'static, [u8]>>,
}

impl EmbeddedResources {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an entry.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        category: impl Into<String>,
        bytes: impl Into<Cow<'static, [u8]>>,
    ) {
        self.entries
            .insert((category.into(), name.into()), bytes.into());
    }

    /// Builder-style variant of [`Self::insert`].
    #[must_use]
    pub fn with(
        mut self,
        name: impl Into<String>,
        category: impl Into<String>,
        bytes: impl Into<Cow<'static, [u8]>>,
    ) -> Self {
        self.insert(name, category, bytes);
        self
    }

    /// Number of bundled entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries are bundled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ResourceProvider for EmbeddedResources {
    fn resolve(&self, name: &str, category: &str) -> Result<ResourceReader, ResourceError> {
        self.entries
            .get(&(category.to_owned(), name.to_owned()))
            .map(|bytes| Box::new(Cursor::new(bytes.clone())) as ResourceReader)
            .ok_or_else(|| ResourceError::NotFound {
                name: name.to_owned(),
                category: category.to_owned(),
            })
    }
}
