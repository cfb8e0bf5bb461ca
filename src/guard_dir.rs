//! Guard directory resolution.
//!
//! Guards write their artifacts into a single launcher-owned directory. The
//! [`GuardDirProvider`] trait lets the launcher decide where that lives;
//! [`FixedGuardDir`] is the standard implementation for a known path.

use crate::error::GuardDirError;
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use once_cell::sync::OnceCell;
use std::fs;

/// Supplies the directory guards provision their artifacts into.
///
/// Implementations must return the same path on every call within a run and
/// must ensure the directory exists before returning it.
#[cfg_attr(test, mockall::automock)]
pub trait GuardDirProvider {
    /// Return the guard directory, creating it if necessary.
    ///
    /// # Errors
    ///
    /// Returns a [`GuardDirError`] if the directory cannot be created or is
    /// not safe to store protection artifacts in.
    fn guard_dir(&self) -> Result<Utf8PathBuf, GuardDirError>;
}

/// A guard directory at a fixed path, created on first use.
///
/// # Examples
///
/// ```
/// use launch_guard::guard_dir::{FixedGuardDir, GuardDirProvider};
///
/// let temp = tempfile::tempdir().expect("temp dir");
/// let root = camino::Utf8PathBuf::try_from(temp.path().join("guard")).expect("UTF-8");
/// let provider = FixedGuardDir::new(root.clone());
///
/// assert_eq!(provider.guard_dir().expect("created"), root);
/// assert!(root.is_dir());
/// ```
#[derive(Debug)]
pub struct FixedGuardDir {
    path: Utf8PathBuf,
    ready: OnceCell<()>,
}

impl FixedGuardDir {
    /// Use `path` as the guard directory.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: path.into(),
            ready: OnceCell::new(),
        }
    }

    /// The configured path, whether or not it has been created yet.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl GuardDirProvider for FixedGuardDir {
    fn guard_dir(&self) -> Result<Utf8PathBuf, GuardDirError> {
        self.ready.get_or_try_init(|| ensure_directory(&self.path))?;
        Ok(self.path.clone())
    }
}

/// Create `path` if absent and check it is a private directory.
fn ensure_directory(path: &Utf8Path) -> Result<(), GuardDirError> {
    let create_err = |source| GuardDirError::Create {
        path: path.to_owned(),
        source,
    };

    if !path.exists() {
        debug!("creating guard directory {path}");
        create_private_dir(path).map_err(create_err)?;
    }

    let metadata = fs::metadata(path).map_err(create_err)?;
    if !metadata.is_dir() {
        return Err(GuardDirError::NotADirectory {
            path: path.to_owned(),
        });
    }

    check_permissions(path, &metadata)
}

#[cfg(unix)]
fn create_private_dir(path: &Utf8Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    fs::DirBuilder::new()
        .recursive(true)
        .mode(0o700)
        .create(path)
}

#[cfg(not(unix))]
fn create_private_dir(path: &Utf8Path) -> std::io::Result<()> {
    fs::create_dir_all(path)
}

#[cfg(unix)]
fn check_permissions(path: &Utf8Path, metadata: &fs::Metadata) -> Result<(), GuardDirError> {
    use std::os::unix::fs::PermissionsExt;

    let mode = metadata.permissions().mode() & 0o777;
    if mode & 0o022 != 0 {
        return Err(GuardDirError::InsecurePermissions {
            path: path.to_owned(),
            mode,
        });
    }
    Ok(())
}

#[cfg(not(unix))]
fn check_permissions(_path: &Utf8Path, _metadata: &fs::Metadata) -> Result<(), GuardDirError> {
    Ok(())
}
