//! Directory resolution abstraction for platform-specific paths.
//!
//! The default guard directory lives under the per-user local data
//! directory: `<data_local_dir>/<project_name>/guard`.

use camino::Utf8PathBuf;
use launch_guard::error::GuardDirError;
use launch_guard::guard_dir::{FixedGuardDir, GuardDirProvider};
use launch_guard::identity::ProjectIdentity;
use once_cell::unsync::OnceCell;
use std::path::PathBuf;

/// Source of platform base directories.
#[cfg_attr(test, mockall::automock)]
pub trait BaseDirs {
    /// The per-user local data directory, if the platform defines one.
    fn data_local_dir(&self) -> Option<PathBuf>;
}

/// [`BaseDirs`] backed by `directories-next`.
#[derive(Debug, Clone)]
pub struct SystemBaseDirs {
    inner: Option<directories_next::BaseDirs>,
}

impl SystemBaseDirs {
    /// Query the platform once.
    ///
    /// A missing home directory is not an error here; it surfaces when a
    /// guard asks for its directory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: directories_next::BaseDirs::new(),
        }
    }
}

impl Default for SystemBaseDirs {
    fn default() -> Self {
        Self::new()
    }
}

impl BaseDirs for SystemBaseDirs {
    fn data_local_dir(&self) -> Option<PathBuf> {
        self.inner
            .as_ref()
            .map(|dirs| dirs.data_local_dir().to_path_buf())
    }
}

/// Compute `<data_local_dir>/<project>/guard`.
///
/// # Errors
///
/// Returns [`GuardDirError::Unavailable`] if the platform has no local data
/// directory, or [`GuardDirError::NotUtf8`] if it is not valid UTF-8.
pub fn default_guard_dir(
    dirs: &dyn BaseDirs,
    project: &ProjectIdentity,
) -> Result<Utf8PathBuf, GuardDirError> {
    let base = dirs
        .data_local_dir()
        .ok_or_else(|| GuardDirError::Unavailable {
            reason: "no local data directory for the current user".to_owned(),
        })?;
    let base = Utf8PathBuf::try_from(base).map_err(|e| GuardDirError::NotUtf8 {
        path: e.into_path_buf().display().to_string(),
    })?;
    Ok(base.join(project.as_str()).join("guard"))
}

/// Guard directory under the user's data directory, resolved on first use.
///
/// Nothing touches the filesystem until a guard asks for the directory, so a
/// launcher configured with only the no-op guard never needs a home
/// directory.
pub struct UserGuardDir<'a> {
    dirs: &'a dyn BaseDirs,
    project: ProjectIdentity,
    resolved: OnceCell<FixedGuardDir>,
}

impl<'a> UserGuardDir<'a> {
    /// Resolve the directory for `project` from `dirs` when first needed.
    #[must_use]
    pub fn new(dirs: &'a dyn BaseDirs, project: ProjectIdentity) -> Self {
        Self {
            dirs,
            project,
            resolved: OnceCell::new(),
        }
    }
}

impl std::fmt::Debug for UserGuardDir<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserGuardDir")
            .field("project", &self.project)
            .field("resolved", &self.resolved)
            .finish_non_exhaustive()
    }
}

impl GuardDirProvider for UserGuardDir<'_> {
    fn guard_dir(&self) -> Result<Utf8PathBuf, GuardDirError> {
        self.resolved
            .get_or_try_init(|| default_guard_dir(self.dirs, &self.project).map(FixedGuardDir::new))?
            .guard_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project() -> ProjectIdentity {
        ProjectIdentity::try_from("MyLauncher").expect("valid name")
    }

    #[test]
    fn default_dir_is_project_scoped() {
        let mut dirs = MockBaseDirs::new();
        dirs.expect_data_local_dir()
            .return_const(Some(PathBuf::from("/home/user/.local/share")));

        let path = default_guard_dir(&dirs, &project()).expect("resolved");

        assert_eq!(path.as_str(), "/home/user/.local/share/MyLauncher/guard");
    }

    #[test]
    fn missing_data_dir_is_unavailable() {
        let mut dirs = MockBaseDirs::new();
        dirs.expect_data_local_dir().return_const(None::<PathBuf>);

        let err = default_guard_dir(&dirs, &project()).expect_err("no data dir");

        assert!(
            matches!(err, GuardDirError::Unavailable { .. }),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn user_guard_dir_is_lazy_and_resolved_once() {
        let temp = TempDir::new().expect("temp dir");
        let base = temp.path().to_path_buf();
        let mut dirs = MockBaseDirs::new();
        dirs.expect_data_local_dir()
            .times(1)
            .return_const(Some(base.clone()));

        let provider = UserGuardDir::new(&dirs, project());
        let first = provider.guard_dir().expect("created");
        let second = provider.guard_dir().expect("cached");

        assert_eq!(first, second);
        assert!(first.is_dir());
        assert!(first.as_std_path().starts_with(&base));
    }

    #[test]
    fn user_guard_dir_propagates_unavailable() {
        let mut dirs = MockBaseDirs::new();
        dirs.expect_data_local_dir().return_const(None::<PathBuf>);

        let provider = UserGuardDir::new(&dirs, project());

        assert!(matches!(
            provider.guard_dir(),
            Err(GuardDirError::Unavailable { .. })
        ));
    }
}
