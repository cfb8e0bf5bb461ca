//! Error types for guard provisioning and application.
//!
//! Failures are grouped by the collaborator that raised them. Anything that
//! goes wrong while a guard is being constructed is folded into
//! [`GuardError::SecurityInitialization`], which callers must treat as fatal:
//! the protected client is never started without its guard.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised by a [`ResourceProvider`](crate::resource::ResourceProvider)
/// while locating a bundled artifact.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// No artifact is bundled under the requested name and category.
    #[error("bundled resource {name} (category {category}) not found")]
    NotFound {
        /// Logical artifact name.
        name: String,
        /// Resource category the lookup was made under.
        category: String,
    },

    /// The name or category would resolve outside the resource root.
    #[error("resource lookup rejected for {name} (category {category}): {reason}")]
    InvalidName {
        /// Logical artifact name.
        name: String,
        /// Resource category the lookup was made under.
        category: String,
        /// Why the lookup key was refused.
        reason: &'static str,
    },

    /// The artifact exists but could not be opened.
    #[error("failed to open bundled resource {name} (category {category})")]
    Io {
        /// Logical artifact name.
        name: String,
        /// Resource category the lookup was made under.
        category: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by a [`GuardDirProvider`](crate::guard_dir::GuardDirProvider).
#[derive(Debug, Error)]
pub enum GuardDirError {
    /// The platform offers no location for launcher-owned data.
    #[error("could not determine guard directory: {reason}")]
    Unavailable {
        /// Description of why no location was found.
        reason: String,
    },

    /// The directory path cannot be represented as UTF-8.
    #[error("guard directory is not valid UTF-8: {path}")]
    NotUtf8 {
        /// Lossy rendering of the rejected path.
        path: String,
    },

    /// The directory could not be created or inspected.
    #[error("failed to prepare guard directory {path}")]
    Create {
        /// Directory that could not be prepared.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The path exists but is not a directory.
    #[error("guard directory {path} exists but is not a directory")]
    NotADirectory {
        /// Offending path.
        path: Utf8PathBuf,
    },

    /// Other users could plant files in the directory.
    #[error("guard directory {path} is writable by other users (mode {mode:o})")]
    InsecurePermissions {
        /// Offending directory.
        path: Utf8PathBuf,
        /// Permission bits observed on the directory.
        mode: u32,
    },
}

/// A single artifact could not be provisioned into the guard directory.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// The guard directory could not be resolved.
    #[error(transparent)]
    GuardDirectory(#[from] GuardDirError),

    /// The bundled artifact could not be resolved.
    #[error(transparent)]
    Resolution(#[from] ResourceError),

    /// Copying the artifact into place failed.
    #[error("failed to unpack {name} to {destination}")]
    Unpack {
        /// Logical artifact name.
        name: String,
        /// Destination that was being written.
        destination: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

/// Errors surfaced by guards and the guard registry.
#[derive(Debug, Error)]
pub enum GuardError {
    /// A guard could not provision its artifacts; startup must abort.
    #[error("security initialisation failed for guard {guard}")]
    SecurityInitialization {
        /// Name of the guard that failed.
        guard: &'static str,
        /// What went wrong during provisioning.
        #[source]
        source: ProvisionError,
    },

    /// An artifact provisioned at construction time has disappeared.
    #[error("guard {guard} artifact missing at launch: {path}")]
    ArtifactMissing {
        /// Name of the guard that detected the loss.
        guard: &'static str,
        /// Path that was expected to exist.
        path: Utf8PathBuf,
    },

    /// Configuration named a guard that does not exist.
    #[error("unknown guard {name:?}; expected one of: {expected}")]
    UnknownGuard {
        /// The rejected guard name.
        name: String,
        /// Comma-separated list of accepted names.
        expected: String,
    },
}

/// Result type alias using [`GuardError`].
pub type Result<T> = std::result::Result<T, GuardError>;
