//! Error types for the guard launcher.
//!
//! Each variant names the file or executable involved so that a failed start
//! can be diagnosed from the single line printed to stderr.

use camino::Utf8PathBuf;
use launch_guard::error::GuardError;
use thiserror::Error;

/// Errors that stop the launcher before or while starting the client.
#[derive(Debug, Error)]
pub enum LauncherError {
    /// The configuration file could not be read.
    #[error("failed to read configuration {path}: {source}")]
    ConfigRead {
        /// Path of the configuration file.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML or has unexpected fields.
    #[error("invalid configuration {path}: {reason}")]
    ConfigParse {
        /// Path of the configuration file.
        path: Utf8PathBuf,
        /// Description of the parse error.
        reason: String,
    },

    /// A guard failed to initialise or to apply; the client was not started.
    #[error(transparent)]
    Guard(#[from] GuardError),

    /// The client process could not be started.
    #[error("failed to start {executable}: {source}")]
    Spawn {
        /// Executable that was to be started.
        executable: Utf8PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The client was terminated without an exit code.
    #[error("{executable} was terminated by a signal")]
    ClientTerminated {
        /// Executable that was started.
        executable: Utf8PathBuf,
    },

    /// The launch description could not be rendered.
    #[error("failed to render launch description: {reason}")]
    Render {
        /// Description of the rendering failure.
        reason: String,
    },

    /// Writing the dry-run report failed.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Convenience alias for launcher results.
pub type Result<T> = std::result::Result<T, LauncherError>;

#[cfg(test)]
mod tests {
    use super::*;
    use launch_guard::error::ProvisionError;
    use launch_guard::error::ResourceError;

    #[test]
    fn guard_errors_keep_their_message() {
        let err = LauncherError::from(GuardError::SecurityInitialization {
            guard: "wrapper",
            source: ProvisionError::Resolution(ResourceError::NotFound {
                name: "wrapper64.exe".to_owned(),
                category: "guard".to_owned(),
            }),
        });

        let message = err.to_string();
        assert!(message.contains("wrapper"), "unexpected message: {message}");
    }

    #[test]
    fn spawn_error_names_the_executable() {
        let err = LauncherError::Spawn {
            executable: Utf8PathBuf::from("/opt/client/bin/client"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };

        assert!(err.to_string().starts_with("failed to start /opt/client/bin/client"));
    }
}
