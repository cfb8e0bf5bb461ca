//! Launch description for the protected client.

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use std::collections::BTreeMap;
use std::process::Command;

/// What will be executed once every guard has been applied.
///
/// Guards only ever rewrite the executable (and, where a strategy needs it,
/// the arguments); the launch pipeline owns everything else.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LaunchDescription {
    executable: Utf8PathBuf,
    args: Vec<String>,
    env: BTreeMap<String, String>,
    working_dir: Option<Utf8PathBuf>,
}

impl LaunchDescription {
    /// Describe a launch of `executable` with `args`.
    #[must_use]
    pub fn new(executable: impl Into<Utf8PathBuf>, args: Vec<String>) -> Self {
        Self {
            executable: executable.into(),
            args,
            ..Self::default()
        }
    }

    /// Set the working directory.
    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<Utf8PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Replace the environment passed to the client.
    #[must_use]
    pub fn with_env(mut self, env: BTreeMap<String, String>) -> Self {
        self.env = env;
        self
    }

    /// Add a single environment variable.
    #[must_use]
    pub fn with_env_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Executable that will be started.
    #[must_use]
    pub fn executable(&self) -> &Utf8Path {
        &self.executable
    }

    /// Redirect the launch to a different executable.
    pub fn set_executable(&mut self, executable: impl Into<Utf8PathBuf>) {
        self.executable = executable.into();
    }

    /// Arguments passed after the executable.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Mutable access to the arguments.
    pub fn args_mut(&mut self) -> &mut Vec<String> {
        &mut self.args
    }

    /// Extra environment variables for the client.
    #[must_use]
    pub const fn env(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    /// Working directory, if one was set.
    #[must_use]
    pub fn working_dir(&self) -> Option<&Utf8Path> {
        self.working_dir.as_deref()
    }

    /// Build a [`Command`] that starts this launch.
    ///
    /// The environment is added on top of the launcher's own environment.
    #[must_use]
    pub fn to_command(&self) -> Command {
        let mut command = Command::new(&self.executable);
        command.args(&self.args).envs(&self.env);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }
        command
    }
}
