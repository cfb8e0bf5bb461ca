//! Launcher configuration loaded from TOML.
//!
//! Relative paths in the file are resolved against the directory holding the
//! file, so a launcher can be shipped as a self-contained folder.

use crate::error::{LauncherError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use launch_guard::guard::GuardKind;
use launch_guard::identity::ProjectIdentity;
use launch_guard::launch::LaunchDescription;
use launch_guard::platform::PointerWidth;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Top-level launcher configuration.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LauncherConfig {
    /// Product name used to brand provisioned artifacts.
    pub project_name: ProjectIdentity,
    /// Guards to install, in application order.
    #[serde(default = "LauncherConfig::default_guards")]
    pub guards: Vec<GuardKind>,
    /// Directory of bundled artifacts, laid out as `<category>/<name>`.
    #[serde(default = "LauncherConfig::default_resources_dir")]
    pub resources_dir: Utf8PathBuf,
    /// Guard directory override. Defaults to a per-user data directory.
    #[serde(default)]
    pub guard_dir: Option<Utf8PathBuf>,
    /// Pointer width of the client, when it differs from the launcher's.
    #[serde(default)]
    pub pointer_width: Option<PointerWidth>,
    /// The client to start.
    pub client: ClientConfig,
}

/// How to start the protected client.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Client entry point before any guard is applied.
    pub executable: Utf8PathBuf,
    /// Arguments passed to the client.
    #[serde(default)]
    pub args: Vec<String>,
    /// Working directory for the client.
    #[serde(default)]
    pub working_dir: Option<Utf8PathBuf>,
    /// Extra environment variables for the client.
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

impl LauncherConfig {
    fn default_guards() -> Vec<GuardKind> {
        vec![GuardKind::Wrapper]
    }

    fn default_resources_dir() -> Utf8PathBuf {
        Utf8PathBuf::from("resources")
    }

    /// Read and parse the configuration at `path`.
    ///
    /// Relative `resources_dir`, `guard_dir` and `client.working_dir` values
    /// are resolved against the parent directory of `path`.
    ///
    /// # Errors
    ///
    /// Returns [`LauncherError::ConfigRead`] if the file cannot be read, or
    /// [`LauncherError::ConfigParse`] if it is not a valid configuration.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| {
            LauncherError::ConfigRead {
                path: path.to_owned(),
                source,
            }
        })?;
        let base = path.parent().unwrap_or_else(|| Utf8Path::new(""));
        Ok(Self::from_toml_str(&contents, path)?.resolved_against(base))
    }

    /// Parse configuration text. `origin` is only used in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`LauncherError::ConfigParse`] if the text is not valid.
    pub fn from_toml_str(contents: &str, origin: &Utf8Path) -> Result<Self> {
        toml::from_str(contents).map_err(|e: toml::de::Error| LauncherError::ConfigParse {
            path: origin.to_owned(),
            reason: e.to_string().trim_end().to_owned(),
        })
    }

    /// Make relative paths relative to `base` instead of the process's
    /// working directory.
    #[must_use]
    pub fn resolved_against(mut self, base: &Utf8Path) -> Self {
        if base.as_str().is_empty() {
            return self;
        }
        self.resources_dir = join_relative(base, self.resources_dir);
        self.guard_dir = self.guard_dir.map(|dir| join_relative(base, dir));
        self.client.working_dir = self.client.working_dir.map(|dir| join_relative(base, dir));
        self
    }
}

impl ClientConfig {
    /// The launch before any guard has rewritten it.
    #[must_use]
    pub fn launch_description(&self) -> LaunchDescription {
        let launch = LaunchDescription::new(self.executable.clone(), self.args.clone())
            .with_env(self.env.clone());
        match &self.working_dir {
            Some(dir) => launch.with_working_dir(dir.clone()),
            None => launch,
        }
    }
}

fn join_relative(base: &Utf8Path, path: Utf8PathBuf) -> Utf8PathBuf {
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}
