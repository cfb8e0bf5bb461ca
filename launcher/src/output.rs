//! Output formatting and logging for the launcher CLI.
//!
//! Diagnostics go to stderr through a `tracing-subscriber` formatter, which
//! also captures the `log` records emitted by the guard library. The dry-run
//! report is rendered here either as text or as JSON.

use crate::error::{LauncherError, Result};
use launch_guard::launch::LaunchDescription;
use log::LevelFilter;
use serde::Serialize;
use std::io::Write;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter as TracingLevel;

/// Install the stderr subscriber at `level`.
///
/// `RUST_LOG`, when set, takes precedence over `level`. Only the first call
/// installs a subscriber; later calls are ignored.
pub fn init_logging(level: LevelFilter) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(tracing_level(level).into()));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
    if installed.is_err() {
        // A subscriber is already installed.
    }
}

/// Map a `log` level filter onto the subscriber's level filter.
#[must_use]
pub const fn tracing_level(level: LevelFilter) -> TracingLevel {
    match level {
        LevelFilter::Off => TracingLevel::OFF,
        LevelFilter::Error => TracingLevel::ERROR,
        LevelFilter::Warn => TracingLevel::WARN,
        LevelFilter::Info => TracingLevel::INFO,
        LevelFilter::Debug => TracingLevel::DEBUG,
        LevelFilter::Trace => TracingLevel::TRACE,
    }
}

/// Write one line to `stderr`, ignoring failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}

/// The dry-run report: which guards ran and what would be started.
#[derive(Debug, Serialize)]
pub struct LaunchReport<'a> {
    /// Names of the installed guards, in application order.
    pub guards: Vec<&'static str>,
    /// The launch after every guard has been applied.
    pub launch: &'a LaunchDescription,
}

impl LaunchReport<'_> {
    /// Render the report as human-readable text.
    #[must_use]
    pub fn to_text(&self) -> String {
        let launch = self.launch;
        let mut text = String::from("Dry run - the client will not be started\n\n");
        let guards = if self.guards.is_empty() {
            "(none)".to_owned()
        } else {
            self.guards.join(", ")
        };
        text.push_str(&format!("Guards: {guards}\n"));
        text.push_str(&format!("Executable: {}\n", launch.executable()));
        if !launch.args().is_empty() {
            text.push_str(&format!("Arguments: {}\n", launch.args().join(" ")));
        }
        if let Some(dir) = launch.working_dir() {
            text.push_str(&format!("Working directory: {dir}\n"));
        }
        if !launch.env().is_empty() {
            text.push_str("Environment:\n");
            for (key, value) in launch.env() {
                text.push_str(&format!("  {key}={value}\n"));
            }
        }
        text
    }

    /// Render the report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`LauncherError::Render`] if serialisation fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| LauncherError::Render {
            reason: e.to_string(),
        })
    }
}
