//! Launch pipeline orchestration.
//!
//! Loads configuration, installs the configured guards, applies them to the
//! client's launch and either reports or starts the result. Any guard
//! failure stops the pipeline before a process is spawned.

use crate::cli::Cli;
use crate::config::LauncherConfig;
use crate::dirs::{BaseDirs, UserGuardDir};
use crate::error::{LauncherError, Result};
use crate::output::LaunchReport;
use launch_guard::guard::GuardContext;
use launch_guard::guard_dir::{FixedGuardDir, GuardDirProvider};
use launch_guard::launch::LaunchDescription;
use launch_guard::platform::PlatformProfile;
use launch_guard::registry::GuardRegistry;
use launch_guard::resource::DirectoryResources;
use log::{debug, info};
use std::io::Write;

/// A launch that every configured guard has approved and rewritten.
#[derive(Debug, Clone)]
pub struct PreparedLaunch {
    /// Names of the installed guards, in application order.
    pub guards: Vec<&'static str>,
    /// The launch after all guards have been applied.
    pub launch: LaunchDescription,
}

impl PreparedLaunch {
    /// View this launch as a dry-run report.
    #[must_use]
    pub fn report(&self) -> LaunchReport<'_> {
        LaunchReport {
            guards: self.guards.clone(),
            launch: &self.launch,
        }
    }
}

/// Install the configured guards and apply them to the client launch.
///
/// `host` describes the machine the launcher runs on; the configured
/// `pointer_width`, if any, replaces its width.
///
/// # Errors
///
/// Returns [`LauncherError::Guard`] if any guard fails to initialise or to
/// apply.
pub fn prepare_launch(
    config: &LauncherConfig,
    dirs: &dyn BaseDirs,
    host: PlatformProfile,
) -> Result<PreparedLaunch> {
    let profile = config
        .pointer_width
        .map_or(host, |width| host.with_pointer_width(width));
    let resources = DirectoryResources::new(config.resources_dir.clone());
    let guard_dirs: Box<dyn GuardDirProvider + '_> = match &config.guard_dir {
        Some(path) => Box::new(FixedGuardDir::new(path.clone())),
        None => Box::new(UserGuardDir::new(dirs, config.project_name.clone())),
    };

    info!(
        "preparing launch of {} for {} on {profile}",
        config.client.executable, config.project_name
    );
    let ctx = GuardContext {
        identity: &config.project_name,
        profile,
        resources: &resources,
        guard_dirs: &*guard_dirs,
    };
    let registry = GuardRegistry::install(&config.guards, &ctx)?;

    let mut launch = config.client.launch_description();
    registry.apply_all(&mut launch)?;
    debug!("final launch: {launch:?}");

    Ok(PreparedLaunch {
        guards: registry.names(),
        launch,
    })
}

/// Start the client and wait for it to exit.
///
/// # Errors
///
/// Returns [`LauncherError::Spawn`] if the process cannot be started, or
/// [`LauncherError::ClientTerminated`] if it ends without an exit code.
pub fn start_client(launch: &LaunchDescription) -> Result<i32> {
    info!("starting {}", launch.executable());
    let status = launch
        .to_command()
        .status()
        .map_err(|source| LauncherError::Spawn {
            executable: launch.executable().to_owned(),
            source,
        })?;
    debug!("client exited with {status}");
    status.code().ok_or_else(|| LauncherError::ClientTerminated {
        executable: launch.executable().to_owned(),
    })
}

/// Run the launcher for `cli`, returning the process exit code.
///
/// In dry-run mode the report is written to `stdout` and the exit code is 0;
/// otherwise the client's exit code is returned.
///
/// # Errors
///
/// Returns any configuration, guard or spawn error.
pub fn run(cli: &Cli, dirs: &dyn BaseDirs, stdout: &mut dyn Write) -> Result<i32> {
    let config = LauncherConfig::load(&cli.config)?;
    let prepared = prepare_launch(&config, dirs, PlatformProfile::current())?;

    if cli.dry_run {
        let report = prepared.report();
        let rendered = if cli.json {
            report.to_json()?
        } else {
            report.to_text()
        };
        writeln!(stdout, "{}", rendered.trim_end())?;
        return Ok(0);
    }

    start_client(&prepared.launch)
}
