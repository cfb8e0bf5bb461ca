//! Wrapper executable guard.
//!
//! On construction this guard provisions a branded wrapper executable and the
//! anti-injection library it loads into the guard directory. When applied on
//! Windows it redirects the launch from the raw client entry point to the
//! wrapper; on every other OS family applying it does nothing, since the
//! protection technique is Windows-specific.

use super::{Guard, GuardContext};
use crate::artifact::{ArtifactPlan, WrapperArtifacts};
use crate::error::{GuardError, ProvisionError, Result};
use crate::launch::LaunchDescription;
use crate::platform::PlatformProfile;
use crate::resource::ResourceProvider;
use crate::unpack::{UnpackOutcome, unpack};
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info, trace};

/// Name of the wrapper guard.
pub const NAME: &str = "wrapper";

/// Guard that routes the launch through a provisioned wrapper executable.
///
/// A constructed `WrapperGuard` always has both artifacts in place; if either
/// cannot be provisioned, [`WrapperGuard::new`] fails instead.
#[derive(Debug, Clone)]
pub struct WrapperGuard {
    profile: PlatformProfile,
    wrapper_path: Utf8PathBuf,
    anti_inject_path: Utf8PathBuf,
}

impl WrapperGuard {
    /// Provision the wrapper and anti-injection artifacts.
    ///
    /// The destination paths are fixed here and reused by [`Guard::apply`],
    /// so later changes to the project identity cannot desynchronise them.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::SecurityInitialization`] if the guard directory
    /// is unavailable or either artifact cannot be resolved or written.
    pub fn new(ctx: &GuardContext<'_>) -> Result<Self> {
        Self::provision(ctx).map_err(|source| GuardError::SecurityInitialization {
            guard: NAME,
            source,
        })
    }

    fn provision(ctx: &GuardContext<'_>) -> std::result::Result<Self, ProvisionError> {
        let guard_dir = ctx.guard_dirs.guard_dir()?;
        let artifacts = WrapperArtifacts::derive(ctx.identity, ctx.profile.pointer_width());

        for plan in artifacts.all() {
            provision_artifact(ctx.resources, plan, &guard_dir)?;
        }

        info!(
            "wrapper guard provisioned for {} in {guard_dir}",
            ctx.profile
        );
        Ok(Self {
            profile: ctx.profile,
            wrapper_path: artifacts.wrapper().destination(&guard_dir),
            anti_inject_path: artifacts.anti_inject().destination(&guard_dir),
        })
    }

    /// Path of the provisioned wrapper executable.
    #[must_use]
    pub fn wrapper_path(&self) -> &Utf8Path {
        &self.wrapper_path
    }

    /// Path of the provisioned anti-injection library.
    #[must_use]
    pub fn anti_inject_path(&self) -> &Utf8Path {
        &self.anti_inject_path
    }

    /// Whether [`Guard::apply`] will redirect the launch.
    #[must_use]
    pub const fn is_applicable(&self) -> bool {
        self.profile.requires_wrapper()
    }
}

fn provision_artifact(
    resources: &dyn ResourceProvider,
    plan: &ArtifactPlan,
    guard_dir: &Utf8Path,
) -> std::result::Result<(), ProvisionError> {
    let source = plan.source();
    let destination = plan.destination(guard_dir);
    let mut reader = resources.resolve(source.logical_name(), source.category())?;

    let outcome = unpack(&mut reader, &destination).map_err(|e| ProvisionError::Unpack {
        name: source.logical_name().to_owned(),
        destination: destination.clone(),
        source: e,
    })?;

    match outcome {
        UnpackOutcome::Written => debug!("provisioned {source} as {destination}"),
        UnpackOutcome::Unchanged => trace!("{destination} already matches {source}"),
    }
    Ok(())
}

impl Guard for WrapperGuard {
    fn name(&self) -> &'static str {
        NAME
    }

    fn apply(&self, launch: &mut LaunchDescription) -> Result<()> {
        if !self.is_applicable() {
            trace!(
                "wrapper guard not applicable on {}; launch unchanged",
                self.profile
            );
            return Ok(());
        }

        // Both artifacts must still be in place.
        for path in [&self.wrapper_path, &self.anti_inject_path] {
            if !path.is_file() {
                return Err(GuardError::ArtifactMissing {
                    guard: NAME,
                    path: path.clone(),
                });
            }
        }

        info!(
            "redirecting launch from {} to {}",
            launch.executable(),
            self.wrapper_path
        );
        launch.set_executable(self.wrapper_path.clone());
        Ok(())
    }
}
