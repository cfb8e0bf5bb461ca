//! Guard abstraction and the built-in guard strategies.
//!
//! A guard is constructed once per launcher run, provisioning whatever it
//! needs as a side effect of construction, and is later applied to the
//! [`LaunchDescription`] just before the client starts. Construction failures
//! are fatal: there is no degraded mode in which an unprotected client runs.
//!
//! # Sub-modules
//!
//! - [`no_guard`] - Guard that provisions nothing and never redirects.
//! - [`wrapper`] - Wrapper executable and anti-injection library guard.

pub mod no_guard;
pub mod wrapper;

use crate::error::{GuardError, Result};
use crate::guard_dir::GuardDirProvider;
use crate::identity::ProjectIdentity;
use crate::launch::LaunchDescription;
use crate::platform::PlatformProfile;
use crate::resource::ResourceProvider;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

pub use no_guard::NoGuard;
pub use wrapper::WrapperGuard;

/// A protection strategy applied before the client process starts.
pub trait Guard: fmt::Debug {
    /// Stable identifier, used for diagnostics only.
    fn name(&self) -> &'static str;

    /// Rewrite `launch` if this guard applies to the current platform.
    ///
    /// Applying the same guard repeatedly to an unchanged description yields
    /// the same result.
    ///
    /// # Errors
    ///
    /// Returns a [`GuardError`] if an artifact the guard relies on is no
    /// longer usable. Callers must abort the launch.
    fn apply(&self, launch: &mut LaunchDescription) -> Result<()>;
}

/// Everything a guard may consult while it is being constructed.
///
/// Values are captured by each guard at construction; later changes to the
/// sources they came from do not affect an already-built guard.
#[derive(Clone, Copy)]
pub struct GuardContext<'a> {
    /// Product name used to brand provisioned artifacts.
    pub identity: &'a ProjectIdentity,
    /// Platform facts for the client being launched.
    pub profile: PlatformProfile,
    /// Source of bundled artifacts.
    pub resources: &'a dyn ResourceProvider,
    /// Location artifacts are provisioned into.
    pub guard_dirs: &'a dyn GuardDirProvider,
}

impl fmt::Debug for GuardContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuardContext")
            .field("identity", self.identity)
            .field("profile", &self.profile)
            .finish_non_exhaustive()
    }
}

/// The guard strategies that can be selected by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum GuardKind {
    /// [`NoGuard`], selected as `"no"`.
    No,
    /// [`WrapperGuard`], selected as `"wrapper"`.
    Wrapper,
}

impl GuardKind {
    /// Every selectable guard, in declaration order.
    pub const ALL: [Self; 2] = [Self::No, Self::Wrapper];

    /// Name used to select this guard.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::No => no_guard::NAME,
            Self::Wrapper => wrapper::NAME,
        }
    }

    /// Construct the guard, provisioning its artifacts.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::SecurityInitialization`] if provisioning fails.
    pub fn construct(self, ctx: &GuardContext<'_>) -> Result<Box<dyn Guard>> {
        Ok(match self {
            Self::No => Box::new(NoGuard),
            Self::Wrapper => Box::new(WrapperGuard::new(ctx)?),
        })
    }
}

impl fmt::Display for GuardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GuardKind {
    type Err = GuardError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| GuardError::UnknownGuard {
                name: s.to_owned(),
                expected: Self::ALL.map(Self::name).join(", "),
            })
    }
}

impl TryFrom<String> for GuardKind {
    type Error = GuardError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}
