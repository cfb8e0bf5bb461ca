//! Launch guard core.
//!
//! Provisions protection artifacts before a client process starts and
//! rewrites the launch so the client runs under that protection. The
//! [`registry::GuardRegistry`] builds the configured guards from a
//! [`guard::GuardContext`] and applies them, in order, to a
//! [`launch::LaunchDescription`].
//!
//! # Modules
//!
//! - [`platform`] - OS family and pointer width of the client.
//! - [`identity`] - Validated project name used to brand artifacts.
//! - [`artifact`] - Names of the bundled artifacts and their destinations.
//! - [`resource`] - Sources of bundled artifact bytes.
//! - [`guard_dir`] - Private directory that receives provisioned artifacts.
//! - [`unpack`] - Atomic copy of a byte stream to a destination file.
//! - [`launch`] - What is finally executed.
//! - [`guard`] - The guard trait and the built-in strategies.
//! - [`registry`] - Ordered construction and application of guards.
//! - [`error`] - Error types shared by the modules above.

pub mod artifact;
pub mod error;
pub mod guard;
pub mod guard_dir;
pub mod identity;
pub mod launch;
pub mod platform;
pub mod registry;
pub mod resource;
pub mod unpack;

pub use error::{GuardDirError, GuardError, ProvisionError, ResourceError, Result};
pub use guard::{Guard, GuardContext, GuardKind, NoGuard, WrapperGuard};
pub use guard_dir::{FixedGuardDir, GuardDirProvider};
pub use identity::ProjectIdentity;
pub use launch::LaunchDescription;
pub use platform::{OsFamily, PlatformProfile, PointerWidth};
pub use registry::GuardRegistry;
pub use resource::{DirectoryResources, EmbeddedResources, ResourceProvider, ResourceReader};
