//! Guard that deliberately does nothing.

use super::Guard;
use crate::error::Result;
use crate::launch::LaunchDescription;

/// Name of the no-op guard.
pub const NAME: &str = "no";

/// Selected when a project ships without launch protection.
///
/// Provisions nothing and leaves every launch description untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGuard;

impl Guard for NoGuard {
    fn name(&self) -> &'static str {
        NAME
    }

    fn apply(&self, _launch: &mut LaunchDescription) -> Result<()> {
        Ok(())
    }
}
