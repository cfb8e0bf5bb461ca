//! Ordered collection of constructed guards.

use crate::error::Result;
use crate::guard::{Guard, GuardContext, GuardKind};
use crate::launch::LaunchDescription;
use log::{debug, info};

/// Guards to apply before the client starts, in registration order.
///
/// Each guard sees the launch description as left by the guards registered
/// before it.
///
/// # Examples
///
/// ```
/// use launch_guard::guard::NoGuard;
/// use launch_guard::launch::LaunchDescription;
/// use launch_guard::registry::GuardRegistry;
///
/// let mut registry = GuardRegistry::new();
/// registry.register(Box::new(NoGuard));
///
/// let mut launch = LaunchDescription::new("/usr/bin/java", Vec::new());
/// registry.apply_all(&mut launch).expect("guards applied");
/// assert_eq!(registry.names(), ["no"]);
/// ```
#[derive(Debug, Default)]
pub struct GuardRegistry {
    guards: Vec<Box<dyn Guard>>,
}

impl GuardRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct each guard in `kinds`, in order.
    ///
    /// # Errors
    ///
    /// Returns the first construction error. Guards constructed before the
    /// failure are discarded; the caller must not launch the client.
    pub fn install(kinds: &[GuardKind], ctx: &GuardContext<'_>) -> Result<Self> {
        let mut registry = Self::new();
        for kind in kinds {
            debug!("constructing guard {kind}");
            registry.register(kind.construct(ctx)?);
        }
        info!("installed guards: [{}]", registry.names().join(", "));
        Ok(registry)
    }

    /// Append an already-constructed guard.
    pub fn register(&mut self, guard: Box<dyn Guard>) {
        self.guards.push(guard);
    }

    /// Apply every guard to `launch`, in registration order.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first guard error.
    pub fn apply_all(&self, launch: &mut LaunchDescription) -> Result<()> {
        for guard in &self.guards {
            debug!("applying guard {}", guard.name());
            guard.apply(launch)?;
        }
        Ok(())
    }

    /// Names of the registered guards, in order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.guards.iter().map(|g| g.name()).collect()
    }

    /// Number of registered guards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.guards.len()
    }

    /// Whether no guards are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }
}
