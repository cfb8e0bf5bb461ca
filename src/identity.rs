//! Project identity newtype.
//!
//! The project name is spliced into artifact file names inside the guard
//! directory, so it is validated once at construction: it must be a single,
//! non-empty path component.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The project name was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// The name is empty or whitespace only.
    #[error("project name must not be empty")]
    Empty,

    /// The name could escape or alias the guard directory.
    #[error("invalid project name {value:?}: {reason}")]
    Invalid {
        /// The rejected name.
        value: String,
        /// Which rule the name broke.
        reason: &'static str,
    },
}

/// Validated product name used to brand the wrapper executable.
///
/// # Examples
///
/// ```
/// use launch_guard::identity::ProjectIdentity;
///
/// let identity = ProjectIdentity::try_from("MyLauncher").expect("valid name");
/// assert_eq!(identity.as_str(), "MyLauncher");
/// assert!(ProjectIdentity::try_from("../evil").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectIdentity(String);

impl ProjectIdentity {
    /// Return the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Characters Windows forbids in file names, besides the path separators.
const RESERVED_CHARS: [char; 7] = [':', '<', '>', '"', '|', '?', '*'];

fn validate(value: &str) -> Result<(), IdentityError> {
    let invalid = |reason| IdentityError::Invalid {
        value: value.to_owned(),
        reason,
    };

    if value.trim().is_empty() {
        return Err(IdentityError::Empty);
    }
    if value != value.trim() {
        return Err(invalid("leading or trailing whitespace"));
    }
    if value == "." || value == ".." {
        return Err(invalid("relative directory reference"));
    }
    if value.contains(['/', '\\']) {
        return Err(invalid("contains a path separator"));
    }
    if value.contains(RESERVED_CHARS) || value.contains(char::is_control) {
        return Err(invalid("contains a character reserved in Windows file names"));
    }
    Ok(())
}

impl TryFrom<&str> for ProjectIdentity {
    type Error = IdentityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        validate(value)?;
        Ok(Self(value.to_owned()))
    }
}

impl TryFrom<String> for ProjectIdentity {
    type Error = IdentityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate(&value)?;
        Ok(Self(value))
    }
}

impl From<ProjectIdentity> for String {
    fn from(identity: ProjectIdentity) -> Self {
        identity.0
    }
}

impl AsRef<str> for ProjectIdentity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
