//! Host platform classification.
//!
//! A [`PlatformProfile`] captures the two facts that drive artifact naming and
//! guard applicability: the operating system family and the pointer width of
//! the client being launched. Classification never fails; hosts that do not
//! match a known family map to [`OsFamily::Other`].

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Operating system family of the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsFamily {
    /// Microsoft Windows. The only family that requires the wrapper guard.
    Windows,
    /// Linux and other Linux-based systems.
    Linux,
    /// Apple macOS.
    #[serde(rename = "macos")]
    MacOs,
    /// Anything that could not be classified.
    Other,
}

impl OsFamily {
    /// Classify an OS name as reported by [`std::env::consts::OS`].
    ///
    /// # Examples
    ///
    /// ```
    /// use launch_guard::platform::OsFamily;
    ///
    /// assert_eq!(OsFamily::from_os_name("windows"), OsFamily::Windows);
    /// assert_eq!(OsFamily::from_os_name("plan9"), OsFamily::Other);
    /// ```
    #[must_use]
    pub fn from_os_name(name: &str) -> Self {
        match name {
            "windows" => Self::Windows,
            "linux" | "android" => Self::Linux,
            "macos" => Self::MacOs,
            _ => Self::Other,
        }
    }

    /// Whether launches on this family must go through the wrapper binary.
    #[must_use]
    pub const fn requires_wrapper(self) -> bool {
        matches!(self, Self::Windows)
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Windows => "windows",
            Self::Linux => "linux",
            Self::MacOs => "macos",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// Pointer width of the launched client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PointerWidth {
    /// 32-bit client.
    Bits32,
    /// 64-bit client.
    Bits64,
}

impl PointerWidth {
    /// Width of the compiling target. Anything narrower than 64 bits is
    /// treated as 32-bit.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(target_pointer_width = "64") {
            Self::Bits64
        } else {
            Self::Bits32
        }
    }

    /// Number of bits, as used in artifact names.
    #[must_use]
    pub const fn bits(self) -> u8 {
        match self {
            Self::Bits32 => 32,
            Self::Bits64 => 64,
        }
    }
}

impl fmt::Display for PointerWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

/// A pointer width other than 32 or 64 was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unsupported pointer width {value}; expected 32 or 64")]
pub struct PlatformError {
    /// The rejected width.
    pub value: u8,
}

impl TryFrom<u8> for PointerWidth {
    type Error = PlatformError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            32 => Ok(Self::Bits32),
            64 => Ok(Self::Bits64),
            _ => Err(PlatformError { value }),
        }
    }
}

impl From<PointerWidth> for u8 {
    fn from(width: PointerWidth) -> Self {
        width.bits()
    }
}

/// Immutable snapshot of the platform facts used by guards.
///
/// # Examples
///
/// ```
/// use launch_guard::platform::{OsFamily, PlatformProfile, PointerWidth};
///
/// let profile = PlatformProfile::new(OsFamily::Windows, PointerWidth::Bits64);
/// assert!(profile.requires_wrapper());
/// assert_eq!(profile.pointer_width().bits(), 64);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PlatformProfile {
    os_family: OsFamily,
    pointer_width: PointerWidth,
}

impl PlatformProfile {
    /// Build a profile from explicit facts.
    #[must_use]
    pub const fn new(os_family: OsFamily, pointer_width: PointerWidth) -> Self {
        Self {
            os_family,
            pointer_width,
        }
    }

    /// Classify the host this process runs on.
    #[must_use]
    pub fn current() -> Self {
        Self::new(
            OsFamily::from_os_name(std::env::consts::OS),
            PointerWidth::current(),
        )
    }

    /// Return a copy with the pointer width replaced.
    ///
    /// The client may be built for a different width than the launcher.
    #[must_use]
    pub const fn with_pointer_width(self, pointer_width: PointerWidth) -> Self {
        Self::new(self.os_family, pointer_width)
    }

    /// Operating system family.
    #[must_use]
    pub const fn os_family(&self) -> OsFamily {
        self.os_family
    }

    /// Pointer width of the client.
    #[must_use]
    pub const fn pointer_width(&self) -> PointerWidth {
        self.pointer_width
    }

    /// Whether launches must be redirected through the wrapper binary.
    #[must_use]
    pub const fn requires_wrapper(&self) -> bool {
        self.os_family.requires_wrapper()
    }
}

impl fmt::Display for PlatformProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}bit", self.os_family, self.pointer_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::windows("windows", OsFamily::Windows)]
    #[case::linux("linux", OsFamily::Linux)]
    #[case::android("android", OsFamily::Linux)]
    #[case::macos("macos", OsFamily::MacOs)]
    #[case::freebsd("freebsd", OsFamily::Other)]
    #[case::empty("", OsFamily::Other)]
    fn classifies_os_names(#[case] name: &str, #[case] expected: OsFamily) {
        assert_eq!(OsFamily::from_os_name(name), expected);
    }

    #[rstest]
    #[case::windows(OsFamily::Windows, true)]
    #[case::linux(OsFamily::Linux, false)]
    #[case::macos(OsFamily::MacOs, false)]
    #[case::other(OsFamily::Other, false)]
    fn only_windows_requires_wrapper(#[case] family: OsFamily, #[case] expected: bool) {
        assert_eq!(family.requires_wrapper(), expected);
    }

    #[rstest]
    #[case(32, PointerWidth::Bits32)]
    #[case(64, PointerWidth::Bits64)]
    fn pointer_width_accepts_known_values(#[case] value: u8, #[case] expected: PointerWidth) {
        let width = PointerWidth::try_from(value).expect("supported width");
        assert_eq!(width, expected);
        assert_eq!(width.bits(), value);
    }

    #[rstest]
    #[case(0)]
    #[case(16)]
    #[case(128)]
    fn pointer_width_rejects_other_values(#[case] value: u8) {
        let err = PointerWidth::try_from(value).expect_err("unsupported width");
        assert_eq!(err.value, value);
    }

    #[test]
    fn current_profile_matches_compile_target() {
        let profile = PlatformProfile::current();
        assert_eq!(
            profile.pointer_width().bits() == 64,
            cfg!(target_pointer_width = "64")
        );
        assert_eq!(
            profile.os_family() == OsFamily::Windows,
            cfg!(target_os = "windows")
        );
    }

    #[test]
    fn with_pointer_width_keeps_os_family() {
        let profile = PlatformProfile::new(OsFamily::Windows, PointerWidth::Bits64)
            .with_pointer_width(PointerWidth::Bits32);
        assert_eq!(profile.os_family(), OsFamily::Windows);
        assert_eq!(profile.pointer_width(), PointerWidth::Bits32);
    }

    #[test]
    fn display_includes_family_and_width() {
        let profile = PlatformProfile::new(OsFamily::Linux, PointerWidth::Bits32);
        assert_eq!(profile.to_string(), "linux-32bit");
    }
}
