//! Artifact naming policy for the wrapper guard.
//!
//! Both the provisioning step and the launch redirect derive file names from
//! [`WrapperArtifacts::derive`], so the two can never disagree about where the
//! wrapper executable lives.
//!
//! For a pointer width of `bits`:
//!
//! | artifact       | bundled as              | written as                 |
//! |----------------|-------------------------|----------------------------|
//! | wrapper        | `wrapper{bits}.exe`     | `{project}{bits}.exe`      |
//! | anti-injection | `AntiInject{bits}.dll`  | `AntiInject{bits}.dll`     |
//!
//! Both are looked up under the [`GUARD_CATEGORY`] resource category.

use crate::identity::ProjectIdentity;
use crate::platform::PointerWidth;
use camino::{Utf8Path, Utf8PathBuf};
use std::fmt;

/// Resource category holding all guard artifacts.
pub const GUARD_CATEGORY: &str = "guard";

/// Lookup key for a bundled artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactDescriptor {
    logical_name: String,
    category: &'static str,
}

impl ArtifactDescriptor {
    /// Create a descriptor in the guard category.
    #[must_use]
    pub fn guard(logical_name: String) -> Self {
        Self {
            logical_name,
            category: GUARD_CATEGORY,
        }
    }

    /// Name the artifact is bundled under.
    #[must_use]
    pub fn logical_name(&self) -> &str {
        &self.logical_name
    }

    /// Resource category the artifact is bundled under.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        self.category
    }
}

impl fmt::Display for ArtifactDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category, self.logical_name)
    }
}

/// A bundled artifact paired with the file name it is written under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPlan {
    source: ArtifactDescriptor,
    file_name: String,
}

impl ArtifactPlan {
    /// Where the artifact is resolved from.
    #[must_use]
    pub const fn source(&self) -> &ArtifactDescriptor {
        &self.source
    }

    /// File name inside the guard directory.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Full destination path beneath `guard_dir`.
    #[must_use]
    pub fn destination(&self, guard_dir: &Utf8Path) -> Utf8PathBuf {
        guard_dir.join(&self.file_name)
    }
}

/// The pair of artifacts the wrapper guard provisions.
///
/// # Examples
///
/// ```
/// use launch_guard::artifact::WrapperArtifacts;
/// use launch_guard::identity::ProjectIdentity;
/// use launch_guard::platform::PointerWidth;
///
/// let identity = ProjectIdentity::try_from("MyLauncher").expect("valid name");
/// let artifacts = WrapperArtifacts::derive(&identity, PointerWidth::Bits64);
///
/// assert_eq!(artifacts.wrapper().source().logical_name(), "wrapper64.exe");
/// assert_eq!(artifacts.wrapper().file_name(), "MyLauncher64.exe");
/// assert_eq!(artifacts.anti_inject().file_name(), "AntiInject64.dll");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapperArtifacts {
    wrapper: ArtifactPlan,
    anti_inject: ArtifactPlan,
}

impl WrapperArtifacts {
    /// Derive both artifact plans for a project and pointer width.
    #[must_use]
    pub fn derive(identity: &ProjectIdentity, width: PointerWidth) -> Self {
        let bits = width.bits();
        let anti_inject_name = format!("AntiInject{bits}.dll");
        Self {
            wrapper: ArtifactPlan {
                source: ArtifactDescriptor::guard(format!("wrapper{bits}.exe")),
                file_name: format!("{identity}{bits}.exe"),
            },
            anti_inject: ArtifactPlan {
                source: ArtifactDescriptor::guard(anti_inject_name.clone()),
                file_name: anti_inject_name,
            },
        }
    }

    /// The branded wrapper executable.
    #[must_use]
    pub const fn wrapper(&self) -> &ArtifactPlan {
        &self.wrapper
    }

    /// The anti-injection library loaded by the wrapper.
    #[must_use]
    pub const fn anti_inject(&self) -> &ArtifactPlan {
        &self.anti_inject
    }

    /// Both plans, wrapper first.
    #[must_use]
    pub fn all(&self) -> [&ArtifactPlan; 2] {
        [&self.wrapper, &self.anti_inject]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn identity() -> ProjectIdentity {
        ProjectIdentity::try_from("MyLauncher").expect("valid name")
    }

    #[rstest]
    #[case::bits32(PointerWidth::Bits32, "wrapper32.exe", "MyLauncher32.exe", "AntiInject32.dll")]
    #[case::bits64(PointerWidth::Bits64, "wrapper64.exe", "MyLauncher64.exe", "AntiInject64.dll")]
    fn derives_names_for_width(
        identity: ProjectIdentity,
        #[case] width: PointerWidth,
        #[case] wrapper_source: &str,
        #[case] wrapper_file: &str,
        #[case] anti_inject: &str,
    ) {
        let artifacts = WrapperArtifacts::derive(&identity, width);

        assert_eq!(artifacts.wrapper().source().logical_name(), wrapper_source);
        assert_eq!(artifacts.wrapper().file_name(), wrapper_file);
        assert_eq!(artifacts.anti_inject().source().logical_name(), anti_inject);
        assert_eq!(artifacts.anti_inject().file_name(), anti_inject);
    }

    #[rstest]
    fn all_artifacts_use_guard_category(identity: ProjectIdentity) {
        let artifacts = WrapperArtifacts::derive(&identity, PointerWidth::Bits64);
        for plan in artifacts.all() {
            assert_eq!(plan.source().category(), "guard");
        }
    }

    #[rstest]
    fn destination_is_inside_guard_dir(identity: ProjectIdentity) {
        let artifacts = WrapperArtifacts::derive(&identity, PointerWidth::Bits32);
        let guard_dir = Utf8Path::new("/var/lib/launcher/guard");

        assert_eq!(
            artifacts.wrapper().destination(guard_dir),
            Utf8PathBuf::from("/var/lib/launcher/guard/MyLauncher32.exe")
        );
    }

    #[test]
    fn descriptor_display_shows_category_and_name() {
        let descriptor = ArtifactDescriptor::guard("AntiInject64.dll".to_owned());
        assert_eq!(descriptor.to_string(), "guard/AntiInject64.dll");
    }
}
