//! Checks the diagnostics emitted while guards are installed and applied.

use camino::Utf8Path;
use launch_guard::guard::{GuardContext, GuardKind};
use launch_guard::guard_dir::FixedGuardDir;
use launch_guard::identity::ProjectIdentity;
use launch_guard::launch::LaunchDescription;
use launch_guard::platform::{OsFamily, PlatformProfile, PointerWidth};
use launch_guard::registry::GuardRegistry;
use launch_guard::resource::EmbeddedResources;
use logtest::Logger;
use tempfile::TempDir;

#[test]
fn install_and_apply_report_the_redirect() {
    let mut logger = Logger::start();
    let temp = TempDir::new().expect("temp dir");
    let guard_dir = Utf8Path::from_path(temp.path())
        .expect("temp dir path not UTF-8")
        .join("guard");
    let dirs = FixedGuardDir::new(guard_dir.clone());
    let resources = EmbeddedResources::new()
        .with("wrapper64.exe", "guard", &b"MZwrapper"[..])
        .with("AntiInject64.dll", "guard", &b"MZdll"[..]);
    let identity = ProjectIdentity::try_from("MyLauncher").expect("valid name");
    let ctx = GuardContext {
        identity: &identity,
        profile: PlatformProfile::new(OsFamily::Windows, PointerWidth::Bits64),
        resources: &resources,
        guard_dirs: &dirs,
    };

    let registry =
        GuardRegistry::install(&[GuardKind::No, GuardKind::Wrapper], &ctx).expect("installed");
    let mut launch = LaunchDescription::new("javaw.exe", Vec::new());
    registry.apply_all(&mut launch).expect("applied");

    let mut messages = Vec::new();
    while let Some(record) = logger.pop() {
        messages.push(record.args().to_string());
    }

    assert!(
        messages.iter().any(|m| m == "installed guards: [no, wrapper]"),
        "missing install summary in {messages:?}"
    );
    let expected = format!(
        "redirecting launch from javaw.exe to {}",
        guard_dir.join("MyLauncher64.exe")
    );
    assert!(
        messages.contains(&expected),
        "missing redirect message in {messages:?}"
    );
}
