//! All-or-nothing artifact unpacking.
//!
//! Bytes are streamed into a temporary file created beside the destination,
//! flushed to disk, and renamed over the destination in a single step. A
//! failure at any point drops the temporary file, so the destination is either
//! absent, untouched, or complete. Concurrent launchers racing on the same
//! destination each rename a complete file into place.

use camino::Utf8Path;
use log::{debug, trace};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, ErrorKind, Read, Write};

/// What [`unpack`] did to the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnpackOutcome {
    /// The destination was created or replaced.
    Written,
    /// The destination already held identical bytes and was left alone.
    Unchanged,
}

/// Copy `source` to `destination` atomically.
///
/// If `destination` already contains exactly the bytes of `source`, it is not
/// rewritten and [`UnpackOutcome::Unchanged`] is returned.
///
/// # Errors
///
/// Returns the underlying I/O error if reading the source, writing the
/// temporary file, or renaming it into place fails. In that case the
/// destination keeps its prior state.
///
/// # Examples
///
/// ```
/// use launch_guard::unpack::{unpack, UnpackOutcome};
///
/// let temp = tempfile::tempdir().expect("temp dir");
/// let dest = camino::Utf8PathBuf::try_from(temp.path().join("AntiInject64.dll"))
///     .expect("UTF-8 path");
///
/// let outcome = unpack(&mut &b"library"[..], &dest).expect("unpacked");
/// assert_eq!(outcome, UnpackOutcome::Written);
/// assert_eq!(std::fs::read(&dest).expect("readable"), b"library");
/// ```
pub fn unpack(source: &mut dyn Read, destination: &Utf8Path) -> io::Result<UnpackOutcome> {
    let parent = destination
        .parent()
        .filter(|p| !p.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));

    let mut staged = tempfile::Builder::new()
        .prefix(".unpack-")
        .suffix(".part")
        .tempfile_in(parent)?;

    let mut writer = HashingWriter::new(staged.as_file_mut());
    let written = io::copy(source, &mut writer)?;
    let digest = writer.finish();
    staged.as_file().sync_all()?;

    if existing_digest(destination)?.as_ref() == Some(&digest) {
        trace!("{destination} already up to date ({written} bytes)");
        return Ok(UnpackOutcome::Unchanged);
    }

    staged.persist(destination).map_err(|e| e.error)?;
    debug!("unpacked {written} bytes to {destination}");
    Ok(UnpackOutcome::Written)
}

type Sha256Output = sha2::digest::Output<Sha256>;

/// Digest of the file currently at `path`, if any.
fn existing_digest(path: &Utf8Path) -> io::Result<Option<Sha256Output>> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(Some(hasher.finalize()))
}

/// Forwards writes while hashing everything that passes through.
struct HashingWriter<W> {
    inner: W,
    hasher: Sha256,
}

impl<W: Write> HashingWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            hasher: Sha256::new(),
        }
    }

    fn finish(self) -> Sha256Output {
        self.hasher.finalize()
    }
}

impl<W: Write> Write for HashingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.hasher.update(buf.get(..n).unwrap_or_default());
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    fn utf8_temp() -> (TempDir, Utf8PathBuf) {
        let temp = tempfile::tempdir().expect("temp dir");
        let root = Utf8PathBuf::try_from(temp.path().to_path_buf()).expect("UTF-8 path");
        (temp, root)
    }

    /// Yields some bytes, then fails.
    struct FailingReader {
        remaining: &'static [u8],
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.remaining.is_empty() {
                return Err(io::Error::other("source truncated"));
            }
            let n = self.remaining.len().min(buf.len());
            buf[..n].copy_from_slice(&self.remaining[..n]);
            self.remaining = &self.remaining[n..];
            Ok(n)
        }
    }

    fn entries(dir: &Utf8Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .expect("read dir")
            .map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn writes_new_destination() {
        let (_temp, root) = utf8_temp();
        let dest = root.join("MyLauncher64.exe");

        let outcome = unpack(&mut &b"wrapper bytes"[..], &dest).expect("unpack");

        assert_eq!(outcome, UnpackOutcome::Written);
        assert_eq!(std::fs::read(&dest).expect("read"), b"wrapper bytes");
        assert_eq!(entries(&root), vec!["MyLauncher64.exe"]);
    }

    #[test]
    fn replaces_stale_destination() {
        let (_temp, root) = utf8_temp();
        let dest = root.join("AntiInject32.dll");
        std::fs::write(&dest, b"old").expect("seed");

        let outcome = unpack(&mut &b"new library"[..], &dest).expect("unpack");

        assert_eq!(outcome, UnpackOutcome::Written);
        assert_eq!(std::fs::read(&dest).expect("read"), b"new library");
    }

    #[test]
    fn skips_identical_destination() {
        let (_temp, root) = utf8_temp();
        let dest = root.join("AntiInject64.dll");
        std::fs::write(&dest, b"same").expect("seed");

        let outcome = unpack(&mut &b"same"[..], &dest).expect("unpack");

        assert_eq!(outcome, UnpackOutcome::Unchanged);
        assert_eq!(entries(&root), vec!["AntiInject64.dll"]);
    }

    #[test]
    fn failed_read_leaves_no_destination() {
        let (_temp, root) = utf8_temp();
        let dest = root.join("MyLauncher32.exe");
        let mut source = FailingReader {
            remaining: b"partial",
        };

        let err = unpack(&mut source, &dest).expect_err("read failure");

        assert_eq!(err.to_string(), "source truncated");
        assert!(!dest.exists());
        assert!(entries(&root).is_empty(), "temporary file left behind");
    }

    #[test]
    fn failed_read_preserves_prior_destination() {
        let (_temp, root) = utf8_temp();
        let dest = root.join("MyLauncher32.exe");
        std::fs::write(&dest, b"previous good copy").expect("seed");
        let mut source = FailingReader {
            remaining: b"partial",
        };

        unpack(&mut source, &dest).expect_err("read failure");

        assert_eq!(std::fs::read(&dest).expect("read"), b"previous good copy");
        assert_eq!(entries(&root), vec!["MyLauncher32.exe"]);
    }

    #[test]
    fn missing_parent_directory_is_an_error() {
        let (_temp, root) = utf8_temp();
        let dest = root.join("absent").join("wrapper.exe");

        let err = unpack(&mut &b"bytes"[..], &dest).expect_err("no parent");

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(!dest.exists());
    }

    #[cfg(unix)]
    #[test]
    fn read_only_directory_is_an_error() {
        use std::os::unix::fs::PermissionsExt;

        // Root bypasses directory permissions.
        if unsafe { libc::geteuid() } == 0 {
            return;
        }

        let (_temp, root) = utf8_temp();
        let locked = root.join("locked");
        std::fs::create_dir(&locked).expect("mkdir");
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o555))
            .expect("chmod");
        let dest = locked.join("MyLauncher64.exe");

        let err = unpack(&mut &b"bytes"[..], &dest).expect_err("not writable");

        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
        assert!(!dest.exists());
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755))
            .expect("restore permissions");
    }
}
