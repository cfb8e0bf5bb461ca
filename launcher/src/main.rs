//! Guard launcher CLI entrypoint.
//!
//! Provisions the configured launch guards and starts the protected client,
//! exiting with the client's exit code. The client is never started if a
//! guard cannot be initialised.

use clap::Parser;
use launch_guard_launcher::cli::Cli;
use launch_guard_launcher::dirs::SystemBaseDirs;
use launch_guard_launcher::error::Result;
use launch_guard_launcher::output::{init_logging, write_stderr_line};
use launch_guard_launcher::pipeline::run;
use std::error::Error as _;
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_level());

    let dirs = SystemBaseDirs::new();
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &dirs, &mut stdout);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn exit_code_for_run_result(result: Result<i32>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(code) => code,
        Err(err) => {
            write_stderr_line(stderr, format_args!("error: {err}"));
            let mut source = err.source();
            while let Some(cause) = source {
                write_stderr_line(stderr, format_args!("  caused by: {cause}"));
                source = cause.source();
            }
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use launch_guard::error::{GuardError, ProvisionError, ResourceError};
    use launch_guard_launcher::error::LauncherError;
    use rstest::rstest;

    #[rstest]
    #[case::success(0)]
    #[case::client_failure(3)]
    fn client_exit_code_is_passed_through(#[case] code: i32) {
        let mut stderr = Vec::new();
        assert_eq!(exit_code_for_run_result(Ok(code), &mut stderr), code);
        assert!(stderr.is_empty());
    }

    #[test]
    fn errors_print_their_causes_and_return_one() {
        let err = LauncherError::Guard(GuardError::SecurityInitialization {
            guard: "wrapper",
            source: ProvisionError::Resolution(ResourceError::NotFound {
                name: "wrapper64.exe".to_owned(),
                category: "guard".to_owned(),
            }),
        });

        let mut stderr = Vec::new();
        let exit_code = exit_code_for_run_result(Err(err), &mut stderr);
        assert_eq!(exit_code, 1);

        let text = String::from_utf8(stderr).expect("stderr was not UTF-8");
        assert!(text.contains("error: security initialisation failed for guard wrapper"));
        assert!(text.contains("caused by: bundled resource wrapper64.exe (category guard) not found"));
    }

    #[test]
    fn config_errors_name_the_file() {
        let err = LauncherError::ConfigRead {
            path: Utf8PathBuf::from("launcher.toml"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };

        let mut stderr = Vec::new();
        assert_eq!(exit_code_for_run_result(Err(err), &mut stderr), 1);
        let text = String::from_utf8(stderr).expect("stderr was not UTF-8");
        assert!(text.contains("launcher.toml"));
    }
}
