//! Guard launcher library.
//!
//! The thin pipeline around the `launch_guard` core: it loads the launcher
//! configuration, resolves the guard directory, installs and applies the
//! configured guards, then starts (or reports) the protected client. It is
//! used by the `guard-launcher` binary and can be driven directly in tests.
//!
//! # Modules
//!
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - TOML launcher configuration
//! - [`dirs`] - Platform directory resolution for the default guard directory
//! - [`error`] - Launcher error type
//! - [`output`] - Stderr logging and dry-run report formatting
//! - [`pipeline`] - Guard installation and client start-up

pub mod cli;
pub mod config;
pub mod dirs;
pub mod error;
pub mod output;
pub mod pipeline;
