//! Common types and utilities for ulpt commands.
//!
//! This module provides the pieces shared by the suite-running commands:
//! fixture enumeration, suite-relative name rendering, and the compiler
//! invocation that turns a fixture into an observed exit-status string.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use tracing::debug;

// ============================================================================
// Fixture Discovery
// ============================================================================

/// Enumerate the fixture files directly inside `dir`.
///
/// A fixture is a regular file whose name ends with `extension`. The order
/// is whatever the platform's directory listing yields; callers must not
/// rely on it. A missing or unreadable directory yields an empty set, not
/// an error: an absent suite is a legal, silently-successful suite.
pub fn list_fixtures(dir: &Path, extension: &str) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut fixtures = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        let is_fixture = path
            .file_name()
            .map(|name| name.to_string_lossy().ends_with(extension))
            .unwrap_or(false);
        if is_fixture && path.is_file() {
            fixtures.push(path);
        }
    }
    fixtures
}

/// Render a fixture path relative to its suite directory.
///
/// Only the suite directory prefix is stripped; nested components are
/// preserved, so `<dir>/sub/example.ul` renders as `sub/example.ul`.
pub fn relative_name(dir: &Path, fixture: &Path) -> String {
    fixture
        .strip_prefix(dir)
        .unwrap_or(fixture)
        .display()
        .to_string()
}

// ============================================================================
// Compiler Invocation
// ============================================================================

/// Observed status when the compiler process cannot be launched at all.
/// The shell's command-not-found code.
pub const SPAWN_FAILED_STATUS: &str = "127";

/// Observed status when a fixture run exceeds the configured deadline.
/// Never equal to any expected exit code.
pub const TIMED_OUT_STATUS: &str = "timeout";

/// Everything needed to check one fixture against the compiler under test.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Path of the compiler executable.
    pub compiler: PathBuf,
    /// Build artifact path passed to the compiler via `-o`. Shared across
    /// all fixtures and overwritten on every run.
    pub artifact: PathBuf,
    /// Fixture file-name suffix.
    pub extension: String,
    /// Optional per-fixture deadline. `None` means a hung compiler hangs
    /// the run.
    pub timeout: Option<Duration>,
}

impl Invocation {
    /// Run the compiler against one fixture and return the observed exit
    /// status rendered as a string.
    ///
    /// The subprocess runs in silent mode with stdout and stderr
    /// discarded; only the exit status is inspected. Launch failures and
    /// timeouts render as non-matching status strings rather than
    /// errors; a single broken fixture never aborts a suite.
    pub fn check(&self, fixture: &Path) -> String {
        let mut command = Command::new(&self.compiler);
        command
            .arg("--silent")
            .arg(fixture)
            .arg("-o")
            .arg(&self.artifact)
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        debug!(
            compiler = %self.compiler.display(),
            fixture = %fixture.display(),
            "invoking compiler"
        );

        match self.timeout {
            None => match command.status() {
                Ok(status) => render_status(status),
                Err(_) => SPAWN_FAILED_STATUS.to_string(),
            },
            Some(limit) => check_with_deadline(&mut command, limit),
        }
    }
}

/// Run `command` with a deadline, killing the child on expiry.
fn check_with_deadline(command: &mut Command, limit: Duration) -> String {
    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(_) => return SPAWN_FAILED_STATUS.to_string(),
    };

    let deadline = Instant::now() + limit;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return render_status(status),
            Ok(None) => {}
            Err(_) => return SPAWN_FAILED_STATUS.to_string(),
        }

        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            debug!(limit_ms = limit.as_millis() as u64, "fixture run timed out");
            return TIMED_OUT_STATUS.to_string();
        }

        std::thread::sleep(Duration::from_millis(10));
    }
}

/// Render an exit status in its decimal string form.
///
/// A signal-killed child renders as `128 + signal`, the shell `$?`
/// convention, so expectations stay exact string comparisons.
fn render_status(status: std::process::ExitStatus) -> String {
    if let Some(code) = status.code() {
        return code.to_string();
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return (128 + signal).to_string();
        }
    }

    "unknown".to_string()
}

// ============================================================================
// Error Messages
// ============================================================================

/// Standard error message templates shared across commands.
pub mod error_messages {
    /// Error when the target path is not a directory.
    pub const TARGET_NOT_DIR: &str = "Target path is not a directory:";

    /// Error when a directory is not empty.
    pub const DIR_NOT_EMPTY: &str = "Directory is not empty:";
}

/// Test-only helpers shared by the command modules' unit tests.
#[cfg(test)]
pub(crate) mod test_support {
    use std::path::{Path, PathBuf};

    /// Write an executable stub compiler script into `dir`.
    #[cfg(unix)]
    pub(crate) fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        path
    }
}
