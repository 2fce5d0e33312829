//! Run command implementation.
//!
//! This module is the heart of the harness: it drives the compiler under
//! test over the positive and negative fixture suites, prints the per-file
//! pass/fail transcript, and reports the aggregate summary.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use owo_colors::{OwoColorize, Stream, Style};
use tracing::debug;

use crate::commands::common::{list_fixtures, relative_name, Invocation};
use crate::commands::traits::{Command, CommandDescription};
use crate::config::Config;
use crate::error::Result;

/// Arguments for the run command. Every field overrides the matching
/// configuration value when set.
#[derive(Debug, Clone, Default)]
pub struct RunArgs {
    /// Enable verbose output.
    pub verbose: bool,
    /// Path of the compiler executable under test.
    pub compiler: Option<PathBuf>,
    /// Directory of fixtures the compiler must accept.
    pub pos_dir: Option<PathBuf>,
    /// Directory of fixtures the compiler must reject.
    pub neg_dir: Option<PathBuf>,
    /// Directory for the shared build artifact.
    pub build_dir: Option<PathBuf>,
    /// Per-fixture timeout in seconds.
    pub timeout: Option<u64>,
}

/// One fixture suite: a directory of fixtures sharing an expected outcome.
#[derive(Debug, Clone)]
pub struct SuiteSpec {
    /// Directory holding the suite's fixture files.
    pub dir: PathBuf,
    /// Display label printed before the suite's transcript.
    pub label: String,
    /// Expected exit code, compared as an exact string.
    pub expected: String,
}

impl SuiteSpec {
    /// Create a new suite specification.
    pub fn new(dir: impl Into<PathBuf>, label: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            label: label.into(),
            expected: expected.into(),
        }
    }
}

/// Aggregate fixture counts for one or more suite runs.
///
/// Suite runs return their own totals and callers sum them, so there is
/// no process-wide mutable state. `success <= total` holds by
/// construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunTotals {
    /// Number of fixtures processed.
    pub total: usize,
    /// Number of fixtures whose observed exit code matched.
    pub success: usize,
}

impl RunTotals {
    /// Number of fixtures whose observed exit code did not match.
    pub fn failures(&self) -> usize {
        self.total - self.success
    }

    /// Fold another suite's totals into this one.
    pub fn absorb(&mut self, other: RunTotals) {
        self.total += other.total;
        self.success += other.success;
    }
}

impl fmt::Display for RunTotals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} tests, {} passes and {} failures.",
            self.total,
            self.success,
            self.failures()
        )
    }
}

/// Run one fixture suite and return its totals.
///
/// Prints the suite label, then one tab-indented `pass`/`fail` line per
/// fixture in directory-listing order, then a trailing blank line. A
/// fixture passes when the compiler's observed exit status equals the
/// suite's expected code as an exact string; `"0"` and `"00"` are not
/// equal. Nothing here aborts on a broken fixture: launch failures and
/// timeouts surface as non-matching observations.
pub fn run_suite(invocation: &Invocation, spec: &SuiteSpec) -> RunTotals {
    println!("{}", spec.label);

    let mut totals = RunTotals::default();
    for fixture in list_fixtures(&spec.dir, &invocation.extension) {
        totals.total += 1;
        let observed = invocation.check(&fixture);
        let name = relative_name(&spec.dir, &fixture);

        if observed == spec.expected {
            totals.success += 1;
            println!(
                "\t{} {}",
                "pass".if_supports_color(Stream::Stdout, |text| text.green()),
                name
            );
        } else {
            debug!(
                fixture = %name,
                observed = %observed,
                expected = %spec.expected,
                "exit code mismatch"
            );
            println!(
                "\t{} {}",
                "fail".if_supports_color(Stream::Stdout, |text| text.red()),
                name
            );
        }
    }

    println!();
    totals
}

/// Print the aggregate summary line.
///
/// The passes span is emphasized when at least one fixture passed and the
/// failures span when at least one failed; color never alters the
/// numerals, so stripping ANSI sequences recovers the exact counts.
pub fn print_summary(totals: &RunTotals) {
    print!("\n{} tests, ", totals.total);

    if totals.success == 0 {
        print!("{} passes", totals.success);
    } else {
        let passes = format!("{} passes", totals.success);
        print!(
            "{}",
            passes.if_supports_color(Stream::Stdout, |text| {
                text.style(Style::new().bold().green())
            })
        );
    }

    if totals.failures() == 0 {
        println!(" and {} failures.", totals.failures());
    } else {
        let failures = format!("{} failures", totals.failures());
        println!(
            " and {}.",
            failures.if_supports_color(Stream::Stdout, |text| {
                text.style(Style::new().bold().red())
            })
        );
    }
}

/// Run command handler.
pub struct RunCommand {
    args: RunArgs,
    config: Config,
}

impl RunCommand {
    /// Create a new RunCommand with the default configuration.
    pub fn new(args: RunArgs) -> Self {
        Self {
            args,
            config: Config::default(),
        }
    }

    /// Create a new RunCommand with an explicit configuration.
    pub fn with_config(args: RunArgs, config: Config) -> Self {
        Self { args, config }
    }

    /// Execute the command.
    ///
    /// Runs the positive suite (expected exit code `"0"`), then the
    /// negative suite (expected `"1"`), then prints the summary and
    /// returns the combined totals.
    pub fn run(&self) -> Result<RunTotals> {
        let invocation = self.invocation();
        self.ensure_build_dir(&invocation)?;

        println!("Running test suite...");
        println!();

        let mut totals = RunTotals::default();
        for spec in self.suite_specs() {
            totals.absorb(run_suite(&invocation, &spec));
        }

        print_summary(&totals);
        Ok(totals)
    }

    /// The two configured suites, positional overrides applied.
    fn suite_specs(&self) -> [SuiteSpec; 2] {
        let pos_dir = self
            .args
            .pos_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(&self.config.suites.pos_dir));
        let neg_dir = self
            .args
            .neg_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(&self.config.suites.neg_dir));

        [
            SuiteSpec::new(pos_dir, "pos", "0"),
            SuiteSpec::new(neg_dir, "neg", "1"),
        ]
    }

    /// Build the compiler invocation from arguments and configuration.
    fn invocation(&self) -> Invocation {
        let compiler = self
            .args
            .compiler
            .clone()
            .unwrap_or_else(|| PathBuf::from(&self.config.compiler));
        let build_dir = self.build_dir();
        let timeout = self
            .args
            .timeout
            .or(self.config.run.timeout_secs)
            .map(Duration::from_secs);

        Invocation {
            compiler,
            artifact: build_dir.join(&self.config.artifact),
            extension: self.config.extension.clone(),
            timeout,
        }
    }

    /// The effective build directory.
    fn build_dir(&self) -> PathBuf {
        self.args
            .build_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(&self.config.build_dir))
    }

    /// Ensure the build-artifact directory exists before the first
    /// compiler invocation.
    fn ensure_build_dir(&self, invocation: &Invocation) -> Result<()> {
        if let Some(parent) = invocation.artifact.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
                if self.args.verbose {
                    eprintln!("ℹ️ Created build directory: {}", parent.display());
                }
            }
        }
        Ok(())
    }
}

impl Command for RunCommand {
    type Args = RunArgs;
    type Output = RunTotals;

    fn new(args: Self::Args) -> Self {
        Self {
            args,
            config: Config::default(),
        }
    }

    fn execute(&self) -> Result<Self::Output> {
        self.run()
    }

    fn name() -> &'static str {
        "run"
    }
}

impl CommandDescription for RunCommand {
    fn description() -> &'static str {
        "Run the full fixture suite"
    }

    fn help() -> &'static str {
        "Drives the compiler under test over the positive and negative \
         fixture suites, checking each run's exit code and printing a \
         pass/fail transcript with a final summary."
    }
}

/// Run the run command with an explicit configuration.
pub fn run_all(args: RunArgs, config: Config) -> Result<RunTotals> {
    let command = RunCommand::with_config(args, config);
    command.run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    use tempfile::TempDir;

    #[test]
    fn test_totals_default() {
        let totals = RunTotals::default();
        assert_eq!(totals.total, 0);
        assert_eq!(totals.success, 0);
        assert_eq!(totals.failures(), 0);
    }

    #[test]
    fn test_totals_absorb() {
        let mut totals = RunTotals {
            total: 3,
            success: 2,
        };
        totals.absorb(RunTotals {
            total: 2,
            success: 0,
        });
        assert_eq!(totals.total, 5);
        assert_eq!(totals.success, 2);
        assert_eq!(totals.failures(), 3);
    }

    #[test]
    fn test_totals_display_all_passing() {
        let totals = RunTotals {
            total: 5,
            success: 5,
        };
        assert_eq!(totals.to_string(), "5 tests, 5 passes and 0 failures.");
    }

    #[test]
    fn test_totals_display_with_failures() {
        let totals = RunTotals {
            total: 4,
            success: 2,
        };
        assert_eq!(totals.to_string(), "4 tests, 2 passes and 2 failures.");
    }

    #[test]
    fn test_suite_specs_expectations() {
        let command = RunCommand::new(RunArgs::default());
        let [pos, neg] = command.suite_specs();
        assert_eq!(pos.label, "pos");
        assert_eq!(pos.expected, "0");
        assert_eq!(neg.label, "neg");
        assert_eq!(neg.expected, "1");
    }

    #[test]
    fn test_suite_specs_dir_overrides() {
        let args = RunArgs {
            pos_dir: Some(PathBuf::from("/tmp/accept")),
            ..RunArgs::default()
        };
        let command = RunCommand::new(args);
        let [pos, neg] = command.suite_specs();
        assert_eq!(pos.dir, PathBuf::from("/tmp/accept"));
        assert_eq!(neg.dir, PathBuf::from("test/cases/neg"));
    }

    #[test]
    fn test_invocation_from_config() {
        let command = RunCommand::new(RunArgs::default());
        let invocation = command.invocation();
        assert_eq!(invocation.compiler, PathBuf::from("build/ulpc"));
        assert_eq!(invocation.artifact, PathBuf::from("build/out"));
        assert_eq!(invocation.extension, ".ul");
        assert_eq!(invocation.timeout, None);
    }

    #[test]
    fn test_invocation_timeout_override() {
        let args = RunArgs {
            timeout: Some(7),
            ..RunArgs::default()
        };
        let command = RunCommand::new(args);
        assert_eq!(command.invocation().timeout, Some(Duration::from_secs(7)));
    }

    #[test]
    fn test_run_suite_missing_dir_counts_nothing() {
        let invocation = Invocation {
            compiler: PathBuf::from("build/ulpc"),
            artifact: PathBuf::from("build/out"),
            extension: ".ul".to_string(),
            timeout: None,
        };
        let spec = SuiteSpec::new("/nonexistent/fixture/dir", "pos", "0");

        let totals = run_suite(&invocation, &spec);
        assert_eq!(totals, RunTotals::default());
    }

    #[cfg(unix)]
    #[test]
    fn test_run_suite_counts_matches_and_mismatches() {
        use crate::commands::common::test_support::write_script;

        let dir = TempDir::new().unwrap();
        let cases = dir.path().join("cases");
        std::fs::create_dir(&cases).unwrap();
        std::fs::write(cases.join("good.ul"), "fn main() {}").unwrap();
        std::fs::write(cases.join("bad.ul"), "error").unwrap();

        // Stub compiler: reject any fixture containing the word "error".
        let compiler = write_script(
            dir.path(),
            "ulpc",
            "if grep -q error \"$2\"; then exit 1; fi\nexit 0",
        );

        let invocation = Invocation {
            compiler,
            artifact: dir.path().join("out"),
            extension: ".ul".to_string(),
            timeout: None,
        };

        let accepted = run_suite(&invocation, &SuiteSpec::new(&cases, "pos", "0"));
        assert_eq!(accepted.total, 2);
        assert_eq!(accepted.success, 1);

        let rejected = run_suite(&invocation, &SuiteSpec::new(&cases, "neg", "1"));
        assert_eq!(rejected.total, 2);
        assert_eq!(rejected.success, 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_run_command_end_to_end() {
        use crate::commands::common::test_support::write_script;

        let dir = TempDir::new().unwrap();
        let pos = dir.path().join("pos");
        let neg = dir.path().join("neg");
        std::fs::create_dir(&pos).unwrap();
        std::fs::create_dir(&neg).unwrap();
        std::fs::write(pos.join("ok.ul"), "fn main() {}").unwrap();
        std::fs::write(neg.join("broken.ul"), "error").unwrap();

        let compiler = write_script(
            dir.path(),
            "ulpc",
            "if grep -q error \"$2\"; then exit 1; fi\nexit 0",
        );

        let args = RunArgs {
            compiler: Some(compiler),
            pos_dir: Some(pos),
            neg_dir: Some(neg),
            build_dir: Some(dir.path().join("build")),
            ..RunArgs::default()
        };

        let totals = run_all(args, Config::default()).unwrap();
        assert_eq!(totals.total, 2);
        assert_eq!(totals.success, 2);
        assert_eq!(totals.failures(), 0);
        assert!(dir.path().join("build").exists());
    }

    #[test]
    fn test_run_command_name() {
        assert_eq!(<RunCommand as Command>::name(), "run");
    }

    #[test]
    fn test_run_command_description() {
        assert_eq!(
            <RunCommand as CommandDescription>::description(),
            "Run the full fixture suite"
        );
    }
}
