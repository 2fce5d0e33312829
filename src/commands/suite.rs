//! Suite command implementation.
//!
//! Runs a single fixture directory against an arbitrary expected exit
//! code. This is the one-suite form of `run`, for checking a fixture set
//! outside the configured positive/negative pair.

use std::path::PathBuf;
use std::time::Duration;

use crate::commands::common::Invocation;
use crate::commands::run::{print_summary, run_suite, RunTotals, SuiteSpec};
use crate::commands::traits::{Command, CommandDescription};
use crate::config::Config;
use crate::error::Result;

/// Arguments for the suite command.
#[derive(Debug, Clone)]
pub struct SuiteArgs {
    /// Enable verbose output.
    pub verbose: bool,
    /// Directory holding the suite's fixture files.
    pub dir: PathBuf,
    /// Expected exit code, compared as an exact string.
    pub expect: String,
    /// Display label; defaults to the directory name.
    pub label: Option<String>,
    /// Path of the compiler executable under test.
    pub compiler: Option<PathBuf>,
    /// Directory for the shared build artifact.
    pub build_dir: Option<PathBuf>,
    /// Per-fixture timeout in seconds.
    pub timeout: Option<u64>,
}

impl Default for SuiteArgs {
    fn default() -> Self {
        Self {
            verbose: false,
            dir: PathBuf::new(),
            expect: "0".to_string(),
            label: None,
            compiler: None,
            build_dir: None,
            timeout: None,
        }
    }
}

/// Suite command handler.
pub struct SuiteCommand {
    args: SuiteArgs,
    config: Config,
}

impl SuiteCommand {
    /// Create a new SuiteCommand with the default configuration.
    pub fn new(args: SuiteArgs) -> Self {
        Self {
            args,
            config: Config::default(),
        }
    }

    /// Create a new SuiteCommand with an explicit configuration.
    pub fn with_config(args: SuiteArgs, config: Config) -> Self {
        Self { args, config }
    }

    /// Execute the command: run the one suite, print its summary, and
    /// return its totals.
    pub fn run(&self) -> Result<RunTotals> {
        let invocation = self.invocation();
        self.ensure_build_dir(&invocation)?;

        let spec = SuiteSpec::new(self.args.dir.clone(), self.label(), self.args.expect.clone());
        let totals = run_suite(&invocation, &spec);
        print_summary(&totals);
        Ok(totals)
    }

    /// The display label: explicit, or the directory's file name.
    fn label(&self) -> String {
        match &self.args.label {
            Some(label) => label.clone(),
            None => self
                .args
                .dir
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.args.dir.display().to_string()),
        }
    }

    /// Build the compiler invocation from arguments and configuration.
    fn invocation(&self) -> Invocation {
        let compiler = self
            .args
            .compiler
            .clone()
            .unwrap_or_else(|| PathBuf::from(&self.config.compiler));
        let build_dir = self
            .args
            .build_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(&self.config.build_dir));
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

    /// Ensure the build-artifact directory exists.
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

impl Command for SuiteCommand {
    type Args = SuiteArgs;
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
        "suite"
    }
}

impl CommandDescription for SuiteCommand {
    fn description() -> &'static str {
        "Run a single fixture suite"
    }

    fn help() -> &'static str {
        "Runs one fixture directory against an explicit expected exit \
         code and prints the transcript and summary for just that suite."
    }
}

/// Run the suite command with an explicit configuration.
pub fn run_single_suite(args: SuiteArgs, config: Config) -> Result<RunTotals> {
    let command = SuiteCommand::with_config(args, config);
    command.run()
}
