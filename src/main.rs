//! Ulpt CLI - the test harness for the ulp compiler.
//!
//! This is the main entry point for the ulpt CLI application.
//! It uses clap for argument parsing and dispatches to appropriate
//! command handlers based on user input.

mod commands;
mod config;
mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::run::RunTotals;
use commands::{run_all, run_init, run_single_suite, InitArgs, RunArgs, SuiteArgs};
use config::Config;
use error::{Result, UlptError};

/// Ulpt - A CLI test harness for the ulp compiler
///
/// Ulpt drives the ulpc compiler over directories of fixture files,
/// checking each run's exit code against the expected value and printing
/// a pass/fail transcript with a final summary.
#[derive(Parser, Debug)]
#[command(name = "ulpt")]
#[command(author = "ulp Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A CLI test harness for the ulp compiler", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, env = "ULPT_VERBOSE")]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "ULPT_CONFIG")]
    config: Option<PathBuf>,

    /// Disable color output
    #[arg(long, global = true, env = "ULPT_NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands for the ulpt CLI.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Initialize a new harness project
    ///
    /// Creates the fixture directories, the build directory, and a
    /// default ulpt.toml in the target directory.
    Init(InitCommand),

    /// Run the full fixture suite
    ///
    /// Runs the positive suite (fixtures that must compile, exit code 0)
    /// and the negative suite (fixtures that must be rejected, exit code
    /// 1), then prints the summary. Exits nonzero when any fixture fails.
    Run(RunCommand),

    /// Run a single fixture suite
    ///
    /// Runs one fixture directory against an explicit expected exit code.
    /// Exits nonzero when any fixture fails.
    Suite(SuiteCommand),
}

/// Arguments for the init subcommand.
#[derive(Parser, Debug)]
struct InitCommand {
    /// Directory to initialize (default: current directory)
    #[arg(short, long)]
    path: Option<PathBuf>,

    /// Force initialization even if directory is not empty
    #[arg(short, long)]
    force: bool,
}

/// Arguments for the run subcommand.
#[derive(Parser, Debug)]
struct RunCommand {
    /// Compiler executable to test (default: from config)
    #[arg(long)]
    compiler: Option<PathBuf>,

    /// Directory of fixtures expected to compile (default: from config)
    #[arg(long)]
    pos_dir: Option<PathBuf>,

    /// Directory of fixtures expected to be rejected (default: from config)
    #[arg(long)]
    neg_dir: Option<PathBuf>,

    /// Build artifact directory (default: from config)
    #[arg(long)]
    build_dir: Option<PathBuf>,

    /// Per-fixture timeout in seconds (default: none)
    #[arg(long)]
    timeout: Option<u64>,
}

/// Arguments for the suite subcommand.
#[derive(Parser, Debug)]
struct SuiteCommand {
    /// Directory holding the suite's fixture files
    dir: PathBuf,

    /// Expected exit code, compared as an exact string
    #[arg(short, long)]
    expect: String,

    /// Display label (default: the directory name)
    #[arg(short, long)]
    label: Option<String>,

    /// Compiler executable to test (default: from config)
    #[arg(long)]
    compiler: Option<PathBuf>,

    /// Build artifact directory (default: from config)
    #[arg(long)]
    build_dir: Option<PathBuf>,

    /// Per-fixture timeout in seconds (default: none)
    #[arg(long)]
    timeout: Option<u64>,
}

/// Main entry point for the ulpt CLI.
///
/// Parses command-line arguments, initializes logging, loads
/// configuration, and dispatches to the appropriate command handler.
fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        owo_colors::set_override(false);
    }

    // Initialize logging
    init_logging(cli.verbose, cli.no_color)?;

    // Load configuration
    let config = load_config(cli.config.as_deref())?;

    // Execute the selected command
    execute_command(cli.command, cli.verbose, config)
}

/// Initialize the logging system.
///
/// Diagnostics go to stderr so the stdout transcript stays clean for
/// anything parsing the harness output.
fn init_logging(verbose: bool, no_color: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let subscriber = fmt::layer()
        .with_ansi(!no_color)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()
        .map_err(|e| UlptError::Config(format!("Failed to initialize logging: {}", e)))?;

    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(config_path: Option<&std::path::Path>) -> Result<Config> {
    match config_path {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    }
}

/// Execute the selected command.
fn execute_command(command: Commands, verbose: bool, config: Config) -> Result<()> {
    match command {
        Commands::Init(args) => execute_init(args, verbose),
        Commands::Run(args) => execute_run(args, verbose, config),
        Commands::Suite(args) => execute_suite(args, verbose, config),
    }
}

/// Execute the init command.
fn execute_init(args: InitCommand, verbose: bool) -> Result<()> {
    let init_args = InitArgs {
        verbose,
        force: args.force,
        path: args.path,
    };
    run_init(init_args)
}

/// Execute the run command.
fn execute_run(args: RunCommand, verbose: bool, config: Config) -> Result<()> {
    let run_args = RunArgs {
        verbose,
        compiler: args.compiler,
        pos_dir: args.pos_dir,
        neg_dir: args.neg_dir,
        build_dir: args.build_dir,
        timeout: args.timeout,
    };
    let totals = run_all(run_args, config)?;
    exit_on_failures(totals)
}

/// Execute the suite command.
fn execute_suite(args: SuiteCommand, verbose: bool, config: Config) -> Result<()> {
    let suite_args = SuiteArgs {
        verbose,
        dir: args.dir,
        expect: args.expect,
        label: args.label,
        compiler: args.compiler,
        build_dir: args.build_dir,
        timeout: args.timeout,
    };
    let totals = run_single_suite(suite_args, config)?;
    exit_on_failures(totals)
}

/// Exit nonzero when any fixture failed, so CI can gate on the harness.
fn exit_on_failures(totals: RunTotals) -> Result<()> {
    if totals.failures() > 0 {
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_run() {
        let cli = Cli::parse_from(["ulpt", "run"]);
        assert!(matches!(cli.command, Commands::Run(_)));
    }

    #[test]
    fn test_cli_parse_run_with_compiler() {
        let cli = Cli::parse_from(["ulpt", "run", "--compiler", "target/debug/ulpc"]);
        if let Commands::Run(args) = cli.command {
            assert_eq!(args.compiler, Some(PathBuf::from("target/debug/ulpc")));
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn test_cli_parse_run_with_dirs() {
        let cli = Cli::parse_from(["ulpt", "run", "--pos-dir", "/pos", "--neg-dir", "/neg"]);
        if let Commands::Run(args) = cli.command {
            assert_eq!(args.pos_dir, Some(PathBuf::from("/pos")));
            assert_eq!(args.neg_dir, Some(PathBuf::from("/neg")));
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn test_cli_parse_run_with_timeout() {
        let cli = Cli::parse_from(["ulpt", "run", "--timeout", "30"]);
        if let Commands::Run(args) = cli.command {
            assert_eq!(args.timeout, Some(30));
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn test_cli_parse_suite() {
        let cli = Cli::parse_from(["ulpt", "suite", "test/cases/neg", "--expect", "1"]);
        if let Commands::Suite(args) = cli.command {
            assert_eq!(args.dir, PathBuf::from("test/cases/neg"));
            assert_eq!(args.expect, "1");
            assert_eq!(args.label, None);
        } else {
            panic!("Expected Suite command");
        }
    }

    #[test]
    fn test_cli_parse_suite_with_label() {
        let cli = Cli::parse_from(["ulpt", "suite", "cases", "--expect", "0", "--label", "smoke"]);
        if let Commands::Suite(args) = cli.command {
            assert_eq!(args.label, Some("smoke".to_string()));
        } else {
            panic!("Expected Suite command");
        }
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["ulpt", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }

    #[test]
    fn test_cli_parse_init_with_path_and_force() {
        let cli = Cli::parse_from(["ulpt", "init", "--path", "/tmp/harness", "--force"]);
        if let Commands::Init(args) = cli.command {
            assert_eq!(args.path, Some(PathBuf::from("/tmp/harness")));
            assert!(args.force);
        } else {
            panic!("Expected Init command");
        }
    }

    #[test]
    fn test_cli_parse_global_verbose() {
        let cli = Cli::parse_from(["ulpt", "--verbose", "run"]);
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_parse_global_config() {
        let cli = Cli::parse_from(["ulpt", "--config", "/path/to/ulpt.toml", "run"]);
        assert_eq!(cli.config, Some(PathBuf::from("/path/to/ulpt.toml")));
    }

    #[test]
    fn test_cli_parse_global_no_color() {
        let cli = Cli::parse_from(["ulpt", "--no-color", "run"]);
        assert!(cli.no_color);
    }
}
