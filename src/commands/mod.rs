//! Command modules for the ulpt CLI.
//!
//! This module contains implementations for all available subcommands.
//! Each subcommand is implemented in its own file following a
//! standardized pattern.

pub mod common;
pub mod traits;

pub mod init;
pub mod run;
pub mod suite;

// Re-export command types and functions
pub use init::{run_init, InitArgs};
pub use run::{run_all, RunArgs};
pub use suite::{run_single_suite, SuiteArgs};
