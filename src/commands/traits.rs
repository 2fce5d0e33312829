//! Command trait definitions for the ulpt CLI.
//!
//! Every subcommand implements these traits so construction, execution,
//! and help text follow one shape across the application.

#![allow(dead_code)]

use crate::error::Result;

/// Standard command trait that all ulpt commands implement.
///
/// # Type Parameters
/// * `Args` - The arguments type for this command
/// * `Output` - The output type returned by this command
pub trait Command {
    /// The arguments type for this command.
    type Args;

    /// The output type returned by this command. Suite-running commands
    /// return their totals; others return nothing.
    type Output;

    /// Create a new command instance with the given arguments.
    fn new(args: Self::Args) -> Self;

    /// Execute the command.
    fn execute(&self) -> Result<Self::Output>;

    /// Get the command name.
    fn name() -> &'static str;
}

/// Trait for providing command descriptions and help text.
pub trait CommandDescription {
    /// Get a short description of the command.
    fn description() -> &'static str;

    /// Get detailed help text for the command.
    fn help() -> &'static str;
}
