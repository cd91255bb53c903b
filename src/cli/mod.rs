//! Command-line interface module
//!
//! This module handles CLI argument parsing using Clap.

pub mod args;

pub use args::{
    BackupArgs, CheckArgs, Cli, Commands, InspectArgs, InstallArgs, RunArgs, TargetArgs,
};
