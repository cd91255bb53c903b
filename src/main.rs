//! p12-installer - PKCS#12 certificate bundle installer
//!
//! This tool provides functionality for:
//! - Checking whether an installed bundle needs renewal
//! - Backing up the installed bundle
//! - Packaging PEM material into a password protected PKCS#12 bundle
//! - Running installation cycles from a configuration file

mod commands;

use clap::Parser;
use console::style;
use p12_installer::cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{} {:#}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    match cli.command {
        Commands::Check(args) => commands::run_check(&args),
        Commands::Backup(args) => commands::run_backup(&args).map(|_| 0),
        Commands::Install(args) => commands::run_install(&args).map(|_| 0),
        Commands::Inspect(args) => commands::run_inspect(&args).map(|_| 0),
        Commands::Run(args) => commands::run_config(&args).map(|_| 0),
    }
}
