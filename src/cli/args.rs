//! CLI argument definitions using clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "p12-installer")]
#[command(author = "Russ McKendrick")]
#[command(version)]
#[command(about = "Renew, back up and install PKCS#12 certificate bundles", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check whether the bundle at a location needs to be (re)installed
    Check(CheckArgs),

    /// Copy the bundle at a location to <location>.bak
    Backup(BackupArgs),

    /// Package PEM material and install it as a PKCS#12 bundle
    Install(InstallArgs),

    /// Show the certificates inside a PKCS#12 bundle
    Inspect(InspectArgs),

    /// Run an installation cycle for every installation in a config file
    Run(RunArgs),
}

/// Bundle location and password, shared by several subcommands
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// PKCS#12 bundle location
    #[arg(short, long, value_name = "FILE")]
    pub file: PathBuf,

    /// PKCS#12 password (prompted for when omitted on a terminal)
    #[arg(short, long, env = "P12_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Renew when the certificate expires within this window (e.g. 30d, 12h, 10%)
    #[arg(long, default_value = "30d")]
    pub renew_before: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct BackupArgs {
    /// PKCS#12 bundle location
    #[arg(short, long, value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Args, Debug)]
pub struct InstallArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Leaf certificate PEM, optionally followed by its chain
    #[arg(long, value_name = "FILE")]
    pub cert: PathBuf,

    /// Private key PEM (defaults to the key inside --cert)
    #[arg(long, value_name = "FILE")]
    pub key: Option<PathBuf>,

    /// Chain certificates PEM
    #[arg(long, value_name = "FILE")]
    pub chain: Option<PathBuf>,

    /// Password of an encrypted private key (defaults to the bundle password)
    #[arg(long, env = "P12_KEY_PASSWORD", hide_env_values = true)]
    pub key_password: Option<String>,

    /// Renew when the certificate expires within this window (e.g. 30d, 12h, 10%)
    #[arg(long, default_value = "30d")]
    pub renew_before: String,

    /// Install even if the current bundle is still valid
    #[arg(long)]
    pub force: bool,

    /// Instruction to run after the bundle is written
    #[arg(long, value_name = "INSTRUCTION")]
    pub after_action: Option<String>,

    /// Instruction validating the install; prints 0 on success, 1 on failure
    #[arg(long, value_name = "INSTRUCTION")]
    pub install_validation: Option<String>,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Settings file (defaults to config/installer.toml)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Install even if the current bundles are still valid
    #[arg(long)]
    pub force: bool,
}
