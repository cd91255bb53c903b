//! p12-installer Library
//!
//! Lifecycle management for a locally stored PKCS#12 certificate bundle:
//! - Deciding whether an installed bundle is missing or due for renewal
//! - Backing up the current bundle before it is replaced
//! - Packaging a PEM certificate, private key and chain into a new bundle
//! - Running post-install and validation instructions
//!
//! # Usage
//!
//! ```rust,ignore
//! use p12_installer::installer::{Installer, Pkcs12Installer};
//! use p12_installer::models::{Installation, PemCollection};
//! use p12_installer::runner::{run_cycle, CycleOptions};
//!
//! let installer = Pkcs12Installer::new(Installation::new("/etc/ssl/app.p12", "changeit"));
//! let pcc = PemCollection::new(cert_pem, key_pem).with_chain(chain_pems);
//! let report = run_cycle(&installer, &pcc, &CycleOptions::default(), &|_| {})?;
//! ```

pub mod cert_ops;
pub mod cli;
pub mod config;
pub mod installer;
pub mod models;
pub mod output;
pub mod runner;
pub mod utils;

// Re-export commonly used types
pub use cli::Cli;
pub use config::Settings;
pub use installer::{Installer, Pkcs12Installer};
pub use models::{Installation, PemCollection};
pub use utils::{InstallerError, Result};
