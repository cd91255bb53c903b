//! Utility modules for p12-installer
//!
//! This module contains error types and file helpers.

pub mod error;
pub mod fs;

pub use error::{BundleError, ConfigError, HookError, InstallerError, Material, Result};
