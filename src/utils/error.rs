//! Custom error types for p12-installer
//!
//! This module defines domain-specific error types using `thiserror` for
//! every failure mode of an installation cycle: packaging and decoding
//! bundles, configuration, post-install hooks and file I/O.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for p12-installer
#[derive(Error, Debug)]
pub enum InstallerError {
    #[error("Bundle error: {0}")]
    Bundle(#[from] BundleError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Hook error: {0}")]
    Hook(#[from] HookError),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl InstallerError {
    /// Wrap an I/O error together with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        InstallerError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Which piece of certificate material an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Material {
    Certificate,
    PrivateKey,
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Material::Certificate => write!(f, "certificate"),
            Material::PrivateKey => write!(f, "private key"),
        }
    }
}

/// PKCS#12 packaging and decoding errors
#[derive(Error, Debug)]
pub enum BundleError {
    #[error("PKCS#12 password is required")]
    MissingPassword,

    #[error("certificate and private key are required for PKCS#12: {missing} is empty")]
    MissingMaterial { missing: Material },

    #[error("missing certificate PEM: {message}")]
    PemDecode { message: String },

    #[error("failed to parse certificate bytes to X.509 certificate: {message}")]
    CertificateParse { message: String },

    #[error("chain certificate #{index} is invalid: {source}")]
    ChainEntry {
        index: usize,
        #[source]
        source: Box<BundleError>,
    },

    #[error("failed to parse private key: {message}")]
    KeyParse { message: String },

    #[error("failed to decrypt private key: {message}")]
    KeyDecrypt { message: String },

    #[error("private key does not match the leaf certificate")]
    KeyMismatch,

    #[error("PKCS#12 encode error: {message}")]
    Encode { message: String },

    #[error("failed to decode PKCS#12 bundle: {message}")]
    Decode { message: String },
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to parse configuration: {message}")]
    ParseError { message: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Missing required configuration: {key}")]
    MissingRequired { key: String },
}

/// Post-install hook errors
#[derive(Error, Debug)]
pub enum HookError {
    #[error("failed to start instruction `{instruction}`: {source}")]
    Spawn {
        instruction: String,
        #[source]
        source: std::io::Error,
    },

    #[error("instruction `{instruction}` exited with {status}: {stderr}")]
    Failed {
        instruction: String,
        status: String,
        stderr: String,
    },

    #[error("install validation reported failure (output: {output:?})")]
    ValidationFailed { output: String },
}

/// Result type alias using InstallerError
pub type Result<T> = std::result::Result<T, InstallerError>;
