//! Structured results of the installation steps
//!
//! Every step reports what it did through these values so callers can act
//! on, display or serialize the outcome without relying on log output.

use crate::models::CertificateValidity;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Result of inspecting an installation target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckOutcome {
    /// Nothing installed at the target path
    Missing,
    /// The installed leaf expires within the renewal window
    RenewalDue { validity: CertificateValidity },
    /// The installed leaf is valid beyond the renewal window
    Valid { validity: CertificateValidity },
}

impl CheckOutcome {
    /// Whether an install should proceed
    pub fn needs_install(&self) -> bool {
        !matches!(self, CheckOutcome::Valid { .. })
    }

    pub fn validity(&self) -> Option<&CertificateValidity> {
        match self {
            CheckOutcome::Missing => None,
            CheckOutcome::RenewalDue { validity } | CheckOutcome::Valid { validity } => {
                Some(validity)
            }
        }
    }
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckOutcome::Missing => write!(f, "no certificate installed"),
            CheckOutcome::RenewalDue { validity } => write!(
                f,
                "renewal due (expires {})",
                validity.not_after.format("%Y-%m-%d %H:%M:%S UTC")
            ),
            CheckOutcome::Valid { validity } => write!(
                f,
                "valid until {}",
                validity.not_after.format("%Y-%m-%d %H:%M:%S UTC")
            ),
        }
    }
}

/// Result of backing up an installation target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BackupOutcome {
    /// No file existed, nothing to protect
    Skipped,
    /// The existing file was copied aside
    Created { backup_path: PathBuf, bytes: u64 },
}

impl fmt::Display for BackupOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackupOutcome::Skipped => write!(f, "no existing certificate, no backup taken"),
            BackupOutcome::Created { backup_path, bytes } => {
                write!(f, "backed up {} bytes to {}", bytes, backup_path.display())
            }
        }
    }
}

/// Output of a post-install instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstructionOutput {
    /// Trimmed standard output
    pub stdout: String,
    /// Trimmed standard error
    pub stderr: String,
    /// `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
    pub success: bool,
}

impl InstructionOutput {
    /// Interpret the `"0"` (passed) / `"1"` (failed) validation convention.
    ///
    /// Any other output is `None`; what that means is up to the caller.
    pub fn validation_passed(&self) -> Option<bool> {
        match self.stdout.trim() {
            "0" => Some(true),
            "1" => Some(false),
            _ => None,
        }
    }
}

/// What an installation cycle ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleAction {
    /// The installed bundle is still valid, nothing was touched
    Skipped,
    /// A new bundle was written
    Installed,
}

/// Summary of one installation cycle
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub target: PathBuf,
    pub action: CycleAction,
    /// `None` when the check was bypassed with `force`
    pub check: Option<CheckOutcome>,
    pub backup: Option<BackupOutcome>,
    /// Size of the written bundle
    pub bundle_bytes: Option<usize>,
    pub after_install: Option<InstructionOutput>,
    pub validation: Option<InstructionOutput>,
}

impl CycleReport {
    pub(crate) fn new(target: PathBuf) -> Self {
        Self {
            target,
            action: CycleAction::Skipped,
            check: None,
            backup: None,
            bundle_bytes: None,
            after_install: None,
            validation: None,
        }
    }

    pub fn installed(&self) -> bool {
        self.action == CycleAction::Installed
    }
}
