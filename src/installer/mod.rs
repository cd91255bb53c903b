//! Certificate installers
//!
//! An installer owns one on-disk target. A cycle runs `check`, then `backup`,
//! then `install`, then the two post-install hooks; see [`crate::runner`].

pub mod hooks;
pub mod pkcs12;

pub use hooks::{InstructionRunner, ShellRunner};
pub use pkcs12::Pkcs12Installer;

use crate::models::{BackupOutcome, CheckOutcome, InstructionOutput, PemCollection};
use crate::utils::Result;
use chrono::{DateTime, Utc};
use std::path::Path;

/// Steps of an installation cycle for one target
pub trait Installer {
    /// Location of the installed artifact
    fn target(&self) -> &Path;

    /// Inspect the installed artifact against `renew_before` at time `now`.
    ///
    /// An artifact that exists but cannot be read or decoded is an error,
    /// never a reason to install.
    fn assess_at(&self, renew_before: &str, now: DateTime<Utc>) -> Result<CheckOutcome>;

    /// Whether an install is needed right now
    fn check(&self, renew_before: &str) -> Result<bool> {
        self.check_at(renew_before, Utc::now())
    }

    fn check_at(&self, renew_before: &str, now: DateTime<Utc>) -> Result<bool> {
        Ok(self.assess_at(renew_before, now)?.needs_install())
    }

    /// Copy the installed artifact aside before it is replaced
    fn backup(&self) -> Result<BackupOutcome>;

    /// Package `pcc` and write it to the target. Returns the bytes written.
    fn install(&self, pcc: &PemCollection) -> Result<usize>;

    /// Run the configured after-install instruction, if any
    fn after_install_actions(&self) -> Result<Option<InstructionOutput>>;

    /// Run the configured validation instruction, if any. By convention it
    /// prints `0` for success and `1` for failure; the output is returned
    /// uninterpreted.
    fn install_validation_actions(&self) -> Result<Option<InstructionOutput>>;
}
