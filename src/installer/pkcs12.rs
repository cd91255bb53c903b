//! PKCS#12 installer
//!
//! Installs a certificate, its key and chain as a single password protected
//! PKCS#12 file, keeping a `.bak` copy of whatever was there before.

use crate::cert_ops::{bundle, RenewalThreshold};
use crate::installer::hooks::{InstructionRunner, ShellRunner};
use crate::installer::Installer;
use crate::models::{BackupOutcome, CheckOutcome, Installation, InstructionOutput, PemCollection};
use crate::utils::{fs, BundleError, HookError, InstallerError, Result};
use chrono::{DateTime, Utc};

/// Installer for the PKCS#12 bundle format
#[derive(Debug, Clone)]
pub struct Pkcs12Installer<R = ShellRunner> {
    installation: Installation,
    runner: R,
}

impl Pkcs12Installer<ShellRunner> {
    pub fn new(installation: Installation) -> Self {
        Self::with_runner(installation, ShellRunner::new())
    }
}

impl<R: InstructionRunner> Pkcs12Installer<R> {
    /// Use a custom instruction runner for the post-install hooks
    pub fn with_runner(installation: Installation, runner: R) -> Self {
        Self {
            installation,
            runner,
        }
    }

    fn run_hook(&self, name: &str, instruction: Option<&str>) -> Result<Option<InstructionOutput>> {
        let Some(instruction) = instruction.filter(|i| !i.trim().is_empty()) else {
            tracing::debug!(hook = name, "no instruction configured");
            return Ok(None);
        };

        tracing::debug!(
            hook = name,
            location = %self.installation.file.display(),
            "running {} actions",
            name
        );

        let output = self.runner.run_instruction(instruction)?;
        if !output.success {
            return Err(HookError::Failed {
                instruction: instruction.to_string(),
                status: match output.exit_code {
                    Some(code) => format!("exit code {}", code),
                    None => "a signal".to_string(),
                },
                stderr: output.stderr,
            }
            .into());
        }

        Ok(Some(output))
    }
}

impl<R: InstructionRunner> Installer for Pkcs12Installer<R> {
    fn target(&self) -> &std::path::Path {
        &self.installation.file
    }

    fn assess_at(&self, renew_before: &str, now: DateTime<Utc>) -> Result<CheckOutcome> {
        let file = &self.installation.file;
        tracing::info!(
            format = "PKCS12",
            location = %file.display(),
            "checking certificate health"
        );

        let threshold: RenewalThreshold = renew_before.parse()?;

        if !fs::file_exists(file)? {
            return Ok(CheckOutcome::Missing);
        }

        let data = std::fs::read(file).map_err(|e| {
            tracing::error!(location = %file.display(), "could not read PKCS12 file");
            InstallerError::io(file, e)
        })?;

        let decoded = bundle::decode_bundle(&data, &self.installation.p12_password)?;
        let validity = decoded.leaf_validity()?;

        if validity.is_expired_at(now) {
            tracing::warn!(
                location = %file.display(),
                not_after = %validity.not_after,
                "installed certificate has already expired"
            );
        }

        if threshold.renewal_due(&validity, now) {
            tracing::info!(
                location = %file.display(),
                not_after = %validity.not_after,
                renew_before = %threshold,
                "certificate is due for renewal"
            );
            Ok(CheckOutcome::RenewalDue { validity })
        } else {
            Ok(CheckOutcome::Valid { validity })
        }
    }

    fn backup(&self) -> Result<BackupOutcome> {
        let file = &self.installation.file;
        tracing::debug!(location = %file.display(), "backing up certificate");

        if !fs::file_exists(file)? {
            tracing::info!("new certificate location specified, no back up taken");
            return Ok(BackupOutcome::Skipped);
        }

        let backup_path = fs::backup_path(file);
        let bytes = fs::copy_file(file, &backup_path)?;

        tracing::info!(
            location = %file.display(),
            backup_location = %backup_path.display(),
            "certificate backed up"
        );

        Ok(BackupOutcome::Created { backup_path, bytes })
    }

    fn install(&self, pcc: &PemCollection) -> Result<usize> {
        let file = &self.installation.file;
        tracing::debug!(location = %file.display(), "installing certificate");

        if self.installation.p12_password.is_empty() {
            return Err(BundleError::MissingPassword.into());
        }

        let content =
            bundle::package_as_pkcs12(pcc, &self.installation.p12_password).map_err(|e| {
                tracing::error!(error = %e, "could not package certificate as PKCS12");
                e
            })?;

        fs::write_file_atomic(file, &content)?;

        tracing::info!(location = %file.display(), bytes = content.len(), "certificate installed");
        Ok(content.len())
    }

    fn after_install_actions(&self) -> Result<Option<InstructionOutput>> {
        self.run_hook("after-install", self.installation.after_action.as_deref())
    }

    fn install_validation_actions(&self) -> Result<Option<InstructionOutput>> {
        self.run_hook(
            "install-validation",
            self.installation.install_validation.as_deref(),
        )
    }
}
