//! Installation cycle orchestration
//!
//! Drives one installer through check, backup, install and the post-install
//! hooks. Progress is reported through an `on_event` callback so any
//! frontend can follow along; the returned [`CycleReport`] carries the same
//! information once the cycle is over.

use crate::installer::Installer;
use crate::models::{
    BackupOutcome, CheckOutcome, CycleAction, CycleReport, InstructionOutput, PemCollection,
    DEFAULT_RENEW_BEFORE,
};
use crate::utils::{HookError, Result};
use chrono::{DateTime, Utc};

/// Options for an installation cycle
#[derive(Debug, Clone)]
pub struct CycleOptions {
    /// Renewal threshold, e.g. `30d`
    pub renew_before: String,
    /// Install even when the current bundle is still valid
    pub force: bool,
    /// Clock used for the renewal decision; the current time when unset
    pub now: Option<DateTime<Utc>>,
}

impl Default for CycleOptions {
    fn default() -> Self {
        Self {
            renew_before: DEFAULT_RENEW_BEFORE.to_string(),
            force: false,
            now: None,
        }
    }
}

/// Which post-install hook an event refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hook {
    AfterInstall,
    InstallValidation,
}

/// Events emitted during a cycle
#[derive(Debug, Clone)]
pub enum CycleEvent {
    CheckStarted,
    CheckComplete(CheckOutcome),
    CheckBypassed,
    UpToDate,
    BackupComplete(BackupOutcome),
    InstallStarted,
    InstallComplete { bytes: usize },
    HookComplete { hook: Hook, output: InstructionOutput },
    HookSkipped { hook: Hook },
}

/// Run one installation cycle.
///
/// Every error aborts the remaining steps. A hook failing after the bundle
/// was written is returned as an error; the new bundle and the backup stay
/// on disk.
pub fn run_cycle<I: Installer + ?Sized>(
    installer: &I,
    pcc: &PemCollection,
    options: &CycleOptions,
    on_event: &dyn Fn(CycleEvent),
) -> Result<CycleReport> {
    run_cycle_with(installer, || Ok(pcc.clone()), options, on_event)
}

/// Run one installation cycle, loading the PEM material only once an
/// install is going ahead.
///
/// `load` is not called when the installed bundle is still valid, so a
/// missing source does not fail an up-to-date target. A load error aborts
/// the cycle before the backup is taken.
pub fn run_cycle_with<I, F>(
    installer: &I,
    load: F,
    options: &CycleOptions,
    on_event: &dyn Fn(CycleEvent),
) -> Result<CycleReport>
where
    I: Installer + ?Sized,
    F: FnOnce() -> Result<PemCollection>,
{
    let mut report = CycleReport::new(installer.target().to_path_buf());

    if options.force {
        on_event(CycleEvent::CheckBypassed);
    } else {
        on_event(CycleEvent::CheckStarted);
        let now = options.now.unwrap_or_else(Utc::now);
        let outcome = installer.assess_at(&options.renew_before, now)?;
        on_event(CycleEvent::CheckComplete(outcome.clone()));

        let needs_install = outcome.needs_install();
        report.check = Some(outcome);
        if !needs_install {
            on_event(CycleEvent::UpToDate);
            return Ok(report);
        }
    }

    let pcc = load()?;

    let backup = installer.backup()?;
    on_event(CycleEvent::BackupComplete(backup.clone()));
    report.backup = Some(backup);

    on_event(CycleEvent::InstallStarted);
    let bytes = installer.install(&pcc)?;
    on_event(CycleEvent::InstallComplete { bytes });
    report.bundle_bytes = Some(bytes);
    report.action = CycleAction::Installed;

    match installer.after_install_actions()? {
        Some(output) => {
            on_event(CycleEvent::HookComplete {
                hook: Hook::AfterInstall,
                output: output.clone(),
            });
            report.after_install = Some(output);
        }
        None => on_event(CycleEvent::HookSkipped {
            hook: Hook::AfterInstall,
        }),
    }

    match installer.install_validation_actions()? {
        Some(output) => {
            on_event(CycleEvent::HookComplete {
                hook: Hook::InstallValidation,
                output: output.clone(),
            });
            match output.validation_passed() {
                Some(false) => {
                    return Err(HookError::ValidationFailed {
                        output: output.stdout,
                    }
                    .into())
                }
                Some(true) => {}
                None => tracing::warn!(
                    output = %output.stdout,
                    "install validation output is neither 0 nor 1"
                ),
            }
            report.validation = Some(output);
        }
        None => on_event(CycleEvent::HookSkipped {
            hook: Hook::InstallValidation,
        }),
    }

    Ok(report)
}
