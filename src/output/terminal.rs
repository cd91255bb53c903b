//! Terminal output formatting
//!
//! Colored status lines and certificate summaries for the CLI.

use crate::models::{BackupOutcome, CertificateValidity, CheckOutcome, CycleReport};
use crate::runner::{CycleEvent, Hook};
use chrono::Utc;
use console::style;

/// Print a section header
pub fn print_header(title: &str) {
    println!();
    println!(
        "{}",
        style(format!("━━━ {} ━━━", title)).cyan().bold()
    );
    println!();
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", style("!").yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", style("ℹ").blue(), message);
}

/// Print subject, issuer, serial, validity and thumbprint of a certificate
pub fn print_certificate(label: &str, validity: &CertificateValidity) {
    println!("  {}", style(label).bold());
    println!("    Subject:     {}", validity.subject);
    println!("    Issuer:      {}", validity.issuer);
    println!("    Serial:      {}", validity.serial);
    println!(
        "    Valid From:  {}",
        validity.not_before.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!(
        "    Valid Until: {}",
        validity.not_after.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!(
        "    Expires In:  {}",
        format_expiry_days(validity.days_until_expiry_at(Utc::now()))
    );
    println!("    SHA-256:     {}", style(&validity.thumbprint).dim());
    if validity.is_self_signed() {
        println!("    {}", style("Self-signed").yellow());
    }
}

/// Print the result of a renewal check
pub fn print_check_outcome(outcome: &CheckOutcome) {
    match outcome {
        CheckOutcome::Missing => print_warning("No certificate installed, install needed"),
        CheckOutcome::RenewalDue { validity } => {
            print_warning(&format!(
                "Certificate is due for renewal ({})",
                format_expiry_days(validity.days_until_expiry_at(Utc::now()))
            ));
        }
        CheckOutcome::Valid { validity } => {
            print_success(&format!(
                "Certificate is valid, no renewal needed ({})",
                format_expiry_days(validity.days_until_expiry_at(Utc::now()))
            ));
        }
    }
}

pub fn print_backup_outcome(outcome: &BackupOutcome) {
    match outcome {
        BackupOutcome::Skipped => print_info("No existing certificate, no backup taken"),
        BackupOutcome::Created { backup_path, .. } => {
            print_success(&format!("Backed up to {}", backup_path.display()))
        }
    }
}

/// Print progress of an installation cycle as it happens
pub fn print_cycle_event(event: CycleEvent) {
    match event {
        CycleEvent::CheckStarted => {}
        CycleEvent::CheckComplete(outcome) => print_check_outcome(&outcome),
        CycleEvent::CheckBypassed => print_info("Renewal check bypassed (--force)"),
        CycleEvent::UpToDate => print_info("Nothing to do"),
        CycleEvent::BackupComplete(outcome) => print_backup_outcome(&outcome),
        CycleEvent::InstallStarted => {}
        CycleEvent::InstallComplete { bytes } => {
            print_success(&format!("Bundle written ({} bytes)", bytes))
        }
        CycleEvent::HookComplete { hook, output } => {
            let name = hook_name(hook);
            if output.stdout.is_empty() {
                print_success(&format!("{} completed", name));
            } else {
                print_success(&format!("{} completed: {}", name, output.stdout));
            }
        }
        CycleEvent::HookSkipped { .. } => {}
    }
}

/// Print a one-line summary of a finished cycle
pub fn print_cycle_summary(report: &CycleReport) {
    if report.installed() {
        print_success(&format!(
            "Installed certificate at {}",
            style(report.target.display()).bold()
        ));
    } else {
        print_success(&format!(
            "Certificate at {} is up to date",
            style(report.target.display()).bold()
        ));
    }
}

fn hook_name(hook: Hook) -> &'static str {
    match hook {
        Hook::AfterInstall => "After-install action",
        Hook::InstallValidation => "Install validation",
    }
}

fn format_expiry_days(days: i64) -> String {
    if days < 0 {
        style(format!("Expired {} days ago", days.abs()))
            .red()
            .to_string()
    } else if days == 0 {
        style("Expires today!").red().bold().to_string()
    } else if days <= 7 {
        style(format!("{} days (critical)", days))
            .red()
            .bold()
            .to_string()
    } else if days <= 30 {
        style(format!("{} days (warning)", days))
            .yellow()
            .to_string()
    } else {
        style(format!("{} days", days)).green().to_string()
    }
}
