//! Check command implementation

use crate::commands::password::resolve_password;
use chrono::Utc;
use p12_installer::cli::CheckArgs;
use p12_installer::installer::{Installer, Pkcs12Installer};
use p12_installer::models::Installation;
use p12_installer::output::{print_check_outcome, print_json, CheckJson};
use p12_installer::utils::fs;

/// Exit code reported when the bundle has to be (re)installed
pub const EXIT_INSTALL_NEEDED: i32 = 10;

/// Run the check command, returning the process exit code
pub fn run_check(args: &CheckArgs) -> anyhow::Result<i32> {
    let file = &args.target.file;

    // Nothing to decrypt when nothing is installed
    let password = if fs::file_exists(file)? {
        resolve_password(file, args.target.password.as_deref(), false)?
    } else {
        args.target.password.clone().unwrap_or_default()
    };

    let installer = Pkcs12Installer::new(Installation::new(file, password));
    let outcome = installer.assess_at(&args.renew_before, Utc::now())?;

    if args.json {
        print_json(&CheckJson {
            file,
            renew_before: &args.renew_before,
            needs_install: outcome.needs_install(),
            outcome: &outcome,
        })?;
    } else {
        print_check_outcome(&outcome);
    }

    Ok(if outcome.needs_install() {
        EXIT_INSTALL_NEEDED
    } else {
        0
    })
}
