//! Backup command implementation

use p12_installer::cli::BackupArgs;
use p12_installer::installer::{Installer, Pkcs12Installer};
use p12_installer::models::Installation;
use p12_installer::output::print_backup_outcome;

/// Run the backup command
pub fn run_backup(args: &BackupArgs) -> anyhow::Result<()> {
    // Backups copy bytes verbatim, the password is never used
    let installer = Pkcs12Installer::new(Installation::new(&args.file, String::new()));
    let outcome = installer.backup()?;
    print_backup_outcome(&outcome);
    Ok(())
}
