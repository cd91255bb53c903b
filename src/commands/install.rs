//! Install command implementation

use crate::commands::password::resolve_password;
use p12_installer::cli::InstallArgs;
use p12_installer::installer::Pkcs12Installer;
use p12_installer::models::{Installation, PemCollection};
use p12_installer::output::{print_cycle_event, print_cycle_summary};
use p12_installer::runner::{run_cycle, CycleOptions};

/// Run the install command: a full installation cycle for one target
pub fn run_install(args: &InstallArgs) -> anyhow::Result<()> {
    let file = &args.target.file;
    let confirm = !file.exists();
    let password = resolve_password(file, args.target.password.as_deref(), confirm)?;

    let mut pcc =
        PemCollection::from_pem_files(&args.cert, args.key.as_deref(), args.chain.as_deref())?;
    pcc.key_password = args.key_password.clone();

    let mut installation =
        Installation::new(file, password).with_renew_before(&args.renew_before);
    installation.after_action = args.after_action.clone();
    installation.install_validation = args.install_validation.clone();

    let options = CycleOptions {
        renew_before: args.renew_before.clone(),
        force: args.force,
        now: None,
    };

    let installer = Pkcs12Installer::new(installation);
    let report = run_cycle(&installer, &pcc, &options, &print_cycle_event)?;
    print_cycle_summary(&report);
    Ok(())
}
