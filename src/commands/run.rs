//! Run command implementation

use anyhow::Context;
use p12_installer::cli::RunArgs;
use p12_installer::config;
use p12_installer::installer::Pkcs12Installer;
use p12_installer::output::{print_cycle_event, print_cycle_summary, print_header, print_warning};
use p12_installer::runner::{run_cycle_with, CycleOptions};

/// Run an installation cycle for every configured installation.
///
/// Stops at the first failing installation.
pub fn run_config(args: &RunArgs) -> anyhow::Result<()> {
    let settings = config::load_config(args.config.as_deref())?;

    if settings.installations.is_empty() {
        print_warning("No installations configured");
        return Ok(());
    }

    for entry in &settings.installations {
        let installation = &entry.installation;
        print_header(&installation.file.display().to_string());

        let source = entry.source.as_ref().with_context(|| {
            format!(
                "installation {} has no [source] to install from",
                installation.file.display()
            )
        })?;

        let options = CycleOptions {
            renew_before: installation.renew_before.clone(),
            force: args.force,
            now: None,
        };

        let installer = Pkcs12Installer::new(installation.clone());
        let report = run_cycle_with(&installer, || source.load(), &options, &print_cycle_event)
            .with_context(|| format!("installation {} failed", installation.file.display()))?;
        print_cycle_summary(&report);
    }

    Ok(())
}
