//! PKCS#12 password resolution

use anyhow::bail;
use std::path::Path;

/// Resolve the password for a PKCS#12 file.
///
/// If a password was given explicitly (or through `P12_PASSWORD`), return
/// it. Otherwise prompt on a terminal, asking twice when `confirm` is set.
pub fn resolve_password(
    path: &Path,
    password: Option<&str>,
    confirm: bool,
) -> anyhow::Result<String> {
    if let Some(pwd) = password {
        return Ok(pwd.to_string());
    }

    if !console::Term::stderr().is_term() {
        bail!(
            "PKCS#12 file {} requires a password (use --password or P12_PASSWORD)",
            path.display()
        );
    }

    let mut prompt = dialoguer::Password::new().with_prompt(format!(
        "Password for {}",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));
    if confirm {
        prompt = prompt.with_confirmation("Confirm password", "Passwords do not match");
    }

    Ok(prompt.interact()?)
}
