//! JSON output formatter

use crate::models::{CertificateValidity, CheckOutcome};
use serde::Serialize;
use std::path::Path;

/// JSON-serializable result of a renewal check
#[derive(Serialize)]
pub struct CheckJson<'a> {
    pub file: &'a Path,
    pub renew_before: &'a str,
    pub needs_install: bool,
    pub outcome: &'a CheckOutcome,
}

/// JSON-serializable contents of a bundle
#[derive(Serialize)]
pub struct InspectJson<'a> {
    pub file: &'a Path,
    pub certificate: &'a CertificateValidity,
    pub chain: &'a [CertificateValidity],
}

/// Print any serializable value as pretty JSON to stdout
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_json_shape() {
        let outcome = CheckOutcome::Missing;
        let json = serde_json::to_value(CheckJson {
            file: Path::new("/etc/ssl/app.p12"),
            renew_before: "30d",
            needs_install: outcome.needs_install(),
            outcome: &outcome,
        })
        .unwrap();

        assert_eq!(json["needs_install"], true);
        assert_eq!(json["outcome"]["status"], "missing");
        assert_eq!(json["file"], "/etc/ssl/app.p12");
    }
}
