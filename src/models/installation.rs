//! Installation target description

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default lookahead before expiry at which a bundle is renewed
pub const DEFAULT_RENEW_BEFORE: &str = "30d";

fn default_renew_before() -> String {
    DEFAULT_RENEW_BEFORE.to_string()
}

/// Where a PKCS#12 bundle lives and how it is protected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installation {
    /// Bundle location on disk
    pub file: PathBuf,
    /// Password used both to read the existing bundle and to write the new one
    #[serde(default)]
    pub p12_password: String,
    /// Renewal threshold, e.g. `30d` or `10%`
    #[serde(default = "default_renew_before")]
    pub renew_before: String,
    /// Instruction run after a bundle is written
    #[serde(default)]
    pub after_action: Option<String>,
    /// Instruction run to validate an install; prints `0` on success
    #[serde(default)]
    pub install_validation: Option<String>,
}

impl Installation {
    pub fn new(file: impl Into<PathBuf>, p12_password: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            p12_password: p12_password.into(),
            renew_before: default_renew_before(),
            after_action: None,
            install_validation: None,
        }
    }

    pub fn with_renew_before(mut self, renew_before: impl Into<String>) -> Self {
        self.renew_before = renew_before.into();
        self
    }

    pub fn with_after_action(mut self, instruction: impl Into<String>) -> Self {
        self.after_action = Some(instruction.into());
        self
    }

    pub fn with_install_validation(mut self, instruction: impl Into<String>) -> Self {
        self.install_validation = Some(instruction.into());
        self
    }
}
