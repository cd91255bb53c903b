//! Installer settings
//!
//! Lists the installations to manage and where their PEM material comes from.

use crate::cert_ops::RenewalThreshold;
use crate::models::{Installation, PemCollection};
use crate::utils::{ConfigError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Where the PEM material for an installation is read from
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PemSource {
    /// Leaf certificate, optionally followed by its chain
    pub certificate: PathBuf,
    /// Private key; taken from `certificate` when unset
    #[serde(default)]
    pub private_key: Option<PathBuf>,
    /// Additional chain certificates
    #[serde(default)]
    pub chain: Option<PathBuf>,
    /// Password for an encrypted private key
    #[serde(default)]
    pub key_password: Option<String>,
}

impl PemSource {
    /// Read the PEM material from disk
    pub fn load(&self) -> Result<PemCollection> {
        let mut pcc = PemCollection::from_pem_files(
            &self.certificate,
            self.private_key.as_deref(),
            self.chain.as_deref(),
        )?;
        pcc.key_password = self.key_password.clone();
        Ok(pcc)
    }

    fn resolve_against(&mut self, base: &Path) {
        self.certificate = resolve(base, &self.certificate);
        self.private_key = self.private_key.as_ref().map(|p| resolve(base, p));
        self.chain = self.chain.as_ref().map(|p| resolve(base, p));
    }
}

/// One configured installation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InstallationConfig {
    #[serde(flatten)]
    pub installation: Installation,
    #[serde(default)]
    pub source: Option<PemSource>,
}

/// Application settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub installations: Vec<InstallationConfig>,
}

impl Settings {
    /// Load settings from a specific file.
    ///
    /// Relative paths inside the file are taken relative to the file's own
    /// directory.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> std::result::Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let mut settings = Self::from_toml(&content)?;
        if let Some(base) = path.parent() {
            settings.resolve_paths(base);
        }
        Ok(settings)
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })
    }

    /// Reject settings that could never complete a cycle
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        for (index, entry) in self.installations.iter().enumerate() {
            let inst = &entry.installation;
            let key = |field: &str| format!("installations[{}].{}", index, field);

            if inst.file.as_os_str().is_empty() {
                return Err(ConfigError::MissingRequired { key: key("file") });
            }
            if inst.p12_password.is_empty() {
                return Err(ConfigError::MissingRequired {
                    key: key("p12_password"),
                });
            }
            inst.renew_before
                .parse::<RenewalThreshold>()
                .map_err(|e| match e {
                    ConfigError::InvalidValue { message, .. } => ConfigError::InvalidValue {
                        key: key("renew_before"),
                        message,
                    },
                    other => other,
                })?;
        }
        Ok(())
    }

    fn resolve_paths(&mut self, base: &Path) {
        for entry in &mut self.installations {
            entry.installation.file = resolve(base, &entry.installation.file);
            if let Some(source) = entry.source.as_mut() {
                source.resolve_against(base);
            }
        }
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() || path.as_os_str().is_empty() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[[installations]]
file = "app.p12"
p12_password = "changeit"
after_action = "systemctl reload app"

[installations.source]
certificate = "pem/app.crt"
private_key = "pem/app.key"

[[installations]]
file = "/srv/other.p12"
p12_password = "secret"
renew_before = "10%"
install_validation = "echo 0"
"#;

    #[test]
    fn test_parse_sample() {
        let settings = Settings::from_toml(SAMPLE).unwrap();
        assert_eq!(settings.installations.len(), 2);

        let first = &settings.installations[0];
        assert_eq!(first.installation.renew_before, "30d");
        assert_eq!(
            first.installation.after_action.as_deref(),
            Some("systemctl reload app")
        );
        assert!(first.source.is_some());

        let second = &settings.installations[1];
        assert_eq!(second.installation.renew_before, "10%");
        assert!(second.source.is_none());
        settings.validate().unwrap();
    }

    #[test]
    fn test_relative_paths_follow_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("installer.toml");
        std::fs::write(&path, SAMPLE).unwrap();

        let settings = Settings::load_from_file(&path).unwrap();

        let first = &settings.installations[0];
        assert_eq!(first.installation.file, dir.path().join("app.p12"));
        let source = first.source.as_ref().unwrap();
        assert_eq!(source.certificate, dir.path().join("pem/app.crt"));
        assert_eq!(
            settings.installations[1].installation.file,
            PathBuf::from("/srv/other.p12")
        );
    }

    #[test]
    fn test_missing_file() {
        let err = Settings::load_from_file("/nonexistent/installer.toml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }

    #[test]
    fn test_malformed_toml() {
        let err = Settings::from_toml("[[installations]\nfile = ").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_validate_rejects_empty_password() {
        let settings = Settings::from_toml("[[installations]]\nfile = \"a.p12\"\n").unwrap();
        let err = settings.validate().unwrap_err();
        match err {
            ConfigError::MissingRequired { key } => {
                assert_eq!(key, "installations[0].p12_password")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_bad_threshold() {
        let settings = Settings::from_toml(
            "[[installations]]\nfile = \"a.p12\"\np12_password = \"x\"\nrenew_before = \"soon\"\n",
        )
        .unwrap();
        let err = settings.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "installations[0].renew_before")
        );
    }
}
