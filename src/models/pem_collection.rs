//! PEM certificate material handed to the packager

use crate::cert_ops::reader::CERTIFICATE_TAG;
use crate::utils::{BundleError, InstallerError, Result};
use std::fmt;
use std::path::Path;

/// Leaf certificate, private key and ordered chain, all as PEM text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PemCollection {
    /// End-entity certificate, a single `CERTIFICATE` block
    pub certificate: String,
    /// Private key, possibly encrypted
    pub private_key: String,
    /// Issuer certificates, leaf-most first
    pub chain: Vec<String>,
    /// Password for an encrypted private key. When unset the bundle
    /// password is tried.
    pub key_password: Option<String>,
}

impl PemCollection {
    pub fn new(certificate: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            certificate: certificate.into(),
            private_key: private_key.into(),
            chain: Vec::new(),
            key_password: None,
        }
    }

    pub fn with_chain<I, S>(mut self, chain: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.chain = chain.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_key_password(mut self, password: impl Into<String>) -> Self {
        self.key_password = Some(password.into());
        self
    }

    /// Load PEM material from files.
    ///
    /// The certificate file may contain the leaf followed by its issuers; the
    /// first `CERTIFICATE` block is the leaf and any further blocks, then the
    /// blocks of `chain_path`, form the chain in file order. When `key_path`
    /// is `None` the private key is taken from the certificate file.
    ///
    /// A block without its END line fails the load, so a truncated file
    /// never yields a shorter chain.
    pub fn from_pem_files(
        cert_path: &Path,
        key_path: Option<&Path>,
        chain_path: Option<&Path>,
    ) -> Result<Self> {
        let cert_text = read_text(cert_path)?;
        let mut blocks = parse_blocks(&cert_text).map_err(|e| BundleError::PemDecode {
            message: format!("{}: {}", cert_path.display(), e),
        })?;

        let leaf_index = blocks
            .iter()
            .position(|p| p.tag() == CERTIFICATE_TAG)
            .unwrap_or(0);
        let certificate = if blocks.is_empty() {
            // Leave the bad input for the packager to report precisely
            cert_text.clone()
        } else {
            ::pem::encode(&blocks.remove(leaf_index))
        };

        let mut chain: Vec<String> = blocks
            .iter()
            .filter(|p| p.tag() == CERTIFICATE_TAG)
            .map(::pem::encode)
            .collect();

        let private_key = match key_path {
            Some(path) => read_text(path)?,
            None => blocks
                .iter()
                .find(|p| p.tag().ends_with("PRIVATE KEY"))
                .map(::pem::encode)
                .unwrap_or_default(),
        };

        if let Some(path) = chain_path {
            let chain_text = read_text(path)?;
            let chain_blocks = parse_blocks(&chain_text).map_err(|e| BundleError::ChainEntry {
                index: chain.len() + e.complete,
                source: Box::new(BundleError::PemDecode {
                    message: format!("{}: {}", path.display(), e),
                }),
            })?;
            if chain_blocks.is_empty() && !chain_text.trim().is_empty() {
                chain.push(chain_text);
            } else {
                chain.extend(chain_blocks.iter().map(::pem::encode));
            }
        }

        Ok(Self {
            certificate,
            private_key,
            chain,
            key_password: None,
        })
    }
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| InstallerError::io(path, e))
}

/// Why the blocks of a PEM file could not all be read
#[derive(Debug)]
struct BlockError {
    /// Blocks parsed before the failure
    complete: usize,
    message: String,
}

impl fmt::Display for BlockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Parse every PEM block of `text`, headers included.
///
/// `pem::parse_many` skips a BEGIN line that has no matching END line, so the
/// markers are counted against the parsed blocks.
fn parse_blocks(text: &str) -> std::result::Result<Vec<::pem::Pem>, BlockError> {
    let blocks = ::pem::parse_many(text.as_bytes()).map_err(|e| BlockError {
        complete: 0,
        message: e.to_string(),
    })?;

    let markers = text.matches("-----BEGIN ").count();
    if markers != blocks.len() {
        return Err(BlockError {
            complete: blocks.len(),
            message: format!(
                "found {} BEGIN markers but only {} complete PEM blocks (truncated file?)",
                markers,
                blocks.len()
            ),
        });
    }

    Ok(blocks)
}
