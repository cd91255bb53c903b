//! PKCS#12 bundle packaging and decoding
//!
//! The PKCS#12 encoding itself is delegated to `p12-keystore`; this module
//! validates the PEM material going in and picks the leaf certificate back
//! out of a decoded bundle.

use crate::cert_ops::{key, reader};
use crate::models::{CertificateValidity, PemCollection};
use crate::utils::{BundleError, Material};
use sha2::Digest;
use std::fmt;
use x509_parser::prelude::*;

/// Alias under which the key and its certificates are stored
pub const BUNDLE_ALIAS: &str = "certificate";

/// Contents of a decoded bundle
#[derive(Clone, PartialEq, Eq)]
pub struct DecodedBundle {
    /// Unencrypted PKCS#8 DER
    pub private_key: Vec<u8>,
    /// Leaf certificate DER
    pub certificate: Vec<u8>,
    /// Issuer certificates DER, leaf-most first
    pub chain: Vec<Vec<u8>>,
}

impl DecodedBundle {
    /// Validity details of the leaf certificate
    pub fn leaf_validity(&self) -> Result<CertificateValidity, BundleError> {
        reader::certificate_validity(&self.certificate)
    }

    pub fn chain_validity(&self) -> Result<Vec<CertificateValidity>, BundleError> {
        self.chain
            .iter()
            .map(|der| reader::certificate_validity(der))
            .collect()
    }
}

impl fmt::Debug for DecodedBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedBundle")
            .field("certificate_len", &self.certificate.len())
            .field("chain_len", &self.chain.len())
            .finish_non_exhaustive()
    }
}

/// Package a PEM collection into PKCS#12 bytes protected by `password`.
///
/// Nothing is returned unless every certificate and the key are valid.
pub fn package_as_pkcs12(pcc: &PemCollection, password: &str) -> Result<Vec<u8>, BundleError> {
    if password.is_empty() {
        return Err(BundleError::MissingPassword);
    }
    if pcc.certificate.trim().is_empty() {
        return Err(BundleError::MissingMaterial {
            missing: Material::Certificate,
        });
    }
    if pcc.private_key.trim().is_empty() {
        return Err(BundleError::MissingMaterial {
            missing: Material::PrivateKey,
        });
    }

    let leaf = reader::decode_certificate_pem(&pcc.certificate)?;
    let chain = reader::decode_chain(&pcc.chain)?;

    let key_password = pcc.key_password.as_deref().unwrap_or(password);
    let private_key = key::parse_private_key(&pcc.private_key, Some(key_password))?;

    if !key::keys_match(&leaf, &private_key)? {
        return Err(BundleError::KeyMismatch);
    }

    tracing::debug!(
        key_type = %private_key.key_type,
        chain_len = chain.len(),
        "encoding PKCS#12 bundle"
    );

    encode_bundle(&private_key.pkcs8_der, &leaf, &chain, password)
}

/// Encode an already validated key, leaf and chain as PKCS#12.
///
/// Salts and IVs are drawn from the operating system's CSPRNG by the codec.
pub fn encode_bundle(
    private_key: &[u8],
    certificate: &[u8],
    chain: &[Vec<u8>],
    password: &str,
) -> Result<Vec<u8>, BundleError> {
    if password.is_empty() {
        return Err(BundleError::MissingPassword);
    }

    let certs = std::iter::once(certificate)
        .chain(chain.iter().map(Vec::as_slice))
        .map(|der| {
            p12_keystore::Certificate::from_der(der).map_err(|e| BundleError::Encode {
                message: format!("Failed to load certificate for PKCS#12: {}", e),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let local_key_id = {
        let mut hasher = sha2::Sha256::new();
        hasher.update(certificate);
        hasher.finalize().to_vec()
    };

    let entry = p12_keystore::PrivateKeyChain::new(private_key.to_vec(), &local_key_id, certs);

    let mut keystore = p12_keystore::KeyStore::new();
    keystore.add_entry(
        BUNDLE_ALIAS,
        p12_keystore::KeyStoreEntry::PrivateKeyChain(entry),
    );

    keystore
        .writer(password)
        .write()
        .map_err(|e| BundleError::Encode {
            message: e.to_string(),
        })
}

/// Decode PKCS#12 bytes with `password`.
///
/// The leaf is the certificate carrying the key's public half; the remaining
/// certificates are ordered by following issuers from the leaf.
pub fn decode_bundle(data: &[u8], password: &str) -> Result<DecodedBundle, BundleError> {
    let keystore =
        p12_keystore::KeyStore::from_pkcs12(data, password).map_err(|e| BundleError::Decode {
            message: match reader::detect_format_from_bytes(data) {
                Some(format) if format != reader::DetectedFormat::Pkcs12 => {
                    format!("{} (file looks like {})", e, format)
                }
                _ => e.to_string(),
            },
        })?;

    let mut private_key: Option<Vec<u8>> = None;
    let mut certs: Vec<Vec<u8>> = Vec::new();

    for (_alias, entry) in keystore.entries() {
        match entry {
            p12_keystore::KeyStoreEntry::PrivateKeyChain(chain) => {
                if private_key.is_none() {
                    private_key = Some(chain.key().to_vec());
                }
                certs.extend(chain.chain().iter().map(|c| c.as_der().to_vec()));
            }
            p12_keystore::KeyStoreEntry::Certificate(cert) => {
                certs.push(cert.as_der().to_vec());
            }
        }
    }

    let private_key = private_key.ok_or_else(|| BundleError::Decode {
        message: "bundle contains no private key".to_string(),
    })?;

    let mut unique: Vec<Vec<u8>> = Vec::with_capacity(certs.len());
    for der in certs {
        if !unique.contains(&der) {
            unique.push(der);
        }
    }

    if unique.is_empty() {
        return Err(BundleError::Decode {
            message: "bundle contains no certificate".to_string(),
        });
    }

    let leaf_index = find_leaf(&private_key, &unique);
    let certificate = unique.remove(leaf_index);
    let chain = order_chain(&certificate, unique);

    Ok(DecodedBundle {
        private_key,
        certificate,
        chain,
    })
}

/// Index of the certificate matching the key, or the first one when the
/// key cannot be inspected
fn find_leaf(private_key: &[u8], certs: &[Vec<u8>]) -> usize {
    let block = ::pem::encode(&::pem::Pem::new("PRIVATE KEY", private_key.to_vec()));
    let Ok(material) = key::parse_private_key(&block, None) else {
        return 0;
    };

    certs
        .iter()
        .position(|der| key::keys_match(der, &material).unwrap_or(false))
        .unwrap_or(0)
}

/// Walk issuer links from `leaf`; certificates off the path keep their order
/// at the end
fn order_chain(leaf: &[u8], mut rest: Vec<Vec<u8>>) -> Vec<Vec<u8>> {
    let mut ordered = Vec::with_capacity(rest.len());
    let mut current = leaf.to_vec();

    loop {
        let Some(issuer) = issuer_name(&current) else {
            break;
        };
        let next = rest.iter().position(|der| {
            subject_name(der).is_some_and(|subject| subject == issuer)
                && der.as_slice() != current.as_slice()
        });
        match next {
            Some(index) => {
                current = rest.remove(index);
                ordered.push(current.clone());
            }
            None => break,
        }
    }

    ordered.extend(rest);
    ordered
}

fn subject_name(der: &[u8]) -> Option<Vec<u8>> {
    X509Certificate::from_der(der)
        .ok()
        .map(|(_, cert)| cert.subject().as_raw().to_vec())
}

fn issuer_name(der: &[u8]) -> Option<Vec<u8>> {
    X509Certificate::from_der(der)
        .ok()
        .map(|(_, cert)| cert.issuer().as_raw().to_vec())
}
