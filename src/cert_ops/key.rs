//! Private key parsing and certificate/key pair matching
//!
//! Supports RSA, EC P-256, and EC P-384 keys in PKCS#8 (plain or PBES2
//! encrypted), PKCS#1, and SEC1 formats. Every key is normalised to plain
//! PKCS#8 DER, which is what goes into the bundle.

use crate::cert_ops::reader;
use crate::utils::BundleError;
use pkcs8::{DecodePrivateKey, EncodePrivateKey, EncodePublicKey};
use std::fmt;

/// Algorithm of a parsed private key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyType {
    Rsa,
    EcP256,
    EcP384,
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyType::Rsa => write!(f, "RSA"),
            KeyType::EcP256 => write!(f, "EC P-256"),
            KeyType::EcP384 => write!(f, "EC P-384"),
        }
    }
}

/// A private key ready to be bundled
pub struct PrivateKeyMaterial {
    /// Unencrypted PKCS#8 DER
    pub pkcs8_der: Vec<u8>,
    /// The SubjectPublicKeyInfo bytes derived from the private key
    pub public_key_spki: Vec<u8>,
    pub key_type: KeyType,
}

impl fmt::Debug for PrivateKeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKeyMaterial")
            .field("key_type", &self.key_type)
            .finish_non_exhaustive()
    }
}

/// Parse a PEM private key, decrypting it with `password` when it is an
/// `ENCRYPTED PRIVATE KEY` block.
pub fn parse_private_key(
    text: &str,
    password: Option<&str>,
) -> Result<PrivateKeyMaterial, BundleError> {
    let block = ::pem::parse(text.as_bytes()).map_err(|e| BundleError::KeyParse {
        message: format!("Failed to parse PEM: {}", e),
    })?;

    if let Some(proc_type) = block.headers().get("Proc-Type") {
        if proc_type.contains("ENCRYPTED") {
            return Err(BundleError::KeyDecrypt {
                message: "legacy PEM encryption (Proc-Type: 4,ENCRYPTED) is not supported, \
                          convert the key to encrypted PKCS#8"
                    .to_string(),
            });
        }
    }

    match block.tag() {
        "PRIVATE KEY" => from_pkcs8_der(block.contents()),
        "ENCRYPTED PRIVATE KEY" => {
            let pkcs8_der = decrypt_pkcs8(block.contents(), password)?;
            // A wrong password can still yield valid padding, so a garbled
            // result is reported as a decryption failure
            from_pkcs8_der(&pkcs8_der).map_err(|e| match e {
                BundleError::KeyParse { message } => BundleError::KeyDecrypt {
                    message: format!("decrypted key is malformed ({})", message),
                },
                other => other,
            })
        }
        "RSA PRIVATE KEY" => from_pkcs1_rsa(block.contents()),
        "EC PRIVATE KEY" => from_sec1_ec(block.contents()),
        other => Err(BundleError::KeyParse {
            message: format!("unsupported PEM block type {}", other),
        }),
    }
}

fn decrypt_pkcs8(der: &[u8], password: Option<&str>) -> Result<Vec<u8>, BundleError> {
    let password = match password {
        Some(p) if !p.is_empty() => p,
        _ => {
            return Err(BundleError::KeyDecrypt {
                message: "key is encrypted but no password was provided".to_string(),
            })
        }
    };

    let info =
        pkcs8::EncryptedPrivateKeyInfo::try_from(der).map_err(|e| BundleError::KeyParse {
            message: format!("Failed to parse encrypted PKCS#8 container: {}", e),
        })?;

    let document = info
        .decrypt(password)
        .map_err(|e| BundleError::KeyDecrypt {
            message: e.to_string(),
        })?;

    Ok(document.as_bytes().to_vec())
}

/// Parse a PKCS#8 DER-encoded private key and extract SPKI
fn from_pkcs8_der(der: &[u8]) -> Result<PrivateKeyMaterial, BundleError> {
    let info = pkcs8::PrivateKeyInfo::try_from(der).map_err(|e| BundleError::KeyParse {
        message: format!("Failed to parse PKCS#8 key: {}", e),
    })?;

    if let Ok(rsa_key) = rsa::RsaPrivateKey::from_pkcs8_der(der) {
        let public_key = rsa::RsaPublicKey::from(&rsa_key);
        return Ok(PrivateKeyMaterial {
            pkcs8_der: der.to_vec(),
            public_key_spki: spki_der(public_key.to_public_key_der(), KeyType::Rsa)?,
            key_type: KeyType::Rsa,
        });
    }

    if let Ok(ec_key) = p256::SecretKey::from_pkcs8_der(der) {
        return Ok(PrivateKeyMaterial {
            pkcs8_der: der.to_vec(),
            public_key_spki: spki_der(ec_key.public_key().to_public_key_der(), KeyType::EcP256)?,
            key_type: KeyType::EcP256,
        });
    }

    if let Ok(ec_key) = p384::SecretKey::from_pkcs8_der(der) {
        return Ok(PrivateKeyMaterial {
            pkcs8_der: der.to_vec(),
            public_key_spki: spki_der(ec_key.public_key().to_public_key_der(), KeyType::EcP384)?,
            key_type: KeyType::EcP384,
        });
    }

    // Well-formed PKCS#8, but nothing we can put in a bundle
    Err(BundleError::Encode {
        message: format!("unsupported private key algorithm {}", info.algorithm.oid),
    })
}

/// Parse a PKCS#1 RSA private key
fn from_pkcs1_rsa(der: &[u8]) -> Result<PrivateKeyMaterial, BundleError> {
    use rsa::pkcs1::DecodeRsaPrivateKey;

    let rsa_key =
        rsa::RsaPrivateKey::from_pkcs1_der(der).map_err(|e| BundleError::KeyParse {
            message: format!("Failed to parse PKCS#1 RSA key: {}", e),
        })?;

    let pkcs8_der = rsa_key
        .to_pkcs8_der()
        .map_err(|e| BundleError::KeyParse {
            message: format!("Failed to convert RSA key to PKCS#8: {}", e),
        })?;

    let public_key = rsa::RsaPublicKey::from(&rsa_key);
    Ok(PrivateKeyMaterial {
        pkcs8_der: pkcs8_der.as_bytes().to_vec(),
        public_key_spki: spki_der(public_key.to_public_key_der(), KeyType::Rsa)?,
        key_type: KeyType::Rsa,
    })
}

/// Parse a SEC1 EC private key
fn from_sec1_ec(der: &[u8]) -> Result<PrivateKeyMaterial, BundleError> {
    if let Ok(ec_key) = p256::SecretKey::from_sec1_der(der) {
        let pkcs8_der = ec_key.to_pkcs8_der().map_err(|e| BundleError::KeyParse {
            message: format!("Failed to convert EC P-256 key to PKCS#8: {}", e),
        })?;
        return Ok(PrivateKeyMaterial {
            pkcs8_der: pkcs8_der.as_bytes().to_vec(),
            public_key_spki: spki_der(ec_key.public_key().to_public_key_der(), KeyType::EcP256)?,
            key_type: KeyType::EcP256,
        });
    }

    if let Ok(ec_key) = p384::SecretKey::from_sec1_der(der) {
        let pkcs8_der = ec_key.to_pkcs8_der().map_err(|e| BundleError::KeyParse {
            message: format!("Failed to convert EC P-384 key to PKCS#8: {}", e),
        })?;
        return Ok(PrivateKeyMaterial {
            pkcs8_der: pkcs8_der.as_bytes().to_vec(),
            public_key_spki: spki_der(ec_key.public_key().to_public_key_der(), KeyType::EcP384)?,
            key_type: KeyType::EcP384,
        });
    }

    Err(BundleError::KeyParse {
        message: "Unsupported EC key (only P-256 and P-384 are supported)".to_string(),
    })
}

fn spki_der(
    encoded: pkcs8::spki::Result<pkcs8::Document>,
    key_type: KeyType,
) -> Result<Vec<u8>, BundleError> {
    encoded
        .map(|doc| doc.as_bytes().to_vec())
        .map_err(|e| BundleError::KeyParse {
            message: format!("Failed to encode {} public key: {}", key_type, e),
        })
}

/// Check if a private key matches a certificate by comparing SubjectPublicKeyInfo
pub fn keys_match(cert_der: &[u8], key: &PrivateKeyMaterial) -> Result<bool, BundleError> {
    let cert_spki = reader::subject_public_key_info(cert_der)?;
    Ok(cert_spki == key.public_key_spki)
}
