//! Certificate PEM decoding and X.509 parsing
//!
//! Decoding a PEM block and parsing the DER inside it fail with different
//! errors, so a truncated paste and a corrupt certificate are told apart.

use crate::models::CertificateValidity;
use crate::utils::BundleError;
use chrono::{DateTime, TimeZone, Utc};
use sha2::Digest;
use x509_parser::prelude::*;

/// PEM tag of an X.509 certificate block
pub const CERTIFICATE_TAG: &str = "CERTIFICATE";

/// Detected certificate file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectedFormat {
    Pem,
    Der,
    Pkcs12,
}

impl std::fmt::Display for DetectedFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DetectedFormat::Pem => write!(f, "PEM"),
            DetectedFormat::Der => write!(f, "DER"),
            DetectedFormat::Pkcs12 => write!(f, "PKCS#12"),
        }
    }
}

/// Guess the format of certificate file contents
pub fn detect_format_from_bytes(data: &[u8]) -> Option<DetectedFormat> {
    if let Ok(text) = std::str::from_utf8(data) {
        if text.contains("-----BEGIN ") {
            return Some(DetectedFormat::Pem);
        }
    }

    if data.len() > 4 && data[0] == 0x30 && is_likely_pkcs12(data) {
        return Some(DetectedFormat::Pkcs12);
    }

    if X509Certificate::from_der(data).is_ok() {
        return Some(DetectedFormat::Der);
    }

    None
}

/// Look for the pkcs7-data OID near the start of an ASN.1 SEQUENCE
fn is_likely_pkcs12(data: &[u8]) -> bool {
    let pkcs7_data_oid: [u8; 11] = [
        0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x07, 0x01,
    ];
    let search_len = data.len().min(50);
    data[..search_len]
        .windows(pkcs7_data_oid.len())
        .any(|w| w == pkcs7_data_oid)
}

/// Decode the first PEM block of `text`, which must be a certificate, and
/// check that its contents parse as X.509. Returns the DER bytes.
pub fn decode_certificate_pem(text: &str) -> Result<Vec<u8>, BundleError> {
    let block = ::pem::parse(text.as_bytes()).map_err(|e| BundleError::PemDecode {
        message: e.to_string(),
    })?;

    if block.tag() != CERTIFICATE_TAG {
        return Err(BundleError::PemDecode {
            message: format!("expected a {} block, found {}", CERTIFICATE_TAG, block.tag()),
        });
    }

    let der = block.into_contents();
    parse_certificate(&der)?;
    Ok(der)
}

/// Decode and parse every chain entry in order.
///
/// The first bad entry fails the whole chain.
pub fn decode_chain(chain: &[String]) -> Result<Vec<Vec<u8>>, BundleError> {
    chain
        .iter()
        .enumerate()
        .map(|(index, text)| {
            decode_certificate_pem(text).map_err(|e| BundleError::ChainEntry {
                index,
                source: Box::new(e),
            })
        })
        .collect()
}

/// Parse DER into an X.509 certificate, rejecting trailing data
pub fn parse_certificate(der: &[u8]) -> Result<X509Certificate<'_>, BundleError> {
    let (rest, cert) =
        X509Certificate::from_der(der).map_err(|e| BundleError::CertificateParse {
            message: e.to_string(),
        })?;

    if !rest.is_empty() {
        return Err(BundleError::CertificateParse {
            message: format!("{} trailing bytes after certificate", rest.len()),
        });
    }

    Ok(cert)
}

/// Extract subject, issuer, serial, thumbprint and validity from DER
pub fn certificate_validity(der: &[u8]) -> Result<CertificateValidity, BundleError> {
    let cert = parse_certificate(der)?;

    let serial = cert
        .serial
        .to_bytes_be()
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(":");

    let mut hasher = sha2::Sha256::new();
    hasher.update(der);
    let thumbprint = hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(":");

    Ok(CertificateValidity {
        subject: cert.subject().to_string(),
        issuer: cert.issuer().to_string(),
        serial,
        thumbprint,
        not_before: asn1_time_to_datetime(cert.validity().not_before)?,
        not_after: asn1_time_to_datetime(cert.validity().not_after)?,
    })
}

/// Raw SubjectPublicKeyInfo of a DER certificate
pub fn subject_public_key_info(der: &[u8]) -> Result<Vec<u8>, BundleError> {
    let cert = parse_certificate(der)?;
    Ok(cert.public_key().raw.to_vec())
}

/// Convert ASN.1 time to chrono DateTime
fn asn1_time_to_datetime(time: ASN1Time) -> Result<DateTime<Utc>, BundleError> {
    Utc.timestamp_opt(time.timestamp(), 0)
        .single()
        .ok_or_else(|| BundleError::CertificateParse {
            message: "Invalid timestamp in certificate".to_string(),
        })
}
