//! Integration tests for packaging PEM material as PKCS#12

mod common;

use p12_installer::cert_ops::key::parse_private_key;
use p12_installer::cert_ops::{decode_bundle, package_as_pkcs12, KeyType};
use p12_installer::models::PemCollection;
use p12_installer::utils::{BundleError, InstallerError, Material};

const PASSWORD: &str = "changeit";

#[test]
fn test_missing_certificate() {
    let leaf = common::self_signed("leaf.example.com", 90);
    let pcc = PemCollection::new("", leaf.key_pem);

    let err = package_as_pkcs12(&pcc, PASSWORD).unwrap_err();
    assert!(matches!(
        err,
        BundleError::MissingMaterial {
            missing: Material::Certificate
        }
    ));
}

#[test]
fn test_missing_private_key() {
    let leaf = common::self_signed("leaf.example.com", 90);
    let pcc = PemCollection::new(leaf.cert_pem, "   ");

    let err = package_as_pkcs12(&pcc, PASSWORD).unwrap_err();
    assert!(matches!(
        err,
        BundleError::MissingMaterial {
            missing: Material::PrivateKey
        }
    ));
}

#[test]
fn test_empty_password_is_rejected() {
    let leaf = common::self_signed("leaf.example.com", 90);
    let pcc = PemCollection::new(leaf.cert_pem, leaf.key_pem);

    let err = package_as_pkcs12(&pcc, "").unwrap_err();
    assert!(matches!(err, BundleError::MissingPassword));
}

#[test]
fn test_round_trip_preserves_leaf() {
    let leaf = common::self_signed("leaf.example.com", 90);
    let pcc = PemCollection::new(leaf.cert_pem.clone(), leaf.key_pem);

    let bytes = package_as_pkcs12(&pcc, PASSWORD).unwrap();
    assert!(!bytes.is_empty());

    let decoded = decode_bundle(&bytes, PASSWORD).unwrap();
    assert_eq!(decoded.certificate, common::cert_der(&leaf.cert_pem));
    assert!(decoded.chain.is_empty());

    let validity = decoded.leaf_validity().unwrap();
    assert!(validity.subject.contains("leaf.example.com"));
    let days = validity.days_until_expiry_at(chrono::Utc::now());
    assert!((89..=90).contains(&days), "unexpected expiry: {} days", days);
}

#[test]
fn test_wrong_password_cannot_decode() {
    let leaf = common::self_signed("leaf.example.com", 90);
    let pcc = PemCollection::new(leaf.cert_pem, leaf.key_pem);
    let bytes = package_as_pkcs12(&pcc, PASSWORD).unwrap();

    let err = decode_bundle(&bytes, "not-the-password").unwrap_err();
    assert!(matches!(err, BundleError::Decode { .. }));
}

#[test]
fn test_chain_is_kept_in_issuer_order() {
    let material = common::ca_chain(90);
    let pcc = PemCollection::new(material.leaf.cert_pem.clone(), material.leaf.key_pem)
        .with_chain([
            material.root.cert_pem.clone(),
            material.intermediate.cert_pem.clone(),
        ]);

    let bytes = package_as_pkcs12(&pcc, PASSWORD).unwrap();
    let decoded = decode_bundle(&bytes, PASSWORD).unwrap();

    assert_eq!(decoded.certificate, common::cert_der(&material.leaf.cert_pem));
    assert_eq!(
        decoded.chain,
        vec![
            common::cert_der(&material.intermediate.cert_pem),
            common::cert_der(&material.root.cert_pem),
        ]
    );
}

#[test]
fn test_malformed_chain_entry_reports_index() {
    let material = common::ca_chain(90);
    let pcc = PemCollection::new(material.leaf.cert_pem, material.leaf.key_pem).with_chain([
        material.intermediate.cert_pem,
        "-----BEGIN CERTIFICATE-----\nbm90IGEgY2VydA==\n-----END CERTIFICATE-----\n".to_string(),
    ]);

    let err = package_as_pkcs12(&pcc, PASSWORD).unwrap_err();
    match err {
        BundleError::ChainEntry { index, .. } => assert_eq!(index, 1),
        other => panic!("expected chain entry error, got {:?}", other),
    }
}

#[test]
fn test_certificate_without_pem_block() {
    let leaf = common::self_signed("leaf.example.com", 90);
    let pcc = PemCollection::new("this is not PEM", leaf.key_pem);

    let err = package_as_pkcs12(&pcc, PASSWORD).unwrap_err();
    assert!(matches!(err, BundleError::PemDecode { .. }));
}

#[test]
fn test_encrypted_key_with_key_password() {
    let leaf = common::self_signed("leaf.example.com", 90);
    let encrypted = common::encrypt_key(&leaf.key_pem, "key-secret");
    let pcc =
        PemCollection::new(leaf.cert_pem.clone(), encrypted).with_key_password("key-secret");

    let bytes = package_as_pkcs12(&pcc, PASSWORD).unwrap();
    let decoded = decode_bundle(&bytes, PASSWORD).unwrap();
    assert_eq!(decoded.certificate, common::cert_der(&leaf.cert_pem));
}

#[test]
fn test_encrypted_key_falls_back_to_bundle_password() {
    let leaf = common::self_signed("leaf.example.com", 90);
    let encrypted = common::encrypt_key(&leaf.key_pem, PASSWORD);
    let pcc = PemCollection::new(leaf.cert_pem, encrypted);

    assert!(package_as_pkcs12(&pcc, PASSWORD).is_ok());
}

#[test]
fn test_encrypted_key_wrong_password() {
    let leaf = common::self_signed("leaf.example.com", 90);
    let encrypted = common::encrypt_key(&leaf.key_pem, "key-secret");
    let pcc = PemCollection::new(leaf.cert_pem, encrypted).with_key_password("wrong");

    let err = package_as_pkcs12(&pcc, PASSWORD).unwrap_err();
    assert!(matches!(err, BundleError::KeyDecrypt { .. }));
}

#[test]
fn test_key_must_match_leaf() {
    let leaf = common::self_signed("leaf.example.com", 90);
    let other = common::self_signed("other.example.com", 90);
    let pcc = PemCollection::new(leaf.cert_pem, other.key_pem);

    let err = package_as_pkcs12(&pcc, PASSWORD).unwrap_err();
    assert!(matches!(err, BundleError::KeyMismatch));
}

#[test]
fn test_each_packaging_uses_fresh_salt() {
    let leaf = common::self_signed("leaf.example.com", 90);
    let pcc = PemCollection::new(leaf.cert_pem, leaf.key_pem);

    let first = package_as_pkcs12(&pcc, PASSWORD).unwrap();
    let second = package_as_pkcs12(&pcc, PASSWORD).unwrap();
    assert_ne!(first, second);
}

#[test]
fn test_rsa_pkcs8_round_trip() {
    let leaf = common::self_signed_rsa("rsa.example.com", 90);
    let pcc = PemCollection::new(leaf.cert_pem.clone(), leaf.key_pem);

    let bytes = package_as_pkcs12(&pcc, PASSWORD).unwrap();
    let decoded = decode_bundle(&bytes, PASSWORD).unwrap();

    assert_eq!(decoded.certificate, common::cert_der(&leaf.cert_pem));
    let key = parse_private_key(&pem_block("PRIVATE KEY", &decoded.private_key), None).unwrap();
    assert_eq!(key.key_type, KeyType::Rsa);
}

#[test]
fn test_rsa_pkcs1_key_is_normalised() {
    let leaf = common::self_signed_rsa("rsa.example.com", 90);
    let pcc = PemCollection::new(leaf.cert_pem.clone(), common::rsa_pkcs1_pem());

    let bytes = package_as_pkcs12(&pcc, PASSWORD).unwrap();
    let decoded = decode_bundle(&bytes, PASSWORD).unwrap();

    assert_eq!(decoded.certificate, common::cert_der(&leaf.cert_pem));
    let key = parse_private_key(&pem_block("PRIVATE KEY", &decoded.private_key), None).unwrap();
    assert_eq!(key.key_type, KeyType::Rsa);
}

#[test]
fn test_p384_round_trip() {
    let leaf = common::self_signed_p384("p384.example.com", 90);
    let pcc = PemCollection::new(leaf.cert_pem.clone(), leaf.key_pem);

    let bytes = package_as_pkcs12(&pcc, PASSWORD).unwrap();
    let decoded = decode_bundle(&bytes, PASSWORD).unwrap();

    assert_eq!(decoded.certificate, common::cert_der(&leaf.cert_pem));
    let key = parse_private_key(&pem_block("PRIVATE KEY", &decoded.private_key), None).unwrap();
    assert_eq!(key.key_type, KeyType::EcP384);
}

#[test]
fn test_truncated_chain_file_is_never_packaged() {
    let material = common::ca_chain(90);
    let dir = tempfile::TempDir::new().unwrap();
    let cert = dir.path().join("leaf.pem");
    let key = dir.path().join("leaf.key");
    let chain = dir.path().join("chain.pem");

    std::fs::write(&cert, &material.leaf.cert_pem).unwrap();
    std::fs::write(&key, &material.leaf.key_pem).unwrap();
    let root_head: String = material
        .root
        .cert_pem
        .lines()
        .take(4)
        .map(|line| format!("{}\n", line))
        .collect();
    std::fs::write(
        &chain,
        format!("{}{}", material.intermediate.cert_pem, root_head),
    )
    .unwrap();

    let err = PemCollection::from_pem_files(&cert, Some(&key), Some(&chain)).unwrap_err();
    match err {
        InstallerError::Bundle(BundleError::ChainEntry { index, .. }) => assert_eq!(index, 1),
        other => panic!("expected chain entry error, got {:?}", other),
    }
}

#[test]
fn test_complete_chain_file_loads_every_certificate() {
    let material = common::ca_chain(90);
    let dir = tempfile::TempDir::new().unwrap();
    let cert = dir.path().join("fullchain.pem");
    let chain = dir.path().join("chain.pem");

    std::fs::write(
        &cert,
        format!("{}{}", material.leaf.cert_pem, material.leaf.key_pem),
    )
    .unwrap();
    std::fs::write(
        &chain,
        format!("{}{}", material.intermediate.cert_pem, material.root.cert_pem),
    )
    .unwrap();

    let pcc = PemCollection::from_pem_files(&cert, None, Some(&chain)).unwrap();
    assert_eq!(pcc.chain.len(), 2);

    let decoded = decode_bundle(&package_as_pkcs12(&pcc, PASSWORD).unwrap(), PASSWORD).unwrap();
    assert_eq!(decoded.chain.len(), 2);
}

fn pem_block(tag: &str, der: &[u8]) -> String {
    pem::encode(&pem::Pem::new(tag, der.to_vec()))
}
