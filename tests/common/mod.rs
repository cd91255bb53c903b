//! Certificate fixtures generated on the fly with rcgen

#![allow(dead_code)]

use rcgen::{
    BasicConstraints, CertificateParams, DistinguishedName, DnType, IsCa, Issuer, KeyPair,
};
use rsa::pkcs1::EncodeRsaPrivateKey;
use rsa::pkcs8::{EncodePrivateKey, LineEnding};
use std::sync::OnceLock;
use time::{Duration, OffsetDateTime};

/// PEM encoded certificate and its private key
pub struct Material {
    pub cert_pem: String,
    pub key_pem: String,
}

/// Leaf plus the intermediate and root that issued it
pub struct ChainMaterial {
    pub leaf: Material,
    pub intermediate: Material,
    pub root: Material,
}

fn params(common_name: &str, days: i64, is_ca: bool) -> CertificateParams {
    let mut params = CertificateParams::default();
    let mut dn = DistinguishedName::new();
    dn.push(DnType::CommonName, common_name);
    params.distinguished_name = dn;
    params.is_ca = if is_ca {
        IsCa::Ca(BasicConstraints::Unconstrained)
    } else {
        IsCa::NoCa
    };

    let now = OffsetDateTime::now_utc();
    params.not_before = now - Duration::days(1);
    params.not_after = now + Duration::days(days);
    params
}

/// Self-signed certificate valid for `days` more days
pub fn self_signed(common_name: &str, days: i64) -> Material {
    let key = KeyPair::generate().expect("generate key");
    let cert = params(common_name, days, false)
        .self_signed(&key)
        .expect("self sign");
    Material {
        cert_pem: cert.pem(),
        key_pem: key.serialize_pem(),
    }
}

fn self_signed_with(common_name: &str, days: i64, key: KeyPair) -> Material {
    let cert = params(common_name, days, false)
        .self_signed(&key)
        .expect("self sign");
    Material {
        cert_pem: cert.pem(),
        key_pem: key.serialize_pem(),
    }
}

/// Self-signed certificate on an ECDSA P-384 key
pub fn self_signed_p384(common_name: &str, days: i64) -> Material {
    let key = KeyPair::generate_for(&rcgen::PKCS_ECDSA_P384_SHA384).expect("generate key");
    self_signed_with(common_name, days, key)
}

/// 2048-bit RSA key, generated once per test binary
fn rsa_key() -> &'static rsa::RsaPrivateKey {
    static KEY: OnceLock<rsa::RsaPrivateKey> = OnceLock::new();
    KEY.get_or_init(|| {
        rsa::RsaPrivateKey::new(&mut rsa::rand_core::OsRng, 2048).expect("generate rsa key")
    })
}

/// Self-signed certificate on an RSA key; `key_pem` is PKCS#8
pub fn self_signed_rsa(common_name: &str, days: i64) -> Material {
    let pkcs8 = rsa_key()
        .to_pkcs8_pem(LineEnding::LF)
        .expect("encode rsa key");
    let key = KeyPair::from_pem(&pkcs8).expect("load rsa key");
    self_signed_with(common_name, days, key)
}

/// The shared RSA key as a PKCS#1 `RSA PRIVATE KEY` block
pub fn rsa_pkcs1_pem() -> String {
    rsa_key()
        .to_pkcs1_pem(LineEnding::LF)
        .expect("encode rsa key")
        .to_string()
}

fn signed_by(common_name: &str, days: i64, is_ca: bool, issuer: &Material) -> Material {
    let issuer_key = KeyPair::from_pem(&issuer.key_pem).expect("issuer key");
    let issuer = Issuer::from_ca_cert_pem(&issuer.cert_pem, &issuer_key).expect("issuer");

    let key = KeyPair::generate().expect("generate key");
    let cert = params(common_name, days, is_ca)
        .signed_by(&key, &issuer)
        .expect("sign");
    Material {
        cert_pem: cert.pem(),
        key_pem: key.serialize_pem(),
    }
}

/// Root CA, intermediate CA and a leaf valid for `leaf_days` more days
pub fn ca_chain(leaf_days: i64) -> ChainMaterial {
    let root_key = KeyPair::generate().expect("generate key");
    let root_cert = params("Test Root CA", 3650, true)
        .self_signed(&root_key)
        .expect("self sign");
    let root = Material {
        cert_pem: root_cert.pem(),
        key_pem: root_key.serialize_pem(),
    };

    let intermediate = signed_by("Test Intermediate CA", 1825, true, &root);
    let leaf = signed_by("leaf.example.com", leaf_days, false, &intermediate);

    ChainMaterial {
        leaf,
        intermediate,
        root,
    }
}

/// Encrypt a PKCS#8 PEM key with PBES2 (PBKDF2-SHA256, AES-256-CBC)
pub fn encrypt_key(key_pem: &str, password: &str) -> String {
    let block = pem::parse(key_pem).expect("parse key");
    let info = pkcs8::PrivateKeyInfo::try_from(block.contents()).expect("pkcs8");
    let params = pkcs8::pkcs5::pbes2::Parameters::pbkdf2_sha256_aes256cbc(
        2048,
        b"fixture-salt",
        &[7u8; 16],
    )
    .expect("pbes2 params");
    let encrypted = info
        .encrypt_with_params(params, password)
        .expect("encrypt key");
    pem::encode(&pem::Pem::new(
        "ENCRYPTED PRIVATE KEY",
        encrypted.as_bytes().to_vec(),
    ))
}

/// DER bytes of a PEM certificate
pub fn cert_der(cert_pem: &str) -> Vec<u8> {
    pem::parse(cert_pem).expect("parse cert").into_contents()
}
