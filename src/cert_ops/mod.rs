//! Certificate bundle operations module
//!
//! Decodes PEM certificate material, parses private keys, packages and
//! decodes PKCS#12 bundles, and decides when an installed bundle is due
//! for renewal.

pub mod bundle;
pub mod key;
pub mod reader;
pub mod renewal;

pub use bundle::{decode_bundle, encode_bundle, package_as_pkcs12, DecodedBundle};
pub use key::{KeyType, PrivateKeyMaterial};
pub use reader::{detect_format_from_bytes, DetectedFormat};
pub use renewal::RenewalThreshold;
