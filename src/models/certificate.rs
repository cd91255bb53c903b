//! Certificate information types

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// The parts of an X.509 certificate the installer reasons about
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificateValidity {
    pub subject: String,
    pub issuer: String,
    /// Colon separated upper-case hex
    pub serial: String,
    /// SHA-256 over the DER encoding, colon separated upper-case hex
    pub thumbprint: String,
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
}

impl CertificateValidity {
    /// Total validity period of the certificate
    pub fn lifetime(&self) -> Duration {
        self.not_after - self.not_before
    }

    /// Whether the certificate is no longer valid at `at`
    pub fn is_expired_at(&self, at: DateTime<Utc>) -> bool {
        self.not_after <= at
    }

    pub fn days_until_expiry_at(&self, at: DateTime<Utc>) -> i64 {
        (self.not_after - at).num_days()
    }

    pub fn is_self_signed(&self) -> bool {
        self.subject == self.issuer
    }
}
