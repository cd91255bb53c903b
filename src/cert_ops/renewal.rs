//! Renewal threshold parsing and the renewal predicate

use crate::models::CertificateValidity;
use crate::utils::ConfigError;
use chrono::{DateTime, Duration, Utc};
use std::fmt;
use std::str::FromStr;

/// Longest accepted absolute window, in days
const MAX_WINDOW_DAYS: i64 = 36_500;

/// How far ahead of expiry a certificate is due for renewal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenewalThreshold {
    /// Fixed lookahead, e.g. `30d`
    Window(Duration),
    /// Share of the certificate's total validity period, e.g. `10%`
    Percentage(u8),
}

impl RenewalThreshold {
    /// Lookahead that applies to a particular certificate
    pub fn window_for(&self, validity: &CertificateValidity) -> Duration {
        match self {
            RenewalThreshold::Window(window) => *window,
            RenewalThreshold::Percentage(pct) => {
                let lifetime = validity.lifetime().num_seconds().max(0);
                Duration::seconds(lifetime.saturating_mul(i64::from(*pct)) / 100)
            }
        }
    }

    /// True when the certificate expires at or before `now + window`
    pub fn renewal_due(&self, validity: &CertificateValidity, now: DateTime<Utc>) -> bool {
        match now.checked_add_signed(self.window_for(validity)) {
            Some(horizon) => validity.not_after <= horizon,
            None => true,
        }
    }
}

impl FromStr for RenewalThreshold {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |message: &str| ConfigError::InvalidValue {
            key: "renew_before".to_string(),
            message: format!("{:?}: {}", s, message),
        };

        let text = s.trim().to_ascii_lowercase();
        let Some(unit) = text.chars().last() else {
            return Err(invalid("threshold is empty"));
        };
        let number = &text[..text.len() - unit.len_utf8()];

        if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("expected a whole number followed by s, m, h, d, w or %"));
        }
        let value: i64 = number
            .parse()
            .map_err(|_| invalid("number is too large"))?;

        if unit == '%' {
            return u8::try_from(value)
                .ok()
                .filter(|pct| *pct <= 100)
                .map(RenewalThreshold::Percentage)
                .ok_or_else(|| invalid("percentage must be between 0 and 100"));
        }

        let seconds_per_unit = match unit {
            's' => 1,
            'm' => 60,
            'h' => 3_600,
            'd' => 86_400,
            'w' => 604_800,
            _ => return Err(invalid("unknown unit, expected s, m, h, d, w or %")),
        };

        let seconds = value
            .checked_mul(seconds_per_unit)
            .filter(|secs| *secs <= MAX_WINDOW_DAYS * 86_400)
            .ok_or_else(|| invalid("window is longer than 100 years"))?;

        Ok(RenewalThreshold::Window(Duration::seconds(seconds)))
    }
}

impl fmt::Display for RenewalThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenewalThreshold::Window(window) => {
                let secs = window.num_seconds();
                if secs % 86_400 == 0 {
                    write!(f, "{}d", secs / 86_400)
                } else if secs % 3_600 == 0 {
                    write!(f, "{}h", secs / 3_600)
                } else if secs % 60 == 0 {
                    write!(f, "{}m", secs / 60)
                } else {
                    write!(f, "{}s", secs)
                }
            }
            RenewalThreshold::Percentage(pct) => write!(f, "{}%", pct),
        }
    }
}
