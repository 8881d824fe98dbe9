//! Bank certificate file names.
//!
//! A certificate file is named `<bank>.<snils>.<expiry>.<state>`, e.g.
//! `0646.11111111111.20220923174555.cer`:
//!
//! - `bank`: four-character bank code
//! - `snils`: eleven-character SNILS of the holder
//! - `expiry`: `YYYYMMDDhhmmss` expiry timestamp
//! - `state`: `cer` for an active certificate, `del` for a revoked one

use std::fmt;

use chrono::NaiveDateTime;

use crate::error::ValidationError;

const EXPIRY_FORMAT: &str = "%Y%m%d%H%M%S";
const EXPIRY_LEN: usize = 14;
const BANK_CODE_LEN: usize = 4;
const SNILS_LEN: usize = 11;

/// State tag of a certificate file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CertificateState {
    /// `cer`: certificate to install.
    Active,
    /// `del`: certificate to revoke.
    Revoked,
}

impl CertificateState {
    /// Parses the state tag.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "cer" => Some(Self::Active),
            "del" => Some(Self::Revoked),
            _ => None,
        }
    }

    /// Returns the tag as it appears in file names.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Active => "cer",
            Self::Revoked => "del",
        }
    }
}

impl fmt::Display for CertificateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Fields parsed out of a certificate file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateName {
    /// Bank code.
    pub bank_code: String,
    /// SNILS of the certificate holder.
    pub snils: String,
    /// Expiry timestamp.
    pub expires_at: NaiveDateTime,
    /// Install or revoke.
    pub state: CertificateState,
}

impl CertificateName {
    /// Parses a certificate file name.
    ///
    /// Checks run in a fixed order: part count, expiry, bank code, SNILS,
    /// state tag. The first failing check is reported.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] of the first failing check.
    ///
    /// # Examples
    ///
    /// ```
    /// use certpack_core::entry::CertificateName;
    /// use certpack_core::entry::CertificateState;
    ///
    /// let cert = CertificateName::parse("0647.11111111111.20220923174555.del").unwrap();
    /// assert_eq!(cert.bank_code, "0647");
    /// assert_eq!(cert.state, CertificateState::Revoked);
    ///
    /// assert!(CertificateName::parse("dddddd").is_err());
    /// ```
    pub fn parse(name: &str) -> std::result::Result<Self, ValidationError> {
        let parts: Vec<&str> = name.split('.').collect();
        let &[bank_code, snils, expiry, state] = parts.as_slice() else {
            return Err(ValidationError::MalformedName {
                name: name.to_string(),
            });
        };

        let expires_at = parse_expiry(expiry)?;

        if bank_code.chars().count() != BANK_CODE_LEN {
            return Err(ValidationError::InvalidBankCode {
                value: bank_code.to_string(),
            });
        }
        if snils.chars().count() != SNILS_LEN {
            return Err(ValidationError::InvalidSnils {
                value: snils.to_string(),
            });
        }
        let state = CertificateState::from_tag(state).ok_or_else(|| {
            ValidationError::NotACertificate {
                value: state.to_string(),
            }
        })?;

        Ok(Self {
            bank_code: bank_code.to_string(),
            snils: snils.to_string(),
            expires_at,
            state,
        })
    }

    /// Whether the certificate expires before `moment`.
    #[must_use]
    pub fn is_expired_at(&self, moment: NaiveDateTime) -> bool {
        self.expires_at < moment
    }

    pub(crate) fn summary(&self) -> String {
        format!(
            "bank code: {}; SNILS: {}; expires: {}; state: {}",
            self.bank_code, self.snils, self.expires_at, self.state
        )
    }
}

fn parse_expiry(value: &str) -> std::result::Result<NaiveDateTime, ValidationError> {
    let invalid = || ValidationError::InvalidExpiry {
        value: value.to_string(),
    };
    if value.len() != EXPIRY_LEN || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    NaiveDateTime::parse_from_str(value, EXPIRY_FORMAT).map_err(|_| invalid())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_active_certificate() {
        let cert = CertificateName::parse("0646.11111111111.20220923174555.cer").unwrap();
        assert_eq!(cert.bank_code, "0646");
        assert_eq!(cert.snils, "11111111111");
        assert_eq!(cert.state, CertificateState::Active);
        let expected = NaiveDate::from_ymd_opt(2022, 9, 23)
            .unwrap()
            .and_hms_opt(17, 45, 55)
            .unwrap();
        assert_eq!(cert.expires_at, expected);
    }

    #[test]
    fn test_parse_revoked_certificate() {
        let cert = CertificateName::parse("0647.11111111111.20220923174555.del").unwrap();
        assert_eq!(cert.state, CertificateState::Revoked);
    }

    #[test]
    fn test_rejects_wrong_part_count() {
        assert_eq!(
            CertificateName::parse("dddddd"),
            Err(ValidationError::MalformedName {
                name: "dddddd".into()
            })
        );
        assert!(matches!(
            CertificateName::parse("0646.11111111111.20220923174555.cer.bak"),
            Err(ValidationError::MalformedName { .. })
        ));
    }

    #[test]
    fn test_rejects_unknown_state() {
        assert_eq!(
            CertificateName::parse("0648.11111111111.20220923174555.zzz"),
            Err(ValidationError::NotACertificate {
                value: "zzz".into()
            })
        );
    }

    #[test]
    fn test_rejects_invalid_month() {
        assert!(matches!(
            CertificateName::parse("0646.11111111111.20241323174555.cer"),
            Err(ValidationError::InvalidExpiry { .. })
        ));
    }

    #[test]
    fn test_rejects_short_timestamp() {
        assert!(matches!(
            CertificateName::parse("0646.11111111111.202413231745.cer"),
            Err(ValidationError::InvalidExpiry { .. })
        ));
    }

    #[test]
    fn test_rejects_non_digit_timestamp() {
        assert!(matches!(
            CertificateName::parse("8754.11111111111.2021z812143545.cer"),
            Err(ValidationError::InvalidExpiry { .. })
        ));
    }

    #[test]
    fn test_rejects_bank_code_and_snils_lengths() {
        assert!(matches!(
            CertificateName::parse("064.11111111111.20220923174555.cer"),
            Err(ValidationError::InvalidBankCode { .. })
        ));
        assert!(matches!(
            CertificateName::parse("0646.1111111111.20220923174555.cer"),
            Err(ValidationError::InvalidSnils { .. })
        ));
    }

    #[test]
    fn test_expiry_checked_before_bank_code() {
        assert!(matches!(
            CertificateName::parse("06.1.2022.cer"),
            Err(ValidationError::InvalidExpiry { .. })
        ));
    }

    #[test]
    fn test_is_expired_at() {
        let cert = CertificateName::parse("0646.11111111111.20220923174555.cer").unwrap();
        let before = NaiveDate::from_ymd_opt(2022, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let after = NaiveDate::from_ymd_opt(2023, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert!(!cert.is_expired_at(before));
        assert!(cert.is_expired_at(after));
    }

    #[test]
    fn test_summary_mentions_fields() {
        let cert = CertificateName::parse("0646.11111111111.20220923174555.cer").unwrap();
        let summary = cert.summary();
        assert!(summary.contains("0646"));
        assert!(summary.contains("11111111111"));
        assert!(summary.contains("2022-09-23 17:45:55"));
        assert!(summary.contains("cer"));
    }

    #[test]
    fn test_state_tag_roundtrip() {
        for state in [CertificateState::Active, CertificateState::Revoked] {
            assert_eq!(CertificateState::from_tag(state.tag()), Some(state));
        }
        assert_eq!(CertificateState::from_tag("pem"), None);
    }
}
