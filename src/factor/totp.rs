// factor/totp.rs
// Authenticator-app factor built on the TOTP core.

use chrono::Utc;
use uuid::Uuid;

use crate::error::ProvisionError;
use crate::totp::{self, TotpSecret};

use super::{
    AuthFactor, CodeError, ConfirmedFactor, EnrollmentOutcome, EnrollmentRequest,
    PendingEnrollment,
};

pub const TOTP_FACTOR_KEY: &str = "totp";
const CONFIRMED_FACTOR_NAME: &str = "Mobile App (TOTP)";

#[derive(Debug, Clone, Copy, Default)]
pub struct TotpFactor;

impl AuthFactor for TotpFactor {
    fn factor_key(&self) -> &'static str {
        TOTP_FACTOR_KEY
    }

    fn factor_name(&self) -> &'static str {
        "Mobile Phone App (TOTP)"
    }

    fn factor_description(&self) -> &'static str {
        "Attach a mobile authenticator application (like Authy or Google \
         Authenticator) to your account. When you need to authenticate, you \
         will enter a code shown on your phone."
    }

    fn enroll(
        &self,
        request: EnrollmentRequest,
        now: u64,
    ) -> Result<EnrollmentOutcome, ProvisionError> {
        // only a 16-character base32 key is taken back; anything else gets a fresh one
        let secret = match request.key {
            Some(key) if key.is_well_formed() => key,
            _ => totp::generate_secret()?,
        };

        if !request.submitted {
            return Ok(EnrollmentOutcome::Pending(PendingEnrollment {
                secret,
                code_error: None,
            }));
        }

        let code = request.code.unwrap_or_default();
        if let Some(counter) = totp::matching_step(&secret, &code, now) {
            tracing::info!(
                account = %request.account,
                factor = TOTP_FACTOR_KEY,
                "factor confirmed"
            );
            return Ok(EnrollmentOutcome::Confirmed {
                factor: TotpFactor::confirmed(&request.account, secret),
                counter,
            });
        }

        let code_error = if code.is_empty() {
            CodeError::Missing
        } else {
            CodeError::Mismatched
        };
        tracing::debug!(
            account = %request.account,
            reason = code_error.label(),
            "enrollment code rejected"
        );
        Ok(EnrollmentOutcome::Pending(PendingEnrollment {
            secret,
            code_error: Some(code_error),
        }))
    }

    fn verify(&self, factor: &ConfirmedFactor, response: &str, now: u64) -> Option<u64> {
        totp::matching_step(&factor.secret, response, now)
    }
}

impl TotpFactor {
    /// Confirm a factor directly from a known secret, for seeding and tests.
    pub fn confirmed(account: &str, secret: TotpSecret) -> ConfirmedFactor {
        ConfirmedFactor {
            id: Uuid::new_v4(),
            factor_key: TOTP_FACTOR_KEY,
            name: CONFIRMED_FACTOR_NAME.to_string(),
            account: account.to_string(),
            secret,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::totp::{base32, compute_code, time_step};

    const NOW: u64 = 1_700_000_000;

    fn current_code(secret: &TotpSecret) -> String {
        let key = base32::decode(secret.expose()).unwrap();
        compute_code(&key, time_step(NOW)).unwrap().to_string()
    }

    fn request(key: Option<TotpSecret>, code: Option<&str>, submitted: bool) -> EnrollmentRequest {
        EnrollmentRequest {
            account: "ana@example.com".to_string(),
            key,
            code: code.map(str::to_string),
            submitted,
        }
    }

    #[test]
    fn first_round_generates_a_secret() {
        match TotpFactor.enroll(request(None, None, false), NOW).unwrap() {
            EnrollmentOutcome::Pending(p) => {
                assert!(p.secret.is_well_formed());
                assert!(p.code_error.is_none());
            }
            other => panic!("expected pending, got {other:?}"),
        }
    }

    #[test]
    fn correct_code_confirms() {
        let secret = totp::generate_secret().unwrap();
        let code = current_code(&secret);
        match TotpFactor
            .enroll(request(Some(secret.clone()), Some(&code), true), NOW)
            .unwrap()
        {
            EnrollmentOutcome::Confirmed { factor: f, counter } => {
                assert_eq!(counter, time_step(NOW));
                assert_eq!(f.secret, secret);
                assert_eq!(f.factor_key, "totp");
                assert_eq!(f.name, "Mobile App (TOTP)");
                assert_eq!(f.account, "ana@example.com");
            }
            other => panic!("expected confirmed, got {other:?}"),
        }
    }

    #[test]
    fn missing_code_is_required() {
        let secret = totp::generate_secret().unwrap();
        match TotpFactor
            .enroll(request(Some(secret.clone()), Some(""), true), NOW)
            .unwrap()
        {
            EnrollmentOutcome::Pending(p) => {
                assert_eq!(p.code_error, Some(CodeError::Missing));
                assert_eq!(p.secret, secret);
            }
            other => panic!("expected pending, got {other:?}"),
        }
    }

    #[test]
    fn wrong_code_is_invalid() {
        let secret = TotpSecret::new("JBSWY3DPEHPK3PXP");
        let code = current_code(&secret);
        let wrong = if code == "123456" { "654321" } else { "123456" };
        match TotpFactor
            .enroll(request(Some(secret), Some(wrong), true), NOW)
            .unwrap()
        {
            EnrollmentOutcome::Pending(p) => {
                assert_eq!(p.code_error, Some(CodeError::Mismatched))
            }
            other => panic!("expected pending, got {other:?}"),
        }
    }

    #[test]
    fn undecodable_key_is_replaced() {
        let bad = TotpSecret::new("not a key!");
        match TotpFactor
            .enroll(request(Some(bad.clone()), Some("123456"), true), NOW)
            .unwrap()
        {
            EnrollmentOutcome::Pending(p) => {
                assert_ne!(p.secret, bad);
                assert!(p.secret.is_well_formed());
                assert_eq!(p.code_error, Some(CodeError::Mismatched));
            }
            other => panic!("expected pending, got {other:?}"),
        }
    }

    #[test]
    fn short_key_is_never_confirmed() {
        // "AB" decodes to a single byte; a correct code for it must not enroll
        let short = TotpSecret::new("AB");
        let code = current_code(&short);
        match TotpFactor
            .enroll(request(Some(short.clone()), Some(&code), true), NOW)
            .unwrap()
        {
            EnrollmentOutcome::Pending(p) => {
                assert_ne!(p.secret, short);
                assert!(p.secret.is_well_formed());
                assert_eq!(p.code_error, Some(CodeError::Mismatched));
            }
            other => panic!("expected pending, got {other:?}"),
        }
    }

    #[test]
    fn key_without_whole_bytes_is_replaced() {
        // "A" decodes to zero bytes and could never produce a code
        let empty = TotpSecret::new("A");
        match TotpFactor
            .enroll(request(Some(empty.clone()), Some("123456"), true), NOW)
            .unwrap()
        {
            EnrollmentOutcome::Pending(p) => {
                assert_ne!(p.secret, empty);
                assert!(p.secret.is_well_formed());
                assert_eq!(base32::decode(p.secret.expose()).unwrap().len(), 10);
            }
            other => panic!("expected pending, got {other:?}"),
        }
    }

    #[test]
    fn first_round_keeps_a_well_formed_key() {
        let key = TotpSecret::new("JBSWY3DPEHPK3PXP");
        match TotpFactor
            .enroll(request(Some(key.clone()), None, false), NOW)
            .unwrap()
        {
            EnrollmentOutcome::Pending(p) => assert_eq!(p.secret, key),
            other => panic!("expected pending, got {other:?}"),
        }
    }

    #[test]
    fn verify_returns_step() {
        let secret = totp::generate_secret().unwrap();
        let code = current_code(&secret);
        let factor = TotpFactor::confirmed("ana@example.com", secret);
        assert!(TotpFactor.verify(&factor, &code, NOW).is_some());
        assert!(TotpFactor.verify(&factor, "", NOW).is_none());
    }
}
