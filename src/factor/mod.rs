// factor/mod.rs
// Pluggable second factors: the AuthFactor capability, enrollment types and the registry.

use std::{collections::BTreeMap, sync::Arc};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::ProvisionError;
use crate::totp::TotpSecret;

mod totp;

pub use totp::{TOTP_FACTOR_KEY, TotpFactor};

/// Why an enrollment code was not accepted. Only these two reach the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeError {
    Missing,
    Mismatched,
}

impl CodeError {
    /// Field-level message for the enrollment form.
    pub fn label(&self) -> &'static str {
        match self {
            CodeError::Missing => "Required",
            CodeError::Mismatched => "Invalid",
        }
    }
}

/// One submission of an enrollment form.
#[derive(Debug, Clone, Default)]
pub struct EnrollmentRequest {
    pub account: String,
    /// Secret shown in the previous round, echoed back by the client.
    pub key: Option<TotpSecret>,
    pub code: Option<String>,
    /// False on the first round, when the form has not been posted yet.
    pub submitted: bool,
}

/// Enrollment still waiting for a correct code.
#[derive(Debug, Clone)]
pub struct PendingEnrollment {
    pub secret: TotpSecret,
    pub code_error: Option<CodeError>,
}

/// A factor that passed its first verification; storing it is up to the caller.
#[derive(Debug, Clone)]
pub struct ConfirmedFactor {
    pub id: Uuid,
    pub factor_key: &'static str,
    pub name: String,
    pub account: String,
    pub secret: TotpSecret,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub enum EnrollmentOutcome {
    Pending(PendingEnrollment),
    /// `counter` is the step the confirming code was accepted at; it counts
    /// as used, so the same code cannot log in afterwards.
    Confirmed {
        factor: ConfirmedFactor,
        counter: u64,
    },
}

/// Public description of a factor kind.
#[derive(Debug, Clone, Serialize)]
pub struct FactorInfo {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

/// A second factor kind: can describe itself, enroll a user, and verify a response.
pub trait AuthFactor: Send + Sync {
    fn factor_key(&self) -> &'static str;

    fn factor_name(&self) -> &'static str;

    fn factor_description(&self) -> &'static str;

    /// Run one round of enrollment at unix time `now`.
    fn enroll(
        &self,
        request: EnrollmentRequest,
        now: u64,
    ) -> Result<EnrollmentOutcome, ProvisionError>;

    /// Check a response against a confirmed factor. On success returns the
    /// counter the response was accepted at, which increases over time.
    fn verify(&self, factor: &ConfirmedFactor, response: &str, now: u64) -> Option<u64>;

    fn info(&self) -> FactorInfo {
        FactorInfo {
            key: self.factor_key(),
            name: self.factor_name(),
            description: self.factor_description(),
        }
    }
}

/// Factor kinds available to the service, keyed by factor key.
#[derive(Clone, Default)]
pub struct FactorRegistry {
    factors: BTreeMap<&'static str, Arc<dyn AuthFactor>>,
}

impl FactorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in factor.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(TotpFactor));
        registry
    }

    pub fn register(&mut self, factor: Arc<dyn AuthFactor>) {
        self.factors.insert(factor.factor_key(), factor);
    }

    pub fn get(&self, key: &str) -> Option<Arc<dyn AuthFactor>> {
        self.factors.get(key).cloned()
    }

    pub fn list(&self) -> Vec<FactorInfo> {
        self.factors.values().map(|f| f.info()).collect()
    }
}
