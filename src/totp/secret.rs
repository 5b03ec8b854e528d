// totp/secret.rs
// Opaque wrapper for shared secrets and the secure secret generator.

use std::fmt;

use rand::{TryRngCore, rngs::OsRng};
use zeroize::{Zeroize, Zeroizing};

use crate::error::{ProvisionError, TotpError};

use super::base32;

/// Raw bytes behind a freshly generated secret (80 bits).
pub const SECRET_BYTES: usize = 10;
/// Base32 length of a generated secret.
pub const SECRET_CHARS: usize = 16;

/// Base32 shared secret. Has no `Display` and redacts itself in `Debug`;
/// the text is wiped on drop.
#[derive(Clone)]
pub struct TotpSecret(Zeroizing<String>);

impl TotpSecret {
    /// Wraps a candidate secret as submitted by a client. Normalised to
    /// uppercase; validity is checked only when it is decoded.
    pub fn new(encoded: impl Into<String>) -> Self {
        let mut raw: String = encoded.into();
        let upper = raw.to_ascii_uppercase();
        raw.zeroize();
        TotpSecret(Zeroizing::new(upper))
    }

    /// The encoded text, for the one place it is shown to the user.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Raw key bytes for the HMAC.
    pub(crate) fn decode(&self) -> Result<Zeroizing<Vec<u8>>, TotpError> {
        base32::decode(&self.0).map(Zeroizing::new)
    }

    /// True for a 16-character string over the base32 alphabet.
    pub fn is_well_formed(&self) -> bool {
        self.0.len() == SECRET_CHARS && base32::is_valid(&self.0)
    }
}

impl fmt::Debug for TotpSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TotpSecret(<redacted>)")
    }
}

impl PartialEq for TotpSecret {
    fn eq(&self, other: &Self) -> bool {
        use subtle::ConstantTimeEq;
        self.0.as_bytes().ct_eq(other.0.as_bytes()).into()
    }
}

impl Eq for TotpSecret {}

/// Generates a new secret from the operating system's CSPRNG.
pub fn generate_secret() -> Result<TotpSecret, ProvisionError> {
    let mut bytes = Zeroizing::new([0u8; SECRET_BYTES]);
    OsRng
        .try_fill_bytes(&mut bytes[..])
        .map_err(|e| ProvisionError::Randomness(e.to_string()))?;
    Ok(TotpSecret(Zeroizing::new(base32::encode(&bytes[..]))))
}
