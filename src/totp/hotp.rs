// totp/hotp.rs
// RFC 4226 HOTP over HMAC-SHA1 with dynamic truncation.

use std::fmt;

use hmac::{Hmac, Mac};
use sha1::Sha1;
use subtle::ConstantTimeEq;

use crate::error::TotpError;

type HmacSha1 = Hmac<Sha1>;

pub const CODE_DIGITS: usize = 6;
const CODE_MODULUS: u32 = 1_000_000;

/// A 6-digit, zero-padded one-time code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Code(String);

impl Code {
    fn from_value(value: u32) -> Self {
        Code(format!("{:0width$}", value % CODE_MODULUS, width = CODE_DIGITS))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Exact string comparison, constant-time over equal lengths.
    pub fn matches(&self, submitted: &str) -> bool {
        self.0.as_bytes().ct_eq(submitted.as_bytes()).into()
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Computes the code for `counter` from raw secret bytes.
pub fn compute_code(secret: &[u8], counter: u64) -> Result<Code, TotpError> {
    if secret.is_empty() {
        return Err(TotpError::EmptySecret);
    }
    let mut mac = HmacSha1::new_from_slice(secret).map_err(|_| TotpError::EmptySecret)?;
    mac.update(&counter.to_be_bytes());
    let digest = mac.finalize().into_bytes();
    Ok(Code::from_value(truncate(&digest)))
}

/// Dynamic truncation: 31-bit value read at the offset named by the last nibble.
fn truncate(digest: &[u8]) -> u32 {
    let offset = (digest[digest.len() - 1] & 0x0F) as usize;
    u32::from_be_bytes([
        digest[offset] & 0x7F,
        digest[offset + 1],
        digest[offset + 2],
        digest[offset + 3],
    ])
}
