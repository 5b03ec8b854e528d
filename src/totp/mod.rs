// totp/mod.rs
// TOTP core: base32 secrets, HOTP codes, the windowed verifier and secret generation.

pub mod base32;
mod hotp;
mod secret;
mod verify;

use anyhow::Result;
use totp_rs::{Algorithm, TOTP};

pub use hotp::{CODE_DIGITS, Code, compute_code};
pub use secret::{SECRET_BYTES, SECRET_CHARS, TotpSecret, generate_secret};
pub use verify::{
    STEP_SECONDS, WINDOW_STEPS, matching_step, time_step, unix_now, verify, verify_now,
};

/// Build the otpauth:// URL an authenticator app can import.
/// The secret ends up in the URL, so this only feeds the enrollment display.
pub fn otpauth_url(issuer: &str, account: &str, secret: &TotpSecret) -> Result<String> {
    let key = secret.decode()?;
    // new_unchecked: generated secrets are 80 bits, below totp-rs' 128-bit floor
    let totp = TOTP::new_unchecked(
        Algorithm::SHA1,          // what authenticator apps expect
        CODE_DIGITS,              // digits
        WINDOW_STEPS as u8,       // skew
        STEP_SECONDS,             // period in seconds
        key.to_vec(),             // secret bytes
        Some(issuer.to_string()), // issuer
        account.to_string(),      // account name
    );
    Ok(totp.get_url())
}
