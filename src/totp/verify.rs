// totp/verify.rs
// RFC 6238 time steps and the skew-tolerant verifier.

use std::time::{SystemTime, UNIX_EPOCH};

use super::{
    hotp::{CODE_DIGITS, compute_code},
    secret::TotpSecret,
};

/// Width of one time step in seconds.
pub const STEP_SECONDS: u64 = 30;
/// Steps checked on either side of the current one.
pub const WINDOW_STEPS: i64 = 2;

/// Time step counter for a unix timestamp.
pub fn time_step(unix_seconds: u64) -> u64 {
    unix_seconds / STEP_SECONDS
}

/// Seconds since the unix epoch; a clock before 1970 reads as zero.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn is_code_shaped(code: &str) -> bool {
    code.len() == CODE_DIGITS && code.bytes().all(|b| b.is_ascii_digit())
}

/// Returns the time step whose code equals `submitted`, searching offsets
/// -2..=2 around `now` in order. Malformed secrets never match.
pub fn matching_step(secret: &TotpSecret, submitted: &str, now: u64) -> Option<u64> {
    if !is_code_shaped(submitted) {
        return None;
    }
    let key = secret.decode().ok()?;
    let current = time_step(now);

    (-WINDOW_STEPS..=WINDOW_STEPS)
        .filter_map(|offset| current.checked_add_signed(offset))
        .find(|&step| {
            compute_code(&key, step)
                .map(|expected| expected.matches(submitted))
                .unwrap_or(false)
        })
}

/// Checks `submitted` against `secret` at unix time `now`.
pub fn verify(secret: &TotpSecret, submitted: &str, now: u64) -> bool {
    matching_step(secret, submitted, now).is_some()
}

/// Like [`verify`], reading the system clock once.
pub fn verify_now(secret: &TotpSecret, submitted: &str) -> bool {
    verify(secret, submitted, unix_now())
}
