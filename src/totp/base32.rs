// totp/base32.rs
// RFC 4648 base32 (no padding) for shared secrets.

use data_encoding::BASE32_NOPAD;

use crate::error::TotpError;

const ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

fn symbol_value(c: u8) -> Option<u8> {
    match c.to_ascii_uppercase() {
        c @ b'A'..=b'Z' => Some(c - b'A'),
        c @ b'2'..=b'7' => Some(c - b'2' + 26),
        _ => None,
    }
}

/// Decodes a base32 string, case-insensitively. Trailing bits that do not
/// complete a byte are dropped, so any length is accepted.
pub fn decode(input: &str) -> Result<Vec<u8>, TotpError> {
    let mut out = Vec::with_capacity(input.len() * 5 / 8);
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;

    for (position, c) in input.bytes().enumerate() {
        let value = symbol_value(c).ok_or(TotpError::InvalidBase32Character { position })?;
        // only the low 13 bits are ever live; keep the accumulator from growing
        acc = ((acc << 5) | u32::from(value)) & 0x1FFF;
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            out.push(((acc >> bits) & 0xFF) as u8);
        }
    }

    Ok(out)
}

/// Encodes bytes as unpadded base32.
pub fn encode(bytes: &[u8]) -> String {
    BASE32_NOPAD.encode(bytes)
}

/// True when every character belongs to the alphabet (after uppercasing).
pub fn is_valid(input: &str) -> bool {
    input
        .bytes()
        .all(|c| ALPHABET.contains(&c.to_ascii_uppercase()))
}
