//! Base-62 encoding of hash values into compact codes.
//!
//! The alphabet is digits, then lowercase, then uppercase. This ordering
//! is part of the wire contract: codes already handed out must keep
//! resolving, so it cannot change.

/// The base-62 alphabet, least significant symbol first in value order.
pub const ALPHABET: &[u8; 62] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

const BASE: u64 = 62;

/// Encodes a non-negative integer as a base-62 string, most significant
/// digit first, without padding. Zero encodes to `"0"`.
///
/// This is a one-way transform; no decoder exists because resolution
/// always goes through the store, never back through the hash.
///
/// All arithmetic stays in `u64`. Deriving the digits through any
/// floating-point representation would silently corrupt codes for large
/// hash values, so the modulus/division steps must remain integral.
pub fn encode_base62(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while n > 0 {
        digits.push(ALPHABET[(n % BASE) as usize]);
        n /= BASE;
    }
    digits.reverse();

    // Safe: every byte comes out of the ASCII alphabet above.
    String::from_utf8(digits).expect("base62 alphabet is ASCII")
}
