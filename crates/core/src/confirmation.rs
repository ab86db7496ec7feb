//! Signup confirmation codes.
//!
//! A fresh code is issued on every signup request. Only the SHA-256 digest is
//! persisted; the plaintext goes out by mail and is exchanged once for an
//! access token.

use rand::Rng;

/// Length of a generated confirmation code (alphanumeric characters).
pub const CODE_LENGTH: usize = 24;

/// A newly issued confirmation code.
pub struct IssuedCode {
    /// Sent to the user, never stored.
    pub plaintext: String,
    /// Stored in `users.confirmation_code_hash`.
    pub hash: String,
}

/// Generate a random confirmation code and its digest.
pub fn issue_code() -> IssuedCode {
    let plaintext: String = rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(CODE_LENGTH)
        .map(char::from)
        .collect();
    let hash = hash_code(&plaintext);
    IssuedCode { plaintext, hash }
}

/// Digest a confirmation code for storage or comparison.
pub fn hash_code(code: &str) -> String {
    crate::hashing::sha256_hex(code.trim().as_bytes())
}

/// Check a submitted code against the stored digest.
pub fn verify_code(submitted: &str, stored_hash: Option<&str>) -> bool {
    match stored_hash {
        Some(hash) => !submitted.trim().is_empty() && hash_code(submitted) == hash,
        None => false,
    }
}
