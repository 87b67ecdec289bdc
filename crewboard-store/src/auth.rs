//! Team password hashing.
//!
//! Plain SHA-256 hex digests — team passwords gate access to a shared
//! board, not to anything sensitive, and hardening is out of scope.

use sha2::{Digest, Sha256};

/// Hashes a password to a lowercase SHA-256 hex digest.
#[must_use]
pub fn hash_password(password: &str) -> String {
    let digest = Sha256::digest(password.as_bytes());
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        use std::fmt::Write;
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// Verifies a password against a stored digest.
#[must_use]
pub fn verify_password(password: &str, hash: &str) -> bool {
    hash_password(password) == hash
}
