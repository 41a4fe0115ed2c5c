//! Salted SHA-256 password digests.
//!
//! Storage format: `salt` is 16 random bytes, hex encoded; `password_hash` is
//! `hex(SHA-256(salt_bytes || password_utf8))`. Verification recomputes the
//! digest and compares for equality. There is no key stretching.

use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::error::Error;
use std::fmt::{Display, Formatter};

const SALT_LEN: usize = 16;

/// Raised when persisted credential material cannot be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordError {
    InvalidSalt(String),
}

impl Display for PasswordError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSalt(message) => write!(f, "invalid stored salt: {message}"),
        }
    }
}

impl Error for PasswordError {}

/// Generates a fresh random salt, hex encoded.
pub fn generate_salt() -> String {
    let mut salt = [0_u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    hex::encode(salt)
}

/// Computes the stored digest for `password` under `salt_hex`.
pub fn hash_password(password: &str, salt_hex: &str) -> Result<String, PasswordError> {
    let salt = hex::decode(salt_hex.trim())
        .map_err(|err| PasswordError::InvalidSalt(err.to_string()))?;

    let mut hasher = Sha256::new();
    hasher.update(&salt);
    hasher.update(password.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Returns whether `password` reproduces `expected_hash` under `salt_hex`.
pub fn verify_password(
    password: &str,
    salt_hex: &str,
    expected_hash: &str,
) -> Result<bool, PasswordError> {
    let computed = hash_password(password, salt_hex)?;
    Ok(computed == expected_hash)
}

#[cfg(test)]
mod tests {
    use super::{generate_salt, hash_password, verify_password, PasswordError};

    #[test]
    fn salts_are_hex_and_unique() {
        let first = generate_salt();
        let second = generate_salt();
        assert_eq!(first.len(), 32);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(first, second);
    }

    #[test]
    fn hash_matches_known_sha256_of_salt_then_password() {
        let digest = hash_password("pw", "0001").unwrap();
        assert_eq!(
            digest,
            "6fc4c352c5c44fb1ce97c0c72c4549e42ab22ac7c0c64e6dfc6f7bf9d69c4424"
        );
        assert_ne!(digest, hash_password("pw", "0002").unwrap());
    }

    #[test]
    fn verify_accepts_only_original_password() {
        let salt = generate_salt();
        let stored = hash_password("correct horse", &salt).unwrap();
        assert!(verify_password("correct horse", &salt, &stored).unwrap());
        assert!(!verify_password("correct horse ", &salt, &stored).unwrap());
        assert!(!verify_password("wrong", &salt, &stored).unwrap());
    }

    #[test]
    fn verify_requires_exact_stored_digest() {
        let salt = generate_salt();
        let stored = hash_password("pw", &salt).unwrap();
        assert!(!verify_password("pw", &salt, &stored.to_uppercase()).unwrap());
        assert!(!verify_password("pw", &salt, &format!("{stored}  ")).unwrap());
    }

    #[test]
    fn invalid_salt_is_reported() {
        let err = hash_password("pw", "not-hex").unwrap_err();
        assert!(matches!(err, PasswordError::InvalidSalt(_)));
    }
}
