//! Credential handling.
//!
//! # Responsibility
//! - Generate per-user salts and compute salted password digests.
//!
//! # Invariants
//! - Plain-text passwords, digests and salts are never logged.

pub mod password;
