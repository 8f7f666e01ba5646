//! Password hashing and verification for board entries.
//!
//! Uses PBKDF2-HMAC-SHA256. A stored credential is the base64 encoding of
//! `salt || derived_key`, which fits in a plain text column.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand_core::{OsRng, RngCore};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

/// Salt length in bytes.
pub const SALT_LENGTH: usize = 16;

/// Derived key length in bytes (SHA-256 output size).
pub const KEY_LENGTH: usize = 32;

/// PBKDF2 iteration count.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Password-related errors.
#[derive(Error, Debug)]
pub enum PasswordError {
    /// Stored credential is not valid base64 or is too short.
    #[error("invalid password hash format")]
    InvalidHash,
}

fn derive_key(password: &[u8], salt: &[u8], rounds: u32) -> [u8; KEY_LENGTH] {
    let mut key = [0u8; KEY_LENGTH];
    pbkdf2::pbkdf2_hmac::<Sha256>(password, salt, rounds, &mut key);
    key
}

/// Hash a password for storage.
///
/// Every call draws a fresh salt, so hashing the same password twice yields
/// different strings that both verify.
///
/// # Examples
///
/// ```
/// use driveboard::{hash_password, verify_password};
///
/// let stored = hash_password("secret");
/// assert!(verify_password(&stored, "secret").unwrap());
/// ```
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LENGTH];
    OsRng.fill_bytes(&mut salt);

    let key = derive_key(password.as_bytes(), &salt, PBKDF2_ITERATIONS);

    let mut blob = Vec::with_capacity(SALT_LENGTH + KEY_LENGTH);
    blob.extend_from_slice(&salt);
    blob.extend_from_slice(&key);
    STANDARD.encode(blob)
}

/// Verify a candidate password against a stored credential.
///
/// Returns `Ok(false)` on mismatch and an error only when the stored value
/// cannot be decoded. The key comparison runs in constant time.
///
/// # Examples
///
/// ```
/// use driveboard::{hash_password, verify_password};
///
/// let stored = hash_password("secret");
/// assert!(!verify_password(&stored, "guess").unwrap());
/// ```
pub fn verify_password(stored: &str, candidate: &str) -> Result<bool, PasswordError> {
    let decoded = STANDARD
        .decode(stored.trim())
        .map_err(|_| PasswordError::InvalidHash)?;
    if decoded.len() < SALT_LENGTH + KEY_LENGTH {
        return Err(PasswordError::InvalidHash);
    }

    let (salt, stored_key) = decoded.split_at(SALT_LENGTH);
    let key = derive_key(candidate.as_bytes(), salt, PBKDF2_ITERATIONS);

    Ok(key.as_slice().ct_eq(stored_key).into())
}
