//! Credential handling for driveboard.
//!
//! Board entries carry no user accounts; each entry is protected by its own
//! deletion password, hashed here before it reaches storage.

mod password;

pub use password::{
    hash_password, verify_password, PasswordError, KEY_LENGTH, PBKDF2_ITERATIONS, SALT_LENGTH,
};
